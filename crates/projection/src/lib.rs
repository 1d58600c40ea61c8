//! Coordinate transformations between the globe and the population raster.
//!
//! Two projections are provided, each paired with its own inverse:
//!
//! - [`LinearProjection`]: plate carrée rescale of longitude/latitude. This
//!   is what the live query path uses.
//! - [`Mollweide`]: equal-area projection onto the same normalized
//!   rectangle, kept for density work where cell area matters.
//!
//! Both map into the normalized rectangle `[-2, 2] x [-1, 1]` first and
//! then onto grid cells with [`grid_from_normalized`].

pub mod linear;
pub mod mollweide;
pub mod transform;

pub use linear::LinearProjection;
pub use mollweide::{Mollweide, ThetaSolver};
pub use transform::{
    grid_from_normalized, normalized_from_grid, GridProjection, ProjectionKind,
    UnknownProjection,
};
