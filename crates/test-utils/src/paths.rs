//! Locating real data files for tests that need them.
//!
//! The full global snapshot is far too large to check in, so tests that
//! use it look in a few well-known places and skip when it is absent.

use std::path::{Path, PathBuf};

/// Environment variable naming an extra directory to search first.
pub const TEST_DATA_ENV: &str = "TEST_DATA_DIR";

/// Workspace root, two levels above this crate's manifest.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .nth(2)
        .unwrap_or(manifest_dir)
        .to_path_buf()
}

/// Directories searched by [`find_test_file`], in order.
///
/// `$TEST_DATA_DIR` when set, then `testdata/` and `instance/` at the
/// workspace root. `instance/` is where the preprocessor writes the
/// snapshot by default.
pub fn search_dirs() -> Vec<PathBuf> {
    let root = workspace_root();
    std::env::var_os(TEST_DATA_ENV)
        .map(PathBuf::from)
        .into_iter()
        .chain([root.join("testdata"), root.join("instance")])
        .collect()
}

/// First existing `dir/name` over [`search_dirs`].
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    search_dirs()
        .into_iter()
        .map(|dir| dir.join(name))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_holds_workspace_manifest() {
        let root = workspace_root();
        assert!(root.join("Cargo.toml").exists(), "no Cargo.toml in {:?}", root);
        assert!(root.join("crates").join("test-utils").exists());
    }

    #[test]
    fn test_search_order_ends_with_instance() {
        let dirs = search_dirs();
        assert!(dirs.len() >= 2);
        assert!(dirs[dirs.len() - 1].ends_with("instance"));
        assert!(dirs[dirs.len() - 2].ends_with("testdata"));
    }

    #[test]
    fn test_missing_file() {
        assert!(find_test_file("no_such_snapshot.bin").is_none());
    }
}
