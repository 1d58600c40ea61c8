//! Liveness probe kept for older clients.

use axum::extract::Query;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PingParams {
    pub arg: Option<String>,
}

/// GET /ping?arg=... - echoes `arg` with every `i` turned into `o`
pub async fn ping_handler(Query(params): Query<PingParams>) -> String {
    let arg = params.arg.unwrap_or_else(|| "ping".to_string());
    arg.replace('i', "o").replace('I', "O")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_ping() {
        let body = ping_handler(Query(PingParams { arg: None })).await;
        assert_eq!(body, "pong");
    }

    #[tokio::test]
    async fn test_ping_replaces_both_cases() {
        let body = ping_handler(Query(PingParams {
            arg: Some("PIng king".to_string()),
        }))
        .await;
        assert_eq!(body, "POng kong");
    }
}
