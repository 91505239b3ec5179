//! # ヘルスチェックハンドラ
//!
//! Book Service の稼働状態を確認するためのエンドポイント。
//!
//! - `/health`: Liveness Check（常に `"healthy"` を返す）
//! - `/health/ready`: Readiness Check（データベースへの疎通を確認）
//!
//! レスポンス型は [`bookshelf_shared::HealthResponse`] / [`bookshelf_shared::ReadinessResponse`] を参照。

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use bookshelf_infra::db;
use bookshelf_shared::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
use sqlx::SqlitePool;

/// Readiness Check のタイムアウト
const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Book Service のヘルスチェックエンドポイント
#[utoipa::path(
   get,
   path = "/health",
   tag = "health",
   responses(
      (status = 200, description = "サーバー稼働中", body = HealthResponse)
   )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status:  "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness Check 用の State
pub struct ReadinessState {
    pub pool: SqlitePool,
}

/// Book Service の Readiness Check エンドポイント
///
/// 全チェック OK → 200、1 つでも失敗 → 503。
#[utoipa::path(
   get,
   path = "/health/ready",
   tag = "health",
   responses(
      (status = 200, description = "データベース疎通 OK", body = ReadinessResponse),
      (status = 503, description = "データベースに接続できない", body = ReadinessResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
    let mut checks = HashMap::new();
    checks.insert("database".to_string(), check_database(&state.pool).await);

    let response = ReadinessResponse::from_checks(checks);
    let http_status = match response.status {
        ReadinessStatus::Ready => StatusCode::OK,
        ReadinessStatus::NotReady => StatusCode::SERVICE_UNAVAILABLE,
    };

    (http_status, Json(response))
}

/// `SELECT 1` でデータベースへの疎通を確認する（タイムアウト: 5 秒）
async fn check_database(pool: &SqlitePool) -> CheckStatus {
    match tokio::time::timeout(CHECK_TIMEOUT, db::ping(pool)).await {
        Ok(Ok(())) => CheckStatus::Ok,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "readiness check: database ping failed");
            CheckStatus::Error
        }
        Err(_) => {
            tracing::warn!("readiness check: database check timed out");
            CheckStatus::Error
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use pretty_assertions::assert_eq;

    use super::*;

    async fn readiness_of(pool: SqlitePool) -> (StatusCode, ReadinessResponse) {
        let state = Arc::new(ReadinessState { pool });
        let response = readiness_check(State(state)).await.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_checkはhealthyとバージョンを返す() {
        let Json(body) = health_check().await;

        assert_eq!(body.status, "healthy");
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_接続できるプールではreadyを返す() {
        let pool = db::create_in_memory_pool().await.unwrap();

        let (status, body) = readiness_of(pool).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, ReadinessStatus::Ready);
        assert_eq!(body.checks.get("database"), Some(&CheckStatus::Ok));
    }

    #[tokio::test]
    async fn test_閉じたプールではnot_readyと503を返す() {
        let pool = db::create_in_memory_pool().await.unwrap();
        pool.close().await;

        let (status, body) = readiness_of(pool).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, ReadinessStatus::NotReady);
        assert_eq!(body.checks.get("database"), Some(&CheckStatus::Error));
    }
}
