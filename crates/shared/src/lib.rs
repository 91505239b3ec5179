//! # Bookshelf 共有ユーティリティ
//!
//! サービス全体で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum への依存は持たない（`IntoResponse` 変換は各サービスの責務）
//! - トレーシング関連は `observability` feature で有効化する
//! - OpenAPI スキーマ（`utoipa::ToSchema`）は `openapi` feature で有効化する

#[cfg(feature = "observability")]
pub mod canonical_log;
pub mod error_response;
pub mod health;
pub mod observability;

#[cfg(all(test, feature = "observability"))]
mod test_support;

pub use error_response::ErrorResponse;
pub use health::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
