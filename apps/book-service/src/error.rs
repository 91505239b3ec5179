//! # Book Service エラー定義
//!
//! Book Service 固有のエラーと、HTTP レスポンスへの変換を定義する。

use axum::{
   Json,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use bookshelf_shared::ErrorResponse;
use thiserror::Error;

/// Book Service で発生するエラー
#[derive(Debug, Error)]
pub enum BookServiceError {
   /// リソースが見つからない
   #[error("リソースが見つかりません: {0}")]
   NotFound(String),

   /// データベースエラー
   #[error("データベースエラー: {0}")]
   Database(#[from] bookshelf_infra::InfraError),
}

impl BookServiceError {
   /// 書籍が見つからない
   pub fn book_not_found() -> Self {
      Self::NotFound("Book not found".to_string())
   }
}

impl IntoResponse for BookServiceError {
   fn into_response(self) -> Response {
      let body = match &self {
         BookServiceError::NotFound(msg) => ErrorResponse::not_found(msg.clone()),
         BookServiceError::Database(e) => {
            tracing::error!(
               error.kind = "database",
               span_trace = %e.span_trace(),
               "データベースエラー: {}",
               e
            );
            ErrorResponse::internal_error()
         }
      };

      let status =
         StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
      (status, Json(body)).into_response()
   }
}

#[cfg(test)]
mod tests {
   use axum::body::to_bytes;
   use pretty_assertions::assert_eq;

   use super::*;

   async fn response_body(error: BookServiceError) -> (StatusCode, ErrorResponse) {
      let response = error.into_response();
      let status = response.status();
      let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
      (status, serde_json::from_slice(&bytes).unwrap())
   }

   #[tokio::test]
   async fn test_not_foundは404とdetailを返す() {
      let (status, body) = response_body(BookServiceError::book_not_found()).await;

      assert_eq!(status, StatusCode::NOT_FOUND);
      assert_eq!(body, ErrorResponse::not_found("Book not found"));
   }

   #[tokio::test]
   async fn test_databaseエラーは内部情報を含まない500を返す() {
      let error = BookServiceError::from(bookshelf_infra::InfraError::from(
         sqlx::Error::PoolTimedOut,
      ));

      let (status, body) = response_body(error).await;

      assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
      assert_eq!(body, ErrorResponse::internal_error());
   }
}
