//! # OpenAPI 仕様定義
//!
//! utoipa を使用して Book Service の OpenAPI 仕様を Rust の型から自動生成する。
//! 実行環境名を説明文に埋め込んだドキュメントを `GET /openapi.json` で返す。

use std::sync::Arc;

use axum::{Json, extract::State};
use utoipa::OpenApi;

use crate::handler::{book, health};

#[derive(OpenApi)]
#[openapi(
   info(title = "Books API", version = "1.0.0"),
   paths(
      // books
      book::create_book,
      book::list_books,
      book::get_book,
      book::update_book,
      book::delete_book,
      // health
      health::health_check,
      health::readiness_check,
   ),
   components(schemas(
      bookshelf_shared::ErrorResponse,
   )),
   tags(
      (name = "books", description = "書籍管理"),
      (name = "health", description = "ヘルスチェック"),
   )
)]
pub struct ApiDoc;

/// 実行環境名を説明文に含めた OpenAPI ドキュメントを生成する
pub fn api_doc(app_env: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.description = Some(format!("Books service ({app_env} environment)"));
    doc
}

/// GET /openapi.json
pub async fn openapi_json(
    State(doc): State<Arc<utoipa::openapi::OpenApi>>,
) -> Json<utoipa::openapi::OpenApi> {
    Json(doc.as_ref().clone())
}
