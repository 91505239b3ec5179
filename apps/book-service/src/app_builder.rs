//! # Book Service アプリケーション構築
//!
//! DI（リポジトリ・ユースケース・State）の初期化とルーター構築を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::sync::Arc;

use axum::{Router, http::HeaderValue, routing::get};
use bookshelf_infra::repository::{BookRepository, SqliteBookRepository};
use bookshelf_shared::canonical_log::CanonicalLogLineLayer;
use sqlx::SqlitePool;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::{AllowedOrigins, BookServiceConfig},
    handler::{
        BookState,
        ReadinessState,
        create_book,
        delete_book,
        get_book,
        health_check,
        list_books,
        readiness_check,
        update_book,
    },
    openapi::{api_doc, openapi_json},
    usecase::BookUseCaseImpl,
};

/// DI コンテナの構築とルーター定義を行う
///
/// 接続済みのプールを受け取り、リポジトリ → ユースケース → State → Router の
/// 順に組み立てる。
pub fn build_app(pool: SqlitePool, config: &BookServiceConfig) -> Router {
    let book_repository: Arc<dyn BookRepository> =
        Arc::new(SqliteBookRepository::new(pool.clone()));
    let book_state = Arc::new(BookState {
        usecase: BookUseCaseImpl::new(book_repository, config.page_size),
    });
    let readiness_state = Arc::new(ReadinessState { pool });
    let openapi_doc = Arc::new(api_doc(&config.app_env));

    // `/books` と `/books/` の両方で受け付ける
    let router = Router::new()
        .route("/health", get(health_check))
        .merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        )
        .merge(
            Router::new()
                .route("/openapi.json", get(openapi_json))
                .with_state(openapi_doc),
        )
        .route("/books", get(list_books).post(create_book))
        .route("/books/", get(list_books).post(create_book))
        .route(
            "/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(book_state)
        // レイヤー順序: 下に書いたものが外側
        // 1. TraceLayer（最外）: リクエストごとのスパンを作成
        // 2. CanonicalLogLineLayer: リクエスト完了時に1行サマリログを出力（スパン内）
        .layer(CanonicalLogLineLayer)
        .layer(TraceLayer::new_for_http());

    match &config.allowed_origins {
        AllowedOrigins::Any => router,
        AllowedOrigins::List(origins) => router.layer(cors_layer(origins.clone())),
    }
}

/// 列挙されたオリジンのみを許可する CORS レイヤー
///
/// 資格情報付きリクエストを許可するため、メソッドとヘッダはワイルドカードではなく
/// リクエストの値をそのまま返す。
fn cors_layer(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
