//! # Book Service ライブラリ
//!
//! Book Service の設定、ユースケース、ハンドラ、OpenAPI 定義、ルーター構築を公開する。
//! HTTP 統合テストから [`app_builder::build_app`] を利用する。

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod openapi;
pub mod usecase;
