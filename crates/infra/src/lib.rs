//! # Bookshelf インフラ層
//!
//! データベースとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **データベース接続**: SQLite への接続プール管理とテーブルの準備
//! - **リポジトリ実装**: 書籍の CRUD
//!
//! ## 依存関係
//!
//! ```text
//! book-service → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - SQLite データベース接続管理
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリ実装
//! - `mock` - テスト用インメモリリポジトリ（`test-utils` feature）

pub mod db;
pub mod error;
#[cfg(feature = "test-utils")]
pub mod mock;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};
