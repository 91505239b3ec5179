//! # リポジトリ実装
//!
//! 書籍の永続化を担当するリポジトリトレイトとその実装を提供する。
//!
//! ## 設計方針
//!
//! - **トレイト経由のアクセス**: ユースケース層は `Arc<dyn BookRepository>` のみに依存する
//! - **データベース抽象化**: sqlx を使用し、SQLite 固有の処理をカプセル化
//! - **テスタビリティ**: `test-utils` feature のインメモリ実装で差し替え可能

pub mod book_repository;

pub use book_repository::{BookRepository, SqliteBookRepository};
