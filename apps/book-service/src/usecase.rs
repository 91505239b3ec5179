//! # ユースケース層
//!
//! Book Service のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリを `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラは HTTP との変換のみ行い、ロジックはユースケースに集約
//! - **Not Found の判定**: リポジトリの `None` / `false` をここで [`BookServiceError::NotFound`]
//!   に変換する
//!
//! [`BookServiceError::NotFound`]: crate::error::BookServiceError::NotFound

pub mod book;

pub use book::BookUseCaseImpl;
