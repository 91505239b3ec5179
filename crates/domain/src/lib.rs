//! # Bookshelf ドメイン層
//!
//! 書籍管理のドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: 一意の識別子を持つオブジェクト（[`book::Book`]）
//! - **値オブジェクト**: 識別子を持たない不変オブジェクト（[`pagination::PageSize`] など）
//! - **ドメインエラー**: 値の制約違反を表現するエラー型
//!
//! ## 依存関係の方向
//!
//! ```text
//! book-service → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、HTTP）には一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`book`] - 書籍エンティティと作成・部分更新の入力
//! - [`pagination`] - オフセットベースのページ指定
//! - [`error`] - ドメイン層で発生するエラーの定義
//!
//! ## 使用例
//!
//! ```rust
//! use bookshelf_domain::book::{Book, BookId, BookPatch};
//!
//! let book = Book::from_db(BookId::new(1), "吾輩は猫である".to_string(), "夏目漱石".to_string(), None, 780.0);
//! let patched = book.patched(BookPatch {
//!     price: Some(880.0),
//!     ..Default::default()
//! });
//!
//! assert_eq!(patched.price(), 880.0);
//! assert_eq!(patched.title(), "吾輩は猫である");
//! ```

pub mod book;
pub mod error;
pub mod pagination;

pub use error::DomainError;
