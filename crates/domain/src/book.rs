//! # 書籍
//!
//! 書籍レコード（タイトル、著者、説明、価格）を表現するドメインモデル。
//!
//! ## ライフサイクル
//!
//! - 作成: [`NewBook`] を永続化すると ID が採番され [`Book`] になる
//! - 更新: [`BookPatch`] で指定されたフィールドのみを置き換える
//! - 削除: ID 指定で物理削除する
//!
//! ID は DB が採番する整数で、作成後に変更されることはない。

use serde::{Deserialize, Serialize};

/// 書籍の一意識別子
///
/// `books.id`（`INTEGER PRIMARY KEY AUTOINCREMENT`）に対応する。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct BookId(i64);

impl BookId {
    /// 既存の整数値から ID を作成する
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// 内部の整数値を取得する
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

/// 書籍作成の入力
///
/// ID は永続化時に採番されるため持たない。
/// 型制約以外のバリデーションは行わない。
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title:       String,
    pub author:      String,
    pub description: Option<String>,
    pub price:       f64,
}

/// 書籍の部分更新
///
/// `None` のフィールドは変更しない。
///
/// `description` のみ二重の `Option` を取る:
/// - `None`: 変更なし
/// - `Some(None)`: 説明を削除する
/// - `Some(Some(text))`: 説明を置き換える
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookPatch {
    pub title:       Option<String>,
    pub author:      Option<String>,
    pub description: Option<Option<String>>,
    pub price:       Option<f64>,
}

impl BookPatch {
    /// 変更対象のフィールドが1つもないか
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.description.is_none()
            && self.price.is_none()
    }
}

/// 書籍エンティティ
///
/// # 不変条件
///
/// - `id` は作成後に変更されない（[`Book::patched`] でも維持される）
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    id:          BookId,
    title:       String,
    author:      String,
    description: Option<String>,
    price:       f64,
}

impl Book {
    /// データベースから書籍を復元する
    pub fn from_db(
        id: BookId,
        title: String,
        author: String,
        description: Option<String>,
        price: f64,
    ) -> Self {
        Self {
            id,
            title,
            author,
            description,
            price,
        }
    }

    /// 部分更新を適用した書籍を返す
    ///
    /// パッチで指定されたフィールドのみを置き換え、ID を含む他のフィールドは維持する。
    pub fn patched(self, patch: BookPatch) -> Self {
        Self {
            id:          self.id,
            title:       patch.title.unwrap_or(self.title),
            author:      patch.author.unwrap_or(self.author),
            description: patch.description.unwrap_or(self.description),
            price:       patch.price.unwrap_or(self.price),
        }
    }

    // Getter メソッド

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}
