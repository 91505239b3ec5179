//! # BookRepository
//!
//! 書籍レコードの永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **1 操作 1 接続**: 各メソッドはプールから接続を借りてクエリを実行し、完了時に返却する
//! - **存在しない ID**: 取得は `None`、更新・削除は `false` を返す。
//!   Not Found への変換はユースケース層の責務
//! - **並び順**: 一覧は ID 昇順（= 作成順）で返す

use async_trait::async_trait;
use bookshelf_domain::{
    book::{Book, BookId, NewBook},
    pagination::PageRequest,
};
use sqlx::{FromRow, SqlitePool};

use crate::error::InfraError;

/// 書籍リポジトリトレイト
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// 書籍を挿入し、採番された ID を含む書籍を返す
    async fn insert(&self, book: &NewBook) -> Result<Book, InfraError>;

    /// 指定ページの書籍を ID 昇順で取得する
    ///
    /// データ件数を超えるページは空の Vec を返す。
    async fn find_page(&self, page: &PageRequest) -> Result<Vec<Book>, InfraError>;

    /// ID で書籍を検索する
    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, InfraError>;

    /// 書籍の全フィールドを上書きする
    ///
    /// 該当行が存在しなかった場合は `false` を返す。
    async fn update(&self, book: &Book) -> Result<bool, InfraError>;

    /// 書籍を削除する
    ///
    /// 該当行が存在しなかった場合は `false` を返す。
    async fn delete(&self, id: &BookId) -> Result<bool, InfraError>;
}

/// SQLite 実装の BookRepository
#[derive(Debug, Clone)]
pub struct SqliteBookRepository {
    pool: SqlitePool,
}

impl SqliteBookRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// `books` テーブルの行
#[derive(Debug, FromRow)]
struct BookRow {
    id:          i64,
    title:       String,
    author:      String,
    description: Option<String>,
    price:       f64,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book::from_db(
            BookId::new(row.id),
            row.title,
            row.author,
            row.description,
            row.price,
        )
    }
}

#[async_trait]
impl BookRepository for SqliteBookRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert(&self, book: &NewBook) -> Result<Book, InfraError> {
        let row = sqlx::query_as::<_, BookRow>(
            r#"
            INSERT INTO books (title, author, description, price)
            VALUES (?, ?, ?, ?)
            RETURNING id, title, author, description, price
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.description)
        .bind(book.price)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(page = page.page(), limit = page.limit()))]
    async fn find_page(&self, page: &PageRequest) -> Result<Vec<Book>, InfraError> {
        let rows = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT id, title, author, description, price
            FROM books
            ORDER BY id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, InfraError> {
        let row = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT id, title, author, description, price
            FROM books
            WHERE id = ?
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Book::from))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(id = %book.id()))]
    async fn update(&self, book: &Book) -> Result<bool, InfraError> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = ?, author = ?, description = ?, price = ?
            WHERE id = ?
            "#,
        )
        .bind(book.title())
        .bind(book.author())
        .bind(book.description())
        .bind(book.price())
        .bind(book.id().as_i64())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, id: &BookId) -> Result<bool, InfraError> {
        let result = sqlx::query(
            r#"
            DELETE FROM books
            WHERE id = ?
            "#,
        )
        .bind(id.as_i64())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
