//! # 書籍ハンドラ
//!
//! 書籍の CRUD API を提供する。
//!
//! ## エンドポイント
//!
//! - `POST /books/` - 書籍作成
//! - `GET /books/?page=N` - 書籍一覧（1 始まりのページ番号）
//! - `GET /books/{id}` - 書籍取得
//! - `PUT /books/{id}` - 書籍の部分更新
//! - `DELETE /books/{id}` - 書籍削除
//!
//! 存在しない ID への操作は `404 Not Found`（`detail: "Book not found"`）を返す。

use std::sync::Arc;

use axum::{
   Json,
   extract::{Path, Query, State},
   http::StatusCode,
   response::IntoResponse,
};
use bookshelf_domain::book::{Book, BookId, BookPatch, NewBook};
use bookshelf_shared::ErrorResponse;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{error::BookServiceError, usecase::BookUseCaseImpl};

/// 書籍 API の共有状態
pub struct BookState {
   pub usecase: BookUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// 書籍 DTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookDto {
   pub id:          i64,
   pub title:       String,
   pub author:      String,
   pub description: Option<String>,
   pub price:       f64,
}

impl From<Book> for BookDto {
   fn from(book: Book) -> Self {
      Self {
         id:          book.id().as_i64(),
         title:       book.title().to_string(),
         author:      book.author().to_string(),
         description: book.description().map(|s| s.to_string()),
         price:       book.price(),
      }
   }
}

/// 書籍作成リクエスト
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookRequest {
   pub title:       String,
   pub author:      String,
   pub description: Option<String>,
   pub price:       f64,
}

/// 書籍更新リクエスト
///
/// 省略または `null` のフィールドは変更しない。
/// `description` のみ、明示的な `null` で説明を削除できる。
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateBookRequest {
   pub title:       Option<String>,
   pub author:      Option<String>,
   /// `null` を指定すると説明を削除する
   #[serde(default, deserialize_with = "deserialize_present")]
   #[schema(value_type = Option<String>)]
   pub description: Option<Option<String>>,
   pub price:       Option<f64>,
}

impl From<UpdateBookRequest> for BookPatch {
   fn from(req: UpdateBookRequest) -> Self {
      Self {
         title:       req.title,
         author:      req.author,
         description: req.description,
         price:       req.price,
      }
   }
}

/// キーが存在する場合は `null` も含めて `Some` に包む
///
/// キー自体が無い場合は `#[serde(default)]` により `None` になる。
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
   D: Deserializer<'de>,
   T: Deserialize<'de>,
{
   T::deserialize(deserializer).map(Some)
}

/// 一覧取得のクエリパラメータ
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListBooksQuery {
   /// ページ番号（1 始まり、省略時は 1）
   pub page: Option<i64>,
}

/// 削除レスポンス
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteBookResponse {
   pub ok: bool,
}

// --- ハンドラ ---

/// POST /books/
///
/// 書籍を作成し、採番された ID を含む書籍を返す。
#[utoipa::path(
   post,
   path = "/books/",
   tag = "books",
   request_body = CreateBookRequest,
   responses(
      (status = 200, description = "作成された書籍", body = BookDto),
      (status = 422, description = "必須フィールドの欠落・型不一致")
   )
)]
pub async fn create_book(
   State(state): State<Arc<BookState>>,
   Json(req): Json<CreateBookRequest>,
) -> Result<impl IntoResponse, BookServiceError> {
   let input = NewBook {
      title:       req.title,
      author:      req.author,
      description: req.description,
      price:       req.price,
   };

   let book = state.usecase.create_book(input).await?;

   Ok((StatusCode::OK, Json(BookDto::from(book))))
}

/// GET /books/
///
/// 書籍一覧を ID 昇順で 1 ページ分返す。範囲外のページは空配列。
#[utoipa::path(
   get,
   path = "/books/",
   tag = "books",
   params(ListBooksQuery),
   responses(
      (status = 200, description = "書籍一覧", body = Vec<BookDto>)
   )
)]
pub async fn list_books(
   State(state): State<Arc<BookState>>,
   Query(query): Query<ListBooksQuery>,
) -> Result<impl IntoResponse, BookServiceError> {
   let books = state.usecase.list_books(query.page).await?;

   let items: Vec<BookDto> = books.into_iter().map(BookDto::from).collect();
   Ok((StatusCode::OK, Json(items)))
}

/// GET /books/{id}
#[utoipa::path(
   get,
   path = "/books/{id}",
   tag = "books",
   params(("id" = i64, Path, description = "書籍ID")),
   responses(
      (status = 200, description = "書籍", body = BookDto),
      (status = 404, description = "書籍が見つからない", body = ErrorResponse)
   )
)]
pub async fn get_book(
   State(state): State<Arc<BookState>>,
   Path(id): Path<i64>,
) -> Result<impl IntoResponse, BookServiceError> {
   let book = state.usecase.get_book(BookId::new(id)).await?;

   Ok((StatusCode::OK, Json(BookDto::from(book))))
}

/// PUT /books/{id}
///
/// ## レスポンス
///
/// - `200 OK`: 更新後の書籍
/// - `404 Not Found`: 書籍が見つからない
#[utoipa::path(
   put,
   path = "/books/{id}",
   tag = "books",
   params(("id" = i64, Path, description = "書籍ID")),
   request_body = UpdateBookRequest,
   responses(
      (status = 200, description = "更新後の書籍", body = BookDto),
      (status = 404, description = "書籍が見つからない", body = ErrorResponse)
   )
)]
pub async fn update_book(
   State(state): State<Arc<BookState>>,
   Path(id): Path<i64>,
   Json(req): Json<UpdateBookRequest>,
) -> Result<impl IntoResponse, BookServiceError> {
   let book = state
      .usecase
      .update_book(BookId::new(id), BookPatch::from(req))
      .await?;

   Ok((StatusCode::OK, Json(BookDto::from(book))))
}

/// DELETE /books/{id}
///
/// ## レスポンス
///
/// - `200 OK`: `{"ok": true}`
/// - `404 Not Found`: 書籍が見つからない
#[utoipa::path(
   delete,
   path = "/books/{id}",
   tag = "books",
   params(("id" = i64, Path, description = "書籍ID")),
   responses(
      (status = 200, description = "削除成功", body = DeleteBookResponse),
      (status = 404, description = "書籍が見つからない", body = ErrorResponse)
   )
)]
pub async fn delete_book(
   State(state): State<Arc<BookState>>,
   Path(id): Path<i64>,
) -> Result<impl IntoResponse, BookServiceError> {
   state.usecase.delete_book(BookId::new(id)).await?;

   Ok((StatusCode::OK, Json(DeleteBookResponse { ok: true })))
}
