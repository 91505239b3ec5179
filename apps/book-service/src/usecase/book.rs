//! 書籍管理ユースケース

use std::sync::Arc;

use bookshelf_domain::{
   book::{Book, BookId, BookPatch, NewBook},
   pagination::{PageRequest, PageSize},
};
use bookshelf_infra::repository::BookRepository;

use crate::error::BookServiceError;

/// 書籍管理ユースケース
pub struct BookUseCaseImpl {
   book_repository: Arc<dyn BookRepository>,
   page_size:       PageSize,
}

impl BookUseCaseImpl {
   pub fn new(book_repository: Arc<dyn BookRepository>, page_size: PageSize) -> Self {
      Self {
         book_repository,
         page_size,
      }
   }

   /// 書籍を作成する
   ///
   /// 型以外の検証は行わない。採番された ID を含む書籍を返す。
   pub async fn create_book(&self, input: NewBook) -> Result<Book, BookServiceError> {
      tracing::info!(
         title = %input.title,
         author = %input.author,
         price = input.price,
         "書籍を作成します"
      );

      let book = self.book_repository.insert(&input).await?;

      tracing::info!(book_id = %book.id(), "書籍を作成しました");
      Ok(book)
   }

   /// 書籍一覧を 1 ページ分取得する
   ///
   /// ページ番号省略時は 1 ページ目。1 未満は 1 ページ目として扱う。
   /// データ件数を超えるページは空を返す。
   pub async fn list_books(&self, page: Option<i64>) -> Result<Vec<Book>, BookServiceError> {
      let request = match page {
         Some(page) => PageRequest::new(page, self.page_size),
         None => PageRequest::first(self.page_size),
      };

      tracing::info!(
         page = request.page(),
         page_size = self.page_size.as_u32(),
         "書籍一覧を取得します"
      );

      Ok(self.book_repository.find_page(&request).await?)
   }

   /// ID で書籍を取得する
   pub async fn get_book(&self, id: BookId) -> Result<Book, BookServiceError> {
      tracing::info!(book_id = %id, "書籍を取得します");

      self.find_existing(id).await
   }

   /// 書籍を部分更新する
   ///
   /// 読み込み → パッチ適用 → 書き戻しの順で処理する。
   /// 変更対象のフィールドが無い場合は書き戻さずに現在の書籍を返す。
   /// 読み込み後に削除された場合も Not Found を返す。
   pub async fn update_book(
      &self,
      id: BookId,
      patch: BookPatch,
   ) -> Result<Book, BookServiceError> {
      tracing::info!(book_id = %id, "書籍を更新します");

      let current = self.find_existing(id).await?;
      if patch.is_empty() {
         return Ok(current);
      }
      let book = current.patched(patch);

      if !self.book_repository.update(&book).await? {
         tracing::warn!(book_id = %id, "更新対象の書籍が見つかりません");
         return Err(BookServiceError::book_not_found());
      }

      Ok(book)
   }

   /// 書籍を削除する
   pub async fn delete_book(&self, id: BookId) -> Result<(), BookServiceError> {
      tracing::info!(book_id = %id, "書籍を削除します");

      if !self.book_repository.delete(&id).await? {
         tracing::warn!(book_id = %id, "削除対象の書籍が見つかりません");
         return Err(BookServiceError::book_not_found());
      }

      Ok(())
   }

   async fn find_existing(&self, id: BookId) -> Result<Book, BookServiceError> {
      self.book_repository.find_by_id(&id).await?.ok_or_else(|| {
         tracing::warn!(book_id = %id, "書籍が見つかりません");
         BookServiceError::book_not_found()
      })
   }
}

#[cfg(test)]
mod tests {
   use bookshelf_infra::mock::MockBookRepository;
   use pretty_assertions::assert_eq;
   use rstest::{fixture, rstest};

   use super::*;

   #[fixture]
   fn repo() -> MockBookRepository {
      MockBookRepository::new()
   }

   fn sut_with(repo: &MockBookRepository, page_size: u32) -> BookUseCaseImpl {
      BookUseCaseImpl::new(Arc::new(repo.clone()), PageSize::new(page_size).unwrap())
   }

   fn new_book(title: &str) -> NewBook {
      NewBook {
         title:       title.to_string(),
         author:      "作者不詳".to_string(),
         description: None,
         price:       1000.0,
      }
   }

   #[rstest]
   #[tokio::test]
   async fn test_作成した書籍をidで取得できる(repo: MockBookRepository) {
      let sut = sut_with(&repo, 10);

      let created = sut
         .create_book(NewBook {
            description: Some("あらすじ".to_string()),
            ..new_book("坊っちゃん")
         })
         .await
         .unwrap();
      let fetched = sut.get_book(created.id()).await.unwrap();

      assert_eq!(fetched, created);
      assert_eq!(fetched.description(), Some("あらすじ"));
      assert_eq!(repo.len(), 1);
   }

   #[rstest]
   #[case::ページ省略(None, vec![1, 2, 3])]
   #[case::二ページ目(Some(2), vec![4, 5, 6])]
   #[case::最終ページ(Some(4), vec![10])]
   #[case::範囲外(Some(5), vec![])]
   #[case::ゼロは先頭ページ(Some(0), vec![1, 2, 3])]
   #[case::負数は先頭ページ(Some(-3), vec![1, 2, 3])]
   #[tokio::test]
   async fn test_一覧は設定されたページサイズで分割される(
      repo: MockBookRepository,
      #[case] page: Option<i64>,
      #[case] expected_ids: Vec<i64>,
   ) {
      let sut = sut_with(&repo, 3);
      for n in 1..=10 {
         sut.create_book(new_book(&format!("本 {n}"))).await.unwrap();
      }

      let books = sut.list_books(page).await.unwrap();

      let ids: Vec<i64> = books.iter().map(|b| b.id().as_i64()).collect();
      assert_eq!(ids, expected_ids);
   }

   #[rstest]
   #[tokio::test]
   async fn test_更新は指定されたフィールドのみ変更する(repo: MockBookRepository) {
      let sut = sut_with(&repo, 10);
      let created = sut
         .create_book(NewBook {
            description: Some("初版".to_string()),
            ..new_book("こころ")
         })
         .await
         .unwrap();

      let updated = sut
         .update_book(
            created.id(),
            BookPatch {
               author: Some("夏目漱石".to_string()),
               ..Default::default()
            },
         )
         .await
         .unwrap();

      assert_eq!(updated.id(), created.id());
      assert_eq!(updated.title(), "こころ");
      assert_eq!(updated.author(), "夏目漱石");
      assert_eq!(updated.description(), Some("初版"));
      assert_eq!(updated.price(), 1000.0);
      assert_eq!(sut.get_book(created.id()).await.unwrap(), updated);
   }

   #[rstest]
   #[tokio::test]
   async fn test_削除後の取得はnot_foundになる(repo: MockBookRepository) {
      let sut = sut_with(&repo, 10);
      let created = sut.create_book(new_book("山月記")).await.unwrap();

      sut.delete_book(created.id()).await.unwrap();
      let result = sut.get_book(created.id()).await;

      assert!(matches!(result, Err(BookServiceError::NotFound(_))));
      assert!(repo.is_empty());
   }

   #[rstest]
   #[tokio::test]
   async fn test_存在しないidへの操作はすべてnot_foundになる(repo: MockBookRepository) {
      let sut = sut_with(&repo, 10);
      let missing = BookId::new(404);

      let get = sut.get_book(missing).await;
      let update = sut.update_book(missing, BookPatch::default()).await;
      let delete = sut.delete_book(missing).await;

      assert!(matches!(get, Err(BookServiceError::NotFound(ref m)) if m == "Book not found"));
      assert!(matches!(update, Err(BookServiceError::NotFound(_))));
      assert!(matches!(delete, Err(BookServiceError::NotFound(_))));
   }
}
