//! # テスト用モックリポジトリ
//!
//! ユースケース・ハンドラのテストで使用するインメモリモックリポジトリ。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! bookshelf-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bookshelf_domain::{
    book::{Book, BookId, NewBook},
    pagination::PageRequest,
};

use crate::{error::InfraError, repository::BookRepository};

// ===== MockBookRepository =====

/// インメモリの BookRepository
///
/// ID は SQLite の AUTOINCREMENT と同様に 1 から採番し、削除後も再利用しない。
#[derive(Clone, Default)]
pub struct MockBookRepository {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    books:   Vec<Book>,
    last_id: i64,
}

impl MockBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存済みの書籍数
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BookRepository for MockBookRepository {
    async fn insert(&self, book: &NewBook) -> Result<Book, InfraError> {
        let mut state = self.state.lock().unwrap();
        state.last_id += 1;
        let created = Book::from_db(
            BookId::new(state.last_id),
            book.title.clone(),
            book.author.clone(),
            book.description.clone(),
            book.price,
        );
        state.books.push(created.clone());
        Ok(created)
    }

    async fn find_page(&self, page: &PageRequest) -> Result<Vec<Book>, InfraError> {
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        Ok(self
            .state
            .lock()
            .unwrap()
            .books
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, InfraError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .books
            .iter()
            .find(|b| b.id() == *id)
            .cloned())
    }

    async fn update(&self, book: &Book) -> Result<bool, InfraError> {
        let mut state = self.state.lock().unwrap();
        match state.books.iter_mut().find(|b| b.id() == book.id()) {
            Some(existing) => {
                *existing = book.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &BookId) -> Result<bool, InfraError> {
        let mut state = self.state.lock().unwrap();
        let before = state.books.len();
        state.books.retain(|b| b.id() != *id);
        Ok(state.books.len() < before)
    }
}
