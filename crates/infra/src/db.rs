//! # SQLite データベース接続管理
//!
//! データベース接続プールの作成と、`books` テーブルの準備を行う。
//!
//! ## 設計方針
//!
//! - **接続プール**: リクエストごとにプールから接続を借り、処理後に返却する
//! - **sqlx 採用**: 非同期サポート、`FromRow` による型安全な行マッピング
//! - **スキーマ準備**: 起動時に `CREATE TABLE IF NOT EXISTS` でテーブルを作成または確認する。
//!   バージョン管理されたマイグレーションは行わない
//!
//! ## 接続 URL
//!
//! | URL | 接続先 |
//! |-----|--------|
//! | `sqlite:///./books.db` | カレントディレクトリからの相対パス |
//! | `sqlite:////var/lib/books.db` | 絶対パス `/var/lib/books.db` |
//! | `sqlite://` / `sqlite:///:memory:` | インメモリ DB |
//! | `sqlite://books.db` / `sqlite::memory:` | sqlx 形式（そのまま解釈） |
//!
//! スラッシュ 3 本の後ろをファイルパスとして扱う。SQLite 以外のスキームはエラー。
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use bookshelf_infra::db::{self, PoolSettings};
//!
//! async fn example() -> Result<(), sqlx::Error> {
//!     let pool = db::create_pool("sqlite:///./books.db", &PoolSettings::default()).await?;
//!     db::ensure_schema(&pool).await?;
//!     Ok(())
//! }
//! ```

use std::{borrow::Cow, time::Duration};

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

/// 接続取得のタイムアウト
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// `books` テーブルとインデックスの DDL
///
/// 何度実行しても結果が変わらない（冪等）。
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS books (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        title       TEXT NOT NULL,
        author      TEXT NOT NULL,
        description TEXT,
        price       REAL NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ix_books_title ON books (title)",
    "CREATE INDEX IF NOT EXISTS ix_books_author ON books (author)",
];

/// 接続プールのサイズ設定
///
/// `pool_size` 本の接続を常時確保し、負荷に応じて `max_overflow` 本まで追加で開く。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    /// 常時確保する接続数
    pub pool_size:    u32,
    /// 上乗せで開ける接続数
    pub max_overflow: u32,
}

impl PoolSettings {
    /// プールの最大接続数
    pub fn max_connections(&self) -> u32 {
        self.pool_size.saturating_add(self.max_overflow).max(1)
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            pool_size:    5,
            max_overflow: 10,
        }
    }
}

/// 接続時にデータベースファイルが無ければ作成する `SqliteConnectOptions` を返す
///
/// 受け付ける URL の形式はモジュールドキュメントを参照。
pub fn connect_options(database_url: &str) -> Result<SqliteConnectOptions, sqlx::Error> {
    let options = sqlx_sqlite_url(database_url)?.parse::<SqliteConnectOptions>()?;
    Ok(options.create_if_missing(true))
}

/// `sqlite:///<path>` 形式の URL を sqlx が解釈できる形に書き換える
///
/// sqlx は `sqlite://` の後ろをそのままパスとするため、
/// `sqlite:///./books.db` を渡すと `/./books.db` になってしまう。
fn sqlx_sqlite_url(database_url: &str) -> Result<Cow<'_, str>, sqlx::Error> {
    if database_url == "sqlite://" {
        return Ok(Cow::Borrowed("sqlite::memory:"));
    }
    if let Some(path) = database_url.strip_prefix("sqlite:///") {
        return Ok(Cow::Owned(format!("sqlite://{path}")));
    }
    if database_url.starts_with("sqlite:") {
        return Ok(Cow::Borrowed(database_url));
    }

    // 資格情報を含み得るため、エラーにはスキームだけを載せる
    let scheme = database_url.split_once(':').map_or("", |(scheme, _)| scheme);
    Err(sqlx::Error::Configuration(
        format!("SQLite 以外のデータベース URL には対応していません: scheme={scheme:?}").into(),
    ))
}

/// SQLite 接続プールを作成する
///
/// アプリケーション起動時に一度だけ呼び出し、作成したプールを
/// アプリケーション全体で共有する。
///
/// # 設定値
///
/// - `max_connections`: `pool_size + max_overflow`
/// - `min_connections`: `pool_size`
/// - `acquire_timeout(5秒)`: 接続取得のタイムアウト。超過時はエラー
pub async fn create_pool(
    database_url: &str,
    settings: &PoolSettings,
) -> Result<SqlitePool, sqlx::Error> {
    let max_connections = settings.max_connections();

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .min_connections(settings.pool_size.min(max_connections))
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(connect_options(database_url)?)
        .await
}

/// インメモリ DB の接続プールを作成する
///
/// SQLite のインメモリ DB は接続ごとに独立するため、接続数を 1 に固定し、
/// 接続が閉じられないようにアイドルタイムアウトと寿命を無効化する。
/// テストやローカルでの動作確認に使う。
pub async fn create_in_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(connect_options("sqlite::memory:")?)
        .await
}

/// `books` テーブルを作成または確認する
#[tracing::instrument(skip_all)]
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(*statement).execute(pool).await?;
    }
    tracing::info!("books テーブルを作成または確認しました");
    Ok(())
}

/// データベースへの疎通を確認する
///
/// readiness チェックで使用する。
pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
