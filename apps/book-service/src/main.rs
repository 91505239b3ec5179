//! # Book Service サーバー
//!
//! 書籍レコードの作成・一覧・取得・更新・削除を提供する HTTP サービス。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `PORT` | No | ポート番号（デフォルト: `8080`） |
//! | `DATABASE_URL` | No | SQLite 接続 URL（デフォルト: `sqlite:///./books.db`） |
//! | `PAGE_SIZE` | No | 一覧の 1 ページあたりの件数（デフォルト: `10`） |
//! | `APP_ENV` | No | 実行環境名（デフォルト: `dev`） |
//! | `LOG_LEVEL` | No | `RUST_LOG` 未設定時のログレベル（デフォルト: `info`） |
//! | `LOG_FORMAT` | No | `pretty` または `json`（デフォルト: `pretty`） |
//! | `ALLOWED_ORIGINS` | No | CORS 許可オリジン（カンマ区切り、デフォルト: `*` = CORS 無効） |
//! | `DB_POOL_SIZE` | No | 常時確保する接続数（デフォルト: `5`） |
//! | `DB_MAX_OVERFLOW` | No | 上乗せで開ける接続数（デフォルト: `10`） |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境
//! cargo run -p bookshelf-book-service
//!
//! # 本番環境
//! APP_ENV=prod LOG_FORMAT=json DATABASE_URL=sqlite:////var/lib/bookshelf/books.db \
//!   cargo run -p bookshelf-book-service --release
//! ```

use anyhow::Context as _;
use bookshelf_book_service::{app_builder::build_app, config::BookServiceConfig};
use bookshelf_infra::db;
use bookshelf_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

/// Book Service サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // 設定読み込み（ログレベル・形式を含むため、トレーシング初期化より先に行う）
    let config = BookServiceConfig::from_env().context("設定の読み込みに失敗しました")?;

    // トレーシング初期化
    let tracing_config =
        TracingConfig::new("book-service", config.log_format, config.log_level.clone());
    init_tracing(&tracing_config);
    let _tracing_guard = tracing_config.app_span().entered();

    tracing::info!(
        app_env = %config.app_env,
        page_size = config.page_size.as_u32(),
        "Book Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // データベース接続プールを作成
    let pool = db::create_pool(&config.database_url, &config.pool)
        .await
        .context("データベース接続に失敗しました")?;
    tracing::info!(
        max_connections = config.pool.max_connections(),
        "データベースに接続しました"
    );

    // テーブル作成
    db::ensure_schema(&pool)
        .await
        .context("books テーブルの作成に失敗しました")?;

    let app = build_app(pool, &config);

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("{}:{} へのバインドに失敗しました", config.host, config.port))?;
    tracing::info!(
        "Book Service サーバーが起動しました: {}",
        listener.local_addr()?
    );

    axum::serve(listener, app).await?;

    Ok(())
}
