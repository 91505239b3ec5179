//! # Book Service 設定
//!
//! 環境変数から Book Service サーバーの設定を読み込む。
//!
//! 値の取得元を関数として受け取る [`BookServiceConfig::from_lookup`] を用意し、
//! テストでは環境変数を書き換えずに設定の組み立てを検証できるようにしている。

use std::{env, str::FromStr};

use axum::http::HeaderValue;
use bookshelf_domain::{DomainError, pagination::PageSize};
use bookshelf_infra::db::PoolSettings;
use bookshelf_shared::observability::{DEFAULT_LOG_LEVEL, LogFormat};
use thiserror::Error;

/// 設定読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 数値として解釈できない値
    #[error("{key} は数値である必要があります: {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    /// ページサイズが不正
    #[error("PAGE_SIZE が不正です: {0}")]
    InvalidPageSize(#[from] DomainError),

    /// CORS オリジンがヘッダ値として不正
    #[error("ALLOWED_ORIGINS に不正なオリジンが含まれています: {0:?}")]
    InvalidOrigin(String),
}

/// CORS で許可するオリジン
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    /// `*`: CORS レイヤーを組み込まない
    Any,
    /// 明示的に列挙されたオリジン
    List(Vec<HeaderValue>),
}

impl AllowedOrigins {
    /// カンマ区切りのオリジン一覧をパースする
    ///
    /// 空要素は無視する。`*` を含む場合や要素が無い場合は [`AllowedOrigins::Any`]。
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let origins: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .collect();

        if origins.is_empty() || origins.contains(&"*") {
            return Ok(Self::Any);
        }

        origins
            .into_iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|_| ConfigError::InvalidOrigin(origin.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::List)
    }
}

/// Book Service サーバーの設定
#[derive(Debug, Clone)]
pub struct BookServiceConfig {
    /// バインドアドレス
    pub host:            String,
    /// ポート番号
    pub port:            u16,
    /// SQLite 接続 URL
    pub database_url:    String,
    /// 実行環境名（`dev`, `prod` など。起動ログと OpenAPI の説明文に出力する）
    pub app_env:         String,
    /// `RUST_LOG` 未設定時のログレベル
    pub log_level:       String,
    /// ログ出力形式
    pub log_format:      LogFormat,
    /// 一覧取得の 1 ページあたりの件数
    pub page_size:       PageSize,
    /// CORS 許可オリジン
    pub allowed_origins: AllowedOrigins,
    /// 接続プールのサイズ
    pub pool:            PoolSettings,
}

impl BookServiceConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// キーから値を引く関数を使って設定を組み立てる
    ///
    /// 未設定のキーはデフォルト値を使う。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            host:            get("HOST", "0.0.0.0"),
            port:            parse_number(&lookup, "PORT", 8080)?,
            database_url:    get("DATABASE_URL", "sqlite:///./books.db"),
            app_env:         get("APP_ENV", "dev"),
            log_level:       get("LOG_LEVEL", DEFAULT_LOG_LEVEL),
            log_format:      LogFormat::parse(&get("LOG_FORMAT", "pretty")),
            page_size:       PageSize::new(parse_number(
                &lookup,
                "PAGE_SIZE",
                PageSize::DEFAULT,
            )?)?,
            allowed_origins: AllowedOrigins::parse(&get("ALLOWED_ORIGINS", "*"))?,
            pool:            PoolSettings {
                pool_size:    parse_number(&lookup, "DB_POOL_SIZE", PoolSettings::default().pool_size)?,
                max_overflow: parse_number(
                    &lookup,
                    "DB_MAX_OVERFLOW",
                    PoolSettings::default().max_overflow,
                )?,
            },
        })
    }
}

/// 数値の設定値を読み込む。未設定ならデフォルト値
fn parse_number<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<BookServiceConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BookServiceConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_未設定の場合はデフォルト値を使う() {
        let sut = config_from(&[]).unwrap();

        assert_eq!(sut.host, "0.0.0.0");
        assert_eq!(sut.port, 8080);
        assert_eq!(sut.database_url, "sqlite:///./books.db");
        assert_eq!(sut.app_env, "dev");
        assert_eq!(sut.log_level, "info");
        assert_eq!(sut.log_format, LogFormat::Pretty);
        assert_eq!(sut.page_size.as_u32(), 10);
        assert_eq!(sut.allowed_origins, AllowedOrigins::Any);
        assert_eq!(sut.pool, PoolSettings::default());
    }

    #[test]
    fn test_環境変数の値で上書きできる() {
        let sut = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("APP_ENV", "prod"),
            ("LOG_LEVEL", "DEBUG"),
            ("LOG_FORMAT", "json"),
            ("PAGE_SIZE", "25"),
            ("DB_POOL_SIZE", "2"),
            ("DB_MAX_OVERFLOW", "3"),
        ])
        .unwrap();

        assert_eq!(sut.host, "127.0.0.1");
        assert_eq!(sut.port, 3000);
        assert_eq!(sut.database_url, "sqlite::memory:");
        assert_eq!(sut.app_env, "prod");
        assert_eq!(sut.log_level, "DEBUG");
        assert_eq!(sut.log_format, LogFormat::Json);
        assert_eq!(sut.page_size.as_u32(), 25);
        assert_eq!(
            sut.pool,
            PoolSettings {
                pool_size:    2,
                max_overflow: 3,
            }
        );
    }

    #[rstest]
    #[case::ポート("PORT", "eighty")]
    #[case::ページサイズ("PAGE_SIZE", "-1")]
    #[case::プールサイズ("DB_POOL_SIZE", "five")]
    #[case::オーバーフロー("DB_MAX_OVERFLOW", "1.5")]
    fn test_数値でない値はエラーになる(#[case] key: &str, #[case] value: &str) {
        let result = config_from(&[(key, value)]);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidNumber { key: k, .. }) if k == key
        ));
    }

    #[test]
    fn test_ページサイズ0はエラーになる() {
        let result = config_from(&[("PAGE_SIZE", "0")]);

        assert!(matches!(result, Err(ConfigError::InvalidPageSize(_))));
    }

    #[rstest]
    #[case::ワイルドカード("*")]
    #[case::空文字列("")]
    #[case::ワイルドカードを含む("http://localhost:3000,*")]
    fn test_ワイルドカードはcorsを無効にする(#[case] raw: &str) {
        assert_eq!(AllowedOrigins::parse(raw).unwrap(), AllowedOrigins::Any);
    }

    #[test]
    fn test_カンマ区切りのオリジンを前後の空白を除いてパースする() {
        let sut = AllowedOrigins::parse("http://localhost:3000, https://books.example.com").unwrap();

        assert_eq!(
            sut,
            AllowedOrigins::List(vec![
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("https://books.example.com"),
            ])
        );
    }

    #[test]
    fn test_ヘッダ値にできないオリジンはエラーになる() {
        let result = AllowedOrigins::parse("http://ok.example.com,bad\norigin");

        assert!(matches!(result, Err(ConfigError::InvalidOrigin(_))));
    }
}
