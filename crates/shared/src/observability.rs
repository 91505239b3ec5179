//! # Observability 基盤
//!
//! トレーシング初期化とログ出力形式の設定を提供する。
//! 環境変数 `LOG_FORMAT` による JSON / Pretty 出力の切り替えと、
//! `LOG_LEVEL` によるデフォルトのログレベル指定に対応する。

/// デフォルトのログレベル
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// ログ出力形式
///
/// 環境変数 `LOG_FORMAT` で切り替える。
/// 値が未設定または不正な場合は [`Pretty`](LogFormat::Pretty) にフォールバックする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// JSON 形式（本番環境向け）
    Json,
    /// 人間が読みやすい形式（開発環境向け）
    #[default]
    Pretty,
}

impl LogFormat {
    /// 文字列からログ形式をパースする
    ///
    /// 不正な値の場合は [`Pretty`](LogFormat::Pretty) にフォールバックし、
    /// stderr に警告を出力する（トレーシング初期化前のため）。
    pub fn parse(s: &str) -> Self {
        match s {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            other => {
                eprintln!("WARNING: unknown LOG_FORMAT={other:?}, falling back to pretty");
                Self::Pretty
            }
        }
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// サービス名（[`TracingConfig::app_span`] の `service` フィールドに出力）
    pub service_name: String,
    /// ログ出力形式
    pub log_format:   LogFormat,
    /// `RUST_LOG` 未設定時に使うログレベル（例: `"info"`, `"debug"`）
    pub log_level:    String,
}

impl TracingConfig {
    /// 新しい設定を作成する
    pub fn new(
        service_name: impl Into<String>,
        log_format: LogFormat,
        log_level: impl Into<String>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
            log_level: log_level.into(),
        }
    }

    /// `RUST_LOG` 未設定時に使うフィルタ文字列
    ///
    /// ログレベルは小文字に正規化する（`"INFO"` → `"info"`）。
    /// `WARNING` / `CRITICAL` は tracing のレベル名（`warn` / `error`）に読み替える。
    /// 空文字列の場合は [`DEFAULT_LOG_LEVEL`] を使う。
    pub fn default_filter(&self) -> String {
        let level = self.log_level.trim().to_ascii_lowercase();
        match level.as_str() {
            "" => DEFAULT_LOG_LEVEL.to_string(),
            "warning" => "warn".to_string(),
            "critical" | "fatal" => "error".to_string(),
            _ => level,
        }
    }
}

#[cfg(feature = "observability")]
impl TracingConfig {
    /// プロセス全体を包む `app` スパンを作成する
    ///
    /// 起動直後に `entered()` して保持すると、以降のログにサービス名が付く。
    pub fn app_span(&self) -> tracing::Span {
        tracing::info_span!("app", service = %self.service_name)
    }
}

/// トレーシングを初期化する
///
/// `RUST_LOG` 環境変数が設定されていればそれを優先し、
/// 未設定の場合は [`TracingConfig::default_filter`] を使う。
///
/// `tracing_error::ErrorLayer` を登録するため、`SpanTrace` を持つエラーは
/// 生成時点のスパン情報を記録できる。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.default_filter().into());

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .init();
}
