//! テスト用のログキャプチャ
//!
//! JSON 形式で出力されたログを 1 行ずつパースして検証する。

use std::{
    io,
    sync::{Arc, Mutex},
};

use tracing_subscriber::layer::SubscriberExt;

/// 書き込まれたバイト列を保持する Writer
#[derive(Clone, Default)]
pub(crate) struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

impl CapturedOutput {
    /// 出力済みのログ行を JSON として返す
    pub(crate) fn lines(&self) -> Vec<serde_json::Value> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

impl io::Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// JSON ログをキャプチャする subscriber をスレッドのデフォルトに設定する
///
/// 返り値の `DefaultGuard` はスコープに保持すること（ドロップでリセット）。
pub(crate) fn capture_json_logs() -> (tracing::subscriber::DefaultGuard, CapturedOutput) {
    let output = CapturedOutput::default();
    let writer = output.clone();
    let subscriber = tracing_subscriber::registry().with(
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(move || writer.clone()),
    );
    (tracing::subscriber::set_default(subscriber), output)
}
