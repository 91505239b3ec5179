//! # Canonical Log Line ミドルウェア
//!
//! HTTP リクエスト完了時に、そのリクエストの要点（メソッド、パス、ステータス、
//! レイテンシ）を 1 行に集約したサマリログを出力する tower Layer。
//!
//! ## TraceLayer との責務分離
//!
//! - TraceLayer: リクエストごとのスパン作成
//! - CanonicalLogLineLayer: リクエスト完了サマリ。1 行で全体像を提供
//!
//! ```text
//! TraceLayer → CanonicalLogLineLayer → handler
//! ```

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};

use http::{Request, Response};
use tower::{Layer, Service};

/// ヘルスチェックパスかどうかを判定する
///
/// `/health`（liveness）と `/health/ready`（readiness）を除外対象とする。
fn is_health_check_path(path: &str) -> bool {
    path.starts_with("/health")
}

/// Canonical Log Line を出力する Layer
///
/// リクエスト完了時に INFO レベルで `log.type = "canonical"` マーカー付きの
/// サマリログを出力する。ヘルスチェックパスは出力対象外。
#[derive(Clone, Debug)]
pub struct CanonicalLogLineLayer;

impl<S> Layer<S> for CanonicalLogLineLayer {
    type Service = CanonicalLogLineService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CanonicalLogLineService { inner }
    }
}

/// [`CanonicalLogLineLayer`] が生成する Service
#[derive(Clone, Debug)]
pub struct CanonicalLogLineService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for CanonicalLogLineService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::fmt::Display + 'static,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // clone-swap パターン: poll_ready で得た readiness を保持する inner を使う
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let path = req.uri().path().to_owned();

        if is_health_check_path(&path) {
            return Box::pin(async move { inner.call(req).await });
        }

        let method = req.method().clone();
        let start = Instant::now();

        Box::pin(async move {
            let result = inner.call(req).await;
            let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            match &result {
                Ok(response) => {
                    tracing::info!(
                        log.r#type = "canonical",
                        http.method = %method,
                        http.path = %path,
                        http.status_code = response.status().as_u16(),
                        http.latency_ms = latency_ms,
                        "リクエスト完了"
                    );
                }
                Err(err) => {
                    tracing::error!(
                        log.r#type = "canonical",
                        http.method = %method,
                        http.path = %path,
                        http.latency_ms = latency_ms,
                        error.message = %err,
                        "リクエスト処理エラー"
                    );
                }
            }

            result
        })
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use http::{Method, StatusCode};
    use pretty_assertions::assert_eq;
    use tower::{ServiceExt, service_fn};

    use super::*;
    use crate::test_support::capture_json_logs;

    fn request(method: Method, path: &str) -> Request<()> {
        Request::builder().method(method).uri(path).body(()).unwrap()
    }

    /// 指定したステータスを返すだけの Service を Layer で包む
    fn layered_with_status(
        status: StatusCode,
    ) -> impl Service<Request<()>, Response = Response<()>, Error = Infallible> {
        CanonicalLogLineLayer.layer(service_fn(move |_req: Request<()>| async move {
            Ok::<_, Infallible>(Response::builder().status(status).body(()).unwrap())
        }))
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_書籍apiのリクエストで1行のcanonicalログが出る() {
        let (_guard, output) = capture_json_logs();

        layered_with_status(StatusCode::NOT_FOUND)
            .oneshot(request(Method::DELETE, "/books/42"))
            .await
            .unwrap();

        let lines = output.lines();
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert_eq!(line["level"], "INFO");
        assert_eq!(line["message"], "リクエスト完了");
        assert_eq!(line["log.type"], "canonical");
        assert_eq!(line["http.method"], "DELETE");
        assert_eq!(line["http.path"], "/books/42");
        assert_eq!(line["http.status_code"], 404);
        assert!(line["http.latency_ms"].is_u64());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_healthパスはログを出さない() {
        let (_guard, output) = capture_json_logs();

        for path in ["/health", "/health/ready"] {
            layered_with_status(StatusCode::OK)
                .oneshot(request(Method::GET, path))
                .await
                .unwrap();
        }

        assert!(output.lines().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_内部serviceのエラーはerrorレベルで出る() {
        let (_guard, output) = capture_json_logs();
        let sut = CanonicalLogLineLayer.layer(service_fn(|_req: Request<()>| async {
            Err::<Response<()>, _>("接続が切れました".to_string())
        }));

        let result = sut.oneshot(request(Method::POST, "/books/")).await;

        assert!(result.is_err());
        let lines = output.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["level"], "ERROR");
        assert_eq!(lines[0]["error.message"], "接続が切れました");
        assert_eq!(lines[0]["http.path"], "/books/");
    }
}
