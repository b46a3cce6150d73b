//! HTTP status probe.

use std::time::{Duration, Instant};

use async_trait::async_trait;

use taskscheduler_scheduler::{Work, WorkError};

use crate::settings::ProbeSettings;

/// Issues `GET url` and reports the status code; status >= 400 is a failure.
#[derive(Debug, Clone)]
pub struct HttpStatusTask {
    url: String,
    timeout: Duration,
    /// Shared client (connection pooling).
    client: reqwest::Client,
}

impl HttpStatusTask {
    pub fn new(url: impl Into<String>, client: reqwest::Client, settings: &ProbeSettings) -> Self {
        Self {
            url: url.into(),
            timeout: settings.timeout,
            client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Work for HttpStatusTask {
    fn name(&self) -> &str {
        "http_get"
    }

    async fn run(&self) -> Result<String, WorkError> {
        let start = Instant::now();
        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| WorkError::new(format!("http get {} failed: {}", self.url, e)))?;
        let elapsed = start.elapsed();
        let status = response.status();

        tracing::debug!(url = %self.url, %status, ?elapsed, "http probe answered");

        if status.is_client_error() || status.is_server_error() {
            return Err(WorkError::new(format!(
                "http get {} returned error status: {}",
                self.url,
                status.as_u16()
            )));
        }

        Ok(format!(
            "http get {} success, status: {}, time: {:?}",
            self.url,
            status.as_u16(),
            elapsed
        ))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use tokio::net::TcpListener;

    use super::*;

    /// Serve a tiny app on an ephemeral port and return its base URL.
    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });
        format!("http://{addr}")
    }

    fn client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    #[tokio::test]
    async fn success_reports_status() {
        let base = serve(Router::new().route("/", get(|| async { "ok" }))).await;
        let task = HttpStatusTask::new(&base, client(), &ProbeSettings::default());

        let result = task.run().await.unwrap();
        assert!(
            result.starts_with(&format!("http get {base} success, status: 200, time: ")),
            "unexpected result: {result}"
        );
    }

    #[tokio::test]
    async fn error_status_is_failure() {
        let app = Router::new().route(
            "/",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "internal error") }),
        );
        let base = serve(app).await;
        let task = HttpStatusTask::new(&base, client(), &ProbeSettings::default());

        let err = task.run().await.unwrap_err();
        assert_eq!(err.reason(), format!("http get {base} returned error status: 500"));
    }

    #[tokio::test]
    async fn not_found_is_failure() {
        let base = serve(Router::new()).await;
        let url = format!("{base}/missing");
        let err = HttpStatusTask::new(&url, client(), &ProbeSettings::default())
            .run()
            .await
            .unwrap_err();
        assert!(err.reason().ends_with("returned error status: 404"), "{err}");
    }

    #[tokio::test]
    async fn connection_error_is_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let url = format!("http://{addr}");

        let err = HttpStatusTask::new(&url, client(), &ProbeSettings::default())
            .run()
            .await
            .unwrap_err();
        assert!(err.reason().starts_with(&format!("http get {url} failed: ")), "{err}");
    }

    #[tokio::test]
    async fn slow_server_hits_timeout() {
        let app = Router::new().route(
            "/",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );
        let base = serve(app).await;
        let settings = ProbeSettings {
            timeout: Duration::from_millis(100),
            ..ProbeSettings::default()
        };

        let err = HttpStatusTask::new(&base, client(), &settings)
            .run()
            .await
            .unwrap_err();
        assert!(err.reason().starts_with(&format!("http get {base} failed: ")), "{err}");
    }
}
