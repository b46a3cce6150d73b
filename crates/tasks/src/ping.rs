//! TCP reachability probe.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::net::TcpStream;

use taskscheduler_scheduler::{Work, WorkError};

use crate::settings::ProbeSettings;

/// Opens (and immediately closes) a TCP connection to `address:port`.
#[derive(Debug, Clone)]
pub struct PingTask {
    address: String,
    port: u16,
    timeout: Duration,
}

impl PingTask {
    pub fn new(address: impl Into<String>, settings: &ProbeSettings) -> Self {
        Self {
            address: address.into(),
            port: settings.ping_port,
            timeout: settings.timeout,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// `host:port`, bracketing bare IPv6 literals.
    pub fn target(&self) -> String {
        if self.address.contains(':') && !self.address.starts_with('[') {
            format!("[{}]:{}", self.address, self.port)
        } else {
            format!("{}:{}", self.address, self.port)
        }
    }
}

#[async_trait]
impl Work for PingTask {
    fn name(&self) -> &str {
        "ping"
    }

    async fn run(&self) -> Result<String, WorkError> {
        let target = self.target();
        let start = Instant::now();
        let connected = tokio::time::timeout(self.timeout, TcpStream::connect(&target)).await;
        let elapsed = start.elapsed();

        match connected {
            Ok(Ok(stream)) => {
                drop(stream);
                tracing::debug!(%target, ?elapsed, "ping connected");
                Ok(format!("ping {} success, time: {:?}", self.address, elapsed))
            }
            Ok(Err(e)) => Err(WorkError::new(format!("ping {} failed: {}", self.address, e))),
            Err(_) => Err(WorkError::new(format!(
                "ping {} failed: timed out after {:?}",
                self.address, self.timeout
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::net::TcpListener;

    use super::*;

    fn settings(port: u16) -> ProbeSettings {
        ProbeSettings {
            timeout: Duration::from_secs(2),
            ping_port: port,
        }
    }

    #[tokio::test]
    async fn ping_success() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let accept = tokio::spawn(async move { listener.accept().await.map(|_| ()) });

        let task = PingTask::new("127.0.0.1", &settings(port));
        let result = task.run().await.unwrap();
        assert!(result.starts_with("ping 127.0.0.1 success, time: "), "unexpected result: {result}");
        accept.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn ping_refused_is_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = PingTask::new("127.0.0.1", &settings(port)).run().await.unwrap_err();
        assert!(err.reason().starts_with("ping 127.0.0.1 failed: "), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn ping_unresolvable_host_is_failure() {
        let err = PingTask::new("nonexistent.domain.invalid", &settings(80))
            .run()
            .await
            .unwrap_err();
        assert!(err.reason().starts_with("ping nonexistent.domain.invalid failed"), "{err}");
    }

    #[test]
    fn target_formats() {
        let s = settings(80);
        assert_eq!(PingTask::new("example.com", &s).target(), "example.com:80");
        assert_eq!(PingTask::new("10.0.0.1", &s).target(), "10.0.0.1:80");
        assert_eq!(PingTask::new("::1", &s).target(), "[::1]:80");
        assert_eq!(PingTask::new("[::1]", &s).target(), "[::1]:80");
    }
}
