use std::time::Duration;

use taskscheduler_core::config::TasksConfig;

/// Shared knobs for every probe built by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    /// Deadline for a single probe, including name resolution.
    pub timeout: Duration,
    /// Port dialled by [`PingTask`](crate::PingTask).
    pub ping_port: u16,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(2),
            ping_port: 80,
        }
    }
}

impl ProbeSettings {
    pub fn from_config(config: &TasksConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.timeout_ms),
            ping_port: config.ping_port,
        }
    }

    /// HTTP client shared by all [`HttpStatusTask`](crate::HttpStatusTask)s
    /// for connection pooling. The per-request timeout is applied by the task.
    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder().connect_timeout(self.timeout).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_config_defaults() {
        assert_eq!(ProbeSettings::from_config(&TasksConfig::default()), ProbeSettings::default());
    }

    #[test]
    fn from_config_converts_millis() {
        let settings = ProbeSettings::from_config(&TasksConfig {
            timeout_ms: 250,
            ping_port: 8443,
        });
        assert_eq!(settings.timeout, Duration::from_millis(250));
        assert_eq!(settings.ping_port, 8443);
    }
}
