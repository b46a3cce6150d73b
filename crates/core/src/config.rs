use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Prefix for every environment override key.
const ENV_PREFIX: &str = "TASKSCHED";

fn env_opt(key: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{key}"))
        .ok()
        .filter(|s| !s.is_empty())
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub scheduler: SchedulerConfig,
    pub worker: WorkerConfig,
    pub tasks: TasksConfig,
}

impl Config {
    /// Parse a YAML document. Missing sections and fields take their defaults.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Read and parse a YAML config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Load the config for a service start: `.env`, then the YAML file (defaults
    /// if it does not exist), then `TASKSCHED_*` env overrides, then validation.
    ///
    /// Runs before the subscriber is installed, so it does not log; callers
    /// report a missing file once logging is up.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_dotenv();
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_overrides(env_opt)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (`HOST`, `PORT`, ...). The lookup is
    /// injected so tests can exercise overrides without touching the process env.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_field("server.port", &port)?;
        }
        if let Some(limit) = lookup("MAX_CONCURRENT_TASKS") {
            self.scheduler.max_concurrent_tasks =
                parse_field("scheduler.max_concurrent_tasks", &limit)?;
        }
        if let Some(dir) = lookup("LOG_DIR") {
            self.logging.path = PathBuf::from(dir);
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(sites) = lookup("PING_SITES") {
            self.worker.ping_sites = sites
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "server.timeout_secs",
                reason: "must be greater than 0".into(),
            });
        }
        if self.scheduler.max_concurrent_tasks == 0 {
            return Err(ConfigError::Invalid {
                field: "scheduler.max_concurrent_tasks",
                reason: "must be at least 1".into(),
            });
        }
        if self.worker.interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "worker.interval_ms",
                reason: "must be greater than 0".into(),
            });
        }
        if self.tasks.timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "tasks.timeout_ms",
                reason: "must be greater than 0".into(),
            });
        }
        Ok(())
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  server:     {}:{} (timeout {}s)", self.server.host, self.server.port, self.server.timeout_secs);
        tracing::info!("  logging:    path={}, level={}, file={}", self.logging.path.display(), self.logging.level, self.logging.file);
        tracing::info!("  scheduler:  max_concurrent_tasks={}", self.scheduler.max_concurrent_tasks);
        tracing::info!("  worker:     {} ping sites every {}ms", self.worker.ping_sites.len(), self.worker.interval_ms);
        tracing::info!("  tasks:      timeout={}ms, ping_port={}", self.tasks.timeout_ms, self.tasks.ping_port);
    }
}

fn parse_field<T: std::str::FromStr>(field: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        field,
        reason: format!("{raw:?}: {e}"),
    })
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            timeout_secs: 10,
        }
    }
}

// ── Logging ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for the daily log files.
    pub path: PathBuf,
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// Write a log file in addition to stdout.
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("logs"),
            level: "info".into(),
            file: true,
        }
    }
}

// ── Scheduler ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub max_concurrent_tasks: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_tasks: 5,
        }
    }
}

// ── Periodic ping worker ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub ping_sites: Vec<String>,
    pub interval_ms: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            ping_sites: Vec::new(),
            interval_ms: 1000,
        }
    }
}

// ── Task bodies ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TasksConfig {
    /// Network deadline applied inside each probe.
    pub timeout_ms: u64,
    /// TCP port dialled by ping tasks.
    pub ping_port: u16,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 2000,
            ping_port: 80,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    const FULL_YAML: &str = r#"
server:
  port: 8080
logging:
  path: "logs"
scheduler:
  max_concurrent_tasks: 5
worker:
  ping_sites:
    - "google.com"
    - "yahoo.com"
"#;

    #[test]
    fn parses_full_document() {
        let cfg = Config::from_yaml(FULL_YAML).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.logging.path, PathBuf::from("logs"));
        assert_eq!(cfg.scheduler.max_concurrent_tasks, 5);
        assert_eq!(cfg.worker.ping_sites, vec!["google.com", "yahoo.com"]);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let cfg = Config::from_yaml("scheduler:\n  max_concurrent_tasks: 3\n").unwrap();
        assert_eq!(cfg.scheduler.max_concurrent_tasks, 3);
        assert_eq!(cfg.server, ServerConfig::default());
        assert_eq!(cfg.worker.interval_ms, 1000);
        assert_eq!(cfg.tasks.timeout_ms, 2000);
        assert_eq!(cfg.tasks.ping_port, 80);
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let err = Config::from_yaml("server: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn from_file_reads_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL_YAML.as_bytes()).unwrap();
        let cfg = Config::from_file(file.path()).unwrap();
        assert_eq!(cfg.worker.ping_sites.len(), 2);
    }

    #[test]
    fn from_file_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn load_falls_back_to_defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(dir.path().join("absent.yaml")).unwrap();
        assert!(cfg.scheduler.max_concurrent_tasks >= 1);
    }

    #[test]
    fn overrides_replace_values() {
        let vars = HashMap::from([
            ("PORT", "9090"),
            ("MAX_CONCURRENT_TASKS", "12"),
            ("PING_SITES", "a.example, b.example,,"),
            ("LOG_LEVEL", "debug"),
        ]);
        let mut cfg = Config::default();
        cfg.apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.scheduler.max_concurrent_tasks, 12);
        assert_eq!(cfg.worker.ping_sites, vec!["a.example", "b.example"]);
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.server.host, "0.0.0.0");
    }

    #[test]
    fn override_with_bad_number_is_rejected() {
        let mut cfg = Config::default();
        let err = cfg
            .apply_overrides(|k| (k == "PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "server.port", .. }));
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let mut cfg = Config::default();
        cfg.scheduler.max_concurrent_tasks = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("max_concurrent_tasks"));
    }

    #[test]
    fn validate_rejects_zero_interval_and_timeout() {
        let mut cfg = Config::default();
        cfg.worker.interval_ms = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.tasks.timeout_ms = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.server.timeout_secs = 0;
        assert!(cfg.validate().is_err());

        assert!(Config::default().validate().is_ok());
    }
}
