//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use taskscheduler_core::Config;

/// Bounded-concurrency task scheduler with an HTTP API.
#[derive(Parser, Debug)]
#[command(name = "taskscheduler", version, about)]
pub struct Cli {
    /// Path to the YAML config file. Defaults apply if it does not exist.
    #[arg(long, env = "TASKSCHED_CONFIG", default_value = "config.yaml")]
    pub config: PathBuf,

    /// Listen port (overrides `server.port`).
    #[arg(long)]
    pub port: Option<u16>,

    /// Concurrency limit (overrides `scheduler.max_concurrent_tasks`).
    #[arg(long)]
    pub max_concurrent_tasks: Option<usize>,
}

impl Cli {
    /// Apply flag overrides on top of the loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(limit) = self.max_concurrent_tasks {
            config.scheduler.max_concurrent_tasks = limit;
        }
    }
}
