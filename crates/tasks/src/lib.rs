//! Concrete work items: network reachability probes.
//!
//! - [`PingTask`]: TCP connect to `address:port`, reporting elapsed time
//! - [`HttpStatusTask`]: HTTP GET, failing on status >= 400
//!
//! Each probe enforces its own deadline from [`ProbeSettings`]; the scheduler
//! never interrupts a running item.

pub mod http;
pub mod ping;
pub mod settings;

pub use http::HttpStatusTask;
pub use ping::PingTask;
pub use settings::ProbeSettings;
