//! # Configuration
//!
//! Process-level configuration, read once from the environment at startup.
//!
//! - `controller` - backoff, concurrency and logging settings
//! - `server` - metrics/probe HTTP server settings
//! - `proxy` - static settings of the proxy workload

pub mod controller;
pub mod proxy;
pub mod server;

pub use controller::ControllerConfig;
pub use proxy::ProxyTemplate;
pub use server::ServerConfig;
