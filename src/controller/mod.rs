//! # Controller
//!
//! Core controller modules for the EtcdProxy controller.
//!
//! - `backoff`: Fibonacci backoff for failed reconciliations
//! - `credentials`: client certificate issuance seam
//! - `reconciler`: Core reconciliation logic
//! - `resources`: builders for the objects owned by an EtcdProxy
//! - `server`: HTTP server for metrics and health checks
//! - `store`: read/create access to the cluster

pub mod backoff;
pub mod credentials;
pub mod reconciler;
pub mod resources;
pub mod server;
pub mod store;
