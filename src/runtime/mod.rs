//! # Runtime
//!
//! Process bootstrap and the watch loop around the reconciler.
//!
//! - `initialization`: tracing, metrics, HTTP server and client setup
//! - `watch_loop`: the kube-runtime controller and its restart loop
//! - `error_policy`: per-resource requeue backoff after failed passes

pub mod error_policy;
pub mod initialization;
pub mod watch_loop;
