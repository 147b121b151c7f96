//! EtcdProxy Controller Library
//!
//! Runs etcd gRPC proxies declared by cluster-scoped `EtcdProxy` resources.
//! For each resource the controller creates a client certificate Secret, a
//! Service and a Deployment, all owned by the resource.
//!
//! ## Quick Start
//!
//! ```rust
//! use etcdproxy_controller::prelude::*;
//! ```
//!
//! This brings commonly used types and traits into scope. For more specific imports,
//! use the individual modules.

pub mod config;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod observability;
pub mod prelude;
pub mod runtime;
