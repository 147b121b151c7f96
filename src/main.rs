//! # EtcdProxy Controller
//!
//! A Kubernetes controller that runs etcd gRPC proxies for `EtcdProxy` resources.
//!
//! ## Overview
//!
//! For every `EtcdProxy` the controller makes sure three objects exist:
//!
//! 1. **Client certificate Secret** - a `kubernetes.io/tls` Secret at `spec.clientCertSecret`
//! 2. **Service** - `etcd-<name>`, port 2379, selecting the proxy pods
//! 3. **Deployment** - `etcd-<name>`, running `etcd grpc-proxy start` against `spec.etcdServers`
//!
//! All three are owned by the `EtcdProxy`; deleting it lets the API server
//! garbage-collect them.
//!
//! ## Features
//!
//! - **Prometheus metrics**: Exposes metrics for monitoring and observability
//! - **Health probes**: HTTP endpoints for liveness and readiness checks
//! - **Backoff**: failed reconciliations are retried with per-resource Fibonacci backoff

use anyhow::Result;
use etcdproxy_controller::runtime::initialization::initialize;
use etcdproxy_controller::runtime::watch_loop::run_watch_loop;

#[tokio::main]
async fn main() -> Result<()> {
    let init = initialize().await?;

    run_watch_loop(
        init.client,
        init.reconciler,
        init.server_state,
        init.controller_config,
    )
    .await
}
