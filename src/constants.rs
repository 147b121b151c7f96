//! # Constants
//!
//! Shared constants used throughout the controller.
//!
//! Values under "defaults" can be overridden through environment variables,
//! see [`crate::config`]. The protocol constants describe the proxy workload
//! and are part of the contract with clients of the Service.

// Defaults

/// Default HTTP server port for metrics and health probes
pub const DEFAULT_METRICS_PORT: u16 = 8080;

/// Default HTTP server startup timeout (how long to wait for server to be ready)
pub const DEFAULT_SERVER_STARTUP_TIMEOUT_SECS: u64 = 10;

/// Default HTTP server readiness poll interval
pub const DEFAULT_SERVER_POLL_INTERVAL_MS: u64 = 50;

/// Smallest delay used by the error backoff (seconds)
pub const DEFAULT_BACKOFF_MIN_SECS: u64 = 5;

/// Largest delay used by the error backoff (seconds)
pub const DEFAULT_BACKOFF_MAX_SECS: u64 = 300;

/// Upper bound on reconciliations running at the same time
pub const DEFAULT_MAX_CONCURRENT_RECONCILIATIONS: u16 = 10;

/// Delay before restarting the watch stream after it ends (seconds)
pub const DEFAULT_WATCH_RESTART_DELAY_SECS: u64 = 1;

/// Lifetime applied to a certificate when its duration field is not set
pub const DEFAULT_CERT_DURATION: &str = "8760h";

/// Go `time.ParseDuration` grammar plus `d` for days, without a sign.
/// Enforced by the CRD schema and by the duration parser.
pub const CERT_DURATION_PATTERN: &str =
    r"^\+?(?:0|(?:(?:\d+(?:\.\d*)?|\.\d+)(?:ns|us|µs|μs|ms|s|m|h|d))+)$";

// Proxy workload

/// Port the proxy listens on, and the port exposed by the Service
pub const PROXY_PORT: i32 = 2379;

/// Name of the container port
pub const PROXY_PORT_NAME: &str = "etcd";

/// Address handed to `--listen-addr`
pub const PROXY_LISTEN_ADDR: &str = "0.0.0.0:2379";

/// Name of the proxy container inside the pod
pub const PROXY_CONTAINER_NAME: &str = "etcdproxy";

/// Default proxy image
pub const DEFAULT_PROXY_IMAGE: &str = "quay.io/coreos/etcd:v3.3.18";

/// Default path of the etcd binary inside the image
pub const DEFAULT_PROXY_BINARY: &str = "/usr/local/bin/etcd";

/// Where the backend TLS Secret is mounted inside the proxy container
pub const BACKEND_CERT_MOUNT_PATH: &str = "/certs/etcd/server";

/// Prefix of the Service and Deployment names (`etcd-<name>`)
pub const DEPENDENT_NAME_PREFIX: &str = "etcd-";

// Labels

/// Pod label carrying the owning EtcdProxy name.
/// Used for both the Deployment pod labels and the Service selector.
pub const PROXY_LABEL_KEY: &str = "etcdproxy";

/// Label put on every object this controller creates
pub const MANAGED_BY_LABEL_KEY: &str = "app.kubernetes.io/managed-by";

/// Value of [`MANAGED_BY_LABEL_KEY`]
pub const MANAGED_BY_LABEL_VALUE: &str = "etcdproxy-controller";

/// Field manager recorded on create requests
pub const FIELD_MANAGER: &str = "etcdproxy-controller";

// TLS Secret keys (kubernetes.io/tls)

pub const TLS_SECRET_TYPE: &str = "kubernetes.io/tls";
pub const TLS_CERT_KEY: &str = "tls.crt";
pub const TLS_PRIVATE_KEY_KEY: &str = "tls.key";
