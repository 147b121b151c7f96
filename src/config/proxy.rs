//! # Proxy Template
//!
//! Static settings of the proxy workload, built once at startup and handed to
//! the reconciler. Everything per-resource comes from the `EtcdProxy` spec;
//! everything here is the same for every proxy the controller runs.

use crate::constants::{
    BACKEND_CERT_MOUNT_PATH, DEFAULT_PROXY_BINARY, DEFAULT_PROXY_IMAGE, PROXY_LISTEN_ADDR,
    PROXY_PORT,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyTemplate {
    /// Container image providing the etcd binary
    pub image: String,
    /// Path of the etcd binary inside the image
    pub binary: String,
    /// Value of `--listen-addr`
    pub listen_addr: String,
    /// Container port, also the Service port
    pub port: i32,
    /// Mount path of the backend certificate Secret
    pub cert_mount_path: String,
}

impl Default for ProxyTemplate {
    fn default() -> Self {
        Self {
            image: DEFAULT_PROXY_IMAGE.to_string(),
            binary: DEFAULT_PROXY_BINARY.to_string(),
            listen_addr: PROXY_LISTEN_ADDR.to_string(),
            port: PROXY_PORT,
            cert_mount_path: BACKEND_CERT_MOUNT_PATH.to_string(),
        }
    }
}

impl ProxyTemplate {
    /// Load the template, allowing `PROXY_IMAGE` and `PROXY_BINARY` overrides
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            image: lookup("PROXY_IMAGE")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.image),
            binary: lookup("PROXY_BINARY")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.binary),
            ..defaults
        }
    }

    /// Command line prefix: `<binary> grpc-proxy start`
    pub fn command(&self) -> Vec<String> {
        vec![
            self.binary.clone(),
            "grpc-proxy".to_string(),
            "start".to_string(),
        ]
    }

    /// Path of a file inside the mounted backend certificate Secret
    pub fn cert_file(&self, file: &str) -> String {
        format!("{}/{file}", self.cert_mount_path.trim_end_matches('/'))
    }
}
