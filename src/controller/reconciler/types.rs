//! # Types
//!
//! Core types for the reconciler.

use crate::config::{ControllerConfig, ProxyTemplate};
use crate::controller::backoff::FibonacciBackoff;
use crate::controller::credentials::CredentialIssuer;
use crate::controller::resources::DependentKind;
use crate::controller::store::StateStore;
use crate::crd::NamespacedName;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcilerError {
    #[error("Failed to read EtcdProxy {name}: {source}")]
    ProxyLookup {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to read {kind} {key}: {source}")]
    DependentLookup {
        kind: DependentKind,
        key: NamespacedName,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to create {kind} {key}: {source}")]
    DependentCreate {
        kind: DependentKind,
        key: NamespacedName,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to issue client credential for {key}: {source}")]
    CredentialIssue {
        key: NamespacedName,
        #[source]
        source: anyhow::Error,
    },

    #[error("Invalid EtcdProxy {name}: {source}")]
    InvalidSpec {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Result of a single reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The EtcdProxy no longer exists; owned objects are left to garbage collection
    ProxyGone,
    /// One missing dependent was created
    Created {
        kind: DependentKind,
        key: NamespacedName,
    },
    /// Every dependent already exists
    Converged,
}

/// Backoff state for a specific resource
/// Tracks error count and backoff calculator for progressive retries
#[derive(Debug, Clone)]
pub struct BackoffState {
    pub backoff: FibonacciBackoff,
    pub error_count: u32,
}

impl BackoffState {
    pub fn new(min_secs: u64, max_secs: u64) -> Self {
        Self {
            backoff: FibonacciBackoff::new(min_secs, max_secs),
            error_count: 0,
        }
    }

    pub fn increment_error(&mut self) {
        self.error_count += 1;
    }
}

#[derive(Clone)]
pub struct Reconciler {
    pub store: Arc<dyn StateStore>,
    pub issuer: Arc<dyn CredentialIssuer>,
    pub template: ProxyTemplate,
    pub backoff_min_secs: u64,
    pub backoff_max_secs: u64,
    // Backoff state per resource (identified by "/name", the proxy is cluster scoped)
    // Only touched from the error policy and after a successful pass, never across an await
    pub backoff_states: Arc<Mutex<HashMap<String, BackoffState>>>,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("template", &self.template)
            .field("backoff_min_secs", &self.backoff_min_secs)
            .field("backoff_max_secs", &self.backoff_max_secs)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    pub fn new(
        store: Arc<dyn StateStore>,
        issuer: Arc<dyn CredentialIssuer>,
        template: ProxyTemplate,
        config: &ControllerConfig,
    ) -> Self {
        Self {
            store,
            issuer,
            template,
            backoff_min_secs: config.backoff_min_secs,
            backoff_max_secs: config.backoff_max_secs,
            backoff_states: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record a failed pass and return the next delay in seconds with the error count
    pub fn record_failure(&self, resource_key: &str) -> Option<(u64, u32)> {
        let mut states = self.backoff_states.lock().ok()?;
        let state = states
            .entry(resource_key.to_string())
            .or_insert_with(|| BackoffState::new(self.backoff_min_secs, self.backoff_max_secs));
        state.increment_error();
        Some((state.backoff.next_backoff_seconds(), state.error_count))
    }

    /// Forget the backoff state of a resource after a successful pass
    pub fn reset_backoff(&self, resource_key: &str) {
        match self.backoff_states.lock() {
            Ok(mut states) => {
                states.remove(resource_key);
            }
            Err(e) => {
                tracing::warn!("Failed to lock backoff_states: {}", e);
            }
        }
    }
}
