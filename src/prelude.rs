//! # Prelude
//!
//! Re-exports commonly used types and traits for convenience.
//!
//! ## Usage
//!
//! ```rust
//! use etcdproxy_controller::prelude::*;
//! ```
//!
//! This brings into scope:
//! - CRD types (EtcdProxy, EtcdProxySpec, NamespacedName)
//! - Boundary traits (StateStore, CredentialIssuer)
//! - Reconciler types (Reconciler, ReconcilerError, ReconcileOutcome)
//! - Config types (ControllerConfig, ServerConfig, ProxyTemplate)

// CRD types - most commonly used
pub use crate::crd::*;

// Boundary traits - implemented by the Kubernetes-backed store and by issuers
pub use crate::controller::credentials::{CredentialIssuer, IssuedCredential, PlaceholderIssuer};
pub use crate::controller::store::{KubeStateStore, StateStore};

// Dependent objects
pub use crate::controller::resources::{DependentKind, DependentObject};

// Reconciler types - core controller functionality
pub use crate::controller::reconciler::{
    reconcile, reconcile_proxy, BackoffState, ReconcileOutcome, Reconciler, ReconcilerError,
};

// Config types - for configuration management
pub use crate::config::{ControllerConfig, ProxyTemplate, ServerConfig};
