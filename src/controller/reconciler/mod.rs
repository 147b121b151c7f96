//! # Reconciler
//!
//! Drives an `EtcdProxy` towards its owned client Secret, Service and
//! Deployment, creating at most one missing object per pass.
//!
//! - `types`: Reconciler context, errors and pass outcomes
//! - `reconcile`: the reconciliation pass
//! - `validation`: duration parsing for the certificate lifetime fields

pub mod reconcile;
pub mod types;
pub mod validation;

pub use reconcile::{reconcile, reconcile_proxy, resource_key};
pub use types::{BackoffState, ReconcileOutcome, Reconciler, ReconcilerError};
