//! # Custom Resource Definitions
//!
//! CRD types for the EtcdProxy Controller.
//!
//! ## Module Structure
//!
//! - `spec.rs` - The `EtcdProxy` resource, its spec and the derived identities of its dependents
//! - `reference.rs` - `NamespacedName`, used for Secret references and object identities
//! - `status.rs` - Status type (currently empty)

mod reference;
mod spec;
mod status;

pub use reference::NamespacedName;
pub use spec::{default_cert_duration, EtcdProxy, EtcdProxySpec};
pub use status::EtcdProxyStatus;
