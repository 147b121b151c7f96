//! # Dependent Objects
//!
//! Builders for the objects an `EtcdProxy` owns, plus the types the reconciler
//! and the state store use to talk about them.
//!
//! Every builder is a pure function: the same inputs always produce the same
//! object. Nothing here talks to the API server.
//!
//! - `secret.rs` - client certificate Secret (`kubernetes.io/tls`)
//! - `service.rs` - Service exposing the proxy on port 2379
//! - `deployment.rs` - Deployment running `etcd grpc-proxy start`

mod deployment;
mod secret;
mod service;

pub use deployment::build_deployment;
pub use secret::build_client_secret;
pub use service::build_service;

use crate::constants::{MANAGED_BY_LABEL_KEY, MANAGED_BY_LABEL_VALUE};
use crate::crd::{EtcdProxy, NamespacedName};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Secret, Service};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, OwnerReference};
use kube::{Resource, ResourceExt};
use std::collections::BTreeMap;
use std::fmt;

/// The kinds of object owned by an `EtcdProxy`, in the order they are created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependentKind {
    ClientSecret,
    Service,
    Deployment,
}

impl DependentKind {
    /// Probe and creation order. The Deployment mounts the Secret and is
    /// reached through the Service, so it comes last.
    pub const ORDERED: [DependentKind; 3] = [
        DependentKind::ClientSecret,
        DependentKind::Service,
        DependentKind::Deployment,
    ];

    /// Label value used in metrics and logs
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DependentKind::ClientSecret => "secret",
            DependentKind::Service => "service",
            DependentKind::Deployment => "deployment",
        }
    }

    /// Where this dependent lives for the given proxy
    pub fn key_for(&self, proxy: &EtcdProxy) -> NamespacedName {
        match self {
            DependentKind::ClientSecret => proxy.client_secret_key(),
            DependentKind::Service => proxy.service_key(),
            DependentKind::Deployment => proxy.deployment_key(),
        }
    }
}

impl fmt::Display for DependentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully built dependent object, ready to be created
#[derive(Debug, Clone, PartialEq)]
pub enum DependentObject {
    ClientSecret(Secret),
    Service(Service),
    Deployment(Deployment),
}

impl DependentObject {
    pub fn kind(&self) -> DependentKind {
        match self {
            DependentObject::ClientSecret(_) => DependentKind::ClientSecret,
            DependentObject::Service(_) => DependentKind::Service,
            DependentObject::Deployment(_) => DependentKind::Deployment,
        }
    }

    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            DependentObject::ClientSecret(secret) => &secret.metadata,
            DependentObject::Service(service) => &service.metadata,
            DependentObject::Deployment(deployment) => &deployment.metadata,
        }
    }

    /// Namespace and name taken from the object metadata
    pub fn key(&self) -> NamespacedName {
        let metadata = self.metadata();
        NamespacedName::new(
            metadata.namespace.clone().unwrap_or_default(),
            metadata.name.clone().unwrap_or_default(),
        )
    }
}

/// Controller owner reference pointing back at the proxy.
///
/// Deleting the proxy lets the API server garbage-collect every object that
/// carries this reference; the controller never deletes anything itself.
pub fn owner_reference(proxy: &EtcdProxy) -> OwnerReference {
    OwnerReference {
        api_version: EtcdProxy::api_version(&()).into_owned(),
        kind: EtcdProxy::kind(&()).into_owned(),
        name: proxy.name_any(),
        uid: proxy.uid().unwrap_or_default(),
        controller: Some(true),
        block_owner_deletion: Some(true),
    }
}

/// Labels put on the metadata of every dependent
pub fn managed_labels() -> BTreeMap<String, String> {
    BTreeMap::from([(
        MANAGED_BY_LABEL_KEY.to_string(),
        MANAGED_BY_LABEL_VALUE.to_string(),
    )])
}

fn dependent_metadata(proxy: &EtcdProxy, key: &NamespacedName) -> ObjectMeta {
    ObjectMeta {
        name: Some(key.name.clone()),
        namespace: Some(key.namespace.clone()),
        labels: Some(managed_labels()),
        owner_references: Some(vec![owner_reference(proxy)]),
        ..Default::default()
    }
}

/// `--key=value`
fn flag(key: &str, value: &str) -> String {
    format!("--{key}={value}")
}


#[cfg(test)]
mod tests {
    use super::test_support::team_a;
    use super::*;

    #[test]
    fn test_owner_reference_points_at_proxy() {
        let owner = owner_reference(&team_a());
        assert_eq!(owner.api_version, "etcd.camelcasenotation.io/v1alpha1");
        assert_eq!(owner.kind, "EtcdProxy");
        assert_eq!(owner.name, "team-a");
        assert_eq!(owner.uid, "6a1f0c7e-0000-4000-8000-000000000001");
        assert_eq!(owner.controller, Some(true));
        assert_eq!(owner.block_owner_deletion, Some(true));
    }

    #[test]
    fn test_kind_order_is_secret_service_deployment() {
        assert_eq!(
            DependentKind::ORDERED,
            [
                DependentKind::ClientSecret,
                DependentKind::Service,
                DependentKind::Deployment
            ]
        );
    }

    #[test]
    fn test_key_for_each_kind() {
        let proxy = team_a();
        assert_eq!(
            DependentKind::ClientSecret.key_for(&proxy),
            NamespacedName::new("ns1", "team-a-client")
        );
        assert_eq!(
            DependentKind::Service.key_for(&proxy),
            NamespacedName::new("ns1", "etcd-team-a")
        );
        assert_eq!(
            DependentKind::Deployment.key_for(&proxy),
            NamespacedName::new("ns1", "etcd-team-a")
        );
    }

    #[test]
    fn test_flag_format() {
        assert_eq!(flag("namespace", "/team-a"), "--namespace=/team-a");
    }
}
