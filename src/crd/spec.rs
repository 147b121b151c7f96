//! # EtcdProxy Spec
//!
//! Main CRD types, default values and the derived identities
//! of the objects created for each resource.

use crate::constants::{
    CERT_DURATION_PATTERN, DEFAULT_CERT_DURATION, DEPENDENT_NAME_PREFIX, PROXY_LABEL_KEY,
};
use crate::crd::NamespacedName;
use kube::ResourceExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// EtcdProxy Custom Resource Definition
///
/// Declares an etcd gRPC proxy in front of one or more etcd servers. The
/// controller creates a client TLS Secret, a Service and a Deployment for each
/// resource and owns all three.
///
/// # Example
///
/// ```yaml
/// apiVersion: etcd.camelcasenotation.io/v1alpha1
/// kind: EtcdProxy
/// metadata:
///   name: team-a
/// spec:
///   replicas: 2
///   etcdServers:
///     - https://etcd-0:2379
///   etcdCertSecretRef:
///     namespace: ns1
///     name: etcd-certs
///   clientCertSecret:
///     namespace: ns1
///     name: team-a-client
///   signingCertDuration: 8760h
///   servingCertDuration: 8760h
///   clientCertDuration: 8760h
/// ```
#[derive(kube::CustomResource, Debug, Clone, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "EtcdProxy",
    group = "etcd.camelcasenotation.io",
    version = "v1alpha1",
    plural = "etcdproxies",
    shortname = "ep",
    status = "crate::crd::EtcdProxyStatus",
    printcolumn = r#"{"name":"Replicas", "type":"integer", "jsonPath":".spec.replicas"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct EtcdProxySpec {
    /// Number of replicas in the Deployment created for this resource.
    /// When unset the Deployment default applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
    /// etcd endpoints the proxy forwards to, in order
    pub etcd_servers: Vec<String>,
    /// Secret holding the CA, certificate and key used to talk to `etcdServers`.
    /// Its namespace is also where the Service and Deployment are created.
    pub etcd_cert_secret_ref: NamespacedName,
    /// Where the client certificate and key for the proxy are written
    pub client_cert_secret: NamespacedName,
    /// How long the self-generated signing certificate is valid (e.g. "8760h")
    #[serde(default = "default_cert_duration")]
    #[schemars(regex(pattern = CERT_DURATION_PATTERN))]
    pub signing_cert_duration: String,
    /// How long the serving certificate/key pair is valid
    #[serde(default = "default_cert_duration")]
    #[schemars(regex(pattern = CERT_DURATION_PATTERN))]
    pub serving_cert_duration: String,
    /// How long the client certificate/key pair is valid
    #[serde(default = "default_cert_duration")]
    #[schemars(regex(pattern = CERT_DURATION_PATTERN))]
    pub client_cert_duration: String,
}

/// Default value for the certificate duration fields
pub fn default_cert_duration() -> String {
    DEFAULT_CERT_DURATION.to_string()
}

impl EtcdProxy {
    /// Namespace of the Service and Deployment.
    ///
    /// The resource is cluster-scoped, so the namespace is taken from the
    /// backend certificate Secret the proxy must mount.
    pub fn dependent_namespace(&self) -> &str {
        &self.spec.etcd_cert_secret_ref.namespace
    }

    /// `etcd-<name>`, shared by the Service and the Deployment
    pub fn dependent_name(&self) -> String {
        format!("{DEPENDENT_NAME_PREFIX}{}", self.name_any())
    }

    /// Identity of the client certificate Secret
    pub fn client_secret_key(&self) -> NamespacedName {
        self.spec.client_cert_secret.clone()
    }

    /// Identity of the Service
    pub fn service_key(&self) -> NamespacedName {
        NamespacedName::new(self.dependent_namespace(), self.dependent_name())
    }

    /// Identity of the Deployment
    pub fn deployment_key(&self) -> NamespacedName {
        NamespacedName::new(self.dependent_namespace(), self.dependent_name())
    }

    /// Labels put on proxy pods and used by the Service to select them
    pub fn selector_labels(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(PROXY_LABEL_KEY.to_string(), self.name_any())])
    }

    /// etcd key prefix the proxy confines clients to (`/<name>`)
    pub fn key_namespace(&self) -> String {
        format!("/{}", self.name_any())
    }
}
