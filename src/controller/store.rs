//! # State Store
//!
//! The reconciler's only view of the cluster. A store can read the `EtcdProxy`
//! resource, read a dependent and create a dependent. It has no update and no
//! delete: dependents are created once and removed by the API server's
//! garbage collector through their owner references.
//!
//! Lookups return `Ok(None)` for "not found". Every other failure is an error.

use crate::constants::FIELD_MANAGER;
use crate::controller::resources::{DependentKind, DependentObject};
use crate::crd::{EtcdProxy, NamespacedName};
use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Secret, Service};
use kube::api::{Api, PostParams};
use kube::Client;

/// Read/create access to the objects the reconciler works with
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Get the `EtcdProxy` with the given name
    async fn get_proxy(&self, name: &str) -> Result<Option<EtcdProxy>>;

    /// Get a dependent object by kind and identity
    async fn get_dependent(
        &self,
        kind: DependentKind,
        key: &NamespacedName,
    ) -> Result<Option<DependentObject>>;

    /// Create a dependent object in the namespace recorded in its metadata
    async fn create_dependent(&self, object: &DependentObject) -> Result<()>;
}

/// [`StateStore`] backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeStateStore {
    client: Client,
}

impl std::fmt::Debug for KubeStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeStateStore").finish_non_exhaustive()
    }
}

impl KubeStateStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn post_params() -> PostParams {
        PostParams {
            field_manager: Some(FIELD_MANAGER.to_string()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl StateStore for KubeStateStore {
    async fn get_proxy(&self, name: &str) -> Result<Option<EtcdProxy>> {
        let api: Api<EtcdProxy> = Api::all(self.client.clone());
        api.get_opt(name)
            .await
            .with_context(|| format!("Failed to get EtcdProxy {name}"))
    }

    async fn get_dependent(
        &self,
        kind: DependentKind,
        key: &NamespacedName,
    ) -> Result<Option<DependentObject>> {
        let object = match kind {
            DependentKind::ClientSecret => {
                let api: Api<Secret> = Api::namespaced(self.client.clone(), &key.namespace);
                api.get_opt(&key.name)
                    .await
                    .with_context(|| format!("Failed to get {kind} {key}"))?
                    .map(DependentObject::ClientSecret)
            }
            DependentKind::Service => {
                let api: Api<Service> = Api::namespaced(self.client.clone(), &key.namespace);
                api.get_opt(&key.name)
                    .await
                    .with_context(|| format!("Failed to get {kind} {key}"))?
                    .map(DependentObject::Service)
            }
            DependentKind::Deployment => {
                let api: Api<Deployment> = Api::namespaced(self.client.clone(), &key.namespace);
                api.get_opt(&key.name)
                    .await
                    .with_context(|| format!("Failed to get {kind} {key}"))?
                    .map(DependentObject::Deployment)
            }
        };
        Ok(object)
    }

    async fn create_dependent(&self, object: &DependentObject) -> Result<()> {
        let kind = object.kind();
        let key = object.key();
        if key.namespace.is_empty() {
            anyhow::bail!("{} {} has no namespace", kind, key.name);
        }
        let params = Self::post_params();
        match object {
            DependentObject::ClientSecret(secret) => {
                let api: Api<Secret> = Api::namespaced(self.client.clone(), &key.namespace);
                api.create(&params, secret)
                    .await
                    .with_context(|| format!("Failed to create {kind} {key}"))?;
            }
            DependentObject::Service(service) => {
                let api: Api<Service> = Api::namespaced(self.client.clone(), &key.namespace);
                api.create(&params, service)
                    .await
                    .with_context(|| format!("Failed to create {kind} {key}"))?;
            }
            DependentObject::Deployment(deployment) => {
                let api: Api<Deployment> = Api::namespaced(self.client.clone(), &key.namespace);
                api.create(&params, deployment)
                    .await
                    .with_context(|| format!("Failed to create {kind} {key}"))?;
            }
        }
        Ok(())
    }
}
