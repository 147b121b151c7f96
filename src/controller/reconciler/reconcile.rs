//! # Reconcile
//!
//! One reconciliation pass for an `EtcdProxy`.
//!
//! Dependents are probed in [`DependentKind::ORDERED`] order. The first one that
//! is missing is built and created, and the pass ends there. Later passes pick
//! up the next missing dependent, so a new proxy converges in three passes and a
//! converged proxy costs three reads.
//!
//! Existing dependents are never compared with what would be built today, never
//! updated and never deleted.

use crate::controller::reconciler::types::{ReconcileOutcome, Reconciler, ReconcilerError};
use crate::controller::reconciler::validation::parse_kubernetes_duration;
use crate::controller::resources::{
    build_client_secret, build_deployment, build_service, DependentKind, DependentObject,
};
use crate::crd::{EtcdProxy, NamespacedName};
use crate::observability;
use kube::ResourceExt;
use kube_runtime::controller::Action;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, Instrument};

/// Entry point used by the watch loop
///
/// Runs one pass for the proxy that triggered the event. The pass reloads the
/// proxy through the store, so a stale or deleted object in the cache is fine.
pub async fn reconcile(
    proxy: Arc<EtcdProxy>,
    ctx: Arc<Reconciler>,
) -> Result<Action, ReconcilerError> {
    let name = proxy.name_any();
    let reconcile_span = tracing::info_span!(
        "controller.reconcile",
        resource.name = name.as_str(),
        resource.kind = "EtcdProxy",
    );

    async move {
        let start = Instant::now();
        observability::metrics::increment_reconciliations();

        let result = reconcile_proxy(&ctx, &name).await;
        observability::metrics::observe_reconciliation_duration(start.elapsed().as_secs_f64());

        match result? {
            ReconcileOutcome::ProxyGone => {
                info!("EtcdProxy {} no longer exists, owned objects are garbage collected", name);
            }
            ReconcileOutcome::Created { kind, key } => {
                info!("Created {} {} for EtcdProxy {}", kind, key, name);
            }
            ReconcileOutcome::Converged => {
                debug!("EtcdProxy {} is up to date", name);
            }
        }

        ctx.reset_backoff(&resource_key(&name));
        Ok(Action::await_change())
    }
    .instrument(reconcile_span)
    .await
}

/// Key used for per-resource backoff state.
/// `EtcdProxy` is cluster scoped, so the namespace part is empty.
pub fn resource_key(name: &str) -> String {
    format!("/{name}")
}

/// Run a single reconciliation pass for the named proxy
///
/// Not-found is never an error: a missing proxy ends the pass successfully and
/// a missing dependent is the cue to create it. Every other store or issuer
/// failure is returned so the caller can retry with backoff.
pub async fn reconcile_proxy(
    ctx: &Reconciler,
    name: &str,
) -> Result<ReconcileOutcome, ReconcilerError> {
    let proxy = ctx
        .store
        .get_proxy(name)
        .await
        .map_err(|source| ReconcilerError::ProxyLookup {
            name: name.to_string(),
            source,
        })?;

    let Some(proxy) = proxy else {
        return Ok(ReconcileOutcome::ProxyGone);
    };

    for kind in DependentKind::ORDERED {
        let key = kind.key_for(&proxy);
        let existing = ctx.store.get_dependent(kind, &key).await.map_err(|source| {
            ReconcilerError::DependentLookup {
                kind,
                key: key.clone(),
                source,
            }
        })?;

        if existing.is_some() {
            debug!("{} {} exists", kind, key);
            continue;
        }

        let object = build_dependent(ctx, &proxy, kind, &key).await?;
        info!("Creating {} {}", kind, key);
        ctx.store
            .create_dependent(&object)
            .await
            .map_err(|source| ReconcilerError::DependentCreate {
                kind,
                key: key.clone(),
                source,
            })?;
        observability::metrics::increment_dependents_created(kind.as_str());

        return Ok(ReconcileOutcome::Created { kind, key });
    }

    Ok(ReconcileOutcome::Converged)
}

async fn build_dependent(
    ctx: &Reconciler,
    proxy: &EtcdProxy,
    kind: DependentKind,
    key: &NamespacedName,
) -> Result<DependentObject, ReconcilerError> {
    let object = match kind {
        DependentKind::ClientSecret => {
            let validity =
                parse_kubernetes_duration(&proxy.spec.client_cert_duration).map_err(|e| {
                    ReconcilerError::InvalidSpec {
                        name: proxy.name_any(),
                        source: anyhow::anyhow!("clientCertDuration: {e}"),
                    }
                })?;
            let credential = ctx
                .issuer
                .issue(&proxy.name_any(), validity)
                .await
                .map_err(|source| ReconcilerError::CredentialIssue {
                    key: key.clone(),
                    source,
                })?;
            DependentObject::ClientSecret(build_client_secret(proxy, &credential))
        }
        DependentKind::Service => DependentObject::Service(build_service(proxy, &ctx.template)),
        DependentKind::Deployment => {
            DependentObject::Deployment(build_deployment(proxy, &ctx.template))
        }
    };
    Ok(object)
}
