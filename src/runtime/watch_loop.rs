//! # Watch Loop
//!
//! Controller watch loop that monitors EtcdProxy resources and the objects they
//! own, and triggers a reconciliation when any of them changes.

use crate::config::ControllerConfig;
use crate::constants::{MANAGED_BY_LABEL_KEY, MANAGED_BY_LABEL_VALUE};
use crate::controller::reconciler::{reconcile, Reconciler};
use crate::controller::server::ServerState;
use crate::crd::EtcdProxy;
use crate::runtime::error_policy::handle_reconciliation_error;
use futures::StreamExt;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Secret, Service};
use kube::api::Api;
use kube::{Client, Resource};
use kube_runtime::controller::{self, Controller};
use kube_runtime::reflector::ObjectRef;
use kube_runtime::watcher;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn, Instrument};

/// Watch configuration for owned objects: only what this controller created
pub fn dependent_watcher_config() -> watcher::Config {
    let selector = format!("{MANAGED_BY_LABEL_KEY}={MANAGED_BY_LABEL_VALUE}");
    watcher::Config::default().labels(&selector)
}

/// Map an owned object back to the EtcdProxy that controls it.
///
/// EtcdProxy is cluster scoped while its dependents are namespaced, so the
/// reference is built without the dependent's namespace.
pub fn owning_proxies<K: Resource>(obj: K) -> Vec<ObjectRef<EtcdProxy>> {
    let api_version = EtcdProxy::api_version(&());
    let kind = EtcdProxy::kind(&());
    obj.meta()
        .owner_references
        .iter()
        .flatten()
        .filter(|owner| owner.controller == Some(true))
        .filter(|owner| owner.api_version == api_version && owner.kind == kind)
        .map(|owner| ObjectRef::new(&owner.name))
        .collect()
}

/// Resolve on the first SIGINT or, on Unix, SIGTERM
async fn wait_for_termination_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler, only SIGINT stops the controller: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Resolve once shutdown has been requested on the channel
async fn shutdown_requested(mut shutdown_rx: watch::Receiver<bool>) {
    loop {
        if *shutdown_rx.borrow_and_update() {
            return;
        }
        if shutdown_rx.changed().await.is_err() {
            return;
        }
    }
}

/// Whether a controller whose stream has ended should be started again
pub fn should_restart(server_state: &ServerState, shutdown_requested: bool) -> bool {
    !shutdown_requested && server_state.is_ready.load(Ordering::Relaxed)
}

/// Run the controller watch loop
///
/// Sets up the Kubernetes controller to watch EtcdProxy resources plus their
/// Secrets, Services and Deployments. SIGINT or SIGTERM flips readiness and
/// stops the loop; any other end of the controller stream restarts it.
pub async fn run_watch_loop(
    client: Client,
    reconciler: Arc<Reconciler>,
    server_state: Arc<ServerState>,
    controller_config: ControllerConfig,
) -> Result<(), anyhow::Error> {
    info!("Starting controller watch loop...");

    // Readiness is dropped before the controllers are told to stop
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let shutdown_server_state = server_state.clone();
    tokio::spawn(async move {
        wait_for_termination_signal().await;
        info!("Received shutdown signal (SIGINT/SIGTERM), initiating graceful shutdown...");

        shutdown_server_state.is_ready.store(false, Ordering::Relaxed);
        info!("Marked server as not ready, waiting for in-flight reconciliations to complete...");
        shutdown_tx.send_replace(true);
    });

    let proxies: Api<EtcdProxy> = Api::all(client.clone());

    loop {
        if !should_restart(&server_state, *shutdown_rx.borrow()) {
            info!("Shutdown requested, exiting watch loop");
            break;
        }

        let watch_span = tracing::span!(
            tracing::Level::INFO,
            "controller.watch",
            operation = "watch_loop"
        );

        let controller_future = Controller::new(proxies.clone(), watcher::Config::default())
            .watches(
                Api::<Secret>::all(client.clone()),
                dependent_watcher_config(),
                owning_proxies,
            )
            .watches(
                Api::<Service>::all(client.clone()),
                dependent_watcher_config(),
                owning_proxies,
            )
            .watches(
                Api::<Deployment>::all(client.clone()),
                dependent_watcher_config(),
                owning_proxies,
            )
            .with_config(
                controller::Config::default()
                    .concurrency(controller_config.max_concurrent_reconciliations),
            )
            .graceful_shutdown_on(shutdown_requested(shutdown_rx.clone()))
            .run(reconcile, handle_reconciliation_error, reconciler.clone())
            .for_each(|result| {
                match result {
                    Ok((obj_ref, action)) => {
                        debug!(resource.name = %obj_ref.name, action = ?action, "watch.event.reconciled");
                    }
                    Err(e) => {
                        warn!(error = %e, "watch.event.error");
                    }
                }
                futures::future::ready(())
            });

        controller_future.instrument(watch_span).await;

        if !should_restart(&server_state, *shutdown_rx.borrow()) {
            info!("Shutdown requested, exiting watch loop");
            break;
        }

        let delay = controller_config.watch_restart_delay_duration();
        warn!(
            "Controller watch stream ended, restarting in {} seconds...",
            delay.as_secs()
        );
        tokio::time::sleep(delay).await;
    }

    info!("Controller stopped gracefully");
    Ok(())
}
