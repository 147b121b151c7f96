//! # Error Policy
//!
//! Error handling and backoff logic for the controller watch loop.

use crate::controller::reconciler::{resource_key, Reconciler, ReconcilerError};
use crate::crd::EtcdProxy;
use crate::observability;
use kube::ResourceExt;
use kube_runtime::controller::Action;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Fallback delay when the backoff table cannot be locked
const FALLBACK_BACKOFF_SECS: u64 = 60;

/// Handle reconciliation errors with Fibonacci backoff
///
/// Backoff state is tracked per resource so one failing proxy does not slow
/// down retries of another.
pub fn handle_reconciliation_error(
    obj: Arc<EtcdProxy>,
    error: &ReconcilerError,
    ctx: Arc<Reconciler>,
) -> Action {
    let name = obj.name_any();

    let error_span = tracing::span!(
        tracing::Level::ERROR,
        "controller.watch.reconciliation_error",
        resource.name = name.as_str(),
        resource.kind = "EtcdProxy",
        error = %error
    );
    let _error_guard = error_span.enter();

    error!("Reconciliation error for {}: {:?}", name, error);
    observability::metrics::increment_reconciliation_errors();

    let (backoff_seconds, error_count) = match ctx.record_failure(&resource_key(&name)) {
        Some(next) => next,
        None => {
            warn!(
                "Failed to lock backoff_states, using default backoff of {}s",
                FALLBACK_BACKOFF_SECS
            );
            (FALLBACK_BACKOFF_SECS, 0)
        }
    };

    let requeue_after = std::time::Duration::from_secs(backoff_seconds);
    let next_trigger_time = chrono::Duration::from_std(requeue_after)
        .ok()
        .and_then(|delay| chrono::Utc::now().checked_add_signed(delay))
        .map_or_else(|| "unknown".to_string(), |at| at.to_rfc3339());

    info!(
        "Retrying with Fibonacci backoff: {}s (error count: {})",
        backoff_seconds, error_count
    );
    info!(
        "Next retry scheduled: {} (in {}s)",
        next_trigger_time, backoff_seconds
    );

    observability::metrics::increment_requeues_total("error-backoff");
    Action::requeue(requeue_after)
}
