//! Sequential consumption loop.
//!
//! Pulls one payload, handles it to completion, then pulls the next.
//! Shutdown is only observed while waiting for a delivery.

use futures_util::{Stream, StreamExt};
use tokio::sync::broadcast;
use tracing::Instrument;
use uuid::Uuid;

use crate::observability::metrics;
use crate::registration::handler::RegistrationHandler;

/// Counters for one run of the dispatch loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    pub received: u64,
    /// Every call of the event succeeded.
    pub provisioned: u64,
    /// Sequence ran to the end but some call was exhausted.
    pub partial: u64,
    /// Event aborted by a parse, transport or missing-marker error.
    pub failed: u64,
}

/// Feed every payload from `deliveries` to `handler`, one at a time.
///
/// Returns when the stream ends or `shutdown` fires (including when every
/// sender is dropped). A stream error is returned to the caller; handler
/// errors never are.
pub async fn dispatch<S, P, E>(
    deliveries: S,
    handler: &RegistrationHandler,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<DispatchStats, E>
where
    S: Stream<Item = Result<P, E>>,
    P: AsRef<[u8]>,
{
    let mut deliveries = std::pin::pin!(deliveries);
    let mut stats = DispatchStats::default();

    tracing::info!("Waiting for registration events");

    loop {
        let payload = tokio::select! {
            biased;
            _ = shutdown.recv() => {
                tracing::info!("Dispatcher received shutdown signal, exiting loop");
                break;
            }
            next = deliveries.next() => match next {
                Some(delivery) => delivery?,
                None => {
                    tracing::info!("Delivery stream ended");
                    break;
                }
            },
        };

        stats.received += 1;
        let span = tracing::info_span!("registration", event_id = %Uuid::new_v4());
        let outcome = handle_one(handler, payload.as_ref()).instrument(span).await;

        metrics::record_event(outcome.as_str());
        match outcome {
            EventOutcome::Provisioned => stats.provisioned += 1,
            EventOutcome::Partial => stats.partial += 1,
            EventOutcome::Failed => stats.failed += 1,
        }
    }

    Ok(stats)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventOutcome {
    Provisioned,
    Partial,
    Failed,
}

impl EventOutcome {
    fn as_str(self) -> &'static str {
        match self {
            EventOutcome::Provisioned => "provisioned",
            EventOutcome::Partial => "partial",
            EventOutcome::Failed => "failed",
        }
    }
}

async fn handle_one(handler: &RegistrationHandler, payload: &[u8]) -> EventOutcome {
    match handler.handle(payload).await {
        Ok(report) if report.is_complete() => {
            tracing::info!(endpoint = %report.endpoint, "Client provisioned");
            EventOutcome::Provisioned
        }
        Ok(report) => {
            tracing::warn!(
                endpoint = %report.endpoint,
                failed_objects = ?report.failed_objects(),
                "Client partially provisioned"
            );
            EventOutcome::Partial
        }
        Err(e) => {
            tracing::error!(error = %e, payload_len = payload.len(), "Dropping registration event");
            EventOutcome::Failed
        }
    }
}
