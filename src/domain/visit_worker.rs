//! Background worker emitting the visit audit trail.

use tokio::sync::mpsc;
use tracing::info;

use crate::domain::visit_event::VisitEvent;

/// Drains the visit channel and writes one structured audit line per event.
///
/// Runs until every sender is dropped. Per-event work is infallible by
/// construction; the supervising task in the server reports abnormal
/// termination without taking the serving process down with it.
pub async fn run_visit_worker(mut rx: mpsc::Receiver<VisitEvent>) {
    while let Some(ev) = rx.recv().await {
        info!(
            slug = %ev.slug,
            destination_url = %ev.destination_url,
            ip = ev.ip.as_deref(),
            user_agent = ev.user_agent.as_deref(),
            referer = ev.referer.as_deref(),
            "link visited"
        );
    }
}
