//! Tokio driver for continuation-based breathing sessions.

use std::future::Future;

use super::runner::ContinuationHost;
use crate::events::Event;

/// Sleep through each pending continuation and fire it until the session
/// goes idle or `shutdown` resolves, then stop the host.
///
/// Every event, including those produced by the final stop, is handed to
/// `sink` in order. Stopping on shutdown is what keeps exercise accounting
/// identical to a manual stop.
pub async fn drive<H, F, S>(host: &mut H, mut sink: F, shutdown: S)
where
    H: ContinuationHost,
    F: FnMut(&Event),
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    while let Some(next) = host.pending() {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::debug!("shutdown requested, stopping breathing session");
                break;
            }
            _ = tokio::time::sleep(next.delay()) => {
                for event in host.fire(next.id) {
                    sink(&event);
                }
            }
        }
    }

    for event in host.stop() {
        sink(&event);
    }
}
