//! Pumps a generator stream into a bounded channel.

use candela_types::Price;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::PriceGenerator;

/// Spawns a task that forwards generated prices into a bounded channel.
///
/// The channel closes when the generator stream ends, either because
/// `cancel` fired, `max_ticks` was reached, or the receiver was dropped.
/// The task resolves to the number of prices delivered.
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn spawn_source(
    generator: PriceGenerator,
    cancel: CancellationToken,
    capacity: usize,
) -> (mpsc::Receiver<Price>, JoinHandle<u64>) {
    let (tx, rx) = mpsc::channel(capacity);

    let handle = tokio::spawn(async move {
        let mut prices = Box::pin(generator.prices(cancel));
        let mut sent = 0u64;

        while let Some(price) = prices.next().await {
            tracing::trace!(%price, "tick");
            if tx.send(price).await.is_err() {
                tracing::warn!("price receiver dropped, stopping source");
                break;
            }
            sent += 1;
        }

        tracing::info!(sent, "price source finished");
        sent
    });

    (rx, handle)
}
