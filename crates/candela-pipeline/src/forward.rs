//! Downstream candle sender shared by stages and tees.

use candela_types::{Candle, CandlePeriod};
use tokio::sync::mpsc;

/// Candle sender that survives its receiver going away.
///
/// Once the receiver is dropped further sends are discarded, so the owning
/// task keeps draining its input and upstream never blocks.
#[derive(Debug)]
pub(crate) struct Downstream {
    period: CandlePeriod,
    tx: Option<mpsc::Sender<Candle>>,
}

impl Downstream {
    pub(crate) const fn new(period: CandlePeriod, tx: Option<mpsc::Sender<Candle>>) -> Self {
        Self { period, tx }
    }

    /// Sends a candle, returning true if it was delivered.
    pub(crate) async fn send(&mut self, candle: Candle) -> bool {
        let Some(tx) = &self.tx else {
            return false;
        };
        if tx.send(candle).await.is_ok() {
            return true;
        }
        tracing::warn!(period = %self.period, "downstream closed, discarding further candles");
        self.tx = None;
        false
    }
}
