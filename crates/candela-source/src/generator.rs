//! Random-walk price generator.

use candela_types::Price;
use chrono::{DateTime, TimeDelta, Utc};
use futures::stream::{self, Stream, StreamExt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{Clock, GeneratorConfig, SourceError};

/// Synthetic price generator.
///
/// Every round emits one price per configured ticker. Each price follows
/// an independent multiplicative random walk.
#[derive(Debug)]
pub struct PriceGenerator {
    config: GeneratorConfig,
    rng: StdRng,
    last: Vec<f64>,
    round: u64,
    started: Option<(Instant, DateTime<Utc>)>,
}

impl PriceGenerator {
    /// Creates a generator from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: GeneratorConfig) -> Result<Self, SourceError> {
        config.validate()?;

        let mut rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let base = config.factor * 10.0;
        let last = config
            .tickers
            .iter()
            .map(|_| base * (1.0 + rng.gen_range(-0.1_f64..0.1)))
            .collect();

        Ok(Self {
            config,
            rng,
            last,
            round: 0,
            started: None,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Turns the generator into a lazy stream of prices.
    ///
    /// The stream ends when `cancel` fires, after `max_ticks` prices, or
    /// once the clock runs past the last representable timestamp. Consuming
    /// the generator makes a finished stream non-restartable.
    pub fn prices(self, cancel: CancellationToken) -> impl Stream<Item = Price> + Send {
        let max_ticks = self
            .config
            .max_ticks
            .map(|n| usize::try_from(n).unwrap_or(usize::MAX));

        let rounds = stream::unfold((self, cancel), |(mut generator, cancel)| async move {
            if cancel.is_cancelled() {
                return None;
            }
            if generator.round > 0 && !matches!(generator.config.clock, Clock::Simulated { .. }) {
                tokio::select! {
                    () = cancel.cancelled() => return None,
                    () = tokio::time::sleep(generator.config.delay) => {}
                }
            }
            let Some(batch) = generator.next_round() else {
                tracing::error!(
                    round = generator.round,
                    clock = ?generator.config.clock,
                    "generator clock overflowed, stopping price stream"
                );
                return None;
            };
            Some((batch, (generator, cancel)))
        });

        let prices = rounds.flat_map(stream::iter);
        match max_ticks {
            Some(limit) => prices.take(limit).left_stream(),
            None => prices.right_stream(),
        }
    }

    /// Produces the next round of prices, one per ticker.
    ///
    /// Returns `None` if the round cannot be timestamped.
    fn next_round(&mut self) -> Option<Vec<Price>> {
        let timestamp = self.now()?;
        self.round += 1;

        let factor = self.config.factor;
        let rng = &mut self.rng;
        let batch = self
            .last
            .iter_mut()
            .zip(&self.config.tickers)
            .map(|(value, ticker)| {
                *value *= 1.0 + rng.gen_range(-1.0_f64..1.0) / factor;
                Price::new(ticker.clone(), *value, timestamp)
            })
            .collect();
        Some(batch)
    }

    /// Timestamp for the current round, or `None` once it overflows.
    fn now(&mut self) -> Option<DateTime<Utc>> {
        match self.config.clock {
            Clock::Realtime => Some(Utc::now()),
            Clock::Accelerated { speedup } => {
                let (origin, wall_start) =
                    *self.started.get_or_insert((Instant::now(), Utc::now()));
                let elapsed = origin.elapsed().checked_mul(speedup)?;
                wall_start.checked_add_signed(TimeDelta::from_std(elapsed).ok()?)
            }
            Clock::Simulated { start, step } => {
                let rounds = i32::try_from(self.round).ok()?;
                let offset = TimeDelta::from_std(step).ok()?.checked_mul(rounds)?;
                start.checked_add_signed(offset)
            }
        }
    }
}
