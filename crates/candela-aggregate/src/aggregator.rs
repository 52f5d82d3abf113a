//! Streaming candle-to-candle aggregation.

use candela_types::{Candle, CandlePeriod};

use crate::{AggregateError, CandleMap};

/// Outcome of folding one candle into a [`CandleAggregator`].
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// No candle was open for the ticker; one was opened.
    Opened,
    /// The candle was merged into the open candle of the same bucket.
    Merged,
    /// The incoming candle crossed a bucket boundary. The previously open
    /// candle is returned closed and a new one was opened in its place.
    Closed(Candle),
}

impl Update {
    /// Returns the closed candle, if this update closed one.
    #[must_use]
    pub fn into_closed(self) -> Option<Candle> {
        match self {
            Self::Closed(candle) => Some(candle),
            Self::Opened | Self::Merged => None,
        }
    }
}

/// Streaming candle aggregator for one target period.
///
/// Consumes candles of the same or a finer period, in non-decreasing time
/// order per ticker, and emits a closed candle each time a ticker moves
/// into a new bucket.
#[derive(Debug)]
pub struct CandleAggregator {
    period: CandlePeriod,
    candles: CandleMap,
}

impl CandleAggregator {
    /// Creates a new aggregator for the given period.
    #[must_use]
    pub fn new(period: CandlePeriod) -> Self {
        Self {
            period,
            candles: CandleMap::new(),
        }
    }

    /// Returns the period being aggregated to.
    #[must_use]
    pub const fn period(&self) -> CandlePeriod {
        self.period
    }

    /// Returns the number of tickers with an open candle.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.candles.len()
    }

    /// Returns true if no candle is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Returns the open candle for a ticker.
    #[must_use]
    pub fn open_candle(&self, ticker: &str) -> Option<&Candle> {
        self.candles.get(ticker)
    }

    /// Folds a candle into the aggregator.
    ///
    /// # Errors
    ///
    /// - [`AggregateError::PeriodMismatch`] if `candle` is coarser than, or
    ///   does not nest inside, the target period.
    /// - [`AggregateError::BucketRegression`] if `candle` falls into a bucket
    ///   earlier than the ticker's open candle.
    /// - [`AggregateError::Candle`] if the bucket cannot be computed.
    ///
    /// On error the aggregator state is unchanged and the candle is dropped.
    pub fn update(&mut self, candle: Candle) -> Result<Update, AggregateError> {
        if !candle.period.divides(self.period) {
            return Err(AggregateError::PeriodMismatch {
                ticker: candle.ticker,
                input: candle.period,
                target: self.period,
            });
        }

        let bucket = self.period.bucket_start(candle.bucket_start)?;

        match self.candles.get_mut(&candle.ticker) {
            Some(open) if open.bucket_start == bucket => {
                open.merge(&candle);
                Ok(Update::Merged)
            }
            Some(open) if open.bucket_start > bucket => Err(AggregateError::BucketRegression {
                ticker: candle.ticker,
                open: open.bucket_start,
                incoming: bucket,
            }),
            Some(open) => {
                // Boundary crossed: hand back the finished candle
                let fresh = candle.reproject(self.period)?;
                Ok(Update::Closed(std::mem::replace(open, fresh)))
            }
            None => {
                self.candles.insert(candle.reproject(self.period)?);
                Ok(Update::Opened)
            }
        }
    }

    /// Finishes aggregation, returning every still-open candle.
    ///
    /// Candles are sorted by ticker, one per ticker.
    #[must_use]
    pub fn flush(mut self) -> Vec<Candle> {
        self.candles.drain()
    }
}

/// Aggregates a finite candle sequence into closed candles of `period`.
///
/// Closed candles come out in emission order, followed by the final flush.
///
/// # Errors
///
/// Returns the first error reported by the aggregator.
pub fn aggregate_candles(
    period: CandlePeriod,
    candles: impl IntoIterator<Item = Candle>,
) -> Result<Vec<Candle>, AggregateError> {
    let mut aggregator = CandleAggregator::new(period);
    let mut closed = Vec::new();

    for candle in candles {
        if let Some(done) = aggregator.update(candle)?.into_closed() {
            closed.push(done);
        }
    }

    closed.extend(aggregator.flush());
    Ok(closed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use candela_types::Price;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    fn epoch_plus(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(0, 0).unwrap() + TimeDelta::seconds(seconds)
    }

    fn tick(ticker: &str, value: f64, seconds: i64) -> Candle {
        let price = Price::new(ticker, value, epoch_plus(seconds));
        Candle::from_price(&price, CandlePeriod::Minute1).unwrap()
    }

    #[test]
    fn test_boundary_closes_candle() {
        let mut agg = CandleAggregator::new(CandlePeriod::Minute1);

        assert_eq!(agg.update(tick("AAPL", 100.0, 10)).unwrap(), Update::Opened);
        assert_eq!(agg.update(tick("AAPL", 105.0, 40)).unwrap(), Update::Merged);

        let closed = agg
            .update(tick("AAPL", 90.0, 65))
            .unwrap()
            .into_closed()
            .unwrap();
        assert_eq!(closed.bucket_start, epoch_plus(0));
        assert_relative_eq!(closed.open, 100.0);
        assert_relative_eq!(closed.high, 105.0);
        assert_relative_eq!(closed.low, 100.0);
        assert_relative_eq!(closed.close, 105.0);

        let rest = agg.flush();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].bucket_start, epoch_plus(60));
        assert_relative_eq!(rest[0].open, 90.0);
        assert_relative_eq!(rest[0].close, 90.0);
    }

    #[test]
    fn test_tickers_are_independent() {
        let mut agg = CandleAggregator::new(CandlePeriod::Minute1);

        agg.update(tick("AAPL", 1.0, 0)).unwrap();
        agg.update(tick("NVDA", 2.0, 5)).unwrap();
        // NVDA crossing must not close AAPL
        let closed = agg.update(tick("NVDA", 3.0, 61)).unwrap().into_closed().unwrap();

        assert_eq!(closed.ticker, "NVDA");
        assert_eq!(agg.open_count(), 2);
        assert_eq!(agg.open_candle("AAPL").unwrap().bucket_start, epoch_plus(0));
    }

    #[test]
    fn test_regression_leaves_state_untouched() {
        let mut agg = CandleAggregator::new(CandlePeriod::Minute1);
        agg.update(tick("TSLA", 10.0, 130)).unwrap();

        let err = agg.update(tick("TSLA", 1.0, 10)).unwrap_err();

        assert_eq!(
            err,
            AggregateError::BucketRegression {
                ticker: "TSLA".to_string(),
                open: epoch_plus(120),
                incoming: epoch_plus(0),
            }
        );
        let open = agg.open_candle("TSLA").unwrap();
        assert_relative_eq!(open.low, 10.0);
        assert_relative_eq!(open.close, 10.0);
    }

    #[test]
    fn test_coarser_input_is_rejected() {
        let mut agg = CandleAggregator::new(CandlePeriod::Minute2);
        let coarse = tick("SBER", 5.0, 0).reproject(CandlePeriod::Minute10).unwrap();

        let err = agg.update(coarse).unwrap_err();

        assert!(matches!(err, AggregateError::PeriodMismatch { .. }));
        assert!(agg.is_empty());
    }

    #[test]
    fn test_flush_emits_once_per_ticker() {
        let mut agg = CandleAggregator::new(CandlePeriod::Minute10);
        for (i, ticker) in ["TSLA", "AAPL", "SBER"].iter().enumerate() {
            let offset = i64::try_from(i).unwrap();
            agg.update(tick(ticker, 1.0, offset)).unwrap();
            agg.update(tick(ticker, 2.0, 100 + offset)).unwrap();
        }

        let flushed = agg.flush();
        let tickers: Vec<&str> = flushed.iter().map(|c| c.ticker.as_str()).collect();

        assert_eq!(tickers, vec!["AAPL", "SBER", "TSLA"]);
        assert!(flushed.iter().all(|c| c.period == CandlePeriod::Minute10));
    }

    #[test]
    fn test_bucket_starts_strictly_increase_and_bound_ticks() {
        let values = [5.0, 7.5, 3.0, 4.0, 9.0, 8.0, 2.5, 6.0, 6.5, 1.0, 11.0, 4.5];
        let ticks: Vec<Candle> = values
            .iter()
            .enumerate()
            .map(|(i, v)| tick("AAPL", *v, i64::try_from(i).unwrap() * 25))
            .collect();

        let candles = aggregate_candles(CandlePeriod::Minute1, ticks.clone()).unwrap();

        for pair in candles.windows(2) {
            assert!(pair[0].bucket_start < pair[1].bucket_start);
        }
        for t in &ticks {
            let owner = candles
                .iter()
                .find(|c| c.bucket_start == t.bucket_start)
                .unwrap();
            assert!(owner.low <= t.close && t.close <= owner.high);
            assert!(owner.low <= owner.open && owner.open <= owner.high);
            assert!(owner.low <= owner.close && owner.close <= owner.high);
        }
    }

    #[test]
    fn test_two_minute_from_one_minute_matches_direct() {
        let values = [10.0, 12.0, 9.0, 11.0, 15.0, 8.0, 13.0, 14.0];
        let ticks: Vec<Candle> = values
            .iter()
            .enumerate()
            .map(|(i, v)| tick("NVDA", *v, i64::try_from(i).unwrap() * 30))
            .collect();

        let one_minute = aggregate_candles(CandlePeriod::Minute1, ticks.clone()).unwrap();
        let derived = aggregate_candles(CandlePeriod::Minute2, one_minute).unwrap();
        let direct = aggregate_candles(CandlePeriod::Minute2, ticks).unwrap();

        assert_eq!(derived, direct);
        assert_eq!(direct.len(), 2);
        assert_relative_eq!(direct[0].open, 10.0);
        assert_relative_eq!(direct[0].high, 12.0);
        assert_relative_eq!(direct[0].low, 9.0);
        assert_relative_eq!(direct[0].close, 11.0);
    }
}
