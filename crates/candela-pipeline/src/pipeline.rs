//! Pipeline controller: wires the cascade and waits for it to drain.

use candela_format::SinkProvider;
use candela_types::Price;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::{
    ConfigError, ErrorCategory, ErrorFanIn, PipelineConfig, PipelineError, StageStats, TeeStats,
    spawn_price_adapter, spawn_stage, spawn_tee,
};

/// Outcome of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Configuration errors surfaced during the run.
    pub configuration: u64,
    /// Windowing anomalies surfaced during the run.
    pub windowing: u64,
    /// Persistence failures surfaced during the run.
    pub persistence: u64,
    /// Tasks that panicked instead of finishing.
    pub panicked: usize,
    /// Price adapter counters, `None` if the adapter panicked.
    pub adapter: Option<StageStats>,
    /// Per-stage counters in cascade order.
    pub stages: Vec<StageStats>,
    /// Per-tee counters in cascade order.
    pub tees: Vec<TeeStats>,
}

impl RunSummary {
    /// Returns the total number of errors surfaced.
    #[must_use]
    pub const fn total_errors(&self) -> u64 {
        self.configuration + self.windowing + self.persistence
    }

    /// Returns true if no error was surfaced and no task panicked.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.total_errors() == 0 && self.panicked == 0
    }

    fn record(&mut self, error: &PipelineError) {
        match error.category() {
            ErrorCategory::Configuration => {
                self.configuration += 1;
                tracing::error!(%error, "pipeline configuration error");
            }
            ErrorCategory::Windowing => {
                self.windowing += 1;
                tracing::info!(%error, "windowing anomaly");
            }
            ErrorCategory::Persistence => {
                self.persistence += 1;
                tracing::warn!(%error, "persistence failure");
            }
        }
    }
}

/// The tick-to-candle aggregation cascade.
///
/// ```text
/// prices -> adapter -> stage(p0) -> tee(p0) -> stage(p1) -> tee(p1) -> ... -> tee(pn)
/// ```
///
/// Every stage and tee runs as its own task. The last tee persists without
/// forwarding.
#[derive(Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    provider: Arc<dyn SinkProvider>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Creates a pipeline writing closed candles through `provider`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: PipelineConfig, provider: Arc<dyn SinkProvider>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, provider })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the cascade until `prices` closes and every task has drained.
    ///
    /// Errors from all tasks are merged and logged as they arrive. The call
    /// returns once the merged error stream closes, which happens only after
    /// every stage has flushed and every sink has been closed.
    pub async fn run(self, prices: mpsc::Receiver<Price>) -> RunSummary {
        let capacity = self.config.channel_capacity;
        let periods = &self.config.periods;
        let mut fan_in = ErrorFanIn::new(self.config.error_capacity);
        let mut stage_tasks: Vec<JoinHandle<StageStats>> = Vec::with_capacity(periods.len());
        let mut tee_tasks: Vec<JoinHandle<TeeStats>> = Vec::with_capacity(periods.len());

        let adapter = spawn_price_adapter(periods[0], prices, capacity);
        fan_in.register(adapter.errors);
        let adapter_task = adapter.task;

        let mut upstream = Some(adapter.candles);
        for (idx, &period) in periods.iter().enumerate() {
            let Some(input) = upstream.take() else {
                break;
            };
            let terminal = idx + 1 == periods.len();

            let stage = spawn_stage(period, input, capacity);
            fan_in.register(stage.errors);
            stage_tasks.push(stage.task);

            let tee = spawn_tee(
                period,
                Arc::clone(&self.provider),
                stage.candles,
                !terminal,
                capacity,
            );
            fan_in.register(tee.errors);
            tee_tasks.push(tee.task);
            upstream = tee.candles;
        }

        tracing::info!(
            periods = ?periods,
            error_sources = fan_in.sources(),
            "pipeline started"
        );

        let mut summary = RunSummary::default();
        let mut errors = fan_in.finish();
        while let Some(error) = errors.recv().await {
            summary.record(&error);
        }

        match adapter_task.await {
            Ok(stats) => summary.adapter = Some(stats),
            Err(e) => {
                summary.panicked += 1;
                tracing::error!(error = %e, "price adapter failed");
            }
        }
        for task in stage_tasks {
            match task.await {
                Ok(stats) => summary.stages.push(stats),
                Err(e) => {
                    summary.panicked += 1;
                    tracing::error!(error = %e, "aggregation stage failed");
                }
            }
        }
        for task in tee_tasks {
            match task.await {
                Ok(stats) => summary.tees.push(stats),
                Err(e) => {
                    summary.panicked += 1;
                    tracing::error!(error = %e, "persistence tee failed");
                }
            }
        }

        tracing::info!(
            errors = summary.total_errors(),
            panicked = summary.panicked,
            "pipeline finished"
        );
        summary
    }
}
