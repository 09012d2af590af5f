pub mod config;
pub mod error;
pub mod features;
pub mod legend;
pub mod model;
pub mod overlays;
pub mod store;
pub mod style;
pub mod tracker;
pub mod numeric {
    pub mod limits;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod jenks;
    pub mod scale;
}

pub use algorithms::jenks::{compute_breaks, BreakSet};
pub use algorithms::scale::{ColorSpectrum, ContinuousScale, DiscreteColorScale};
pub use config::{EngineConfig, FixedBin, MetricConfig, MetricKind};
pub use error::{Error, Result};
pub use features::{extract_sample, Feature, FeatureCollection, Properties};
pub use legend::{LegendContent, LegendEntry};
pub use model::{Color, MetricKey, Style};
pub use overlays::OverlaySet;
pub use store::{
    natural_breaks, Classification, ClassificationState, ClassificationStore, ClassifyJob, CommitOutcome, JobResult,
    MetricStatus, Ticket,
};
pub use tracker::{ActiveMetricTracker, OverlayEvent};

use tracing::{debug, info};

/// Classification engine for one map: per-metric breaks, the legend's active
/// metric, and the style function the map layers call.
pub struct Engine {
    pub(crate) config: EngineConfig,
    pub(crate) store: ClassificationStore,
    pub(crate) tracker: ActiveMetricTracker,
    pub(crate) overlays: OverlaySet,
}

impl Default for Engine {
    fn default() -> Self {
        // The built-in table always validates.
        Engine::build(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Engine::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        let mut store = ClassificationStore::new();
        for m in &config.metrics {
            store.register(&m.key);
        }
        let tracker = ActiveMetricTracker::new(config.default_metric.clone(), config.metric_keys());
        Engine { config, store, tracker, overlays: OverlaySet::new() }
    }

    pub fn config(&self) -> &EngineConfig { &self.config }
    pub fn overlays(&self) -> &OverlaySet { &self.overlays }
    pub fn active_metric(&self) -> &str { self.tracker.active() }
    pub fn state(&self, metric: &str) -> Option<&ClassificationState> { self.store.get(metric) }
    pub fn status(&self, metric: &str) -> Option<MetricStatus> { self.store.status(metric) }

    fn metric_config(&self, metric: &str) -> Result<&MetricConfig> {
        self.config.metric(metric).ok_or_else(|| Error::UnknownMetric(metric.to_string()))
    }

    /// Start a recompute for freshly loaded data without running it.
    ///
    /// `Ok(None)` for fixed-domain metrics, which are marked ready directly.
    /// The returned job may be run anywhere; hand its result to `commit`.
    pub fn prepare(&mut self, metric: &str, data: &FeatureCollection) -> Result<Option<ClassifyJob>> {
        let cfg = self.metric_config(metric)?;
        let Some(spectrum) = cfg.spectrum().cloned() else {
            self.store.mark_ready(metric);
            return Ok(None);
        };
        let sample = data.sample(metric);
        let classes = self.config.classes;
        let Some(ticket) = self.store.begin(metric) else {
            return Err(Error::UnknownMetric(metric.to_string()));
        };
        debug!(metric, generation = ticket.generation, features = data.len(), values = sample.len(), "recompute issued");
        Ok(Some(ClassifyJob { ticket, sample, classes, spectrum }))
    }

    pub fn commit(&mut self, result: JobResult) -> CommitOutcome {
        self.store.commit(result)
    }

    /// Commit breaks computed outside the engine for a prepared job.
    ///
    /// `None` is the empty-sample result. The scale is rebuilt from the
    /// metric's spectrum; a class count other than `classes` is rejected.
    pub fn commit_breaks(&mut self, ticket: Ticket, breaks: Option<BreakSet>) -> Result<CommitOutcome> {
        let Some(spectrum) = self.metric_config(&ticket.metric)?.spectrum() else {
            return Ok(CommitOutcome::FixedDomain);
        };
        if let Some(b) = &breaks {
            if b.classes() != self.config.classes {
                return Err(Error::InvalidBreaks(format!(
                    "expected {} classes for '{}', got {}",
                    self.config.classes,
                    ticket.metric,
                    b.classes()
                )));
            }
        }
        let classification = breaks.map(|b| Classification::new(b, spectrum));
        Ok(self.store.commit(JobResult { ticket, classification }))
    }

    /// Data (re)loaded for `metric`'s layer: classify and commit in one step.
    pub fn on_data_loaded(&mut self, metric: &str, data: &FeatureCollection) -> CommitOutcome {
        match self.prepare(metric, data) {
            Ok(Some(job)) => self.commit(job.run()),
            Ok(None) => CommitOutcome::FixedDomain,
            Err(_) => CommitOutcome::Unknown,
        }
    }

    /// Weights were revised upstream: every metric goes stale and its layer
    /// must be fetched again. Returns the metrics to reload, in priority order.
    pub fn on_weights_revised(&mut self) -> Vec<MetricKey> {
        let keys = self.config.metric_keys();
        let stale = keys.iter().filter(|k| self.store.invalidate(k)).count();
        info!(metrics = keys.len(), stale, "weights revised, reloading layers");
        keys
    }

    /// Overlay shown on the map. Keys that are not metrics are ignored.
    pub fn on_overlay_added(&mut self, metric: &str) -> bool {
        self.on_overlay(OverlayEvent::Added(metric.to_string()))
    }

    pub fn on_overlay_removed(&mut self, metric: &str) -> bool {
        self.on_overlay(OverlayEvent::Removed(metric.to_string()))
    }

    pub fn on_overlay(&mut self, event: OverlayEvent) -> bool {
        let (OverlayEvent::Added(m) | OverlayEvent::Removed(m)) = &event;
        if self.config.metric(m).is_none() {
            debug!(overlay = %m, "ignoring non-metric overlay");
            return false;
        }
        self.tracker.apply(&event, &mut self.overlays);
        true
    }

    pub fn legend_content(&self) -> LegendContent {
        self.legend_content_for(self.tracker.active())
    }

    pub fn legend_content_for(&self, metric: &str) -> LegendContent {
        match self.config.metric(metric) {
            Some(cfg) => legend::content(cfg, self.store.get(metric), self.config.label_decimals),
            None => LegendContent::Pending { title: metric.to_string() },
        }
    }

    /// Legend markup for the active metric.
    pub fn legend(&self) -> String {
        legend::render(&self.legend_content())
    }

    /// Style function for `metric`'s layer.
    pub fn style(&self, metric: &str, props: Option<&Properties>) -> Style {
        match self.config.metric(metric) {
            Some(cfg) => style::style_feature(&self.config, cfg, self.store.get(metric), props),
            None => Style {
                color: self.config.no_data_color,
                weight: self.config.line_weight,
                opacity: self.config.line_opacity,
            },
        }
    }

    pub fn style_feature(&self, metric: &str, feature: &Feature) -> Style {
        self.style(metric, feature.properties.as_ref())
    }
}
