use crate::algorithms::jenks::{compute_breaks, BreakSet};
use crate::algorithms::scale::{ColorSpectrum, DiscreteColorScale};
use crate::model::MetricKey;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Lifecycle of one metric's classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    /// Registered, nothing computed yet.
    Pending,
    /// A recompute has been issued and not yet committed.
    Computing,
    /// Holds the result of the latest committed recompute.
    Ready,
    /// Data was invalidated by a refresh; the last-good result is still served.
    Stale,
}

/// Breaks and the scale built from them. Always replaced as a unit.
#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    pub breaks: BreakSet,
    pub scale: DiscreteColorScale,
}

#[derive(Clone, Debug)]
pub struct ClassificationState {
    pub metric: MetricKey,
    pub status: MetricStatus,
    pub classification: Option<Classification>,
    // Generation of the newest issued recompute, and of the one committed.
    issued: u64,
    committed: u64,
}

impl ClassificationState {
    fn new(metric: MetricKey) -> Self {
        ClassificationState { metric, status: MetricStatus::Pending, classification: None, issued: 0, committed: 0 }
    }

    pub fn breaks(&self) -> Option<&BreakSet> { self.classification.as_ref().map(|c| &c.breaks) }
    pub fn scale(&self) -> Option<&DiscreteColorScale> { self.classification.as_ref().map(|c| &c.scale) }
    pub fn is_ready(&self) -> bool { self.classification.is_some() }
    /// Generation of the committed classification; 0 before the first commit.
    pub fn generation(&self) -> u64 { self.committed }
}

/// Handle for one issued recompute. Only the newest ticket for a metric commits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub metric: MetricKey,
    pub generation: u64,
}

/// Self-contained recompute: owns its sample so it can run on another thread.
#[derive(Clone, Debug)]
pub struct ClassifyJob {
    pub ticket: Ticket,
    pub sample: Vec<f64>,
    pub classes: usize,
    pub spectrum: ColorSpectrum,
}

/// Result of a `ClassifyJob`, waiting to be committed.
#[derive(Clone, Debug)]
pub struct JobResult {
    pub ticket: Ticket,
    pub classification: Option<Classification>,
}

impl ClassifyJob {
    pub fn run(self) -> JobResult {
        let classification = classify(&self.sample, self.classes, &self.spectrum);
        JobResult { ticket: self.ticket, classification }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitOutcome {
    /// New breaks and scale are live.
    Committed,
    /// Nothing to classify; the previous state was kept.
    EmptySample,
    /// A newer recompute was issued after this one; result discarded.
    Superseded,
    /// Metric uses fixed bins, nothing to compute.
    FixedDomain,
    /// Metric is not registered.
    Unknown,
}

/// Natural breaks of `sample` with the top break raised to the sample max.
pub fn natural_breaks(sample: &[f64], k: usize) -> Option<BreakSet> {
    let mut breaks = compute_breaks(sample, k)?;
    let max = sample.iter().copied().filter(|v| v.is_finite()).fold(f64::NEG_INFINITY, f64::max);
    breaks.raise_max(max);
    Some(breaks)
}

impl Classification {
    pub fn new(breaks: BreakSet, spectrum: &ColorSpectrum) -> Self {
        let scale = DiscreteColorScale::build(spectrum, &breaks);
        Classification { breaks, scale }
    }
}

/// `natural_breaks` plus the scale built from them.
pub fn classify(sample: &[f64], k: usize, spectrum: &ColorSpectrum) -> Option<Classification> {
    natural_breaks(sample, k).map(|b| Classification::new(b, spectrum))
}

/// Owns every metric's classification state.
#[derive(Clone, Debug, Default)]
pub struct ClassificationStore {
    states: HashMap<MetricKey, ClassificationState>,
    next_generation: u64,
}

impl ClassificationStore {
    pub fn new() -> Self { Self::default() }

    /// Create an empty state for `metric`. Re-registering keeps existing state.
    pub fn register(&mut self, metric: &str) {
        self.states.entry(metric.to_string()).or_insert_with(|| ClassificationState::new(metric.to_string()));
    }

    /// State for a registered metric; `None` only for unknown keys.
    pub fn get(&self, metric: &str) -> Option<&ClassificationState> { self.states.get(metric) }

    pub fn status(&self, metric: &str) -> Option<MetricStatus> { self.states.get(metric).map(|s| s.status) }

    /// Issue a new generation for `metric`, superseding any in-flight recompute.
    pub fn begin(&mut self, metric: &str) -> Option<Ticket> {
        let state = self.states.get_mut(metric)?;
        self.next_generation += 1;
        state.issued = self.next_generation;
        state.status = MetricStatus::Computing;
        Some(Ticket { metric: metric.to_string(), generation: self.next_generation })
    }

    /// Apply a finished recompute if it is still the newest for its metric.
    pub fn commit(&mut self, result: JobResult) -> CommitOutcome {
        let JobResult { ticket, classification } = result;
        let Some(state) = self.states.get_mut(&ticket.metric) else {
            return CommitOutcome::Unknown;
        };
        if ticket.generation != state.issued {
            debug!(metric = %ticket.metric, generation = ticket.generation, newest = state.issued, "discarding superseded classification");
            return CommitOutcome::Superseded;
        }
        match classification {
            Some(c) => {
                debug!(metric = %ticket.metric, generation = ticket.generation, classes = c.breaks.classes(), "classification committed");
                state.classification = Some(c);
                state.committed = ticket.generation;
                state.status = MetricStatus::Ready;
                CommitOutcome::Committed
            }
            None => {
                warn!(metric = %ticket.metric, "empty sample, keeping previous classification");
                // Prior breaks no longer describe the loaded data but keep styling alive.
                state.status = if state.classification.is_some() { MetricStatus::Stale } else { MetricStatus::Pending };
                CommitOutcome::EmptySample
            }
        }
    }

    /// Synchronous begin + classify + commit.
    pub fn recompute(&mut self, metric: &str, sample: &[f64], k: usize, spectrum: &ColorSpectrum) -> CommitOutcome {
        let Some(ticket) = self.begin(metric) else {
            return CommitOutcome::Unknown;
        };
        let classification = classify(sample, k, spectrum);
        self.commit(JobResult { ticket, classification })
    }

    /// Mark a ready metric as stale. Pending or in-flight metrics are unchanged.
    pub fn invalidate(&mut self, metric: &str) -> bool {
        match self.states.get_mut(metric) {
            Some(s) if s.status == MetricStatus::Ready => {
                s.status = MetricStatus::Stale;
                true
            }
            _ => false,
        }
    }

    /// Mark a metric ready without breaks: used for fixed-domain metrics.
    pub(crate) fn mark_ready(&mut self, metric: &str) {
        if let Some(s) = self.states.get_mut(metric) {
            s.status = MetricStatus::Ready;
        }
    }
}
