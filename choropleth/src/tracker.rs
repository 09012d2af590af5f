use crate::model::MetricKey;
use crate::overlays::OverlaySet;
use tracing::debug;

/// Overlay change notification from the map shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverlayEvent {
    Added(MetricKey),
    Removed(MetricKey),
}

/// Which metric's legend is shown.
///
/// Starts at the default metric so there is always an answer. Additions win
/// unconditionally; removing the active overlay falls back to the first metric
/// in `priority` that is still on the map, or keeps the removed one when none is.
#[derive(Clone, Debug)]
pub struct ActiveMetricTracker {
    active: MetricKey,
    priority: Vec<MetricKey>,
}

impl ActiveMetricTracker {
    pub fn new(default_metric: impl Into<MetricKey>, priority: Vec<MetricKey>) -> Self {
        ActiveMetricTracker { active: default_metric.into(), priority }
    }

    pub fn active(&self) -> &str { &self.active }

    pub fn on_overlay_added(&mut self, metric: &str) {
        debug!(from = %self.active, to = metric, "overlay added, legend follows");
        self.active = metric.to_string();
    }

    /// `present` is the overlay set after the removal has been applied.
    pub fn on_overlay_removed(&mut self, metric: &str, present: &OverlaySet) {
        if metric != self.active {
            return;
        }
        if let Some(next) = self.priority.iter().find(|m| m.as_str() != metric && present.contains(m)) {
            debug!(removed = metric, to = %next, "active overlay removed, falling back");
            self.active = next.clone();
        } else {
            debug!(removed = metric, "no overlays left, legend keeps last metric");
        }
    }

    /// Dispatch one event, keeping `present` in step. Returns the active metric.
    pub fn apply(&mut self, event: &OverlayEvent, present: &mut OverlaySet) -> &str {
        match event {
            OverlayEvent::Added(m) => {
                present.add(m);
                self.on_overlay_added(m);
            }
            OverlayEvent::Removed(m) => {
                present.remove(m);
                self.on_overlay_removed(m, present);
            }
        }
        &self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> ActiveMetricTracker {
        ActiveMetricTracker::new("A", vec!["A".into(), "B".into(), "C".into()])
    }

    #[test]
    fn removing_inactive_is_noop() {
        let mut t = tracker();
        let mut set = OverlaySet::new();
        t.apply(&OverlayEvent::Added("A".into()), &mut set);
        t.apply(&OverlayEvent::Added("B".into()), &mut set);
        assert_eq!(t.apply(&OverlayEvent::Removed("A".into()), &mut set), "B");
    }

    #[test]
    fn fallback_uses_priority_not_recency() {
        let mut t = tracker();
        let mut set = OverlaySet::new();
        for m in ["C", "A", "B"] {
            t.apply(&OverlayEvent::Added(m.into()), &mut set);
        }
        assert_eq!(t.apply(&OverlayEvent::Removed("B".into()), &mut set), "A");
        assert_eq!(t.apply(&OverlayEvent::Removed("A".into()), &mut set), "C");
        assert_eq!(t.apply(&OverlayEvent::Removed("C".into()), &mut set), "C");
    }
}
