use crate::model::MetricKey;

/// Metric overlays present on the map, in the order they were added.
#[derive(Clone, Debug, Default)]
pub struct OverlaySet {
    metrics: Vec<MetricKey>,
}

impl OverlaySet {
    pub fn new() -> Self { Self::default() }

    /// Returns false if `metric` was already present.
    pub fn add(&mut self, metric: &str) -> bool {
        if self.contains(metric) {
            return false;
        }
        self.metrics.push(metric.to_string());
        true
    }

    /// Returns false if `metric` was not present.
    pub fn remove(&mut self, metric: &str) -> bool {
        match self.metrics.iter().position(|m| m == metric) {
            Some(idx) => {
                self.metrics.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, metric: &str) -> bool {
        self.metrics.iter().any(|m| m == metric)
    }

    pub fn len(&self) -> usize { self.metrics.len() }
    pub fn is_empty(&self) -> bool { self.metrics.is_empty() }

    pub fn metrics(&self) -> impl Iterator<Item = &str> {
        self.metrics.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove() {
        let mut set = OverlaySet::new();
        assert!(set.add("a"));
        assert!(set.add("b"));
        assert!(!set.add("a"));
        assert_eq!(set.len(), 2);
        assert!(set.remove("a"));
        assert!(!set.remove("a"));
        assert_eq!(set.metrics().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn re_adding_moves_to_the_end() {
        let mut set = OverlaySet::new();
        for m in ["a", "b", "c"] {
            set.add(m);
        }
        set.remove("a");
        set.add("a");
        assert_eq!(set.metrics().collect::<Vec<_>>(), vec!["b", "c", "a"]);
        assert!(!set.is_empty());
    }
}
