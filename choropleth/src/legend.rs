use crate::config::{FixedBin, MetricConfig, MetricKind};
use crate::model::Color;
use crate::store::ClassificationState;
use std::fmt::Write;

pub const PENDING_TEXT: &str = "Computing breaks...";

/// One legend row: a swatch and its label.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    pub color: Color,
    pub label: String,
}

/// What the legend container should show.
#[derive(Clone, Debug, PartialEq)]
pub enum LegendContent {
    Pending { title: String },
    Classes { title: String, entries: Vec<LegendEntry> },
}

/// Jenks classes as `[lo, hi)` rows, last row closed.
pub fn class_entries(state: &ClassificationState, decimals: usize) -> Option<Vec<LegendEntry>> {
    let c = state.classification.as_ref()?;
    let k = c.breaks.classes();
    let entries = (0..k)
        .filter_map(|i| {
            let (lo, hi) = c.breaks.interval(i)?;
            let close = if i + 1 == k { ']' } else { ')' };
            Some(LegendEntry {
                color: c.scale.colors()[i],
                label: format!("[{:.*}, {:.*}{}", decimals, lo, decimals, hi, close),
            })
        })
        .collect();
    Some(entries)
}

pub fn fixed_entries(bins: &[FixedBin], decimals: usize) -> Vec<LegendEntry> {
    bins.iter()
        .map(|b| LegendEntry {
            color: b.color,
            label: format!("{} ({:.*} to {:.*})", b.label, decimals, b.lower, decimals, b.upper),
        })
        .collect()
}

/// Legend for `metric`. Fixed-domain metrics never need a classification.
pub fn content(metric: &MetricConfig, state: Option<&ClassificationState>, decimals: usize) -> LegendContent {
    let title = metric.display_title().to_string();
    match &metric.kind {
        MetricKind::Fixed { bins } => LegendContent::Classes { title, entries: fixed_entries(bins, decimals) },
        MetricKind::Natural { .. } => match state.and_then(|s| class_entries(s, decimals)) {
            Some(entries) => LegendContent::Classes { title, entries },
            None => LegendContent::Pending { title },
        },
    }
}

/// Markup for the legend container; replaces its whole content.
pub fn render(content: &LegendContent) -> String {
    let mut out = String::new();
    match content {
        LegendContent::Pending { title } => {
            let _ = write!(out, "<div class=\"legend-title\">{}</div>", escape(title));
            let _ = write!(out, "<div class=\"legend-pending\">{}</div>", PENDING_TEXT);
        }
        LegendContent::Classes { title, entries } => {
            let _ = write!(out, "<div class=\"legend-title\">{}</div>", escape(title));
            for e in entries {
                let _ = write!(
                    out,
                    "<div class=\"legend-row\"><i style=\"background:{}\"></i>{}</div>",
                    e.color.to_hex(),
                    escape(&e.label)
                );
            }
        }
    }
    out
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
    }

    #[test]
    fn pending_has_placeholder_and_no_rows() {
        let html = render(&LegendContent::Pending { title: "Score".into() });
        assert!(html.contains(PENDING_TEXT));
        assert!(!html.contains("legend-row"));
    }

    #[test]
    fn fixed_labels() {
        let bins = vec![FixedBin { lower: -1.0, upper: 0.0, label: "Lower".into(), color: Color::rgb(0, 0, 0) }];
        let e = fixed_entries(&bins, 1);
        assert_eq!(e[0].label, "Lower (-1.0 to 0.0)");
    }
}
