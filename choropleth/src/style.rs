use crate::algorithms::scale::ContinuousScale;
use crate::config::{EngineConfig, FixedBin, MetricConfig, MetricKind};
use crate::features::{property_value, Properties};
use crate::model::{Color, Style};
use crate::store::ClassificationState;

/// Color of the fixed bin containing `value`, clamped to the outer bins.
pub fn fixed_color(bins: &[FixedBin], value: f64) -> Option<Color> {
    if bins.is_empty() {
        return None;
    }
    let idx = bins.partition_point(|b| b.upper <= value).min(bins.len() - 1);
    Some(bins[idx].color)
}

/// Color for `value` under `metric`, using the committed scale when there is one.
pub fn metric_color(metric: &MetricConfig, state: Option<&ClassificationState>, value: f64) -> Option<Color> {
    match &metric.kind {
        MetricKind::Fixed { bins } => fixed_color(bins, value),
        MetricKind::Natural { default_domain: [lo, hi], spectrum } => Some(match state.and_then(|s| s.scale()) {
            Some(scale) => scale.color(value),
            None => ContinuousScale { spectrum, lo: *lo, hi: *hi }.color(value),
        }),
    }
}

/// Style for one feature. Missing or malformed values get the no-data color.
pub fn style_feature(
    cfg: &EngineConfig,
    metric: &MetricConfig,
    state: Option<&ClassificationState>,
    props: Option<&Properties>,
) -> Style {
    let color = props
        .and_then(|p| property_value(p, &metric.key))
        .and_then(|v| metric_color(metric, state, v))
        .unwrap_or(cfg.no_data_color);
    Style { color, weight: cfg.line_weight, opacity: cfg.line_opacity }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DIFFERENCE_SCORE;

    #[test]
    fn fixed_bins_clamp_at_both_ends() {
        let cfg = EngineConfig::default();
        let MetricKind::Fixed { bins } = &cfg.metric(DIFFERENCE_SCORE).unwrap().kind else {
            panic!("difference metric should be fixed");
        };
        assert_eq!(fixed_color(bins, -7.0), Some(bins[0].color));
        assert_eq!(fixed_color(bins, -0.5), Some(bins[1].color));
        assert_eq!(fixed_color(bins, 0.0), Some(bins[2].color));
        assert_eq!(fixed_color(bins, 1.0), Some(bins[4].color));
        assert_eq!(fixed_color(bins, 3.0), Some(bins[4].color));
        assert_eq!(fixed_color(&[], 0.0), None);
    }
}
