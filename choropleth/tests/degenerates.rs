use choropleth::algorithms::jenks::compute_breaks;
use choropleth::store::classify;
use choropleth::ColorSpectrum;

#[test]
fn empty_sample_has_no_breaks() {
    assert!(compute_breaks(&[], 5).is_none());
}

#[test]
fn few_distinct_values_are_padded() {
    let b = compute_breaks(&[1.0, 2.0, 2.0, 3.0, 100.0], 5).unwrap();
    assert_eq!(b.len(), 6);
    assert_eq!(b.min(), 1.0);
    assert_eq!(b.max(), 100.0);
    assert_eq!(b.as_slice(), &[1.0, 2.0, 3.0, 100.0, 100.0, 100.0]);
}

#[test]
fn single_value_sample() {
    let b = compute_breaks(&[4.2], 3).unwrap();
    assert_eq!(b.as_slice(), &[4.2, 4.2, 4.2, 4.2]);
    assert_eq!(b.class_of(4.2), 2);
}

#[test]
fn distinct_count_equal_to_k() {
    let b = compute_breaks(&[3.0, 1.0, 2.0, 1.0, 3.0], 3).unwrap();
    assert_eq!(b.as_slice(), &[1.0, 2.0, 3.0, 3.0]);
    assert_eq!(b.class_of(1.0), 0);
    assert_eq!(b.class_of(2.0), 1);
    assert_eq!(b.class_of(3.0), 2);
}

#[test]
fn one_more_distinct_than_k_uses_full_algorithm() {
    let b = compute_breaks(&[1.0, 1.0, 2.0, 3.0, 4.0], 3).unwrap();
    assert_eq!(b.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn midpoint_split_of_linear_run() {
    let sample: Vec<f64> = (1..=10).map(f64::from).collect();
    let b = compute_breaks(&sample, 2).unwrap();
    assert_eq!(b.as_slice(), &[1.0, 6.0, 10.0]);
}

#[test]
fn negative_and_fractional_values() {
    let sample = [-1.0, -0.95, -0.9, 0.0, 0.02, -0.01, 0.9, 0.95, 1.0];
    let b = compute_breaks(&sample, 3).unwrap();
    assert_eq!(b.as_slice(), &[-1.0, -0.01, 0.9, 1.0]);
}

#[test]
fn classify_keeps_top_break_at_sample_max() {
    let spectrum = ColorSpectrum::from_hex(&["#f1eef6", "#74a9cf", "#045a8d"]).unwrap();
    let sample = [0.1, 0.2, 0.3, 5.0, 5.1, 9.99];
    let c = classify(&sample, 2, &spectrum).unwrap();
    assert_eq!(c.breaks.max(), 9.99);
    assert_eq!(c.scale.color(9.99), c.scale.colors()[1]);
    assert_eq!(c.scale.colors().len(), 2);
}
