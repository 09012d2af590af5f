// Centralized ingestion limits for feature collections and configuration

// Feature collection caps
pub const MAX_FEATURES: usize = 200_000;

// Classification
pub const MIN_CLASSES: usize = 2;
pub const MAX_CLASSES: usize = 12;

// Color spectra
pub const MIN_SPECTRUM_STOPS: usize = 3;
pub const MAX_SPECTRUM_STOPS: usize = 32;

// Legend number formatting
pub const MAX_LABEL_DECIMALS: usize = 8;

#[inline]
pub fn in_class_bounds(k: usize) -> bool { (MIN_CLASSES..=MAX_CLASSES).contains(&k) }

#[inline]
pub fn in_stop_bounds(n: usize) -> bool { (MIN_SPECTRUM_STOPS..=MAX_SPECTRUM_STOPS).contains(&n) }
