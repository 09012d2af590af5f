// Shared numeric helpers for scales and interval lookups

pub const EPS_DOMAIN: f64 = 1e-12;        // zero-width domain threshold

#[inline] pub fn clamp01(x: f64) -> f64 { x.max(0.0).min(1.0) }

#[inline]
pub fn safe_div(num: f64, den: f64, fallback: f64) -> f64 {
    if den.abs() <= EPS_DOMAIN { fallback } else { num / den }
}

/// Position of `x` inside `[lo, hi]` as a fraction, clamped to `[0, 1]`.
/// A zero-width domain maps everything to 0.
#[inline]
pub fn unit_position(x: f64, lo: f64, hi: f64) -> f64 {
    clamp01(safe_div(x - lo, hi - lo, 0.0))
}

#[inline]
pub fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
    let v = a as f64 + (b as f64 - a as f64) * clamp01(t);
    v.round().max(0.0).min(255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_position_clamps_and_handles_flat_domain() {
        assert_eq!(unit_position(5.0, 0.0, 10.0), 0.5);
        assert_eq!(unit_position(-3.0, 0.0, 10.0), 0.0);
        assert_eq!(unit_position(30.0, 0.0, 10.0), 1.0);
        assert_eq!(unit_position(4.0, 4.0, 4.0), 0.0);
    }

    #[test]
    fn lerp_u8_endpoints() {
        assert_eq!(lerp_u8(0, 255, 0.0), 0);
        assert_eq!(lerp_u8(0, 255, 1.0), 255);
        assert_eq!(lerp_u8(255, 0, 0.5), 128);
        assert_eq!(safe_div(1.0, 0.0, 7.0), 7.0);
    }
}
