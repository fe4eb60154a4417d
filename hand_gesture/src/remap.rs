//! Linear range remapping.

/// Map `value` from the `from` range onto the `to` range.
///
/// Never clamps: a value outside `from` extrapolates outside `to`.  Either
/// range may be decreasing.  A zero-width `from` range maps everything to
/// `to.0`.
pub fn remap(value: f32, from: (f32, f32), to: (f32, f32)) -> f32 {
    let span = from.1 - from.0;
    if span == 0.0 {
        return to.0;
    }
    to.0 + (value - from.0) * (to.1 - to.0) / span
}

/// [`remap`], then clamp into the `to` range whichever way round it runs.
pub fn remap_clamped(value: f32, from: (f32, f32), to: (f32, f32)) -> f32 {
    let (lo, hi) = if to.0 <= to.1 { (to.0, to.1) } else { (to.1, to.0) };
    remap(value, from, to).clamp(lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_and_midpoint() {
        assert_eq!(remap(50.0, (50.0, 300.0), (-65.25, 0.0)), -65.25);
        assert_eq!(remap(300.0, (50.0, 300.0), (-65.25, 0.0)), 0.0);
        assert!((remap(175.0, (50.0, 300.0), (0.0, 100.0)) - 50.0).abs() < 1e-4);
    }

    #[test]
    fn extrapolates_without_clamp() {
        assert_eq!(remap(0.0, (75.0, 1205.0), (0.0, 1130.0)), -75.0);
        assert_eq!(remap(400.0, (50.0, 300.0), (0.0, 250.0)), 350.0);
    }

    #[test]
    fn decreasing_target() {
        // HUD bar: 0 % at the bottom (720), 100 % at the top (150).
        assert_eq!(remap(0.0, (0.0, 100.0), (720.0, 150.0)), 720.0);
        assert_eq!(remap(100.0, (0.0, 100.0), (720.0, 150.0)), 150.0);
        assert_eq!(remap_clamped(150.0, (0.0, 100.0), (720.0, 150.0)), 150.0);
    }

    #[test]
    fn clamped_variant_holds_range() {
        assert_eq!(remap_clamped(10.0, (50.0, 300.0), (0.0, 100.0)), 0.0);
        assert_eq!(remap_clamped(900.0, (50.0, 300.0), (0.0, 100.0)), 100.0);
    }

    #[test]
    fn degenerate_source_range() {
        assert_eq!(remap(3.0, (1.0, 1.0), (10.0, 20.0)), 10.0);
    }
}
