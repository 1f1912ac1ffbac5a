// File: crates/bars-core/src/grid.rs
// Summary: Tick layout helpers (d3-style 1/2/5 tick steps over a linear extent).

/// Default number of ticks requested from a linear axis.
pub const DEFAULT_TICK_COUNT: usize = 10;

/// Step between ticks for `[start, stop]` aiming at roughly `count` ticks.
/// Returns 0.0 for degenerate extents.
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let (lo, hi) = if start <= stop { (start, stop) } else { (stop, start) };
    let span = hi - lo;
    if !(span > 0.0) || !span.is_finite() || count == 0 {
        return 0.0;
    }
    let m = count as f64;
    let unit = span / m;
    // Subnormal units have no representable power-of-ten step.
    if !unit.is_normal() {
        return 0.0;
    }
    let exponent = unit.log10().floor() as i32;
    let mut step = if exponent >= 0 { 10f64.powi(exponent) } else { 1.0 / 10f64.powi(-exponent) };
    let err = m / span * step;
    if err <= 0.15 {
        step *= 10.0;
    } else if err <= 0.35 {
        step *= 5.0;
    } else if err <= 0.75 {
        step *= 2.0;
    }
    step
}

/// Evenly spaced "nice" tick values inside `[start, stop]`, ascending.
/// A zero-span extent yields its single value.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    let (lo, hi) = if start <= stop { (start, stop) } else { (stop, start) };
    if !lo.is_finite() || !hi.is_finite() {
        return Vec::new();
    }
    let step = tick_step(lo, hi, count);
    if step == 0.0 {
        return vec![lo];
    }
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    // Integer division keeps 0.1-style steps free of accumulated error.
    let inverse = if step < 1.0 { Some((1.0 / step).round()) } else { None };
    (first..=last)
        .map(|i| match inverse {
            Some(inv) => i as f64 / inv,
            None => i as f64 * step,
        })
        .collect()
}
