// File: crates/bars-core/src/format.rs
// Summary: Number formatting for tick and value labels.

/// Integer ("d") formatting: whole numbers print without a fraction, anything else is blank.
pub fn integer(v: f64) -> String {
    if !v.is_finite() || v.fract() != 0.0 {
        return String::new();
    }
    number(v)
}

/// Shortest representation of a number, with `-0` normalized to `0`.
pub fn number(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    if v.is_nan() {
        return "NaN".to_string();
    }
    format!("{v}")
}
