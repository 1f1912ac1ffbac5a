// File: crates/bars-core/src/scale.rs
// Summary: Category (band) and value (linear) scales mapping data to plot pixels.

use std::collections::HashMap;

use crate::geometry::round_half_up;
use crate::grid::ticks;

/// Discrete scale mapping distinct category labels to rounded pixel bands.
///
/// Layout follows rounded-band semantics: with `n` categories, inner `padding`
/// and `outer_padding` (both in step fractions), the step is
/// `floor(span / (n - padding + 2 * outer_padding))`, the leftover pixels are
/// split evenly on both sides, and each band is `round(step * (1 - padding))` wide.
#[derive(Clone, Debug, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    index: HashMap<String, usize>,
    range: (f64, f64),
    padding: f64,
    outer_padding: f64,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    /// Build over the distinct labels of `domain`, keeping first-seen order.
    pub fn new<I, S>(domain: I, range: (f64, f64), padding: f64, outer_padding: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut s = Self {
            domain: Vec::new(),
            index: HashMap::new(),
            range,
            padding,
            outer_padding,
            start: range.0,
            step: 0.0,
            bandwidth: 0.0,
        };
        s.set_domain(domain);
        s
    }

    /// Replace the domain (deduplicated, order kept) and recompute the bands.
    pub fn set_domain<I, S>(&mut self, domain: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domain.clear();
        self.index.clear();
        for label in domain {
            let label = label.into();
            if !self.index.contains_key(&label) {
                self.index.insert(label.clone(), self.domain.len());
                self.domain.push(label);
            }
        }
        self.rescale();
    }

    fn rescale(&mut self) {
        let (lo, hi) = self.range;
        let n = self.domain.len() as f64;
        let denom = n - self.padding + 2.0 * self.outer_padding;
        self.step = if denom > 0.0 { ((hi - lo) / denom).floor() } else { 0.0 };
        let error = hi - lo - (n - self.padding) * self.step;
        self.start = lo + round_half_up(error / 2.0);
        self.bandwidth = round_half_up(self.step * (1.0 - self.padding));
    }

    /// Pixel start of the band for `label`.
    pub fn map(&self, label: &str) -> Option<f64> {
        self.index_of(label).map(|i| self.start + self.step * i as f64)
    }

    /// Pixel centre of the band for `label`.
    pub fn center(&self, label: &str) -> Option<f64> {
        self.map(label).map(|p| p + self.bandwidth / 2.0)
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn domain(&self) -> &[String] { &self.domain }
    pub fn range(&self) -> (f64, f64) { self.range }
    pub fn bandwidth(&self) -> f64 { self.bandwidth }
    pub fn step(&self) -> f64 { self.step }
    pub fn len(&self) -> usize { self.domain.len() }
    pub fn is_empty(&self) -> bool { self.domain.is_empty() }
}

/// Continuous scale mapping a numeric domain onto a pixel range.
/// A zero-width domain maps every value onto the start of the range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    #[inline]
    pub fn map(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return r0;
        }
        r0 + (v - d0) / span * (r1 - r0)
    }

    pub fn set_domain(&mut self, domain: (f64, f64)) {
        self.domain = domain;
    }

    pub fn domain(&self) -> (f64, f64) { self.domain }
    pub fn range(&self) -> (f64, f64) { self.range }

    /// Nice tick values across the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }
}
