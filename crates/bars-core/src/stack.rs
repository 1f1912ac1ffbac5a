// File: crates/bars-core/src/stack.rs
// Summary: Stack layout for multi-series bars: per-category baselines (y0) and both maxima.

use crate::data::Series;
use crate::error::{ChartError, Result};

/// A series value with its stacked baseline.
#[derive(Clone, Debug, PartialEq)]
pub struct StackedPoint {
    pub category: String,
    /// Sum of the preceding series' values at this category.
    pub y0: f64,
    pub y: f64,
}

impl StackedPoint {
    pub fn top(&self) -> f64 { self.y0 + self.y }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub name: String,
    pub points: Vec<StackedPoint>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StackLayout {
    pub layers: Vec<Layer>,
    /// Categories in the first series' order.
    pub categories: Vec<String>,
    /// Largest stack top across categories.
    pub stack_max: f64,
    /// Largest single value across all series.
    pub group_max: f64,
}

/// Every series must list the first series' categories, in the same order.
pub fn validate(series: &[Series]) -> Result<()> {
    let Some(first) = series.first() else { return Ok(()) };
    let expected = first.categories();
    for s in series {
        for d in &s.values {
            if !d.value.is_finite() {
                return Err(ChartError::NonFiniteValue { category: d.category.clone() });
            }
        }
        let found = s.categories();
        if found != expected {
            return Err(ChartError::MismatchedCategories {
                series: s.name.clone(),
                expected: expected.clone(),
                found,
            });
        }
    }
    Ok(())
}

/// Validate and stack `series` with a zero baseline in series order.
pub fn stack(series: &[Series]) -> Result<StackLayout> {
    validate(series)?;
    let categories = series.first().map(Series::categories).unwrap_or_default();
    let mut running = vec![0.0; categories.len()];
    let mut layers = Vec::with_capacity(series.len());
    let mut stack_max = 0.0f64;
    let mut group_max = 0.0f64;
    let mut any = false;

    for s in series {
        let points = s
            .values
            .iter()
            .zip(running.iter_mut())
            .map(|(d, base)| {
                let p = StackedPoint { category: d.category.clone(), y0: *base, y: d.value };
                *base += d.value;
                p
            })
            .collect::<Vec<_>>();
        for p in &points {
            if any {
                stack_max = stack_max.max(p.top());
                group_max = group_max.max(p.y);
            } else {
                stack_max = p.top();
                group_max = p.y;
                any = true;
            }
        }
        layers.push(Layer { name: s.name.clone(), points });
    }

    log::debug!("stacked {} layers over {} categories (stack max {stack_max}, group max {group_max})",
        layers.len(), categories.len());
    Ok(StackLayout { layers, categories, stack_max, group_max })
}
