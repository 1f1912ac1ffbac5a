// File: crates/bars-core/src/data.rs
// Summary: Input records for the three chart kinds, with lenient numeric coercion.
// Notes:
// - The vertical chart reads `{x: category, y: value}` while the horizontal chart
//   reads `{x: value, y: category}`. Both normalize to `Datum`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Normalized simple-chart record.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Datum {
    pub category: String,
    pub value: f64,
}

impl Datum {
    pub fn new(category: impl Into<String>, value: f64) -> Self {
        Self { category: category.into(), value }
    }
}

/// Vertical bar record: `x` is the category, `y` the value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarDatum {
    #[serde(rename = "x", deserialize_with = "lenient_label")]
    pub category: String,
    #[serde(rename = "y", deserialize_with = "lenient_number")]
    pub value: f64,
}

impl BarDatum {
    pub fn new(category: impl Into<String>, value: f64) -> Self {
        Self { category: category.into(), value }
    }
}

impl From<BarDatum> for Datum {
    fn from(d: BarDatum) -> Self { Datum { category: d.category, value: d.value } }
}

/// Horizontal bar record: `y` is the category, `x` the value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HorizontalBarDatum {
    #[serde(rename = "y", deserialize_with = "lenient_label")]
    pub category: String,
    #[serde(rename = "x", deserialize_with = "lenient_number")]
    pub value: f64,
}

impl HorizontalBarDatum {
    pub fn new(category: impl Into<String>, value: f64) -> Self {
        Self { category: category.into(), value }
    }
}

impl From<HorizontalBarDatum> for Datum {
    fn from(d: HorizontalBarDatum) -> Self { Datum { category: d.category, value: d.value } }
}

/// One stacked layer: a named list of category/value pairs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<BarDatum>,
}

impl Series {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(|(c, v)| BarDatum::new(c, v)).collect(),
        }
    }

    pub fn categories(&self) -> Vec<String> {
        self.values.iter().map(|d| d.category.clone()).collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(f64),
    Text(String),
}

/// Accepts a JSON number or a numeric string (`"12"`, `" 3.5 "`).
pub fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Scalar::deserialize(deserializer)? {
        Scalar::Number(v) => Ok(v),
        Scalar::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("non-numeric value {s:?}"))),
    }
}

/// Accepts a string or a number used as a category label (e.g. years).
pub fn lenient_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Number(v) => crate::format::number(v),
        Scalar::Text(s) => s,
    })
}
