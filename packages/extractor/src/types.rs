//! Core data types for the extractor.

use std::collections::BTreeMap;

use serde::Serialize;

/// A report link found on the source page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    /// Facility ("Wasserwerk") name taken from the link title.
    pub facility: String,

    /// Absolute download URL of the report.
    pub url: String,
}

impl LinkEntry {
    /// Create a new link entry.
    pub fn new(facility: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            facility: facility.into(),
            url: url.into(),
        }
    }
}

/// A parsed numeric table value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Measurement {
    /// Whole number, e.g. `2`.
    Integer(i128),

    /// Decimal number, e.g. `1,23` in the report.
    Float(f64),
}

/// The eight metrics of one facility.
///
/// Field order and serialized names follow the report table. A field is
/// `None` when its cell could not be parsed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WaterMetrics {
    /// Total hardness.
    #[serde(rename = "haerte")]
    pub hardness: Option<Measurement>,

    pub calcium: Option<Measurement>,

    pub magnesium: Option<Measurement>,

    #[serde(rename = "natrium")]
    pub sodium: Option<Measurement>,

    #[serde(rename = "kalium")]
    pub potassium: Option<Measurement>,

    #[serde(rename = "chlorid")]
    pub chloride: Option<Measurement>,

    #[serde(rename = "nitrat")]
    pub nitrate: Option<Measurement>,

    /// Kept as labelled in the report, even if another compound is meant.
    #[serde(rename = "sulfit")]
    pub sulfite: Option<Measurement>,
}

impl WaterMetrics {
    /// Number of metrics in a record.
    pub const FIELD_COUNT: usize = 8;

    /// Serialized field names in table order.
    pub const FIELD_NAMES: [&'static str; Self::FIELD_COUNT] = [
        "haerte",
        "calcium",
        "magnesium",
        "natrium",
        "kalium",
        "chlorid",
        "nitrat",
        "sulfit",
    ];
}

/// Extraction result for one facility.
///
/// `Empty` stands for a report that could not be mapped (no table, or a
/// table of the wrong shape) and serializes as `{}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricRecord {
    Complete(WaterMetrics),
    Empty {},
}

impl MetricRecord {
    /// Whether this record carries no metrics.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty {})
    }

    /// Metrics of a complete record.
    #[must_use]
    pub fn metrics(&self) -> Option<&WaterMetrics> {
        match self {
            Self::Complete(metrics) => Some(metrics),
            Self::Empty {} => None,
        }
    }
}

/// Records keyed by facility name; the whole output of a run.
pub type ResultSet = BTreeMap<String, MetricRecord>;
