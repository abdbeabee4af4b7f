//! Mapping of extracted table values to a [`MetricRecord`].

use crate::number::parse_number;
use crate::types::{MetricRecord, WaterMetrics};

/// Build a record from the raw values of the metric rows.
///
/// `values` must hold exactly [`WaterMetrics::FIELD_COUNT`] cells in table
/// order (hardness, calcium, magnesium, sodium, potassium, chloride,
/// nitrate, sulfite). Any other length gives [`MetricRecord::Empty`].
pub fn map_row<S: AsRef<str>>(values: &[S]) -> MetricRecord {
    let [hardness, calcium, magnesium, sodium, potassium, chloride, nitrate, sulfite] = values
    else {
        tracing::error!(
            expected = WaterMetrics::FIELD_COUNT,
            actual = values.len(),
            "Can't handle input data"
        );
        return MetricRecord::Empty {};
    };

    let parse = |value: &S| parse_number(value.as_ref());

    MetricRecord::Complete(WaterMetrics {
        hardness: parse(hardness),
        calcium: parse(calcium),
        magnesium: parse(magnesium),
        sodium: parse(sodium),
        potassium: parse(potassium),
        chloride: parse(chloride),
        nitrate: parse(nitrate),
        sulfite: parse(sulfite),
    })
}
