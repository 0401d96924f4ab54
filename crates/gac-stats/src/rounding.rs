// Presentation rounding. Output records keep full precision in memory and
// round to two decimals only when serialized or displayed.

use serde::Serializer;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn serialize_round2<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round2(*value))
}

pub(crate) fn serialize_round2_opt<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_some(&round2(*v)),
        None => serializer.serialize_none(),
    }
}
