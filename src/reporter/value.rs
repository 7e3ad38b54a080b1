use rust_decimal::prelude::ToPrimitive;

use crate::backend::TypedValue;
use crate::registry::GaugeValue;

/// Maps a gauge reading onto the two wire value types. Integer widths up to
/// 64 bits widen losslessly to `int64Value`; floats become `doubleValue`;
/// 128-bit integers and decimals are narrowed to a double, accepting
/// precision loss. Non-numeric readings yield `None` and the caller drops
/// that one metric from the export instead of failing the cycle.
pub fn typed_value(value: &GaugeValue) -> Option<TypedValue> {
    match value {
        GaugeValue::I8(v) => Some(TypedValue::Int64Value(i64::from(*v))),
        GaugeValue::I16(v) => Some(TypedValue::Int64Value(i64::from(*v))),
        GaugeValue::I32(v) => Some(TypedValue::Int64Value(i64::from(*v))),
        GaugeValue::I64(v) => Some(TypedValue::Int64Value(*v)),
        GaugeValue::F32(v) => Some(TypedValue::DoubleValue(f64::from(*v))),
        GaugeValue::F64(v) => Some(TypedValue::DoubleValue(*v)),
        GaugeValue::I128(v) => Some(TypedValue::DoubleValue(*v as f64)),
        GaugeValue::Decimal(v) => v.to_f64().map(TypedValue::DoubleValue),
        GaugeValue::Text(_) => None,
    }
}
