//! Output rounding policy
//!
//! Values carried between years are never rounded. Money fields of the
//! output records are rounded to cents when serialized, and nowhere else.

use serde::Serializer;

#[inline]
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `serialize_with` helper for money fields
pub fn cents<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to_cents(*value))
}
