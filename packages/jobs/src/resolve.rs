//! Category to property resolution.
//!
//! Values come from loosely typed JSON properties. Numbers and numeric
//! strings are accepted; anything else (missing, `null`, text, non-finite)
//! resolves to `None` so it renders as no data instead of failing.

use jobs_map_jobs_models::{Category, TractValues};
use serde_json::{Map, Value};

/// Reads the change and level values of `category` from `properties`.
#[must_use]
pub fn resolve(category: Category, properties: &Map<String, Value>) -> TractValues {
    TractValues {
        change: number(properties.get(&category.change_property())),
        level: number(properties.get(&category.level_property())),
    }
}

/// Reads the job density quintile (`0..=4`) from `properties`.
#[must_use]
pub fn resolve_quintile(properties: &Map<String, Value>) -> Option<u8> {
    let value = number(properties.get("quintile"))?;
    if value.fract() != 0.0 || !(0.0..=4.0).contains(&value) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(value as u8)
}

/// Coerces a JSON number or numeric string to a finite `f64`.
#[must_use]
pub fn number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}
