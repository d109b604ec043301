//! Field decoders that turn malformed backend values into `None` instead of
//! rejecting the whole page.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decodes any JSON value as `T`, yielding `None` for `null` or a value of
/// the wrong shape.
pub(crate) fn value<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

/// Accepts JSON numbers and numeric strings. Anything else is `None`.
pub(crate) fn decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(decimal_from_value))
}

fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                Some(Decimal::from(int))
            } else if let Some(uint) = number.as_u64() {
                Some(Decimal::from(uint))
            } else {
                number.as_f64().and_then(|float| Decimal::try_from(float).ok())
            }
        }
        Value::String(raw) => {
            let raw = raw.trim();
            raw.parse::<Decimal>()
                .ok()
                .or_else(|| Decimal::from_scientific(raw).ok())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn numbers_and_numeric_strings_decode() {
        assert_eq!(decimal_from_value(&json!(12)), Some(dec!(12)));
        assert_eq!(decimal_from_value(&json!(120.5)), Some(dec!(120.5)));
        assert_eq!(decimal_from_value(&json!(" 7.25 ")), Some(dec!(7.25)));
        assert_eq!(decimal_from_value(&json!("1e3")), Some(dec!(1000)));
    }

    #[test]
    fn other_shapes_are_none() {
        assert_eq!(decimal_from_value(&json!("twelve")), None);
        assert_eq!(decimal_from_value(&json!(true)), None);
        assert_eq!(decimal_from_value(&json!({ "value": 1 })), None);
    }
}
