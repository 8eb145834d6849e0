use serde::{Deserialize, Deserializer};
use serde_json::Value;

// The POS API is loose about numeric fields: amounts arrive as JSON numbers,
// numeric strings, or not at all. Anything that does not parse as a finite
// number counts as zero so a bad record never pushes NaN into a total.

pub fn coerce_f64(value: &Value) -> f64 {
    numeric(value).unwrap_or(0.0)
}

pub fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

pub fn f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_f64(&value))
}

pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(numeric(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_pass_through() {
        assert_eq!(coerce_f64(&json!(500)), 500.0);
        assert_eq!(coerce_f64(&json!(12.5)), 12.5);
    }

    #[test]
    fn numeric_strings_are_parsed() {
        assert_eq!(coerce_f64(&json!("300")), 300.0);
        assert_eq!(coerce_f64(&json!(" 75.25 ")), 75.25);
    }

    #[test]
    fn garbage_counts_as_zero() {
        assert_eq!(coerce_f64(&json!("n/a")), 0.0);
        assert_eq!(coerce_f64(&json!(null)), 0.0);
        assert_eq!(coerce_f64(&json!({"nested": true})), 0.0);
        assert_eq!(coerce_f64(&json!([1, 2])), 0.0);
    }

    #[test]
    fn numeric_distinguishes_absent_from_zero() {
        assert_eq!(numeric(&json!(0)), Some(0.0));
        assert_eq!(numeric(&json!("oops")), None);
        assert_eq!(numeric(&json!(null)), None);
    }
}
