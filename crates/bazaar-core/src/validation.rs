//! # Validation Module
//!
//! Scalar field rules shared by the builders.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Mapper                                                       │
//! │  ├── Structural checks (record shape, column count)                    │
//! │  └── Fails with MapError::Malformed                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Builder                                                      │
//! │  ├── THIS MODULE: per-field rules                                      │
//! │  └── Collects every problem into one BuildError                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── PRIMARY KEY uniqueness                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bazaar_core::validation::{validate_price, validate_quantity};
//!
//! validate_price(0).unwrap();
//! validate_quantity(3).unwrap();
//! assert!(validate_quantity(0).is_err());
//! ```

use serde_json::Value;

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Text Validators
// =============================================================================

/// Validates a required text field supplied as a loosely-typed value.
///
/// ## Rules
/// - Absent, `null`, empty or whitespace-only is `Required`
/// - Anything other than a JSON string is `IncorrectType`
///
/// The string is returned untrimmed.
///
/// ## Example
/// ```rust
/// use bazaar_core::validation::validate_required_text;
/// use serde_json::json;
///
/// assert_eq!(validate_required_text("flavor", Some(&json!("Vanilla"))).unwrap(), "Vanilla");
/// assert!(validate_required_text("flavor", Some(&json!(""))).is_err());
/// assert!(validate_required_text("flavor", Some(&json!(["a"]))).is_err());
/// assert!(validate_required_text("flavor", None).is_err());
/// ```
pub fn validate_required_text(field: &str, value: Option<&Value>) -> ValidationResult<String> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::required(field)),
        Some(Value::String(text)) if text.trim().is_empty() => {
            Err(ValidationError::required(field))
        }
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => Err(ValidationError::IncorrectType {
            field: field.to_string(),
            expected: "a string",
            found: value_kind(other),
        }),
    }
}

/// Validates a bare identifier.
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an order quantity.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates an order price in whole currency units.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
pub fn validate_price(price: i64) -> ValidationResult<()> {
    if price < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Reads an integer out of a loosely-typed value.
///
/// Accepts JSON integers and strings that parse as one (delimited rows and
/// markup documents carry numbers as text). Floats with a fractional part
/// are rejected, and so are integral floats that do not fit in an `i64`.
///
/// ## Example
/// ```rust
/// use bazaar_core::validation::coerce_integer;
/// use serde_json::json;
///
/// assert_eq!(coerce_integer("price", &json!(30)).unwrap(), 30);
/// assert_eq!(coerce_integer("price", &json!(" 30 ")).unwrap(), 30);
/// assert!(coerce_integer("price", &json!("thirty")).is_err());
/// ```
pub fn coerce_integer(field: &str, value: &Value) -> ValidationResult<i64> {
    let incorrect = || ValidationError::IncorrectType {
        field: field.to_string(),
        expected: "an integer",
        found: value_kind(value),
    };

    match value {
        Value::Null => Err(ValidationError::required(field)),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(int), _) => Ok(int),
            (None, Some(f)) if f.fract() != 0.0 => Err(incorrect()),
            // `i64::MAX as f64` rounds up to 2^63, which is already out of range
            (None, Some(f)) if (i64::MIN as f64..i64::MAX as f64).contains(&f) => Ok(f as i64),
            (None, Some(_)) => Err(ValidationError::OutOfRange {
                field: field.to_string(),
                min: i64::MIN,
                max: i64::MAX,
            }),
            (None, None) => Err(incorrect()),
        },
        Value::String(text) if text.trim().is_empty() => Err(ValidationError::required(field)),
        Value::String(text) => text.trim().parse::<i64>().map_err(|_| incorrect()),
        _ => Err(incorrect()),
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Describes the JSON kind of a value for error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Normalizes a field name for tolerant lookup.
///
/// Lowercases and drops `_`, `-` and spaces, so `frostingType`,
/// `FrostingType`, `frosting_type` and `frosting-type` all collide.
///
/// ## Example
/// ```rust
/// use bazaar_core::validation::normalize_key;
///
/// assert_eq!(normalize_key("FrostingType"), "frostingtype");
/// assert_eq!(normalize_key("frosting_type"), "frostingtype");
/// ```
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_required_text() {
        assert_eq!(
            validate_required_text("shape", Some(&json!("Round"))).unwrap(),
            "Round"
        );

        // Missing variants all report Required
        for missing in [None, Some(json!(null)), Some(json!("")), Some(json!("   "))] {
            let err = validate_required_text("shape", missing.as_ref()).unwrap_err();
            assert!(err.is_missing(), "{missing:?} should be missing");
        }

        let err = validate_required_text("shape", Some(&json!(3))).unwrap_err();
        assert_eq!(
            err,
            ValidationError::IncorrectType {
                field: "shape".to_string(),
                expected: "a string",
                found: "a number",
            }
        );
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(10_000).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0).is_ok());
        assert!(validate_price(1099).is_ok());
        assert!(validate_price(-100).is_err());
    }

    #[test]
    fn test_coerce_integer() {
        assert_eq!(coerce_integer("quantity", &json!(3)).unwrap(), 3);
        assert_eq!(coerce_integer("quantity", &json!(3.0)).unwrap(), 3);
        assert_eq!(coerce_integer("quantity", &json!("-4")).unwrap(), -4);

        assert!(coerce_integer("quantity", &json!(3.5)).is_err());
        assert!(coerce_integer("quantity", &json!(true)).is_err());
        assert!(coerce_integer("quantity", &json!("")).unwrap_err().is_missing());
        assert!(coerce_integer("quantity", &json!(null)).unwrap_err().is_missing());
    }

    #[test]
    fn test_coerce_integer_rejects_floats_beyond_i64() {
        for value in [json!(1e20), json!(-1e20), json!(9.3e18), json!(f64::MAX)] {
            assert!(matches!(
                coerce_integer("price", &value),
                Err(ValidationError::OutOfRange { ref field, .. }) if field == "price"
            ));
        }

        assert_eq!(coerce_integer("price", &json!(1e15)).unwrap(), 1_000_000_000_000_000);
        assert_eq!(coerce_integer("price", &json!(-9.223372036854775808e18)).unwrap(), i64::MIN);
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("id", "order-1").is_ok());
        assert!(validate_id("id", " ").is_err());
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("OrderID"), "orderid");
        assert_eq!(normalize_key("special-ingredients"), "specialingredients");
        assert_eq!(normalize_key("Age Group"), "agegroup");
    }
}
