//! The car record and the validation applied before anything reaches storage.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Matches the `VARCHAR(100)` width of the brand/model columns.
pub const MAX_TEXT_LEN: usize = 100;

pub const MIN_YEAR: i32 = 1000;
pub const MAX_YEAR: i32 = 9999;

/// Upper bound (exclusive) of a `NUMERIC(10,2)` value.
const MAX_PRICE: i64 = 100_000_000;

/// A stored row. `id` is assigned by storage and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Car {
    pub id: i32,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: Decimal,
}

/// The mutable fields of a car, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarDraft {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} exceeds maximum length of {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be {expected}, got '{value}'")]
    Malformed {
        field: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{field} is out of range: {reason}")]
    OutOfRange {
        field: &'static str,
        reason: &'static str,
    },
}

impl CarDraft {
    /// Validates raw form values. Text is trimmed; the price is rounded to cents.
    pub fn parse(
        brand: Option<&str>,
        model: Option<&str>,
        year: Option<&str>,
        price: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let brand = required_text("brand", brand)?;
        let model = required_text("model", model)?;

        let year_raw = required("year", year)?;
        let year = year_raw
            .parse::<i32>()
            .map_err(|_| ValidationError::Malformed {
                field: "year",
                expected: "a whole number",
                value: year_raw.to_string(),
            })?;
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(ValidationError::OutOfRange {
                field: "year",
                reason: "expected a four-digit year",
            });
        }

        let price_raw = required("price", price)?;
        let price = Decimal::from_str(price_raw).map_err(|_| ValidationError::Malformed {
            field: "price",
            expected: "a decimal number",
            value: price_raw.to_string(),
        })?;
        if price.is_sign_negative() && !price.is_zero() {
            return Err(ValidationError::OutOfRange {
                field: "price",
                reason: "must not be negative",
            });
        }
        let price = price.round_dp(2);
        if price >= Decimal::from(MAX_PRICE) {
            return Err(ValidationError::OutOfRange {
                field: "price",
                reason: "must be below 100000000",
            });
        }

        Ok(Self {
            brand,
            model,
            year,
            price,
        })
    }
}

fn required<'a>(field: &'static str, raw: Option<&'a str>) -> Result<&'a str, ValidationError> {
    match raw.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::Missing { field }),
    }
}

fn required_text(field: &'static str, raw: Option<&str>) -> Result<String, ValidationError> {
    let value = required(field, raw)?;
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_TEXT_LEN,
        });
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(b: &str, m: &str, y: &str, p: &str) -> Result<CarDraft, ValidationError> {
        CarDraft::parse(Some(b), Some(m), Some(y), Some(p))
    }

    #[test]
    fn accepts_well_formed_input() {
        let draft = parse(" Toyota ", "Corolla", "2020", "18000.00").unwrap();
        assert_eq!(draft.brand, "Toyota");
        assert_eq!(draft.model, "Corolla");
        assert_eq!(draft.year, 2020);
        assert_eq!(draft.price, Decimal::new(1_800_000, 2));
    }

    #[test]
    fn missing_and_blank_fields_are_rejected() {
        let err = CarDraft::parse(None, Some("Corolla"), Some("2020"), Some("1")).unwrap_err();
        assert_eq!(err, ValidationError::Missing { field: "brand" });

        let err = parse("Toyota", "   ", "2020", "1").unwrap_err();
        assert_eq!(err, ValidationError::Missing { field: "model" });

        let err = parse("Toyota", "Corolla", "", "1").unwrap_err();
        assert_eq!(err, ValidationError::Missing { field: "year" });
    }

    #[test]
    fn numbers_must_be_well_formed() {
        let err = parse("Toyota", "Corolla", "twenty", "1").unwrap_err();
        assert!(matches!(err, ValidationError::Malformed { field: "year", .. }));

        let err = parse("Toyota", "Corolla", "2020", "12,5").unwrap_err();
        assert!(matches!(err, ValidationError::Malformed { field: "price", .. }));
    }

    #[test]
    fn ranges_are_enforced() {
        let err = parse("Toyota", "Corolla", "99", "1").unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "year", .. }));

        let err = parse("Toyota", "Corolla", "2020", "-1").unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "price", .. }));

        let err = parse("Toyota", "Corolla", "2020", "100000000").unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "price", .. }));
    }

    #[test]
    fn price_is_rounded_to_cents() {
        let draft = parse("Toyota", "Corolla", "2020", "19999.999").unwrap();
        assert_eq!(draft.price, Decimal::new(2_000_000, 2));
    }

    #[test]
    fn long_text_is_rejected() {
        let long = "x".repeat(MAX_TEXT_LEN + 1);
        let err = parse(&long, "Corolla", "2020", "1").unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooLong {
                field: "brand",
                max: MAX_TEXT_LEN
            }
        );
    }

    #[test]
    fn error_display() {
        let err = ValidationError::Missing { field: "price" };
        assert_eq!(err.to_string(), "price is required");
    }
}
