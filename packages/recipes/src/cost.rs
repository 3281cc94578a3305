// ABOUTME: Decimal recipe cost with two decimal places
// ABOUTME: Serialized as a string such as "5.10"; accepts JSON strings or numbers

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use larder_core::ValidationError;

/// Digits allowed after the decimal point
pub const COST_DECIMAL_PLACES: i64 = 2;

/// Digits allowed in total
pub const COST_MAX_DIGITS: i64 = 5;

/// A non-negative amount with at most 3 integer and 2 fractional digits
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cost(BigDecimal);

impl Cost {
    pub fn new(value: BigDecimal) -> Result<Self, ValidationError> {
        if value < BigDecimal::from(0) {
            return Err(ValidationError::invalid("cost", "must not be negative"));
        }

        let (_, scale) = value.normalized().as_bigint_and_exponent();
        if scale > COST_DECIMAL_PLACES {
            return Err(ValidationError::invalid(
                "cost",
                format!("at most {} decimal places", COST_DECIMAL_PLACES),
            ));
        }

        let limit = BigDecimal::from(10i64.pow((COST_MAX_DIGITS - COST_DECIMAL_PLACES) as u32));
        if value >= limit {
            return Err(ValidationError::invalid(
                "cost",
                format!("at most {} digits in total", COST_MAX_DIGITS),
            ));
        }

        Ok(Self(value.with_scale(COST_DECIMAL_PLACES)))
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Cost {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = BigDecimal::from_str(s.trim())
            .map_err(|_| ValidationError::invalid("cost", format!("'{}' is not a number", s)))?;
        Self::new(value)
    }
}

impl Serialize for Cost {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cost {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CostVisitor;

        impl Visitor<'_> for CostVisitor {
            type Value = Cost;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal number or a string holding one")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Cost, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Cost, E> {
                Cost::new(BigDecimal::from(v)).map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Cost, E> {
                Cost::new(BigDecimal::from(v)).map_err(E::custom)
            }

            // Shortest round-trip form, so 5.1 stays 5.1 instead of its binary expansion
            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Cost, E> {
                if !v.is_finite() {
                    return Err(E::custom("cost must be finite"));
                }
                v.to_string().parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(CostVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("5.1", "5.10")]
    #[case("10.90", "10.90")]
    #[case("6", "6.00")]
    #[case("999.99", "999.99")]
    fn test_parse_and_display(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(input.parse::<Cost>().unwrap().to_string(), expected);
    }

    #[rstest]
    #[case("-1")]
    #[case("1.234")]
    #[case("1000")]
    #[case("abc")]
    fn test_rejects_invalid(#[case] input: &str) {
        assert!(input.parse::<Cost>().is_err());
    }

    #[test]
    fn test_json_round_trip_accepts_numbers_and_strings() {
        let from_number: Cost = serde_json::from_str("5.1").unwrap();
        let from_string: Cost = serde_json::from_str("\"5.10\"").unwrap();
        let from_int: Cost = serde_json::from_str("7").unwrap();

        assert_eq!(from_number, from_string);
        assert_eq!(serde_json::to_string(&from_number).unwrap(), "\"5.10\"");
        assert_eq!(from_int.to_string(), "7.00");
    }
}
