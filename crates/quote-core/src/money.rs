//! Currency amounts and lenient numeric coercion.
//!
//! Every money field in a quotation is a [`Decimal`]. Operator input and
//! stored JSON are never rejected for being non-numeric: anything that does
//! not parse becomes zero. Event costs and add-on prices are additionally
//! clamped at zero.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// One hundred, the percentage divisor.
pub const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Parse operator input into an amount. Empty or non-numeric input is zero.
///
/// Accepts plain decimals (`"1500.50"`) and scientific notation (`"1.5e3"`).
/// Values outside the `Decimal` range (`"1e29"`) are invalid and become zero.
pub fn coerce(raw: &str) -> Decimal {
    let s = raw.trim();
    if s.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .unwrap_or(Decimal::ZERO)
}

/// Clamp an amount at zero.
pub fn non_negative(amount: Decimal) -> Decimal {
    amount.max(Decimal::ZERO)
}

/// Coerce input for a price field (event cost, add-on price).
pub fn coerce_price(raw: &str) -> Decimal {
    non_negative(coerce(raw))
}

/// Coerce an arbitrary JSON value into an amount.
pub fn from_json(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Decimal::from(i),
            None => coerce(&n.to_string()),
        },
        Value::String(s) => coerce(s),
        _ => Decimal::ZERO,
    }
}

/// Sum amounts; an empty iterator sums to zero. Saturates at
/// `Decimal::MAX`/`Decimal::MIN` instead of overflowing.
pub fn sum<I: IntoIterator<Item = Decimal>>(amounts: I) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, a| acc.saturating_add(a))
}

/// `amount * percent / 100`, saturating when the product is out of range.
pub fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    match amount.checked_mul(percent) {
        Some(product) => product / HUNDRED,
        None => (amount / HUNDRED).saturating_mul(percent),
    }
}

fn to_json_number(amount: &Decimal) -> Value {
    if amount.fract().is_zero() {
        if let Some(i) = amount.to_i64() {
            return Value::from(i);
        }
    }
    serde_json::Number::from_f64(amount.to_f64().unwrap_or(0.0))
        .map(Value::Number)
        .unwrap_or_else(|| Value::from(0))
}

/// Serde adapter: write a plain number, read anything (garbage is zero).
pub mod lenient {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(amount: &Decimal, s: S) -> Result<S::Ok, S::Error> {
        to_json_number(amount).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(value.as_ref().map(from_json).unwrap_or(Decimal::ZERO))
    }
}

/// Like [`lenient`], clamped at zero on read.
pub mod lenient_price {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &Decimal, s: S) -> Result<S::Ok, S::Error> {
        super::lenient::serialize(amount, s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
        super::lenient::deserialize(d).map(non_negative)
    }
}

/// Optional amount: missing or `null` stays `None`, anything else coerces.
pub mod lenient_opt {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(amount: &Option<Decimal>, s: S) -> Result<S::Ok, S::Error> {
        amount.as_ref().map(to_json_number).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Decimal>, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(match value {
            None | Some(Value::Null) => None,
            Some(v) => Some(from_json(&v)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_plain_and_scientific() {
        assert_eq!(coerce("25000"), Decimal::from(25000));
        assert_eq!(coerce("  1500.50 "), Decimal::new(150050, 2));
        assert_eq!(coerce("1.5e3"), Decimal::from(1500));
    }

    #[test]
    fn coerce_garbage_is_zero() {
        assert_eq!(coerce(""), Decimal::ZERO);
        assert_eq!(coerce("abc"), Decimal::ZERO);
        assert_eq!(coerce("12,000"), Decimal::ZERO);
    }

    #[test]
    fn coerce_keeps_negative_but_price_clamps() {
        assert_eq!(coerce("-500"), Decimal::from(-500));
        assert_eq!(coerce_price("-500"), Decimal::ZERO);
        assert_eq!(coerce_price("500"), Decimal::from(500));
    }

    #[test]
    fn from_json_variants() {
        assert_eq!(from_json(&serde_json::json!(40000)), Decimal::from(40000));
        assert_eq!(from_json(&serde_json::json!(0.5)), Decimal::new(5, 1));
        assert_eq!(from_json(&serde_json::json!("15000")), Decimal::from(15000));
        assert_eq!(from_json(&serde_json::json!(null)), Decimal::ZERO);
        assert_eq!(from_json(&serde_json::json!(true)), Decimal::ZERO);
        assert_eq!(from_json(&serde_json::json!([1, 2])), Decimal::ZERO);
    }

    #[test]
    fn percent_of_is_exact() {
        assert_eq!(
            percent_of(Decimal::from(75000), Decimal::from(30)),
            Decimal::from(22500)
        );
    }

    #[test]
    fn out_of_range_input_is_zero() {
        assert_eq!(coerce("79228162514264337593543950335"), Decimal::MAX);
        assert_eq!(coerce("79228162514264337593543950336"), Decimal::ZERO);
        assert_eq!(coerce("1e29"), Decimal::ZERO);
    }

    #[test]
    fn sum_saturates() {
        assert_eq!(sum([Decimal::MAX, Decimal::MAX]), Decimal::MAX);
        assert_eq!(sum([Decimal::MIN, Decimal::from(-1)]), Decimal::MIN);
        assert_eq!(sum(Vec::new()), Decimal::ZERO);
    }

    #[test]
    fn percent_of_saturates_or_divides_first() {
        assert_eq!(percent_of(Decimal::MAX, Decimal::from(1_000_000)), Decimal::MAX);
        assert_eq!(percent_of(Decimal::MIN, Decimal::from(1_000_000)), Decimal::MIN);
        // 1e9 * 1e20 overflows, 1e7 * 1e20 does not.
        assert_eq!(
            percent_of(Decimal::from(1_000_000_000), coerce("100000000000000000000")),
            coerce("1000000000000000000000000000")
        );
    }

    #[test]
    fn serialize_whole_amounts_as_integers() {
        assert_eq!(to_json_number(&Decimal::from(22500)), serde_json::json!(22500));
        assert_eq!(to_json_number(&Decimal::new(12345, 2)), serde_json::json!(123.45));
    }
}
