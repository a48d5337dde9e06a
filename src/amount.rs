//! A non-negative currency amount stored as a whole number of cents.
//!
//! Summing many small `f64` values drifts, e.g. `0.1 + 0.2 != 0.3`, so amounts
//! are kept as integer cents from the moment they are parsed until they are
//! written back out as JSON.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Visitor};

use crate::Error;

/// The number of cents in one dollar.
const CENTS_PER_DOLLAR: i64 = 100;

/// A non-negative amount of money with a precision of one cent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    /// An amount of zero.
    pub const ZERO: Amount = Amount(0);

    /// Create an amount from a whole number of cents.
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] if `cents` is negative.
    pub fn from_cents(cents: i64) -> Result<Self, Error> {
        if cents < 0 {
            Err(Error::validation("amount", "amount must not be negative"))
        } else {
            Ok(Self(cents))
        }
    }

    /// The amount as a whole number of cents.
    pub fn cents(self) -> i64 {
        self.0
    }

    /// The amount in dollars.
    ///
    /// Only use this for display and serialization, never for arithmetic.
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / CENTS_PER_DOLLAR as f64
    }

    /// Whether the amount is zero.
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Add two amounts, returning `None` on overflow.
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Sum `amounts` exactly.
    ///
    /// # Errors
    ///
    /// Returns an [Error::AmountOverflow] if the total does not fit in an `i64`.
    pub fn sum<I>(amounts: I) -> Result<Amount, Error>
    where
        I: IntoIterator<Item = Amount>,
    {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, |total, amount| total.checked_add(amount))
            .ok_or(Error::AmountOverflow)
    }
}

impl FromStr for Amount {
    type Err = Error;

    /// Parse a decimal string such as "12", "12.3" or "12.34".
    ///
    /// Signs, exponents and more than two decimal places are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || {
            Error::validation(
                "amount",
                format!("\"{s}\" is not a valid amount, expected a number with at most two decimal places"),
            )
        };

        let text = s.trim();
        let (whole, fraction) = match text.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (text, ""),
        };

        if whole.is_empty()
            || fraction.len() > 2
            || !whole.bytes().all(|byte| byte.is_ascii_digit())
            || !fraction.bytes().all(|byte| byte.is_ascii_digit())
            || text.ends_with('.')
        {
            return Err(malformed());
        }

        let too_large = || Error::validation("amount", "amount is too large");

        let whole: i64 = whole.parse().map_err(|_| too_large())?;
        let fraction: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| malformed())? * 10,
            _ => fraction.parse().map_err(|_| malformed())?,
        };

        whole
            .checked_mul(CENTS_PER_DOLLAR)
            .and_then(|cents| cents.checked_add(fraction))
            .map(Amount)
            .ok_or_else(too_large)
    }
}

impl TryFrom<f64> for Amount {
    type Error = Error;

    /// Convert a JSON number into an amount.
    ///
    /// The shortest representation of `value` that round-trips is parsed as a
    /// decimal string, so `0.1` becomes exactly 10 cents.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(Error::validation("amount", "amount must be a finite number"));
        }

        if value < 0.0 {
            return Err(Error::validation("amount", "amount must not be negative"));
        }

        value.to_string().parse()
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{:02}",
            self.0 / CENTS_PER_DOLLAR,
            self.0 % CENTS_PER_DOLLAR
        )
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a non-negative number with at most two decimal places")
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        i64::try_from(value)
            .ok()
            .and_then(|dollars| dollars.checked_mul(CENTS_PER_DOLLAR))
            .map(Amount)
            .ok_or_else(|| E::custom("amount is too large"))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        if value < 0 {
            return Err(E::custom("amount must not be negative"));
        }

        value
            .checked_mul(CENTS_PER_DOLLAR)
            .map(Amount)
            .ok_or_else(|| E::custom("amount is too large"))
    }

    fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Amount::try_from(value).map_err(E::custom)
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        value.parse().map_err(E::custom)
    }
}

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let cents = i64::column_result(value)?;

        Amount::from_cents(cents).map_err(|_| FromSqlError::OutOfRange(cents))
    }
}

#[cfg(test)]
mod tests {
    use super::Amount;
    use crate::Error;

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!("12".parse(), Ok(Amount(1200)));
        assert_eq!("12.3".parse(), Ok(Amount(1230)));
        assert_eq!("12.34".parse(), Ok(Amount(1234)));
        assert_eq!("0.05".parse(), Ok(Amount(5)));
        assert_eq!(" 7.00 ".parse(), Ok(Amount(700)));
    }

    #[test]
    fn rejects_malformed_amounts() {
        for text in ["", ".", "1.", ".5", "-1", "+1", "1.234", "1e3", "abc", "1.2.3"] {
            let result = text.parse::<Amount>();

            assert!(
                matches!(result, Err(Error::Validation { field: "amount", .. })),
                "want validation error for {text:?}, got {result:?}"
            );
        }
    }

    #[test]
    fn rejects_amounts_that_overflow() {
        let result = "92233720368547758.08".parse::<Amount>();

        assert!(matches!(result, Err(Error::Validation { .. })));
    }

    #[test]
    fn converts_floats_without_drift() {
        assert_eq!(Amount::try_from(0.1), Ok(Amount(10)));
        assert_eq!(Amount::try_from(19.99), Ok(Amount(1999)));
        assert_eq!(Amount::try_from(15.0), Ok(Amount(1500)));
    }

    #[test]
    fn rejects_negative_and_non_finite_floats() {
        assert!(Amount::try_from(-0.01).is_err());
        assert!(Amount::try_from(f64::NAN).is_err());
        assert!(Amount::try_from(f64::INFINITY).is_err());
        assert!(Amount::try_from(1.005).is_err());
    }

    #[test]
    fn sums_many_small_amounts_exactly() {
        let amounts = std::iter::repeat_n(Amount::try_from(0.1).unwrap(), 1000);

        let total = Amount::sum(amounts).unwrap();

        assert_eq!(total, Amount(10_000));
        assert_eq!(total.to_string(), "100.00");
    }

    #[test]
    fn sum_reports_overflow() {
        let amounts = [Amount(i64::MAX), Amount(1)];

        assert_eq!(Amount::sum(amounts), Err(Error::AmountOverflow));
    }

    #[test]
    fn displays_two_decimal_places() {
        assert_eq!(Amount(5).to_string(), "0.05");
        assert_eq!(Amount(1230).to_string(), "12.30");
        assert_eq!(Amount::ZERO.to_string(), "0.00");
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let from_int: Amount = serde_json::from_str("15").unwrap();
        let from_float: Amount = serde_json::from_str("12.5").unwrap();
        let from_string: Amount = serde_json::from_str("\"3.21\"").unwrap();

        assert_eq!(from_int, Amount(1500));
        assert_eq!(from_float, Amount(1250));
        assert_eq!(from_string, Amount(321));
    }

    #[test]
    fn deserialize_rejects_negative_numbers() {
        assert!(serde_json::from_str::<Amount>("-5").is_err());
        assert!(serde_json::from_str::<Amount>("-5.5").is_err());
    }

    #[test]
    fn serializes_as_a_number() {
        assert_eq!(serde_json::to_string(&Amount(1500)).unwrap(), "15.0");
        assert_eq!(serde_json::to_string(&Amount(1234)).unwrap(), "12.34");
    }
}
