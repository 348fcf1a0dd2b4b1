//! Money in integer minor units.
//!
//! All catalog prices and booking totals are stored as pesewas (1/100 of a
//! cedi). Decimals only appear at the edges: multipliers from the catalog
//! and the string amounts rendered in JSON responses.

use std::fmt;

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculators::round_money;

/// Number of decimal places in the minor unit.
pub const MINOR_UNIT_PLACES: u32 = 2;

const MINOR_PER_MAJOR: i64 = 100;

/// An amount of money in minor units of the catalog currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    pub const fn from_major(major: i64) -> Self {
        Money(major * MINOR_PER_MAJOR)
    }

    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Amount in major units, e.g. `210.00`.
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, MINOR_UNIT_PLACES)
    }

    /// Convert a major-unit decimal that is already exact to the minor unit.
    ///
    /// Returns `None` for amounts with more than two decimal places or
    /// amounts that do not fit in `i64` minor units.
    pub fn from_decimal_exact(amount: Decimal) -> Option<Self> {
        let minor = amount.checked_mul(Decimal::from(MINOR_PER_MAJOR))?;
        if !minor.fract().is_zero() {
            return None;
        }
        minor.to_i64().map(Money)
    }

    /// Sum of two amounts; `None` on overflow.
    pub fn checked_add(self, rhs: Money) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Multiply by a decimal factor, rounding to the minor unit with
    /// banker's rounding.
    pub fn scale(self, factor: Decimal) -> Option<Self> {
        let product = Decimal::from(self.0).checked_mul(factor)?;
        round_money(product, 0).to_i64().map(Money)
    }
}


impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_major_and_display() {
        assert_eq!(Money::from_major(210).minor_units(), 21000);
        assert_eq!(Money::from_major(210).to_string(), "210.00");
        assert_eq!(Money::from_minor(1005).to_string(), "10.05");
    }

    #[test]
    fn test_from_decimal_exact() {
        assert_eq!(Money::from_decimal_exact(dec!(12.5)), Some(Money::from_minor(1250)));
        assert_eq!(Money::from_decimal_exact(dec!(200)), Some(Money::from_major(200)));
        assert_eq!(Money::from_decimal_exact(dec!(0.005)), None);
    }

    #[test]
    fn test_scale_is_exact_for_catalog_multipliers() {
        // 0.1 + 0.2 style drift cannot happen in minor units
        assert_eq!(Money::from_major(200).scale(dec!(0.8)), Some(Money::from_major(160)));
        assert_eq!(Money::from_major(250).scale(dec!(1.3)), Some(Money::from_major(325)));
    }

    #[test]
    fn test_scale_rounds_half_to_even() {
        // 5 * 0.5 = 2.5 -> 2
        assert_eq!(Money::from_minor(5).scale(dec!(0.5)), Some(Money::from_minor(2)));
        // 7 * 0.5 = 3.5 -> 4
        assert_eq!(Money::from_minor(7).scale(dec!(0.5)), Some(Money::from_minor(4)));
    }

    #[test]
    fn test_checked_add() {
        assert_eq!(
            Money::from_major(40).checked_add(Money::from_minor(5)),
            Some(Money::from_minor(4005))
        );
        assert_eq!(Money::from_minor(i64::MAX).checked_add(Money::from_minor(1)), None);
    }
}
