//! Money helpers shared by every calculator.
//!
//! All amounts are whole-currency `Decimal`s. Netto is always computed first;
//! brutto is derived from it with the fixed 23% VAT multiplier.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// VAT multiplier applied to every netto amount (23%).
pub const VAT_MULTIPLIER: Decimal = Decimal::from_parts(123, 0, 0, false, 2);

/// Round to whole currency units, halves away from zero.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use eventquote_web::pricing::round_money;
///
/// assert_eq!(round_money(dec!(799.5)), dec!(800));
/// assert_eq!(round_money(dec!(2767.49)), dec!(2767));
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Brutto for a netto amount: `round(netto × 1.23)`.
pub fn to_brutto(netto: Decimal) -> Decimal {
    round_money(netto * VAT_MULTIPLIER)
}

/// A netto/brutto pair. Netto is the source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub netto: Decimal,
    pub brutto: Decimal,
}

impl Price {
    pub const ZERO: Price = Price {
        netto: Decimal::ZERO,
        brutto: Decimal::ZERO,
    };

    pub fn from_netto(netto: Decimal) -> Self {
        Self {
            netto,
            brutto: to_brutto(netto),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.netto.is_zero() && self.brutto.is_zero()
    }
}

impl std::ops::Add for Price {
    type Output = Price;

    /// Sums netto and brutto independently; no re-rounding.
    fn add(self, rhs: Price) -> Price {
        Price {
            netto: self.netto + rhs.netto,
            brutto: self.brutto + rhs.brutto,
        }
    }
}

impl std::ops::AddAssign for Price {
    fn add_assign(&mut self, rhs: Price) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price {
        iter.fold(Price::ZERO, |acc, p| acc + p)
    }
}
