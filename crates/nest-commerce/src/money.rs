//! Prices and totals.
//!
//! Every amount is an integer count of minor units (cents, tiyin) tagged
//! with its currency. Arithmetic between two amounts refuses to mix
//! currencies and reports overflow as `None`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Minor units per major unit. All supported currencies use two places.
const MINOR_PER_MAJOR: i64 = 100;

/// Currencies the store can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    RUB,
    UZS,
}

impl Currency {
    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::RUB => "RUB",
            Currency::UZS => "UZS",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::RUB => "\u{20bd}",
            Currency::UZS => "so'm ",
        }
    }

    /// Case-insensitive lookup by ISO code.
    pub fn from_code(code: &str) -> Option<Self> {
        [
            Currency::USD,
            Currency::EUR,
            Currency::GBP,
            Currency::RUB,
            Currency::UZS,
        ]
        .into_iter()
        .find(|c| c.code().eq_ignore_ascii_case(code.trim()))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An amount of money in one currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Minor units, e.g. cents.
    pub amount_cents: i64,
    pub currency: Currency,
}

impl Money {
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Convert a major-unit amount such as `49.99`, rounding to the
    /// nearest minor unit.
    ///
    /// ```
    /// use nest_commerce::money::{Currency, Money};
    /// assert_eq!(Money::from_decimal(49.99, Currency::USD).amount_cents, 4999);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        Self::new((amount * MINOR_PER_MAJOR as f64).round() as i64, currency)
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    pub fn is_positive(&self) -> bool {
        self.amount_cents > 0
    }

    /// The amount in major units.
    pub fn to_decimal(&self) -> f64 {
        self.amount_cents as f64 / MINOR_PER_MAJOR as f64
    }

    fn same_currency(&self, other: &Money) -> Option<Currency> {
        (self.currency == other.currency).then_some(self.currency)
    }

    pub fn try_add(&self, other: &Money) -> Option<Money> {
        let currency = self.same_currency(other)?;
        let amount = self.amount_cents.checked_add(other.amount_cents)?;
        Some(Money::new(amount, currency))
    }

    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        let currency = self.same_currency(other)?;
        let amount = self.amount_cents.checked_sub(other.amount_cents)?;
        Some(Money::new(amount, currency))
    }

    /// Line total for `quantity` units at this price.
    pub fn try_multiply(&self, quantity: i64) -> Option<Money> {
        let amount = self.amount_cents.checked_mul(quantity)?;
        Some(Money::new(amount, self.currency))
    }

    /// `percent` of this amount, rounded half away from zero.
    pub fn percentage(&self, percent: f64) -> Money {
        let amount = (self.amount_cents as f64 * percent / 100.0).round() as i64;
        Money::new(amount, self.currency)
    }

    /// The smaller amount. Currencies are assumed equal.
    pub fn min(self, other: Money) -> Money {
        if other.amount_cents < self.amount_cents {
            other
        } else {
            self
        }
    }

    /// Total of `values`, or `None` when one is in another currency or
    /// the sum overflows.
    pub fn try_sum<'a>(values: impl Iterator<Item = &'a Money>, currency: Currency) -> Option<Money> {
        let mut total = Money::zero(currency);
        for value in values {
            total = total.try_add(value)?;
        }
        Some(total)
    }
}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.same_currency(other)?;
        Some(self.amount_cents.cmp(&other.amount_cents))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:.2}", self.currency.symbol(), self.to_decimal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(cents: i64) -> Money {
        Money::new(cents, Currency::USD)
    }

    #[test]
    fn test_from_decimal_rounds() {
        assert_eq!(Money::from_decimal(49.99, Currency::USD).amount_cents, 4999);
        assert_eq!(Money::from_decimal(45000.0, Currency::UZS).amount_cents, 4_500_000);
        assert_eq!(Money::from_decimal(19.999, Currency::USD).amount_cents, 2000);
    }

    #[test]
    fn test_display() {
        assert_eq!(usd(4999).to_string(), "$49.99");
        assert_eq!(Money::new(4_000_000, Currency::UZS).to_string(), "so'm 40000.00");
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(usd(1000).try_add(&usd(500)), Some(usd(1500)));
        assert_eq!(usd(1000).try_subtract(&usd(300)), Some(usd(700)));
        assert_eq!(usd(2500).try_multiply(3), Some(usd(7500)));
        assert!(usd(i64::MAX / 2 + 1).try_multiply(2).is_none());
    }

    #[test]
    fn test_percentage() {
        assert_eq!(usd(100_000).percentage(10.0), usd(10_000));
        assert_eq!(usd(999).percentage(15.0), usd(150));
    }

    #[test]
    fn test_currencies_do_not_mix() {
        let eur = Money::new(1000, Currency::EUR);
        assert!(usd(1000).try_add(&eur).is_none());
        assert!(usd(1000).partial_cmp(&eur).is_none());
        assert!(Money::try_sum([eur].iter(), Currency::USD).is_none());
    }

    #[test]
    fn test_try_sum() {
        let values = [usd(100), usd(250)];
        assert_eq!(Money::try_sum(values.iter(), Currency::USD), Some(usd(350)));
        assert_eq!(Money::try_sum(std::iter::empty(), Currency::USD), Some(usd(0)));
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("USD"), Some(Currency::USD));
        assert_eq!(Currency::from_code("uzs"), Some(Currency::UZS));
        assert_eq!(Currency::from_code("XYZ"), None);
    }
}
