use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Currency minor unit: prices are kept to 2 decimal places
pub const DECIMAL_PLACES: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("discount must be between {min} and {max} percent, got {0}", min = Discount::MIN, max = Discount::MAX)]
pub struct InvalidDiscount(pub i64);

/// Percentage discount granted by a promo code.
///
/// A zero discount represents "no promo"; promo codes themselves always carry 1..=99.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Discount(u8);

impl Discount {
    pub const NONE: Self = Discount(0);
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 99;

    /// Builds a promo discount, which must be within 1..=99
    pub fn new(percent: i64) -> Result<Self, InvalidDiscount> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&percent) {
            Ok(Self(percent as u8))
        } else {
            Err(InvalidDiscount(percent))
        }
    }

    pub fn percent(self) -> u8 {
        self.0
    }
}

/// Rounds to the currency's minor unit, half away from zero
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    // Pad to exactly two places so "4000" renders as "4000.00"
    rounded.rescale(DECIMAL_PLACES);
    rounded
}

/// Final charge for a booking: `table_price * (1 - discount / 100)`.
///
/// The product is exact in `Decimal`; only the final value is rounded to cents.
pub fn final_price(table_price: Decimal, discount: Discount) -> Decimal {
    let remaining = Decimal::ONE_HUNDRED - Decimal::from(discount.percent());
    let price = round_money(table_price * remaining / Decimal::ONE_HUNDRED);

    price.max(Decimal::ZERO)
}
