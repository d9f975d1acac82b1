//! Monetary types and unit conversions.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// Amount of bitcoin, represented as a Decimal for precision.
pub type Btc = Decimal;

/// Annual percentage yield, e.g. `4.5` for 4.5%.
pub type Apy = Decimal;

/// Satoshis per bitcoin.
pub const SATS_PER_BTC: u64 = 100_000_000;

/// Convert a satoshi count into BTC.
#[must_use]
pub fn sats_to_btc(sats: u64) -> Btc {
    Decimal::from(sats) / Decimal::from(SATS_PER_BTC)
}

/// Convert BTC into satoshis, flooring any sub-satoshi remainder.
///
/// Negative amounts clamp to zero. Returns `None` when the amount does not
/// fit in a `u64` satoshi count.
#[must_use]
pub fn btc_to_sats(amount: Btc) -> Option<u64> {
    if amount.is_sign_negative() {
        return Some(0);
    }
    amount
        .checked_mul(Decimal::from(SATS_PER_BTC))?
        .floor()
        .to_u64()
}

/// Lossy conversion from a wire float. Non-finite values become zero.
#[must_use]
pub fn from_f64(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Lossy conversion to a wire float.
#[must_use]
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}
