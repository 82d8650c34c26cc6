//! Platform fee arithmetic
//!
//! All amounts are whole rupees. The marketplace adds a 5% fee on top of
//! the ceremony's base price, rounded half away from zero; the devotee
//! pays base plus fee. Both numbers are recomputed from the base price on
//! every assembly and are never accepted from outside.

use purohit_api::types::Money;

/// 5% marketplace fee on the base price, rounded half away from zero
///
/// Computed in integer arithmetic: `(5 * base + 50) / 100` equals
/// `round(base * 0.05)` for every non-negative rupee amount, which is the
/// whole domain (prices are positive).
#[must_use]
pub const fn platform_fee(base_price: Money) -> Money {
    Money((base_price.0 * 5 + 50) / 100)
}

/// What the devotee pays: base price plus the platform fee
#[must_use]
pub const fn total_amount(base_price: Money) -> Money {
    Money(base_price.0 + platform_fee(base_price).0)
}
