//! Property tests for pricing, the booking window, and the payment handoff
//!
//! The unit tests in each module pin concrete examples; these run the same
//! rules across generated inputs.

#![allow(clippy::unwrap_used)] // Test code

use chrono::{Datelike, Days, NaiveDate, Weekday};
use proptest::prelude::*;
use purohit_booking::handoff::HandoffPayload;
use purohit_booking::schedule::{self, SELECTION_WINDOW_DAYS};
use purohit_booking::{BookingDraft, Location, Money, TIME_SLOTS, pricing};

// ============================================================================
// Strategies
// ============================================================================

/// Any whole-rupee base price up to one crore
fn arbitrary_price() -> impl Strategy<Value = Money> {
    (0i64..=10_000_000).prop_map(Money)
}

/// Any calendar day across a ten-year span starting 2024
fn arbitrary_day() -> impl Strategy<Value = NaiveDate> {
    (0u64..=3650).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Days::new(offset)
    })
}

prop_compose! {
    /// A fully assembled draft whose fee and total derive from its base price
    fn arbitrary_draft()(
        priest_id in "[a-f0-9]{8,24}",
        ceremony_type in "[A-Za-z][A-Za-z ]{0,24}",
        day_offset in 0..SELECTION_WINDOW_DAYS,
        slot_index in 0..TIME_SLOTS.len(),
        address in ".{0,40}",
        city in "[A-Za-z]{1,16}",
        notes in ".{0,60}",
        base in 0i64..=1_000_000,
    ) -> BookingDraft {
        let slot = TIME_SLOTS[slot_index];
        BookingDraft {
            priest_id,
            ceremony_type,
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap() + Days::new(day_offset),
            start_time: slot.start_time.to_string(),
            end_time: slot.end_time.to_string(),
            location: Location { address, city },
            notes,
            base_price: Money(base),
            platform_fee: pricing::platform_fee(Money(base)),
            total_amount: pricing::total_amount(Money(base)),
        }
    }
}

// ============================================================================
// Pricing
// ============================================================================

proptest! {
    /// The fee never strays more than half a rupee from exact 5%
    #[test]
    fn fee_is_five_percent_of_the_base(base in arbitrary_price()) {
        let fee = pricing::platform_fee(base);
        prop_assert!((100 * fee.0 - 5 * base.0).abs() <= 50);
    }

    /// Exact halves round up: 5% of `20k + 10` ends in .5 and gains the rupee
    #[test]
    fn exact_halves_round_up(k in 0i64..=500_000) {
        let base = Money(20 * k + 10);
        let fee = pricing::platform_fee(base);
        prop_assert_eq!(100 * fee.0 - 5 * base.0, 50);
    }

    /// Bases divisible by twenty need no rounding at all
    #[test]
    fn multiples_of_twenty_divide_evenly(k in 0i64..=500_000) {
        let base = Money(20 * k);
        prop_assert_eq!(pricing::platform_fee(base), Money(base.0 / 20));
    }

    /// The total always decomposes back into base plus fee
    #[test]
    fn total_is_base_plus_fee(base in arbitrary_price()) {
        let fee = pricing::platform_fee(base);
        prop_assert_eq!(pricing::total_amount(base), Money(base.0 + fee.0));
    }
}

// ============================================================================
// Booking window
// ============================================================================

proptest! {
    /// The window holds sixty consecutive days and opens on today
    #[test]
    fn window_spans_sixty_consecutive_days(today in arbitrary_day()) {
        let window = schedule::selection_window(today);

        prop_assert_eq!(window.len(), 60);
        for (day, offset) in window.iter().zip(0u64..) {
            prop_assert_eq!(day.date, today + Days::new(offset));
        }
    }

    /// Sundays and only Sundays are blocked inside the window
    #[test]
    fn only_sundays_are_blocked(today in arbitrary_day()) {
        let window = schedule::selection_window(today);

        for day in &window {
            prop_assert_eq!(day.selectable, day.date.weekday() != Weekday::Sun);
        }
        let sundays = window.iter().filter(|day| !day.selectable).count();
        prop_assert!(
            sundays == 8 || sundays == 9,
            "sixty days hold 8 or 9 Sundays, got {}",
            sundays
        );
    }

    /// Nothing before today is ever selectable
    #[test]
    fn past_days_are_never_selectable(today in arbitrary_day(), back in 1u64..=3650) {
        prop_assert!(!schedule::is_selectable(today, today - Days::new(back)));
    }

    /// Day sixty and everything after it lies outside the window
    #[test]
    fn days_beyond_the_window_are_never_selectable(
        today in arbitrary_day(),
        beyond in 0u64..=3650,
    ) {
        let date = today + Days::new(SELECTION_WINDOW_DAYS + beyond);
        prop_assert!(!schedule::is_selectable(today, date));
    }

    /// The per-day window flags agree with the point query
    #[test]
    fn window_flags_match_the_point_query(today in arbitrary_day()) {
        for day in schedule::selection_window(today) {
            prop_assert_eq!(day.selectable, schedule::is_selectable(today, day.date));
        }
    }
}

// ============================================================================
// Payment handoff
// ============================================================================

proptest! {
    /// Any draft survives the handoff encode/decode unchanged
    #[test]
    fn handoff_round_trips_any_draft(draft in arbitrary_draft()) {
        let payload = HandoffPayload::encode(&draft).unwrap();
        prop_assert_eq!(payload.decode().unwrap(), draft);
    }
}
