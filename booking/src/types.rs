//! Domain types for the booking flow
//!
//! The selection-layer types here are client-side only. Wire shapes
//! (`Priest`, `Booking`, `CreateBookingRequest`) live in `purohit-api`;
//! [`BookingDraft`] is deliberately wire-shaped so the payment handoff can
//! serialize it without translation.

use chrono::{DateTime, NaiveDate, NaiveTime};
use purohit_api::types::{Ceremony, Location, Money};
use serde::{Deserialize, Serialize};

/// One of the five fixed booking slots
///
/// Slots are the same for every priest and every date; there is no
/// per-priest availability on the client side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeSlot {
    /// Stable slot identifier, `"1"` through `"5"`
    pub id: &'static str,
    /// Slot start, `HH:MM`
    pub start_time: &'static str,
    /// Slot end, `HH:MM`
    pub end_time: &'static str,
}

/// The five bookable slots offered for every ceremony date
pub const TIME_SLOTS: [TimeSlot; 5] = [
    TimeSlot { id: "1", start_time: "08:00", end_time: "10:00" },
    TimeSlot { id: "2", start_time: "10:30", end_time: "12:30" },
    TimeSlot { id: "3", start_time: "13:00", end_time: "15:00" },
    TimeSlot { id: "4", start_time: "15:30", end_time: "17:30" },
    TimeSlot { id: "5", start_time: "18:00", end_time: "20:00" },
];

impl TimeSlot {
    /// Look up a slot by its identifier
    #[must_use]
    pub fn by_id(id: &str) -> Option<Self> {
        TIME_SLOTS.into_iter().find(|slot| slot.id == id)
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start_time, self.end_time)
    }
}

/// Everything the devotee has chosen so far
///
/// At most one ceremony, one date, and one slot at any moment. Text fields
/// start empty. Completeness is checked by the validator when the devotee
/// proceeds to payment, not while they are still choosing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    /// Chosen ceremony from the priest's catalog
    pub ceremony: Option<Ceremony>,
    /// Chosen ceremony date
    pub date: Option<NaiveDate>,
    /// Chosen time slot
    pub slot: Option<TimeSlot>,
    /// Venue street address
    pub address: String,
    /// Venue city
    pub city: String,
    /// Free-text notes for the priest
    pub notes: String,
}

impl Selection {
    /// Set the date, clearing any chosen slot
    ///
    /// A slot belongs to a specific day, so changing the date invalidates
    /// the previous slot choice.
    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = Some(date);
        self.slot = None;
    }
}

/// The priced booking under construction
///
/// Transient and client-held; never persisted. `platform_fee` and
/// `total_amount` are always recomputed from `base_price` at assembly and
/// cannot be supplied from outside. Serializes to the camelCase shape the
/// payment handoff and the submission body both use.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    /// Booked priest, opaque server id
    pub priest_id: String,
    /// Name of the selected ceremony
    pub ceremony_type: String,
    /// Ceremony date, `YYYY-MM-DD` on the wire
    pub date: NaiveDate,
    /// Slot start, `HH:MM`
    pub start_time: String,
    /// Slot end, `HH:MM`
    pub end_time: String,
    /// Ceremony venue
    pub location: Location,
    /// Free-text notes, empty when none were entered
    pub notes: String,
    /// Base price copied from the selected ceremony
    pub base_price: Money,
    /// 5% marketplace fee, recomputed at assembly
    pub platform_fee: Money,
    /// Base price plus fee
    pub total_amount: Money,
}

impl BookingDraft {
    /// Wire timestamp for the ceremony date: UTC midnight of the selected day
    #[must_use]
    pub fn date_utc(&self) -> DateTime<chrono::Utc> {
        self.date.and_time(NaiveTime::MIN).and_utc()
    }
}

/// How the devotee pays
///
/// Details are collected by the payment step and validated before capture.
/// Only the label (`"upi"` / `"card"`) travels to the backend; the details
/// themselves stay on the client.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    /// UPI transfer
    Upi {
        /// Virtual payment address, e.g. `name@bank`
        vpa_id: String,
    },
    /// Card payment
    Card {
        /// Card number
        number: String,
        /// Expiry, `MM/YY`
        expiry: String,
        /// Security code
        cvv: String,
        /// Name on the card
        holder: String,
    },
}

impl PaymentMethod {
    /// Wire label for the method
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Upi { .. } => "upi",
            Self::Card { .. } => "card",
        }
    }
}

/// Record of a captured payment, merged into the submission
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    /// Method label, `"upi"` or `"card"`
    pub payment_method: String,
    /// Always `"completed"`; failed captures never produce a receipt
    pub payment_status: String,
    /// Locally generated reference, `PAY` + 8 uppercase base-36 chars
    pub payment_id: String,
    /// Capture timestamp from the injected clock
    pub payment_date: DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_five_slots_are_fixed() {
        assert_eq!(TIME_SLOTS.len(), 5);
        assert_eq!(TIME_SLOTS[0].start_time, "08:00");
        assert_eq!(TIME_SLOTS[0].end_time, "10:00");
        assert_eq!(TIME_SLOTS[4].start_time, "18:00");
        assert_eq!(TIME_SLOTS[4].end_time, "20:00");
    }

    #[test]
    fn slots_are_found_by_id() {
        #[allow(clippy::unwrap_used)] // Test code
        let slot = TimeSlot::by_id("2").unwrap();
        assert_eq!(slot.start_time, "10:30");
        assert_eq!(slot.end_time, "12:30");
        assert_eq!(slot.to_string(), "10:30-12:30");

        assert_eq!(TimeSlot::by_id("6"), None);
    }

    #[test]
    #[allow(clippy::unwrap_used)] // Test code
    fn setting_a_date_clears_the_slot() {
        let mut selection = Selection::default();
        selection.set_date(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        selection.slot = TimeSlot::by_id("1");

        selection.set_date(NaiveDate::from_ymd_opt(2025, 3, 11).unwrap());

        assert_eq!(selection.date, NaiveDate::from_ymd_opt(2025, 3, 11));
        assert_eq!(selection.slot, None);
    }

    #[test]
    fn payment_method_labels() {
        let upi = PaymentMethod::Upi {
            vpa_id: "devotee@bank".to_string(),
        };
        assert_eq!(upi.label(), "upi");

        let card = PaymentMethod::Card {
            number: "4242424242424242".to_string(),
            expiry: "12/26".to_string(),
            cvv: "123".to_string(),
            holder: "A Devotee".to_string(),
        };
        assert_eq!(card.label(), "card");
    }

    #[test]
    #[allow(clippy::unwrap_used)] // Test code
    fn draft_date_maps_to_utc_midnight() {
        let draft = BookingDraft {
            priest_id: "68b0f2a9".to_string(),
            ceremony_type: "Wedding".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            start_time: "10:30".to_string(),
            end_time: "12:30".to_string(),
            location: Location {
                address: "123 Main St".to_string(),
                city: "Pune".to_string(),
            },
            notes: String::new(),
            base_price: Money(8000),
            platform_fee: Money(400),
            total_amount: Money(8400),
        };

        assert_eq!(draft.date_utc().to_rfc3339(), "2025-03-10T00:00:00+00:00");
    }
}
