//! Draft assembly and submission-body construction
//!
//! [`assemble`] turns a validated selection into the priced
//! [`BookingDraft`] that goes to the payment step; [`submission_request`]
//! merges a draft with the devotee's identity and the payment receipt into
//! the flat body `POST /api/devotee/bookings` expects. Fee and total are
//! recomputed here from the base price on every assembly, never carried in.

use crate::pricing;
use crate::types::{BookingDraft, PaymentReceipt};
use crate::validate::CompleteSelection;
use purohit_api::types::{CreateBookingRequest, Location};

/// Assemble the priced draft from a validated selection
///
/// The base price comes from the chosen ceremony; fee and total are
/// derived from it here and nowhere else.
#[must_use]
pub fn assemble(priest_id: &str, selection: CompleteSelection<'_>) -> BookingDraft {
    let base_price = selection.ceremony.price;

    BookingDraft {
        priest_id: priest_id.to_string(),
        ceremony_type: selection.ceremony.name.clone(),
        date: selection.date,
        start_time: selection.slot.start_time.to_string(),
        end_time: selection.slot.end_time.to_string(),
        location: Location {
            address: selection.address.to_string(),
            city: selection.city.to_string(),
        },
        notes: selection.notes.to_string(),
        base_price,
        platform_fee: pricing::platform_fee(base_price),
        total_amount: pricing::total_amount(base_price),
    }
}

/// Merge identity, draft, and receipt into the create-booking body
#[must_use]
pub fn submission_request(
    devotee_id: String,
    draft: &BookingDraft,
    receipt: &PaymentReceipt,
) -> CreateBookingRequest {
    CreateBookingRequest {
        devotee_id,
        priest_id: draft.priest_id.clone(),
        ceremony_type: draft.ceremony_type.clone(),
        date: draft.date_utc(),
        start_time: draft.start_time.clone(),
        end_time: draft.end_time.clone(),
        location: draft.location.clone(),
        notes: draft.notes.clone(),
        base_price: draft.base_price,
        platform_fee: draft.platform_fee,
        total_amount: draft.total_amount,
        payment_method: receipt.payment_method.clone(),
        payment_status: receipt.payment_status.clone(),
        payment_id: receipt.payment_id.clone(),
        payment_date: receipt.payment_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TIME_SLOTS;
    use chrono::{NaiveDate, TimeZone, Utc};
    use purohit_api::types::{Ceremony, Money};

    #[allow(clippy::unwrap_used)] // Test code
    fn complete_selection(ceremony: &Ceremony) -> CompleteSelection<'_> {
        CompleteSelection {
            ceremony,
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            slot: TIME_SLOTS[1],
            address: "123 Main St",
            city: "Pune",
            notes: "Morning preferred",
        }
    }

    #[test]
    fn assembly_prices_the_draft_from_the_ceremony() {
        let ceremony = Ceremony {
            id: "1".to_string(),
            name: "Wedding".to_string(),
            price: Money(8000),
        };

        let draft = assemble("68b0f2a9", complete_selection(&ceremony));

        assert_eq!(draft.priest_id, "68b0f2a9");
        assert_eq!(draft.ceremony_type, "Wedding");
        assert_eq!(draft.start_time, "10:30");
        assert_eq!(draft.end_time, "12:30");
        assert_eq!(draft.base_price, Money(8000));
        assert_eq!(draft.platform_fee, Money(400));
        assert_eq!(draft.total_amount, Money(8400));
    }

    #[test]
    fn assembly_carries_venue_and_notes() {
        let ceremony = Ceremony {
            id: "2".to_string(),
            name: "Griha Pravesh".to_string(),
            price: Money(5000),
        };

        let draft = assemble("68b0f2a9", complete_selection(&ceremony));

        assert_eq!(draft.location.address, "123 Main St");
        assert_eq!(draft.location.city, "Pune");
        assert_eq!(draft.notes, "Morning preferred");
    }

    #[test]
    #[allow(clippy::unwrap_used)] // Test code
    fn submission_merges_identity_draft_and_receipt() {
        let ceremony = Ceremony {
            id: "1".to_string(),
            name: "Wedding".to_string(),
            price: Money(8000),
        };
        let draft = assemble("68b0f2a9", complete_selection(&ceremony));
        let receipt = PaymentReceipt {
            payment_method: "upi".to_string(),
            payment_status: "completed".to_string(),
            payment_id: "PAYQ3K7M2XA".to_string(),
            payment_date: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
        };

        let request = submission_request("devotee-1".to_string(), &draft, &receipt);

        assert_eq!(request.devotee_id, "devotee-1");
        assert_eq!(request.priest_id, "68b0f2a9");
        assert_eq!(request.date.to_rfc3339(), "2025-03-10T00:00:00+00:00");
        assert_eq!(request.base_price, Money(8000));
        assert_eq!(request.platform_fee, Money(400));
        assert_eq!(request.total_amount, Money(8400));
        assert_eq!(request.payment_method, "upi");
        assert_eq!(request.payment_status, "completed");
        assert_eq!(request.payment_id, "PAYQ3K7M2XA");
    }
}
