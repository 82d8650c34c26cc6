//! Actions for the booking flow.

use crate::types::PaymentMethod;
use chrono::NaiveDate;
use purohit_api::types::{Booking, Priest};
use serde::{Deserialize, Serialize};

/// Actions processed by the `BookingFlowReducer`.
///
/// User intents (selecting, entering text, confirming) and effect results
/// (priest loaded, booking created) share one enum; the reducer is the only
/// place either kind changes state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BookingFlowAction {
    /// Open the flow for a priest.
    ///
    /// Starting over from any state is allowed and begins a fresh flow;
    /// nothing from a previous run survives.
    Start {
        /// Priest to book
        priest_id: String,
    },

    /// The priest's profile and ceremony catalog arrived.
    PriestLoaded {
        /// Profile from the server
        priest: Priest,
    },

    /// The priest could not be loaded.
    PriestLoadFailed {
        /// Message to show the devotee
        message: String,
    },

    /// The devotee picked a ceremony from the catalog.
    SelectCeremony {
        /// Catalog id of the chosen ceremony
        ceremony_id: String,
    },

    /// The devotee picked a ceremony date.
    ///
    /// Dates outside the booking window and Sundays are not selectable;
    /// the reducer ignores them.
    SelectDate {
        /// Chosen date
        date: NaiveDate,
    },

    /// The devotee picked a time slot.
    SelectSlot {
        /// Id of the chosen slot, `"1"` through `"5"`
        slot_id: String,
    },

    /// The devotee edited the venue address.
    EnterAddress {
        /// Current field contents
        address: String,
    },

    /// The devotee edited the venue city.
    EnterCity {
        /// Current field contents
        city: String,
    },

    /// The devotee edited the notes field.
    EnterNotes {
        /// Current field contents
        notes: String,
    },

    /// Validate the selection and hand the draft to the payment step.
    ProceedToPayment,

    /// The devotee chose how to pay.
    SelectPaymentMethod {
        /// Chosen method with its entered details
        method: PaymentMethod,
    },

    /// Capture the payment and submit the booking.
    ///
    /// From the failed state this retries the same draft with a fresh
    /// payment reference.
    ConfirmPayment,

    /// The server accepted the booking.
    BookingCreated {
        /// Booking as the server stored it
        booking: Booking,
    },

    /// The server rejected the booking or the request failed.
    SubmissionFailed {
        /// Message to show the devotee
        message: String,
    },

    /// The post-confirmation bookings refresh arrived.
    BookingsRefreshed {
        /// The devotee's bookings, newest state
        bookings: Vec<Booking>,
    },

    /// The post-confirmation bookings refresh failed.
    ///
    /// Non-fatal; the confirmation stands and the list stays stale.
    BookingsRefreshFailed {
        /// Underlying failure, for the log
        message: String,
    },

    /// Leave the flow, discarding all progress.
    Abandon,
}
