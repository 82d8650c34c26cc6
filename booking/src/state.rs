//! Booking flow state machine.

use crate::handoff::HandoffPayload;
use crate::payment::PaymentError;
use crate::types::{BookingDraft, PaymentMethod, PaymentReceipt, Selection};
use crate::validate::ValidationError;
use purohit_api::types::{Booking, Priest};

/// Where the devotee is in the booking flow.
///
/// Transitions move forward only: selecting, then payment, then
/// submission, then confirmed. The single backward edge is a failed
/// submission returning to the payment step with the draft intact; no
/// failure sends the devotee back to selecting.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum BookingFlowState {
    /// No flow in progress.
    #[default]
    Idle,

    /// Fetching the priest's profile and catalog.
    Loading {
        /// Priest being loaded
        priest_id: String,
    },

    /// The devotee is choosing ceremony, date, slot, and venue.
    Selecting {
        /// Loaded priest profile
        priest: Priest,
        /// Choices made so far
        selection: Selection,
        /// Message from the last failed completeness check, if any
        validation_error: Option<ValidationError>,
    },

    /// The priest could not be loaded; the flow cannot proceed.
    Unavailable {
        /// Message shown to the devotee
        message: String,
    },

    /// The draft has been handed off; the devotee is choosing how to pay.
    AwaitingPayment {
        /// The payment step's own copy of the draft, decoded from the payload
        draft: BookingDraft,
        /// The encoded draft as it crossed the handoff
        payload: HandoffPayload,
        /// Chosen payment method, if any yet
        method: Option<PaymentMethod>,
        /// Message from the last failed method check, if any
        payment_error: Option<PaymentError>,
    },

    /// Payment captured; the booking is on its way to the server.
    Submitting {
        /// Draft being submitted
        draft: BookingDraft,
        /// Encoded draft, kept for a possible retry
        payload: HandoffPayload,
        /// Method the payment was captured with
        method: PaymentMethod,
        /// Receipt merged into the submission body
        receipt: PaymentReceipt,
    },

    /// The submission failed; the devotee may retry or change the method.
    Failed {
        /// Draft preserved for retry, unchanged
        draft: BookingDraft,
        /// Encoded draft, unchanged
        payload: HandoffPayload,
        /// Method from the failed attempt
        method: PaymentMethod,
        /// Message shown to the devotee
        message: String,
    },

    /// The server accepted the booking. Terminal.
    Confirmed {
        /// Booking as the server stored it
        booking: Booking,
        /// Refreshed bookings list, once the follow-up fetch lands
        bookings: Option<Vec<Booking>>,
    },
}

impl BookingFlowState {
    /// Short name of the current phase, for logs and metrics labels.
    #[must_use]
    pub const fn phase(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading { .. } => "loading",
            Self::Selecting { .. } => "selecting",
            Self::Unavailable { .. } => "unavailable",
            Self::AwaitingPayment { .. } => "awaiting_payment",
            Self::Submitting { .. } => "submitting",
            Self::Failed { .. } => "failed",
            Self::Confirmed { .. } => "confirmed",
        }
    }

    /// The draft currently in flight, if the flow has assembled one.
    #[must_use]
    pub const fn draft(&self) -> Option<&BookingDraft> {
        match self {
            Self::AwaitingPayment { draft, .. }
            | Self::Submitting { draft, .. }
            | Self::Failed { draft, .. } => Some(draft),
            _ => None,
        }
    }
}
