//! # Purohit Booking Flow
//!
//! The devotee-side booking flow for the priest marketplace: pick a
//! ceremony from a priest's catalog, choose a date and one of five fixed
//! time slots, enter the venue, pay, and submit - a linear state machine
//! driven by the `purohit-core` reducer pattern.
//!
//! ## Flow
//!
//! ```text
//! Start
//!   │
//!   ▼
//! Loading ──failure──▶ Unavailable
//!   │
//!   ▼
//! Selecting ──validate + assemble + handoff──▶ AwaitingPayment
//!                                                  │  ▲
//!                                         capture  │  │ new method /
//!                                                  ▼  │ failure
//!                                              Submitting ──▶ Failed
//!                                                  │             │
//!                                                  │   retry ◀───┘
//!                                                  ▼
//!                                              Confirmed (+ bookings refresh)
//! ```
//!
//! The draft crosses from selecting to payment as a serialized payload;
//! the payment step decodes its own copy, so later edits can never mutate
//! a draft that has been handed off. A failed submission returns to the
//! payment step with the draft intact - never back to selecting.
//!
//! ## Example
//!
//! ```rust,ignore
//! use purohit_booking::{BookingFlowAction, BookingFlowEnvironment, booking_flow_store};
//! use purohit_api::ApiConfig;
//!
//! let store = booking_flow_store(BookingFlowEnvironment::live(ApiConfig::from_env())?);
//!
//! store.send(BookingFlowAction::Start { priest_id }).await?;
//! store.send(BookingFlowAction::SelectCeremony { ceremony_id }).await?;
//! // ... date, slot, venue, ProceedToPayment, ConfirmPayment
//! ```

// Public modules
pub mod actions;
pub mod draft;
pub mod environment;
pub mod handoff;
pub mod payment;
pub mod pricing;
pub mod reducer;
pub mod schedule;
pub mod state;
pub mod store;
pub mod types;
pub mod validate;

#[cfg(feature = "test-utils")]
pub mod mocks;

// Re-export main types for convenience
pub use actions::BookingFlowAction;
pub use environment::{BookingApi, BookingFlowEnvironment};
pub use reducer::BookingFlowReducer;
pub use state::BookingFlowState;
pub use store::{BookingFlowStore, booking_flow_store};
pub use types::{BookingDraft, PaymentMethod, PaymentReceipt, Selection, TIME_SLOTS, TimeSlot};

// Wire types the flow is built around, re-exported so callers rarely need
// purohit-api directly
pub use purohit_api::types::{Booking, BookingStatus, Ceremony, Location, Money, Priest};
