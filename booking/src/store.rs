//! Store wiring for the booking flow.

use crate::actions::BookingFlowAction;
use crate::environment::BookingFlowEnvironment;
use crate::reducer::BookingFlowReducer;
use crate::state::BookingFlowState;
use purohit_runtime::Store;

/// Runtime store driving the booking flow.
///
/// Owns the state machine, executes the reducer's effects, and broadcasts
/// effect-produced actions so callers can wait for terminal results such
/// as `BookingCreated`.
pub type BookingFlowStore =
    Store<BookingFlowState, BookingFlowAction, BookingFlowEnvironment, BookingFlowReducer>;

/// Create a booking flow store starting from [`BookingFlowState::Idle`].
#[must_use]
pub fn booking_flow_store(environment: BookingFlowEnvironment) -> BookingFlowStore {
    Store::new(
        BookingFlowState::default(),
        BookingFlowReducer::new(),
        environment,
    )
}
