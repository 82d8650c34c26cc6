//! Reducer for the booking flow.
//!
//! Every transition of the flow lives in this one match: user intents and
//! effect results come in as actions, state moves strictly forward
//! (selecting, payment, submission, confirmation), and all I/O leaves as
//! effects built from the injected environment. Actions that do not apply
//! to the current phase are ignored where they land, so stale effect
//! results and double taps cannot derail the flow.

use crate::actions::BookingFlowAction;
use crate::draft;
use crate::environment::BookingFlowEnvironment;
use crate::handoff::{HandoffError, HandoffPayload};
use crate::payment::{self, PaymentError};
use crate::schedule;
use crate::state::BookingFlowState;
use crate::types::{BookingDraft, PaymentReceipt, Selection, TimeSlot};
use crate::validate;
use purohit_core::effect::{Effect, EffectId};
use purohit_core::reducer::Reducer;
use smallvec::{SmallVec, smallvec};

/// Cancellation id for the priest profile fetch.
pub const LOAD_PRIEST: EffectId = EffectId::new("booking.load_priest");

/// Cancellation id for the booking submission.
pub const SUBMIT_BOOKING: EffectId = EffectId::new("booking.submit");

/// Cancellation id for the post-confirmation bookings refresh.
pub const REFRESH_BOOKINGS: EffectId = EffectId::new("booking.refresh");

const PRIEST_UNAVAILABLE: &str = "Could not load priest details. Please try again later.";
const NOT_SIGNED_IN: &str = "You are not signed in. Please sign in and try again.";
const SUBMISSION_FALLBACK: &str =
    "An error occurred while processing your payment. Please try again.";
const REFRESH_FALLBACK: &str = "Failed to fetch bookings";

/// Reducer driving the booking flow state machine.
///
/// Pure with respect to its environment: time comes from the injected
/// clock, payment references from the injected source, and the network is
/// only ever touched inside returned effects.
#[derive(Clone, Copy, Debug)]
pub struct BookingFlowReducer;

impl BookingFlowReducer {
    /// Create a new booking flow reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for BookingFlowReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for BookingFlowReducer {
    type State = BookingFlowState;
    type Action = BookingFlowAction;
    type Environment = BookingFlowEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action keeps the machine in one place
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════
            // Entering and loading
            // ═══════════════════════════════════════════════════════════
            BookingFlowAction::Start { priest_id } => {
                // Re-entry always begins fresh: drop whatever the previous
                // run still had in flight before loading the new priest.
                *state = BookingFlowState::Loading {
                    priest_id: priest_id.clone(),
                };
                smallvec![
                    Effect::cancel(LOAD_PRIEST),
                    Effect::cancel(SUBMIT_BOOKING),
                    Effect::cancel(REFRESH_BOOKINGS),
                    load_priest_effect(env, priest_id),
                ]
            }

            BookingFlowAction::PriestLoaded { priest } => {
                let fresh = matches!(
                    state,
                    BookingFlowState::Loading { priest_id } if *priest_id == priest.id
                );
                if fresh {
                    *state = BookingFlowState::Selecting {
                        priest,
                        selection: Selection::default(),
                        validation_error: None,
                    };
                } else {
                    tracing::debug!(
                        priest_id = %priest.id,
                        phase = state.phase(),
                        "Ignoring stale priest load result"
                    );
                }
                smallvec![Effect::None]
            }

            BookingFlowAction::PriestLoadFailed { message } => {
                if matches!(state, BookingFlowState::Loading { .. }) {
                    *state = BookingFlowState::Unavailable { message };
                } else {
                    tracing::debug!(%message, "Ignoring stale priest load failure");
                }
                smallvec![Effect::None]
            }

            // ═══════════════════════════════════════════════════════════
            // Selecting: ceremony, date, slot, venue
            // ═══════════════════════════════════════════════════════════
            BookingFlowAction::SelectCeremony { ceremony_id } => {
                if let BookingFlowState::Selecting {
                    priest,
                    selection,
                    validation_error,
                } = state
                {
                    match priest
                        .ceremonies
                        .iter()
                        .find(|ceremony| ceremony.id == ceremony_id)
                    {
                        Some(ceremony) => {
                            selection.ceremony = Some(ceremony.clone());
                            *validation_error = None;
                        }
                        None => {
                            tracing::debug!(%ceremony_id, "Ignoring unknown ceremony selection");
                        }
                    }
                }
                smallvec![Effect::None]
            }

            BookingFlowAction::SelectDate { date } => {
                if let BookingFlowState::Selecting {
                    selection,
                    validation_error,
                    ..
                } = state
                {
                    let today = env.clock().now().date_naive();
                    if schedule::is_selectable(today, date) {
                        selection.set_date(date);
                        *validation_error = None;
                    } else {
                        tracing::debug!(%date, "Ignoring unselectable date");
                    }
                }
                smallvec![Effect::None]
            }

            BookingFlowAction::SelectSlot { slot_id } => {
                if let BookingFlowState::Selecting {
                    selection,
                    validation_error,
                    ..
                } = state
                {
                    match TimeSlot::by_id(&slot_id) {
                        Some(slot) => {
                            selection.slot = Some(slot);
                            *validation_error = None;
                        }
                        None => tracing::debug!(%slot_id, "Ignoring unknown slot selection"),
                    }
                }
                smallvec![Effect::None]
            }

            BookingFlowAction::EnterAddress { address } => {
                if let BookingFlowState::Selecting {
                    selection,
                    validation_error,
                    ..
                } = state
                {
                    selection.address = address;
                    *validation_error = None;
                }
                smallvec![Effect::None]
            }

            BookingFlowAction::EnterCity { city } => {
                if let BookingFlowState::Selecting {
                    selection,
                    validation_error,
                    ..
                } = state
                {
                    selection.city = city;
                    *validation_error = None;
                }
                smallvec![Effect::None]
            }

            BookingFlowAction::EnterNotes { notes } => {
                if let BookingFlowState::Selecting {
                    selection,
                    validation_error,
                    ..
                } = state
                {
                    selection.notes = notes;
                    *validation_error = None;
                }
                smallvec![Effect::None]
            }

            // ═══════════════════════════════════════════════════════════
            // Handoff to payment
            // ═══════════════════════════════════════════════════════════
            BookingFlowAction::ProceedToPayment => {
                if let BookingFlowState::Selecting {
                    priest,
                    selection,
                    validation_error,
                } = state
                {
                    match validate::validate(selection) {
                        Ok(complete) => {
                            let assembled = draft::assemble(&priest.id, complete);
                            match encode_and_reopen(&assembled) {
                                Ok((payload, reopened)) => {
                                    *state = BookingFlowState::AwaitingPayment {
                                        draft: reopened,
                                        payload,
                                        method: None,
                                        payment_error: None,
                                    };
                                }
                                Err(error) => {
                                    tracing::error!(%error, "Draft handoff failed");
                                }
                            }
                        }
                        Err(error) => *validation_error = Some(error),
                    }
                }
                smallvec![Effect::None]
            }

            // ═══════════════════════════════════════════════════════════
            // Payment and submission
            // ═══════════════════════════════════════════════════════════
            BookingFlowAction::SelectPaymentMethod { method } => {
                match state {
                    BookingFlowState::AwaitingPayment {
                        method: chosen,
                        payment_error,
                        ..
                    } => {
                        *chosen = Some(method);
                        *payment_error = None;
                    }
                    // Picking a different method after a failed submission
                    // returns to the payment step, draft untouched.
                    BookingFlowState::Failed { draft, payload, .. } => {
                        *state = BookingFlowState::AwaitingPayment {
                            draft: draft.clone(),
                            payload: payload.clone(),
                            method: Some(method),
                            payment_error: None,
                        };
                    }
                    _ => {
                        tracing::debug!(
                            phase = state.phase(),
                            "Ignoring payment method outside payment phase"
                        );
                    }
                }
                smallvec![Effect::None]
            }

            BookingFlowAction::ConfirmPayment => match state {
                BookingFlowState::AwaitingPayment {
                    draft,
                    payload,
                    method,
                    payment_error,
                } => {
                    let Some(chosen) = method.as_ref() else {
                        *payment_error = Some(PaymentError::NoMethodSelected);
                        return smallvec![Effect::None];
                    };
                    if let Err(error) = payment::validate_method(chosen) {
                        *payment_error = Some(error);
                        return smallvec![Effect::None];
                    }

                    let receipt =
                        payment::receipt(chosen, env.references().generate(), env.clock().now());
                    let effect = submit_effect(env, draft.clone(), receipt.clone());
                    *state = BookingFlowState::Submitting {
                        draft: draft.clone(),
                        payload: payload.clone(),
                        method: chosen.clone(),
                        receipt,
                    };
                    smallvec![effect]
                }

                // Retry: same draft, fresh payment reference and timestamp.
                BookingFlowState::Failed {
                    draft,
                    payload,
                    method,
                    ..
                } => {
                    if let Err(error) = payment::validate_method(method) {
                        *state = BookingFlowState::AwaitingPayment {
                            draft: draft.clone(),
                            payload: payload.clone(),
                            method: Some(method.clone()),
                            payment_error: Some(error),
                        };
                        return smallvec![Effect::None];
                    }

                    let receipt =
                        payment::receipt(method, env.references().generate(), env.clock().now());
                    let effect = submit_effect(env, draft.clone(), receipt.clone());
                    *state = BookingFlowState::Submitting {
                        draft: draft.clone(),
                        payload: payload.clone(),
                        method: method.clone(),
                        receipt,
                    };
                    smallvec![effect]
                }

                BookingFlowState::Submitting { .. } => {
                    tracing::debug!("Ignoring confirm while a submission is in flight");
                    smallvec![Effect::None]
                }

                _ => {
                    tracing::debug!(
                        phase = state.phase(),
                        "Ignoring confirm outside payment phase"
                    );
                    smallvec![Effect::None]
                }
            },

            BookingFlowAction::BookingCreated { booking } => {
                if matches!(state, BookingFlowState::Submitting { .. }) {
                    *state = BookingFlowState::Confirmed {
                        booking,
                        bookings: None,
                    };
                    smallvec![refresh_effect(env)]
                } else {
                    tracing::debug!(
                        phase = state.phase(),
                        "Ignoring booking result outside submission"
                    );
                    smallvec![Effect::None]
                }
            }

            BookingFlowAction::SubmissionFailed { message } => {
                if let BookingFlowState::Submitting {
                    draft,
                    payload,
                    method,
                    ..
                } = state
                {
                    *state = BookingFlowState::Failed {
                        draft: draft.clone(),
                        payload: payload.clone(),
                        method: method.clone(),
                        message,
                    };
                } else {
                    tracing::debug!(%message, "Ignoring submission failure outside submission");
                }
                smallvec![Effect::None]
            }

            // ═══════════════════════════════════════════════════════════
            // Confirmation
            // ═══════════════════════════════════════════════════════════
            BookingFlowAction::BookingsRefreshed { bookings } => {
                if let BookingFlowState::Confirmed {
                    bookings: refreshed,
                    ..
                } = state
                {
                    *refreshed = Some(bookings);
                }
                smallvec![Effect::None]
            }

            BookingFlowAction::BookingsRefreshFailed { message } => {
                // Non-fatal: the confirmation stands, the list is just stale.
                tracing::debug!(%message, "Bookings refresh failed after confirmation");
                smallvec![Effect::None]
            }

            BookingFlowAction::Abandon => {
                *state = BookingFlowState::Idle;
                smallvec![
                    Effect::cancel(LOAD_PRIEST),
                    Effect::cancel(SUBMIT_BOOKING),
                    Effect::cancel(REFRESH_BOOKINGS),
                ]
            }
        }
    }
}

/// Encode the draft as it crosses to the payment step, then decode the
/// payment step's own working copy back out of the payload.
fn encode_and_reopen(
    draft: &BookingDraft,
) -> Result<(HandoffPayload, BookingDraft), HandoffError> {
    let payload = HandoffPayload::encode(draft)?;
    let reopened = payload.decode()?;
    Ok((payload, reopened))
}

fn load_priest_effect(
    env: &BookingFlowEnvironment,
    priest_id: String,
) -> Effect<BookingFlowAction> {
    let api = env.api();
    Effect::cancellable(LOAD_PRIEST, async move {
        match api.priest_details(priest_id).await {
            Ok(priest) => Some(BookingFlowAction::PriestLoaded { priest }),
            Err(error) => {
                tracing::warn!(%error, "Failed to load priest details");
                Some(BookingFlowAction::PriestLoadFailed {
                    message: PRIEST_UNAVAILABLE.to_string(),
                })
            }
        }
    })
}

/// Submission effect: read the devotee id, merge the body, post it.
///
/// The session read happens inside the effect so a sign-out between
/// confirm and dispatch is still caught.
fn submit_effect(
    env: &BookingFlowEnvironment,
    draft: BookingDraft,
    receipt: PaymentReceipt,
) -> Effect<BookingFlowAction> {
    let api = env.api();
    let session = env.session();
    Effect::cancellable(SUBMIT_BOOKING, async move {
        let devotee_id = match session.devotee_id() {
            Ok(Some(id)) => id,
            Ok(None) => {
                tracing::warn!("No signed-in devotee, cannot submit booking");
                return Some(BookingFlowAction::SubmissionFailed {
                    message: NOT_SIGNED_IN.to_string(),
                });
            }
            Err(error) => {
                tracing::warn!(%error, "Failed to read devotee id from session");
                return Some(BookingFlowAction::SubmissionFailed {
                    message: NOT_SIGNED_IN.to_string(),
                });
            }
        };

        let request = draft::submission_request(devotee_id, &draft, &receipt);
        match api.create_booking(request).await {
            Ok(booking) => Some(BookingFlowAction::BookingCreated { booking }),
            Err(error) => {
                tracing::warn!(%error, "Booking submission failed");
                Some(BookingFlowAction::SubmissionFailed {
                    message: error.user_message(SUBMISSION_FALLBACK),
                })
            }
        }
    })
}

fn refresh_effect(env: &BookingFlowEnvironment) -> Effect<BookingFlowAction> {
    let api = env.api();
    Effect::cancellable(REFRESH_BOOKINGS, async move {
        match api.devotee_bookings().await {
            Ok(bookings) => Some(BookingFlowAction::BookingsRefreshed { bookings }),
            Err(error) => {
                tracing::warn!(%error, "Failed to refresh bookings after confirmation");
                Some(BookingFlowAction::BookingsRefreshFailed {
                    message: error.user_message(REFRESH_FALLBACK),
                })
            }
        }
    })
}
