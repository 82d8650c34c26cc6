//! Booking flow walkthrough against the in-memory backend.
//!
//! Drives the store through a complete booking: priest load, selection,
//! an early proceed that the validator rejects, the payment handoff, a
//! submission that the gateway refuses, and the manual retry that lands
//! the booking. Run with `cargo run -p booking-flow-demo`.

use anyhow::anyhow;
use chrono::{Days, Utc};
use purohit_booking::mocks::{MockBookingApi, mock_environment};
use purohit_booking::{
    BookingFlowAction, BookingFlowState, BookingFlowStore, Ceremony, Money, PaymentMethod, Priest,
    booking_flow_store, schedule,
};
use purohit_core::environment::SystemClock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const PRIEST_ID: &str = "68b0f2a9";

fn catalog() -> Priest {
    Priest {
        id: PRIEST_ID.to_string(),
        name: "Pandit Sharma".to_string(),
        profile_picture: None,
        location: Some("Pune".to_string()),
        ceremonies: vec![
            Ceremony {
                id: "1".to_string(),
                name: "Wedding".to_string(),
                price: Money(8000),
            },
            Ceremony {
                id: "2".to_string(),
                name: "Griha Pravesh".to_string(),
                price: Money(5000),
            },
        ],
    }
}

/// Send one action and wait for its effects to settle.
async fn dispatch(store: &BookingFlowStore, action: BookingFlowAction) -> anyhow::Result<()> {
    store.send(action).await?.wait().await;
    Ok(())
}

#[allow(clippy::too_many_lines)]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "booking_flow_demo=info,purohit_booking=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api = MockBookingApi::new();
    api.set_priest(catalog());
    let store = booking_flow_store(mock_environment(&api, Arc::new(SystemClock)));

    info!(priest_id = PRIEST_ID, "Opening the booking flow");
    dispatch(
        &store,
        BookingFlowAction::Start {
            priest_id: PRIEST_ID.to_string(),
        },
    )
    .await?;
    let phase = store.state(BookingFlowState::phase).await;
    info!(phase, "Priest loaded");

    // Book the first non-Sunday within the coming week.
    let today = Utc::now().date_naive();
    let ceremony_date = (1..=7)
        .map(|offset| today + Days::new(offset))
        .find(|day| schedule::is_selectable(today, *day))
        .ok_or_else(|| anyhow!("no selectable date in the coming week"))?;

    dispatch(
        &store,
        BookingFlowAction::SelectCeremony {
            ceremony_id: "1".to_string(),
        },
    )
    .await?;
    dispatch(&store, BookingFlowAction::SelectDate { date: ceremony_date }).await?;
    dispatch(
        &store,
        BookingFlowAction::SelectSlot {
            slot_id: "2".to_string(),
        },
    )
    .await?;

    // Proceed before the venue is filled in: the validator points at the
    // first missing piece and the flow stays on the selection screen.
    dispatch(&store, BookingFlowAction::ProceedToPayment).await?;
    let complaint = store
        .state(|state| match state {
            BookingFlowState::Selecting {
                validation_error: Some(error),
                ..
            } => Some(error.to_string()),
            _ => None,
        })
        .await;
    if let Some(complaint) = complaint {
        warn!(%complaint, "Cannot proceed yet");
    }

    dispatch(
        &store,
        BookingFlowAction::EnterAddress {
            address: "123 Main St".to_string(),
        },
    )
    .await?;
    dispatch(
        &store,
        BookingFlowAction::EnterCity {
            city: "Pune".to_string(),
        },
    )
    .await?;
    dispatch(
        &store,
        BookingFlowAction::EnterNotes {
            notes: "Please bring the havan samagri".to_string(),
        },
    )
    .await?;

    dispatch(&store, BookingFlowAction::ProceedToPayment).await?;
    if let Some(draft) = store.state(|state| state.draft().cloned()).await {
        info!(
            ceremony = %draft.ceremony_type,
            date = %draft.date,
            slot_start = %draft.start_time,
            slot_end = %draft.end_time,
            base = %draft.base_price,
            fee = %draft.platform_fee,
            total = %draft.total_amount,
            "Draft assembled and handed to payment"
        );
    }

    dispatch(
        &store,
        BookingFlowAction::SelectPaymentMethod {
            method: PaymentMethod::Upi {
                vpa_id: "devotee@bank".to_string(),
            },
        },
    )
    .await?;

    // First capture attempt runs into a gateway refusal: the flow keeps the
    // priced draft and waits for the devotee to try again.
    api.fail_next_submission("Payment gateway rejected the charge");
    dispatch(&store, BookingFlowAction::ConfirmPayment).await?;
    let failure = store
        .state(|state| match state {
            BookingFlowState::Failed { message, .. } => Some(message.clone()),
            _ => None,
        })
        .await;
    if let Some(reason) = failure {
        warn!(%reason, "Submission failed; the draft is kept for retry");
    }

    // Retry resubmits the same draft; after acceptance the flow refreshes
    // the booking list in the background.
    let mut actions = store.subscribe_actions();
    dispatch(&store, BookingFlowAction::ConfirmPayment).await?;
    loop {
        let action = tokio::time::timeout(Duration::from_secs(1), actions.recv()).await??;
        if matches!(
            action,
            BookingFlowAction::BookingsRefreshed { .. }
                | BookingFlowAction::BookingsRefreshFailed { .. }
        ) {
            break;
        }
    }
    tokio::time::sleep(Duration::from_millis(50)).await;

    let confirmation = store
        .state(|state| match state {
            BookingFlowState::Confirmed { booking, bookings } => {
                Some((booking.id.clone(), bookings.as_ref().map(Vec::len)))
            }
            _ => None,
        })
        .await;
    match confirmation {
        Some((booking_id, refreshed)) => {
            info!(
                %booking_id,
                refreshed_bookings = refreshed.unwrap_or(0),
                backend_requests = api.recorded_requests().len(),
                "Booking confirmed"
            );
        }
        None => warn!("Flow did not reach confirmation"),
    }

    store.shutdown(Duration::from_secs(1)).await?;
    Ok(())
}
