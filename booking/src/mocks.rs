//! Mock backend and fixed dependencies for tests and demos.
//!
//! [`MockBookingApi`] is an in-memory stand-in for the real backend: it
//! serves a configured priest, echoes submitted bookings back the way the
//! server would, records every create request for inspection, and can be
//! told to fail. Pair it with [`mock_environment`] for a fully
//! deterministic flow.

use crate::environment::{BookingApi, BookingFlowEnvironment};
use crate::payment::PaymentReferences;
use purohit_api::types::{Booking, BookingStatus, CreateBookingRequest, Priest};
use purohit_api::{ApiError, InMemorySession};
use purohit_core::environment::Clock;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Default)]
struct Inner {
    priest: Option<Priest>,
    priest_failure: Option<String>,
    submission_failure: Option<String>,
    bookings: Vec<Booking>,
    requests: Vec<CreateBookingRequest>,
    next_id: u32,
    latency: Option<Duration>,
}

/// In-memory booking backend.
#[derive(Clone, Default)]
pub struct MockBookingApi {
    inner: Arc<Mutex<Inner>>,
}

impl MockBookingApi {
    /// Create an empty mock backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve this priest from `priest_details`.
    pub fn set_priest(&self, priest: Priest) {
        self.lock().priest = Some(priest);
    }

    /// Make every `priest_details` call fail with this server message.
    pub fn fail_priest_details(&self, message: impl Into<String>) {
        self.lock().priest_failure = Some(message.into());
    }

    /// Make only the next `create_booking` call fail with this server
    /// message; subsequent calls succeed again.
    pub fn fail_next_submission(&self, message: impl Into<String>) {
        self.lock().submission_failure = Some(message.into());
    }

    /// Delay every response, for cancellation and in-flight tests.
    pub fn set_latency(&self, latency: Duration) {
        self.lock().latency = Some(latency);
    }

    /// Every create request received so far, in order.
    #[must_use]
    pub fn recorded_requests(&self) -> Vec<CreateBookingRequest> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BookingApi for MockBookingApi {
    fn priest_details(
        &self,
        priest_id: String,
    ) -> Pin<Box<dyn Future<Output = Result<Priest, ApiError>> + Send>> {
        let (latency, result) = {
            let inner = self.lock();
            let result = if let Some(message) = inner.priest_failure.clone() {
                Err(ApiError::Api {
                    status: 500,
                    message: Some(message),
                })
            } else {
                match inner.priest.clone() {
                    Some(priest) if priest.id == priest_id => Ok(priest),
                    _ => Err(ApiError::NotFound {
                        message: Some("Priest not found".to_string()),
                    }),
                }
            };
            (inner.latency, result)
        };

        Box::pin(async move {
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            result
        })
    }

    fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Booking, ApiError>> + Send>> {
        let (latency, result) = {
            let mut inner = self.lock();
            let result = if let Some(message) = inner.submission_failure.take() {
                Err(ApiError::Api {
                    status: 500,
                    message: Some(message),
                })
            } else {
                inner.next_id += 1;
                let booking = Booking {
                    id: format!("bk-{:04}", inner.next_id),
                    priest_id: request.priest_id.clone(),
                    priest_name: None,
                    ceremony_type: request.ceremony_type.clone(),
                    date: request.date,
                    start_time: request.start_time.clone(),
                    end_time: request.end_time.clone(),
                    location: request.location.clone(),
                    notes: request.notes.clone(),
                    base_price: request.base_price,
                    platform_fee: request.platform_fee,
                    total_amount: request.total_amount,
                    status: BookingStatus::Pending,
                    payment_id: Some(request.payment_id.clone()),
                    created_at: None,
                };
                inner.bookings.push(booking.clone());
                inner.requests.push(request);
                Ok(booking)
            };
            (inner.latency, result)
        };

        Box::pin(async move {
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            result
        })
    }

    fn devotee_bookings(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Booking>, ApiError>> + Send>> {
        let (latency, bookings) = {
            let inner = self.lock();
            (inner.latency, inner.bookings.clone())
        };

        Box::pin(async move {
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            Ok(bookings)
        })
    }
}

/// Payment reference source that always returns the same reference.
#[derive(Clone, Debug)]
pub struct FixedPaymentReferences {
    reference: String,
}

impl FixedPaymentReferences {
    /// Create a source pinned to `reference`.
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }
}

impl PaymentReferences for FixedPaymentReferences {
    fn generate(&self) -> String {
        self.reference.clone()
    }
}

/// Deterministic environment around a mock backend: signed-in session for
/// devotee `"devotee-1"`, payment reference `"PAYTEST0001"`, and the given
/// clock.
#[must_use]
pub fn mock_environment(api: &MockBookingApi, clock: Arc<dyn Clock>) -> BookingFlowEnvironment {
    BookingFlowEnvironment::new(
        Arc::new(api.clone()),
        Arc::new(InMemorySession::signed_in("test-token", "devotee-1")),
        clock,
        Arc::new(FixedPaymentReferences::new("PAYTEST0001")),
    )
}
