//! Environment dependencies for the booking flow reducer.
//!
//! Every external dependency the flow touches (backend, session store,
//! clock, payment reference source) is injected here behind a trait, so
//! the reducer never reaches for ambient globals and tests can substitute
//! each piece independently.

use crate::payment::{PaymentReferences, RandomPaymentReferences};
use purohit_api::types::{Booking, CreateBookingRequest, Priest};
use purohit_api::{ApiClient, ApiConfig, ApiError, FileSession, SessionStore};
use purohit_core::environment::{Clock, SystemClock};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// The three backend calls the flow makes.
///
/// Abstraction over [`ApiClient`] so effects can be driven against an
/// in-process double; see `crate::mocks::MockBookingApi`.
pub trait BookingApi: Send + Sync {
    /// Fetch a priest's profile and ceremony catalog.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request or decoding fails.
    fn priest_details(
        &self,
        priest_id: String,
    ) -> Pin<Box<dyn Future<Output = Result<Priest, ApiError>> + Send>>;

    /// Submit a booking.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the server rejects the booking or the
    /// request fails.
    fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Booking, ApiError>> + Send>>;

    /// Fetch the signed-in devotee's bookings.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request or decoding fails.
    fn devotee_bookings(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Booking>, ApiError>> + Send>>;
}

impl BookingApi for ApiClient {
    fn priest_details(
        &self,
        priest_id: String,
    ) -> Pin<Box<dyn Future<Output = Result<Priest, ApiError>> + Send>> {
        let client = self.clone();
        Box::pin(async move { client.priest_details(&priest_id).await })
    }

    fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Booking, ApiError>> + Send>> {
        let client = self.clone();
        Box::pin(async move { client.create_booking(&request).await })
    }

    fn devotee_bookings(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Booking>, ApiError>> + Send>> {
        let client = self.clone();
        Box::pin(async move { client.devotee_bookings().await })
    }
}

/// Injected dependencies for the booking flow.
#[derive(Clone)]
pub struct BookingFlowEnvironment {
    api: Arc<dyn BookingApi>,
    session: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    references: Arc<dyn PaymentReferences>,
}

impl BookingFlowEnvironment {
    /// Build an environment from its parts.
    #[must_use]
    pub fn new(
        api: Arc<dyn BookingApi>,
        session: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
        references: Arc<dyn PaymentReferences>,
    ) -> Self {
        Self {
            api,
            session,
            clock,
            references,
        }
    }

    /// Production wiring: real client, file-backed session, system clock,
    /// random payment references.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] if the HTTP client cannot be
    /// built.
    pub fn live(config: ApiConfig) -> Result<Self, ApiError> {
        let session: Arc<dyn SessionStore> = Arc::new(FileSession::from_env());
        let api = ApiClient::new(config, Arc::clone(&session))?;

        Ok(Self::new(
            Arc::new(api),
            session,
            Arc::new(SystemClock),
            Arc::new(RandomPaymentReferences),
        ))
    }

    /// Handle on the backend, cloneable into effect futures.
    #[must_use]
    pub fn api(&self) -> Arc<dyn BookingApi> {
        Arc::clone(&self.api)
    }

    /// Handle on the session store, cloneable into effect futures.
    #[must_use]
    pub fn session(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.session)
    }

    /// Clock for "today" and payment timestamps.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Source of payment reference strings.
    #[must_use]
    pub fn references(&self) -> &dyn PaymentReferences {
        self.references.as_ref()
    }
}
