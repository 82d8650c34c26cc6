//! # Purohit API Client
//!
//! Typed HTTP client for the priest-booking backend's devotee endpoints:
//! priest details (ceremony catalog and prices), booking creation, and the
//! devotee's bookings list.
//!
//! Every request carries the session's bearer token when one can be read;
//! a session read failure is logged and the request proceeds without the
//! header. Responses are decoded into typed shapes and anything that does
//! not match fails fast as a parse error - there is no partially-decoded
//! fallback path.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use purohit_api::{ApiClient, ApiConfig, InMemorySession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Arc::new(InMemorySession::signed_in("token", "devotee-1"));
//!     let client = ApiClient::new(ApiConfig::from_env(), session)?;
//!
//!     let priest = client.priest_details("68b0f2a9c1d4e5f6a7b8c9d0").await?;
//!     println!("{} offers {} ceremonies", priest.name, priest.ceremonies.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - Bearer-token injection from a pluggable [`SessionStore`]
//! - Fixed request timeout, no retries (failures surface to the caller)
//! - Server error bodies (`{ "message": ... }`) extracted into [`ApiError`]
//! - File-backed and in-memory session stores

pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::ApiError;
pub use session::{FileSession, InMemorySession, SessionError, SessionStore};
pub use types::{
    Booking, BookingStatus, Ceremony, CreateBookingRequest, Location, Money, Priest,
};
