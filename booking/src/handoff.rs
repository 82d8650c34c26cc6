//! Serialized draft handoff between selection and payment
//!
//! The draft crosses from the selection step to the payment step as an
//! opaque JSON string, the same way it would cross a navigation boundary.
//! The payment step decodes its own copy; later edits to selection state
//! can never reach a draft that has already been handed off.

use crate::types::BookingDraft;
use thiserror::Error;

/// Failure while encoding or decoding the handoff payload
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HandoffError {
    /// The draft could not be serialized
    #[error("Failed to encode booking draft: {0}")]
    Serialize(String),

    /// The payload did not decode back into a draft
    #[error("Failed to decode booking draft: {0}")]
    Deserialize(String),
}

/// An encoded draft in transit to the payment step
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandoffPayload(String);

impl HandoffPayload {
    /// Encode a draft for the handoff
    ///
    /// # Errors
    ///
    /// Returns [`HandoffError::Serialize`] if the draft cannot be turned
    /// into JSON.
    pub fn encode(draft: &BookingDraft) -> Result<Self, HandoffError> {
        serde_json::to_string(draft)
            .map(Self)
            .map_err(|error| HandoffError::Serialize(error.to_string()))
    }

    /// Decode the payload back into a draft
    ///
    /// # Errors
    ///
    /// Returns [`HandoffError::Deserialize`] if the payload is not a
    /// well-formed draft.
    pub fn decode(&self) -> Result<BookingDraft, HandoffError> {
        serde_json::from_str(&self.0)
            .map_err(|error| HandoffError::Deserialize(error.to_string()))
    }

    /// The raw encoded form
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
