//! Payment method validation and capture
//!
//! The payment step is simulated client-side: validating the entered
//! method details and stamping a locally generated reference stands in for
//! a real gateway. A capture always succeeds once the details pass
//! validation, so every receipt carries status `"completed"`.

use crate::types::{PaymentMethod, PaymentReceipt};
use chrono::{DateTime, Utc};
use rand::Rng;
use thiserror::Error;

/// Why the entered payment details cannot be captured
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// Confirm was pressed with no method chosen
    #[error("Please select a payment method")]
    NoMethodSelected,

    /// One or more card fields are empty
    #[error("Please enter all card details")]
    IncompleteCardDetails,

    /// UPI was chosen but the VPA field is empty
    #[error("Please enter UPI ID")]
    MissingUpiId,
}

/// Check that the chosen method has all its details filled in
///
/// # Errors
///
/// Returns [`PaymentError::MissingUpiId`] for a UPI method with a blank
/// VPA, or [`PaymentError::IncompleteCardDetails`] when any card field is
/// blank.
pub fn validate_method(method: &PaymentMethod) -> Result<(), PaymentError> {
    match method {
        PaymentMethod::Upi { vpa_id } => {
            if vpa_id.trim().is_empty() {
                return Err(PaymentError::MissingUpiId);
            }
        }
        PaymentMethod::Card {
            number,
            expiry,
            cvv,
            holder,
        } => {
            let any_blank = [number, expiry, cvv, holder]
                .iter()
                .any(|field| field.trim().is_empty());
            if any_blank {
                return Err(PaymentError::IncompleteCardDetails);
            }
        }
    }
    Ok(())
}

/// Stamp a receipt for a validated method
#[must_use]
pub fn receipt(
    method: &PaymentMethod,
    payment_id: String,
    captured_at: DateTime<Utc>,
) -> PaymentReceipt {
    PaymentReceipt {
        payment_method: method.label().to_string(),
        payment_status: "completed".to_string(),
        payment_id,
        payment_date: captured_at,
    }
}

/// Source of payment reference strings
///
/// Injected so tests can pin the reference while production draws random
/// ones.
pub trait PaymentReferences: Send + Sync {
    /// Produce a fresh payment reference
    fn generate(&self) -> String;
}

const REFERENCE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const REFERENCE_LENGTH: usize = 8;

/// Production reference source: `PAY` plus eight random base-36 characters
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomPaymentReferences;

impl PaymentReferences for RandomPaymentReferences {
    fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..REFERENCE_LENGTH)
            .map(|_| REFERENCE_ALPHABET[rng.gen_range(0..REFERENCE_ALPHABET.len())] as char)
            .collect();
        format!("PAY{suffix}")
    }
}
