//! Wire types for the devotee booking endpoints
//!
//! Shapes mirror the backend's JSON exactly: camelCase field names and
//! Mongo-style `_id` keys. Amounts are whole rupees; see [`Money`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Integer rupee amount
///
/// All pricing in the flow is whole rupees; there are no fractional
/// amounts anywhere. Serializes as a bare JSON number.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Money(pub i64);

impl Money {
    /// Zero rupees
    pub const ZERO: Self = Self(0);

    /// Amount in whole rupees
    #[must_use]
    pub const fn rupees(self) -> i64 {
        self.0
    }
}

impl std::ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "₹{}", self.0)
    }
}

/// A ceremony a priest offers, with its listed base price
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ceremony {
    /// Catalog identifier (opaque, server-assigned)
    pub id: String,
    /// Display name, e.g. "Wedding" or "Griha Pravesh"
    pub name: String,
    /// Base price in whole rupees
    pub price: Money,
}

/// Priest profile as returned by `GET /api/devotee/priests/{id}`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Priest {
    /// Server-assigned identifier
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name
    pub name: String,
    /// Profile picture URL
    #[serde(default)]
    pub profile_picture: Option<String>,
    /// Free-text home location
    #[serde(default)]
    pub location: Option<String>,
    /// Ceremonies this priest offers
    #[serde(default)]
    pub ceremonies: Vec<Ceremony>,
}

/// Ceremony venue
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Street address
    pub address: String,
    /// City
    pub city: String,
}

/// Lifecycle status of a booking, server-owned
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Created, awaiting the priest's acceptance
    Pending,
    /// Accepted by the priest
    Confirmed,
    /// Ceremony performed
    Completed,
    /// Cancelled by either party
    Cancelled,
}

/// A booking as the server stores it
///
/// Superset of the create request: the server assigns `_id` and `status`
/// and echoes the submitted fields back.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Server-assigned identifier
    #[serde(rename = "_id")]
    pub id: String,
    /// Booked priest
    pub priest_id: String,
    /// Priest display name, when the server denormalizes it
    #[serde(default)]
    pub priest_name: Option<String>,
    /// Name of the booked ceremony
    pub ceremony_type: String,
    /// Ceremony date (UTC midnight of the selected day)
    pub date: DateTime<Utc>,
    /// Slot start, `HH:MM`
    pub start_time: String,
    /// Slot end, `HH:MM`
    pub end_time: String,
    /// Ceremony venue
    pub location: Location,
    /// Devotee's free-text notes
    #[serde(default)]
    pub notes: String,
    /// Ceremony base price
    pub base_price: Money,
    /// 5% marketplace fee
    pub platform_fee: Money,
    /// Base price plus fee
    pub total_amount: Money,
    /// Lifecycle status
    pub status: BookingStatus,
    /// Payment reference, when a payment was recorded
    #[serde(default)]
    pub payment_id: Option<String>,
    /// Creation timestamp, when the server reports it
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Request body for `POST /api/devotee/bookings`
///
/// The merge of the devotee's identity, every draft field, and the payment
/// receipt - one flat object, exactly as the backend expects it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    /// Devotee placing the booking (from the session)
    pub devotee_id: String,
    /// Booked priest
    pub priest_id: String,
    /// Name of the booked ceremony
    pub ceremony_type: String,
    /// Ceremony date (UTC midnight of the selected day)
    pub date: DateTime<Utc>,
    /// Slot start, `HH:MM`
    pub start_time: String,
    /// Slot end, `HH:MM`
    pub end_time: String,
    /// Ceremony venue
    pub location: Location,
    /// Devotee's free-text notes (empty string when none)
    pub notes: String,
    /// Ceremony base price
    pub base_price: Money,
    /// 5% marketplace fee, recomputed client-side
    pub platform_fee: Money,
    /// Base price plus fee
    pub total_amount: Money,
    /// Payment method label, `"upi"` or `"card"`
    pub payment_method: String,
    /// Always `"completed"` at submission time
    pub payment_status: String,
    /// Locally generated payment reference
    pub payment_id: String,
    /// When the payment was captured
    pub payment_date: DateTime<Utc>,
}
