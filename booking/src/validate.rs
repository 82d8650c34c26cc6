//! Completeness validation gating the payment handoff
//!
//! Checks run in a fixed order and stop at the first failure, so the
//! devotee is told about exactly one missing piece at a time: ceremony,
//! then date, then slot, then address, then city. The error messages are
//! the user-facing strings; nothing here talks to the server.

use crate::types::{Selection, TimeSlot};
use chrono::NaiveDate;
use purohit_api::types::Ceremony;
use thiserror::Error;

/// First missing piece of the selection, in checking order
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// No ceremony chosen
    #[error("Please select a ceremony type")]
    MissingCeremony,

    /// No date chosen
    #[error("Please select a date for the ceremony")]
    MissingDate,

    /// No time slot chosen
    #[error("Please select a time slot")]
    MissingSlot,

    /// Venue address empty or whitespace
    #[error("Please enter the ceremony location")]
    MissingAddress,

    /// Venue city empty or whitespace
    #[error("Please enter the city")]
    MissingCity,
}

/// A selection with every required piece present
///
/// Produced only by [`validate`]; holding one is proof the checks passed,
/// so draft assembly needs no re-checking and no unwrapping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompleteSelection<'a> {
    /// The chosen ceremony
    pub ceremony: &'a Ceremony,
    /// The chosen date
    pub date: NaiveDate,
    /// The chosen slot
    pub slot: TimeSlot,
    /// Venue street address, as entered
    pub address: &'a str,
    /// Venue city, as entered
    pub city: &'a str,
    /// Free-text notes, possibly empty
    pub notes: &'a str,
}

/// Check the selection for completeness, reporting only the first failure
///
/// # Errors
///
/// Returns the [`ValidationError`] for the first missing piece, in the
/// order ceremony, date, slot, address, city.
pub fn validate(selection: &Selection) -> Result<CompleteSelection<'_>, ValidationError> {
    let Some(ceremony) = selection.ceremony.as_ref() else {
        return Err(ValidationError::MissingCeremony);
    };
    let Some(date) = selection.date else {
        return Err(ValidationError::MissingDate);
    };
    let Some(slot) = selection.slot else {
        return Err(ValidationError::MissingSlot);
    };
    if selection.address.trim().is_empty() {
        return Err(ValidationError::MissingAddress);
    }
    if selection.city.trim().is_empty() {
        return Err(ValidationError::MissingCity);
    }

    Ok(CompleteSelection {
        ceremony,
        date,
        slot,
        address: &selection.address,
        city: &selection.city,
        notes: &selection.notes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TIME_SLOTS;
    use purohit_api::types::Money;

    fn wedding() -> Ceremony {
        Ceremony {
            id: "1".to_string(),
            name: "Wedding".to_string(),
            price: Money(8000),
        }
    }

    #[allow(clippy::unwrap_used)] // Test code
    fn march_tenth() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn empty_selection_reports_ceremony_first() {
        let selection = Selection::default();
        assert_eq!(validate(&selection), Err(ValidationError::MissingCeremony));
    }

    #[test]
    fn checks_run_in_order() {
        let mut selection = Selection::default();
        assert_eq!(validate(&selection), Err(ValidationError::MissingCeremony));

        selection.ceremony = Some(wedding());
        assert_eq!(validate(&selection), Err(ValidationError::MissingDate));

        selection.date = Some(march_tenth());
        assert_eq!(validate(&selection), Err(ValidationError::MissingSlot));

        selection.slot = Some(TIME_SLOTS[1]);
        assert_eq!(validate(&selection), Err(ValidationError::MissingAddress));

        selection.address = "123 Main St".to_string();
        assert_eq!(validate(&selection), Err(ValidationError::MissingCity));

        selection.city = "Pune".to_string();
        assert!(validate(&selection).is_ok());
    }

    #[test]
    fn address_is_reported_before_city_when_both_are_missing() {
        let selection = Selection {
            ceremony: Some(wedding()),
            date: Some(march_tenth()),
            slot: Some(TIME_SLOTS[1]),
            address: String::new(),
            city: String::new(),
            notes: String::new(),
        };

        assert_eq!(validate(&selection), Err(ValidationError::MissingAddress));
    }

    #[test]
    fn whitespace_only_text_counts_as_missing() {
        let selection = Selection {
            ceremony: Some(wedding()),
            date: Some(march_tenth()),
            slot: Some(TIME_SLOTS[1]),
            address: "   ".to_string(),
            city: "Pune".to_string(),
            notes: String::new(),
        };

        assert_eq!(validate(&selection), Err(ValidationError::MissingAddress));
    }

    #[test]
    #[allow(clippy::unwrap_used)] // Test code
    fn complete_selection_carries_the_pieces_through() {
        let selection = Selection {
            ceremony: Some(wedding()),
            date: Some(march_tenth()),
            slot: Some(TIME_SLOTS[1]),
            address: "123 Main St".to_string(),
            city: "Pune".to_string(),
            notes: "Morning preferred".to_string(),
        };

        let complete = validate(&selection).unwrap();
        assert_eq!(complete.ceremony.name, "Wedding");
        assert_eq!(complete.date, march_tenth());
        assert_eq!(complete.slot.start_time, "10:30");
        assert_eq!(complete.address, "123 Main St");
        assert_eq!(complete.city, "Pune");
        assert_eq!(complete.notes, "Morning preferred");
    }
}
