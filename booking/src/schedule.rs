//! Date rules for the booking window
//!
//! Bookings are offered over a rolling 60-day window starting today.
//! Sundays are never offered (priests keep them for recurring temple
//! commitments), and nothing in the past is selectable. "Today" always
//! comes from the injected clock so the rules are testable.

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Length of the selection window in days, today included
pub const SELECTION_WINDOW_DAYS: u64 = 60;

/// A date in the booking window with its availability
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayOption {
    /// The calendar date
    pub date: NaiveDate,
    /// Whether the devotee may pick this date
    pub selectable: bool,
}

/// The 60-day selection window starting at `today`
///
/// Returns one entry per day, in order, with Sundays marked unselectable.
#[must_use]
pub fn selection_window(today: NaiveDate) -> Vec<DayOption> {
    (0..SELECTION_WINDOW_DAYS)
        .map(|offset| {
            let date = today + Days::new(offset);
            DayOption {
                date,
                selectable: date.weekday() != Weekday::Sun,
            }
        })
        .collect()
}

/// Whether `date` may be selected when today is `today`
///
/// True iff the date is inside the window (today through day 59) and is
/// not a Sunday. Past dates and dates beyond the window are rejected.
#[must_use]
pub fn is_selectable(today: NaiveDate, date: NaiveDate) -> bool {
    date >= today
        && date < today + Days::new(SELECTION_WINDOW_DAYS)
        && date.weekday() != Weekday::Sun
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(clippy::unwrap_used)] // Test code
    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn window_spans_sixty_days_starting_today() {
        let today = date(2025, 3, 1);
        let window = selection_window(today);

        assert_eq!(window.len(), 60);
        assert_eq!(window[0].date, today);
        assert_eq!(window[59].date, date(2025, 4, 29));
    }

    #[test]
    fn sundays_are_not_selectable() {
        // 2025-03-01 is a Saturday; the next day is a Sunday.
        let window = selection_window(date(2025, 3, 1));

        assert!(window[0].selectable);
        assert!(!window[1].selectable);
        assert_eq!(window[1].date.weekday(), Weekday::Sun);

        assert!(!is_selectable(date(2025, 3, 1), date(2025, 3, 2)));
        assert!(is_selectable(date(2025, 3, 1), date(2025, 3, 10)));
    }

    #[test]
    fn past_dates_are_not_selectable() {
        let today = date(2025, 3, 10);
        assert!(!is_selectable(today, date(2025, 3, 9)));
        assert!(!is_selectable(today, date(2024, 12, 25)));
        assert!(is_selectable(today, today));
    }

    #[test]
    fn dates_beyond_the_window_are_not_selectable() {
        let today = date(2025, 3, 1);
        // Day 59 is the last offered date; day 60 is out.
        assert!(is_selectable(today, date(2025, 4, 29)));
        assert!(!is_selectable(today, date(2025, 4, 30)));
    }
}
