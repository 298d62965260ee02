//! Date rule for recurring transactions.
//!
//! Recurrence is metadata: a recurring transaction records its frequency and the next
//! date it would fall on, but nothing here creates transactions. The only computation is
//! rolling an anchor date forward by one period.

use crate::entities::transaction::Frequency;
use chrono::{Days, Months, NaiveDate};

/// Returns the occurrence one `frequency` step after `anchor`.
///
/// Monthly and yearly steps follow the calendar and clamp to the last day of the target
/// month, so Jan 31 rolls to Feb 28 (or 29) and Feb 29 rolls to Feb 28 the next year.
/// Dates at the edge of the representable range saturate at [`NaiveDate::MAX`].
#[must_use]
pub fn next_occurrence(frequency: Frequency, anchor: NaiveDate) -> NaiveDate {
    let next = match frequency {
        Frequency::Daily => anchor.checked_add_days(Days::new(1)),
        Frequency::Weekly => anchor.checked_add_days(Days::new(7)),
        Frequency::Monthly => anchor.checked_add_months(Months::new(1)),
        Frequency::Yearly => anchor.checked_add_months(Months::new(12)),
    };
    next.unwrap_or(NaiveDate::MAX)
}

/// Next occurrence after `anchor`, or `None` once the series has passed `end_date`.
#[must_use]
pub fn next_occurrence_until(
    frequency: Frequency,
    anchor: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Option<NaiveDate> {
    let next = next_occurrence(frequency, anchor);
    match end_date {
        Some(end) if next > end => None,
        _ => Some(next),
    }
}
