//! Boundary validation shared by every create and edit flow.
//!
//! These checks run before anything is sent to the database. Each helper trims its input
//! and returns the normalized value so callers store exactly what was validated.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Longest accepted name for channels, categories, profiles and transaction categories.
pub const MAX_NAME_LEN: usize = 100;
/// Longest accepted icon or emoji, in characters.
pub const MAX_ICON_LEN: usize = 4;
/// Longest accepted transaction description.
pub const MAX_DESCRIPTION_LEN: usize = 500;
/// Largest accepted transaction amount.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(999_999_999, 0, 0, false, 0);
/// Most decimal places an amount may carry.
pub const MAX_AMOUNT_SCALE: u32 = 2;
/// Shortest accepted password.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Why an input was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was missing or blank
    #[error("{field} is required")]
    Required {
        /// Name of the field
        field: &'static str,
    },

    /// A text field exceeded its maximum length
    #[error("{field} cannot exceed {max} characters")]
    TooLong {
        /// Name of the field
        field: &'static str,
        /// Maximum number of characters
        max: usize,
    },

    /// Amount was zero or negative
    #[error("Amount must be positive, got {amount}")]
    NonPositiveAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Amount exceeded [`MAX_AMOUNT`]
    #[error("Amount {amount} is too large")]
    AmountTooLarge {
        /// The rejected amount
        amount: Decimal,
    },

    /// Amount had more decimal places than [`MAX_AMOUNT_SCALE`]
    #[error("Amount {amount} has more than {max_scale} decimal places")]
    TooManyDecimals {
        /// The rejected amount
        amount: Decimal,
        /// Maximum number of decimal places
        max_scale: u32,
    },

    /// Transaction dated after today
    #[error("Date {date} is in the future (today is {today})")]
    FutureDate {
        /// The rejected date
        date: NaiveDate,
        /// The reference day
        today: NaiveDate,
    },

    /// A recurring transaction without a frequency
    #[error("A recurring transaction needs a frequency")]
    MissingFrequency,

    /// Recurrence end date earlier than the transaction date
    #[error("End date {end} is before {start}")]
    EndBeforeStart {
        /// Transaction date
        start: NaiveDate,
        /// Rejected end date
        end: NaiveDate,
    },

    /// Password failed a complexity rule
    #[error("Password must {rule}")]
    WeakPassword {
        /// The rule that failed, phrased to follow "Password must"
        rule: &'static str,
    },

    /// Email address is malformed
    #[error("Invalid email address")]
    InvalidEmail,
}

/// Trims `value` and checks it is non-empty and at most `max` characters.
pub fn required_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_string())
}

/// Trims an optional text field, mapping blank to `None`.
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) if text.chars().count() > max => Err(ValidationError::TooLong { field, max }),
        Some(text) => Ok(Some(text.to_string())),
    }
}

/// Amounts must be strictly positive, no larger than [`MAX_AMOUNT`] and carry at most
/// [`MAX_AMOUNT_SCALE`] decimal places. Trailing zeros do not count.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount { amount });
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge { amount });
    }
    if amount.normalize().scale() > MAX_AMOUNT_SCALE {
        return Err(ValidationError::TooManyDecimals {
            amount,
            max_scale: MAX_AMOUNT_SCALE,
        });
    }
    Ok(amount)
}

/// A transaction may be dated today or earlier, never later.
///
/// Comparison is at day granularity, which is the same as comparing against the end of
/// `today`: anything on `today` passes, anything on the next day fails.
pub fn validate_transaction_date(date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if date > today {
        return Err(ValidationError::FutureDate { date, today });
    }
    Ok(())
}

/// At least [`MIN_PASSWORD_LEN`] characters with an uppercase letter, a lowercase letter,
/// a digit and a character that is none of those.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let rules: [(&'static str, bool); 5] = [
        (
            "contain at least 8 characters",
            password.chars().count() >= MIN_PASSWORD_LEN,
        ),
        (
            "contain an uppercase letter",
            password.chars().any(|c| c.is_ascii_uppercase()),
        ),
        (
            "contain a lowercase letter",
            password.chars().any(|c| c.is_ascii_lowercase()),
        ),
        (
            "contain a digit",
            password.chars().any(|c| c.is_ascii_digit()),
        ),
        (
            "contain a special character",
            password.chars().any(|c| !c.is_ascii_alphanumeric()),
        ),
    ];

    match rules.into_iter().find(|(_, ok)| !ok) {
        Some((rule, _)) => Err(ValidationError::WeakPassword { rule }),
        None => Ok(()),
    }
}

/// Trims and lowercases an email address after a structural check.
pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim().to_lowercase();
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidEmail);
    };
    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@');
    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email)
}
