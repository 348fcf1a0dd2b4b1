//! Field validation for booking selections and contact details.
//!
//! Length limits:
//! - names fit on the salon's appointment sheet
//! - phone / WhatsApp numbers allow international formatting
//! - email follows RFC 5321

use chrono::NaiveTime;
use serde::Serialize;
use validator::ValidateEmail;

use super::models::CustomerInfo;

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_PHONE_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_REQUESTS_LEN: usize = 500;

/// Booking field named in validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Service,
    Size,
    Length,
    AddOns,
    Date,
    Time,
    Name,
    Phone,
    Whatsapp,
    Email,
    SpecialRequests,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Service => "service",
            Field::Size => "size",
            Field::Length => "length",
            Field::AddOns => "add_ons",
            Field::Date => "date",
            Field::Time => "time",
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Whatsapp => "whatsapp",
            Field::Email => "email",
            Field::SpecialRequests => "special_requests",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single missing or invalid field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "problem", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: Field },

    #[error("{field} is invalid: {reason}")]
    Invalid { field: Field, reason: String },

    #[error("{field} is too long ({len} chars, max {max})")]
    TooLong { field: Field, len: usize, max: usize },
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            Self::Missing { field } | Self::Invalid { field, .. } | Self::TooLong { field, .. } => {
                *field
            }
        }
    }

    pub fn invalid(field: Field, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

fn check_len(value: &str, field: Field, max: usize, issues: &mut Vec<ValidationError>) {
    let len = value.chars().count();
    if len > max {
        issues.push(ValidationError::TooLong { field, len, max });
    }
}

/// Validate contact details for the final wizard step.
///
/// Requires a name, a phone number or WhatsApp handle, and a syntactically
/// valid email. Returns every problem found, not just the first.
pub fn validate_contact(info: Option<&CustomerInfo>) -> Result<(), Vec<ValidationError>> {
    let Some(info) = info else {
        return Err(vec![
            ValidationError::Missing { field: Field::Name },
            ValidationError::Missing { field: Field::Phone },
            ValidationError::Missing { field: Field::Email },
        ]);
    };

    let mut issues = Vec::new();

    if info.name.trim().is_empty() {
        issues.push(ValidationError::Missing { field: Field::Name });
    } else {
        check_len(&info.name, Field::Name, MAX_NAME_LEN, &mut issues);
    }

    let phone = info.phone.as_deref().map(str::trim).filter(|p| !p.is_empty());
    let whatsapp = info.whatsapp.as_deref().map(str::trim).filter(|w| !w.is_empty());
    if phone.is_none() && whatsapp.is_none() {
        issues.push(ValidationError::Missing { field: Field::Phone });
    }
    if let Some(phone) = phone {
        check_len(phone, Field::Phone, MAX_PHONE_LEN, &mut issues);
        if !looks_like_phone(phone) {
            issues.push(ValidationError::invalid(Field::Phone, "must contain digits only"));
        }
    }
    if let Some(whatsapp) = whatsapp {
        check_len(whatsapp, Field::Whatsapp, MAX_PHONE_LEN, &mut issues);
    }

    let email = info.email.trim();
    if email.is_empty() {
        issues.push(ValidationError::Missing { field: Field::Email });
    } else if email.len() > MAX_EMAIL_LEN {
        issues.push(ValidationError::TooLong {
            field: Field::Email,
            len: email.len(),
            max: MAX_EMAIL_LEN,
        });
    } else if !email.validate_email() {
        issues.push(ValidationError::invalid(Field::Email, "not a valid email address"));
    }

    if let Some(requests) = &info.special_requests {
        check_len(requests, Field::SpecialRequests, MAX_REQUESTS_LEN, &mut issues);
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Digits with optional `+`, spaces, dashes and parentheses; at least 7 digits.
fn looks_like_phone(value: &str) -> bool {
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'));
    let digits = value.chars().filter(char::is_ascii_digit).count();
    allowed && digits >= 7
}

/// Parse a time-of-day selection such as `14:30` or `2:30 PM`.
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    ["%H:%M", "%I:%M %p", "%I:%M%p"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(value, fmt).ok())
}
