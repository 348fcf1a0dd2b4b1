//! In-progress booking state and its status lifecycle.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::{LengthKey, SizeKey};

/// Booking lifecycle status.
///
/// Moves forward through `Draft -> PendingDeposit -> Confirmed -> Completed`.
/// `Cancelled` is reachable from any non-terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Draft,
    PendingDeposit,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingDeposit => "pending_deposit",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Position in the forward sequence; `None` for `Cancelled`.
    fn rank(self) -> Option<u8> {
        match self {
            Self::Draft => Some(0),
            Self::PendingDeposit => Some(1),
            Self::Confirmed => Some(2),
            Self::Completed => Some(3),
            Self::Cancelled => None,
        }
    }

    /// Whether `self -> next` is a legal transition.
    ///
    /// Forward moves go one status at a time. Going back to `Draft` is not
    /// a transition; it is a reset.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self.rank(), next.rank()) {
            (_, None) => true,
            (Some(from), Some(to)) => to == from + 1,
            (None, Some(_)) => false,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Illegal status transition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Cannot move booking from {from} to {to}")]
pub struct TransitionError {
    pub from: BookingStatus,
    pub to: BookingStatus,
}

/// Customer contact details collected on the last wizard step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub special_requests: Option<String>,
}

impl CustomerInfo {
    /// Trim every field and drop optional fields that end up empty.
    pub fn normalized(self) -> Self {
        fn opt(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            name: self.name.trim().to_string(),
            phone: opt(self.phone),
            whatsapp: opt(self.whatsapp),
            email: self.email.trim().to_string(),
            special_requests: opt(self.special_requests),
        }
    }
}

/// The customer's in-progress selection.
///
/// Selections are plain fields; the wizard and the estimator check them
/// against the catalog. Only the status is guarded, since its transitions
/// are constrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookingState {
    pub selected_service: Option<String>,
    pub selected_size: Option<SizeKey>,
    pub selected_length: Option<LengthKey>,
    pub selected_add_ons: Vec<String>,
    pub selected_date: Option<NaiveDate>,
    pub selected_time: Option<String>,
    pub customer_info: Option<CustomerInfo>,
    pub deposit_paid: bool,
    status: BookingStatus,
}

impl BookingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> BookingStatus {
        self.status
    }

    /// Attach an add-on. Returns `false` if it was already attached.
    pub fn add_add_on(&mut self, id: &str) -> bool {
        if self.selected_add_ons.iter().any(|a| a == id) {
            return false;
        }
        self.selected_add_ons.push(id.to_string());
        true
    }

    /// Detach an add-on. Returns `false` if it was not attached.
    pub fn remove_add_on(&mut self, id: &str) -> bool {
        let before = self.selected_add_ons.len();
        self.selected_add_ons.retain(|a| a != id);
        self.selected_add_ons.len() != before
    }

    pub fn transition_to(&mut self, next: BookingStatus) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(TransitionError {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), TransitionError> {
        self.transition_to(BookingStatus::Cancelled)
    }

    /// Record the deposit and confirm the booking.
    pub fn record_deposit(&mut self) -> Result<(), TransitionError> {
        if self.status != BookingStatus::PendingDeposit {
            return Err(TransitionError {
                from: self.status,
                to: BookingStatus::Confirmed,
            });
        }
        self.deposit_paid = true;
        self.status = BookingStatus::Confirmed;
        Ok(())
    }

    /// Discard everything and start over as a fresh draft.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
