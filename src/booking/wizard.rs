//! Booking wizard steps and navigation.
//!
//! The wizard is linear: each step must be satisfied before `advance`
//! moves past it, `retreat` never clears data, and forward jumps are
//! rejected rather than clamped.

use serde::Serialize;

use crate::catalog::Catalog;

use super::models::BookingState;
use super::validation::{parse_time_of_day, validate_contact, Field, ValidationError};

/// The seven steps of the booking wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Service,
    Size,
    Length,
    AddOns,
    Date,
    Time,
    Contact,
}

/// Total number of steps in the wizard.
pub const TOTAL_STEPS: u8 = 7;

impl WizardStep {
    pub const ALL: [WizardStep; 7] = [
        WizardStep::Service,
        WizardStep::Size,
        WizardStep::Length,
        WizardStep::AddOns,
        WizardStep::Date,
        WizardStep::Time,
        WizardStep::Contact,
    ];

    /// Convert a 1-based step number.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1..=TOTAL_STEPS => Some(Self::ALL[usize::from(n - 1)]),
            _ => None,
        }
    }

    /// 1-based step number.
    pub fn number(self) -> u8 {
        match self {
            Self::Service => 1,
            Self::Size => 2,
            Self::Length => 3,
            Self::AddOns => 4,
            Self::Date => 5,
            Self::Time => 6,
            Self::Contact => 7,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Service => "Service Selection",
            Self::Size => "Size Selection",
            Self::Length => "Length Selection",
            Self::AddOns => "Add-ons",
            Self::Date => "Date Selection",
            Self::Time => "Time Selection",
            Self::Contact => "Contact Information",
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    /// Step on which a field is entered
    pub fn for_field(field: Field) -> Self {
        match field {
            Field::Service => Self::Service,
            Field::Size => Self::Size,
            Field::Length => Self::Length,
            Field::AddOns => Self::AddOns,
            Field::Date => Self::Date,
            Field::Time => Self::Time,
            Field::Name | Field::Phone | Field::Whatsapp | Field::Email | Field::SpecialRequests => {
                Self::Contact
            }
        }
    }
}

/// Position in the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WizardState {
    InProgress { step: WizardStep },
    Submitted,
}

impl Default for WizardState {
    fn default() -> Self {
        WizardState::InProgress {
            step: WizardStep::Service,
        }
    }
}

impl WizardState {
    pub fn step(self) -> Option<WizardStep> {
        match self {
            WizardState::InProgress { step } => Some(step),
            WizardState::Submitted => None,
        }
    }

    pub fn is_submitted(self) -> bool {
        self == WizardState::Submitted
    }
}

/// Why the wizard cannot move forward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StepNotReady {
    #[error("Step {} ({}) is not complete", .step.number(), .step.label())]
    Incomplete {
        step: WizardStep,
        issues: Vec<ValidationError>,
    },

    #[error("Cannot jump from step {from} to step {to}")]
    Skip { from: u8, to: u8 },

    #[error("Booking has already been submitted")]
    AlreadySubmitted,
}

/// Check that the data a step collects is present and valid.
pub fn check_step(
    step: WizardStep,
    booking: &BookingState,
    catalog: &Catalog,
) -> Result<(), StepNotReady> {
    let issues = step_issues(step, booking, catalog);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(StepNotReady::Incomplete { step, issues })
    }
}

fn step_issues(step: WizardStep, booking: &BookingState, catalog: &Catalog) -> Vec<ValidationError> {
    let service = booking
        .selected_service
        .as_deref()
        .and_then(|id| catalog.service(id));

    match step {
        WizardStep::Service => match &booking.selected_service {
            None => vec![ValidationError::Missing { field: Field::Service }],
            Some(id) if service.is_none() => {
                vec![ValidationError::invalid(Field::Service, format!("unknown service '{id}'"))]
            }
            Some(_) => vec![],
        },
        WizardStep::Size => match (booking.selected_size, service) {
            (None, _) => vec![ValidationError::Missing { field: Field::Size }],
            (Some(size), Some(service)) if service.size_variant(size).is_none() => {
                vec![ValidationError::invalid(
                    Field::Size,
                    format!("{} is not offered in {size}", service.name),
                )]
            }
            (Some(_), None) => vec![ValidationError::Missing { field: Field::Service }],
            (Some(_), Some(_)) => vec![],
        },
        WizardStep::Length => match (booking.selected_length, service) {
            (None, _) => vec![ValidationError::Missing { field: Field::Length }],
            (Some(length), Some(service)) if service.length_variant(length).is_none() => {
                vec![ValidationError::invalid(
                    Field::Length,
                    format!("{} is not offered at {length} length", service.name),
                )]
            }
            (Some(_), None) => vec![ValidationError::Missing { field: Field::Service }],
            (Some(_), Some(_)) => vec![],
        },
        WizardStep::AddOns => vec![],
        WizardStep::Date => match booking.selected_date {
            None => vec![ValidationError::Missing { field: Field::Date }],
            Some(_) => vec![],
        },
        WizardStep::Time => match booking.selected_time.as_deref() {
            None => vec![ValidationError::Missing { field: Field::Time }],
            Some(time) if parse_time_of_day(time).is_none() => {
                vec![ValidationError::invalid(Field::Time, format!("'{time}' is not a time of day"))]
            }
            Some(_) => vec![],
        },
        WizardStep::Contact => match validate_contact(booking.customer_info.as_ref()) {
            Ok(()) => vec![],
            Err(issues) => issues,
        },
    }
}

/// Move to the next step if the current one is satisfied.
///
/// A satisfied contact step moves to `Submitted`.
pub fn advance(
    state: WizardState,
    booking: &BookingState,
    catalog: &Catalog,
) -> Result<WizardState, StepNotReady> {
    let WizardState::InProgress { step } = state else {
        return Err(StepNotReady::AlreadySubmitted);
    };

    check_step(step, booking, catalog)?;

    Ok(match step.next() {
        Some(next) => WizardState::InProgress { step: next },
        None => WizardState::Submitted,
    })
}

/// Move back one step. No-op on the first step and once submitted.
pub fn retreat(state: WizardState) -> WizardState {
    match state {
        WizardState::InProgress { step } => WizardState::InProgress {
            step: step.previous().unwrap_or(step),
        },
        WizardState::Submitted => WizardState::Submitted,
    }
}

/// Jump to an earlier (or the current) step.
///
/// Forward jumps are rejected; the only way forward is `advance`.
pub fn go_to(state: WizardState, target: WizardStep) -> Result<WizardState, StepNotReady> {
    let WizardState::InProgress { step } = state else {
        return Err(StepNotReady::AlreadySubmitted);
    };
    if target > step {
        return Err(StepNotReady::Skip {
            from: step.number(),
            to: target.number(),
        });
    }
    Ok(WizardState::InProgress { step: target })
}
