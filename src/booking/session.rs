//! A customer's booking session: selection plus wizard position.
//!
//! Selection methods check keys against the catalog at the time they are
//! made. Changing the service does not clear size or length; a selection
//! that the new service does not offer is detected by the estimator and
//! cleared by [`BookingSession::refresh`], which also moves the wizard
//! back to the step where it must be re-entered.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::catalog::{Catalog, LengthKey, SizeKey};
use crate::pricing::{compute_estimate, EstimateResult, PricingError};

use super::models::{BookingState, BookingStatus, CustomerInfo, TransitionError};
use super::submission::BookingRequest;
use super::validation::{parse_time_of_day, Field, ValidationError};
use super::wizard::{self, StepNotReady, WizardState, WizardStep};

/// Session operation errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotReady(#[from] StepNotReady),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Booking is {0} and can no longer be edited")]
    Locked(BookingStatus),
}

/// Result of a successful `advance`
#[derive(Debug)]
pub enum Advanced {
    Moved(WizardState),
    /// Contact step passed; the request must be handed off before the
    /// session is marked submitted.
    ReadyToSubmit(BookingRequest),
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingSession {
    pub id: Uuid,
    pub booking: BookingState,
    pub wizard: WizardState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for BookingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            booking: BookingState::new(),
            wizard: WizardState::default(),
            created_at: now,
            updated_at: now,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Selections can only change while the booking is an unsubmitted draft.
    fn ensure_editable(&self) -> Result<(), SessionError> {
        if self.wizard.is_submitted() || self.booking.status() != BookingStatus::Draft {
            return Err(SessionError::Locked(self.booking.status()));
        }
        Ok(())
    }

    pub fn select_service(&mut self, catalog: &Catalog, service_id: &str) -> Result<(), SessionError> {
        self.ensure_editable()?;
        let service = catalog.service(service_id).ok_or_else(|| {
            ValidationError::invalid(Field::Service, format!("unknown service '{service_id}'"))
        })?;
        self.booking.selected_service = Some(service.id.clone());
        self.touch();
        Ok(())
    }

    pub fn select_size(&mut self, catalog: &Catalog, size: SizeKey) -> Result<(), SessionError> {
        self.ensure_editable()?;
        let service = self
            .booking
            .selected_service
            .as_deref()
            .and_then(|id| catalog.service(id))
            .ok_or(ValidationError::Missing {
                field: Field::Service,
            })?;
        if service.size_variant(size).is_none() {
            return Err(ValidationError::invalid(
                Field::Size,
                format!("{} is not offered in {size}", service.name),
            )
            .into());
        }
        self.booking.selected_size = Some(size);
        self.touch();
        Ok(())
    }

    pub fn select_length(&mut self, catalog: &Catalog, length: LengthKey) -> Result<(), SessionError> {
        self.ensure_editable()?;
        let service = self
            .booking
            .selected_service
            .as_deref()
            .and_then(|id| catalog.service(id))
            .ok_or(ValidationError::Missing {
                field: Field::Service,
            })?;
        if service.length_variant(length).is_none() {
            return Err(ValidationError::invalid(
                Field::Length,
                format!("{} is not offered at {length} length", service.name),
            )
            .into());
        }
        self.booking.selected_length = Some(length);
        self.touch();
        Ok(())
    }

    /// Attach an add-on. Returns `false` if it was already attached.
    pub fn add_add_on(&mut self, catalog: &Catalog, add_on_id: &str) -> Result<bool, SessionError> {
        self.ensure_editable()?;
        if catalog.add_on(add_on_id).is_none() {
            return Err(ValidationError::invalid(
                Field::AddOns,
                format!("unknown add-on '{add_on_id}'"),
            )
            .into());
        }
        let added = self.booking.add_add_on(add_on_id);
        self.touch();
        Ok(added)
    }

    /// Detach an add-on. Returns `false` if it was not attached.
    pub fn remove_add_on(&mut self, add_on_id: &str) -> Result<bool, SessionError> {
        self.ensure_editable()?;
        let removed = self.booking.remove_add_on(add_on_id);
        self.touch();
        Ok(removed)
    }

    /// Choose the appointment date. Dates before `today` are rejected.
    pub fn select_date(&mut self, date: NaiveDate, today: NaiveDate) -> Result<(), SessionError> {
        self.ensure_editable()?;
        if date < today {
            return Err(ValidationError::invalid(Field::Date, "date is in the past").into());
        }
        self.booking.selected_date = Some(date);
        self.touch();
        Ok(())
    }

    pub fn select_time(&mut self, time: &str) -> Result<(), SessionError> {
        self.ensure_editable()?;
        let time = time.trim();
        if parse_time_of_day(time).is_none() {
            return Err(ValidationError::invalid(
                Field::Time,
                format!("'{time}' is not a time of day"),
            )
            .into());
        }
        self.booking.selected_time = Some(time.to_string());
        self.touch();
        Ok(())
    }

    /// Store contact details. They are validated when the contact step is
    /// advanced, so partially typed details can be saved.
    pub fn set_contact(&mut self, info: CustomerInfo) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.booking.customer_info = Some(info.normalized());
        self.touch();
        Ok(())
    }

    pub fn estimate(&self, catalog: &Catalog) -> Result<EstimateResult, PricingError> {
        compute_estimate(&self.booking, catalog)
    }

    /// Estimate the selection, recovering from stale selections.
    ///
    /// On `InvalidSelection` the offending selections are cleared and the
    /// wizard is moved back to the earliest affected step (never forward).
    /// Returns the estimate after recovery and the step moved back to, if any.
    pub fn refresh(
        &mut self,
        catalog: &Catalog,
    ) -> Result<(EstimateResult, Option<WizardStep>), PricingError> {
        match compute_estimate(&self.booking, catalog) {
            Ok(result) => Ok((result, None)),
            Err(PricingError::InvalidSelection { service_id, field, key }) => {
                info!(
                    "Session {}: clearing stale {} '{}' for service {}",
                    self.id, field, key, service_id
                );
                let step = self.clear_stale_selections(catalog);
                let result = compute_estimate(&self.booking, catalog)?;
                Ok((result, step))
            }
            Err(e) => Err(e),
        }
    }

    /// Clear every selection the chosen service (or catalog) does not offer.
    fn clear_stale_selections(&mut self, catalog: &Catalog) -> Option<WizardStep> {
        let mut cleared: Vec<Field> = Vec::new();
        let service = self
            .booking
            .selected_service
            .as_deref()
            .and_then(|id| catalog.service(id));

        match service {
            Some(service) => {
                if let Some(size) = self.booking.selected_size {
                    if service.size_variant(size).is_none() {
                        self.booking.selected_size = None;
                        cleared.push(Field::Size);
                    }
                }
                if let Some(length) = self.booking.selected_length {
                    if service.length_variant(length).is_none() {
                        self.booking.selected_length = None;
                        cleared.push(Field::Length);
                    }
                }
            }
            None if self.booking.selected_service.is_some() => {
                self.booking.selected_service = None;
                cleared.push(Field::Service);
            }
            None => {}
        }

        let before = self.booking.selected_add_ons.len();
        self.booking
            .selected_add_ons
            .retain(|id| catalog.add_on(id).is_some());
        if self.booking.selected_add_ons.len() != before {
            cleared.push(Field::AddOns);
        }

        let step = cleared.into_iter().map(WizardStep::for_field).min()?;
        if let WizardState::InProgress { step: current } = self.wizard {
            if step < current {
                self.wizard = WizardState::InProgress { step };
            }
        }
        self.touch();
        Some(step)
    }

    /// Advance the wizard.
    ///
    /// Passing the contact step does not submit by itself: it yields the
    /// request to hand off, and [`mark_submitted`](Self::mark_submitted)
    /// is called once the hand-off succeeds.
    pub fn advance(&mut self, catalog: &Catalog) -> Result<Advanced, SessionError> {
        if self.wizard.is_submitted() {
            return Err(StepNotReady::AlreadySubmitted.into());
        }
        self.ensure_editable()?;

        let next = wizard::advance(self.wizard, &self.booking, catalog)?;
        if next.is_submitted() {
            return Ok(Advanced::ReadyToSubmit(self.submission_request(catalog)?));
        }
        debug!("Session {} advanced to {:?}", self.id, next);
        self.wizard = next;
        self.touch();
        Ok(Advanced::Moved(next))
    }

    fn submission_request(&self, catalog: &Catalog) -> Result<BookingRequest, SessionError> {
        match compute_estimate(&self.booking, catalog)? {
            EstimateResult::Complete(estimate) => Ok(BookingRequest {
                session_id: self.id,
                booking: self.booking.clone(),
                estimate,
                currency: catalog.currency().to_string(),
                submitted_at: Utc::now(),
            }),
            EstimateResult::Incomplete { missing } => {
                let step = missing
                    .iter()
                    .copied()
                    .map(WizardStep::for_field)
                    .min()
                    .unwrap_or(WizardStep::Service);
                Err(StepNotReady::Incomplete {
                    step,
                    issues: missing
                        .into_iter()
                        .map(|field| ValidationError::Missing { field })
                        .collect(),
                }
                .into())
            }
        }
    }

    /// Record a successful hand-off: the wizard is finished and the booking
    /// awaits its deposit.
    pub fn mark_submitted(&mut self) -> Result<(), SessionError> {
        self.booking.transition_to(BookingStatus::PendingDeposit)?;
        self.wizard = WizardState::Submitted;
        self.touch();
        Ok(())
    }

    pub fn retreat(&mut self) -> WizardState {
        self.wizard = wizard::retreat(self.wizard);
        self.touch();
        self.wizard
    }

    pub fn go_to(&mut self, step: WizardStep) -> Result<WizardState, SessionError> {
        self.wizard = wizard::go_to(self.wizard, step)?;
        self.touch();
        Ok(self.wizard)
    }

    /// Discard the booking and start over from step 1.
    pub fn reset(&mut self) {
        self.booking.reset();
        self.wizard = WizardState::default();
        self.touch();
    }

    pub fn cancel(&mut self) -> Result<(), SessionError> {
        self.booking.cancel()?;
        self.touch();
        Ok(())
    }

    pub fn record_deposit(&mut self) -> Result<(), SessionError> {
        self.booking.record_deposit()?;
        self.touch();
        Ok(())
    }

    pub fn complete(&mut self) -> Result<(), SessionError> {
        self.booking.transition_to(BookingStatus::Completed)?;
        self.touch();
        Ok(())
    }
}
