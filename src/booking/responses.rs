//! Response DTOs for booking session endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::pricing::responses::EstimateResponse;
use crate::render::RenderMode;

use super::models::{BookingState, BookingStatus};
use super::session::BookingSession;
use super::wizard::{WizardState, WizardStep, TOTAL_STEPS};

/// Wizard position for the progress bar
#[derive(Debug, Serialize)]
pub struct WizardResponse {
    pub submitted: bool,
    pub step: Option<WizardStep>,
    pub step_number: Option<u8>,
    pub step_label: Option<&'static str>,
    pub total_steps: u8,
}

impl From<WizardState> for WizardResponse {
    fn from(state: WizardState) -> Self {
        let step = state.step();
        Self {
            submitted: state.is_submitted(),
            step,
            step_number: step.map(WizardStep::number),
            step_label: step.map(WizardStep::label),
            total_steps: TOTAL_STEPS,
        }
    }
}

/// Snapshot of a booking session returned by every session endpoint
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub status: BookingStatus,
    pub deposit_paid: bool,
    pub wizard: WizardResponse,
    pub selection: BookingState,
    pub estimate: EstimateResponse,
    /// Step the customer was sent back to after a stale selection was cleared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovered_step: Option<WizardStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
    pub render_mode: RenderMode,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionResponse {
    pub fn new(session: &BookingSession, estimate: EstimateResponse, render_mode: RenderMode) -> Self {
        Self {
            id: session.id,
            status: session.booking.status(),
            deposit_paid: session.booking.deposit_paid,
            wizard: session.wizard.into(),
            selection: session.booking.clone(),
            estimate,
            recovered_step: None,
            request_id: None,
            render_mode,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

/// Response for an add-on toggle
#[derive(Debug, Serialize)]
pub struct AddOnToggleResponse {
    pub changed: bool,
    #[serde(flatten)]
    pub session: SessionResponse,
}
