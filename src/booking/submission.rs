//! Hand-off of submitted bookings.
//!
//! The booking engine does not own persistence. A submitted booking is
//! passed to a `Submitter`, which either records it in Postgres for the
//! salon's back office or just logs it when no database is configured.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::db;
use crate::pricing::Estimate;

use super::models::BookingState;

/// A booking that passed every wizard step, with its final estimate
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub session_id: Uuid,
    pub booking: BookingState,
    pub estimate: Estimate,
    pub currency: String,
    pub submitted_at: DateTime<Utc>,
}

/// Submission failures, reported back to the customer as a retryable error
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to encode booking: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Where submitted bookings go
#[derive(Clone)]
pub enum Submitter {
    /// Log only (development, or no database configured)
    Log,
    Postgres(PgPool),
}

impl Submitter {
    pub fn name(&self) -> &'static str {
        match self {
            Submitter::Log => "log",
            Submitter::Postgres(_) => "postgres",
        }
    }

    /// Hand off a booking request. Returns the stored request id.
    pub async fn submit(&self, request: &BookingRequest) -> Result<Uuid, SubmissionError> {
        match self {
            Submitter::Log => {
                info!(
                    "Booking request from session {}: {} {} {} on {:?} at {:?}, total {} {}",
                    request.session_id,
                    request.estimate.service_id,
                    request.estimate.size,
                    request.estimate.length,
                    request.booking.selected_date,
                    request.booking.selected_time,
                    request.estimate.total_price,
                    request.currency
                );
                Ok(request.session_id)
            }
            Submitter::Postgres(pool) => {
                let id = db::insert_booking_request(pool, request).await?;
                info!(
                    "Stored booking request {} for session {}",
                    id, request.session_id
                );
                Ok(id)
            }
        }
    }
}

impl std::fmt::Debug for Submitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
