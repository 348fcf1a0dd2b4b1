//! Booking wizard module.
//!
//! Holds the customer's selection, the seven-step wizard that collects it,
//! and the hand-off of a finished booking.

pub mod models;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod session;
pub mod submission;
pub mod validation;
pub mod wizard;

pub use models::{BookingState, BookingStatus, CustomerInfo};
pub use routes::router;
pub use session::{BookingSession, SessionError};
pub use submission::{BookingRequest, Submitter};
pub use wizard::{WizardState, WizardStep};
