//! Pricing engine module.
//!
//! Estimates the price and duration of a booking from the service catalog.
//! All money is integer minor units; decimals are only used for catalog
//! multipliers and rendered amounts.

pub mod calculators;
pub mod money;
pub mod requests;
pub mod responses;
pub mod routes;

// Re-export commonly used items
pub use calculators::{compute_estimate, round_money, Estimate, EstimateResult, PricingError};
pub use money::Money;
pub use routes::router;
