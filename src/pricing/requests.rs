//! Request DTOs for pricing API endpoints.

use serde::Deserialize;

use crate::booking::models::BookingState;
use crate::catalog::{LengthKey, SizeKey};

/// Request to estimate a selection without a booking session
#[derive(Debug, Default, Deserialize)]
pub struct EstimateRequest {
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub size: Option<SizeKey>,
    #[serde(default)]
    pub length: Option<LengthKey>,
    #[serde(default)]
    pub add_ons: Vec<String>,
}

impl EstimateRequest {
    pub fn into_selection(self) -> BookingState {
        let mut selection = BookingState::new();
        selection.selected_service = self.service_id;
        selection.selected_size = self.size;
        selection.selected_length = self.length;
        selection.selected_add_ons = self.add_ons;
        selection
    }
}
