//! Request DTOs for booking session endpoints.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::catalog::{LengthKey, SizeKey};

#[derive(Debug, Deserialize)]
pub struct SelectServiceRequest {
    pub service_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectSizeRequest {
    pub size: SizeKey,
}

#[derive(Debug, Deserialize)]
pub struct SelectLengthRequest {
    pub length: LengthKey,
}

#[derive(Debug, Deserialize)]
pub struct AddAddOnRequest {
    pub add_on_id: String,
}

/// Appointment date as `YYYY-MM-DD`
#[derive(Debug, Deserialize)]
pub struct SelectDateRequest {
    pub date: NaiveDate,
}

/// Time of day, `14:30` or `2:30 PM`
#[derive(Debug, Deserialize)]
pub struct SelectTimeRequest {
    pub time: String,
}
