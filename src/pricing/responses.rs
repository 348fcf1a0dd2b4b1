//! Response DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::booking::validation::Field;
use crate::catalog::{AddOn, Catalog, Category, LengthKey, Service, SizeKey};

use super::calculators::{Estimate, EstimateResult, PricingError};
use super::money::Money;

/// Money value for JSON responses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
    pub minor_units: i64,
}

impl MoneyResponse {
    pub fn new(money: Money, currency: &str) -> Self {
        Self {
            amount: money.to_decimal(),
            currency: currency.to_string(),
            minor_units: money.minor_units(),
        }
    }
}

/// Estimate for the UI: complete totals, what is still missing, or the
/// stale selection that has to be re-entered.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EstimateResponse {
    Incomplete {
        missing: Vec<Field>,
    },
    Complete {
        service_id: String,
        size: SizeKey,
        length: LengthKey,
        base_price: MoneyResponse,
        length_add: MoneyResponse,
        add_ons_total: MoneyResponse,
        add_on_ids: Vec<String>,
        total_price: MoneyResponse,
        deposit: MoneyResponse,
        total_duration_minutes: i64,
        #[serde(with = "rust_decimal::serde::str")]
        total_duration_hours: Decimal,
    },
    InvalidSelection {
        field: Field,
        key: String,
        message: String,
    },
}

impl EstimateResponse {
    pub fn from_estimate(estimate: &Estimate, currency: &str) -> Self {
        EstimateResponse::Complete {
            service_id: estimate.service_id.clone(),
            size: estimate.size,
            length: estimate.length,
            base_price: MoneyResponse::new(estimate.base_price, currency),
            length_add: MoneyResponse::new(estimate.length_add, currency),
            add_ons_total: MoneyResponse::new(estimate.add_ons_total, currency),
            add_on_ids: estimate.add_on_ids.clone(),
            total_price: MoneyResponse::new(estimate.total_price, currency),
            deposit: MoneyResponse::new(estimate.deposit, currency),
            total_duration_minutes: estimate.total_duration_minutes,
            total_duration_hours: estimate.duration_hours(),
        }
    }

    /// Render an estimate outcome. Only `InvalidSelection` is shown to the
    /// customer; other pricing errors are returned to the caller.
    pub fn from_outcome(
        outcome: Result<EstimateResult, PricingError>,
        currency: &str,
    ) -> Result<Self, PricingError> {
        match outcome {
            Ok(EstimateResult::Complete(estimate)) => Ok(Self::from_estimate(&estimate, currency)),
            Ok(EstimateResult::Incomplete { missing }) => {
                Ok(EstimateResponse::Incomplete { missing })
            }
            Err(err) => match &err {
                PricingError::InvalidSelection { field, key, .. } => {
                    Ok(EstimateResponse::InvalidSelection {
                        field: *field,
                        key: key.clone(),
                        message: err.to_string(),
                    })
                }
                _ => Err(err),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SizeVariantResponse {
    pub size: SizeKey,
    pub label: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_multiplier: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub time_multiplier: Decimal,
}

#[derive(Debug, Serialize)]
pub struct LengthVariantResponse {
    pub length: LengthKey,
    pub label: String,
    pub price_add: MoneyResponse,
}

#[derive(Debug, Serialize)]
pub struct ServiceResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_duration_hours: Decimal,
    pub base_price: MoneyResponse,
    pub sizes: Vec<SizeVariantResponse>,
    pub lengths: Vec<LengthVariantResponse>,
}

impl ServiceResponse {
    fn new(service: &Service, currency: &str) -> Self {
        Self {
            id: service.id.clone(),
            name: service.name.clone(),
            description: service.description.clone(),
            category: service.category,
            base_duration_hours: service.base_duration_hours,
            base_price: MoneyResponse::new(service.base_price, currency),
            sizes: service
                .size_variants
                .iter()
                .map(|(size, v)| SizeVariantResponse {
                    size: *size,
                    label: v.label.clone(),
                    price_multiplier: v.price_multiplier,
                    time_multiplier: v.time_multiplier,
                })
                .collect(),
            lengths: service
                .length_variants
                .iter()
                .map(|(length, v)| LengthVariantResponse {
                    length: *length,
                    label: v.label.clone(),
                    price_add: MoneyResponse::new(v.price_add, currency),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddOnResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: MoneyResponse,
}

impl AddOnResponse {
    fn new(add_on: &AddOn, currency: &str) -> Self {
        Self {
            id: add_on.id.clone(),
            name: add_on.name.clone(),
            description: add_on.description.clone(),
            price: MoneyResponse::new(add_on.price, currency),
        }
    }
}

/// Response for the catalog endpoint
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub currency: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub deposit_rate: Decimal,
    pub services: Vec<ServiceResponse>,
    pub add_ons: Vec<AddOnResponse>,
}

impl From<&Catalog> for CatalogResponse {
    fn from(catalog: &Catalog) -> Self {
        let currency = catalog.currency();
        Self {
            currency: currency.to_string(),
            deposit_rate: catalog.deposit_rate(),
            services: catalog
                .services()
                .iter()
                .map(|s| ServiceResponse::new(s, currency))
                .collect(),
            add_ons: catalog
                .add_ons()
                .iter()
                .map(|a| AddOnResponse::new(a, currency))
                .collect(),
        }
    }
}

/// Generic error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
