//! Service and add-on catalog.
//!
//! The catalog is loaded once at startup (built-in or from a JSON file) and
//! shared read-only as `Arc<Catalog>`. Its fields are private, so nothing
//! outside this module can edit a service after validation.

mod builtin;
pub mod models;

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

pub use models::{AddOn, Category, LengthKey, LengthVariant, Service, SizeKey, SizeVariant};

use crate::pricing::Money;
use models::{AddOnRecord, CatalogFile, ServiceRecord};

/// Share of the total collected up front when no rate is configured
pub const DEFAULT_DEPOSIT_RATE: Decimal = dec!(0.30);

/// Catalog loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate service id: {0}")]
    DuplicateService(String),

    #[error("Duplicate add-on id: {0}")]
    DuplicateAddOn(String),

    #[error("Invalid amount for {field}: {value}")]
    InvalidAmount { field: String, value: Decimal },

    #[error("Invalid {kind} multiplier for {service} ({size}): {value}")]
    InvalidMultiplier {
        service: String,
        size: SizeKey,
        kind: &'static str,
        value: Decimal,
    },

    #[error("Service {0} must have a positive base duration")]
    InvalidDuration(String),

    #[error("Service {0} must offer at least one size and one length")]
    NoVariants(String),

    #[error("Deposit rate must be between 0 and 1, got {0}")]
    InvalidDepositRate(Decimal),

    #[error("Catalog has no services")]
    Empty,
}

/// Immutable catalog of services and add-ons
#[derive(Debug, Clone)]
pub struct Catalog {
    currency: String,
    deposit_rate: Decimal,
    services: Vec<Service>,
    add_ons: Vec<AddOn>,
}

impl Catalog {
    /// Build a validated catalog.
    pub fn new(
        currency: impl Into<String>,
        deposit_rate: Decimal,
        services: Vec<Service>,
        add_ons: Vec<AddOn>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self {
            currency: currency.into(),
            deposit_rate,
            services,
            add_ons,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The salon's published price list
    pub fn builtin() -> Self {
        builtin::catalog()
    }

    /// Parse a catalog from JSON in the website's data-table shape.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;

        let services = file
            .services
            .into_iter()
            .map(service_from_record)
            .collect::<Result<Vec<_>, _>>()?;
        let add_ons = file
            .add_ons
            .into_iter()
            .map(add_on_from_record)
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(
            file.currency,
            file.deposit_rate.unwrap_or(DEFAULT_DEPOSIT_RATE),
            services,
            add_ons,
        )
    }

    /// Load a catalog file from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        info!(
            "Loaded catalog from {}: {} services, {} add-ons",
            path.display(),
            catalog.services.len(),
            catalog.add_ons.len()
        );
        Ok(catalog)
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn deposit_rate(&self) -> Decimal {
        self.deposit_rate
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn add_ons(&self) -> &[AddOn] {
        &self.add_ons
    }

    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn add_on(&self, id: &str) -> Option<&AddOn> {
        self.add_ons.iter().find(|a| a.id == id)
    }

    /// Check catalog-wide invariants.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.services.is_empty() {
            return Err(CatalogError::Empty);
        }
        if self.deposit_rate < Decimal::ZERO || self.deposit_rate > Decimal::ONE {
            return Err(CatalogError::InvalidDepositRate(self.deposit_rate));
        }

        let mut seen = HashSet::new();
        for service in &self.services {
            if !seen.insert(service.id.as_str()) {
                return Err(CatalogError::DuplicateService(service.id.clone()));
            }
            validate_service(service)?;
        }

        let mut seen = HashSet::new();
        for add_on in &self.add_ons {
            if !seen.insert(add_on.id.as_str()) {
                return Err(CatalogError::DuplicateAddOn(add_on.id.clone()));
            }
            if add_on.price < Money::ZERO {
                return Err(CatalogError::InvalidAmount {
                    field: format!("addOns.{}.price", add_on.id),
                    value: add_on.price.to_decimal(),
                });
            }
        }

        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate_service(service: &Service) -> Result<(), CatalogError> {
    if service.base_duration_hours <= Decimal::ZERO {
        return Err(CatalogError::InvalidDuration(service.id.clone()));
    }
    if service.base_price < Money::ZERO {
        return Err(CatalogError::InvalidAmount {
            field: format!("services.{}.basePrice", service.id),
            value: service.base_price.to_decimal(),
        });
    }
    if service.size_variants.is_empty() || service.length_variants.is_empty() {
        return Err(CatalogError::NoVariants(service.id.clone()));
    }

    for (size, variant) in &service.size_variants {
        for (kind, value) in [
            ("price", variant.price_multiplier),
            ("time", variant.time_multiplier),
        ] {
            if value <= Decimal::ZERO {
                return Err(CatalogError::InvalidMultiplier {
                    service: service.id.clone(),
                    size: *size,
                    kind,
                    value,
                });
            }
        }
    }

    for (length, variant) in &service.length_variants {
        if variant.price_add < Money::ZERO {
            return Err(CatalogError::InvalidAmount {
                field: format!("services.{}.lengthVariants.{}.priceAdd", service.id, length),
                value: variant.price_add.to_decimal(),
            });
        }
    }

    Ok(())
}

fn money_field(field: impl FnOnce() -> String, value: Decimal) -> Result<Money, CatalogError> {
    Money::from_decimal_exact(value).ok_or_else(|| CatalogError::InvalidAmount {
        field: field(),
        value,
    })
}

fn service_from_record(record: ServiceRecord) -> Result<Service, CatalogError> {
    let base_price = money_field(
        || format!("services.{}.basePrice", record.id),
        record.base_price,
    )?;

    let mut length_variants = std::collections::BTreeMap::new();
    for (length, variant) in record.length_variants {
        let price_add = money_field(
            || format!("services.{}.lengthVariants.{}.priceAdd", record.id, length),
            variant.price_add,
        )?;
        length_variants.insert(
            length,
            LengthVariant {
                price_add,
                label: variant.label,
            },
        );
    }

    Ok(Service {
        id: record.id,
        name: record.name,
        description: record.description,
        category: record.category,
        base_duration_hours: record.base_duration,
        base_price,
        size_variants: record.size_variants,
        length_variants,
    })
}

fn add_on_from_record(record: AddOnRecord) -> Result<AddOn, CatalogError> {
    let price = money_field(|| format!("addOns.{}.price", record.id), record.price)?;
    Ok(AddOn {
        id: record.id,
        name: record.name,
        price,
        description: record.description,
    })
}
