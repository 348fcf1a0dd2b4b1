//! Catalog records: services, their size/length variants, and add-ons.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::Money;

/// Braiding style family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    BoxBraids,
    Cornrows,
    Knotless,
    Twists,
    Locs,
}

/// Braid size. Prices and durations in the catalog are quoted for `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SizeKey {
    Small,
    Medium,
    Jumbo,
}

impl SizeKey {
    pub const ALL: [SizeKey; 3] = [SizeKey::Small, SizeKey::Medium, SizeKey::Jumbo];

    pub fn as_str(self) -> &'static str {
        match self {
            SizeKey::Small => "small",
            SizeKey::Medium => "medium",
            SizeKey::Jumbo => "jumbo",
        }
    }
}

impl fmt::Display for SizeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hair length. Prices in the catalog are quoted for `Shoulder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LengthKey {
    Shoulder,
    MidBack,
    Waist,
    Butt,
}

impl LengthKey {
    pub const ALL: [LengthKey; 4] = [
        LengthKey::Shoulder,
        LengthKey::MidBack,
        LengthKey::Waist,
        LengthKey::Butt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LengthKey::Shoulder => "shoulder",
            LengthKey::MidBack => "midBack",
            LengthKey::Waist => "waist",
            LengthKey::Butt => "butt",
        }
    }
}

impl fmt::Display for LengthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Multipliers applied to a service's base price and duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeVariant {
    pub price_multiplier: Decimal,
    pub time_multiplier: Decimal,
    pub label: String,
}

/// Flat price addition for a hair length
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LengthVariant {
    pub price_add: Money,
    pub label: String,
}

/// A braiding service offered by the salon
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    /// Hours for a medium, shoulder-length install
    pub base_duration_hours: Decimal,
    /// Price for a medium, shoulder-length install
    pub base_price: Money,
    pub size_variants: BTreeMap<SizeKey, SizeVariant>,
    pub length_variants: BTreeMap<LengthKey, LengthVariant>,
}

impl Service {
    pub fn size_variant(&self, size: SizeKey) -> Option<&SizeVariant> {
        self.size_variants.get(&size)
    }

    pub fn length_variant(&self, length: LengthKey) -> Option<&LengthVariant> {
        self.length_variants.get(&length)
    }
}

/// Optional extra attached to a booking
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOn {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub description: String,
}

// ---------------------------------------------------------------------------
// File records
// ---------------------------------------------------------------------------
//
// Catalog files quote prices in major units (cedis) as in the website's data
// tables. They are converted to `Money` and validated by `Catalog::new`.

/// Catalog file root
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFile {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub deposit_rate: Option<Decimal>,
    pub services: Vec<ServiceRecord>,
    #[serde(default)]
    pub add_ons: Vec<AddOnRecord>,
}

pub(crate) fn default_currency() -> String {
    "GHS".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    pub base_duration: Decimal,
    pub base_price: Decimal,
    pub size_variants: BTreeMap<SizeKey, SizeVariant>,
    pub length_variants: BTreeMap<LengthKey, LengthVariantRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LengthVariantRecord {
    pub price_add: Decimal,
    pub label: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOnRecord {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
}
