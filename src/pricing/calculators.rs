//! Core pricing calculation functions.
//!
//! Pure functions for booking estimates - no I/O, no session state.

use std::collections::HashSet;

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::booking::models::BookingState;
use crate::booking::validation::Field;
use crate::catalog::{Catalog, LengthKey, SizeKey};

use super::money::Money;

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use braids_booking::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Pricing calculation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    /// A selection that the chosen service does not offer, typically left
    /// over from a previously selected service.
    #[error("Invalid selection for {field}: '{key}' is not available (service {service_id})")]
    InvalidSelection {
        service_id: String,
        field: Field,
        key: String,
    },

    #[error("Amount out of range while pricing service {0}")]
    AmountOutOfRange(String),
}

impl PricingError {
    fn invalid(service_id: &str, field: Field, key: impl ToString) -> Self {
        PricingError::InvalidSelection {
            service_id: service_id.to_string(),
            field,
            key: key.to_string(),
        }
    }
}

/// Price and duration breakdown for a complete selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Estimate {
    pub service_id: String,
    pub size: SizeKey,
    pub length: LengthKey,
    /// Base price scaled by the size multiplier
    pub base_price: Money,
    pub length_add: Money,
    pub add_ons_total: Money,
    /// Distinct add-on ids that were priced, in selection order
    pub add_on_ids: Vec<String>,
    pub total_price: Money,
    /// Up-front deposit at the catalog's deposit rate
    pub deposit: Money,
    pub total_duration_minutes: i64,
}

impl Estimate {
    pub fn duration_hours(&self) -> Decimal {
        round_money(Decimal::from(self.total_duration_minutes) / Decimal::from(60), 2)
    }
}

/// Outcome of an estimate request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EstimateResult {
    /// Service, size or length not chosen yet
    Incomplete { missing: Vec<Field> },
    Complete(Estimate),
}

impl EstimateResult {
    pub fn is_complete(&self) -> bool {
        matches!(self, EstimateResult::Complete(_))
    }

    pub fn estimate(&self) -> Option<&Estimate> {
        match self {
            EstimateResult::Complete(estimate) => Some(estimate),
            EstimateResult::Incomplete { .. } => None,
        }
    }
}

/// Compute the price and duration of the current selection.
///
/// An empty or partial selection is `Incomplete`, never an error. Size,
/// length and add-on keys are checked against the catalog because they may
/// have been chosen for a different service.
pub fn compute_estimate(
    state: &BookingState,
    catalog: &Catalog,
) -> Result<EstimateResult, PricingError> {
    let (Some(service_id), Some(size), Some(length)) = (
        state.selected_service.as_deref(),
        state.selected_size,
        state.selected_length,
    ) else {
        let missing = [
            (Field::Service, state.selected_service.is_none()),
            (Field::Size, state.selected_size.is_none()),
            (Field::Length, state.selected_length.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, absent)| absent.then_some(field))
        .collect();
        return Ok(EstimateResult::Incomplete { missing });
    };

    let service = catalog
        .service(service_id)
        .ok_or_else(|| PricingError::invalid(service_id, Field::Service, service_id))?;

    let size_variant = service
        .size_variant(size)
        .ok_or_else(|| PricingError::invalid(service_id, Field::Size, size))?;

    let base_price = service
        .base_price
        .scale(size_variant.price_multiplier)
        .ok_or_else(|| PricingError::AmountOutOfRange(service_id.to_string()))?;

    let length_add = service
        .length_variant(length)
        .ok_or_else(|| PricingError::invalid(service_id, Field::Length, length))?
        .price_add;

    // Each add-on is charged once even if the selection repeats it
    let mut seen = HashSet::new();
    let mut add_on_ids = Vec::new();
    let mut add_ons_total = Money::ZERO;
    for id in &state.selected_add_ons {
        if !seen.insert(id.as_str()) {
            continue;
        }
        let add_on = catalog
            .add_on(id)
            .ok_or_else(|| PricingError::invalid(service_id, Field::AddOns, id))?;
        add_ons_total = add_ons_total
            .checked_add(add_on.price)
            .ok_or_else(|| PricingError::AmountOutOfRange(service_id.to_string()))?;
        add_on_ids.push(add_on.id.clone());
    }

    let total_price = base_price
        .checked_add(length_add)
        .and_then(|subtotal| subtotal.checked_add(add_ons_total))
        .ok_or_else(|| PricingError::AmountOutOfRange(service_id.to_string()))?;

    let deposit = total_price
        .scale(catalog.deposit_rate())
        .ok_or_else(|| PricingError::AmountOutOfRange(service_id.to_string()))?;

    // Length affects price only
    let total_duration_minutes = service
        .base_duration_hours
        .checked_mul(Decimal::from(60))
        .and_then(|minutes| minutes.checked_mul(size_variant.time_multiplier))
        .and_then(|minutes| round_money(minutes, 0).to_i64())
        .ok_or_else(|| PricingError::AmountOutOfRange(service_id.to_string()))?;

    Ok(EstimateResult::Complete(Estimate {
        service_id: service.id.clone(),
        size,
        length,
        base_price,
        length_add,
        add_ons_total,
        add_on_ids,
        total_price,
        deposit,
        total_duration_minutes,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn selection(
        service: Option<&str>,
        size: Option<SizeKey>,
        length: Option<LengthKey>,
        add_ons: &[&str],
    ) -> BookingState {
        let mut state = BookingState::new();
        state.selected_service = service.map(str::to_string);
        state.selected_size = size;
        state.selected_length = length;
        state.selected_add_ons = add_ons.iter().map(|a| a.to_string()).collect();
        state
    }

    fn complete(result: EstimateResult) -> Estimate {
        match result {
            EstimateResult::Complete(estimate) => estimate,
            other => panic!("expected complete estimate, got {:?}", other),
        }
    }

    // ==================== round_money tests ====================

    #[test]
    fn test_round_money_bankers_rounding_to_even() {
        assert_eq!(round_money(dec!(2.5), 0), dec!(2));
        assert_eq!(round_money(dec!(3.5), 0), dec!(4));
        assert_eq!(round_money(dec!(-2.5), 0), dec!(-2));
    }

    #[test]
    fn test_round_money_normal_rounding() {
        assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
        assert_eq!(round_money(dec!(1.236), 2), dec!(1.24));
    }

    // ==================== compute_estimate tests ====================

    #[test]
    fn test_knotless_jumbo_waist_with_beads() {
        let catalog = Catalog::builtin();
        let state = selection(
            Some("knotless-braids"),
            Some(SizeKey::Jumbo),
            Some(LengthKey::Waist),
            &["beads"],
        );

        let estimate = complete(compute_estimate(&state, &catalog).unwrap());

        // 200 * 0.8 + 50 + 10
        assert_eq!(estimate.base_price, Money::from_major(160));
        assert_eq!(estimate.length_add, Money::from_major(50));
        assert_eq!(estimate.add_ons_total, Money::from_major(10));
        assert_eq!(estimate.total_price, Money::from_major(220));
        // 30% of 220
        assert_eq!(estimate.deposit, Money::from_major(66));
        // 6h * 0.7
        assert_eq!(estimate.total_duration_minutes, 252);
        assert_eq!(estimate.duration_hours(), dec!(4.2));
    }

    #[test]
    fn test_total_matches_formula_for_every_valid_selection() {
        let catalog = Catalog::builtin();
        let add_ons = ["beads", "colour-blend"];
        let add_on_sum: Decimal = add_ons
            .iter()
            .map(|id| catalog.add_on(id).unwrap().price.to_decimal())
            .sum();

        for service in catalog.services() {
            for (size, size_variant) in &service.size_variants {
                for (length, length_variant) in &service.length_variants {
                    let state = selection(Some(service.id.as_str()), Some(*size), Some(*length), &add_ons);
                    let estimate = complete(compute_estimate(&state, &catalog).unwrap());

                    let expected = service.base_price.to_decimal() * size_variant.price_multiplier
                        + length_variant.price_add.to_decimal()
                        + add_on_sum;
                    assert_eq!(
                        estimate.total_price.to_decimal(),
                        expected,
                        "{} {} {}",
                        service.id,
                        size,
                        length
                    );
                }
            }
        }
    }

    #[test]
    fn test_missing_fields_are_incomplete() {
        let catalog = Catalog::builtin();
        let cases = [
            (selection(None, None, None, &[]), vec![Field::Service, Field::Size, Field::Length]),
            (
                selection(Some("cornrows"), None, Some(LengthKey::Waist), &["beads"]),
                vec![Field::Size],
            ),
            (
                selection(Some("cornrows"), Some(SizeKey::Small), None, &[]),
                vec![Field::Length],
            ),
        ];

        for (state, missing) in cases {
            let result = compute_estimate(&state, &catalog).unwrap();
            assert!(!result.is_complete());
            assert_eq!(result, EstimateResult::Incomplete { missing });
        }
    }

    #[test]
    fn test_missing_service_dominates() {
        let catalog = Catalog::builtin();
        let state = selection(None, Some(SizeKey::Jumbo), Some(LengthKey::Waist), &[]);

        let result = compute_estimate(&state, &catalog).unwrap();
        assert!(!result.is_complete());
        assert!(result.estimate().is_none());
    }

    #[test]
    fn test_duplicate_add_on_counted_once() {
        let catalog = Catalog::builtin();
        let once = selection(
            Some("box-braids"),
            Some(SizeKey::Medium),
            Some(LengthKey::Shoulder),
            &["beads"],
        );
        let twice = selection(
            Some("box-braids"),
            Some(SizeKey::Medium),
            Some(LengthKey::Shoulder),
            &["beads", "beads"],
        );

        let once = complete(compute_estimate(&once, &catalog).unwrap());
        let twice = complete(compute_estimate(&twice, &catalog).unwrap());
        assert_eq!(once.total_price, twice.total_price);
        assert_eq!(twice.add_on_ids, vec!["beads"]);
    }

    #[test]
    fn test_stale_size_is_invalid_selection() {
        // Faux locs are not offered in small
        let catalog = Catalog::builtin();
        let state = selection(
            Some("faux-locs"),
            Some(SizeKey::Small),
            Some(LengthKey::Shoulder),
            &[],
        );

        let err = compute_estimate(&state, &catalog).unwrap_err();
        assert_eq!(
            err,
            PricingError::InvalidSelection {
                service_id: "faux-locs".to_string(),
                field: Field::Size,
                key: "small".to_string(),
            }
        );
    }

    #[test]
    fn test_stale_length_is_invalid_selection() {
        let catalog = Catalog::builtin();
        let state = selection(
            Some("faux-locs"),
            Some(SizeKey::Jumbo),
            Some(LengthKey::Butt),
            &[],
        );

        let err = compute_estimate(&state, &catalog).unwrap_err();
        assert!(matches!(
            err,
            PricingError::InvalidSelection { field: Field::Length, ref key, .. } if key == "butt"
        ));
    }

    #[test]
    fn test_unknown_service_and_add_on() {
        let catalog = Catalog::builtin();

        let state = selection(Some("weave"), Some(SizeKey::Medium), Some(LengthKey::Waist), &[]);
        assert!(matches!(
            compute_estimate(&state, &catalog),
            Err(PricingError::InvalidSelection { field: Field::Service, .. })
        ));

        let state = selection(
            Some("cornrows"),
            Some(SizeKey::Medium),
            Some(LengthKey::Waist),
            &["glitter"],
        );
        assert!(matches!(
            compute_estimate(&state, &catalog),
            Err(PricingError::InvalidSelection { field: Field::AddOns, .. })
        ));
    }

    #[test]
    fn test_length_does_not_change_duration() {
        let catalog = Catalog::builtin();
        let shoulder = selection(
            Some("senegalese-twists"),
            Some(SizeKey::Small),
            Some(LengthKey::Shoulder),
            &[],
        );
        let butt = selection(
            Some("senegalese-twists"),
            Some(SizeKey::Small),
            Some(LengthKey::Butt),
            &[],
        );

        let shoulder = complete(compute_estimate(&shoulder, &catalog).unwrap());
        let butt = complete(compute_estimate(&butt, &catalog).unwrap());
        assert_eq!(shoulder.total_duration_minutes, butt.total_duration_minutes);
        // 5h * 1.4
        assert_eq!(shoulder.total_duration_minutes, 420);
        assert!(butt.total_price > shoulder.total_price);
    }

    #[test]
    fn test_total_overflow_is_out_of_range() {
        let catalog = crate::test_support::oversized_catalog();

        let shoulder = selection(
            Some("cornrows"),
            Some(SizeKey::Medium),
            Some(LengthKey::Shoulder),
            &[],
        );
        assert!(compute_estimate(&shoulder, &catalog).unwrap().is_complete());

        let waist = selection(
            Some("cornrows"),
            Some(SizeKey::Medium),
            Some(LengthKey::Waist),
            &[],
        );
        assert_eq!(
            compute_estimate(&waist, &catalog),
            Err(PricingError::AmountOutOfRange("cornrows".to_string()))
        );

        let with_add_on = selection(
            Some("cornrows"),
            Some(SizeKey::Medium),
            Some(LengthKey::Shoulder),
            &["takedown"],
        );
        assert!(matches!(
            compute_estimate(&with_add_on, &catalog),
            Err(PricingError::AmountOutOfRange(_))
        ));
    }

    #[test]
    fn test_pricing_error_display() {
        let err = PricingError::invalid("faux-locs", Field::Size, SizeKey::Small);
        assert_eq!(
            err.to_string(),
            "Invalid selection for size: 'small' is not available (service faux-locs)"
        );
    }
}
