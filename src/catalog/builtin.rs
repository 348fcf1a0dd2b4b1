//! Built-in salon price list (GHS).

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::models::{AddOn, Category, LengthKey, LengthVariant, Service, SizeKey, SizeVariant};
use super::{Catalog, DEFAULT_DEPOSIT_RATE};
use crate::pricing::Money;

pub(super) fn catalog() -> Catalog {
    Catalog {
        currency: "GHS".to_string(),
        deposit_rate: DEFAULT_DEPOSIT_RATE,
        services: services(),
        add_ons: add_ons(),
    }
}

fn sizes(entries: &[(SizeKey, Decimal, Decimal)]) -> BTreeMap<SizeKey, SizeVariant> {
    entries
        .iter()
        .map(|&(key, price_multiplier, time_multiplier)| {
            let label = match key {
                SizeKey::Small => "Small",
                SizeKey::Medium => "Medium",
                SizeKey::Jumbo => "Jumbo",
            };
            (
                key,
                SizeVariant {
                    price_multiplier,
                    time_multiplier,
                    label: label.to_string(),
                },
            )
        })
        .collect()
}

fn lengths(entries: &[(LengthKey, i64)]) -> BTreeMap<LengthKey, LengthVariant> {
    entries
        .iter()
        .map(|&(key, add)| {
            let label = match key {
                LengthKey::Shoulder => "Shoulder length",
                LengthKey::MidBack => "Mid-back length",
                LengthKey::Waist => "Waist length",
                LengthKey::Butt => "Butt length",
            };
            (
                key,
                LengthVariant {
                    price_add: Money::from_major(add),
                    label: label.to_string(),
                },
            )
        })
        .collect()
}

fn services() -> Vec<Service> {
    use LengthKey::*;
    use SizeKey::*;

    vec![
        Service {
            id: "box-braids".to_string(),
            name: "Box Braids".to_string(),
            description: "Classic individual braids with extensions, parted into neat squares."
                .to_string(),
            category: Category::BoxBraids,
            base_duration_hours: dec!(6),
            base_price: Money::from_major(250),
            size_variants: sizes(&[
                (Small, dec!(1.3), dec!(1.4)),
                (Medium, dec!(1), dec!(1)),
                (Jumbo, dec!(0.8), dec!(0.7)),
            ]),
            length_variants: lengths(&[(Shoulder, 0), (MidBack, 30), (Waist, 50), (Butt, 80)]),
        },
        Service {
            id: "cornrows".to_string(),
            name: "Cornrows".to_string(),
            description: "Braids woven close to the scalp in straight or patterned rows."
                .to_string(),
            category: Category::Cornrows,
            base_duration_hours: dec!(3),
            base_price: Money::from_major(120),
            size_variants: sizes(&[
                (Small, dec!(1.25), dec!(1.3)),
                (Medium, dec!(1), dec!(1)),
                (Jumbo, dec!(0.75), dec!(0.6)),
            ]),
            length_variants: lengths(&[(Shoulder, 0), (MidBack, 20), (Waist, 40), (Butt, 60)]),
        },
        Service {
            id: "knotless-braids".to_string(),
            name: "Knotless Braids".to_string(),
            description: "Lightweight braids started with your own hair for a flat, tension-free base."
                .to_string(),
            category: Category::Knotless,
            base_duration_hours: dec!(6),
            base_price: Money::from_major(200),
            size_variants: sizes(&[
                (Small, dec!(1.4), dec!(1.5)),
                (Medium, dec!(1), dec!(1)),
                (Jumbo, dec!(0.8), dec!(0.7)),
            ]),
            length_variants: lengths(&[(Shoulder, 0), (MidBack, 30), (Waist, 50), (Butt, 80)]),
        },
        Service {
            id: "senegalese-twists".to_string(),
            name: "Senegalese Twists".to_string(),
            description: "Smooth two-strand rope twists with a silky finish.".to_string(),
            category: Category::Twists,
            base_duration_hours: dec!(5),
            base_price: Money::from_major(220),
            size_variants: sizes(&[
                (Small, dec!(1.3), dec!(1.4)),
                (Medium, dec!(1), dec!(1)),
                (Jumbo, dec!(0.85), dec!(0.75)),
            ]),
            length_variants: lengths(&[(Shoulder, 0), (MidBack, 30), (Waist, 50), (Butt, 70)]),
        },
        // Faux locs are not installed in small size or at butt length.
        Service {
            id: "faux-locs".to_string(),
            name: "Faux Locs".to_string(),
            description: "Wrapped locs for the look of mature locs without the commitment."
                .to_string(),
            category: Category::Locs,
            base_duration_hours: dec!(7),
            base_price: Money::from_major(280),
            size_variants: sizes(&[(Medium, dec!(1), dec!(1)), (Jumbo, dec!(0.85), dec!(0.8))]),
            length_variants: lengths(&[(Shoulder, 0), (MidBack, 40), (Waist, 60)]),
        },
    ]
}

fn add_ons() -> Vec<AddOn> {
    [
        ("beads", "Beads", 10, "Decorative beads threaded onto the ends."),
        ("curly-ends", "Curly ends", 30, "Loose curls left at the ends of each braid."),
        ("wash-and-blow-dry", "Wash & blow-dry", 25, "Shampoo, condition and stretch before install."),
        ("colour-blend", "Colour blend", 40, "Mix of two or more hair colours."),
        ("takedown", "Takedown", 50, "Careful removal of an existing style."),
    ]
    .into_iter()
    .map(|(id, name, price, description)| AddOn {
        id: id.to_string(),
        name: name.to_string(),
        price: Money::from_major(price),
        description: description.to_string(),
    })
    .collect()
}
