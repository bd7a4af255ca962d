//! # Builders
//!
//! Validated construction of items and orders from loosely-typed values.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   .flavor("Vanilla")  ──┐                                              │
//! │   .set("shape", "Round")├──► Option<FieldValue> slots (no checks yet)   │
//! │   .layers(2)          ──┘                                              │
//! │                                  │                                      │
//! │                                  ▼ build()                              │
//! │                     every slot checked, every problem kept             │
//! │                                  │                                      │
//! │                  ┌───────────────┴───────────────┐                     │
//! │                  ▼                               ▼                     │
//! │              Ok(Cake)                 Err(BuildError { problems })     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Setters accept anything convertible into a [`serde_json::Value`], so
//! mappers can hand over whatever they found in a record and leave the type
//! check to `build()`. Empty and whitespace-only strings count as missing for
//! every field of every entity.

use serde_json::Value;

use crate::error::{BuildError, BuildResult, ValidationError};
use crate::types::{Book, Cake, Item, ItemCategory, Order, Toy};
use crate::validation::{
    coerce_integer, normalize_key, validate_price, validate_quantity, validate_required_text,
    ValidationResult,
};

/// A loosely-typed field value as handed over by a mapper or caller.
pub type FieldValue = Value;

// =============================================================================
// Problem Collector
// =============================================================================

/// Accumulates field problems for one build.
struct FieldCheck {
    entity: &'static str,
    problems: Vec<ValidationError>,
}

impl FieldCheck {
    fn new(entity: &'static str) -> Self {
        FieldCheck {
            entity,
            problems: Vec::new(),
        }
    }

    fn text(&mut self, field: &str, value: Option<&FieldValue>) -> String {
        validate_required_text(field, value).unwrap_or_else(|problem| {
            self.problems.push(problem);
            String::new()
        })
    }

    fn integer(
        &mut self,
        field: &str,
        value: Option<&FieldValue>,
        rule: fn(i64) -> ValidationResult<()>,
    ) -> i64 {
        let checked = value
            .ok_or_else(|| ValidationError::required(field))
            .and_then(|value| coerce_integer(field, value))
            .and_then(|n| rule(n).map(|()| n));

        checked.unwrap_or_else(|problem| {
            self.problems.push(problem);
            0
        })
    }

    fn require<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.problems.push(ValidationError::required(field));
        }
        value
    }

    fn finish(self) -> BuildResult<()> {
        if self.problems.is_empty() {
            Ok(())
        } else {
            Err(BuildError::from_problems(self.entity, self.problems))
        }
    }
}

// =============================================================================
// Item Builders
// =============================================================================

macro_rules! item_builder {
    (
        $(#[$meta:meta])*
        $builder:ident => $target:ident {
            $( $field:ident : $name:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default)]
        pub struct $builder {
            $( $field: Option<FieldValue>, )+
        }

        impl $builder {
            pub fn new() -> Self {
                Self::default()
            }

            /// Seeds every field from `lookup`, keyed by canonical field name.
            pub fn from_fields<F>(mut lookup: F) -> Self
            where
                F: FnMut(&'static str) -> Option<FieldValue>,
            {
                $builder {
                    $( $field: lookup($name), )+
                }
            }

            $(
                #[doc = concat!("Sets `", $name, "`.")]
                pub fn $field(mut self, value: impl Into<FieldValue>) -> Self {
                    self.$field = Some(value.into());
                    self
                }
            )+

            /// Sets a field by name. Names are matched case-insensitively,
            /// ignoring `_`, `-` and spaces. Unknown names are ignored.
            pub fn set(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
                let key = normalize_key(name);
                $(
                    if key == normalize_key($name) {
                        self.$field = Some(value.into());
                        return self;
                    }
                )+
                self
            }

            /// Validates every field and produces the item.
            ///
            /// ## Errors
            /// A [`BuildError`] listing every missing or mistyped field.
            pub fn build(self) -> BuildResult<$target> {
                let mut check = FieldCheck::new(ItemCategory::$target.entity_name());
                $( let $field = check.text($name, self.$field.as_ref()); )+
                check.finish()?;

                Ok($target { $( $field, )+ })
            }
        }
    };
}

item_builder! {
    /// Builds a [`Cake`]. All 14 fields are required.
    CakeBuilder => Cake {
        kind: "type",
        flavor: "flavor",
        filling: "filling",
        size: "size",
        layers: "layers",
        frosting_type: "frostingType",
        frosting_flavor: "frostingFlavor",
        decoration_type: "decorationType",
        decoration_color: "decorationColor",
        custom_message: "customMessage",
        shape: "shape",
        allergies: "allergies",
        special_ingredients: "specialIngredients",
        packaging_type: "packagingType",
    }
}

item_builder! {
    /// Builds a [`Book`]. All 8 fields are required.
    BookBuilder => Book {
        title: "title",
        author: "author",
        genre: "genre",
        format: "format",
        language: "language",
        publisher: "publisher",
        special_edition: "specialEdition",
        packaging: "packaging",
    }
}

item_builder! {
    /// Builds a [`Toy`]. All 6 fields are required.
    ToyBuilder => Toy {
        kind: "type",
        age_group: "ageGroup",
        brand: "brand",
        material: "material",
        battery_required: "batteryRequired",
        educational: "educational",
    }
}

/// Builds an item of `category`, reading each canonical field through `lookup`.
///
/// This is the single entry point mappers use, so category dispatch lives in
/// one exhaustive match.
pub fn build_item<F>(category: ItemCategory, lookup: F) -> BuildResult<Item>
where
    F: FnMut(&'static str) -> Option<FieldValue>,
{
    match category {
        ItemCategory::Cake => CakeBuilder::from_fields(lookup).build().map(Item::Cake),
        ItemCategory::Book => BookBuilder::from_fields(lookup).build().map(Item::Book),
        ItemCategory::Toy => ToyBuilder::from_fields(lookup).build().map(Item::Toy),
    }
}

// =============================================================================
// Order Builder
// =============================================================================

/// Builds an [`Order`] around an already built item.
///
/// `I` is [`Item`] for plain orders and
/// [`IdentifiableItem`](crate::types::IdentifiableItem) for orders whose
/// item has a persistent id.
#[derive(Debug, Clone)]
pub struct OrderBuilder<I = Item> {
    id: Option<FieldValue>,
    item: Option<I>,
    price: Option<FieldValue>,
    quantity: Option<FieldValue>,
}

impl<I> Default for OrderBuilder<I> {
    fn default() -> Self {
        OrderBuilder {
            id: None,
            item: None,
            price: None,
            quantity: None,
        }
    }
}

impl<I> OrderBuilder<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<FieldValue>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn item(mut self, item: I) -> Self {
        self.item = Some(item);
        self
    }

    /// Price as an integer or a numeric string.
    pub fn price(mut self, price: impl Into<FieldValue>) -> Self {
        self.price = Some(price.into());
        self
    }

    /// Quantity as an integer or a numeric string.
    pub fn quantity(mut self, quantity: impl Into<FieldValue>) -> Self {
        self.quantity = Some(quantity.into());
        self
    }

    /// Validates the scalars and produces the order.
    ///
    /// ## Rules
    /// - `id` is a non-empty string
    /// - `price` is an integer >= 0
    /// - `quantity` is an integer > 0
    /// - `item` is present
    pub fn build(self) -> BuildResult<Order<I>> {
        let mut check = FieldCheck::new("Order");
        let id = check.text("id", self.id.as_ref());
        let price = check.integer("price", self.price.as_ref(), validate_price);
        let quantity = check.integer("quantity", self.quantity.as_ref(), validate_quantity);
        let item = check.require("item", self.item);
        check.finish()?;

        match item {
            Some(item) => Ok(Order {
                id,
                item,
                price,
                quantity,
            }),
            None => Err(BuildError::from_problems(
                "Order",
                vec![ValidationError::required("item")],
            )),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
