use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// A partial-update field: either left alone or replaced.
///
/// A field missing from the payload deserializes to [`Patch::Unchanged`] through
/// `#[serde(default)]`. A present value is always [`Patch::Set`]; JSON `null` is a
/// type error because none of the patchable fields are nullable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patch<T> {
    Unchanged,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Unchanged
    }
}

impl<T> Patch<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Patch::Unchanged)
    }

    /// Writes the new value into `target` when one was supplied.
    pub fn apply_to(self, target: &mut T) {
        if let Patch::Set(value) = self {
            *target = value;
        }
    }
}

impl<T> From<T> for Patch<T> {
    fn from(value: T) -> Self {
        Patch::Set(value)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Patch::Set)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Unchanged => serializer.serialize_none(),
            Patch::Set(value) => value.serialize(serializer),
        }
    }
}

/// DTO for creating a new product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductIn {
    /// Product name
    #[validate(length(min = 1, message = "Product name must not be empty"))]
    #[schema(example = "Iphone 14 Pro Max")]
    pub name: String,
    /// Units in stock
    #[schema(example = 10)]
    pub quantity: i64,
    /// Unit price, serialized as a decimal string
    #[schema(value_type = String, example = "8.500")]
    pub price: Decimal,
    /// Whether the product is active
    pub status: bool,
}

/// Product as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductOut {
    /// Unique identifier
    pub id: Uuid,
    /// Product name
    pub name: String,
    /// Units in stock
    pub quantity: i64,
    /// Unit price, serialized as a decimal string
    #[schema(value_type = String, example = "8.500")]
    pub price: Decimal,
    /// Whether the product is active
    pub status: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl ProductOut {
    /// Create a new product from the creation payload
    pub fn new(input: ProductIn) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            quantity: input.quantity,
            price: input.price,
            status: input.status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply the supplied fields of an update and refresh `updated_at`
    pub fn apply_update(&mut self, update: ProductUpdate) {
        update.quantity.apply_to(&mut self.quantity);
        update.price.apply_to(&mut self.price);
        update.status.apply_to(&mut self.status);
        self.updated_at = Utc::now();
    }
}

/// DTO for a partial product update; omitted fields keep their value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductUpdate {
    #[serde(default, skip_serializing_if = "Patch::is_unchanged")]
    #[schema(value_type = Option<i64>, example = 5)]
    pub quantity: Patch<i64>,
    #[serde(default, skip_serializing_if = "Patch::is_unchanged")]
    #[schema(value_type = Option<String>, example = "7.990")]
    pub price: Patch<Decimal>,
    #[serde(default, skip_serializing_if = "Patch::is_unchanged")]
    #[schema(value_type = Option<bool>)]
    pub status: Patch<bool>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.quantity.is_unchanged() && self.price.is_unchanged() && self.status.is_unchanged()
    }
}

/// Product returned after a successful update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ProductUpdateOut(pub ProductOut);

impl ProductUpdateOut {
    pub fn into_inner(self) -> ProductOut {
        self.0
    }
}

impl From<ProductOut> for ProductUpdateOut {
    fn from(product: ProductOut) -> Self {
        Self(product)
    }
}

/// Price filter for listing products; both bounds are inclusive
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PriceRange {
    /// Minimum price
    #[param(value_type = Option<String>, example = "10")]
    pub min_price: Option<Decimal>,
    /// Maximum price
    #[param(value_type = Option<String>, example = "20")]
    pub max_price: Option<Decimal>,
}

impl PriceRange {
    pub fn new(min_price: Option<Decimal>, max_price: Option<Decimal>) -> Self {
        Self {
            min_price,
            max_price,
        }
    }

    /// Whether `price` lies within the range. A missing bound does not constrain.
    pub fn contains(&self, price: Decimal) -> bool {
        self.min_price.is_none_or(|min| price >= min)
            && self.max_price.is_none_or(|max| price <= max)
    }
}
