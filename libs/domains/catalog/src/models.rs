use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use strum::Display;
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::{not_blank, validate_price, validate_status};

/// Category lifecycle status
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "category_status")]
pub enum CategoryStatus {
    #[sea_orm(string_value = "Active")]
    Active,
    #[default]
    #[sea_orm(string_value = "Inactive")]
    Inactive,
}

impl FromStr for CategoryStatus {
    type Err = String;

    /// Exact, case-sensitive match on the variant name.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Active" => Ok(CategoryStatus::Active),
            "Inactive" => Ok(CategoryStatus::Inactive),
            other => Err(format!("unknown category status: {other}")),
        }
    }
}

/// A product category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub status: CategoryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product, always owned by one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Decimal string with two places, e.g. `"5000.00"`
    #[schema(value_type = String, example = "5000.00")]
    pub price: Decimal,
    pub category_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Where a product request is resolved: every product, or one category's products
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
    Category(i64),
}

/// Deserialize a field that may be absent, `null` or a value.
///
/// Combined with `#[serde(default)]`: absent → `None`, `null` → `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Request body for creating a category. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateCategory {
    #[schema(example = "Rings")]
    pub name: Option<String>,
    /// `Active` or `Inactive`; defaults to `Inactive`
    #[schema(example = "Active")]
    pub status: Option<String>,
}

/// Request body for updating a category. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateCategory {
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub status: Option<Option<String>>,
}

/// A price as sent by clients: a JSON number or a numeric string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(serde_json::Number),
    Text(String),
}

/// Request body for creating a product inside a category.
///
/// The owning category always comes from the path.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Number or numeric string, e.g. `5000` or `"5000.00"`
    #[schema(value_type = Option<String>, example = "5000.00")]
    pub price: Option<PriceInput>,
}

/// Request body for updating a product. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateProduct {
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub price: Option<Option<PriceInput>>,
    /// Move the product to another, existing category
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i64>)]
    pub category_id: Option<Option<i64>>,
}

/// Price after parsing, before validation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PriceField {
    Blank,
    Number(Decimal),
    Invalid(String),
}

impl PriceField {
    /// Price stored in the catalogue: rounded half away from zero to cents, always two places.
    pub fn normalize(value: Decimal) -> Decimal {
        let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);
        rounded
    }

    fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return PriceField::Blank;
        }

        Decimal::from_str(raw)
            .or_else(|_| Decimal::from_scientific(raw))
            .map(|value| PriceField::Number(Self::normalize(value)))
            .unwrap_or_else(|_| PriceField::Invalid(raw.to_string()))
    }

    pub fn decimal(&self) -> Option<Decimal> {
        match self {
            PriceField::Number(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<Option<PriceInput>> for PriceField {
    fn from(input: Option<PriceInput>) -> Self {
        match input {
            None => PriceField::Blank,
            Some(PriceInput::Number(n)) => PriceField::parse(&n.to_string()),
            Some(PriceInput::Text(s)) => PriceField::parse(&s),
        }
    }
}

/// Category attributes about to be persisted
#[derive(Debug, Clone, Validate)]
pub struct CategoryDraft {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(
        length(min = 1, message = "can't be blank"),
        custom(function = "validate_status")
    )]
    pub status: String,
}

impl CategoryDraft {
    /// Build a draft for a new category; a missing status becomes `Inactive`.
    pub fn new(input: CreateCategory) -> Self {
        let status = input
            .status
            .unwrap_or_else(|| CategoryStatus::default().to_string());

        Self::from_parts(input.name.unwrap_or_default(), status)
    }

    /// Apply an update on top of an existing category.
    pub fn for_update(current: &Category, input: UpdateCategory) -> Self {
        let name = match input.name {
            Some(name) => name.unwrap_or_default(),
            None => current.name.clone(),
        };
        let status = match input.status {
            Some(status) => status.unwrap_or_default(),
            None => current.status.to_string(),
        };

        Self::from_parts(name, status)
    }

    fn from_parts(name: String, status: String) -> Self {
        // whitespace-only is blank, anything else is checked verbatim
        let status = if status.trim().is_empty() {
            String::new()
        } else {
            status
        };

        Self { name, status }
    }

    /// Parsed status; only meaningful once the draft validated.
    pub fn status(&self) -> Option<CategoryStatus> {
        CategoryStatus::from_str(&self.status).ok()
    }
}

/// Product attributes about to be persisted
#[derive(Debug, Clone, Validate)]
pub struct ProductDraft {
    /// Owning category; existence is checked against the store
    pub category_id: Option<i64>,
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[validate(custom(function = "validate_price"))]
    pub price: PriceField,
}

impl ProductDraft {
    pub fn new(category_id: i64, input: CreateProduct) -> Self {
        Self {
            category_id: Some(category_id),
            name: input.name.unwrap_or_default(),
            description: input.description.unwrap_or_default(),
            price: PriceField::from(input.price),
        }
    }

    pub fn for_update(current: &Product, input: UpdateProduct) -> Self {
        Self {
            category_id: input.category_id.unwrap_or(Some(current.category_id)),
            name: match input.name {
                Some(name) => name.unwrap_or_default(),
                None => current.name.clone(),
            },
            description: match input.description {
                Some(description) => description.unwrap_or_default(),
                None => current.description.clone(),
            },
            price: match input.price {
                Some(price) => PriceField::from(price),
                None => PriceField::Number(current.price),
            },
        }
    }
}

/// Validated category ready for the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub name: String,
    pub status: CategoryStatus,
}

/// Validated product ready for the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub category_id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
}

impl Category {
    pub fn new(id: i64, input: NewCategory) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: input.name,
            status: input.status,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, input: NewCategory) {
        self.name = input.name;
        self.status = input.status;
        self.updated_at = Utc::now();
    }
}

impl Product {
    pub fn new(id: i64, input: NewProduct) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            category_id: input.category_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, input: NewProduct) {
        self.name = input.name;
        self.description = input.description;
        self.price = input.price;
        self.category_id = input.category_id;
        self.updated_at = Utc::now();
    }
}
