//! Field rules and rendering of validation failures into full messages.
//!
//! Rule functions plug into `#[validate(custom(function = ...))]`; each returns at most
//! one error whose message is the predicate part ("can't be blank"). [`ValidationReport`]
//! turns them into "Name can't be blank" in declared field order.

use rust_decimal::Decimal;
use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors};

use crate::error::{CatalogError, CatalogResult};
use crate::models::{CategoryStatus, PriceField};

pub const BLANK: &str = "can't be blank";
pub const TAKEN: &str = "has already been taken";
pub const NOT_INCLUDED: &str = "is not included in the list";
pub const NOT_A_NUMBER: &str = "is not a number";
pub const NOT_POSITIVE: &str = "must be greater than 0";
pub const MUST_EXIST: &str = "must exist";
pub const TOO_LARGE: &str = "must be less than 10000000000";

/// Exclusive upper bound of a `NUMERIC(12,2)` price column
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

/// Field order for category messages
pub const CATEGORY_FIELDS: &[&str] = &["name", "status"];
/// Field order for product messages
pub const PRODUCT_FIELDS: &[&str] = &["category", "name", "description", "price"];

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Rejects empty and whitespace-only text.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", BLANK));
    }
    Ok(())
}

/// Status must name a [`CategoryStatus`] exactly.
pub fn validate_status(value: &str) -> Result<(), ValidationError> {
    if value.parse::<CategoryStatus>().is_err() {
        return Err(error("inclusion", NOT_INCLUDED));
    }
    Ok(())
}

pub fn validate_price(value: &PriceField) -> Result<(), ValidationError> {
    match value {
        PriceField::Blank => Err(error("blank", BLANK)),
        PriceField::Invalid(_) => Err(error("not_a_number", NOT_A_NUMBER)),
        PriceField::Number(price) if *price <= Decimal::ZERO => {
            Err(error("greater_than", NOT_POSITIVE))
        }
        PriceField::Number(price) if *price >= MAX_PRICE => Err(error("less_than", TOO_LARGE)),
        PriceField::Number(_) => Ok(()),
    }
}

/// "category_id" → "Category", "description" → "Description"
fn humanize(field: &str) -> String {
    let base = field.strip_suffix("_id").unwrap_or(field).replace('_', " ");
    let mut chars = base.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Accumulates field errors and renders them as full messages.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    fields: &'static [&'static str],
    entries: Vec<(usize, String)>,
}

impl ValidationReport {
    pub fn new(fields: &'static [&'static str]) -> Self {
        Self {
            fields,
            entries: Vec::new(),
        }
    }

    /// Collect the errors produced by `validator` for the known fields.
    pub fn from_result(fields: &'static [&'static str], result: Result<(), ValidationErrors>) -> Self {
        let mut report = Self::new(fields);

        if let Err(errors) = result {
            let field_errors = errors.field_errors();
            for field in fields {
                let Some(list) = field_errors.get(*field) else {
                    continue;
                };
                for err in list.iter() {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    report.add(field, message);
                }
            }
        }

        report
    }

    /// Record `message` against `field`. Unknown fields sort last.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        let position = self
            .fields
            .iter()
            .position(|f| *f == field)
            .unwrap_or(self.fields.len());
        let full = format!("{} {}", humanize(field), message.into());
        self.entries.push((position, full));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|(position, _)| *position);
        entries.into_iter().map(|(_, message)| message).collect()
    }

    /// `Ok(())` when nothing was recorded, otherwise [`CatalogError::Validation`].
    pub fn into_result(self) -> CatalogResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::Validation(self.messages()))
        }
    }
}
