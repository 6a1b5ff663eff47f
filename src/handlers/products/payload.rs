use serde_json::Value;
use thiserror::Error;

use super::utils::{normalize_images, normalize_price, normalize_stock, normalize_text, parse_brand, Normalized};
use crate::database::models::{NewProduct, ProductChanges};

/// Text fields accepted on both create and update, with their empty-string policy
const TEXT_FIELDS: [(&str, bool); 4] = [
    ("gearId", false),
    ("title", false),
    ("description", true),
    ("category", false),
];

/// Build a [`NewProduct`] from a create request body.
///
/// Returns `None` on the first missing or malformed field; creation reports a
/// single undifferentiated error.
pub fn new_product_from_json(body: &Value) -> Option<NewProduct> {
    let fields = body.as_object()?;
    let text = |key: &str, allow_empty: bool| normalize_text(fields.get(key)?, allow_empty);

    let gear_id = text("gearId", false)?;
    let title = text("title", false)?;
    let description = text("description", true)?;
    let category = text("category", false)?;
    let brand = parse_brand(fields.get("brand")?)?;
    let price = normalize_price(fields.get("price")?)?;
    let images = normalize_images(fields.get("images")?)?;
    let stock = match normalize_stock(fields.get("stock")) {
        Normalized::Valid(stock) => stock,
        Normalized::Absent => 0,
        Normalized::Invalid => return None,
    };

    Some(NewProduct {
        gear_id,
        title,
        description,
        brand,
        category,
        price,
        images,
        stock,
    })
}

/// Why a partial update was refused; the display text is the client message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChangesError {
    #[error("Invalid brand")]
    InvalidBrand,
    #[error("Invalid price")]
    InvalidPrice,
    #[error("Invalid images")]
    InvalidImages,
    #[error("Invalid stock")]
    InvalidStock,
    #[error("Invalid {0}")]
    InvalidText(&'static str),
    #[error("No fields to update")]
    NoFields,
}

/// Validate the fields present in an update body.
///
/// Checks run brand, price, images, stock, then the text fields, stopping at
/// the first failure. Unknown keys are ignored.
pub fn product_changes_from_json(body: &Value) -> Result<ProductChanges, ChangesError> {
    let Some(fields) = body.as_object() else {
        return Err(ChangesError::NoFields);
    };
    let mut changes = ProductChanges::default();

    if let Some(value) = fields.get("brand") {
        changes.brand = Some(parse_brand(value).ok_or(ChangesError::InvalidBrand)?);
    }
    if let Some(value) = fields.get("price") {
        changes.price = Some(normalize_price(value).ok_or(ChangesError::InvalidPrice)?);
    }
    if let Some(value) = fields.get("images") {
        changes.images = Some(normalize_images(value).ok_or(ChangesError::InvalidImages)?);
    }
    match normalize_stock(fields.get("stock")) {
        Normalized::Valid(stock) => changes.stock = Some(stock),
        Normalized::Invalid => return Err(ChangesError::InvalidStock),
        Normalized::Absent => {}
    }

    for (key, allow_empty) in TEXT_FIELDS {
        let Some(value) = fields.get(key) else {
            continue;
        };
        let text = normalize_text(value, allow_empty).ok_or(ChangesError::InvalidText(key))?;
        match key {
            "gearId" => changes.gear_id = Some(text),
            "title" => changes.title = Some(text),
            "description" => changes.description = Some(text),
            _ => changes.category = Some(text),
        }
    }

    if changes.is_empty() {
        return Err(ChangesError::NoFields);
    }
    Ok(changes)
}
