use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Closed set of brands the catalog carries. Stored as the `brand` enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "brand")]
pub enum Brand {
    Cuisinart,
    Kitchenaid,
}

impl Brand {
    pub const ALL: [Brand; 2] = [Brand::Cuisinart, Brand::Kitchenaid];

    pub fn as_str(&self) -> &'static str {
        match self {
            Brand::Cuisinart => "Cuisinart",
            Brand::Kitchenaid => "Kitchenaid",
        }
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown brand: {0}")]
pub struct UnknownBrand(pub String);

/// Exact, case-sensitive match against the known variants
impl FromStr for Brand {
    type Err = UnknownBrand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Brand::ALL
            .into_iter()
            .find(|brand| brand.as_str() == s)
            .ok_or_else(|| UnknownBrand(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub gear_id: String,
    pub title: String,
    pub description: String,
    pub brand: Brand,
    pub category: String,
    /// Decimal text, e.g. "99.99"
    pub price: String,
    pub images: Vec<String>,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fully validated input for a new product
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub gear_id: String,
    pub title: String,
    pub description: String,
    pub brand: Brand,
    pub category: String,
    pub price: String,
    pub images: Vec<String>,
    pub stock: i32,
}

/// Validated partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub gear_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub brand: Option<Brand>,
    pub category: Option<String>,
    pub price: Option<String>,
    pub images: Option<Vec<String>>,
    pub stock: Option<i32>,
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply onto an existing product, leaving timestamps to the caller
    pub fn apply_to(self, product: &mut Product) {
        if let Some(v) = self.gear_id {
            product.gear_id = v;
        }
        if let Some(v) = self.title {
            product.title = v;
        }
        if let Some(v) = self.description {
            product.description = v;
        }
        if let Some(v) = self.brand {
            product.brand = v;
        }
        if let Some(v) = self.category {
            product.category = v;
        }
        if let Some(v) = self.price {
            product.price = v;
        }
        if let Some(v) = self.images {
            product.images = v;
        }
        if let Some(v) = self.stock {
            product.stock = v;
        }
    }
}
