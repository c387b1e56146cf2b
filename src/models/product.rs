use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductImage {
    pub id: i32,
    pub image: String,
    pub product_id: i32,
}

/// Cleaned form input, ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub description: String,
}

/// A product together with its images, as shown on the listing.
#[derive(Debug, Clone, Serialize)]
pub struct ProductListing {
    #[serde(flatten)]
    pub product: Product,
    pub images: Vec<ProductImage>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ProductListQuery {
    pub obj: Option<String>,
    // Kept as text so a malformed value falls back to the first page instead of a 400.
    pub page: Option<String>,
}

impl ProductListQuery {
    /// Builds the query from raw query string pairs. A repeated key keeps its last value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "obj" => query.obj = Some(value),
                "page" => query.page = Some(value),
                _ => {}
            }
        }
        query
    }

    /// The search term, if one was given and is non-empty.
    pub fn search_term(&self) -> Option<&str> {
        self.obj.as_deref().filter(|term| !term.is_empty())
    }
}
