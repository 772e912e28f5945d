//! Products and catalog queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId, StockStatus, coerce_stock};

/// A product record as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Price,
    pub stock: u32,
    /// Derived from `stock`; kept in sync by [`Product::set_stock`].
    pub status: StockStatus,
    pub description: Option<String>,
    /// Image URL or storage reference.
    pub image: Option<String>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Build a stored product from a draft.
    #[must_use]
    pub fn from_draft(id: ProductId, draft: ProductDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            status: StockStatus::for_stock(draft.stock),
            name: draft.name,
            category: draft.category,
            price: draft.price,
            stock: draft.stock,
            description: draft.description,
            image: draft.image,
            featured: draft.featured,
            created_at,
        }
    }

    /// Overwrite every editable field, keeping `id` and `created_at`.
    pub fn apply(&mut self, draft: ProductDraft) {
        *self = Self::from_draft(self.id, draft, self.created_at);
    }

    pub const fn set_stock(&mut self, stock: u32) {
        self.stock = stock;
        self.status = StockStatus::for_stock(stock);
    }

    /// Case-insensitive substring match over name, category and description.
    ///
    /// A blank term matches every product.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [
            Some(self.name.as_str()),
            Some(self.category.as_str()),
            self.description.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
    }

    #[must_use]
    pub fn is_low_stock(&self) -> bool {
        self.status == StockStatus::LowStock
    }
}

/// Editable product fields, already coerced to their typed form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    pub price: Price,
    pub stock: u32,
    pub description: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

/// A number typed into a form, sent either as JSON text or as a JSON number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FormNumber {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Default for FormNumber {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl FormNumber {
    fn as_text(&self) -> String {
        match self {
            Self::Integer(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// Product form as the admin console submits it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: String,
    pub category: String,
    pub price: FormNumber,
    pub stock: FormNumber,
    pub description: Option<String>,
    pub image: Option<String>,
    pub featured: bool,
}

/// Reasons a product form is refused.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductError {
    #[error("{0} is required")]
    MissingField(&'static str),
}

impl ProductForm {
    /// Coerce the form into a draft.
    ///
    /// Price and stock never fail: bad input becomes 0 and negatives are
    /// clamped. Blank description and image are dropped.
    ///
    /// # Errors
    ///
    /// [`ProductError::MissingField`] for a blank name or category.
    pub fn into_draft(self) -> Result<ProductDraft, ProductError> {
        let name = required(self.name, "Name")?;
        let category = required(self.category, "Category")?;
        Ok(ProductDraft {
            name,
            category,
            price: Price::coerce(&self.price.as_text()),
            stock: coerce_stock(&self.stock.as_text()),
            description: non_blank(self.description),
            image: non_blank(self.image),
            featured: self.featured,
        })
    }
}

fn required(value: String, field: &'static str) -> Result<String, ProductError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ProductError::MissingField(field))
    } else {
        Ok(trimmed.to_owned())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Products matching `term`, in catalog order.
#[must_use]
pub fn search<'a>(products: &'a [Product], term: &str) -> Vec<&'a Product> {
    products.iter().filter(|p| p.matches_search(term)).collect()
}

/// Distinct categories in the order they first appear.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for product in products {
        if !seen.iter().any(|c| c == &product.category) {
            seen.push(product.category.clone());
        }
    }
    seen
}

/// The first `limit` featured products.
#[must_use]
pub fn featured(products: &[Product], limit: usize) -> Vec<&Product> {
    products.iter().filter(|p| p.featured).take(limit).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft(name: &str, category: &str, stock: u32) -> ProductDraft {
        ProductDraft {
            name: name.to_owned(),
            category: category.to_owned(),
            price: Price::coerce("10.00"),
            stock,
            description: None,
            image: None,
            featured: false,
        }
    }

    fn product(id: i32, name: &str, category: &str, stock: u32) -> Product {
        Product::from_draft(ProductId::new(id), draft(name, category, stock), Utc::now())
    }

    #[test]
    fn test_form_coerces_numbers() {
        let form: ProductForm = serde_json::from_str(
            r#"{"name":" Glow Serum ","category":"Skincare","price":"24.50","stock":"abc","description":"  "}"#,
        )
        .unwrap();
        let draft = form.into_draft().unwrap();
        assert_eq!(draft.name, "Glow Serum");
        assert_eq!(draft.price.display(), "$24.50");
        assert_eq!(draft.stock, 0);
        assert_eq!(draft.description, None);
        assert!(!draft.featured);

        let form: ProductForm =
            serde_json::from_str(r#"{"name":"Kohl","category":"Eyes","price":-3,"stock":12}"#)
                .unwrap();
        let draft = form.into_draft().unwrap();
        assert_eq!(draft.price, Price::ZERO);
        assert_eq!(draft.stock, 12);

        let form: ProductForm =
            serde_json::from_str(r#"{"name":"Gloss","category":"Lips","price":9.5,"stock":-4}"#)
                .unwrap();
        let draft = form.into_draft().unwrap();
        assert_eq!(draft.price.display(), "$9.50");
        assert_eq!(draft.stock, 0);
    }

    #[test]
    fn test_form_requires_name_and_category() {
        let form = ProductForm {
            name: "Balm".to_owned(),
            ..ProductForm::default()
        };
        assert_eq!(
            form.into_draft().unwrap_err(),
            ProductError::MissingField("Category")
        );
        assert_eq!(
            ProductForm::default().into_draft().unwrap_err().to_string(),
            "Name is required"
        );
    }

    #[test]
    fn test_status_derived_from_draft_stock() {
        assert_eq!(product(1, "Balm", "Lips", 0).status, StockStatus::OutOfStock);
        assert_eq!(product(2, "Balm", "Lips", 20).status, StockStatus::LowStock);
        assert_eq!(product(3, "Balm", "Lips", 21).status, StockStatus::InStock);
    }

    #[test]
    fn test_apply_keeps_identity_and_rederives_status() {
        let mut p = product(4, "Mascara", "Eyes", 50);
        let created = p.created_at;
        p.apply(draft("Volume Mascara", "Eyes", 3));
        assert_eq!(p.id, ProductId::new(4));
        assert_eq!(p.created_at, created);
        assert_eq!(p.name, "Volume Mascara");
        assert_eq!(p.status, StockStatus::LowStock);
    }

    #[test]
    fn test_set_stock_updates_status() {
        let mut p = product(5, "Blush", "Face", 25);
        p.set_stock(0);
        assert_eq!(p.status, StockStatus::OutOfStock);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let mut rose = product(1, "Rose Lip Tint", "Lips", 30);
        rose.description = Some("Sheer HYDRATING colour".to_owned());
        let items = vec![rose, product(2, "Night Cream", "Skincare", 30)];

        assert_eq!(search(&items, "lip").len(), 1);
        assert_eq!(search(&items, "SKINCARE").len(), 1);
        assert_eq!(search(&items, "hydrating")[0].id, ProductId::new(1));
        assert_eq!(search(&items, "  ").len(), 2);
        assert!(search(&items, "perfume").is_empty());
    }

    #[test]
    fn test_categories_first_seen_order() {
        let items = vec![
            product(1, "A", "Lips", 1),
            product(2, "B", "Eyes", 1),
            product(3, "C", "Lips", 1),
        ];
        assert_eq!(categories(&items), vec!["Lips", "Eyes"]);
    }

    #[test]
    fn test_featured_respects_limit() {
        let mut items: Vec<Product> = (1..=5).map(|i| product(i, "P", "Face", 30)).collect();
        for p in &mut items {
            p.featured = p.id.as_i32() != 2;
        }
        let picks: Vec<i32> = featured(&items, 3).iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(picks, vec![1, 3, 4]);
    }
}
