//! Seed the catalog from a YAML file.
//!
//! ```yaml
//! - name: Velvet Matte Lipstick
//!   category: Lips
//!   price: "18.00"
//!   stock: 45
//!   description: Long-wear matte finish
//!   featured: true
//! ```
//!
//! Entries go through the same coercion as the admin product form.

use blush_core::config::Env;
use blush_core::{ProductDraft, ProductForm};
use blush_store::{PgStore, ProductStore};

use super::{CliError, connect};

/// Parse and validate every entry before anything is written.
///
/// # Errors
///
/// [`CliError::Yaml`] for malformed YAML, [`CliError::SeedEntry`] for an
/// entry without a name or category.
pub fn parse(content: &str) -> Result<Vec<ProductDraft>, CliError> {
    let forms: Vec<ProductForm> = serde_yaml::from_str(content)?;
    forms
        .into_iter()
        .enumerate()
        .map(|(index, form)| {
            form.into_draft()
                .map_err(|source| CliError::SeedEntry { index, source })
        })
        .collect()
}

/// Insert the products listed in `path`.
///
/// # Errors
///
/// Fails on an unreadable or invalid file, or when the database rejects
/// an insert. The inserts share one transaction, so a failure leaves the
/// catalog as it was.
pub async fn products(path: &str) -> Result<(), CliError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Io {
            path: path.to_owned(),
            source,
        })?;
    let drafts = parse(&content)?;
    tracing::info!(path, count = drafts.len(), "Parsed seed file");

    let store = PgStore::new(connect(&Env::load()).await?);
    for product in store.add_products(drafts).await? {
        tracing::info!(product_id = %product.id, name = %product.name, status = %product.status, "Seeded product");
    }

    tracing::info!("Seeding complete!");
    Ok(())
}
