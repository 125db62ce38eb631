//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! bg-cli catalog --category boards
//! bg-cli product wobble-disc
//! ```

use balance_guru_core::ProductId;
use balance_guru_storefront::catalog::Product;
use balance_guru_storefront::{StorefrontConfig, StorefrontError, StorefrontSession};

/// List products, filtered by category and featured flag.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or serialized.
pub fn list(
    config: StorefrontConfig,
    category: Option<&str>,
    featured_only: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = StorefrontSession::from_config(config)?;
    let catalog = session.catalog();
    let products: Vec<&Product> = match category {
        Some(category) => catalog
            .in_category(category)
            .filter(|p| !featured_only || p.featured)
            .collect(),
        None if featured_only => catalog.featured().collect(),
        None => catalog.all().iter().collect(),
    };

    tracing::debug!(count = products.len(), "Listing products");

    #[allow(clippy::print_stdout)]
    {
        if json {
            println!("{}", serde_json::to_string_pretty(&products)?);
        } else {
            for p in &products {
                let star = if p.featured { "*" } else { " " };
                println!(
                    "{star} {:<24} {:>9}  {:<12} {}",
                    p.id.as_str(),
                    p.price.to_string(),
                    p.category,
                    p.title
                );
            }
        }
    }

    Ok(())
}

/// Show one product, its default options and related products.
///
/// # Errors
///
/// Returns `StorefrontError::UnknownProduct` if the ID is not in the catalog.
pub fn show(config: StorefrontConfig, id: &str) -> Result<(), StorefrontError> {
    let mut session = StorefrontSession::from_config(config)?;
    let (product, related) = session.view_product(&ProductId::new(id))?;
    let selection = product.default_selection();

    #[allow(clippy::print_stdout)]
    {
        println!("{} - {}", product.title, product.price);
        if !product.subtitle.is_empty() {
            println!("{}", product.subtitle);
        }
        println!();
        println!("{}", product.description_or_default());
        println!();
        if !product.sizes.is_empty() {
            println!(
                "Sizes:  {} (default {})",
                product.sizes.join(", "),
                selection.size.as_deref().unwrap_or("-")
            );
        }
        if !product.colors.is_empty() {
            println!(
                "Colors: {} (default {})",
                product.colors.join(", "),
                selection.color.as_deref().unwrap_or("-")
            );
        }

        if !related.is_empty() {
            println!();
            println!("You may also like:");
            for p in related {
                println!(
                    "  {:<24} {:>9}  {}",
                    p.id.as_str(),
                    p.price.to_string(),
                    p.title
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_list_builtin_catalog() {
        list(StorefrontConfig::default(), Some("boards"), false, true).unwrap();
        list(StorefrontConfig::default(), None, true, false).unwrap();
    }

    #[test]
    fn test_show_known_product() {
        show(StorefrontConfig::default(), "wobble-disc").unwrap();
    }

    #[test]
    fn test_show_unknown_product() {
        let err = show(StorefrontConfig::default(), "ghost").unwrap_err();
        assert!(matches!(err, StorefrontError::UnknownProduct(id) if id.as_str() == "ghost"));
    }
}
