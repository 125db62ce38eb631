//! Static product catalog.
//!
//! The catalog is an ordered, read-only list of products supplied at start-up:
//! either the built-in product data or a JSON file named by
//! `STOREFRONT_CATALOG_PATH`. Products are validated once on load so the cart
//! and checkout never have to.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use balance_guru_core::{Price, ProductId};

use crate::error::StorefrontError;

/// Built-in product data shipped with the storefront.
const BUILTIN_CATALOG: &str = include_str!("../catalog/products.json");

/// Shown on the product page when a product has no description.
pub const DEFAULT_DESCRIPTION: &str = "This premium product is designed for elite performance \
     and durability. Engineered with the latest technology and crafted with attention to \
     detail, this is the choice of professionals and enthusiasts worldwide.";

/// Number of related products shown under a product.
pub const RELATED_PRODUCTS_LIMIT: usize = 4;

/// Errors that can occur when loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog JSON is malformed.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// A product has a blank ID.
    #[error("product at position {0} has an empty id")]
    EmptyId(usize),

    /// Two products share an ID.
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),

    /// A product has a negative price.
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),

    /// A product image is not a valid URI.
    #[error("product {id} has an invalid image URI: {source}")]
    InvalidImage {
        id: ProductId,
        #[source]
        source: url::ParseError,
    },
}

/// A product as supplied by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    /// Image URI.
    pub image: String,
    /// Size options in display order; empty when the product has no sizes.
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Color options in display order; empty when the product has no colors.
    #[serde(default)]
    pub colors: Vec<String>,
    pub category: String,
    #[serde(default)]
    pub featured: bool,
}

impl Product {
    /// Description to show, falling back to [`DEFAULT_DESCRIPTION`].
    #[must_use]
    pub fn description_or_default(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(DEFAULT_DESCRIPTION)
    }

    /// The options preselected on the product page: the first size and the
    /// first color, when the product has them.
    #[must_use]
    pub fn default_selection(&self) -> Selection {
        Selection {
            size: self.sizes.first().cloned(),
            color: self.colors.first().cloned(),
        }
    }

    /// Resolve a shopper's choice against the offered options.
    ///
    /// A missing size or color falls back to [`Self::default_selection`].
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::InvalidOption` for a value the product does
    /// not offer.
    pub fn select(&self, size: Option<String>, color: Option<String>) -> crate::Result<Selection> {
        Ok(Selection {
            size: self.pick("size", &self.sizes, size)?,
            color: self.pick("color", &self.colors, color)?,
        })
    }

    fn pick(
        &self,
        option: &'static str,
        offered: &[String],
        chosen: Option<String>,
    ) -> crate::Result<Option<String>> {
        match chosen {
            None => Ok(offered.first().cloned()),
            Some(value) if offered.contains(&value) => Ok(Some(value)),
            Some(value) => Err(StorefrontError::InvalidOption {
                id: self.id.clone(),
                option,
                value,
            }),
        }
    }
}

/// A size/color choice for a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Ordered, validated product list.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from products, validating them.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if any ID is blank or duplicated, a price is
    /// negative, or an image is not a valid URI.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        validate(&products)?;
        Ok(Self { products })
    }

    /// The built-in product catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the embedded product data is invalid.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON, or a validation error.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read, otherwise as
    /// [`Catalog::from_json`].
    #[instrument(fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(products = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns true if the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Featured products, in catalog order.
    pub fn featured(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.featured)
    }

    /// Products in a category, in catalog order.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> {
        self.products.iter().filter(move |p| p.category == category)
    }

    /// Up to `limit` other products from the same category.
    #[must_use]
    pub fn related(&self, product: &Product, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == product.category && p.id != product.id)
            .take(limit)
            .collect()
    }
}

fn validate(products: &[Product]) -> Result<(), CatalogError> {
    let mut seen = HashSet::with_capacity(products.len());

    for (position, product) in products.iter().enumerate() {
        if product.id.is_blank() {
            return Err(CatalogError::EmptyId(position));
        }
        if !seen.insert(&product.id) {
            return Err(CatalogError::DuplicateId(product.id.clone()));
        }
        if product.price.is_negative() {
            return Err(CatalogError::NegativePrice(product.id.clone()));
        }
        url::Url::parse(&product.image).map_err(|source| CatalogError::InvalidImage {
            id: product.id.clone(),
            source,
        })?;
    }

    Ok(())
}
