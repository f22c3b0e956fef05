//! Product detail fetching and normalization.

use std::str::FromStr;

use printshop_core::{
    CategoryEntry, NormalizedProduct, ProductId, ProductImages, ProductRating, ProductVariant,
};
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use super::categories::{UNKNOWN_CATEGORY, resolve_title};
use super::{CacheKey, Catalog, CatalogError};
use crate::printful::{CatalogProvider, SyncProductDetail, SyncVariant, VariantFile};

impl<P: CatalogProvider> Catalog<P> {
    /// Get one normalized product, from cache when fresh.
    ///
    /// Categories are not fetched on a cache hit. On a miss they come from
    /// [`get_categories`](Self::get_categories), and a category failure fails
    /// the whole fetch.
    ///
    /// # Errors
    ///
    /// Returns an error if any Printful request fails or the product data
    /// cannot be normalized.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(
        &self,
        product_id: ProductId,
    ) -> Result<NormalizedProduct, CatalogError> {
        if let Some(product) = self
            .inner
            .cache
            .products
            .get(&CacheKey::Product(product_id))
            .await
        {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let categories = self.get_categories().await?;
        self.get_product_details(product_id, &categories).await
    }

    /// Get one normalized product, labelling it from `categories`.
    ///
    /// On a cache miss this makes exactly one upstream request. Nothing is
    /// cached unless normalization succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the Printful request fails or the product data
    /// cannot be normalized.
    pub async fn get_product_details(
        &self,
        product_id: ProductId,
        categories: &[CategoryEntry],
    ) -> Result<NormalizedProduct, CatalogError> {
        let key = CacheKey::Product(product_id);
        self.inner
            .cache
            .products
            .get_or_try_insert_with(key, self.inner.policy.ttl_for(&key), || async {
                debug!(product_id = %product_id, "Cache miss for product");
                let detail = self
                    .inner
                    .provider
                    .store_product(product_id)
                    .await
                    .map_err(CatalogError::from)?;
                normalize_product(detail, categories)
            })
            .await
    }
}

/// Convert a Printful product into the frontend shape.
///
/// The first sync variant supplies every top-level commerce field; all
/// variants are listed under `variants`.
///
/// # Errors
///
/// Returns an error if there are no sync variants or any variant price is
/// not a decimal number.
pub fn normalize_product(
    detail: SyncProductDetail,
    categories: &[CategoryEntry],
) -> Result<NormalizedProduct, CatalogError> {
    let SyncProductDetail {
        sync_product,
        sync_variants,
    } = detail;

    let Some(primary) = sync_variants.first() else {
        return Err(CatalogError::MissingVariants {
            product_id: sync_product.id,
        });
    };

    let price = parse_price(primary)?;
    let category = primary.main_category_id.map_or_else(
        || UNKNOWN_CATEGORY.to_string(),
        |id| resolve_title(categories, id),
    );
    let images = ProductImages {
        front: file_url(&primary.files, "front"),
        preview: file_url(&primary.files, "preview"),
        thumbnail: sync_product.thumbnail_url.clone().unwrap_or_default(),
    };

    let variants = sync_variants
        .iter()
        .map(|variant| {
            Ok(ProductVariant {
                id: variant.id,
                name: variant.name.clone(),
                size: variant.size.clone().unwrap_or_default(),
                price: parse_price(variant)?,
                sku: variant.sku.clone().unwrap_or_default(),
                external_id: variant.external_id.clone().unwrap_or_default(),
                color: variant.color.clone().unwrap_or_default(),
            })
        })
        .collect::<Result<Vec<_>, CatalogError>>()?;

    Ok(NormalizedProduct {
        id: sync_product.id,
        title: sync_product.name,
        description: primary.name.clone(),
        price,
        category,
        images,
        rating: ProductRating::default(),
        sku: primary.sku.clone().unwrap_or_default(),
        currency: primary.currency.clone().unwrap_or_default(),
        color: primary.color.clone().unwrap_or_default(),
        availability_status: primary.availability_status.clone().unwrap_or_default(),
        external_id: primary.external_id.clone().unwrap_or_default(),
        variants,
    })
}

fn parse_price(variant: &SyncVariant) -> Result<Decimal, CatalogError> {
    Decimal::from_str(variant.retail_price.trim()).map_err(|source| CatalogError::InvalidPrice {
        variant_id: variant.id,
        value: variant.retail_price.clone(),
        source,
    })
}

/// URL of the first file of type `kind`, or empty.
fn file_url(files: &[VariantFile], kind: &str) -> String {
    files
        .iter()
        .find(|f| f.kind == kind)
        .and_then(VariantFile::display_url)
        .unwrap_or_default()
        .to_string()
}
