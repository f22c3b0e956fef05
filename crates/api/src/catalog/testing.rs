//! In-memory `CatalogProvider` for unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use printshop_core::{CategoryEntry, CategoryId, ProductId};

use crate::printful::{CatalogProvider, PrintfulError, SyncProduct, SyncProductDetail};

/// Provider serving fixed data and counting every call.
#[derive(Default)]
pub struct FakeProvider {
    categories: Vec<CategoryEntry>,
    listing: Vec<SyncProduct>,
    details: HashMap<ProductId, SyncProductDetail>,
    failing_categories: bool,
    failing_products: HashSet<ProductId>,
    latency: Option<Duration>,
    category_calls: AtomicUsize,
    list_calls: AtomicUsize,
    detail_calls: Mutex<HashMap<ProductId, usize>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, id: u64, title: &str) -> Self {
        self.categories.push(CategoryEntry::new(CategoryId::new(id), title));
        self
    }

    /// Add a product to the listing and serve `detail` for it.
    pub fn with_product(mut self, detail: SyncProductDetail) -> Self {
        self.listing.push(detail.sync_product.clone());
        self.details.insert(detail.sync_product.id, detail);
        self
    }

    pub fn failing_categories(mut self) -> Self {
        self.failing_categories = true;
        self
    }

    pub fn failing_product(mut self, id: u64) -> Self {
        self.failing_products.insert(ProductId::new(id));
        self
    }

    /// Delay every detail response so concurrent calls overlap.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn category_calls(&self) -> usize {
        self.category_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.lock().unwrap().values().sum()
    }

    pub fn detail_calls_for(&self, id: u64) -> usize {
        self.detail_calls
            .lock()
            .unwrap()
            .get(&ProductId::new(id))
            .copied()
            .unwrap_or(0)
    }

    pub fn upstream_calls(&self) -> usize {
        self.category_calls() + self.list_calls() + self.detail_calls()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

fn upstream_failure(message: &str) -> PrintfulError {
    PrintfulError::Status {
        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        message: message.to_string(),
    }
}

impl CatalogProvider for FakeProvider {
    async fn categories(&self) -> Result<Vec<CategoryEntry>, PrintfulError> {
        self.category_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_categories {
            return Err(upstream_failure("categories unavailable"));
        }
        Ok(self.categories.clone())
    }

    async fn store_products(&self) -> Result<Vec<SyncProduct>, PrintfulError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.listing.clone())
    }

    async fn store_product(&self, id: ProductId) -> Result<SyncProductDetail, PrintfulError> {
        *self.detail_calls.lock().unwrap().entry(id).or_insert(0) += 1;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_products.contains(&id) {
            return Err(upstream_failure("product unavailable"));
        }
        self.details.get(&id).cloned().ok_or_else(|| PrintfulError::Status {
            status: reqwest::StatusCode::NOT_FOUND,
            message: "Not Found".to_string(),
        })
    }
}

/// Build a one-variant product detail as Printful would return it.
pub fn product_detail(id: u64, name: &str, category_id: u64, price: &str) -> SyncProductDetail {
    detail_from_json(serde_json::json!({
        "sync_product": {
            "id": id,
            "external_id": format!("ext-{id}"),
            "name": name,
            "thumbnail_url": format!("https://files.example/{id}/thumb.png")
        },
        "sync_variants": [{
            "id": id * 100,
            "external_id": format!("ext-{id}-m"),
            "name": format!("{name} / M"),
            "main_category_id": category_id,
            "retail_price": price,
            "currency": "USD",
            "sku": format!("SKU-{id}-M"),
            "size": "M",
            "color": "Black",
            "availability_status": "active",
            "files": [
                { "type": "default", "url": format!("https://files.example/{id}/print.png") },
                { "type": "front", "url": format!("https://files.example/{id}/front.png") },
                { "type": "preview", "preview_url": format!("https://files.example/{id}/preview.png") }
            ]
        }]
    }))
}

pub fn detail_from_json(value: serde_json::Value) -> SyncProductDetail {
    serde_json::from_value(value).unwrap()
}
