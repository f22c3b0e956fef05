//! Printful REST client implementation.

use std::sync::Arc;

use printshop_core::{CategoryEntry, ProductId};
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::types::{
    ApiErrorResponse, ApiResponse, CategoriesResult, SyncProduct, SyncProductDetail,
};
use super::{CatalogProvider, PrintfulError};
use crate::config::PrintfulConfig;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Client for the Printful REST API.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct PrintfulClient {
    inner: Arc<PrintfulClientInner>,
}

struct PrintfulClientInner {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl PrintfulClient {
    /// Create a new Printful API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the store ID is not a valid header value or the
    /// HTTP client cannot be built.
    pub fn new(config: &PrintfulConfig) -> Result<Self, PrintfulError> {
        let mut headers = HeaderMap::new();
        if let Some(store_id) = &config.store_id {
            headers.insert("X-PF-Store-Id", HeaderValue::from_str(store_id)?);
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(PrintfulClientInner {
                client,
                base_url: config.api_url.trim_end_matches('/').to_string(),
                api_key: config.api_key.clone(),
            }),
        })
    }

    /// Issue an authenticated GET and unwrap the `result` envelope.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, PrintfulError> {
        let url = format!("{}{path}", self.inner.base_url);

        let response = self
            .inner
            .client
            .get(&url)
            .bearer_auth(self.inner.api_key.expose_secret())
            .send()
            .await?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&response_text)
                .ok()
                .and_then(|body| body.message())
                .unwrap_or_else(|| response_text.chars().take(200).collect());
            tracing::error!(
                status = %status,
                path = %path,
                body = %response_text.chars().take(500).collect::<String>(),
                "Printful API returned non-success status"
            );
            return Err(PrintfulError::Status { status, message });
        }

        match serde_json::from_str::<ApiResponse<T>>(&response_text) {
            Ok(body) => Ok(body.result),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    path = %path,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse Printful response"
                );
                Err(PrintfulError::Parse(e))
            }
        }
    }
}

impl CatalogProvider for PrintfulClient {
    #[instrument(skip(self))]
    async fn categories(&self) -> Result<Vec<CategoryEntry>, PrintfulError> {
        let result: CategoriesResult = self.get("/categories").await?;
        debug!(count = result.categories.len(), "Fetched categories");

        Ok(result
            .categories
            .into_iter()
            .map(|c| CategoryEntry::new(c.id, c.title))
            .collect())
    }

    #[instrument(skip(self))]
    async fn store_products(&self) -> Result<Vec<SyncProduct>, PrintfulError> {
        let products: Vec<SyncProduct> = self.get("/store/products").await?;
        debug!(count = products.len(), "Fetched store products");
        Ok(products)
    }

    #[instrument(skip(self, id), fields(product_id = %id))]
    async fn store_product(&self, id: ProductId) -> Result<SyncProductDetail, PrintfulError> {
        self.get(&format!("/store/products/{id}")).await
    }
}
