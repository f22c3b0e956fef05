//! Raw Printful API response types.
//!
//! Only the fields the catalog reads are modeled; everything else in the
//! provider's payload is ignored. Printful sends `null` for many optional
//! strings, so those are `Option`.

use printshop_core::{CategoryId, ProductId, VariantId};
use serde::Deserialize;

/// Envelope wrapping every successful Printful response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub result: T,
}

/// Envelope of a failed Printful response.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorResponse {
    /// Best human-readable message in the error body.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        self.error
            .as_ref()
            .and_then(|e| e.message.clone().or_else(|| e.reason.clone()))
            .or_else(|| {
                self.result
                    .as_ref()
                    .and_then(|r| r.as_str().map(String::from))
            })
    }
}

/// `GET /categories` result.
#[derive(Debug, Deserialize)]
pub struct CategoriesResult {
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub title: String,
}

/// A product in the connected store, as listed by `GET /store/products`.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncProduct {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// `GET /store/products/{id}` result.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncProductDetail {
    pub sync_product: SyncProduct,
    #[serde(default)]
    pub sync_variants: Vec<SyncVariant>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncVariant {
    pub id: VariantId,
    pub name: String,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub main_category_id: Option<CategoryId>,
    /// Decimal amount as text, e.g. `"19.99"`.
    pub retail_price: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub availability_status: Option<String>,
    #[serde(default)]
    pub files: Vec<VariantFile>,
}

/// A print or mockup file attached to a sync variant.
#[derive(Debug, Clone, Deserialize)]
pub struct VariantFile {
    /// File role, e.g. `"front"`, `"back"`, `"preview"`, `"default"`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
}

impl VariantFile {
    /// Displayable URL for the file, preferring the rendered preview.
    #[must_use]
    pub fn display_url(&self) -> Option<&str> {
        self.preview_url.as_deref().or(self.url.as_deref())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_product_detail() {
        let body = serde_json::json!({
            "code": 200,
            "result": {
                "sync_product": {
                    "id": 42,
                    "external_id": "abc",
                    "name": "Tee",
                    "variants": 1,
                    "synced": 1,
                    "thumbnail_url": null,
                    "is_ignored": false
                },
                "sync_variants": [{
                    "id": 7,
                    "external_id": "var-abc",
                    "sync_product_id": 42,
                    "name": "Tee / M",
                    "main_category_id": 1,
                    "retail_price": "19.99",
                    "currency": "USD",
                    "sku": null,
                    "size": "M",
                    "color": "Black",
                    "availability_status": "active",
                    "files": [{
                        "id": 1,
                        "type": "front",
                        "url": "https://files.example/front.png",
                        "preview_url": null,
                        "visible": true
                    }]
                }]
            }
        });

        let parsed: ApiResponse<SyncProductDetail> = serde_json::from_value(body).unwrap();
        let detail = parsed.result;

        assert_eq!(detail.sync_product.id, ProductId::new(42));
        assert!(detail.sync_product.thumbnail_url.is_none());
        let variant = &detail.sync_variants[0];
        assert_eq!(variant.main_category_id, Some(CategoryId::new(1)));
        assert!(variant.sku.is_none());
        assert_eq!(variant.files[0].kind, "front");
        assert_eq!(
            variant.files[0].display_url(),
            Some("https://files.example/front.png")
        );
    }

    #[test]
    fn test_error_message_prefers_error_detail() {
        let body: ApiErrorResponse = serde_json::from_str(
            r#"{"code":404,"result":"Not Found","error":{"reason":"NotFound","message":"Product not found"}}"#,
        )
        .unwrap();
        assert_eq!(body.message().as_deref(), Some("Product not found"));

        let body: ApiErrorResponse =
            serde_json::from_str(r#"{"code":401,"result":"Unauthorized"}"#).unwrap();
        assert_eq!(body.message().as_deref(), Some("Unauthorized"));
    }
}
