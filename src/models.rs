use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::models::{Brand, Product, ProductPatch};
use crate::error::CatalogError;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateBrandRequest {
    pub brand_name: String,
}

impl CreateBrandRequest {
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.brand_name.trim().is_empty() {
            return Err(CatalogError::validation("brand_name is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub product_name: String,
    pub price: f64,
    pub qty: f64,
    pub brand_id: Uuid,
}

impl CreateProductRequest {
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.product_name.trim().is_empty() {
            return Err(CatalogError::validation("product_name is required"));
        }
        if self.price <= 0.0 {
            return Err(CatalogError::validation("price must be greater than 0"));
        }
        if self.qty < 0.0 {
            return Err(CatalogError::validation("qty must not be negative"));
        }
        if self.brand_id.is_nil() {
            return Err(CatalogError::validation("brand_id is required"));
        }
        Ok(())
    }
}

/// How an update body decides which fields were supplied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PatchSemantics {
    /// A field is supplied when it is present in the body; values are validated.
    #[default]
    Explicit,
    /// Zero-value sentinels: empty name, price <= 0, negative qty and the nil
    /// uuid mean "not supplied". An omitted qty reads as 0 and is written.
    Legacy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub qty: Option<f64>,
    #[serde(default)]
    pub brand_id: Option<Uuid>,
}

impl UpdateProductRequest {
    pub fn into_patch(self, semantics: PatchSemantics) -> Result<ProductPatch, CatalogError> {
        match semantics {
            PatchSemantics::Legacy => Ok(ProductPatch {
                product_name: self.product_name.filter(|name| !name.is_empty()),
                price: self.price.filter(|price| *price > 0.0),
                qty: Some(self.qty.unwrap_or(0.0)).filter(|qty| *qty >= 0.0),
                brand_id: self.brand_id.filter(|id| !id.is_nil()),
            }),
            PatchSemantics::Explicit => {
                if matches!(&self.product_name, Some(name) if name.trim().is_empty()) {
                    return Err(CatalogError::validation("product_name must not be empty"));
                }
                if matches!(self.price, Some(price) if price <= 0.0) {
                    return Err(CatalogError::validation("price must be greater than 0"));
                }
                if matches!(self.qty, Some(qty) if qty < 0.0) {
                    return Err(CatalogError::validation("qty must not be negative"));
                }
                if matches!(self.brand_id, Some(id) if id.is_nil()) {
                    return Err(CatalogError::validation("brand_id must not be nil"));
                }
                Ok(ProductPatch {
                    product_name: self.product_name,
                    price: self.price,
                    qty: self.qty,
                    brand_id: self.brand_id,
                })
            }
        }
    }
}

/// Raw `page`/`limit` query values. Anything that does not parse as an
/// integer is treated as absent.
#[derive(Debug, Default)]
pub struct ProductQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ProductQuery {
    /// Picks `page` and `limit` out of decoded query pairs. The first
    /// occurrence of a repeated key wins; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = ProductQuery::default();
        for (key, value) in pairs {
            match key.as_str() {
                "page" if query.page.is_none() => query.page = Some(value),
                "limit" if query.limit.is_none() => query.limit = Some(value),
                _ => {}
            }
        }
        query
    }

    pub fn page(&self) -> i64 {
        parse_or(self.page.as_deref(), 1)
    }

    pub fn limit(&self) -> i64 {
        parse_or(self.limit.as_deref(), DEFAULT_PAGE_SIZE)
    }
}

fn parse_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

/// A normalized page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn normalize(page: i64, limit: i64) -> Self {
        let page = if page < 1 { 1 } else { page };
        let limit = if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            DEFAULT_PAGE_SIZE
        } else {
            limit
        };
        PageRequest { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// `ceil(total / limit)` in integer arithmetic.
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        (total + self.limit - 1) / self.limit
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductListing {
    pub products: Vec<Product>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BrandResponse {
    #[schema(example = "Brand created successfully")]
    pub message: String,
    pub data: Brand,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BrandListResponse {
    #[schema(example = "Brands retrieved successfully")]
    pub message: String,
    pub data: Vec<Brand>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    #[schema(example = "Product created successfully")]
    pub message: String,
    pub data: Product,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductListResponse {
    #[schema(example = "Products retrieved successfully")]
    pub message: String,
    pub data: ProductListing,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Operation completed successfully")]
    pub message: String,
}

/// Body of every failed request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Something went wrong")]
    pub error: String,
}
