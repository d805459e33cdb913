use std::sync::Arc;

use log::{debug, info};
use uuid::Uuid;

use crate::context::RequestContext;
use crate::db::models::{Product, ProductPatch};
use crate::db::repository::{BrandGateway, ProductGateway};
use crate::error::CatalogError;
use crate::models::{CreateProductRequest, PageRequest, ProductListing};

/// Product operations that keep every brand reference resolvable.
///
/// Checks and writes are separate round trips with no locking; two
/// interleaved updates resolve as last writer wins.
pub struct ProductService {
    products: Arc<dyn ProductGateway>,
    brands: Arc<dyn BrandGateway>,
}

impl ProductService {
    pub fn new(products: Arc<dyn ProductGateway>, brands: Arc<dyn BrandGateway>) -> Self {
        Self { products, brands }
    }

    fn ensure_brand_exists(&self, ctx: &RequestContext, brand_id: Uuid) -> Result<(), CatalogError> {
        match self.brands.get_by_id(ctx, brand_id)? {
            Some(_) => Ok(()),
            None => Err(CatalogError::InvalidReference(brand_id)),
        }
    }

    pub fn create_product(&self, ctx: &RequestContext, req: &CreateProductRequest) -> Result<Product, CatalogError> {
        self.ensure_brand_exists(ctx, req.brand_id)?;
        let product = self.products.create(ctx, req)?;
        info!("created product {} for brand {}", product.id, product.brand_id);
        Ok(product)
    }

    pub fn get_product(&self, ctx: &RequestContext, id: Uuid) -> Result<Product, CatalogError> {
        debug!("getting product {id}");
        self.products
            .get_by_id(ctx, id)?
            .ok_or_else(|| CatalogError::product_not_found(id))
    }

    pub fn update_product(&self, ctx: &RequestContext, id: Uuid, patch: &ProductPatch) -> Result<Product, CatalogError> {
        if let Some(brand_id) = patch.brand_id {
            self.ensure_brand_exists(ctx, brand_id)?;
        }
        let product = self.products.update(ctx, id, patch)?;
        info!("updated product {id}");
        Ok(product)
    }

    pub fn delete_product(&self, ctx: &RequestContext, id: Uuid) -> Result<(), CatalogError> {
        if self.products.get_by_id(ctx, id)?.is_none() {
            return Err(CatalogError::product_not_found(id));
        }
        self.products.delete(ctx, id)?;
        info!("deleted product {id}");
        Ok(())
    }

    pub fn list_products(&self, ctx: &RequestContext, page: i64, limit: i64) -> Result<ProductListing, CatalogError> {
        let req = PageRequest::normalize(page, limit);
        let (products, total) = self.products.list(ctx, req.limit, req.offset())?;
        debug!("listed {} of {} products (page {})", products.len(), total, req.page);
        Ok(ProductListing {
            products,
            total,
            page: req.page,
            limit: req.limit,
            total_pages: req.total_pages(total),
        })
    }
}
