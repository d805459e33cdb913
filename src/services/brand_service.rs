use std::sync::Arc;

use log::{debug, info, warn};
use uuid::Uuid;

use crate::context::RequestContext;
use crate::db::models::Brand;
use crate::db::repository::BrandGateway;
use crate::error::CatalogError;

/// Brand operations that must not orphan products.
pub struct BrandService {
    brands: Arc<dyn BrandGateway>,
}

impl BrandService {
    pub fn new(brands: Arc<dyn BrandGateway>) -> Self {
        Self { brands }
    }

    pub fn create_brand(&self, ctx: &RequestContext, brand_name: &str) -> Result<Brand, CatalogError> {
        let brand = self.brands.create(ctx, brand_name)?;
        info!("created brand {} ({})", brand.id, brand.brand_name);
        Ok(brand)
    }

    pub fn get_brand(&self, ctx: &RequestContext, id: Uuid) -> Result<Brand, CatalogError> {
        debug!("getting brand {id}");
        self.brands
            .get_by_id(ctx, id)?
            .ok_or_else(|| CatalogError::brand_not_found(id))
    }

    /// Existence is checked before usage, so a missing brand is always
    /// `NotFound` and never `Conflict`.
    pub fn delete_brand(&self, ctx: &RequestContext, id: Uuid) -> Result<(), CatalogError> {
        if self.brands.get_by_id(ctx, id)?.is_none() {
            return Err(CatalogError::brand_not_found(id));
        }
        if self.brands.is_referenced_by_products(ctx, id)? {
            warn!("refusing to delete brand {id}: still referenced by products");
            return Err(CatalogError::brand_in_use());
        }
        self.brands.delete(ctx, id)?;
        info!("deleted brand {id}");
        Ok(())
    }

    pub fn list_brands(&self, ctx: &RequestContext) -> Result<Vec<Brand>, CatalogError> {
        self.brands.list(ctx)
    }
}
