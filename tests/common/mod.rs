#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use actix_web::web;
use chrono::{Duration, NaiveDateTime, Utc};
use uuid::Uuid;

use catalog_api::db::{Brand, BrandGateway, Product, ProductGateway, ProductPatch};
use catalog_api::handlers::AppState;
use catalog_api::models::{CreateProductRequest, PatchSemantics};
use catalog_api::{CatalogError, RequestContext};

#[derive(Default)]
struct Tables {
    brands: Vec<Brand>,
    products: Vec<Product>,
    ticks: i64,
}

impl Tables {
    /// Strictly increasing timestamps so newest-first ordering is stable.
    fn now(&mut self) -> NaiveDateTime {
        self.ticks += 1;
        Utc::now().naive_utc() + Duration::microseconds(self.ticks)
    }

    fn brand_name(&self, id: Uuid) -> Option<String> {
        self.brands.iter().find(|b| b.id == id).map(|b| b.brand_name.clone())
    }

    fn resolved(&self, product: &Product) -> Product {
        Product { brand_name: self.brand_name(product.brand_id), ..product.clone() }
    }
}

/// In-memory stand-in for both gateways. Counts storage round trips so tests
/// can observe which calls a service made.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    calls: Mutex<Vec<&'static str>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn record(&self, ctx: &RequestContext, call: &'static str) -> Result<(), CatalogError> {
        ctx.ensure_active()?;
        self.calls.lock().unwrap().push(call);
        Ok(())
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn product_count(&self) -> usize {
        self.tables.lock().unwrap().products.len()
    }

    /// Inserts a product without any brand check, producing an orphan when
    /// `brand_id` is unknown.
    pub fn insert_raw_product(&self, name: &str, brand_id: Uuid) -> Product {
        let mut tables = self.tables.lock().unwrap();
        let now = tables.now();
        let product = Product {
            id: Uuid::new_v4(),
            product_name: name.to_string(),
            price: 1.0,
            qty: 1.0,
            brand_id,
            created_at: now,
            updated_at: now,
            brand_name: None,
        };
        tables.products.push(product.clone());
        product
    }
}

impl BrandGateway for MemoryStore {
    fn create(&self, ctx: &RequestContext, brand_name: &str) -> Result<Brand, CatalogError> {
        self.record(ctx, "brand.create")?;
        let mut tables = self.tables.lock().unwrap();
        let now = tables.now();
        let brand = Brand {
            id: Uuid::new_v4(),
            brand_name: brand_name.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.brands.push(brand.clone());
        Ok(brand)
    }

    fn get_by_id(&self, ctx: &RequestContext, id: Uuid) -> Result<Option<Brand>, CatalogError> {
        self.record(ctx, "brand.get_by_id")?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.brands.iter().find(|b| b.id == id).cloned())
    }

    fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), CatalogError> {
        self.record(ctx, "brand.delete")?;
        let mut tables = self.tables.lock().unwrap();
        if tables.products.iter().any(|p| p.brand_id == id) {
            return Err(CatalogError::brand_in_use());
        }
        let before = tables.brands.len();
        tables.brands.retain(|b| b.id != id);
        if tables.brands.len() == before {
            return Err(CatalogError::brand_not_found(id));
        }
        Ok(())
    }

    fn list(&self, ctx: &RequestContext) -> Result<Vec<Brand>, CatalogError> {
        self.record(ctx, "brand.list")?;
        let mut brands = self.tables.lock().unwrap().brands.clone();
        brands.sort_by(|a, b| a.brand_name.cmp(&b.brand_name));
        Ok(brands)
    }

    fn is_referenced_by_products(&self, ctx: &RequestContext, id: Uuid) -> Result<bool, CatalogError> {
        self.record(ctx, "brand.is_referenced")?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.products.iter().any(|p| p.brand_id == id))
    }
}

impl ProductGateway for MemoryStore {
    fn create(&self, ctx: &RequestContext, req: &CreateProductRequest) -> Result<Product, CatalogError> {
        self.record(ctx, "product.create")?;
        let mut tables = self.tables.lock().unwrap();
        let now = tables.now();
        let product = Product {
            id: Uuid::new_v4(),
            product_name: req.product_name.clone(),
            price: req.price,
            qty: req.qty,
            brand_id: req.brand_id,
            created_at: now,
            updated_at: now,
            brand_name: None,
        };
        tables.products.push(product.clone());
        Ok(tables.resolved(&product))
    }

    fn get_by_id(&self, ctx: &RequestContext, id: Uuid) -> Result<Option<Product>, CatalogError> {
        self.record(ctx, "product.get_by_id")?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.products.iter().find(|p| p.id == id).map(|p| tables.resolved(p)))
    }

    fn update(&self, ctx: &RequestContext, id: Uuid, patch: &ProductPatch) -> Result<Product, CatalogError> {
        self.record(ctx, "product.update")?;
        let mut tables = self.tables.lock().unwrap();
        let now = tables.now();
        let index = tables
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CatalogError::product_not_found(id))?;
        if !patch.is_empty() {
            let product = &mut tables.products[index];
            patch.apply_to(product);
            product.updated_at = now;
        }
        let product = tables.products[index].clone();
        Ok(tables.resolved(&product))
    }

    fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), CatalogError> {
        self.record(ctx, "product.delete")?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.products.len();
        tables.products.retain(|p| p.id != id);
        if tables.products.len() == before {
            return Err(CatalogError::product_not_found(id));
        }
        Ok(())
    }

    fn list(&self, ctx: &RequestContext, limit: i64, offset: i64) -> Result<(Vec<Product>, i64), CatalogError> {
        self.record(ctx, "product.list")?;
        let tables = self.tables.lock().unwrap();
        let mut products: Vec<Product> = tables.products.iter().map(|p| tables.resolved(p)).collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let page = products
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok((page, tables.products.len() as i64))
    }
}

pub fn app_state(store: &Arc<MemoryStore>, semantics: PatchSemantics) -> web::Data<AppState> {
    web::Data::new(AppState::new(store.clone(), store.clone(), semantics))
}

/// Gateway whose every call panics, standing in for a storage bug.
pub struct PanickingStore;

impl BrandGateway for PanickingStore {
    fn create(&self, _: &RequestContext, _: &str) -> Result<Brand, CatalogError> {
        panic!("brand.create exploded")
    }

    fn get_by_id(&self, _: &RequestContext, _: Uuid) -> Result<Option<Brand>, CatalogError> {
        panic!("brand.get_by_id exploded")
    }

    fn delete(&self, _: &RequestContext, _: Uuid) -> Result<(), CatalogError> {
        panic!("brand.delete exploded")
    }

    fn list(&self, _: &RequestContext) -> Result<Vec<Brand>, CatalogError> {
        panic!("brand.list exploded")
    }

    fn is_referenced_by_products(&self, _: &RequestContext, _: Uuid) -> Result<bool, CatalogError> {
        panic!("brand.is_referenced exploded")
    }
}

impl ProductGateway for PanickingStore {
    fn create(&self, _: &RequestContext, _: &CreateProductRequest) -> Result<Product, CatalogError> {
        panic!("product.create exploded")
    }

    fn get_by_id(&self, _: &RequestContext, _: Uuid) -> Result<Option<Product>, CatalogError> {
        panic!("product.get_by_id exploded")
    }

    fn update(&self, _: &RequestContext, _: Uuid, _: &ProductPatch) -> Result<Product, CatalogError> {
        panic!("product.update exploded")
    }

    fn delete(&self, _: &RequestContext, _: Uuid) -> Result<(), CatalogError> {
        panic!("product.delete exploded")
    }

    fn list(&self, _: &RequestContext, _: i64, _: i64) -> Result<(Vec<Product>, i64), CatalogError> {
        panic!("product.list exploded")
    }
}

pub fn panicking_state() -> web::Data<AppState> {
    let store = Arc::new(PanickingStore);
    web::Data::new(AppState::new(store.clone(), store, PatchSemantics::Explicit))
}
