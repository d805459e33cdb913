mod common;

use std::collections::HashSet;

use catalog_api::db::ProductPatch;
use catalog_api::models::CreateProductRequest;
use catalog_api::services::{BrandService, ProductService};
use catalog_api::{CatalogError, RequestContext};
use common::MemoryStore;
use uuid::Uuid;

fn services() -> (std::sync::Arc<MemoryStore>, BrandService, ProductService) {
    let store = MemoryStore::new();
    let brands = BrandService::new(store.clone());
    let products = ProductService::new(store.clone(), store.clone());
    (store, brands, products)
}

fn widget(brand_id: Uuid) -> CreateProductRequest {
    CreateProductRequest {
        product_name: "Widget".to_string(),
        price: 9.99,
        qty: 5.0,
        brand_id,
    }
}

#[test]
fn created_brands_get_fresh_ids() {
    let (_, brands, _) = services();
    let ctx = RequestContext::new();
    let ids: HashSet<Uuid> = (0..20)
        .map(|i| brands.create_brand(&ctx, &format!("Brand {i}")).unwrap().id)
        .collect();
    assert_eq!(ids.len(), 20);
}

#[test]
fn list_is_ordered_by_name() {
    let (_, brands, _) = services();
    let ctx = RequestContext::new();
    assert!(brands.list_brands(&ctx).unwrap().is_empty());
    for name in ["Zeta", "Acme", "Mango"] {
        brands.create_brand(&ctx, name).unwrap();
    }
    let names: Vec<String> = brands
        .list_brands(&ctx)
        .unwrap()
        .into_iter()
        .map(|b| b.brand_name)
        .collect();
    assert_eq!(names, ["Acme", "Mango", "Zeta"]);
}

#[test]
fn deleting_missing_brand_is_not_found_before_usage_check() {
    let (store, brands, _) = services();
    let ctx = RequestContext::new();
    let err = brands.delete_brand(&ctx, Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { entity: "brand", .. }));
    assert_eq!(store.calls(), ["brand.get_by_id"]);
}

#[test]
fn deleting_referenced_brand_is_refused() {
    let (store, brands, products) = services();
    let ctx = RequestContext::new();
    let acme = brands.create_brand(&ctx, "Acme").unwrap();
    products.create_product(&ctx, &widget(acme.id)).unwrap();

    for _ in 0..3 {
        let err = brands.delete_brand(&ctx, acme.id).unwrap_err();
        assert!(matches!(err, CatalogError::Conflict(_)));
    }
    assert!(!store.calls().contains(&"brand.delete"));
    assert_eq!(brands.list_brands(&ctx).unwrap().len(), 1);
}

#[test]
fn brand_moved_off_by_update_can_be_deleted() {
    let (_, brands, products) = services();
    let ctx = RequestContext::new();
    let acme = brands.create_brand(&ctx, "Acme").unwrap();
    let globex = brands.create_brand(&ctx, "Globex").unwrap();
    let product = products.create_product(&ctx, &widget(acme.id)).unwrap();

    let patch = ProductPatch { brand_id: Some(globex.id), ..Default::default() };
    products.update_product(&ctx, product.id, &patch).unwrap();

    brands.delete_brand(&ctx, acme.id).unwrap();
    assert!(matches!(
        brands.delete_brand(&ctx, globex.id),
        Err(CatalogError::Conflict(_))
    ));
}

#[test]
fn unreferenced_brand_is_deleted_and_leaves_listing() {
    let (_, brands, _) = services();
    let ctx = RequestContext::new();
    let acme = brands.create_brand(&ctx, "Acme").unwrap();
    brands.create_brand(&ctx, "Globex").unwrap();

    brands.delete_brand(&ctx, acme.id).unwrap();

    let remaining = brands.list_brands(&ctx).unwrap();
    assert!(remaining.iter().all(|b| b.id != acme.id));
    assert!(matches!(brands.get_brand(&ctx, acme.id), Err(CatalogError::NotFound { .. })));
}

#[test]
fn cancelled_context_stops_before_storage() {
    let (store, brands, _) = services();
    let ctx = RequestContext::new();
    ctx.cancel();
    assert!(matches!(brands.create_brand(&ctx, "Acme"), Err(CatalogError::Cancelled)));
    assert!(store.calls().is_empty());
}
