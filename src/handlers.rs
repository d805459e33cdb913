use std::sync::Arc;

use actix_web::{error::InternalError, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::db::repository::{BrandGateway, ProductGateway};
use crate::error::CatalogError;
use crate::db::models::{Brand, Product};
use crate::models::{
    BrandListResponse, BrandResponse, CreateBrandRequest, CreateProductRequest, ErrorResponse,
    MessageResponse, PatchSemantics, ProductListResponse, ProductListing, ProductQuery,
    ProductResponse, UpdateProductRequest,
};
use crate::services::{BrandService, ProductService};

pub struct AppState {
    pub brands: Arc<BrandService>,
    pub products: Arc<ProductService>,
    pub patch_semantics: PatchSemantics,
}

impl AppState {
    pub fn new(
        brand_gateway: Arc<dyn BrandGateway>,
        product_gateway: Arc<dyn ProductGateway>,
        patch_semantics: PatchSemantics,
    ) -> Self {
        AppState {
            brands: Arc::new(BrandService::new(brand_gateway.clone())),
            products: Arc::new(ProductService::new(product_gateway, brand_gateway)),
            patch_semantics,
        }
    }
}

fn parse_id(raw: &str, entity: &str) -> Result<Uuid, CatalogError> {
    Uuid::parse_str(raw).map_err(|_| CatalogError::validation(format!("Invalid {entity} ID")))
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        log::debug!("rejected request body: {err}");
        let response = HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid request body".to_string(),
        });
        InternalError::from_response(err, response).into()
    })
}

/// OpenAPI document for the catalog routes.
#[derive(OpenApi)]
#[openapi(
    info(title = "E-commerce API", version = "1.0", description = "Brand and product catalog"),
    paths(
        health,
        create_brand,
        get_brands,
        get_brand,
        delete_brand,
        create_product,
        get_products,
        get_product,
        update_product,
        delete_product
    ),
    components(schemas(
        Brand,
        Product,
        CreateBrandRequest,
        CreateProductRequest,
        UpdateProductRequest,
        ProductListing,
        BrandResponse,
        BrandListResponse,
        ProductResponse,
        ProductListResponse,
        MessageResponse,
        ErrorResponse
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "brands", description = "Brand management"),
        (name = "products", description = "Product management")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up")))]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok", "service": "e-commerce-api" }))
}

#[utoipa::path(
    post,
    path = "/v1/brands",
    tag = "brands",
    request_body = CreateBrandRequest,
    responses(
        (status = 201, body = BrandResponse, description = "Brand created"),
        (status = 400, body = ErrorResponse, description = "Invalid request body"),
        (status = 500, body = ErrorResponse, description = "Internal server error")
    )
)]
async fn create_brand(
    data: web::Data<AppState>,
    ctx: RequestContext,
    req: web::Json<CreateBrandRequest>,
) -> Result<HttpResponse, CatalogError> {
    let req = req.into_inner();
    req.validate()?;
    let _guard = ctx.cancel_on_drop();
    let service = data.brands.clone();
    let brand = web::block(move || service.create_brand(&ctx, &req.brand_name)).await??;
    Ok(HttpResponse::Created().json(BrandResponse {
        message: "Brand created successfully".to_string(),
        data: brand,
    }))
}

#[utoipa::path(
    get,
    path = "/v1/brands",
    tag = "brands",
    responses(
        (status = 200, body = BrandListResponse, description = "All brands ordered by name"),
        (status = 500, body = ErrorResponse, description = "Internal server error")
    )
)]
async fn get_brands(data: web::Data<AppState>, ctx: RequestContext) -> Result<HttpResponse, CatalogError> {
    let _guard = ctx.cancel_on_drop();
    let service = data.brands.clone();
    let brands = web::block(move || service.list_brands(&ctx)).await??;
    Ok(HttpResponse::Ok().json(BrandListResponse {
        message: "Brands retrieved successfully".to_string(),
        data: brands,
    }))
}

#[utoipa::path(
    get,
    path = "/v1/brands/{id}",
    tag = "brands",
    params(("id" = Uuid, Path, description = "Brand id")),
    responses(
        (status = 200, body = BrandResponse, description = "Brand found"),
        (status = 400, body = ErrorResponse, description = "Malformed id"),
        (status = 404, body = ErrorResponse, description = "Brand not found")
    )
)]
async fn get_brand(
    data: web::Data<AppState>,
    ctx: RequestContext,
    id: web::Path<String>,
) -> Result<HttpResponse, CatalogError> {
    let id = parse_id(&id, "brand")?;
    let _guard = ctx.cancel_on_drop();
    let service = data.brands.clone();
    let brand = web::block(move || service.get_brand(&ctx, id)).await??;
    Ok(HttpResponse::Ok().json(BrandResponse {
        message: "Brand retrieved successfully".to_string(),
        data: brand,
    }))
}

#[utoipa::path(
    delete,
    path = "/v1/brands/{id}",
    tag = "brands",
    params(("id" = Uuid, Path, description = "Brand id")),
    responses(
        (status = 200, body = MessageResponse, description = "Brand deleted"),
        (status = 400, body = ErrorResponse, description = "Malformed id"),
        (status = 404, body = ErrorResponse, description = "Brand not found"),
        (status = 409, body = ErrorResponse, description = "Brand is used by products")
    )
)]
async fn delete_brand(
    data: web::Data<AppState>,
    ctx: RequestContext,
    id: web::Path<String>,
) -> Result<HttpResponse, CatalogError> {
    let id = parse_id(&id, "brand")?;
    let _guard = ctx.cancel_on_drop();
    let service = data.brands.clone();
    web::block(move || service.delete_brand(&ctx, id)).await??;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Brand deleted successfully".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/v1/products",
    tag = "products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, body = ProductResponse, description = "Product created"),
        (status = 400, body = ErrorResponse, description = "Invalid body or unknown brand"),
        (status = 500, body = ErrorResponse, description = "Internal server error")
    )
)]
async fn create_product(
    data: web::Data<AppState>,
    ctx: RequestContext,
    req: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, CatalogError> {
    let req = req.into_inner();
    req.validate()?;
    let _guard = ctx.cancel_on_drop();
    let service = data.products.clone();
    let product = web::block(move || service.create_product(&ctx, &req)).await??;
    Ok(HttpResponse::Created().json(ProductResponse {
        message: "Product created successfully".to_string(),
        data: product,
    }))
}

#[utoipa::path(
    get,
    path = "/v1/products",
    tag = "products",
    params(
        ("page" = Option<i64>, Query, description = "1-based page, defaults to 1"),
        ("limit" = Option<i64>, Query, description = "Page size in 1..=100, defaults to 10")
    ),
    responses(
        (status = 200, body = ProductListResponse, description = "One page, newest first"),
        (status = 500, body = ErrorResponse, description = "Internal server error")
    )
)]
async fn get_products(
    data: web::Data<AppState>,
    ctx: RequestContext,
    query: web::Query<Vec<(String, String)>>,
) -> Result<HttpResponse, CatalogError> {
    let query = ProductQuery::from_pairs(query.into_inner());
    let (page, limit) = (query.page(), query.limit());
    let _guard = ctx.cancel_on_drop();
    let service = data.products.clone();
    let listing = web::block(move || service.list_products(&ctx, page, limit)).await??;
    Ok(HttpResponse::Ok().json(ProductListResponse {
        message: "Products retrieved successfully".to_string(),
        data: listing,
    }))
}

#[utoipa::path(
    get,
    path = "/v1/products/{id}",
    tag = "products",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, body = ProductResponse, description = "Product found"),
        (status = 400, body = ErrorResponse, description = "Malformed id"),
        (status = 404, body = ErrorResponse, description = "Product not found")
    )
)]
async fn get_product(
    data: web::Data<AppState>,
    ctx: RequestContext,
    id: web::Path<String>,
) -> Result<HttpResponse, CatalogError> {
    let id = parse_id(&id, "product")?;
    let _guard = ctx.cancel_on_drop();
    let service = data.products.clone();
    let product = web::block(move || service.get_product(&ctx, id)).await??;
    Ok(HttpResponse::Ok().json(ProductResponse {
        message: "Product retrieved successfully".to_string(),
        data: product,
    }))
}

#[utoipa::path(
    put,
    path = "/v1/products/{id}",
    tag = "products",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, body = ProductResponse, description = "Product updated"),
        (status = 400, body = ErrorResponse, description = "Invalid body or unknown brand"),
        (status = 404, body = ErrorResponse, description = "Product not found")
    )
)]
async fn update_product(
    data: web::Data<AppState>,
    ctx: RequestContext,
    id: web::Path<String>,
    req: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, CatalogError> {
    let id = parse_id(&id, "product")?;
    let patch = req.into_inner().into_patch(data.patch_semantics)?;
    let _guard = ctx.cancel_on_drop();
    let service = data.products.clone();
    let product = web::block(move || service.update_product(&ctx, id, &patch)).await??;
    Ok(HttpResponse::Ok().json(ProductResponse {
        message: "Product updated successfully".to_string(),
        data: product,
    }))
}

#[utoipa::path(
    delete,
    path = "/v1/products/{id}",
    tag = "products",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, body = MessageResponse, description = "Product deleted"),
        (status = 400, body = ErrorResponse, description = "Malformed id"),
        (status = 404, body = ErrorResponse, description = "Product not found")
    )
)]
async fn delete_product(
    data: web::Data<AppState>,
    ctx: RequestContext,
    id: web::Path<String>,
) -> Result<HttpResponse, CatalogError> {
    let id = parse_id(&id, "product")?;
    let _guard = ctx.cancel_on_drop();
    let service = data.products.clone();
    web::block(move || service.delete_product(&ctx, id)).await??;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Product deleted successfully".to_string(),
    }))
}

/// Registers every route on an `App` or scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health))
        .route("/api-docs/openapi.json", web::get().to(openapi_json))
        .route("/v1/brands", web::post().to(create_brand))
        .route("/v1/brands", web::get().to(get_brands))
        .route("/v1/brands/{id}", web::get().to(get_brand))
        .route("/v1/brands/{id}", web::delete().to(delete_brand))
        .route("/v1/products", web::post().to(create_product))
        .route("/v1/products", web::get().to(get_products))
        .route("/v1/products/{id}", web::get().to(get_product))
        .route("/v1/products/{id}", web::put().to(update_product))
        .route("/v1/products/{id}", web::delete().to(delete_product));
}
