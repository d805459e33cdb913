use chrono::Utc;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

use crate::context::RequestContext;
use crate::db::connection::Database;
use crate::db::models::*;
use crate::db::schema::*;
use crate::error::CatalogError;
use crate::models::CreateProductRequest;

/// Storage contract for brands.
pub trait BrandGateway: Send + Sync {
    fn create(&self, ctx: &RequestContext, brand_name: &str) -> Result<Brand, CatalogError>;

    /// `Ok(None)` when no brand has this id.
    fn get_by_id(&self, ctx: &RequestContext, id: Uuid) -> Result<Option<Brand>, CatalogError>;

    fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), CatalogError>;

    /// All brands ordered by name.
    fn list(&self, ctx: &RequestContext) -> Result<Vec<Brand>, CatalogError>;

    fn is_referenced_by_products(&self, ctx: &RequestContext, id: Uuid) -> Result<bool, CatalogError>;
}

/// Storage contract for products. Brand existence is the caller's concern;
/// implementations enforce column-level constraints only.
pub trait ProductGateway: Send + Sync {
    fn create(&self, ctx: &RequestContext, req: &CreateProductRequest) -> Result<Product, CatalogError>;

    /// `Ok(None)` when no product has this id. An orphaned brand reference
    /// yields a product without `brand_name`.
    fn get_by_id(&self, ctx: &RequestContext, id: Uuid) -> Result<Option<Product>, CatalogError>;

    /// Applies the fields present in `patch`. An empty patch returns the
    /// current record untouched.
    fn update(&self, ctx: &RequestContext, id: Uuid, patch: &ProductPatch) -> Result<Product, CatalogError>;

    fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), CatalogError>;

    /// One page ordered newest first, plus the count of all products.
    fn list(&self, ctx: &RequestContext, limit: i64, offset: i64) -> Result<(Vec<Product>, i64), CatalogError>;
}

fn is_foreign_key_violation(err: &DieselError) -> bool {
    matches!(err, DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _))
}

/// A product write rejected by the `brand_id` foreign key means the brand
/// disappeared after the service resolved it.
fn product_write_error(err: DieselError, brand_id: Option<Uuid>) -> CatalogError {
    match brand_id {
        Some(brand_id) if is_foreign_key_violation(&err) => CatalogError::InvalidReference(brand_id),
        _ => CatalogError::Storage(err),
    }
}

fn brand_delete_error(err: DieselError) -> CatalogError {
    if is_foreign_key_violation(&err) {
        CatalogError::brand_in_use()
    } else {
        CatalogError::Storage(err)
    }
}

pub struct PgBrandGateway {
    db: Database,
}

impl PgBrandGateway {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl BrandGateway for PgBrandGateway {
    fn create(&self, ctx: &RequestContext, brand_name: &str) -> Result<Brand, CatalogError> {
        let conn = &mut self.db.conn(ctx)?;
        let now = Utc::now().naive_utc();
        let brand = diesel::insert_into(brands::table)
            .values(&NewBrand {
                id: Uuid::new_v4(),
                brand_name,
                created_at: now,
                updated_at: now,
            })
            .returning(Brand::as_returning())
            .get_result(conn)?;
        Ok(brand)
    }

    fn get_by_id(&self, ctx: &RequestContext, id: Uuid) -> Result<Option<Brand>, CatalogError> {
        let conn = &mut self.db.conn(ctx)?;
        let brand = brands::table
            .find(id)
            .select(Brand::as_select())
            .first(conn)
            .optional()?;
        Ok(brand)
    }

    fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), CatalogError> {
        let conn = &mut self.db.conn(ctx)?;
        let deleted = diesel::delete(brands::table.find(id))
            .execute(conn)
            .map_err(brand_delete_error)?;
        if deleted == 0 {
            return Err(CatalogError::brand_not_found(id));
        }
        Ok(())
    }

    fn list(&self, ctx: &RequestContext) -> Result<Vec<Brand>, CatalogError> {
        let conn = &mut self.db.conn(ctx)?;
        let brands = brands::table
            .order(brands::brand_name.asc())
            .select(Brand::as_select())
            .load(conn)?;
        Ok(brands)
    }

    fn is_referenced_by_products(&self, ctx: &RequestContext, id: Uuid) -> Result<bool, CatalogError> {
        let conn = &mut self.db.conn(ctx)?;
        let used = diesel::select(exists(products::table.filter(products::brand_id.eq(id))))
            .get_result(conn)?;
        Ok(used)
    }
}

pub struct PgProductGateway {
    db: Database,
}

impl PgProductGateway {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

/// Loads a product with its brand name through a left join.
fn load_product(conn: &mut PgConnection, id: Uuid) -> QueryResult<Option<Product>> {
    products::table
        .left_join(brands::table)
        .filter(products::id.eq(id))
        .select((ProductRow::as_select(), brands::brand_name.nullable()))
        .first::<(ProductRow, Option<String>)>(conn)
        .optional()
        .map(|found| found.map(Product::from))
}

impl ProductGateway for PgProductGateway {
    fn create(&self, ctx: &RequestContext, req: &CreateProductRequest) -> Result<Product, CatalogError> {
        let conn = &mut self.db.conn(ctx)?;
        let now = Utc::now().naive_utc();
        let row = diesel::insert_into(products::table)
            .values(&NewProduct {
                id: Uuid::new_v4(),
                product_name: &req.product_name,
                price: req.price,
                qty: req.qty,
                brand_id: req.brand_id,
                created_at: now,
                updated_at: now,
            })
            .returning(ProductRow::as_returning())
            .get_result(conn)
            .map_err(|err| product_write_error(err, Some(req.brand_id)))?;

        let brand_name = brands::table
            .find(row.brand_id)
            .select(brands::brand_name)
            .first::<String>(conn)
            .optional()?;
        Ok(Product::from((row, brand_name)))
    }

    fn get_by_id(&self, ctx: &RequestContext, id: Uuid) -> Result<Option<Product>, CatalogError> {
        let conn = &mut self.db.conn(ctx)?;
        Ok(load_product(conn, id)?)
    }

    fn update(&self, ctx: &RequestContext, id: Uuid, patch: &ProductPatch) -> Result<Product, CatalogError> {
        let conn = &mut self.db.conn(ctx)?;
        let current = load_product(conn, id)?.ok_or_else(|| CatalogError::product_not_found(id))?;
        if patch.is_empty() {
            return Ok(current);
        }

        let updated = diesel::update(products::table.find(id))
            .set((patch, products::updated_at.eq(Utc::now().naive_utc())))
            .execute(conn)
            .map_err(|err| product_write_error(err, patch.brand_id))?;
        if updated == 0 {
            return Err(CatalogError::product_not_found(id));
        }

        load_product(conn, id)?.ok_or_else(|| CatalogError::product_not_found(id))
    }

    fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), CatalogError> {
        let conn = &mut self.db.conn(ctx)?;
        let deleted = diesel::delete(products::table.find(id)).execute(conn)?;
        if deleted == 0 {
            return Err(CatalogError::product_not_found(id));
        }
        Ok(())
    }

    fn list(&self, ctx: &RequestContext, limit: i64, offset: i64) -> Result<(Vec<Product>, i64), CatalogError> {
        let conn = &mut self.db.conn(ctx)?;
        let total: i64 = products::table.count().get_result(conn)?;
        let products = products::table
            .left_join(brands::table)
            .select((ProductRow::as_select(), brands::brand_name.nullable()))
            .order((products::created_at.desc(), products::id.desc()))
            .limit(limit)
            .offset(offset)
            .load::<(ProductRow, Option<String>)>(conn)?
            .into_iter()
            .map(Product::from)
            .collect();
        Ok((products, total))
    }
}
