use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::schema::{brands, products};

#[derive(Queryable, Selectable, Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[diesel(table_name = brands)]
pub struct Brand {
    pub id: Uuid,
    pub brand_name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = brands)]
pub struct NewBrand<'a> {
    pub id: Uuid,
    pub brand_name: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A product row exactly as stored, without the joined brand name.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = products)]
pub struct ProductRow {
    pub id: Uuid,
    pub product_name: String,
    pub price: f64,
    pub qty: f64,
    pub brand_id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = products)]
pub struct NewProduct<'a> {
    pub id: Uuid,
    pub product_name: &'a str,
    pub price: f64,
    pub qty: f64,
    pub brand_id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Product as returned to callers; `brand_name` is resolved at read time and
/// stays empty when the referenced brand is gone.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub product_name: String,
    pub price: f64,
    pub qty: f64,
    pub brand_id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
}

impl From<(ProductRow, Option<String>)> for Product {
    fn from((row, brand_name): (ProductRow, Option<String>)) -> Self {
        Product {
            id: row.id,
            product_name: row.product_name,
            price: row.price,
            qty: row.qty,
            brand_id: row.brand_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            brand_name,
        }
    }
}

/// Fields of a partial product update. `None` leaves the column untouched.
#[derive(AsChangeset, Debug, Clone, Default, PartialEq)]
#[diesel(table_name = products)]
pub struct ProductPatch {
    pub product_name: Option<String>,
    pub price: Option<f64>,
    pub qty: Option<f64>,
    pub brand_id: Option<Uuid>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.product_name.is_none()
            && self.price.is_none()
            && self.qty.is_none()
            && self.brand_id.is_none()
    }

    /// Applies the supplied fields to an in-memory product.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.product_name {
            product.product_name = name.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(qty) = self.qty {
            product.qty = qty;
        }
        if let Some(brand_id) = self.brand_id {
            product.brand_id = brand_id;
        }
    }
}
