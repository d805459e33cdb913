//! Product and brand catalog service: consistency rules and pagination on top
//! of PostgreSQL, served over actix-web.

pub mod context;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod settings;

pub use context::RequestContext;
pub use error::CatalogError;
