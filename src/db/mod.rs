pub mod models;
pub mod schema;
pub mod repository;
pub mod connection;

pub use models::*;
pub use repository::*;
pub use connection::*;
