use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::context::RequestContext;
use crate::error::CatalogError;
use crate::settings::DatabaseSettings;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;
pub type PgPooledConnection = PooledConnection<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub fn build_pool(settings: &DatabaseSettings) -> Result<PgPool, r2d2::Error> {
    let manager = ConnectionManager::<PgConnection>::new(settings.url());
    Pool::builder()
        .max_size(settings.pool_size)
        .connection_timeout(settings.connection_timeout())
        .build(manager)
}

pub fn run_migrations(pool: &PgPool) -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    Ok(applied.len())
}

/// Owned handle to the pool shared by both gateways.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Checks out a connection for one request. The context is checked on both
    /// sides of the pool wait so an abandoned request never reaches the query.
    pub fn conn(&self, ctx: &RequestContext) -> Result<PgPooledConnection, CatalogError> {
        ctx.ensure_active()?;
        let conn = self.pool.get()?;
        ctx.ensure_active()?;
        Ok(conn)
    }
}
