use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::{Logger, NormalizePath};
use actix_web::{web, App, HttpServer};
use log::info;

use catalog_api::db::{build_pool, run_migrations, Database, PgBrandGateway, PgProductGateway};
use catalog_api::handlers::{self, AppState};
use catalog_api::settings::Settings;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load().map_err(io::Error::other)?;

    let pool = build_pool(&settings.database).map_err(io::Error::other)?;
    if settings.database.run_migrations {
        let applied = run_migrations(&pool).map_err(io::Error::other)?;
        info!("applied {applied} pending migrations");
    }

    let db = Database::new(pool);
    let app_state = web::Data::new(AppState::new(
        Arc::new(PgBrandGateway::new(db.clone())),
        Arc::new(PgProductGateway::new(db)),
        settings.patch_semantics(),
    ));
    info!("update requests use {:?} patch semantics", app_state.patch_semantics);

    let (host, port) = settings.server.bind_address();
    info!("Server starting on {host}:{port}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![
                header::ORIGIN,
                header::CONTENT_TYPE,
                header::ACCEPT,
                header::AUTHORIZATION,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .app_data(app_state.clone())
            .configure(handlers::configure)
    })
    .client_request_timeout(settings.server.read_timeout())
    .client_disconnect_timeout(settings.server.write_timeout())
    .bind((host, port))?
    .run()
    .await
}
