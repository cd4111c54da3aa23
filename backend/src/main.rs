mod config;
mod routes;
mod storage;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use config::Config;
use routes::configure_routes;
use std::env;
use storage::UploadStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let config = Config::from_env();
    let store = UploadStore::new(config.upload_dir.clone(), config.max_upload_bytes);
    if let Err(e) = store.ensure_dir().await {
        log::error!(
            "Failed to create upload directory {}: {}",
            store.dir().display(),
            e
        );
        return Err(e);
    }

    log::info!("Storing uploads in {}", store.dir().display());
    log::info!("Serving frontend from {}", config.frontend_dir);

    let bind_address = config.bind_address();
    log::info!("Starting server on {}", bind_address);

    let frontend_dir = config.frontend_dir.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(web::Data::new(store.clone()))
            .configure(|cfg| configure_routes(cfg, &store, frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
