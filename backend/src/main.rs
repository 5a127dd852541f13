mod config;
mod model;
mod routes;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use config::AppConfig;
use routes::configure_routes;
use std::env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let config = AppConfig::load().map_err(|e| {
        log::error!("Failed to load configuration: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    if let Err(e) = model::preflight(&config) {
        log::error!("Model preflight failed: {}", e);
        return Err(std::io::Error::other(format!("Model preflight failed: {}", e)));
    }

    let bind_address = config.bind_address();
    let settings = config.server.clone();

    log::info!(
        "Serving {} at http://{}{}",
        settings.dist_dir.display(),
        bind_address,
        settings.base_path
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(settings.clone()))
            .configure(|cfg| configure_routes(cfg, &settings))
    })
    .bind(&bind_address)?
    .run()
    .await
}
