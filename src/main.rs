mod api;
mod config;
mod database;
mod middleware;
mod models;
mod seeds;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Settings;
use crate::services::RandomSource;

fn build_cors(settings: &Settings) -> Cors {
    let cors = if settings.allows_any_origin() {
        Cors::default().allow_any_origin()
    } else {
        settings
            .cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .allowed_header(middleware::ROLE_HEADER)
        .expose_headers(vec![header::CONTENT_TYPE])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = Settings::from_env().map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    log::info!("🚀 Starting Citizen's Eye service...");

    let store = database::connect(&settings)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    if settings.seed_data {
        if let Err(e) = seeds::demo_seed::seed(store.as_ref()).await {
            log::error!("❌ Demo seed failed: {}", e);
        }
    }

    let store_data = web::Data::from(store);
    let rng_data = web::Data::new(RandomSource::from_entropy());
    let settings_data = web::Data::new(settings.clone());

    log::info!("🌐 Server starting on {}:{}", settings.host, settings.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", settings.host, settings.port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", settings.host, settings.port);

    let cors_settings = settings.clone();
    HttpServer::new(move || {
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(store_data.clone())
            .app_data(rng_data.clone())
            .app_data(settings_data.clone())
            .wrap(build_cors(&cors_settings))
            .wrap(Logger::default())
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
            .configure(api::configure)
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await
}
