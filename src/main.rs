use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tributo::config::Config;
use tributo::core::clock::{SystemClock, UuidGenerator};
use tributo::middleware::RequestId;
use tributo::modules::health::controllers::health_controller;
use tributo::modules::historico::controllers::history_controller;
use tributo::modules::historico::repositories::InMemoryHistoryRepository;
use tributo::modules::historico::services::HistoryService;
use tributo::modules::simples::controllers::simulation_controller;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tributo=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting Tributo tax-simulation backend");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // History lives in process memory behind the repository interface;
    // clock and id generation are injected so the service itself stays
    // deterministic under test.
    let history_service = web::Data::new(HistoryService::new(
        Arc::new(InMemoryHistoryRepository::new()),
        Arc::new(SystemClock),
        Arc::new(UuidGenerator),
    ));

    let bind_address = config.server.bind_address();
    let workers = config.server.workers;
    let app_config = config.clone();

    let server = HttpServer::new(move || {
        let cors = if app_config.app.is_development() {
            Cors::permissive()
        } else {
            app_config
                .cors
                .allowed_origins
                .iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
                .allowed_methods(vec!["GET", "POST", "DELETE"])
                .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
                .max_age(3600)
        };

        App::new()
            .app_data(history_service.clone())
            .wrap(TracingLogger::default())
            .wrap(RequestId)
            .wrap(cors)
            .configure(health_controller::configure)
            .configure(simulation_controller::configure)
            .configure(history_controller::configure)
    })
    .bind(&bind_address)?;

    let server = match workers {
        Some(workers) => server.workers(workers),
        None => server,
    };

    let server = server.run();
    tracing::info!("Server started at http://{}", bind_address);

    server.await?;

    Ok(())
}
