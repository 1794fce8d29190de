// Wind Farm Dashboard API v0.1
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod errors;
mod helpers;
mod models;
mod routes;
mod services;

use config::AppConfig;
use routes::AppState;
use services::records::CsvRecordSource;
use services::weather::OpenWeatherClient;

/// Wind Farm Dashboard API, OpenAPI specification.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wind Farm Dashboard API",
        version = "0.1.0",
        description = "Live wind farm performance dashboard. Loads the wind farm \
            registry, fetches current wind speed per farm from OpenWeather, estimates \
            output with a standard turbine power curve and aggregates the results \
            per country and across the fleet.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Dashboard", description = "Wind farm performance dashboard"),
    ),
    paths(
        routes::health::health_check,
        routes::dashboard::get_dashboard,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::dashboard::DashboardResponse,
            services::presentation::DashboardPayload,
            services::presentation::FarmCard,
            services::presentation::CountryCard,
            services::presentation::FleetSummaryCard,
            services::presentation::StatusMetrics,
            services::presentation::PerformanceRating,
        )
    )
)]
struct ApiDoc;

/// Install the global subscriber. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wind_farm_dashboard=debug,tower_http=debug".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let weather = OpenWeatherClient::new(
        &config.openweather_url,
        &config.openweather_api_key,
        config.lookup_timeout,
    )
    .expect("Failed to build OpenWeather HTTP client");

    let data_file = std::path::PathBuf::from(&config.data_file);
    if !data_file.is_file() {
        tracing::warn!(
            "Wind farm registry {} not found; dashboards will be empty",
            data_file.display()
        );
    }

    let app_state = AppState {
        source: Arc::new(CsvRecordSource::new(&data_file)),
        weather,
        lookup_concurrency: config.lookup_concurrency,
        data_file,
    };

    // Read-only API
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET])
        .allow_headers(Any);

    let app = routes::router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
