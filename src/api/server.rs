use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter, prelude::*};
use opentelemetry::KeyValue;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::{trace::{SdkTracerProvider, Sampler}, Resource};
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use tracing_opentelemetry::OpenTelemetryLayer;

use crate::api::error::{ApiError, ApiResult};
use crate::api::handlers::{
    create_entry_handler, emission_factors_handler, estimate_handler, get_profile_handler,
    leaderboard_handler, list_achievements_handler, list_entries_handler, login_handler,
    register_handler, summary_handler, update_profile_handler,
};
use crate::api::state::AppState;
use crate::config::{Config, StoreBackend};
use crate::db::{create_pool, run_migrations, MemoryStore, PgStore, Store};

const SERVICE_NAME: &str = "ecostep";
const DEFAULT_OTEL_ENDPOINT: &str = "http://localhost:4318/v1/traces";

pub fn init_tracing() {
    let enable_otel = env::var("OTEL_ENABLED").map(|v| v == "true").unwrap_or(false);

    let otel_endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .unwrap_or_else(|_| DEFAULT_OTEL_ENDPOINT.to_string());

    // Span close events would duplicate what the OTEL layer exports
    let fmt_layer = if enable_otel {
        fmt::layer().json().with_target(false)
    } else {
        fmt::layer()
            .json()
            .with_target(false)
            .with_span_events(fmt::format::FmtSpan::CLOSE)
    };

    let subscriber = tracing_subscriber::registry()
        .with(fmt_layer)
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,hyper=warn,tower=warn")),
        );

    if !enable_otel {
        subscriber.init();
        return;
    }

    match init_opentelemetry(&otel_endpoint) {
        Ok(provider) => {
            opentelemetry::global::set_tracer_provider(provider.clone());
            let tracer = provider.tracer(SERVICE_NAME);

            subscriber.with(OpenTelemetryLayer::new(tracer)).init();

            info!("OpenTelemetry enabled: {}", otel_endpoint);
        }
        Err(e) => {
            subscriber.init();
            tracing::error!("Failed to initialize OpenTelemetry: {}. Continuing with logs only.", e);
        }
    }
}

fn init_opentelemetry(endpoint: &str) -> Result<SdkTracerProvider, Box<dyn std::error::Error>> {
    let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

    let service_name = env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| SERVICE_NAME.to_string());

    let sampling_rate = env::var("OTEL_TRACE_SAMPLING_RATE")
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(1.0)
        .clamp(0.0, 1.0);

    let resource = Resource::builder()
        .with_attribute(KeyValue::new("service.name", service_name))
        .with_attribute(KeyValue::new("service.version", env!("CARGO_PKG_VERSION")))
        .with_attribute(KeyValue::new("deployment.environment", environment))
        .build();

    let exporter = SpanExporter::builder()
        .with_http()
        .with_endpoint(endpoint)
        .build()?;

    let provider = SdkTracerProvider::builder()
        .with_resource(resource)
        .with_sampler(Sampler::TraceIdRatioBased(sampling_rate))
        .with_batch_exporter(exporter)
        .build();

    info!("OpenTelemetry sampling rate: {}%", sampling_rate * 100.0);

    Ok(provider)
}

/// Connect the configured store and wrap it in handler state
pub async fn build_state(config: &Config) -> Result<AppState, Box<dyn std::error::Error>> {
    let store: Arc<dyn Store> = match config.store_backend {
        StoreBackend::Memory => {
            info!("Using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or("DATABASE_URL must be set for the postgres backend")?;

            let pool = create_pool(database_url, config.database_max_connections).await?;
            run_migrations(&pool).await?;
            Arc::new(PgStore::new(pool))
        }
    };

    Ok(AppState::new(store, config)?)
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route(
            "/api/users/me",
            get(get_profile_handler).patch(update_profile_handler),
        )
        .route(
            "/api/carbon",
            post(create_entry_handler).get(list_entries_handler),
        )
        .route("/api/carbon/estimate", post(estimate_handler))
        .route("/api/carbon/factors", get(emission_factors_handler))
        .route("/api/carbon/summary", get(summary_handler))
        .route("/api/leaderboard", get(leaderboard_handler))
        .route("/api/achievements", get(list_achievements_handler))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn health_check(State(state): State<AppState>) -> ApiResult<&'static str> {
    state
        .store
        .health_check()
        .await
        .map_err(|e| ApiError::storage("Store unavailable", e))?;

    Ok("OK")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down gracefully...");
}

pub async fn run_server() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    init_tracing();

    info!("Starting EcoStep server");

    let config = Config::from_env()?;
    let state = build_state(&config).await?;
    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
