//! Pricing server for zone-based delivery.
//!
//! Exposes the delivery handler over HTTP: price calculation, eligibility
//! checks and raw zone lookups against the configured map.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use zonefare::models::{Period, ZoneAnnotation};
use zonefare::{
    CalculationResult, Coordinate, DeliveryHandler, DirectoryCatalog, HandlerConfig,
    OrderProperties, ZoneError,
};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "serve")]
#[command(about = "Zone-based delivery pricing server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,

    /// Handler config file (TOML with a [handler] table)
    #[arg(short, long)]
    config: PathBuf,

    /// Directory holding <map_id>.json zone datasets
    #[arg(long, default_value = "maps")]
    catalog_dir: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: Level,
}

type Handler = DeliveryHandler<DirectoryCatalog>;

/// Application state shared across handlers
struct AppState {
    handler: Handler,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Zonefare Pricing Server");
    info!("Config: {}", args.config.display());

    let config = HandlerConfig::load_from_file(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;

    match config.map_id() {
        Ok(map_id) => info!("Serving map {} from {}", map_id, args.catalog_dir.display()),
        Err(e) => tracing::warn!("Handler is not configured: {}", e),
    }

    let state = Arc::new(AppState {
        handler: DeliveryHandler::new(config, DirectoryCatalog::new(&args.catalog_dir))
            .with_zone_cache(),
    });

    let app = router(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build router
fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/price", post(price_handler))
        .route("/v1/compatible", post(compatible_handler))
        .route("/v1/zone", get(zone_handler))
        .route("/v1/reload", post(reload_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Deserialize)]
struct OrderRequest {
    /// Order property values keyed by property code
    properties: Map<String, Value>,
}

/// Price calculation. Failures are part of the result body.
async fn price_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OrderRequest>,
) -> Result<Json<CalculationResult>, (StatusCode, String)> {
    let properties = OrderProperties::from(request.properties);

    let result = tokio::task::spawn_blocking(move || state.handler.calculate(&properties))
        .await
        .map_err(|e| {
            tracing::error!("Price calculation task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    Ok(Json(result))
}

#[derive(Serialize)]
struct CompatibleResponse {
    compatible: bool,
}

/// Eligibility check
async fn compatible_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OrderRequest>,
) -> Json<CompatibleResponse> {
    let properties = OrderProperties::from(request.properties);
    Json(CompatibleResponse {
        compatible: state.handler.is_compatible(&properties),
    })
}

#[derive(Deserialize)]
struct ZoneQueryParams {
    lat: f64,
    lon: f64,
}

#[derive(Serialize)]
struct ZoneResponse {
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    period: Option<Period>,
}

/// Matched zone for a point, without price resolution
async fn zone_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ZoneQueryParams>,
) -> Result<Json<ZoneResponse>, (StatusCode, String)> {
    let point = Coordinate::new(params.lat, params.lon);

    let zone = tokio::task::spawn_blocking(move || state.handler.match_zone(&point))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| (status_for(&e), e.to_string()))?;

    let ZoneAnnotation { price, period } = zone.annotation;

    Ok(Json(ZoneResponse {
        title: zone.title,
        price,
        period,
    }))
}

/// Forget cached maps after the catalog changed
async fn reload_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    state.handler.clear_cache();
    StatusCode::NO_CONTENT
}

fn status_for(err: &ZoneError) -> StatusCode {
    match err {
        ZoneError::NotFound(_) | ZoneError::NoMatchingZone => StatusCode::NOT_FOUND,
        ZoneError::InvalidCoordinate(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
