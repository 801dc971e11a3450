//! HTTP front for the default database connection parameters.

pub mod config;
pub mod error;

use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::{Json, Router};
use common_config::load;
use common_dbconn::{
    default_connection_params, defaults_for, supported_databases, ConnectionOverrides,
    ConnectionParams, ConnectionSpec, DbEngine,
};
use common_obs::{
    build_info, health_router, metrics_router, request_context, BuildInfo, ObsInit, ObsInitError,
};
use config::DbCatalogConfig;
use error::ApiError;
use serde::Serialize;
use tokio::net::TcpListener;

pub const SERVICE_NAME: &str = "db-catalog";

const BUILD: BuildInfo = build_info!();

#[derive(Debug, Serialize)]
pub struct DatabaseEntry {
    pub engine: DbEngine,
    pub name: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DatabasesResponse {
    pub databases: Vec<DatabaseEntry>,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub engine: DbEngine,
    pub params: ConnectionParams,
    pub url: String,
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    ObsInit::init(SERVICE_NAME, BUILD)?;

    let config = load::<DbCatalogConfig>()?;
    let addr = config.listen.socket_addr()?;
    tracing::info!(
        event = "service_start",
        service = SERVICE_NAME,
        version = BUILD.version,
        build_sha = BUILD.build_sha,
        build_time = BUILD.build_time,
        listen_addr = %addr,
        engines = default_connection_params().len(),
        "starting service",
    );

    serve(addr).await?;

    tracing::info!(event = "service_stop", service = SERVICE_NAME);
    Ok(())
}

pub async fn serve(addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, build_router().into_make_service()).await
}

pub fn build_router() -> Router {
    Router::new()
        .route("/v1/databases", get(list_databases))
        .route("/v1/databases/defaults", get(all_defaults))
        .route("/v1/databases/:engine/defaults", get(engine_defaults))
        .route("/v1/databases/:engine/resolve", post(resolve))
        .merge(health_router(SERVICE_NAME, BUILD))
        .merge(metrics_router())
        .layer(from_fn(request_context))
}

pub fn init_for_tests() -> Result<(), ObsInitError> {
    ObsInit::init(SERVICE_NAME, BUILD)
}

async fn list_databases() -> Json<DatabasesResponse> {
    Json(DatabasesResponse {
        databases: supported_databases()
            .map(|(engine, name)| DatabaseEntry { engine, name })
            .collect(),
    })
}

async fn all_defaults() -> Json<&'static BTreeMap<DbEngine, ConnectionParams>> {
    Json(default_connection_params())
}

async fn engine_defaults(
    Path(engine): Path<String>,
) -> Result<Json<&'static ConnectionParams>, ApiError> {
    let engine: DbEngine = engine.parse()?;
    Ok(Json(defaults_for(engine)))
}

async fn resolve(
    Path(engine): Path<String>,
    payload: Result<Json<ConnectionOverrides>, JsonRejection>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let engine: DbEngine = engine.parse()?;
    let Json(overrides) = payload?;

    let spec = ConnectionSpec::resolve(engine, overrides).inspect_err(|error| {
        tracing::info!(%engine, %error, "rejected connection overrides");
    })?;
    let url = spec.redacted_url()?;
    tracing::info!(%engine, url = url.as_str(), "resolved connection parameters");

    Ok(Json(ResolveResponse {
        engine,
        params: spec.params().redacted(),
        url,
    }))
}
