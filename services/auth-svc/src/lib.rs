//! Stub login service.
//!
//! `POST /login` answers every request with the same token. Nothing is
//! verified, signed or stored.

pub mod config;

use std::net::SocketAddr;

use axum::http::{header, HeaderMap};
use axum::middleware::from_fn;
use axum::routing::post;
use axum::{Json, Router};
use common_config::load;
use common_obs::{
    build_info, health_router, metrics_router, request_context, BuildInfo, ObsInit, ObsInitError,
};
use config::AuthSvcConfig;
use serde::Serialize;
use tokio::net::TcpListener;

pub const SERVICE_NAME: &str = "auth-svc";
pub const STUB_TOKEN: &str = "secure_jwt_token";

const BUILD: BuildInfo = build_info!();

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: &'static str,
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    ObsInit::init(SERVICE_NAME, BUILD)?;

    let config = load::<AuthSvcConfig>()?;
    let addr = config.listen.socket_addr()?;
    tracing::info!(
        event = "service_start",
        service = SERVICE_NAME,
        version = BUILD.version,
        build_sha = BUILD.build_sha,
        build_time = BUILD.build_time,
        listen_addr = %addr,
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
        .route("/login", post(login))
        .merge(health_router(SERVICE_NAME, BUILD))
        .merge(metrics_router())
        .layer(from_fn(request_context))
}

pub fn init_for_tests() -> Result<(), ObsInitError> {
    ObsInit::init(SERVICE_NAME, BUILD)
}

// No body extractor: every POST must get the token.
async fn login(headers: HeaderMap) -> Json<LoginResponse> {
    // Absent for chunked or unknown-length bodies.
    let content_length = content_length(&headers);
    tracing::info!(event = "login_stub", content_length, "issuing stub token");

    Json(LoginResponse { token: STUB_TOKEN })
}

fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}
