//! Shared observability: JSON logging, request context, metrics and health routes.

use std::io;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::{info_span, Instrument};
use tracing_subscriber::fmt::{self as tsfmt, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};
use uuid::Uuid;

mod metrics;

pub use metrics::{encode_prometheus, observe_http_request, service_name, PROMETHEUS_CONTENT_TYPE};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, thiserror::Error)]
pub enum ObsInitError {
    #[error("tracing subscriber already initialized")]
    AlreadyInitialized,
    #[error("failed to install tracing subscriber: {0}")]
    Install(#[from] tracing::subscriber::SetGlobalDefaultError),
    #[error("failed to register metrics: {0}")]
    Metrics(#[from] prometheus::Error),
}

/// Version and provenance of the running binary.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_sha: &'static str,
    pub build_time: &'static str,
}

/// Capture [`BuildInfo`] for the crate invoking the macro.
///
/// `BUILD_SHA` and `BUILD_TIME` are read at compile time and default to `unknown`.
#[macro_export]
macro_rules! build_info {
    () => {
        $crate::BuildInfo {
            version: env!("CARGO_PKG_VERSION"),
            build_sha: match option_env!("BUILD_SHA") {
                Some(value) => value,
                None => "unknown",
            },
            build_time: match option_env!("BUILD_TIME") {
                Some(value) => value,
                None => "unknown",
            },
        }
    };
}

/// Initialize observability for a service.
pub struct ObsInit;

impl ObsInit {
    /// Register the service metrics and install a global JSON tracing subscriber.
    pub fn init(service: &str, build: BuildInfo) -> Result<(), ObsInitError> {
        metrics::init(service, &build)?;
        let subscriber = Self::subscriber_with_writer(io::stderr);
        tracing::subscriber::set_global_default(subscriber).map_err(|err| {
            if tracing::dispatcher::has_been_set() {
                ObsInitError::AlreadyInitialized
            } else {
                ObsInitError::Install(err)
            }
        })
    }

    /// Build the JSON tracing subscriber over the provided writer.
    ///
    /// `RUST_LOG` wins over `LOG_LEVEL`; without either, debug builds log at
    /// `debug` and release builds at `info`.
    pub fn subscriber_with_writer<W>(writer: W) -> impl tracing::Subscriber + Send + Sync
    where
        W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
    {
        let env_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                "debug".to_string()
            } else {
                "info".to_string()
            }
        });
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(env_level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let fmt_layer = tsfmt::layer()
            .json()
            .with_ansi(false)
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(writer);

        Registry::default().with(env_filter).with(fmt_layer)
    }
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    service: &'static str,
}

#[derive(Debug, Serialize)]
struct InfoBody {
    service: &'static str,
    #[serde(flatten)]
    build: BuildInfo,
}

/// Health and info routes, mounted both bare and under `/v1`.
pub fn health_router(service: &'static str, build: BuildInfo) -> Router {
    let health = get(move || async move {
        Json(HealthBody {
            status: "ok",
            service,
        })
    });
    let info = get(move || async move { Json(InfoBody { service, build }) });

    Router::new()
        .route("/health", health.clone())
        .route("/v1/health", health)
        .route("/info", info.clone())
        .route("/v1/info", info)
}

/// `GET /metrics` in the Prometheus text exposition format.
pub fn metrics_router() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

async fn metrics_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static(PROMETHEUS_CONTENT_TYPE),
        )],
        encode_prometheus(),
    )
}

/// Request-scoped logging and metrics.
///
/// Reuses or mints an `x-request-id`, runs the request inside an `http.request`
/// span and echoes the id on the response.
pub async fn request_context(mut req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let request_id = match req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
    {
        Some(value) => value.to_string(),
        None => {
            let id = Uuid::new_v4().to_string();
            if let Ok(value) = HeaderValue::from_str(&id) {
                req.headers_mut().insert(REQUEST_ID_HEADER, value);
            }
            id
        }
    };

    let span = info_span!(
        "http.request",
        service = service_name().unwrap_or("unknown"),
        method = %method,
        path = %path,
        route = %route,
        request_id = %request_id,
    );

    let start = Instant::now();
    let mut response = async {
        tracing::info!(event = "request_start", user_agent = user_agent.as_str());
        next.run(req).await
    }
    .instrument(span.clone())
    .await;

    let status = response.status();
    let latency = start.elapsed().as_secs_f64();
    span.in_scope(|| {
        tracing::info!(
            event = "request_end",
            status = status.as_u16(),
            latency_ms = latency * 1000.0,
        );
    });
    observe_http_request(&route, status.as_str(), latency);

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
