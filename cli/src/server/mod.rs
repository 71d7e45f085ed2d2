//! HTTP surface: a single `GET /power_usage` route.
//!
//! Every other path is redirected there with `302 Found`. The router holds
//! the device profile and telemetry source in an immutable [`AppState`]
//! resolved at startup; nothing is shared mutably between requests.

mod tls;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use pipower_platform::TelemetrySource;
use pipower_protocol::{ErrorResponse, POWER_USAGE_PATH};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::data::{aggregate, sample, AggregateError, DeviceProfile};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Tls(#[from] tls::TlsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

pub type Result<T> = std::result::Result<T, ServerError>;

/// Per-process state shared by every request.
pub struct AppState<S> {
    profile: &'static DeviceProfile,
    source: S,
}

impl<S: TelemetrySource> AppState<S> {
    pub fn new(profile: &'static DeviceProfile, source: S) -> Self {
        Self { profile, source }
    }
}

async fn handle_power_usage<S: TelemetrySource>(State(state): State<Arc<AppState<S>>>) -> Response {
    let started = Instant::now();
    let sample = sample(&state.source).await;

    match aggregate(state.profile, &sample) {
        Ok(body) => {
            debug!(
                watts = body.power_usage,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Served power usage"
            );
            Json(body).into_response()
        }
        Err(e) => {
            let status = match e {
                AggregateError::Estimate(_) => StatusCode::UNPROCESSABLE_ENTITY,
                AggregateError::UsageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            };
            warn!(error = %e, status = status.as_u16(), "Could not estimate power usage");
            (status, Json(ErrorResponse::new(e.to_string()))).into_response()
        }
    }
}

async fn handle_fallback(uri: Uri) -> Response {
    debug!(%uri, "Redirecting unknown route");
    (StatusCode::FOUND, [(header::LOCATION, POWER_USAGE_PATH)]).into_response()
}

/// Build the axum router.
pub fn build_router<S>(state: AppState<S>) -> Router
where
    S: TelemetrySource + 'static,
{
    Router::new()
        .route(POWER_USAGE_PATH, get(handle_power_usage::<S>))
        .fallback(handle_fallback)
        .with_state(Arc::new(state))
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn run_server<S>(config: &Config, state: AppState<S>) -> Result<()>
where
    S: TelemetrySource + 'static,
{
    let app = build_router(state);
    let addr = config.bind_addr();

    let acceptor = match config.tls_paths()? {
        Some((cert, key)) => Some(tls::load_acceptor(cert, key)?),
        None => None,
    };

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

    info!(
        addr = %addr,
        https = acceptor.is_some(),
        version = env!("CARGO_PKG_VERSION"),
        "Listening"
    );

    match acceptor {
        Some(acceptor) => tls::serve(listener, acceptor, app).await?,
        None => {
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?
        }
    }

    info!("Server shutting down");
    Ok(())
}

pub(crate) async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
