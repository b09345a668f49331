//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router composing all four route groups
//! - Wire up middleware (tracing)
//! - Serve until a termination signal arrives
//! - Drive the shutdown sequence: terminate the upload service, then exit

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, uri::InvalidUri, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::lifecycle::signals::shutdown_signal;
use crate::listing::scan_output_dir;
use crate::proxy::Forwarder;
use crate::uploader::UploadSupervisor;

/// How long the shutdown path waits for the upload service to exit before
/// giving up and letting the process end anyway.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Forwarder,
    pub config: Arc<GatewayConfig>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    supervisor: UploadSupervisor,
}

impl HttpServer {
    /// Create a new server from a validated configuration, taking ownership
    /// of the upload-service supervisor for the shutdown path.
    pub fn new(
        config: &GatewayConfig,
        supervisor: UploadSupervisor,
    ) -> Result<Self, InvalidUri> {
        let router = build_router(config)?;
        Ok(Self { router, supervisor })
    }

    /// Run the server until SIGINT or SIGTERM.
    ///
    /// On a signal: log, terminate the upload service, wait (bounded) for
    /// the child to be gone, return. In-flight connections are dropped
    /// rather than drained, so a slow client never delays exit, and the
    /// bounded wait never hangs on a child that is already gone.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        tokio::select! {
            result = axum::serve(listener, self.router).into_future() => {
                result?;
            }
            _ = shutdown_signal() => {
                tracing::info!("Shutting down");
                self.supervisor.terminate();
                // The parent must not exit while the child is still
                // running.
                if !self.supervisor.wait_for_exit(SHUTDOWN_GRACE).await {
                    tracing::warn!("Upload service did not exit within the grace period");
                }
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the gateway router.
///
/// Explicit routes take precedence over the static-UI fallback, giving the
/// reserved paths (`/output-images`, the upload prefix, the output prefix)
/// priority regardless of what the asset bundle contains.
pub fn build_router(config: &GatewayConfig) -> Result<Router, InvalidUri> {
    let authority = config.proxy.upload_origin.parse()?;
    let state = AppState {
        forwarder: Forwarder::new(authority),
        config: Arc::new(config.clone()),
    };

    // Generated output is overwritten in place by the pipeline, so every
    // response forbids client-side caching and revalidation reuse.
    let output_files = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::EXPIRES,
            HeaderValue::from_static("0"),
        ))
        .service(ServeDir::new(&config.content.output_dir));

    let prefix = config.proxy.path_prefix.trim_end_matches('/');
    Ok(Router::new()
        .route("/output-images", get(list_output_images))
        .route(prefix, any(forward_upload))
        .route(&format!("{prefix}/{{*rest}}"), any(forward_upload))
        .nest_service(&config.content.output_public_path, output_files)
        .fallback_service(ServeDir::new(&config.content.static_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http()))
}

/// `GET /output-images`: the generated images currently on disk, newest
/// first.
///
/// A scan failure surfaces as 500 with a JSON error body rather than an
/// empty list, so clients can tell "nothing generated yet" from "workspace
/// unreadable". Never panics toward the caller.
async fn list_output_images(State(state): State<AppState>) -> Response {
    let content = &state.config.content;
    match scan_output_dir(&content.output_dir, &content.output_public_path).await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => {
            tracing::error!(
                dir = %content.output_dir.display(),
                error = %e,
                "Failed to list output directory"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Any method under the upload path prefix: hand off to the forwarder.
async fn forward_upload(State(state): State<AppState>, request: Request<Body>) -> Response {
    state.forwarder.forward(request).await
}
