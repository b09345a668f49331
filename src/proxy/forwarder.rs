//! Reverse proxying to the local upload service.
//!
//! # Responsibilities
//! - Rewrite the request origin so the upload service sees the request as
//!   addressed directly to it
//! - Stream bodies in both directions without buffering
//! - Force permissive CORS headers onto every response
//!
//! # Design Decisions
//! - No retries and no gateway-side timeout: resumable uploads are
//!   long-lived by design, and failures surface to the caller as 502
//! - The forced CORS values always win over upstream-set headers

use axum::{
    body::Body,
    http::{
        header,
        uri::{Authority, Scheme},
        HeaderMap, HeaderValue, Request, Response, StatusCode, Uri,
    },
    response::IntoResponse,
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

const ALLOW_ORIGIN: &str = "*";
const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Origin, Content-Type, Accept";

/// Forwards requests under the upload path prefix to the local upload
/// service.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    authority: Authority,
}

impl Forwarder {
    /// Create a forwarder targeting `authority` (e.g. `127.0.0.1:8080`).
    pub fn new(authority: Authority) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { client, authority }
    }

    /// Forward one request, returning the upstream response with CORS
    /// headers forced, or 502 when the upstream cannot be reached.
    ///
    /// The path is forwarded unchanged: the upload service serves its
    /// protocol under the same prefix the gateway exposes.
    pub async fn forward(&self, request: Request<Body>) -> Response<Body> {
        let (mut parts, body) = request.into_parts();

        // Origin rewrite.
        let mut uri_parts = parts.uri.clone().into_parts();
        uri_parts.scheme = Some(Scheme::HTTP);
        uri_parts.authority = Some(self.authority.clone());
        parts.uri = Uri::from_parts(uri_parts).unwrap_or(parts.uri.clone());

        if let Ok(host) = HeaderValue::from_str(self.authority.as_str()) {
            parts.headers.insert(header::HOST, host);
        }

        let upstream_request = Request::from_parts(parts, body);

        match self.client.request(upstream_request).await {
            Ok(response) => into_gateway_response(response),
            Err(e) => {
                tracing::error!(
                    upstream = %self.authority,
                    error = %e,
                    "Upload service unreachable"
                );
                let mut response =
                    (StatusCode::BAD_GATEWAY, "Upload service unreachable").into_response();
                force_cors_headers(response.headers_mut());
                response
            }
        }
    }
}

/// Adapt an upstream response for the client: stream the body through and
/// force the CORS headers.
fn into_gateway_response(upstream: Response<Incoming>) -> Response<Body> {
    let (mut parts, body) = upstream.into_parts();
    force_cors_headers(&mut parts.headers);
    Response::from_parts(parts, Body::new(body))
}

/// Overwrite the three CORS response headers with their permissive values.
///
/// Applied unconditionally: upstream-set values never survive.
pub fn force_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}
