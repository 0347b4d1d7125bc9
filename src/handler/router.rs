//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method checks, dispatch to the
//! form handlers or the static file server, common headers, access log.

use crate::config::AppState;
use crate::forms::{self, FormRoute};
use crate::handler::static_files;
use crate::http::{self, response::FORM_ALLOW, response::STATIC_ALLOW};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{self, HeaderName};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Headers the static file server needs from a GET/HEAD request
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<&'a str>,
    pub if_modified_since: Option<&'a str>,
    pub range: Option<&'a str>,
}

impl<'a> RequestContext<'a> {
    pub fn from_request<B>(req: &'a Request<B>) -> Self {
        Self {
            path: req.uri().path(),
            is_head: req.method() == Method::HEAD,
            if_none_match: header_str(req, &header::IF_NONE_MATCH),
            if_modified_since: header_str(req, &header::IF_MODIFIED_SINCE),
            range: header_str(req, &header::RANGE),
        }
    }
}

/// Main entry point for HTTP request handling
///
/// Generic over the body so tests can drive it without a socket.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let access_entry = state
        .config
        .logging
        .access_log
        .then(|| start_access_entry(&req, remote_addr));

    let mut response = route_request(req, &state).await;
    http::apply_common_headers(&mut response, &state.config.http);

    if let Some(mut entry) = access_entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.access_log_format);
    }

    Ok(response)
}

/// Route request based on method and path
async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let form_route = FormRoute::from_path(req.uri().path());
    let allow = if form_route.is_some() {
        FORM_ALLOW
    } else {
        STATIC_ALLOW
    };

    match (method, form_route) {
        (Method::POST, Some(route)) => {
            if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
                return resp;
            }
            forms::handle(route, req, state).await
        }
        (Method::GET | Method::HEAD, _) => {
            let ctx = RequestContext::from_request(&req);
            static_files::serve(&ctx, &state.config.static_files).await
        }
        (Method::OPTIONS, _) => http::build_options_response(
            allow,
            state.config.http.enable_cors,
            header_str(&req, &header::ACCESS_CONTROL_REQUEST_HEADERS),
        ),
        (method, _) => {
            tracing::warn!("Method not allowed: {method} {}", req.uri().path());
            http::build_405_response(allow)
        }
    }
}

/// Reject bodies whose declared Content-Length exceeds the limit
fn check_body_size<B>(req: &Request<B>, max_body_size: usize) -> Option<Response<Full<Bytes>>> {
    let declared = header_str(req, &header::CONTENT_LENGTH)?;
    match declared.parse::<usize>() {
        Ok(size) if size > max_body_size => {
            tracing::warn!("Request body too large: {size} bytes (max: {max_body_size})");
            Some(http::build_413_response())
        }
        Ok(_) => None,
        Err(_) => {
            tracing::warn!("Invalid Content-Length value: '{declared}', skipping size check");
            None
        }
    }
}

fn start_access_entry<B>(req: &Request<B>, remote_addr: SocketAddr) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.referer = header_str(req, &header::REFERER).map(ToString::to_string);
    entry.user_agent = header_str(req, &header::USER_AGENT).map(ToString::to_string);
    entry
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

fn header_str<'a, B>(req: &'a Request<B>, name: &HeaderName) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}
