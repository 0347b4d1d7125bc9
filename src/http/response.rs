//! HTTP response building module
//!
//! Builders for every status the server produces. A builder never panics:
//! on a malformed header it logs and falls back to an empty response.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{self, HeaderValue};
use hyper::{Response, StatusCode};
use serde::Serialize;

use super::range::ByteRange;
use crate::config::HttpConfig;

/// Methods accepted on the form endpoints
pub const FORM_ALLOW: &str = "GET, HEAD, POST, OPTIONS";
/// Methods accepted on every other path
pub const STATIC_ALLOW: &str = "GET, HEAD, OPTIONS";

const CORS_ALLOW_METHODS: &str = "GET, HEAD, POST, OPTIONS";
const CORS_MAX_AGE: &str = "86400";

/// Build JSON response
pub fn build_json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let (status, json) = match serde_json::to_vec(body) {
        Ok(j) => (status, j),
        Err(e) => {
            tracing::error!("Failed to serialize response: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                br#"{"error":"Internal server error"}"#.to_vec(),
            )
        }
    };

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, json.len())
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| fallback("JSON", &e))
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    plain_text(StatusCode::NOT_FOUND, "404 Not Found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(allow: &'static str) -> Response<Full<Bytes>> {
    let mut response = plain_text(StatusCode::METHOD_NOT_ALLOWED, "405 Method Not Allowed");
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static(allow));
    response
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    plain_text(StatusCode::PAYLOAD_TOO_LARGE, "413 Payload Too Large")
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(file_size: usize) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header(header::CONTENT_TYPE, "text/plain")
        .header(header::CONTENT_RANGE, format!("bytes */{file_size}"))
        .body(Full::new(Bytes::from_static(b"416 Range Not Satisfiable")))
        .unwrap_or_else(|e| fallback("416", &e))
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str, last_modified: Option<&str>) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(header::ETAG, etag)
        .header(header::CACHE_CONTROL, "no-cache");
    if let Some(date) = last_modified {
        builder = builder.header(header::LAST_MODIFIED, date);
    }
    builder
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback("304", &e))
}

/// Build OPTIONS response (CORS preflight when enabled)
pub fn build_options_response(
    allow: &'static str,
    enable_cors: bool,
    requested_headers: Option<&str>,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(header::ALLOW, allow);

    if enable_cors {
        builder = builder
            .header(header::ACCESS_CONTROL_ALLOW_METHODS, CORS_ALLOW_METHODS)
            .header(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                requested_headers.unwrap_or("Content-Type"),
            )
            .header(header::ACCESS_CONTROL_MAX_AGE, CORS_MAX_AGE);
    }

    builder
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback("OPTIONS", &e))
}

/// Validators attached to every file response
pub struct FileValidators<'a> {
    pub etag: &'a str,
    pub last_modified: Option<&'a str>,
}

/// Build 200 response for a static file
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    validators: &FileValidators<'_>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    file_headers(StatusCode::OK, content_type, validators)
        .header(header::CONTENT_LENGTH, content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback("200", &e))
}

/// Build 206 Partial Content response, `data` is the whole file
pub fn build_partial_response(
    data: &Bytes,
    range: ByteRange,
    content_type: &str,
    validators: &FileValidators<'_>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let body = if is_head {
        Bytes::new()
    } else {
        data.slice(range.start..=range.end)
    };

    file_headers(StatusCode::PARTIAL_CONTENT, content_type, validators)
        .header(header::CONTENT_LENGTH, range.content_length())
        .header(
            header::CONTENT_RANGE,
            format!("bytes {}-{}/{}", range.start, range.end, data.len()),
        )
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback("206", &e))
}

/// Stamp headers every response carries
pub fn apply_common_headers(response: &mut Response<Full<Bytes>>, http: &HttpConfig) {
    let headers = response.headers_mut();
    match HeaderValue::from_str(&http.server_name) {
        Ok(value) => {
            headers.insert(header::SERVER, value);
        }
        Err(e) => tracing::warn!("Invalid server_name '{}': {e}", http.server_name),
    }
    if http.enable_cors {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
    }
}

fn file_headers(
    status: StatusCode,
    content_type: &str,
    validators: &FileValidators<'_>,
) -> hyper::http::response::Builder {
    let mut builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::ETAG, validators.etag)
        .header(header::CACHE_CONTROL, "no-cache");
    if let Some(date) = validators.last_modified {
        builder = builder.header(header::LAST_MODIFIED, date);
    }
    builder
}

fn plain_text(status: StatusCode, text: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from_static(text.as_bytes())))
        .unwrap_or_else(|e| fallback(status.as_str(), &e))
}

/// Log response build error and return an empty body
fn fallback(status: &str, error: &hyper::http::Error) -> Response<Full<Bytes>> {
    tracing::error!("Failed to build {status} response: {error}");
    Response::new(Full::new(Bytes::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_response() {
        let response = build_json_response(StatusCode::BAD_REQUEST, &serde_json::json!({"error": "x"}));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "13");
    }

    #[test]
    fn test_405_carries_allow() {
        let response = build_405_response(FORM_ALLOW);
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], FORM_ALLOW);
    }

    #[test]
    fn test_options_preflight() {
        let response = build_options_response(FORM_ALLOW, true, Some("content-type, x-trace"));
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "content-type, x-trace"
        );

        let response = build_options_response(STATIC_ALLOW, false, None);
        assert!(!response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
    }

    #[test]
    fn test_common_headers() {
        let mut response = build_404_response();
        apply_common_headers(&mut response, &HttpConfig::default());
        assert_eq!(response.headers()[header::SERVER], "frontdesk");
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let mut response = build_404_response();
        let http = HttpConfig {
            enable_cors: false,
            ..HttpConfig::default()
        };
        apply_common_headers(&mut response, &http);
        assert!(!response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[test]
    fn test_partial_response() {
        let data = Bytes::from_static(b"0123456789");
        let validators = FileValidators {
            etag: "\"t\"",
            last_modified: None,
        };
        let response = build_partial_response(
            &data,
            ByteRange { start: 2, end: 4 },
            "text/plain",
            &validators,
            false,
        );
        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(response.headers()[header::CONTENT_RANGE], "bytes 2-4/10");
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "3");
    }
}
