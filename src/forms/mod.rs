//! Form submission module
//!
//! `POST /signin` and `POST /contact`: decode a JSON body strictly, check the
//! required fields are present, record the submission and acknowledge it.
//! Nothing is stored or delivered.

pub mod contact;
pub mod signin;
pub mod types;

pub use types::{Ack, ContactRequest, ErrorBody, SignInRequest};

use crate::config::AppState;
use crate::error::FormError;
use crate::http;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{self, HeaderMap};
use hyper::{Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Paths served by a form handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormRoute {
    SignIn,
    Contact,
}

impl FormRoute {
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/signin" => Some(Self::SignIn),
            "/contact" => Some(Self::Contact),
            _ => None,
        }
    }
}

/// Run the form handler for `route` and turn its outcome into a JSON response
pub async fn handle<B>(route: FormRoute, req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let max_body_size = state.config.http.max_body_size;
    let result = match route {
        FormRoute::SignIn => signin::submit(req, max_body_size).await,
        FormRoute::Contact => contact::submit(req, max_body_size).await,
    };

    match result {
        Ok(ack) => http::build_json_response(StatusCode::OK, &ack),
        Err(err) => {
            match &err {
                FormError::Validation(msg) => tracing::warn!("{route:?} rejected: {msg}"),
                FormError::Internal(msg) => tracing::error!("{route:?} failed: {msg}"),
            }
            http::build_json_response(err.status(), &ErrorBody::from(&err))
        }
    }
}

/// Read the whole body (bounded) and decode it as `T`
pub async fn read_json<B, T>(req: Request<B>, max_body_size: usize) -> Result<T, FormError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    T: DeserializeOwned,
{
    if !is_json(req.headers()) {
        return Err(FormError::internal(
            "Unsupported Media Type: expected Content-Type application/json",
        ));
    }

    let collected = Limited::new(req.into_body(), max_body_size)
        .collect()
        .await
        .map_err(|e| {
            if e.downcast_ref::<LengthLimitError>().is_some() {
                FormError::internal(format!("Request body exceeds {max_body_size} bytes"))
            } else {
                FormError::internal(format!("Failed to read request body: {e}"))
            }
        })?;

    // Objects only: a derived struct visitor would also take the sequence form
    let object: Map<String, Value> = serde_json::from_slice(&collected.to_bytes())
        .map_err(|e| FormError::internal(format!("Invalid JSON body: {e}")))?;

    serde_json::from_value(Value::Object(object))
        .map_err(|e| FormError::internal(format!("Invalid JSON body: {e}")))
}

/// `application/json` or any `+json` media type, parameters ignored
fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|media| media.trim().to_ascii_lowercase())
        .is_some_and(|media| media == "application/json" || media.ends_with("+json"))
}
