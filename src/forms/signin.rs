// Sign-in handler
// Any non-empty username/password pair is accepted; no credential check happens

use hyper::body::Body;
use hyper::Request;

use super::read_json;
use super::types::{Ack, SignInBody, SignInRequest};
use crate::error::FormError;
use crate::logger::FORMS_TARGET;

pub const SIGNIN_SUCCESS: &str = "Sign-in successful!";

pub async fn submit<B>(req: Request<B>, max_body_size: usize) -> Result<Ack, FormError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let body: SignInBody = read_json(req, max_body_size).await?;
    let request = SignInRequest::try_from(body)?;
    record(&request);
    Ok(Ack::success(SIGNIN_SUCCESS))
}

/// Record the attempt, username only
pub fn record(request: &SignInRequest) {
    tracing::info!(target: FORMS_TARGET, username = %request.username, "Sign-in request");
}
