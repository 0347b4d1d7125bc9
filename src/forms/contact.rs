// Contact handler
// Logging stub: the message is recorded and acknowledged, never delivered

use hyper::body::Body;
use hyper::Request;

use super::read_json;
use super::types::{Ack, ContactBody, ContactRequest};
use crate::error::FormError;
use crate::logger::FORMS_TARGET;

pub const CONTACT_SUCCESS: &str = "Message sent successfully!";

pub async fn submit<B>(req: Request<B>, max_body_size: usize) -> Result<Ack, FormError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let body: ContactBody = read_json(req, max_body_size).await?;
    let request = ContactRequest::try_from(body)?;
    record(&request);
    Ok(Ack::success(CONTACT_SUCCESS))
}

pub fn record(request: &ContactRequest) {
    tracing::info!(
        target: FORMS_TARGET,
        name = %request.name,
        email = %request.email,
        body = %request.message,
        "Contact message"
    );
}
