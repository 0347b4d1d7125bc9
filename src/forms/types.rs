// Form payload types
// Raw bodies decode strictly; validation turns them into the typed requests

use serde::{Deserialize, Serialize};

use crate::error::FormError;

pub const SIGNIN_REQUIRED: &str = "Username and password required";
pub const CONTACT_REQUIRED: &str = "All fields are required";

/// `POST /signin` body as sent by the client
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignInBody {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// `POST /contact` body as sent by the client
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Validated sign-in attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
}

/// Validated contact submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl TryFrom<SignInBody> for SignInRequest {
    type Error = FormError;

    fn try_from(body: SignInBody) -> Result<Self, Self::Error> {
        match (present(body.username), present(body.password)) {
            (Some(username), Some(password)) => Ok(Self { username, password }),
            _ => Err(FormError::Validation(SIGNIN_REQUIRED)),
        }
    }
}

impl TryFrom<ContactBody> for ContactRequest {
    type Error = FormError;

    fn try_from(body: ContactBody) -> Result<Self, Self::Error> {
        match (present(body.name), present(body.email), present(body.message)) {
            (Some(name), Some(email), Some(message)) => Ok(Self {
                name,
                email,
                message,
            }),
            _ => Err(FormError::Validation(CONTACT_REQUIRED)),
        }
    }
}

/// Missing, null and "" all count as absent
fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

/// Success payload shared by both endpoints
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ack {
    pub message: String,
    pub status: String,
}

impl Ack {
    pub fn success(message: &str) -> Self {
        Self {
            message: message.to_string(),
            status: "success".to_string(),
        }
    }
}

/// Error payload for 400 and 500 responses
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&FormError> for ErrorBody {
    fn from(err: &FormError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}
