use crate::config::ValidationError;
use http_body_util::combinators::BoxBody;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use kv::KvError;
use shared::http::{make_boxed_error_response, make_text_response};

pub type HandlerBody = BoxBody<Bytes, GatewayError>;

/// Errors that can occur while serving a subscription request.
///
/// The first four variants are client facing and their `Display` output is
/// the exact response body.
#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    #[error("Access Denied")]
    AccessDenied,

    #[error("Invalid Token")]
    InvalidToken,

    #[error("Invalid Subscription")]
    InvalidSubscription,

    #[error("No configs available")]
    NoConfigsAvailable,

    #[error("store error: {0}")]
    Store(#[from] KvError),

    #[error("user lookup failed: {0}")]
    UserLookup(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::AccessDenied => StatusCode::FORBIDDEN,
            GatewayError::InvalidToken => StatusCode::BAD_REQUEST,
            GatewayError::InvalidSubscription => StatusCode::NOT_FOUND,
            GatewayError::NoConfigsAvailable => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::Store(_)
            | GatewayError::UserLookup(_)
            | GatewayError::InvalidConfig(_)
            | GatewayError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_response(self) -> Response<HandlerBody> {
        let status = self.status_code();
        match self {
            GatewayError::AccessDenied
            | GatewayError::InvalidToken
            | GatewayError::InvalidSubscription
            | GatewayError::NoConfigsAvailable => make_text_response(status, self.to_string()),
            // Internal details stay in the logs
            _ => make_boxed_error_response(status),
        }
    }
}
