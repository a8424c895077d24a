use axum::extract::multipart::MultipartError;
use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::{self, Debug, Display};

/// Failure carried all the way to the response boundary.
///
/// `code` is the HTTP status the failure maps to; `message` is what the client
/// sees. Infrastructure causes are logged at conversion time and never exposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub code: u16,
    pub message: String,
}

impl Error {
    pub fn new(message: impl Into<String>, code: u16) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(message, 422)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message, 404)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(message, 401)
    }

    pub fn authentication_failed() -> Self {
        Self::new("Authentication failed", 403)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(message, 500)
    }

    pub fn is_not_found(&self) -> bool {
        self.code == 404
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.code)
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        infrastructure_error("environment variable", err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        infrastructure_error("database", err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        infrastructure_error("upstream", err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        infrastructure_error("io", err)
    }
}

impl From<oso::OsoError> for Error {
    fn from(err: oso::OsoError) -> Self {
        infrastructure_error("authorization policy", err)
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::debug!(?err, "token rejected");
        Error::authentication_failed()
    }
}

impl From<MultipartError> for Error {
    fn from(err: MultipartError) -> Self {
        tracing::debug!(?err, "malformed multipart body");
        Error::unprocessable("Invalid multipart body.")
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = Json(json!({
            "code": status.as_u16(),
            "message": self.message,
        }));

        (status, body).into_response()
    }
}

fn infrastructure_error<T: Debug>(source: &str, err: T) -> Error {
    tracing::error!(?err, "{} error", source);
    Error::internal("Something went wrong, please try again.")
}
