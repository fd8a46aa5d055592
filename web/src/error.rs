use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// A field → messages map reported to the client when a payload fails
/// validation. Serialized directly as the 400 response body.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub(crate) struct ValidationErrors(BTreeMap<&'static str, Vec<String>>);

impl ValidationErrors {
    pub(crate) fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if any message was already recorded for `field`
    pub(crate) fn contains(&self, field: &'static str) -> bool {
        self.0.contains_key(field)
    }

    /// Fails with [Error::Validation] if any field error was recorded
    pub(crate) fn into_result(self) -> Result<(), Error> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self))
        }
    }
}

/// The body shape used for every non-validation error response, and for the
/// delete confirmation message
#[derive(Debug, Serialize)]
pub(crate) struct Detail {
    pub(crate) detail: String,
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum Error {
    #[error(transparent)]
    Libloc(#[from] libloc::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
    #[error("Resource Not Found: {0}")]
    NotFound(String),
    #[error("Bad query parameter: {0}")]
    BadQuery(String),
    #[error("The request payload failed validation")]
    Validation(ValidationErrors),
    #[error("Undecodable request payload: {0}")]
    Payload(#[from] axum::extract::rejection::JsonRejection),
    #[error("Failed to render the map page: {0}")]
    Template(#[from] minijinja::Error),
}

impl Error {
    fn to_client_status(&self) -> (StatusCode, String) {
        match self {
            Error::Libloc(libloc::Error::DatabaseRowNotFound(_)) => {
                (StatusCode::NOT_FOUND, "Not found.".to_string())
            }
            Error::Libloc(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),
            Error::Other(_) | Error::Template(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unknown error".to_string(),
            ),
            Error::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            Error::BadQuery(message) => (StatusCode::BAD_REQUEST, message.clone()),
            Error::Payload(rejection) => (
                StatusCode::BAD_REQUEST,
                format!("JSON parse error - {rejection}"),
            ),
            // handled separately in into_response
            Error::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
        }
    }
}

// Tell axum how to convert `Error` into a response.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        warn!("Got error for response: {self:?}");
        match self {
            Error::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(errors)).into_response()
            }
            other => {
                let (status, detail) = other.to_client_status();
                (status, Json(Detail { detail })).into_response()
            }
        }
    }
}
