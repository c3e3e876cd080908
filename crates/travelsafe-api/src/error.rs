//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use travelsafe_core::error::ServiceError;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store unavailable: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<travelsafe_core::Error> for ApiError {
  fn from(e: travelsafe_core::Error) -> Self { ApiError::BadRequest(e.to_string()) }
}

impl<E> From<ServiceError<E>> for ApiError
where
  E: std::error::Error + Send + Sync + 'static,
{
  fn from(e: ServiceError<E>) -> Self {
    match e {
      ServiceError::InvalidInput(e) => e.into(),
      ServiceError::Storage(e) => ApiError::Store(Box::new(e)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "incident store failure");
        (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use std::fmt;

  use super::*;

  #[derive(Debug)]
  struct Offline;

  impl fmt::Display for Offline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("offline") }
  }

  impl std::error::Error for Offline {}

  #[test]
  fn invalid_input_is_bad_request() {
    let err: ApiError = ServiceError::<Offline>::InvalidInput(
      travelsafe_core::Error::InvalidLatitude(91.0),
    )
    .into();
    assert!(matches!(err, ApiError::BadRequest(_)));
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
  }

  #[test]
  fn storage_failure_is_unavailable() {
    let err: ApiError = ServiceError::Storage(Offline).into();
    assert_eq!(err.to_string(), "store unavailable: offline");
    assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
  }
}
