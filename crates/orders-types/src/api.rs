//! API types for the orders HTTP endpoints.
//!
//! Every successful response wraps its payload in a `{ "data": ... }`
//! envelope. Every failure is rendered as `{ "error": "<message>" }` with the
//! status code carried by [`APIError`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Success envelope shared by all order endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
	pub data: T,
}

impl<T> DataEnvelope<T> {
	pub fn new(data: T) -> Self {
		Self { data }
	}
}

/// API error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Human-readable description
	pub error: String,
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum APIError {
	/// Validation or precondition failure (400)
	BadRequest { message: String },
	/// Addressed resource or path does not exist (404)
	NotFound { message: String },
	/// Unsupported verb on a known route (405)
	MethodNotAllowed { message: String },
	/// Request body exceeds the configured limit (413)
	PayloadTooLarge { message: String },
	/// Internal server error (500)
	InternalServerError { message: String },
}

impl APIError {
	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> StatusCode {
		match self {
			APIError::BadRequest { .. } => StatusCode::BAD_REQUEST,
			APIError::NotFound { .. } => StatusCode::NOT_FOUND,
			APIError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
			APIError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
			APIError::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	pub fn message(&self) -> &str {
		match self {
			APIError::BadRequest { message }
			| APIError::NotFound { message }
			| APIError::MethodNotAllowed { message }
			| APIError::PayloadTooLarge { message }
			| APIError::InternalServerError { message } => message,
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	pub fn to_error_response(&self) -> ErrorResponse {
		ErrorResponse {
			error: self.message().to_string(),
		}
	}
}

impl fmt::Display for APIError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			APIError::BadRequest { message } => write!(f, "Bad Request: {}", message),
			APIError::NotFound { message } => write!(f, "Not Found: {}", message),
			APIError::MethodNotAllowed { message } => write!(f, "Method Not Allowed: {}", message),
			APIError::PayloadTooLarge { message } => write!(f, "Payload Too Large: {}", message),
			APIError::InternalServerError { message } => {
				write!(f, "Internal Server Error: {}", message)
			},
		}
	}
}

impl std::error::Error for APIError {}

impl IntoResponse for APIError {
	fn into_response(self) -> Response {
		(self.status_code(), Json(self.to_error_response())).into_response()
	}
}
