//! Orders resource handlers.
//!
//! Each handler parses the request once at the boundary, hands the result to
//! the [`OrderService`](orders_core::OrderService) and wraps the outcome in
//! the `{ "data": ... }` envelope. Failures are logged and converted into
//! [`APIError`] responses.

use crate::server::AppState;
use axum::{
	body::Bytes,
	extract::{rejection::BytesRejection, Path, State},
	http::StatusCode,
	response::Json,
};
use orders_types::{APIError, DataEnvelope, Order, OrderDraft};
use serde_json::Value;
use tracing::warn;

type OrderResponse = Json<DataEnvelope<Order>>;

/// Handles POST /orders requests.
pub async fn create_order(
	State(state): State<AppState>,
	body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, OrderResponse), APIError> {
	let draft = parse_draft(&read_body(body)?)?;
	match state.orders.create(draft).await {
		Ok(order) => Ok((StatusCode::CREATED, Json(DataEnvelope::new(order)))),
		Err(e) => {
			warn!("Order creation failed: {}", e);
			Err(APIError::from(e))
		},
	}
}

/// Handles GET /orders requests.
pub async fn list_orders(
	State(state): State<AppState>,
) -> Result<Json<DataEnvelope<Vec<Order>>>, APIError> {
	match state.orders.list().await {
		Ok(orders) => Ok(Json(DataEnvelope::new(orders))),
		Err(e) => {
			warn!("Order listing failed: {}", e);
			Err(APIError::from(e))
		},
	}
}

/// Handles GET /orders/{order_id} requests.
pub async fn read_order(
	Path(order_id): Path<String>,
	State(state): State<AppState>,
) -> Result<OrderResponse, APIError> {
	match state.orders.read(&order_id).await {
		Ok(order) => Ok(Json(DataEnvelope::new(order))),
		Err(e) => {
			warn!("Order retrieval failed: {}", e);
			Err(APIError::from(e))
		},
	}
}

/// Handles PUT /orders/{order_id} requests.
pub async fn update_order(
	Path(order_id): Path<String>,
	State(state): State<AppState>,
	body: Result<Bytes, BytesRejection>,
) -> Result<OrderResponse, APIError> {
	let draft = parse_draft(&read_body(body)?)?;
	match state.orders.update(&order_id, draft).await {
		Ok(order) => Ok(Json(DataEnvelope::new(order))),
		Err(e) => {
			warn!("Order update failed: {}", e);
			Err(APIError::from(e))
		},
	}
}

/// Handles DELETE /orders/{order_id} requests.
pub async fn delete_order(
	Path(order_id): Path<String>,
	State(state): State<AppState>,
) -> Result<StatusCode, APIError> {
	match state.orders.delete(&order_id).await {
		Ok(()) => Ok(StatusCode::NO_CONTENT),
		Err(e) => {
			warn!("Order deletion failed: {}", e);
			Err(APIError::from(e))
		},
	}
}

/// Converts body extraction failures into JSON error responses.
fn read_body(body: Result<Bytes, BytesRejection>) -> Result<Bytes, APIError> {
	body.map_err(|rejection| {
		warn!("Rejected request body: {}", rejection.body_text());
		if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
			APIError::PayloadTooLarge {
				message: "Request body exceeds the size limit".to_string(),
			}
		} else {
			APIError::BadRequest {
				message: rejection.body_text(),
			}
		}
	})
}

/// Reads the request body into a draft.
///
/// An empty body behaves like `{}`. A body that is not valid JSON is refused.
fn parse_draft(body: &[u8]) -> Result<OrderDraft, APIError> {
	if body.iter().all(u8::is_ascii_whitespace) {
		return Ok(OrderDraft::from_body(&Value::Null));
	}
	let value: Value = serde_json::from_slice(body).map_err(|e| {
		warn!("Rejected malformed request body: {}", e);
		APIError::BadRequest {
			message: format!("Malformed JSON body: {}", e),
		}
	})?;
	Ok(OrderDraft::from_body(&value))
}
