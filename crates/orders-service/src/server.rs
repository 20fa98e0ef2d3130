//! HTTP server for the orders API.
//!
//! This module wires the order handlers into an axum router, adds the 404
//! and 405 fallbacks, and runs the server until a shutdown signal arrives.

use crate::apis::order::{create_order, delete_order, list_orders, read_order, update_order};
use axum::{
	extract::{DefaultBodyLimit, OriginalUri},
	http::Method,
	routing::get,
	Router,
};
use orders_config::ApiConfig;
use orders_core::OrderService;
use orders_types::APIError;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Order operations backed by the configured store.
	pub orders: Arc<OrderService>,
}

/// Builds the router with every order route and fallback.
pub fn router(state: AppState, max_request_size: usize) -> Router {
	Router::new()
		.route(
			"/orders",
			get(list_orders)
				.post(create_order)
				.fallback(method_not_allowed),
		)
		.route(
			"/orders/{order_id}",
			get(read_order)
				.put(update_order)
				.delete(delete_order)
				.fallback(method_not_allowed),
		)
		.fallback(path_not_found)
		.layer(
			ServiceBuilder::new()
				.layer(CorsLayer::permissive())
				.layer(DefaultBodyLimit::max(max_request_size)),
		)
		.with_state(state)
}

/// Starts the HTTP server for the API.
pub async fn start_server(
	api_config: ApiConfig,
	orders: Arc<OrderService>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = router(AppState { orders }, api_config.max_request_size);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Orders API server starting on {}", bind_address);

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	Ok(())
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::warn!("Failed to listen for shutdown signal: {}", e);
		std::future::pending::<()>().await;
	}
	tracing::info!("Shutdown signal received");
}

/// Any verb a known route does not serve.
async fn method_not_allowed(method: Method, OriginalUri(uri): OriginalUri) -> APIError {
	tracing::warn!("{} not allowed for {}", method, uri.path());
	APIError::MethodNotAllowed {
		message: format!("{} not allowed for {}", method, uri.path()),
	}
}

async fn path_not_found(OriginalUri(uri): OriginalUri) -> APIError {
	APIError::NotFound {
		message: format!("Path not found: {}", uri.path()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::body::{to_bytes, Body};
	use axum::http::{Request, StatusCode};
	use orders_storage::implementations::memory::MemoryStorage;
	use orders_types::{Dish, Order, OrderFields, OrderStatus};
	use serde_json::{json, Value};
	use tower::ServiceExt;

	fn seeded_order(id: &str, status: OrderStatus) -> Order {
		Order::new(
			id,
			OrderFields {
				deliver_to: "1600 Pennsylvania Avenue NW".to_string(),
				mobile_number: "(202) 456-1111".to_string(),
				status: Some(status),
				dishes: vec![Dish::new(1)],
			},
		)
	}

	fn app(orders: Vec<Order>) -> Router {
		let store = MemoryStorage::with_orders(orders).unwrap();
		let service = OrderService::new(Arc::new(store));
		router(
			AppState {
				orders: Arc::new(service),
			},
			1024 * 1024,
		)
	}

	async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
		let mut request = Request::builder().method(method).uri(uri);
		let body = match body {
			Some(json) => {
				request = request.header("content-type", "application/json");
				Body::from(json.to_string())
			},
			None => Body::empty(),
		};

		let response = app
			.clone()
			.oneshot(request.body(body).unwrap())
			.await
			.unwrap();
		let status = response.status();
		let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
		let value = if bytes.is_empty() {
			Value::Null
		} else {
			serde_json::from_slice(&bytes).unwrap()
		};
		(status, value)
	}

	#[tokio::test]
	async fn test_create_order() {
		let app = app(vec![]);
		let (status, body) = send(
			&app,
			"POST",
			"/orders",
			Some(json!({
				"data": {
					"deliverTo": "A",
					"mobileNumber": "555",
					"dishes": [{ "quantity": 1 }]
				}
			})),
		)
		.await;

		assert_eq!(status, StatusCode::CREATED);
		assert!(body["data"]["id"].is_string());
		assert_eq!(body["data"]["dishes"][0]["quantity"], json!(1));

		let id = body["data"]["id"].as_str().unwrap();
		let (status, fetched) = send(&app, "GET", &format!("/orders/{}", id), None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(fetched, body);
	}

	#[tokio::test]
	async fn test_create_without_body_names_first_missing_field() {
		let app = app(vec![]);
		let (status, body) = send(&app, "POST", "/orders", None).await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body["error"], json!("Order must include a deliverTo"));
	}

	#[tokio::test]
	async fn test_create_with_invalid_quantity() {
		let app = app(vec![]);
		let (status, body) = send(
			&app,
			"POST",
			"/orders",
			Some(json!({
				"data": {
					"deliverTo": "A",
					"mobileNumber": "555",
					"dishes": [{ "quantity": 1 }, { "quantity": "2" }]
				}
			})),
		)
		.await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert!(body["error"].as_str().unwrap().contains("Dish 1"));
	}

	#[tokio::test]
	async fn test_list_orders_in_store_order() {
		let app = app(vec![
			seeded_order("1", OrderStatus::Pending),
			seeded_order("2", OrderStatus::Preparing),
		]);
		let (status, body) = send(&app, "GET", "/orders", None).await;
		assert_eq!(status, StatusCode::OK);
		let ids: Vec<_> = body["data"]
			.as_array()
			.unwrap()
			.iter()
			.map(|order| order["id"].as_str().unwrap().to_string())
			.collect();
		assert_eq!(ids, vec!["1", "2"]);
	}

	#[tokio::test]
	async fn test_read_missing_order() {
		let app = app(vec![]);
		let (status, body) = send(&app, "GET", "/orders/nope", None).await;
		assert_eq!(status, StatusCode::NOT_FOUND);
		assert!(body["error"].as_str().unwrap().contains("nope"));
	}

	#[tokio::test]
	async fn test_update_order() {
		let app = app(vec![seeded_order("5", OrderStatus::Pending)]);
		let (status, body) = send(
			&app,
			"PUT",
			"/orders/5",
			Some(json!({
				"data": {
					"id": "5",
					"deliverTo": "B",
					"mobileNumber": "555",
					"status": "preparing",
					"dishes": [{ "quantity": 2 }]
				}
			})),
		)
		.await;

		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["data"]["status"], json!("preparing"));
		assert_eq!(body["data"]["deliverTo"], json!("B"));
	}

	#[tokio::test]
	async fn test_update_with_mismatched_id() {
		let app = app(vec![seeded_order("5", OrderStatus::Pending)]);
		let (status, body) = send(
			&app,
			"PUT",
			"/orders/5",
			Some(json!({
				"data": {
					"id": "6",
					"deliverTo": "B",
					"mobileNumber": "555",
					"status": "preparing",
					"dishes": [{ "quantity": 2 }]
				}
			})),
		)
		.await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert!(body["error"].as_str().unwrap().contains("does not match route id"));
	}

	#[tokio::test]
	async fn test_update_to_delivered_is_rejected() {
		let app = app(vec![seeded_order("5", OrderStatus::OutForDelivery)]);
		let (status, body) = send(
			&app,
			"PUT",
			"/orders/5",
			Some(json!({
				"data": {
					"deliverTo": "B",
					"mobileNumber": "555",
					"status": "delivered",
					"dishes": [{ "quantity": 2 }]
				}
			})),
		)
		.await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body["error"], json!("A delivered order cannot be changed"));
	}

	#[tokio::test]
	async fn test_update_missing_order() {
		let app = app(vec![]);
		let (status, body) = send(&app, "PUT", "/orders/42", Some(json!({ "data": {} }))).await;
		assert_eq!(status, StatusCode::NOT_FOUND);
		assert_eq!(body["error"], json!("Order not found: 42"));
	}

	#[tokio::test]
	async fn test_delete_non_pending_order() {
		let app = app(vec![seeded_order("5", OrderStatus::Preparing)]);
		let (status, body) = send(&app, "DELETE", "/orders/5", None).await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(
			body["error"],
			json!("An order cannot be deleted unless it is pending")
		);
	}

	#[tokio::test]
	async fn test_delete_pending_order() {
		let app = app(vec![
			seeded_order("5", OrderStatus::Pending),
			seeded_order("6", OrderStatus::Pending),
		]);
		let (status, body) = send(&app, "DELETE", "/orders/5", None).await;
		assert_eq!(status, StatusCode::NO_CONTENT);
		assert_eq!(body, Value::Null);

		let (_, list) = send(&app, "GET", "/orders", None).await;
		assert_eq!(list["data"].as_array().unwrap().len(), 1);
		assert_eq!(list["data"][0]["id"], json!("6"));

		let (status, _) = send(&app, "DELETE", "/orders/5", None).await;
		assert_eq!(status, StatusCode::NOT_FOUND);
	}

	#[tokio::test]
	async fn test_unsupported_methods() {
		let app = app(vec![seeded_order("5", OrderStatus::Pending)]);

		let (status, body) = send(&app, "PATCH", "/orders", None).await;
		assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
		assert_eq!(body["error"], json!("PATCH not allowed for /orders"));

		let (status, _) = send(&app, "POST", "/orders/5", None).await;
		assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

		let (status, _) = send(&app, "DELETE", "/orders", None).await;
		assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
	}

	#[tokio::test]
	async fn test_unknown_path() {
		let app = app(vec![]);
		let (status, body) = send(&app, "GET", "/dishes", None).await;
		assert_eq!(status, StatusCode::NOT_FOUND);
		assert_eq!(body["error"], json!("Path not found: /dishes"));
	}

	#[tokio::test]
	async fn test_oversized_body_gets_json_error() {
		let store = MemoryStorage::with_orders(vec![seeded_order("5", OrderStatus::Pending)]).unwrap();
		let app = router(
			AppState {
				orders: Arc::new(OrderService::new(Arc::new(store))),
			},
			64,
		);
		let payload = json!({
			"data": {
				"deliverTo": "x".repeat(256),
				"mobileNumber": "555",
				"dishes": [{ "quantity": 1 }]
			}
		});

		let (status, body) = send(&app, "POST", "/orders", Some(payload.clone())).await;
		assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
		assert_eq!(body["error"], json!("Request body exceeds the size limit"));

		let (status, body) = send(&app, "PUT", "/orders/5", Some(payload)).await;
		assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
		assert!(body["error"].is_string());
	}

	#[tokio::test]
	async fn test_malformed_json() {
		let app = app(vec![]);
		let request = Request::builder()
			.method("POST")
			.uri("/orders")
			.header("content-type", "application/json")
			.body(Body::from("{not json"))
			.unwrap();
		let response = app.oneshot(request).await.unwrap();
		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	}
}
