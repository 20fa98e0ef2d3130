//! Core order handling for the orders API.
//!
//! [`OrderService`] composes the field validators, the status state machine
//! and an injected [`OrderStore`] into the five lifecycle operations: create,
//! read, update, delete and list. Every check runs before anything is written,
//! so a rejected request never leaves a partially updated order behind.

use orders_storage::{OrderStore, StorageError};
use orders_types::{APIError, Order, OrderDraft, ValidationError, ValidationPipeline};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

pub mod state;
pub mod validators;

pub use state::OrderStateMachine;
use validators::UpdateCandidate;

/// Attempts at drawing an unused id before giving up.
const MAX_ID_ATTEMPTS: usize = 8;

/// Errors that can occur while handling an order request.
#[derive(Debug, Error)]
pub enum OrderError {
	/// A submitted field failed validation.
	#[error("{0}")]
	Validation(#[from] ValidationError),
	/// No order has the requested id.
	#[error("Order not found: {0}")]
	NotFound(String),
	/// The order exists but is not in a state that allows the operation.
	#[error("{0}")]
	Precondition(String),
	/// The store failed.
	#[error("Storage error: {0}")]
	Storage(#[from] StorageError),
}

impl From<OrderError> for APIError {
	fn from(error: OrderError) -> Self {
		match error {
			OrderError::Validation(e) => APIError::BadRequest { message: e.message },
			OrderError::Precondition(message) => APIError::BadRequest { message },
			OrderError::NotFound(id) => APIError::NotFound {
				message: format!("Order not found: {}", id),
			},
			OrderError::Storage(e) => APIError::InternalServerError {
				message: e.to_string(),
			},
		}
	}
}

/// Orchestrates validation, state rules and storage for order requests.
pub struct OrderService {
	store: Arc<dyn OrderStore>,
	create_pipeline: ValidationPipeline<OrderDraft>,
	update_pipeline: ValidationPipeline<UpdateCandidate>,
}

impl OrderService {
	/// Creates a service on top of the given store.
	pub fn new(store: Arc<dyn OrderStore>) -> Self {
		Self {
			store,
			create_pipeline: validators::create_pipeline(),
			update_pipeline: validators::update_pipeline(),
		}
	}

	/// Validates a draft, assigns it a fresh id and appends it to the store.
	pub async fn create(&self, draft: OrderDraft) -> Result<Order, OrderError> {
		self.create_pipeline.run(&draft)?;
		let fields = validators::into_fields(draft)?;

		let order = Order::new(self.next_id().await?, fields);
		self.store.add(order.clone()).await?;

		info!(order_id = %order.id, dishes = order.dishes.len(), "Created order");
		Ok(order)
	}

	/// Returns the order with the given id.
	pub async fn read(&self, id: &str) -> Result<Order, OrderError> {
		debug!(order_id = %id, "Reading order");
		self.store
			.find(id)
			.await?
			.ok_or_else(|| OrderError::NotFound(id.to_string()))
	}

	/// Overwrites every mutable field of an existing order.
	pub async fn update(&self, id: &str, draft: OrderDraft) -> Result<Order, OrderError> {
		let mut order = self.read(id).await?;

		let candidate = UpdateCandidate {
			current_id: order.id.clone(),
			current_status: order.status,
			draft,
		};
		self.update_pipeline.run(&candidate)?;
		let fields = validators::into_fields(candidate.draft)?;

		let previous = order.status;
		order.apply(fields);
		self.store.update(order.clone()).await.map_err(not_found)?;

		info!(
			order_id = %order.id,
			from = ?previous,
			to = ?order.status,
			"Updated order"
		);
		Ok(order)
	}

	/// Removes a pending order.
	pub async fn delete(&self, id: &str) -> Result<(), OrderError> {
		let order = self.read(id).await?;
		if !OrderStateMachine::can_delete(order.status) {
			return Err(OrderError::Precondition(
				state::DELETE_REQUIRES_PENDING.to_string(),
			));
		}

		self.store.remove(id).await.map_err(not_found)?;
		info!(order_id = %id, "Deleted order");
		Ok(())
	}

	/// Returns every order in store order.
	pub async fn list(&self) -> Result<Vec<Order>, OrderError> {
		Ok(self.store.list().await?)
	}

	/// Draws random ids until one is not taken.
	async fn next_id(&self) -> Result<String, OrderError> {
		for _ in 0..MAX_ID_ATTEMPTS {
			let id = Uuid::new_v4().simple().to_string();
			if !self.store.contains(&id).await? {
				return Ok(id);
			}
		}
		Err(OrderError::Storage(StorageError::Backend(
			"Could not allocate an unused order id".to_string(),
		)))
	}
}

/// A record vanishing between lookup and write is reported as not found.
fn not_found(error: StorageError) -> OrderError {
	match error {
		StorageError::NotFound(id) => OrderError::NotFound(id),
		other => OrderError::Storage(other),
	}
}
