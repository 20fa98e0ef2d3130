//! In-memory storage backend implementation for the orders API.
//!
//! Orders live in a `Vec` so that listing preserves insertion order. Nothing
//! survives a restart. The backend can optionally be seeded from a JSON file
//! holding an array of orders.

use crate::{OrderStore, StorageError};
use async_trait::async_trait;
use orders_types::Order;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Registry name of this backend.
pub const NAME: &str = "memory";

/// In-memory storage implementation.
#[derive(Clone, Default)]
pub struct MemoryStorage {
	/// The in-memory store protected by a read-write lock.
	orders: Arc<RwLock<Vec<Order>>>,
}

impl MemoryStorage {
	/// Creates a new empty MemoryStorage instance.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a store pre-populated with the given orders.
	///
	/// Fails if two orders share an id, or if an order has no dishes or a
	/// dish with a zero quantity.
	pub fn with_orders(orders: Vec<Order>) -> Result<Self, StorageError> {
		let mut seen = HashSet::new();
		for order in &orders {
			if !seen.insert(order.id.as_str()) {
				return Err(StorageError::Conflict(order.id.clone()));
			}
			if order.dishes.is_empty() {
				return Err(StorageError::Configuration(format!(
					"Seed order {} has no dishes",
					order.id
				)));
			}
			if let Some(index) = order.dishes.iter().position(|dish| dish.quantity == 0) {
				return Err(StorageError::Configuration(format!(
					"Seed order {} has a zero quantity at dish {}",
					order.id, index
				)));
			}
		}
		Ok(Self {
			orders: Arc::new(RwLock::new(orders)),
		})
	}

	/// Loads seed orders from a JSON array file.
	pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, StorageError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| {
			StorageError::Backend(format!("Cannot read seed file {}: {}", path.display(), e))
		})?;
		let orders: Vec<Order> =
			serde_json::from_str(&content).map_err(|e| StorageError::Serialization(e.to_string()))?;
		tracing::info!(count = orders.len(), path = %path.display(), "Seeding order store");
		Self::with_orders(orders)
	}
}

#[async_trait]
impl OrderStore for MemoryStorage {
	async fn add(&self, order: Order) -> Result<(), StorageError> {
		let mut orders = self.orders.write().await;
		if orders.iter().any(|existing| existing.id == order.id) {
			return Err(StorageError::Conflict(order.id));
		}
		orders.push(order);
		Ok(())
	}

	async fn find(&self, id: &str) -> Result<Option<Order>, StorageError> {
		let orders = self.orders.read().await;
		Ok(orders.iter().find(|order| order.id == id).cloned())
	}

	async fn update(&self, order: Order) -> Result<(), StorageError> {
		let mut orders = self.orders.write().await;
		let slot = orders
			.iter_mut()
			.find(|existing| existing.id == order.id)
			.ok_or_else(|| StorageError::NotFound(order.id.clone()))?;
		*slot = order;
		Ok(())
	}

	async fn remove(&self, id: &str) -> Result<Order, StorageError> {
		let mut orders = self.orders.write().await;
		let index = orders
			.iter()
			.position(|order| order.id == id)
			.ok_or_else(|| StorageError::NotFound(id.to_string()))?;
		Ok(orders.remove(index))
	}

	async fn list(&self) -> Result<Vec<Order>, StorageError> {
		Ok(self.orders.read().await.clone())
	}
}

/// Factory function to create a memory storage backend from configuration.
///
/// Configuration parameters:
/// - `seed_file` (optional): path to a JSON array of orders to preload
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn OrderStore>, StorageError> {
	match config.get("seed_file") {
		None => Ok(Box::new(MemoryStorage::new())),
		Some(toml::Value::String(path)) => Ok(Box::new(MemoryStorage::from_seed_file(path)?)),
		Some(other) => Err(StorageError::Configuration(format!(
			"seed_file must be a string, got {}",
			other.type_str()
		))),
	}
}
