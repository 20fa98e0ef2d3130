//! Storage module for the orders API.
//!
//! This module provides the store abstraction the resource operations run
//! against. Stores are injected, so every test and every server instance can
//! own an isolated collection instead of sharing process-wide state.

use async_trait::async_trait;
use orders_types::Order;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod memory;
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
	/// Error that occurs when a requested item is not found.
	#[error("Not found: {0}")]
	NotFound(String),
	/// Error that occurs when an id is already taken.
	#[error("Duplicate id: {0}")]
	Conflict(String),
	/// Error that occurs during serialization/deserialization.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for order stores.
///
/// Stores keep orders in insertion order. `list` returns that order and
/// `update` replaces a record without moving it.
#[async_trait]
pub trait OrderStore: Send + Sync {
	/// Appends a new order. Fails with `Conflict` if the id is taken.
	async fn add(&self, order: Order) -> Result<(), StorageError>;

	/// Looks up an order by id.
	async fn find(&self, id: &str) -> Result<Option<Order>, StorageError>;

	/// Replaces the order with the same id. Fails with `NotFound` if absent.
	async fn update(&self, order: Order) -> Result<(), StorageError>;

	/// Removes and returns the order with the given id.
	async fn remove(&self, id: &str) -> Result<Order, StorageError>;

	/// Returns every order in store order.
	async fn list(&self) -> Result<Vec<Order>, StorageError>;

	/// Checks whether an id is in use.
	async fn contains(&self, id: &str) -> Result<bool, StorageError> {
		Ok(self.find(id).await?.is_some())
	}
}

/// Type alias for storage factory functions.
///
/// This is the function signature that all storage implementations must provide
/// to create instances of their store from a TOML configuration table.
pub type StorageFactory = fn(&toml::Value) -> Result<Box<dyn OrderStore>, StorageError>;

/// Get all registered storage implementations.
///
/// Returns a vector of (name, factory) tuples for all available storage implementations.
pub fn get_all_implementations() -> Vec<(&'static str, StorageFactory)> {
	use implementations::memory;

	vec![(memory::NAME, memory::create_storage as StorageFactory)]
}

/// Builds the named store from its configuration table.
pub fn create_store(name: &str, config: &toml::Value) -> Result<Box<dyn OrderStore>, StorageError> {
	let factory = get_all_implementations()
		.into_iter()
		.find(|(implementation, _)| *implementation == name)
		.map(|(_, factory)| factory)
		.ok_or_else(|| {
			StorageError::Configuration(format!("Unknown storage implementation: {}", name))
		})?;
	factory(config)
}
