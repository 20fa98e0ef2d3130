//! Common types module for the orders API.
//!
//! This module defines the data types shared by every crate in the workspace:
//! the order entity itself, the boundary-parsed request shape, the validation
//! pipeline, and the HTTP-facing error and envelope types.

/// API types for HTTP endpoints and request/response structures.
pub mod api;
/// Order entity types: orders, dishes and statuses.
pub mod order;
/// Request payload types parsed once at the HTTP boundary.
pub mod request;
/// Ordered validation pipeline used by the resource operations.
pub mod validation;

// Re-export all types for convenient access
pub use api::*;
pub use order::*;
pub use request::*;
pub use validation::*;
