//! Order entity types.
//!
//! An order is the single addressable resource of the API. Dishes are embedded
//! line items and are never addressed on their own.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle stage of an order.
///
/// Orders usually advance `pending -> preparing -> out-for-delivery ->
/// delivered`, but only the rules in the core state machine are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
	/// Order has been placed but not started.
	Pending,
	/// Kitchen is working on the order.
	Preparing,
	/// Order has left the restaurant.
	OutForDelivery,
	/// Order reached the customer. Terminal.
	Delivered,
}

impl OrderStatus {
	/// Returns the wire representation of the status.
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderStatus::Pending => "pending",
			OrderStatus::Preparing => "preparing",
			OrderStatus::OutForDelivery => "out-for-delivery",
			OrderStatus::Delivered => "delivered",
		}
	}

	/// Returns an iterator over all statuses in lifecycle order.
	pub fn all() -> impl Iterator<Item = Self> {
		[
			Self::Pending,
			Self::Preparing,
			Self::OutForDelivery,
			Self::Delivered,
		]
		.into_iter()
	}

	/// Whether no further mutation is allowed once an order has this status.
	pub fn is_terminal(&self) -> bool {
		matches!(self, OrderStatus::Delivered)
	}
}

impl FromStr for OrderStatus {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"pending" => Ok(Self::Pending),
			"preparing" => Ok(Self::Preparing),
			"out-for-delivery" => Ok(Self::OutForDelivery),
			"delivered" => Ok(Self::Delivered),
			_ => Err(()),
		}
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A line item within an order.
///
/// Only `quantity` is validated. Every other field (name, price, image url
/// and so on) is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
	/// Number of portions, always at least 1.
	pub quantity: u64,
	/// Descriptive fields passed through verbatim.
	#[serde(flatten)]
	pub details: serde_json::Map<String, serde_json::Value>,
}

impl Dish {
	/// Creates a dish with the given quantity and no descriptive fields.
	pub fn new(quantity: u64) -> Self {
		Self {
			quantity,
			details: serde_json::Map::new(),
		}
	}
}

/// A customer's food order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	/// Opaque identifier assigned on creation.
	pub id: String,
	/// Delivery address.
	pub deliver_to: String,
	/// Contact number for the delivery.
	pub mobile_number: String,
	/// Current status. Absent when the order was created without one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<OrderStatus>,
	/// Ordered dishes, never empty.
	pub dishes: Vec<Dish>,
}

/// The mutable fields of an order once a payload has passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderFields {
	pub deliver_to: String,
	pub mobile_number: String,
	pub status: Option<OrderStatus>,
	pub dishes: Vec<Dish>,
}

impl Order {
	/// Builds a new order from validated fields.
	pub fn new(id: impl Into<String>, fields: OrderFields) -> Self {
		Self {
			id: id.into(),
			deliver_to: fields.deliver_to,
			mobile_number: fields.mobile_number,
			status: fields.status,
			dishes: fields.dishes,
		}
	}

	/// Overwrites every mutable field. The id is left untouched.
	pub fn apply(&mut self, fields: OrderFields) {
		self.deliver_to = fields.deliver_to;
		self.mobile_number = fields.mobile_number;
		self.status = fields.status;
		self.dishes = fields.dishes;
	}
}
