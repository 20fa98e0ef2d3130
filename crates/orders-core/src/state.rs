//! Order status state machine.
//!
//! The policy is deliberately small. Any known status may replace any other
//! non-terminal one, `delivered` can never be submitted through an update,
//! a delivered order is frozen, and only pending orders may be deleted.

use orders_types::{OrderStatus, ValidationError};

/// Message for any attempt to touch or reach the terminal status via update.
pub const DELIVERED_IS_FINAL: &str = "A delivered order cannot be changed";
/// Message for unknown or missing status values.
pub const INVALID_STATUS: &str =
	"Order must have a status of pending, preparing, out-for-delivery, delivered";
/// Message for deleting an order that has left the pending state.
pub const DELETE_REQUIRES_PENDING: &str = "An order cannot be deleted unless it is pending";

/// Stateless rule set for order status changes.
pub struct OrderStateMachine;

impl OrderStateMachine {
	/// Parses a submitted status against the fixed enumeration.
	pub fn parse_status(raw: &str) -> Result<OrderStatus, ValidationError> {
		raw.parse()
			.map_err(|_| ValidationError::new(INVALID_STATUS))
	}

	/// Validates the status submitted with an update.
	///
	/// `delivered` is refused before the enumeration check, both as the stored
	/// status and as the requested one.
	pub fn check_update(
		current: Option<OrderStatus>,
		requested: Option<&str>,
	) -> Result<OrderStatus, ValidationError> {
		if current.is_some_and(|status| status.is_terminal()) {
			return Err(ValidationError::new(DELIVERED_IS_FINAL));
		}

		let requested = requested.ok_or_else(|| ValidationError::new(INVALID_STATUS))?;
		let status = Self::parse_status(requested)?;
		if status.is_terminal() {
			return Err(ValidationError::new(DELIVERED_IS_FINAL));
		}
		Ok(status)
	}

	/// Deletion is only allowed while the stored status is `pending`.
	pub fn can_delete(current: Option<OrderStatus>) -> bool {
		current == Some(OrderStatus::Pending)
	}
}
