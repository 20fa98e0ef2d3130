//! Field validators for order payloads.
//!
//! Each function here is one pipeline step. The create and update pipelines
//! are assembled from them in [`create_pipeline`] and [`update_pipeline`].

use crate::state::OrderStateMachine;
use orders_types::{
	Dish, DishesField, OrderDraft, OrderFields, OrderStatus, ValidationError, ValidationPipeline,
};

/// Input of the update pipeline: the stored order and the submitted draft.
#[derive(Debug, Clone)]
pub struct UpdateCandidate {
	pub current_id: String,
	pub current_status: Option<OrderStatus>,
	pub draft: OrderDraft,
}

/// Fails when `field` is absent or falsy.
pub fn require_field(draft: &OrderDraft, field: &str) -> Result<(), ValidationError> {
	if draft.has(field) {
		Ok(())
	} else {
		Err(ValidationError::new(format!("Order must include a {}", field)))
	}
}

/// Fails unless `dishes` is a non-empty list.
pub fn dishes_present(draft: &OrderDraft) -> Result<(), ValidationError> {
	match &draft.dishes {
		DishesField::List(dishes) if !dishes.is_empty() => Ok(()),
		_ => Err(ValidationError::new("Order must include at least one dish")),
	}
}

/// Fails on the first dish whose quantity is missing, not an integer, or below 1.
pub fn dish_quantities(draft: &OrderDraft) -> Result<(), ValidationError> {
	let DishesField::List(dishes) = &draft.dishes else {
		return Ok(());
	};

	match dishes
		.iter()
		.position(|dish| !matches!(dish.quantity, Some(q) if q >= 1))
	{
		Some(index) => Err(ValidationError::new(format!(
			"Dish {} must have a quantity that is an integer greater than 0",
			index
		))),
		None => Ok(()),
	}
}

/// Fails when the body carries an id other than the stored one.
pub fn id_matches(candidate: &UpdateCandidate) -> Result<(), ValidationError> {
	match &candidate.draft.id {
		Some(id) if !id.matches(&candidate.current_id) => Err(ValidationError::new(format!(
			"Order id does not match route id. Order: {}, Route: {}.",
			candidate.current_id,
			id.as_str()
		))),
		_ => Ok(()),
	}
}

/// Status rules for updates, delegated to the state machine.
pub fn update_status(candidate: &UpdateCandidate) -> Result<(), ValidationError> {
	OrderStateMachine::check_update(candidate.current_status, candidate.draft.status.as_deref())
		.map(|_| ())
}

/// A status supplied on create must be a known value.
pub fn create_status(draft: &OrderDraft) -> Result<(), ValidationError> {
	match draft.status.as_deref() {
		None => Ok(()),
		Some(raw) => OrderStateMachine::parse_status(raw).map(|_| ()),
	}
}

/// Steps run before an order is created.
pub fn create_pipeline() -> ValidationPipeline<OrderDraft> {
	ValidationPipeline::new()
		.step("deliverTo", |draft: &OrderDraft| require_field(draft, "deliverTo"))
		.step("mobileNumber", |draft: &OrderDraft| require_field(draft, "mobileNumber"))
		.step("dishes", |draft: &OrderDraft| require_field(draft, "dishes"))
		.step("dishes_present", dishes_present)
		.step("dish_quantities", dish_quantities)
		.step("status", create_status)
}

/// Steps run before an existing order is overwritten.
pub fn update_pipeline() -> ValidationPipeline<UpdateCandidate> {
	ValidationPipeline::new()
		.step("id_matches", id_matches)
		.step("deliverTo", |c: &UpdateCandidate| require_field(&c.draft, "deliverTo"))
		.step("mobileNumber", |c: &UpdateCandidate| require_field(&c.draft, "mobileNumber"))
		.step("dishes", |c: &UpdateCandidate| require_field(&c.draft, "dishes"))
		.step("dishes_present", |c: &UpdateCandidate| dishes_present(&c.draft))
		.step("dish_quantities", |c: &UpdateCandidate| dish_quantities(&c.draft))
		.step("status", update_status)
}

/// Converts a draft that passed its pipeline into typed fields.
///
/// The checks repeat what the pipeline already guarantees so that a draft
/// which skipped validation still cannot produce an invalid order.
pub fn into_fields(draft: OrderDraft) -> Result<OrderFields, ValidationError> {
	require_field(&draft, "deliverTo")?;
	require_field(&draft, "mobileNumber")?;
	dishes_present(&draft)?;
	dish_quantities(&draft)?;

	let status = draft
		.status
		.as_deref()
		.map(OrderStateMachine::parse_status)
		.transpose()?;

	let OrderDraft {
		deliver_to,
		mobile_number,
		dishes,
		..
	} = draft;

	let dishes = match dishes {
		DishesField::List(dishes) => dishes
			.into_iter()
			.map(|dish| Dish {
				quantity: dish.quantity.unwrap_or_default(),
				details: dish.details,
			})
			.collect(),
		_ => Vec::new(),
	};

	Ok(OrderFields {
		deliver_to: deliver_to.unwrap_or_default(),
		mobile_number: mobile_number.unwrap_or_default(),
		status,
		dishes,
	})
}
