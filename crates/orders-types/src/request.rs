//! Request payload types for order endpoints.
//!
//! Request bodies arrive as `{ "data": { ... } }`. The `data` object is read
//! exactly once into an [`OrderDraft`], which keeps enough information for the
//! validators to report what is wrong without re-inspecting raw JSON.
//!
//! A field counts as present only when its JSON value is truthy: `null`,
//! `false`, `0` and `""` are all treated as missing.

use serde_json::{Map, Value};

/// The `dishes` field of a submitted order.
#[derive(Debug, Clone, PartialEq)]
pub enum DishesField {
	/// Absent or falsy.
	Missing,
	/// Present but not an array.
	NotAList,
	/// An array, possibly empty.
	List(Vec<DishDraft>),
}

/// A submitted dish before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct DishDraft {
	/// The quantity when it is a non-negative JSON integer that fits in a
	/// `u64`, `None` otherwise.
	pub quantity: Option<u64>,
	/// Every other field of the dish.
	pub details: Map<String, Value>,
}

/// The `id` supplied in a request body.
///
/// Only a string can name a stored order. Any other truthy scalar is kept
/// for error messages but never matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmittedId {
	Text(String),
	NonText(String),
}

impl SubmittedId {
	/// Whether this id names the order with the given stored id.
	pub fn matches(&self, id: &str) -> bool {
		matches!(self, SubmittedId::Text(text) if text == id)
	}

	pub fn as_str(&self) -> &str {
		match self {
			SubmittedId::Text(text) | SubmittedId::NonText(text) => text,
		}
	}
}

/// Boundary-parsed `data` object of a create or update request.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
	pub id: Option<SubmittedId>,
	pub deliver_to: Option<String>,
	pub mobile_number: Option<String>,
	pub status: Option<String>,
	pub dishes: DishesField,
}

impl OrderDraft {
	/// Parses the `data` object out of a request body.
	///
	/// A body that is not an object, or whose `data` is not an object, yields
	/// an empty draft so that validation reports the first missing field.
	pub fn from_body(body: &Value) -> Self {
		let empty = Map::new();
		let data = body
			.get("data")
			.and_then(Value::as_object)
			.unwrap_or(&empty);
		Self::from_data(data)
	}

	/// Parses an already extracted `data` object.
	pub fn from_data(data: &Map<String, Value>) -> Self {
		Self {
			id: submitted_id(data.get("id")),
			deliver_to: string_field(data.get("deliverTo")),
			mobile_number: string_field(data.get("mobileNumber")),
			status: scalar_text(data.get("status")),
			dishes: dishes_field(data.get("dishes")),
		}
	}

	/// Returns whether the named wire field was supplied with a truthy value.
	pub fn has(&self, field: &str) -> bool {
		match field {
			"id" => self.id.is_some(),
			"deliverTo" => self.deliver_to.is_some(),
			"mobileNumber" => self.mobile_number.is_some(),
			"status" => self.status.is_some(),
			"dishes" => !matches!(self.dishes, DishesField::Missing),
			_ => false,
		}
	}
}

/// JavaScript-style truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
		Value::String(s) => !s.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	}
}

/// Non-empty strings only; anything else counts as missing.
fn string_field(value: Option<&Value>) -> Option<String> {
	match value {
		Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
		_ => None,
	}
}

fn submitted_id(value: Option<&Value>) -> Option<SubmittedId> {
	match value {
		Some(Value::String(s)) if !s.is_empty() => Some(SubmittedId::Text(s.clone())),
		Some(v) if is_truthy(v) => Some(SubmittedId::NonText(v.to_string())),
		_ => None,
	}
}

/// Truthy scalars rendered as text.
fn scalar_text(value: Option<&Value>) -> Option<String> {
	match value {
		Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
		Some(v) if is_truthy(v) => Some(v.to_string()),
		_ => None,
	}
}

fn dishes_field(value: Option<&Value>) -> DishesField {
	match value {
		Some(v) if !is_truthy(v) => DishesField::Missing,
		None => DishesField::Missing,
		Some(Value::Array(items)) => DishesField::List(items.iter().map(dish_draft).collect()),
		Some(_) => DishesField::NotAList,
	}
}

fn dish_draft(value: &Value) -> DishDraft {
	let Some(object) = value.as_object() else {
		return DishDraft {
			quantity: None,
			details: Map::new(),
		};
	};

	let mut details = object.clone();
	let quantity = details.remove("quantity").as_ref().and_then(integer);
	DishDraft { quantity, details }
}

/// Non-negative integral JSON numbers that fit in a `u64`, including floats
/// with no fractional part.
fn integer(value: &Value) -> Option<u64> {
	let Value::Number(number) = value else {
		return None;
	};
	if let Some(u) = number.as_u64() {
		return Some(u);
	}
	if number.is_i64() {
		return None;
	}
	let f = number.as_f64()?;
	// 2^64 is exactly representable, u64::MAX is not.
	const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;
	if f.fract() == 0.0 && f >= 0.0 && f < U64_LIMIT {
		Some(f as u64)
	} else {
		None
	}
}
