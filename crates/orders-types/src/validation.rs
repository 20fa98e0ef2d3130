//! Ordered validation pipeline.
//!
//! A pipeline is a list of named steps. Each step inspects the input and
//! either passes or fails with a [`ValidationError`]. Steps run in insertion
//! order and the first failure stops the run.

use thiserror::Error;

/// A failed validation step. The message is meant for the API caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
	pub message: String,
}

impl ValidationError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}
}

/// Type alias for validation step functions.
pub type Validator<T> = Box<dyn Fn(&T) -> Result<(), ValidationError> + Send + Sync>;

/// A named validation step.
pub struct Step<T> {
	pub name: &'static str,
	pub validator: Validator<T>,
}

impl<T> std::fmt::Debug for Step<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Step").field("name", &self.name).finish()
	}
}

/// Sequence of validation steps run against a single input.
#[derive(Debug)]
pub struct ValidationPipeline<T> {
	steps: Vec<Step<T>>,
}

impl<T> Default for ValidationPipeline<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> ValidationPipeline<T> {
	/// Creates an empty pipeline that accepts every input.
	pub fn new() -> Self {
		Self { steps: Vec::new() }
	}

	/// Appends a step to the end of the pipeline.
	pub fn step<F>(mut self, name: &'static str, validator: F) -> Self
	where
		F: Fn(&T) -> Result<(), ValidationError> + Send + Sync + 'static,
	{
		self.steps.push(Step {
			name,
			validator: Box::new(validator),
		});
		self
	}

	/// Runs every step in order, stopping at the first failure.
	pub fn run(&self, input: &T) -> Result<(), ValidationError> {
		self.steps
			.iter()
			.try_for_each(|step| (step.validator)(input))
	}

	/// Step names in execution order.
	pub fn names(&self) -> Vec<&'static str> {
		self.steps.iter().map(|step| step.name).collect()
	}

	pub fn len(&self) -> usize {
		self.steps.len()
	}

	pub fn is_empty(&self) -> bool {
		self.steps.is_empty()
	}
}
