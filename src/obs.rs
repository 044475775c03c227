//! Optional observability helpers for adapter operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit spans named `idp_adapter.provider` with the `operation`, `provider`,
//!   and `request_id` fields, plus a `warn` event for every failed operation.
//! - Enable `metrics` to increment the `idp_adapter_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation`, `provider`, and `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Adapter operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Token liveness check.
	Validate,
	/// Identity enrichment.
	Enrich,
	/// Authorization code redemption.
	Redeem,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::Validate => "validate",
			Operation::Enrich => "enrich",
			Operation::Redeem => "redeem",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// Entry to an adapter operation.
	Attempt,
	/// Successful completion (a `true` validation counts as success).
	Success,
	/// Failure returned to, or absorbed on behalf of, the caller.
	Failure,
}
impl Outcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Outcome::Attempt => "attempt",
			Outcome::Success => "success",
			Outcome::Failure => "failure",
		}
	}
}
impl Display for Outcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
