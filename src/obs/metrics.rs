// self
use crate::obs::{Operation, Outcome};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_outcome(operation: Operation, provider: &str, outcome: Outcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"idp_adapter_operation_total",
			"operation" => operation.as_str(),
			"provider" => provider.to_owned(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (operation, provider, outcome);
	}
}
