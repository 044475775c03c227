// self
use crate::{_prelude::*, http::RequestContext, obs::Operation};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// A span builder used by adapter operations.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the operation, provider name, and request id.
	pub fn new(operation: Operation, provider: &str, ctx: &RequestContext) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"idp_adapter.provider",
				operation = operation.as_str(),
				provider,
				request_id = ctx.request_id.as_deref()
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (operation, provider, ctx);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a `warn` event describing a failed operation.
///
/// Validation calls this before collapsing the error into `false`, so the reason for a
/// denied request stays diagnosable.
pub fn log_failure(operation: Operation, err: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			operation = operation.as_str(),
			kind = ?err.kind(),
			error = %err,
			"identity provider operation failed"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (operation, err);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{error::ConfigError, obs::Operation};

	#[test]
	fn hooks_noop_without_subscriber() {
		let _span = OperationSpan::new(Operation::Validate, "test", &RequestContext::new());

		log_failure(Operation::Validate, &ConfigError::MissingClientId.into());
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = OperationSpan::new(
			Operation::Enrich,
			"instrument_wraps_future",
			&RequestContext::new().with_request_id("req-1"),
		);
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
