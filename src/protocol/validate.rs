// crates.io
use serde::de::IgnoredAny;
// self
use crate::{
	_prelude::*,
	http::{Endpoint, ProviderHttpClient, RequestContext},
	oauth::TransportErrorMapper,
	obs::{self, Operation, OperationSpan, Outcome},
	protocol::ProviderClient,
	provider::AuthHeaderMode,
};

impl<C, M> ProviderClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Returns true when the configured validate URL accepts `access_token`.
	pub async fn validate_token(
		&self,
		ctx: &RequestContext,
		access_token: &str,
		mode: AuthHeaderMode,
	) -> bool {
		self.validate_token_at(ctx, &self.data.validate_url, access_token, mode).await
	}

	/// Returns true when `url` (validate or introspection endpoint) answers 2xx with a JSON body.
	///
	/// Every transport failure, non-2xx status, or unparseable body collapses into `false`
	/// and is only reported through observability.
	pub async fn validate_token_at(
		&self,
		ctx: &RequestContext,
		url: &Url,
		access_token: &str,
		mode: AuthHeaderMode,
	) -> bool {
		const OPERATION: Operation = Operation::Validate;

		let provider = self.data.name.as_str();

		obs::record_outcome(OPERATION, provider, Outcome::Attempt);

		if access_token.is_empty() {
			obs::record_outcome(OPERATION, provider, Outcome::Failure);

			return false;
		}

		let span = OperationSpan::new(OPERATION, provider, ctx);
		let result = span
			.instrument(async {
				let body = self.get(ctx, Endpoint::Validate, url, access_token, mode).await?;

				serde_json::from_slice::<IgnoredAny>(&body).map_err(|source| {
					Error::MalformedResponse { endpoint: Endpoint::Validate, source }
				})?;

				Ok::<_, Error>(())
			})
			.await;

		match result {
			Ok(()) => {
				obs::record_outcome(OPERATION, provider, Outcome::Success);

				true
			},
			Err(err) => {
				obs::log_failure(OPERATION, &err);
				obs::record_outcome(OPERATION, provider, Outcome::Failure);

				false
			},
		}
	}
}
