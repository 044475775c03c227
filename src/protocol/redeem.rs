// self
use crate::{
	_prelude::*,
	http::{ProviderHttpClient, RequestContext},
	oauth::{BasicFacade, RedeemRequest, TransportErrorMapper},
	obs::{self, Operation, OperationSpan, Outcome},
	protocol::ProviderClient,
	session::SessionState,
};

impl<C, M> ProviderClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Exchanges an authorization code at the redeem URL.
	///
	/// The returned session carries tokens and timestamps only; run enrichment afterwards to
	/// fill identity fields.
	pub async fn redeem(
		&self,
		ctx: &RequestContext,
		request: &RedeemRequest,
	) -> Result<SessionState> {
		const OPERATION: Operation = Operation::Redeem;

		let provider = self.data.name.as_str();
		let span = OperationSpan::new(OPERATION, provider, ctx);

		obs::record_outcome(OPERATION, provider, Outcome::Attempt);

		let result = span
			.instrument(async {
				let facade = BasicFacade::from_data(&self.data, Some(&request.redirect_uri));

				facade
					.exchange_code(
						self.http_client.as_ref(),
						self.transport_mapper.as_ref(),
						ctx,
						request,
					)
					.await
			})
			.await;

		match &result {
			Ok(_) => obs::record_outcome(OPERATION, provider, Outcome::Success),
			Err(err) => {
				obs::log_failure(OPERATION, err);
				obs::record_outcome(OPERATION, provider, Outcome::Failure);
			},
		}

		result
	}
}
