//! Round-trips shared by every adapter: validation, enrichment, and code redemption.
//!
//! [`ProviderClient`] bundles the merged [`ProviderData`] with the injected transport and
//! its error mapper. Adapters compose one client and delegate to it, so vendor code only
//! decides *which* claims to read and *how* tokens are presented.

/// Identity enrichment from userinfo/profile endpoints.
pub mod enrich;

/// Authorization code redemption into a fresh session.
mod redeem;
/// Fail-closed token liveness checks.
mod validate;

pub use enrich::*;

// crates.io
use oauth2::{
	AsyncHttpClient,
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION},
	},
};
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	http::{Endpoint, ProviderHttpClient, RequestContext, ResponseMetadataSlot},
	oauth::TransportErrorMapper,
	provider::{AuthHeaderMode, ProviderData},
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

/// Merged configuration plus the transport used to reach the identity provider.
///
/// Cheap to share: the transport and mapper sit behind [`Arc`] and the data is never
/// mutated after construction.
pub struct ProviderClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Merged provider configuration.
	pub data: ProviderData,
	/// HTTP client wrapper used for every outbound request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them.
	pub transport_mapper: Arc<M>,
}
impl<C, M> ProviderClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		data: ProviderData,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self { data, http_client: http_client.into(), transport_mapper: mapper.into() }
	}

	/// Performs one authenticated GET and returns the body of a 2xx response.
	pub(crate) async fn get(
		&self,
		ctx: &RequestContext,
		endpoint: Endpoint,
		url: &Url,
		access_token: &str,
		mode: AuthHeaderMode,
	) -> Result<Vec<u8>> {
		let (target, authorization) = mode.apply(url, access_token);
		let mut builder = Request::builder()
			.method(Method::GET)
			.uri(target.as_str())
			.header(ACCEPT, "application/json");

		if let Some(value) = authorization {
			builder = builder.header(AUTHORIZATION, value);
		}

		let request = builder.body(Vec::new()).map_err(ConfigError::from)?;
		let meta = ResponseMetadataSlot::default();
		let handle = self.http_client.handle(ctx, meta.clone());
		let response = handle.call(request).await.map_err(|err| {
			self.transport_mapper.map_transport_error(endpoint, meta.take().as_ref(), err)
		})?;
		let status = response.status();

		if !status.is_success() {
			return Err(Error::UpstreamRejected {
				endpoint,
				status: status.as_u16(),
				retry_after: meta.take().and_then(|value| value.retry_after),
			});
		}

		Ok(response.into_body())
	}
}
#[cfg(feature = "reqwest")]
impl ProviderClient<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client backed by the crate's default reqwest transport.
	pub fn new(data: ProviderData) -> Self {
		Self::with_http_client(data, ReqwestHttpClient::default(), ReqwestTransportErrorMapper)
	}
}
impl<C, M> Debug for ProviderClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderClient").field("data", &self.data).finish()
	}
}
