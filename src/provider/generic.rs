// self
use crate::{
	_prelude::*,
	http::{ProviderHttpClient, RequestContext},
	oauth::{RedeemRequest, TransportErrorMapper},
	protocol::{ProfileMapping, ProviderClient},
	provider::{Provider, ProviderConfig, ProviderData, ProviderDefaults, ProviderFuture},
	session::SessionState,
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

/// Defaults for the generic adapter: only the name and scope are known up front.
pub const OAUTH2_DEFAULTS: ProviderDefaults = ProviderDefaults {
	name: "OAuth2",
	login_url: None,
	redeem_url: None,
	profile_url: None,
	validate_url: None,
	scope: "openid email profile",
};

/// Adapter for providers that speak plain OAuth 2.0.
///
/// Enrichment is a no-op unless a [`ProfileMapping`] is attached.
pub struct OAuth2Provider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	client: ProviderClient<C, M>,
	profile_mapping: Option<ProfileMapping>,
}
impl<C, M> OAuth2Provider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Merges [`OAUTH2_DEFAULTS`] into `config` and builds the adapter on the given transport.
	pub fn with_http_client(
		mut config: ProviderConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		config.set_defaults(&OAUTH2_DEFAULTS);

		let data = config.build()?;

		Ok(Self {
			client: ProviderClient::with_http_client(data, http_client, mapper),
			profile_mapping: None,
		})
	}

	/// Enables enrichment through `mapping`.
	pub fn with_profile_mapping(mut self, mapping: ProfileMapping) -> Self {
		self.profile_mapping = Some(mapping);

		self
	}

	/// Underlying protocol client.
	pub fn client(&self) -> &ProviderClient<C, M> {
		&self.client
	}
}
#[cfg(feature = "reqwest")]
impl OAuth2Provider<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Builds the adapter on the default reqwest transport.
	pub fn new(config: ProviderConfig) -> Result<Self> {
		Self::with_http_client(config, ReqwestHttpClient::default(), ReqwestTransportErrorMapper)
	}
}
impl<C, M> Provider for OAuth2Provider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn data(&self) -> &ProviderData {
		&self.client.data
	}

	fn validate_session<'a>(
		&'a self,
		ctx: &'a RequestContext,
		session: &'a SessionState,
	) -> ProviderFuture<'a, bool> {
		Box::pin(self.client.validate_token(
			ctx,
			session.access_token.expose(),
			self.client.data.auth_header,
		))
	}

	fn enrich_session<'a>(
		&'a self,
		ctx: &'a RequestContext,
		session: &'a mut SessionState,
	) -> ProviderFuture<'a, Result<()>> {
		match self.profile_mapping.as_ref() {
			Some(mapping) => Box::pin(self.client.enrich_session(ctx, session, mapping)),
			None => Box::pin(async { Ok(()) }),
		}
	}

	fn redeem<'a>(
		&'a self,
		ctx: &'a RequestContext,
		request: &'a RedeemRequest,
	) -> ProviderFuture<'a, Result<SessionState>> {
		Box::pin(self.client.redeem(ctx, request))
	}
}
impl<C, M> Debug for OAuth2Provider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuth2Provider")
			.field("data", &self.client.data)
			.field("profile_mapping", &self.profile_mapping)
			.finish()
	}
}
