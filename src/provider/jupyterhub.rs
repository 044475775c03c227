// self
use crate::{
	_prelude::*,
	http::{ProviderHttpClient, RequestContext},
	oauth::{RedeemRequest, TransportErrorMapper},
	protocol::{EmailPolicy, ProfileMapping, ProviderClient},
	provider::{Provider, ProviderConfig, ProviderData, ProviderDefaults, ProviderFuture},
	session::SessionState,
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

/// Canonical JupyterHub endpoints; the hub's internal API listens on port 8000.
pub const JUPYTERHUB_DEFAULTS: ProviderDefaults = ProviderDefaults {
	name: "JupyterHub",
	login_url: Some("https://jupyterhub.example.com/hub/api/oauth2/authorize"),
	redeem_url: Some("http://internal.jupyterhub.example.com:8000/hub/api/oauth2/token"),
	profile_url: None,
	validate_url: Some("http://internal.jupyterhub.example.com:8000/hub/api/user"),
	scope: "identify",
};

/// Placeholder domain used for synthesized addresses.
pub const JUPYTERHUB_EMAIL_DOMAIN: &str = "example.com";

/// Adapter for JupyterHub's OAuth provider.
///
/// JupyterHub exposes the user model at `/hub/api/user`, which doubles as validate and
/// profile endpoint. The hub has no email concept, so the adapter synthesizes one from the
/// user name unless another [`EmailPolicy`] is configured.
pub struct JupyterHubProvider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	client: ProviderClient<C, M>,
	mapping: ProfileMapping,
}
impl<C, M> JupyterHubProvider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Merges [`JUPYTERHUB_DEFAULTS`] into `config` and builds the adapter on the given
	/// transport.
	pub fn with_http_client(
		mut config: ProviderConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		config.set_defaults(&JUPYTERHUB_DEFAULTS);

		let data = config.build()?;

		Ok(Self {
			client: ProviderClient::with_http_client(data, http_client, mapper),
			mapping: Self::default_mapping(),
		})
	}

	/// `name` is required, `preferred_username` advisory, email synthesized.
	pub fn default_mapping() -> ProfileMapping {
		ProfileMapping {
			user_claim: "name".into(),
			preferred_username_claim: "preferred_username".into(),
			email: EmailPolicy::Synthesize { domain: JUPYTERHUB_EMAIL_DOMAIN.into() },
		}
	}

	/// Replaces the email policy.
	pub fn with_email_policy(mut self, policy: EmailPolicy) -> Self {
		self.mapping.email = policy;

		self
	}

	/// Profile mapping in effect.
	pub fn mapping(&self) -> &ProfileMapping {
		&self.mapping
	}

	/// Underlying protocol client.
	pub fn client(&self) -> &ProviderClient<C, M> {
		&self.client
	}
}
#[cfg(feature = "reqwest")]
impl JupyterHubProvider<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Builds the adapter on the default reqwest transport.
	pub fn new(config: ProviderConfig) -> Result<Self> {
		Self::with_http_client(config, ReqwestHttpClient::default(), ReqwestTransportErrorMapper)
	}
}
impl<C, M> Provider for JupyterHubProvider<C, M>
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
		Box::pin(self.client.enrich_session(ctx, session, &self.mapping))
	}

	fn redeem<'a>(
		&'a self,
		ctx: &'a RequestContext,
		request: &'a RedeemRequest,
	) -> ProviderFuture<'a, Result<SessionState>> {
		Box::pin(self.client.redeem(ctx, request))
	}
}
impl<C, M> Debug for JupyterHubProvider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("JupyterHubProvider")
			.field("data", &self.client.data)
			.field("mapping", &self.mapping)
			.finish()
	}
}
