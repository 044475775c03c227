//! Provider contract, shared configuration model, and concrete adapters.
//!
//! `config` holds user input plus the defaults merger, `data` the merged and immutable
//! [`ProviderData`]. [`Provider`] is the only surface the proxy core depends on; each adapter
//! (`generic`, `jupyterhub`) composes a [`ProviderClient`] and decides which claims to read.

/// User-facing provider configuration and the per-adapter defaults merger.
pub mod config;
/// Merged, immutable provider data shared by every request.
pub mod data;
/// Plain OAuth 2.0 adapter configured entirely by the user.
pub mod generic;
/// Access token presentation modes.
pub mod header;
/// JupyterHub adapter.
pub mod jupyterhub;

pub use config::*;
pub use data::*;
pub use generic::*;
pub use header::*;
pub use jupyterhub::*;

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	http::{ProviderHttpClient, RequestContext},
	oauth::{LoginRequest, RedeemRequest, TransportErrorMapper},
	session::SessionState,
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

/// Boxed future returned by [`Provider`] operations.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a + Send>>;

/// Capability set every identity-provider adapter satisfies.
///
/// Implementations are shared across request-handling tasks, hence `Send + Sync`.
/// `validate_session` never fails: every error becomes `false`. `enrich_session` is terminal
/// for a login attempt and surfaces failures to the caller.
pub trait Provider
where
	Self: Send + Sync,
{
	/// Merged configuration.
	fn data(&self) -> &ProviderData;

	/// Checks whether the session's access token is still accepted upstream.
	fn validate_session<'a>(
		&'a self,
		ctx: &'a RequestContext,
		session: &'a SessionState,
	) -> ProviderFuture<'a, bool>;

	/// Populates identity fields on `session`.
	fn enrich_session<'a>(
		&'a self,
		ctx: &'a RequestContext,
		session: &'a mut SessionState,
	) -> ProviderFuture<'a, Result<()>>;

	/// Exchanges an authorization code for a new session.
	fn redeem<'a>(
		&'a self,
		ctx: &'a RequestContext,
		request: &'a RedeemRequest,
	) -> ProviderFuture<'a, Result<SessionState>>;

	/// Builds the authorization redirect URL.
	fn authorize_url(&self, request: &LoginRequest) -> Url {
		self.data().authorize_url(request)
	}
}

/// Vendor dialect selected by configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
	#[default]
	/// Plain OAuth 2.0 provider configured entirely by the user.
	OAuth2,
	/// JupyterHub's OAuth provider.
	JupyterHub,
}
impl ProviderKind {
	/// Returns the configuration label.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProviderKind::OAuth2 => "oauth2",
			ProviderKind::JupyterHub => "jupyterhub",
		}
	}
}
impl Display for ProviderKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for ProviderKind {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"oauth2" => Ok(ProviderKind::OAuth2),
			"jupyterhub" => Ok(ProviderKind::JupyterHub),
			other => Err(ConfigError::UnknownProvider(other.to_owned())),
		}
	}
}

/// Builds the adapter selected by `config.provider` on top of a caller-provided transport.
pub fn new_provider_with_http_client<C, M>(
	config: ProviderConfig,
	http_client: impl Into<Arc<C>>,
	mapper: impl Into<Arc<M>>,
) -> Result<Box<dyn Provider>>
where
	C: ProviderHttpClient,
	M: TransportErrorMapper<C::TransportError>,
{
	let provider: Box<dyn Provider> = match config.provider {
		ProviderKind::OAuth2 =>
			Box::new(OAuth2Provider::<C, M>::with_http_client(config, http_client, mapper)?),
		ProviderKind::JupyterHub =>
			Box::new(JupyterHubProvider::<C, M>::with_http_client(config, http_client, mapper)?),
	};

	Ok(provider)
}

/// Builds the adapter selected by `config.provider` with the default reqwest transport.
#[cfg(feature = "reqwest")]
pub fn new_provider(config: ProviderConfig) -> Result<Box<dyn Provider>> {
	new_provider_with_http_client::<ReqwestHttpClient, ReqwestTransportErrorMapper>(
		config,
		ReqwestHttpClient::default(),
		ReqwestTransportErrorMapper,
	)
}
