//! OAuth client facade and transport error mapping.
//!
//! [`TransportErrorMapper`] turns transport failures into adapter [`Error`] values for every
//! endpoint. The crate-private `BasicFacade` wraps the `oauth2` crate so authorization
//! redirects and code redemption share the merged [`ProviderData`].

pub use oauth2;

// crates.io
use oauth2::{
	AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
	HttpClientError, PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, RequestTokenError, Scope,
	TokenResponse, TokenUrl,
	basic::{BasicClient, BasicRequestTokenError},
};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
	http::{Endpoint, ProviderHttpClient, RequestContext, ResponseMetadata, ResponseMetadataSlot},
	provider::ProviderData,
	session::{SessionState, TokenSecret},
};

type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Maps HTTP transport failures into adapter [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted while calling `endpoint` into an adapter error.
	fn map_transport_error(
		&self,
		endpoint: Endpoint,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		endpoint: Endpoint,
		_metadata: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(endpoint, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) => TransportError::network(endpoint, message).into(),
			_ => TransportError::network(endpoint, "unrecognized HTTP client failure").into(),
		}
	}
}

/// Inputs for the authorization redirect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginRequest {
	/// Callback URL registered with the provider.
	pub redirect_uri: Url,
	/// Opaque CSRF state echoed back by the provider.
	pub state: String,
	/// PKCE verifier; its S256 challenge is attached when present.
	pub code_verifier: Option<String>,
	/// Vendor-specific query parameters (`prompt`, `approval_prompt`, ...).
	pub extra_params: Vec<(String, String)>,
}
impl LoginRequest {
	/// Creates a request for `redirect_uri` carrying `state`.
	pub fn new(redirect_uri: Url, state: impl Into<String>) -> Self {
		Self { redirect_uri, state: state.into(), code_verifier: None, extra_params: Vec::new() }
	}

	/// Attaches a PKCE verifier.
	pub fn with_code_verifier(mut self, verifier: impl Into<String>) -> Self {
		self.code_verifier = Some(verifier.into());

		self
	}

	/// Appends an extra query parameter.
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.extra_params.push((key.into(), value.into()));

		self
	}
}

/// Inputs for an authorization code redemption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedeemRequest {
	/// Authorization code returned to the callback.
	pub code: String,
	/// Callback URL used during login.
	pub redirect_uri: Url,
	/// PKCE verifier matching the login challenge.
	pub code_verifier: Option<String>,
}
impl RedeemRequest {
	/// Creates a redemption for `code`.
	pub fn new(code: impl Into<String>, redirect_uri: Url) -> Self {
		Self { code: code.into(), redirect_uri, code_verifier: None }
	}

	/// Attaches a PKCE verifier.
	pub fn with_code_verifier(mut self, verifier: impl Into<String>) -> Self {
		self.code_verifier = Some(verifier.into());

		self
	}
}

pub(crate) struct BasicFacade {
	oauth_client: ConfiguredBasicClient,
}
impl BasicFacade {
	pub(crate) fn from_data(data: &ProviderData, redirect_uri: Option<&Url>) -> Self {
		let mut oauth_client = BasicClient::new(ClientId::new(data.client_id.clone()))
			.set_auth_uri(AuthUrl::from_url(data.login_url.clone()))
			.set_token_uri(TokenUrl::from_url(data.redeem_url.clone()));

		if let Some(secret) = data.client_secret.as_ref() {
			oauth_client =
				oauth_client.set_client_secret(ClientSecret::new(secret.expose().to_owned()));
		}
		if let Some(redirect) = redirect_uri {
			oauth_client = oauth_client.set_redirect_uri(RedirectUrl::from_url(redirect.clone()));
		}

		Self { oauth_client }
	}

	pub(crate) fn authorize_url(&self, data: &ProviderData, request: &LoginRequest) -> Url {
		let state = request.state.clone();
		let mut authorization = self
			.oauth_client
			.authorize_url(move || CsrfToken::new(state))
			.add_scopes(data.scopes().map(|scope| Scope::new(scope.to_owned())));

		if let Some(verifier) = request.code_verifier.as_ref() {
			let verifier = PkceCodeVerifier::new(verifier.clone());

			authorization = authorization
				.set_pkce_challenge(PkceCodeChallenge::from_code_verifier_sha256(&verifier));
		}
		for (key, value) in &request.extra_params {
			authorization = authorization.add_extra_param(key.as_str(), value.as_str());
		}

		authorization.url().0
	}

	pub(crate) async fn exchange_code<C, M>(
		&self,
		http_client: &C,
		mapper: &M,
		ctx: &RequestContext,
		request: &RedeemRequest,
	) -> Result<SessionState>
	where
		C: ?Sized + ProviderHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		let meta = ResponseMetadataSlot::default();
		let handle = http_client.handle(ctx, meta.clone());
		let mut exchange =
			self.oauth_client.exchange_code(AuthorizationCode::new(request.code.clone()));

		if let Some(verifier) = request.code_verifier.as_ref() {
			exchange = exchange.set_pkce_verifier(PkceCodeVerifier::new(verifier.clone()));
		}

		let response = exchange
			.request_async(&handle)
			.await
			.map_err(|err| map_request_error(meta.take(), err, mapper))?;
		let created_at = OffsetDateTime::now_utc();
		let mut session = SessionState::new(response.access_token().secret().to_owned());

		session.refresh_token =
			response.refresh_token().map(|token| TokenSecret::new(token.secret().to_owned()));
		session.created_at = Some(created_at);
		session.expires_on = response
			.expires_in()
			.and_then(|ttl| Duration::try_from(ttl).ok())
			.and_then(|ttl| created_at.checked_add(ttl));

		Ok(session)
	}
}

fn map_request_error<E, M>(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
	mapper: &M,
) -> Error
where
	E: 'static + Send + Sync + StdError,
	M: ?Sized + TransportErrorMapper<E>,
{
	let status = meta.as_ref().and_then(|value| value.status);

	match err {
		RequestTokenError::ServerResponse(response) => Error::TokenRejected {
			error: response.error().as_ref().to_owned(),
			description: response.error_description().cloned(),
		},
		RequestTokenError::Request(error) =>
			mapper.map_transport_error(Endpoint::Token, meta.as_ref(), error),
		RequestTokenError::Parse(source, _body) => Error::MalformedTokenResponse { source, status },
		RequestTokenError::Other(message) => match status {
			Some(status) if !(200..300).contains(&status) => Error::UpstreamRejected {
				endpoint: Endpoint::Token,
				status,
				retry_after: meta.and_then(|value| value.retry_after),
			},
			_ => Error::UnexpectedTokenResponse { message, status },
		},
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(endpoint: Endpoint, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransportError::Timeout { endpoint }.into();
	}

	TransportError::network(endpoint, err).into()
}
