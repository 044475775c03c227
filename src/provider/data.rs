// self
use crate::{
	_prelude::*,
	oauth::{BasicFacade, LoginRequest},
	provider::AuthHeaderMode,
	session::TokenSecret,
};

/// Merged, immutable provider configuration shared by every request.
///
/// Login, redeem, and validate URLs are always present once built; a missing profile URL
/// means enrichment falls back to the validate URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderData {
	/// Display name.
	pub name: String,
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret for confidential clients.
	pub client_secret: Option<TokenSecret>,
	/// Authorization endpoint.
	pub login_url: Url,
	/// Token endpoint.
	pub redeem_url: Url,
	/// Liveness endpoint.
	pub validate_url: Url,
	/// Userinfo endpoint, when distinct from the validate URL.
	pub profile_url: Option<Url>,
	/// Whitespace-separated scope requested during login.
	pub scope: String,
	/// How access tokens are presented upstream.
	pub auth_header: AuthHeaderMode,
}
impl ProviderData {
	/// Endpoint used for enrichment: the profile URL, else the validate URL.
	pub fn profile_endpoint(&self) -> &Url {
		self.profile_url.as_ref().unwrap_or(&self.validate_url)
	}

	/// Scope split into individual values.
	pub fn scopes(&self) -> impl Iterator<Item = &str> {
		self.scope.split_whitespace()
	}

	/// Builds the authorization redirect URL for `request`.
	pub fn authorize_url(&self, request: &LoginRequest) -> Url {
		BasicFacade::from_data(self, Some(&request.redirect_uri)).authorize_url(self, request)
	}
}
