// self
use crate::{
	_prelude::*,
	error::ConfigError,
	provider::{AuthHeaderMode, ProviderData, ProviderKind},
	session::TokenSecret,
};

/// Canonical values an adapter declares for its vendor.
///
/// Adapters own these tables as `const` items; the merger only reads them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProviderDefaults {
	/// Display name.
	pub name: &'static str,
	/// Authorization endpoint.
	pub login_url: Option<&'static str>,
	/// Token endpoint.
	pub redeem_url: Option<&'static str>,
	/// Userinfo endpoint; `None` keeps the validate URL fallback.
	pub profile_url: Option<&'static str>,
	/// Liveness endpoint.
	pub validate_url: Option<&'static str>,
	/// Scope requested during login.
	pub scope: &'static str,
}

/// Partially specified provider configuration as loaded from the proxy's config file.
///
/// Every endpoint, the scope, and the name may be absent or blank; blank counts as unset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
	/// Adapter kind selecting the vendor dialect.
	pub provider: ProviderKind,
	/// Display name override.
	pub name: Option<String>,
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret for confidential clients.
	pub client_secret: Option<String>,
	/// Authorization endpoint override.
	pub login_url: Option<String>,
	/// Token endpoint override.
	pub redeem_url: Option<String>,
	/// Liveness endpoint override.
	pub validate_url: Option<String>,
	/// Userinfo endpoint override.
	pub profile_url: Option<String>,
	/// Scope override.
	pub scope: Option<String>,
	/// How the access token is presented upstream.
	pub auth_header: AuthHeaderMode,
}
impl ProviderConfig {
	/// Creates an otherwise empty configuration for `client_id`.
	pub fn new(provider: ProviderKind, client_id: impl Into<String>) -> Self {
		Self { provider, client_id: client_id.into(), ..Default::default() }
	}

	/// Sets the client secret.
	pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(secret.into());

		self
	}

	/// Overrides the display name.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());

		self
	}

	/// Overrides the authorization endpoint.
	pub fn with_login_url(mut self, url: impl Into<String>) -> Self {
		self.login_url = Some(url.into());

		self
	}

	/// Overrides the token endpoint.
	pub fn with_redeem_url(mut self, url: impl Into<String>) -> Self {
		self.redeem_url = Some(url.into());

		self
	}

	/// Overrides the liveness endpoint.
	pub fn with_validate_url(mut self, url: impl Into<String>) -> Self {
		self.validate_url = Some(url.into());

		self
	}

	/// Overrides the userinfo endpoint.
	pub fn with_profile_url(mut self, url: impl Into<String>) -> Self {
		self.profile_url = Some(url.into());

		self
	}

	/// Overrides the scope.
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}

	/// Overrides the header construction mode.
	pub fn with_auth_header(mut self, mode: AuthHeaderMode) -> Self {
		self.auth_header = mode;

		self
	}

	/// Fills every unset field from `defaults`, leaving explicit values untouched.
	pub fn set_defaults(&mut self, defaults: &ProviderDefaults) {
		fill(&mut self.name, Some(defaults.name));
		fill(&mut self.login_url, defaults.login_url);
		fill(&mut self.redeem_url, defaults.redeem_url);
		fill(&mut self.profile_url, defaults.profile_url);
		fill(&mut self.validate_url, defaults.validate_url);
		fill(&mut self.scope, Some(defaults.scope));
	}

	/// Parses the merged configuration into immutable [`ProviderData`].
	pub fn build(self) -> Result<ProviderData, ConfigError> {
		let name = self.name.filter(|name| !is_blank(name)).unwrap_or_else(|| "OAuth2".into());

		if is_blank(&self.client_id) {
			return Err(ConfigError::MissingClientId);
		}

		let login_url = required_url(&name, "login", self.login_url.as_deref())?;
		let redeem_url = required_url(&name, "redeem", self.redeem_url.as_deref())?;
		let validate_url = required_url(&name, "validate", self.validate_url.as_deref())?;
		let profile_url = optional_url("profile", self.profile_url.as_deref())?;

		Ok(ProviderData {
			name,
			client_id: self.client_id.trim().to_owned(),
			client_secret: self.client_secret.filter(|s| !s.is_empty()).map(TokenSecret::new),
			login_url,
			redeem_url,
			validate_url,
			profile_url,
			scope: self.scope.unwrap_or_default(),
			auth_header: self.auth_header,
		})
	}
}

fn is_blank(value: &str) -> bool {
	value.trim().is_empty()
}

fn fill(slot: &mut Option<String>, default: Option<&'static str>) {
	if slot.as_deref().is_none_or(is_blank) {
		*slot = default.map(str::to_owned);
	}
}

fn required_url(
	provider: &str,
	endpoint: &'static str,
	value: Option<&str>,
) -> Result<Url, ConfigError> {
	optional_url(endpoint, value)?
		.ok_or_else(|| ConfigError::MissingEndpoint { provider: provider.to_owned(), endpoint })
}

fn optional_url(endpoint: &'static str, value: Option<&str>) -> Result<Option<Url>, ConfigError> {
	match value.map(str::trim).filter(|value| !value.is_empty()) {
		Some(raw) => Url::parse(raw)
			.map(Some)
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint, source }),
		None => Ok(None),
	}
}
