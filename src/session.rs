//! Per-principal session record shared between the proxy pipeline and adapters.

// self
use crate::_prelude::*;

/// Redacted secret wrapper keeping tokens and client secrets out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns true when the secret is the empty string.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Authenticated principal as seen by the proxy.
///
/// Created by redemption (or restored by the session store), read by validation, and
/// mutated only by enrichment. Identity fields stay `None` until an adapter fills them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
	/// Bearer credential presented to the identity provider.
	pub access_token: TokenSecret,
	/// Refresh credential, when the provider issued one.
	pub refresh_token: Option<TokenSecret>,
	/// Email address (native or synthesized).
	pub email: Option<String>,
	/// Stable user identifier.
	pub user: Option<String>,
	/// Advisory display handle.
	pub preferred_username: Option<String>,
	/// Instant the token was issued.
	pub created_at: Option<OffsetDateTime>,
	/// Instant the access token stops being valid.
	pub expires_on: Option<OffsetDateTime>,
}
impl SessionState {
	/// Creates a session carrying only an access token.
	pub fn new(access_token: impl Into<String>) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: None,
			email: None,
			user: None,
			preferred_username: None,
			created_at: None,
			expires_on: None,
		}
	}

	/// Attaches a refresh token.
	pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
		self.refresh_token = Some(TokenSecret::new(refresh_token));

		self
	}

	/// Returns true when `expires_on` is known and not after `now`.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		self.expires_on.is_some_and(|expires_on| expires_on <= now)
	}

	/// Time elapsed since the token was issued, when known.
	pub fn age_at(&self, now: OffsetDateTime) -> Option<Duration> {
		self.created_at.map(|created_at| now - created_at)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let session = SessionState::new("super-secret").with_refresh_token("also-secret");
		let rendered = format!("{session:?}");

		assert!(!rendered.contains("super-secret"));
		assert!(!rendered.contains("also-secret"));
		assert_eq!(format!("{}", session.access_token), "<redacted>");
		assert_eq!(session.access_token.expose(), "super-secret");
	}

	#[test]
	fn expiry_and_age_use_timestamps() {
		let issued = datetime!(2025-01-01 00:00 UTC);
		let mut session = SessionState::new("token");

		assert!(!session.is_expired_at(issued));
		assert_eq!(session.age_at(issued), None);

		session.created_at = Some(issued);
		session.expires_on = Some(issued + Duration::hours(1));

		assert!(!session.is_expired_at(issued + Duration::minutes(59)));
		assert!(session.is_expired_at(issued + Duration::hours(1)));
		assert_eq!(session.age_at(issued + Duration::minutes(5)), Some(Duration::minutes(5)));
	}

	#[test]
	fn serde_keeps_secrets_as_plain_strings() {
		let session = SessionState::new("abc");
		let payload = serde_json::to_value(&session).expect("Session should serialize.");

		assert_eq!(payload["access_token"], "abc");

		let restored: SessionState =
			serde_json::from_value(payload).expect("Session should deserialize.");

		assert_eq!(restored, session);
	}
}
