// crates.io
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	http::{Endpoint, ProviderHttpClient, RequestContext},
	oauth::TransportErrorMapper,
	obs::{self, Operation, OperationSpan, Outcome},
	protocol::ProviderClient,
	session::SessionState,
};

/// JSON object returned by a profile endpoint.
///
/// Payloads are vendor-specific, so they stay schema-agnostic and are read through a
/// [`ProfileMapping`].
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileDocument {
	endpoint: Endpoint,
	fields: Map<String, Value>,
}
impl ProfileDocument {
	/// Parses `body` as a JSON object.
	pub fn from_slice(endpoint: Endpoint, body: &[u8]) -> Result<Self> {
		let fields = serde_json::from_slice(body)
			.map_err(|source| Error::MalformedResponse { endpoint, source })?;

		Ok(Self { endpoint, fields })
	}

	/// Raw access to a claim.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.fields.get(key)
	}

	/// Returns the string claim `key` or [`Error::MissingField`].
	pub fn required_str(&self, key: &str) -> Result<&str> {
		self.optional_str(key)
			.ok_or_else(|| Error::MissingField { endpoint: self.endpoint, field: key.to_owned() })
	}

	/// Returns the string claim `key`, or `None` when it is absent or not a string.
	pub fn optional_str(&self, key: &str) -> Option<&str> {
		self.fields.get(key).and_then(Value::as_str)
	}
}

/// How the session email is derived.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailPolicy {
	/// `<user>@<domain>` for vendors with no email concept. Callers needing real addresses
	/// must pick another policy.
	Synthesize {
		/// Placeholder domain appended to the user identifier.
		domain: String,
	},
	/// Copy an optional string claim; absence leaves the email untouched.
	Claim {
		/// Claim key holding the address.
		key: String,
	},
	/// Never touch the email.
	Skip,
}

/// Claim keys and email policy used to populate a [`SessionState`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMapping {
	/// Required claim holding the user identifier.
	pub user_claim: String,
	/// Optional claim holding the preferred username.
	pub preferred_username_claim: String,
	/// Email derivation policy.
	pub email: EmailPolicy,
}
impl ProfileMapping {
	/// Applies the mapping, mutating `session` only when every required claim is present.
	pub fn apply(&self, document: &ProfileDocument, session: &mut SessionState) -> Result<()> {
		let user = document.required_str(&self.user_claim)?;
		let email = match &self.email {
			EmailPolicy::Synthesize { domain } => Some(format!("{user}@{domain}")),
			EmailPolicy::Claim { key } => document.optional_str(key).map(str::to_owned),
			EmailPolicy::Skip => None,
		};

		if let Some(email) = email {
			session.email = Some(email);
		}
		if let Some(preferred) = document.optional_str(&self.preferred_username_claim) {
			session.preferred_username = Some(preferred.to_owned());
		}

		session.user = Some(user.to_owned());

		Ok(())
	}
}
impl Default for ProfileMapping {
	fn default() -> Self {
		Self {
			user_claim: "sub".into(),
			preferred_username_claim: "preferred_username".into(),
			email: EmailPolicy::Claim { key: "email".into() },
		}
	}
}

impl<C, M> ProviderClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Fetches the profile document, falling back to the validate URL when no profile URL is
	/// configured.
	pub async fn fetch_profile(
		&self,
		ctx: &RequestContext,
		access_token: &str,
	) -> Result<ProfileDocument> {
		let url = self.data.profile_endpoint();
		let body =
			self.get(ctx, Endpoint::Profile, url, access_token, self.data.auth_header).await?;

		ProfileDocument::from_slice(Endpoint::Profile, &body)
	}

	/// Populates `session` from the profile endpoint according to `mapping`.
	pub async fn enrich_session(
		&self,
		ctx: &RequestContext,
		session: &mut SessionState,
		mapping: &ProfileMapping,
	) -> Result<()> {
		const OPERATION: Operation = Operation::Enrich;

		let provider = self.data.name.as_str();
		let span = OperationSpan::new(OPERATION, provider, ctx);

		obs::record_outcome(OPERATION, provider, Outcome::Attempt);

		let result = span
			.instrument(async {
				let document = self.fetch_profile(ctx, session.access_token.expose()).await?;

				mapping.apply(&document, session)
			})
			.await;

		match &result {
			Ok(()) => obs::record_outcome(OPERATION, provider, Outcome::Success),
			Err(err) => {
				obs::log_failure(OPERATION, err);
				obs::record_outcome(OPERATION, provider, Outcome::Failure);
			},
		}

		result
	}
}
