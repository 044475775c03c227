// self
use crate::_prelude::*;

/// How an access token is presented to the identity provider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthHeaderMode {
	#[default]
	/// `Authorization: Bearer <token>`.
	Bearer,
	/// `Authorization: token <token>`, used by GitHub-style APIs.
	Token,
	/// `?access_token=<token>` on the request URL, no header.
	QueryParameter,
}
impl AuthHeaderMode {
	/// Returns the target URL and optional `Authorization` value for `token`.
	pub fn apply(self, url: &Url, token: &str) -> (Url, Option<String>) {
		match self {
			AuthHeaderMode::Bearer => (url.clone(), Some(format!("Bearer {token}"))),
			AuthHeaderMode::Token => (url.clone(), Some(format!("token {token}"))),
			AuthHeaderMode::QueryParameter => {
				let mut url = url.clone();

				url.query_pairs_mut().append_pair("access_token", token);

				(url, None)
			},
		}
	}
}
