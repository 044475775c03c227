//! Adapter-level error types shared by validation, enrichment, and redemption.

// self
use crate::{_prelude::*, http::Endpoint};

/// Adapter-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical adapter error exposed by public APIs.
///
/// Validation never returns this type; it folds every variant into `false`.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Identity provider answered with a non-success status.
	#[error("The {endpoint} endpoint rejected the request with HTTP {status}.")]
	UpstreamRejected {
		/// Endpoint that produced the response.
		endpoint: Endpoint,
		/// HTTP status code returned upstream.
		status: u16,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Response body could not be parsed as the expected JSON document.
	#[error("The {endpoint} endpoint returned a malformed response body.")]
	MalformedResponse {
		/// Endpoint that produced the response.
		endpoint: Endpoint,
		/// Underlying JSON failure.
		#[source]
		source: serde_json::Error,
	},
	/// Token endpoint responded with JSON that does not match the OAuth token schema.
	#[error("Token endpoint returned malformed JSON.")]
	MalformedTokenResponse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint answered in a shape the OAuth client cannot read (wrong content type,
	/// empty body).
	#[error("Token endpoint returned an unexpected response: {message}")]
	UnexpectedTokenResponse {
		/// Description reported by the OAuth client.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// A required identity field is absent or not a string.
	#[error("Unable to extract `{field}` from the {endpoint} endpoint response.")]
	MissingField {
		/// Endpoint whose document lacked the field.
		endpoint: Endpoint,
		/// Claim key that was looked up.
		field: String,
	},
	/// Token endpoint returned an OAuth error for the redemption.
	#[error("Token endpoint rejected the grant: {error}.")]
	TokenRejected {
		/// OAuth `error` code.
		error: String,
		/// Optional `error_description`.
		description: Option<String>,
	},
}
impl Error {
	/// Classifies the error into the coarse taxonomy used by proxy logging.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Config(_) => ErrorKind::Config,
			Self::Transport(_) => ErrorKind::TransportFailure,
			Self::UpstreamRejected { .. } => ErrorKind::UpstreamRejected,
			Self::MalformedResponse { .. }
			| Self::MalformedTokenResponse { .. }
			| Self::UnexpectedTokenResponse { .. } => ErrorKind::MalformedResponse,
			Self::MissingField { .. } => ErrorKind::MissingRequiredField,
			Self::TokenRejected { .. } => ErrorKind::TokenRejected,
		}
	}
}

/// Coarse failure categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Configuration or request-construction failure.
	Config,
	/// Network, DNS, TLS, timeout, or I/O failure.
	TransportFailure,
	/// Upstream returned a non-2xx status.
	UpstreamRejected,
	/// Upstream body did not parse.
	MalformedResponse,
	/// Enrichment could not find a required identity field.
	MissingRequiredField,
	/// Token endpoint refused the authorization code.
	TokenRejected,
}

/// Configuration and validation failures raised while constructing adapters.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// A configured endpoint is not a valid absolute URL.
	#[error("The {endpoint} URL is invalid.")]
	InvalidEndpoint {
		/// Which endpoint failed to parse.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A required endpoint has neither a user value nor an adapter default.
	#[error("Provider `{provider}` has no {endpoint} URL configured.")]
	MissingEndpoint {
		/// Provider display name.
		provider: String,
		/// Missing endpoint label.
		endpoint: &'static str,
	},
	/// Client identifier is blank.
	#[error("Client ID must not be empty.")]
	MissingClientId,
	/// Provider kind string is not recognized.
	#[error("Unknown provider kind `{0}`.")]
	UnknownProvider(String),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {endpoint} endpoint.")]
	Network {
		/// Endpoint being called.
		endpoint: Endpoint,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request exceeded the caller's deadline.
	#[error("Request to the {endpoint} endpoint timed out.")]
	Timeout {
		/// Endpoint being called.
		endpoint: Endpoint,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the identity provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(endpoint: Endpoint, src: impl Into<BoxError>) -> Self {
		Self::Network { endpoint, source: src.into() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn kinds_follow_taxonomy() {
		let missing = Error::MissingField { endpoint: Endpoint::Profile, field: "name".into() };

		assert_eq!(missing.kind(), ErrorKind::MissingRequiredField);
		assert_eq!(
			missing.to_string(),
			"Unable to extract `name` from the profile endpoint response."
		);

		let rejected = Error::UpstreamRejected {
			endpoint: Endpoint::Validate,
			status: 401,
			retry_after: None,
		};

		assert_eq!(rejected.kind(), ErrorKind::UpstreamRejected);

		let timeout: Error = TransportError::Timeout { endpoint: Endpoint::Profile }.into();

		assert_eq!(timeout.kind(), ErrorKind::TransportFailure);
		assert_eq!(Error::from(ConfigError::MissingClientId).kind(), ErrorKind::Config);

		let unexpected =
			Error::UnexpectedTokenResponse { message: "empty body".into(), status: Some(200) };

		assert_eq!(unexpected.kind(), ErrorKind::MalformedResponse);
	}

	#[test]
	fn transport_errors_keep_their_source() {
		let err = TransportError::network(Endpoint::Validate, "connection reset");
		let source = StdError::source(&err).expect("Network errors should expose a source.");

		assert_eq!(source.to_string(), "connection reset");
	}
}
