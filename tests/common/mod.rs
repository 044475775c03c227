#![allow(dead_code)]

// crates.io
use httpmock::MockServer;
// self
use idp_adapter::{
	http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper,
	provider::{JupyterHubProvider, ProviderConfig, ProviderKind},
};

pub const CLIENT_ID: &str = "hub-client";
pub const CLIENT_SECRET: &str = "hub-secret";
pub const USER_PATH: &str = "/hub/api/user";
pub const TOKEN_PATH: &str = "/hub/api/oauth2/token";
pub const AUTHORIZE_PATH: &str = "/hub/api/oauth2/authorize";

/// JupyterHub adapter on the default reqwest transport.
pub type ReqwestJupyterHub = JupyterHubProvider<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// JupyterHub configuration whose endpoints point at `server`; profile URL left unset.
pub fn jupyterhub_config(server: &MockServer) -> ProviderConfig {
	ProviderConfig::new(ProviderKind::JupyterHub, CLIENT_ID)
		.with_client_secret(CLIENT_SECRET)
		.with_login_url(server.url(AUTHORIZE_PATH))
		.with_redeem_url(server.url(TOKEN_PATH))
		.with_validate_url(server.url(USER_PATH))
}

/// Builds a JupyterHub adapter, panicking on configuration errors.
pub fn build_jupyterhub(config: ProviderConfig) -> ReqwestJupyterHub {
	JupyterHubProvider::new(config).expect("JupyterHub test provider should build.")
}

/// Endpoint on a port nothing listens on.
pub fn unreachable_url(path: &str) -> String {
	format!("http://127.0.0.1:1{path}")
}
