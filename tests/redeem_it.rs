mod common;

// std
use std::collections::HashMap;
// crates.io
use httpmock::prelude::*;
// self
use common::*;
use idp_adapter::{
	error::{Error, ErrorKind},
	http::RequestContext,
	oauth::{LoginRequest, RedeemRequest},
	provider::Provider,
	url::Url,
};

fn callback() -> Url {
	Url::parse("https://proxy.example.com/oauth2/callback").expect("Callback URL should parse.")
}

#[tokio::test]
async fn redeem_builds_session_with_tokens_and_expiry() {
	let server = MockServer::start_async().await;
	let provider = build_jupyterhub(jupyterhub_config(&server));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.header("content-type", "application/x-www-form-urlencoded")
				.body_includes("grant_type=authorization_code")
				.body_includes("code=auth-code");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"hub-access\",\"refresh_token\":\"hub-refresh\",\"token_type\":\"bearer\",\"expires_in\":3600}",
			);
		})
		.await;
	let session = provider
		.redeem(&RequestContext::new(), &RedeemRequest::new("auth-code", callback()))
		.await
		.expect("Authorization code redemption should succeed.");

	mock.assert_async().await;

	assert_eq!(session.access_token.expose(), "hub-access");
	assert_eq!(session.refresh_token.as_ref().map(|token| token.expose()), Some("hub-refresh"));
	assert!(session.user.is_none());

	let created_at = session.created_at.expect("Redeemed sessions should carry a creation time.");
	let expires_on = session.expires_on.expect("`expires_in` should produce an expiry.");

	assert_eq!(expires_on - created_at, time::Duration::hours(1));
	assert!(!session.is_expired_at(created_at));
}

#[tokio::test]
async fn redeem_classifies_invalid_grant() {
	let server = MockServer::start_async().await;
	let provider = build_jupyterhub(jupyterhub_config(&server));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_grant\",\"error_description\":\"already used\"}");
		})
		.await;
	let err = provider
		.redeem(&RequestContext::new(), &RedeemRequest::new("stale-code", callback()))
		.await
		.expect_err("Reused codes should be rejected.");

	assert_eq!(err.kind(), ErrorKind::TokenRejected);
	assert!(matches!(
		err,
		Error::TokenRejected { ref error, description: Some(ref description) }
			if error == "invalid_grant" && description == "already used"
	));

	mock.assert_async().await;
}

#[tokio::test]
async fn redeem_rejects_token_response_without_access_token() {
	let server = MockServer::start_async().await;
	let provider = build_jupyterhub(jupyterhub_config(&server));
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"token_type\":\"bearer\",\"expires_in\":60}");
		})
		.await;
	let err = provider
		.redeem(&RequestContext::new(), &RedeemRequest::new("code", callback()))
		.await
		.expect_err("Token responses without an access token are malformed.");

	assert_eq!(err.kind(), ErrorKind::MalformedResponse);
	assert!(matches!(err, Error::MalformedTokenResponse { status: Some(200), .. }));
}

#[tokio::test]
async fn redeem_tolerates_out_of_range_expiry() {
	let server = MockServer::start_async().await;
	let provider = build_jupyterhub(jupyterhub_config(&server));
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"far-future\",\"token_type\":\"bearer\",\"expires_in\":9223372036854775807}",
			);
		})
		.await;
	let session = provider
		.redeem(&RequestContext::new(), &RedeemRequest::new("code", callback()))
		.await
		.expect("An unrepresentable expiry should not fail redemption.");

	assert_eq!(session.access_token.expose(), "far-future");
	assert!(session.created_at.is_some());
	assert!(session.expires_on.is_none());
}

#[tokio::test]
async fn redeem_reports_non_json_success_as_unexpected_response() {
	let server = MockServer::start_async().await;
	let provider = build_jupyterhub(jupyterhub_config(&server));
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "text/html").body("<html>login</html>");
		})
		.await;
	let err = provider
		.redeem(&RequestContext::new(), &RedeemRequest::new("code", callback()))
		.await
		.expect_err("HTML token responses must fail redemption.");

	assert_eq!(err.kind(), ErrorKind::MalformedResponse);
	assert!(matches!(err, Error::UnexpectedTokenResponse { status: Some(200), .. }));
}

#[tokio::test]
async fn redeem_reports_empty_failure_as_upstream_rejection() {
	let server = MockServer::start_async().await;
	let provider = build_jupyterhub(jupyterhub_config(&server));
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(502).header("retry-after", "30");
		})
		.await;
	let err = provider
		.redeem(&RequestContext::new(), &RedeemRequest::new("code", callback()))
		.await
		.expect_err("Gateway errors must fail redemption.");

	assert_eq!(err.kind(), ErrorKind::UpstreamRejected);
	assert!(matches!(
		err,
		Error::UpstreamRejected { status: 502, retry_after: Some(hint), .. }
			if hint == time::Duration::seconds(30)
	));
}

#[tokio::test]
async fn redeem_forwards_pkce_verifier() {
	let server = MockServer::start_async().await;
	let provider = build_jupyterhub(jupyterhub_config(&server));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH).body_includes("code_verifier=verifier-0123");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"pkce-access\",\"token_type\":\"bearer\"}");
		})
		.await;
	let request = RedeemRequest::new("code", callback()).with_code_verifier("verifier-0123");
	let session = provider
		.redeem(&RequestContext::new(), &request)
		.await
		.expect("PKCE redemption should succeed.");

	mock.assert_async().await;

	assert_eq!(session.access_token.expose(), "pkce-access");
	assert!(session.refresh_token.is_none());
	assert!(session.expires_on.is_none());
}

#[test]
fn authorize_url_uses_merged_login_endpoint() {
	let server = MockServer::start();
	let provider = build_jupyterhub(jupyterhub_config(&server));
	let url = provider.authorize_url(&LoginRequest::new(callback(), "state-1"));
	let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();

	assert_eq!(url.path(), AUTHORIZE_PATH);
	assert_eq!(pairs.get("client_id"), Some(&CLIENT_ID.into()));
	assert_eq!(pairs.get("scope"), Some(&"identify".into()));
	assert_eq!(pairs.get("state"), Some(&"state-1".into()));
	assert_eq!(pairs.get("response_type"), Some(&"code".into()));
}
