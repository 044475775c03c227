mod common;

// crates.io
use httpmock::prelude::*;
// self
use common::*;
use idp_adapter::{
	error::{Error, ErrorKind, TransportError},
	http::{Endpoint, RequestContext},
	protocol::{EmailPolicy, ProfileMapping},
	provider::{OAuth2Provider, Provider, ProviderConfig, ProviderKind},
	session::SessionState,
};

#[tokio::test]
async fn populates_identity_from_validate_url_fallback() -> color_eyre::Result<()> {
	let server = MockServer::start_async().await;
	let provider = build_jupyterhub(jupyterhub_config(&server));
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(USER_PATH).header("authorization", "Bearer alice-token");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"kind":"user","name":"alice","preferred_username":"a.liu"}"#);
		})
		.await;
	let mut session = SessionState::new("alice-token");

	assert!(provider.data().profile_url.is_none());

	provider.enrich_session(&RequestContext::new(), &mut session).await?;

	assert_eq!(session.user.as_deref(), Some("alice"));
	assert_eq!(session.email.as_deref(), Some("alice@example.com"));
	assert_eq!(session.preferred_username.as_deref(), Some("a.liu"));

	mock.assert_async().await;

	Ok(())
}

#[tokio::test]
async fn explicit_profile_url_wins_over_validate_url() {
	let server = MockServer::start_async().await;
	let provider =
		build_jupyterhub(jupyterhub_config(&server).with_profile_url(server.url("/hub/api/me")));
	let profile = server
		.mock_async(|when, then| {
			when.method(GET).path("/hub/api/me");
			then.status(200).body(r#"{"name":"carol"}"#);
		})
		.await;
	let validate = server
		.mock_async(|when, then| {
			when.method(GET).path(USER_PATH);
			then.status(200).body(r#"{"name":"wrong"}"#);
		})
		.await;
	let mut session = SessionState::new("carol-token");

	provider
		.enrich_session(&RequestContext::new(), &mut session)
		.await
		.expect("Profile endpoint should enrich the session.");

	assert_eq!(session.user.as_deref(), Some("carol"));

	profile.assert_async().await;
	validate.assert_calls_async(0).await;
}

#[tokio::test]
async fn missing_name_fails_and_leaves_session_untouched() {
	let server = MockServer::start_async().await;
	let provider = build_jupyterhub(jupyterhub_config(&server));
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path(USER_PATH);
			then.status(200).body(r#"{"preferred_username":"nobody"}"#);
		})
		.await;
	let mut session = SessionState::new("token");
	let err = provider
		.enrich_session(&RequestContext::new(), &mut session)
		.await
		.expect_err("A profile without `name` must fail enrichment.");

	assert!(matches!(
		err,
		Error::MissingField { endpoint: Endpoint::Profile, ref field } if field == "name"
	));
	assert!(session.user.is_none());
	assert!(session.email.is_none());
	assert!(session.preferred_username.is_none());
}

#[tokio::test]
async fn absent_preferred_username_keeps_prior_value() {
	let server = MockServer::start_async().await;
	let provider = build_jupyterhub(jupyterhub_config(&server));
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path(USER_PATH);
			then.status(200).body(r#"{"name":"bob"}"#);
		})
		.await;
	let mut session = SessionState::new("token");

	session.preferred_username = Some("bobby".into());

	provider
		.enrich_session(&RequestContext::new(), &mut session)
		.await
		.expect("Profile with only `name` should enrich.");

	assert_eq!(session.user.as_deref(), Some("bob"));
	assert_eq!(session.email.as_deref(), Some("bob@example.com"));
	assert_eq!(session.preferred_username.as_deref(), Some("bobby"));
}

#[tokio::test]
async fn upstream_rejection_surfaces_status_and_retry_hint() {
	let server = MockServer::start_async().await;
	let provider = build_jupyterhub(jupyterhub_config(&server));
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path(USER_PATH);
			then.status(503).header("retry-after", "7").body("busy");
		})
		.await;
	let mut session = SessionState::new("token");
	let err = provider
		.enrich_session(&RequestContext::new(), &mut session)
		.await
		.expect_err("5xx responses must fail enrichment.");

	assert_eq!(err.kind(), ErrorKind::UpstreamRejected);
	assert!(matches!(
		err,
		Error::UpstreamRejected {
			endpoint: Endpoint::Profile,
			status: 503,
			retry_after: Some(hint),
		} if hint == time::Duration::seconds(7)
	));
	assert!(session.user.is_none());
}

#[tokio::test]
async fn malformed_body_is_an_error() {
	let server = MockServer::start_async().await;
	let provider = build_jupyterhub(jupyterhub_config(&server));
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path(USER_PATH);
			then.status(200).body("not json");
		})
		.await;
	let err = provider
		.enrich_session(&RequestContext::new(), &mut SessionState::new("token"))
		.await
		.expect_err("Unparseable bodies must fail enrichment.");

	assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn transport_failure_is_surfaced() {
	let server = MockServer::start_async().await;
	let provider =
		build_jupyterhub(jupyterhub_config(&server).with_validate_url(unreachable_url(USER_PATH)));
	let err = provider
		.enrich_session(&RequestContext::new(), &mut SessionState::new("token"))
		.await
		.expect_err("Connection failures must fail enrichment.");

	assert_eq!(err.kind(), ErrorKind::TransportFailure);
	assert!(matches!(
		err,
		Error::Transport(TransportError::Network { endpoint: Endpoint::Profile, .. })
	));
}

#[tokio::test]
async fn email_policy_can_be_overridden() {
	let server = MockServer::start_async().await;
	let provider =
		build_jupyterhub(jupyterhub_config(&server)).with_email_policy(EmailPolicy::Skip);
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path(USER_PATH);
			then.status(200).body(r#"{"name":"dave"}"#);
		})
		.await;
	let mut session = SessionState::new("token");

	provider
		.enrich_session(&RequestContext::new(), &mut session)
		.await
		.expect("Enrichment should succeed with the skip policy.");

	assert_eq!(session.user.as_deref(), Some("dave"));
	assert!(session.email.is_none());
}

#[tokio::test]
async fn generic_provider_enriches_only_with_a_mapping() {
	let server = MockServer::start_async().await;
	let config = ProviderConfig::new(ProviderKind::OAuth2, CLIENT_ID)
		.with_login_url(server.url(AUTHORIZE_PATH))
		.with_redeem_url(server.url(TOKEN_PATH))
		.with_validate_url(server.url("/oauth2/introspect"))
		.with_profile_url(server.url("/oauth2/userinfo"));
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth2/userinfo");
			then.status(200).body(r#"{"sub":"u-9","email":"erin@corp.example"}"#);
		})
		.await;
	let plain = OAuth2Provider::new(config.clone()).expect("Generic provider should build.");
	let mut session = SessionState::new("token");

	plain
		.enrich_session(&RequestContext::new(), &mut session)
		.await
		.expect("Enrichment without mapping is a no-op.");

	assert!(session.user.is_none());

	mock.assert_calls_async(0).await;

	let mapped = OAuth2Provider::new(config)
		.expect("Generic provider should build.")
		.with_profile_mapping(ProfileMapping::default());

	mapped
		.enrich_session(&RequestContext::new(), &mut session)
		.await
		.expect("Userinfo response should enrich through the default mapping.");

	assert_eq!(session.user.as_deref(), Some("u-9"));
	assert_eq!(session.email.as_deref(), Some("erin@corp.example"));

	mock.assert_async().await;
}
