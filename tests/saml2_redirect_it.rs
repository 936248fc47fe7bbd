#![cfg(feature = "test")]

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use rsa::{
	pkcs1v15::{Signature, VerifyingKey},
	signature::Verifier,
};
use sha2::Sha256;
// self
use saml2_initiator::{
	_preludet::*,
	action::RedirectionAction,
	binding::{HTTP_REDIRECT_BINDING_URI, inflate_base64},
	client::{Client, Saml2Client},
	request::AuthnRequestBuilder,
	signing::{SigningContext, algorithm::RSA_SHA256},
};

fn redirect_client(signed: bool) -> Saml2Client {
	let mut builder =
		test_configuration_builder().authn_request_binding_type(HTTP_REDIRECT_BINDING_URI);

	if signed {
		builder = builder.authn_request_signed(true).signing(test_signing_settings());
	}

	build_test_client(builder)
}

fn query_value(url: &Url, name: &str) -> Option<String> {
	url.query_pairs().find(|(key, _)| key == name).map(|(_, value)| value.into_owned())
}

#[test]
fn redirect_payload_round_trips_to_the_document() {
	let client = redirect_client(false);
	let (store, session) = test_session();
	let ctx = test_context(&store, &session).with_relay_state("relayState");
	let action = client.redirection_action(&ctx).expect("Redirect issuance should succeed.");
	let RedirectionAction::Redirect { url } = &action else {
		panic!("Redirect binding should produce a redirect, got {action:?}.");
	};

	assert!(url.as_str().starts_with(&format!("{TEST_IDP_SSO_URL}?SAMLRequest=")));
	assert_eq!(url.query_pairs().count(), 2);
	assert_eq!(query_value(url, "RelayState").as_deref(), Some("relayState"));
	assert_eq!(query_value(url, "SigAlg"), None);
	assert_eq!(action.content(), None);

	let xml = inflate_base64(&query_value(url, "SAMLRequest").expect("SAMLRequest should exist."))
		.expect("SAMLRequest should inflate.");
	let state = ctx
		.protocol_state()
		.load()
		.expect("Loading state should succeed.")
		.expect("State should be stored.");
	let mut rebuilt = AuthnRequestBuilder::new(client.configuration()).build_at(state.created_at);

	rebuilt.id = state.request_id;

	// Same configuration, instant and id serialize to the exact bytes that were sent.
	assert_eq!(xml, rebuilt.to_xml().expect("Rebuilt request should serialize."));
	assert!(xml.contains(&format!("Destination=\"{TEST_IDP_SSO_URL}\"")));
	assert!(!xml.contains("ds:Signature"));
}

#[test]
fn signed_redirect_carries_a_verifiable_query_signature() {
	let client = redirect_client(true);
	let (store, session) = test_session();
	let action = client
		.redirection_action(&test_context(&store, &session).with_relay_state("relay-1"))
		.expect("Signed redirect issuance should succeed.");
	let query = action.url().query().expect("Redirect should carry a query.").to_owned();
	let (signed_octets, signature) =
		query.rsplit_once("&Signature=").expect("Signature should be the last parameter.");

	assert!(signed_octets.starts_with("SAMLRequest="));
	assert!(signed_octets.contains("&RelayState=relay-1&SigAlg="));
	assert_eq!(query_value(action.url(), "SigAlg").as_deref(), Some(RSA_SHA256));

	let raw = STANDARD
		.decode(urlencoding::decode(signature).expect("Signature should percent-decode").as_bytes())
		.expect("Signature should be base64.");
	let context = SigningContext::from_settings(&test_signing_settings())
		.expect("Fixture key pair should load.");

	VerifyingKey::<Sha256>::new(context.key().to_public_key())
		.verify(
			signed_octets.as_bytes(),
			&Signature::try_from(raw.as_slice()).expect("Signature should decode."),
		)
		.expect("Query signature should verify.");

	let xml = inflate_base64(
		&query_value(action.url(), "SAMLRequest").expect("SAMLRequest should exist."),
	)
	.expect("SAMLRequest should inflate.");

	assert!(!xml.contains("ds:Signature"));
}

#[test]
fn generated_relay_state_is_sent_and_stored() {
	let client = build_test_client(
		test_configuration_builder()
			.authn_request_binding_type(HTTP_REDIRECT_BINDING_URI)
			.generate_relay_state(true),
	);
	let (store, session) = test_session();
	let ctx = test_context(&store, &session);
	let action = client.redirection_action(&ctx).expect("Redirect issuance should succeed.");
	let sent = query_value(action.url(), "RelayState").expect("Relay state should be generated.");
	let state = ctx
		.protocol_state()
		.load()
		.expect("Loading state should succeed.")
		.expect("State should be stored.");

	assert_eq!(sent.len(), 32);
	assert_eq!(state.relay_state.as_deref(), Some(sent.as_str()));
}
