#![cfg(feature = "test")]

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use rsa::{
	RsaPublicKey,
	pkcs1v15::{Signature, VerifyingKey},
	pkcs8::DecodePublicKey,
	signature::Verifier,
};
use sha2::{Digest, Sha256};
use x509_parser::pem::parse_x509_pem;
// self
use saml2_initiator::{
	_preludet::*,
	action::{FormFields, RedirectionAction},
	binding::{HTTP_POST_BINDING_URI, decode_post},
	client::Client,
	signing::algorithm::{CanonicalizationAlgorithm, EXC_C14N},
	state::RELAY_STATE_KEY,
	store::SessionStore,
};

fn issue(client: &impl Client) -> (Url, FormFields) {
	let (store, session) = test_session();
	let action = client
		.redirection_action(&test_context(&store, &session))
		.expect("POST issuance should succeed.");

	match action {
		RedirectionAction::FormPost { url, fields } => (url, fields),
		other => panic!("POST binding should produce a form post, got {other:?}."),
	}
}

fn decoded_request(fields: &FormFields) -> String {
	decode_post(fields.get("SAMLRequest").expect("SAMLRequest field should be present."))
		.expect("SAMLRequest should be base64 UTF-8.")
}

fn between<'a>(xml: &'a str, open: &str, close: &str) -> &'a str {
	let start = xml.find(open).expect("Opening tag should be present.") + open.len();
	let end = start + xml[start..].find(close).expect("Closing tag should be present.");

	&xml[start..end]
}

#[test]
fn custom_entity_id_with_name_qualifier() {
	let client = build_test_client(
		test_configuration_builder()
			.service_provider_entity_id("http://localhost:8080/cb")
			.use_name_qualifier(true),
	);
	let (_, fields) = issue(&client);

	assert!(decoded_request(&fields).contains(
		"<saml2:Issuer xmlns:saml2=\"urn:oasis:names:tc:SAML:2.0:assertion\" \
		Format=\"urn:oasis:names:tc:SAML:2.0:nameid-format:entity\" \
		NameQualifier=\"http://localhost:8080/cb\">http://localhost:8080/cb</saml2:Issuer>"
	));
}

#[test]
fn standard_entity_id_without_name_qualifier() {
	let client = build_test_client(test_configuration_builder());
	let (_, fields) = issue(&client);

	assert!(decoded_request(&fields).contains(
		"<saml2:Issuer xmlns:saml2=\"urn:oasis:names:tc:SAML:2.0:assertion\" \
		Format=\"urn:oasis:names:tc:SAML:2.0:nameid-format:entity\">http://localhost:8080/cb</saml2:Issuer>"
	));
}

#[test]
fn force_auth_and_comparison_reach_the_document() {
	let client =
		build_test_client(test_configuration_builder().force_auth(true).comparison_type("exact"));
	let (_, fields) = issue(&client);
	let xml = decoded_request(&fields);

	assert!(xml.contains("ForceAuthn=\"true\""));
	assert!(xml.contains("Comparison=\"exact\""));
	assert!(xml.contains(&format!("ProtocolBinding=\"{HTTP_POST_BINDING_URI}\"")));
	assert!(xml.contains(&format!("Destination=\"{TEST_IDP_SSO_URL}\"")));
}

#[test]
fn seeded_relay_state_is_posted() {
	let client = build_test_client(test_configuration_builder());
	let (store, session) = test_session();

	store.set(&session, RELAY_STATE_KEY, "relayState".into()).expect("Seeding should succeed.");

	let action = client
		.redirection_action(&test_context(&store, &session))
		.expect("POST issuance should succeed.");
	let content = action.content().expect("Form posts should render content.");
	let RedirectionAction::FormPost { url, fields } = action else {
		panic!("POST binding should produce a form post.");
	};

	assert!(content.contains(TEST_IDP_SSO_URL));
	assert_eq!(url.as_str(), "https://idp.testshib.org/idp/profile/SAML2/POST/SSO");
	assert_eq!(fields.len(), 2);
	assert!(fields.get("SAMLRequest").is_some());
	assert_eq!(fields.get("RelayState"), Some("relayState"));
}

#[test]
fn without_relay_state_only_the_request_is_posted() {
	let client = build_test_client(test_configuration_builder());
	let (_, fields) = issue(&client);

	assert_eq!(fields.len(), 1);
	assert_eq!(fields.get("RelayState"), None);
}

#[test]
fn signed_post_request_verifies_with_the_certificate() {
	let client = build_test_client(
		test_configuration_builder()
			.authn_request_binding_type(HTTP_POST_BINDING_URI)
			.authn_request_signed(true)
			.signing(test_signing_settings()),
	);
	let (_, fields) = issue(&client);
	let xml = decoded_request(&fields);

	assert!(xml.contains("</saml2:Issuer><ds:Signature"));

	let signature_start = xml.find("<ds:Signature").expect("Signature should be embedded.");
	let signature_end = xml.find("</ds:Signature>").expect("Signature should be closed.")
		+ "</ds:Signature>".len();
	let unsigned = format!("{}{}", &xml[..signature_start], &xml[signature_end..]);
	let c14n =
		CanonicalizationAlgorithm::from_uri(EXC_C14N).expect("Exclusive c14n should be known.");
	let canonical = c14n.canonicalize(&unsigned).expect("Unsigned request should canonicalize.");

	// The writer emits canonical form, so the digest covers the exact bytes on the wire.
	assert_eq!(canonical, unsigned);
	assert_eq!(
		between(&xml, "<ds:DigestValue>", "</ds:DigestValue>"),
		STANDARD.encode(Sha256::digest(canonical.as_bytes()))
	);

	let signed_info = format!(
		"<ds:SignedInfo{}</ds:SignedInfo>",
		between(&xml, "<ds:SignedInfo", "</ds:SignedInfo>")
	);
	let canonical_signed_info =
		c14n.canonicalize(&signed_info).expect("SignedInfo should canonicalize.");

	assert_eq!(canonical_signed_info, signed_info);

	let (_, pem) =
		parse_x509_pem(TEST_SP_CERTIFICATE_PEM.as_bytes()).expect("Fixture certificate is PEM.");
	let certificate = pem.parse_x509().expect("Fixture certificate should parse.");
	let public_key = RsaPublicKey::from_public_key_der(certificate.public_key().raw)
		.expect("Certificate should carry an RSA key.");
	let signature_value = STANDARD
		.decode(between(&xml, "<ds:SignatureValue>", "</ds:SignatureValue>"))
		.expect("SignatureValue should be base64.");

	VerifyingKey::<Sha256>::new(public_key)
		.verify(
			canonical_signed_info.as_bytes(),
			&Signature::try_from(signature_value.as_slice()).expect("Signature should decode."),
		)
		.expect("Embedded signature should verify with the certificate key.");
}
