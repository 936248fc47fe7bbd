#![cfg(feature = "test")]

// self
use saml2_initiator::{
	_preludet::*,
	binding::SamlBinding,
	client::{Client, Saml2Client},
	config::Saml2Configuration,
	error::ConfigError,
	request::AuthnContextComparison,
};

fn settings_json(extra: &str) -> String {
	format!(
		r#"{{
	"serviceProviderEntityId": "{TEST_SP_ENTITY_ID}",
	"identityProviderSsoUrl": "{TEST_IDP_SSO_URL}",
	"assertionConsumerServiceUrl": "{TEST_ACS_URL}"{extra}
}}"#
	)
}

#[test]
fn settings_document_drives_a_working_client() {
	let json = settings_json(&format!(
		r#",
	"forceAuth": true,
	"comparisonType": "minimum",
	"authnContextClassRefs": ["urn:oasis:names:tc:SAML:2.0:ac:classes:PasswordProtectedTransport"],
	"authnRequestBindingType": "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect",
	"authnRequestSigned": true,
	"protocolStateTtlSecs": 300,
	"signing": {{
		"privateKeyPem": {key},
		"certificatePem": {cert}
	}}"#,
		key = serde_json::to_string(TEST_SP_KEY_PEM).expect("PEM should serialize."),
		cert = serde_json::to_string(TEST_SP_CERTIFICATE_PEM).expect("PEM should serialize."),
	));
	let configuration =
		Saml2Configuration::from_json_str(&json).expect("Settings document should be valid.");

	assert!(configuration.force_auth);
	assert_eq!(configuration.comparison, Some(AuthnContextComparison::Minimum));
	assert_eq!(configuration.authn_request_binding, SamlBinding::Redirect);
	assert_eq!(configuration.protocol_state_ttl, Some(Duration::seconds(300)));

	let client = Saml2Client::new("SAML2Client", configuration);
	let (store, session) = test_session();
	let action = client
		.redirection_action(&test_context(&store, &session))
		.expect("Issuance from settings should succeed.");

	assert!(action.url().query().is_some_and(|query| query.contains("&Signature=")));
}

#[test]
fn invalid_binding_is_a_config_error() {
	let json = settings_json(r#",
	"authnRequestBindingType": "urn:oasis:names:tc:SAML:2.0:bindings:SOAP""#);
	let err = Saml2Configuration::from_json_str(&json).expect_err("SOAP must be rejected.");

	assert!(matches!(err, ConfigError::UnsupportedBinding { .. }));
}

#[test]
fn invalid_comparison_is_a_config_error() {
	let json = settings_json(r#",
	"comparisonType": "strict""#);
	let err = Saml2Configuration::from_json_str(&json).expect_err("Unknown comparison must fail.");

	assert!(matches!(err, ConfigError::UnknownComparison { .. }));
}

#[test]
fn malformed_document_reports_the_failing_path() {
	let json = settings_json(r#",
	"forceAuth": "yes""#);
	let err = Saml2Configuration::from_json_str(&json).expect_err("A string flag must fail.");
	let ConfigError::InvalidSettings { source } = &err else {
		panic!("Expected a settings parse error, got {err:?}.");
	};

	assert_eq!(source.path().to_string(), "forceAuth");
}
