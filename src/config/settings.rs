//! JSON deployment settings mapped onto [`Saml2ConfigurationBuilder`].

// self
use crate::{
	_prelude::*,
	config::{Saml2ConfigurationBuilder, SigningSettings},
	error::ConfigError,
	request::NameIdPolicy,
};

/// Deserializable settings document.
///
/// Field names are camelCase. Unknown fields are rejected so typos surface as errors with the
/// offending path.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Saml2Settings {
	/// Service provider entity identifier.
	pub service_provider_entity_id: String,
	/// Identity provider SSO endpoint.
	pub identity_provider_sso_url: Option<Url>,
	/// Assertion consumer service endpoint.
	pub assertion_consumer_service_url: Option<Url>,
	/// Emit `NameQualifier` on the issuer.
	pub use_name_qualifier: bool,
	/// Request `ForceAuthn`.
	pub force_auth: bool,
	/// Request `IsPassive`.
	pub passive: bool,
	/// Comparison schema value.
	pub comparison_type: Option<String>,
	/// Requested authentication context class references.
	pub authn_context_class_refs: Vec<String>,
	/// Requested name-id policy.
	pub name_id_policy: Option<NameIdPolicy>,
	/// `ProviderName`.
	pub provider_name: Option<String>,
	/// `AttributeConsumingServiceIndex`.
	pub attribute_consuming_service_index: Option<u32>,
	/// `AssertionConsumerServiceIndex`.
	pub assertion_consumer_service_index: Option<u32>,
	/// Response binding URI.
	pub response_binding_type: Option<String>,
	/// Request binding URI.
	pub authn_request_binding_type: Option<String>,
	/// Sign outbound AuthnRequests.
	pub authn_request_signed: bool,
	/// Signing key material.
	pub signing: Option<SigningSettingsDocument>,
	/// Generate relay state when none is supplied.
	pub generate_relay_state: bool,
	/// Protocol state lifetime in seconds.
	pub protocol_state_ttl_secs: Option<i64>,
}
impl Saml2Settings {
	/// Parses a JSON document, reporting the failing path on error.
	pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
		let mut deserializer = serde_json::Deserializer::from_str(json);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ConfigError::InvalidSettings { source })
	}

	/// Maps the document onto a configuration builder; validation happens in `build`.
	pub fn into_builder(self) -> Saml2ConfigurationBuilder {
		let mut builder = Saml2ConfigurationBuilder::default()
			.service_provider_entity_id(self.service_provider_entity_id)
			.use_name_qualifier(self.use_name_qualifier)
			.force_auth(self.force_auth)
			.passive(self.passive)
			.authn_context_class_refs(self.authn_context_class_refs)
			.authn_request_signed(self.authn_request_signed)
			.generate_relay_state(self.generate_relay_state);

		if let Some(url) = self.identity_provider_sso_url {
			builder = builder.identity_provider_sso_url(url);
		}
		if let Some(url) = self.assertion_consumer_service_url {
			builder = builder.assertion_consumer_service_url(url);
		}
		if let Some(value) = self.comparison_type {
			builder = builder.comparison_type(value);
		}
		if let Some(policy) = self.name_id_policy {
			builder = builder.name_id_policy(policy);
		}
		if let Some(name) = self.provider_name {
			builder = builder.provider_name(name);
		}
		if let Some(index) = self.attribute_consuming_service_index {
			builder = builder.attribute_consuming_service_index(index);
		}
		if let Some(index) = self.assertion_consumer_service_index {
			builder = builder.assertion_consumer_service_index(index);
		}
		if let Some(uri) = self.response_binding_type {
			builder = builder.response_binding_type(uri);
		}
		if let Some(uri) = self.authn_request_binding_type {
			builder = builder.authn_request_binding_type(uri);
		}
		if let Some(signing) = self.signing {
			builder = builder.signing(signing.into());
		}
		if let Some(secs) = self.protocol_state_ttl_secs {
			builder = builder.protocol_state_ttl(Duration::seconds(secs));
		}

		builder
	}
}

/// Signing section of [`Saml2Settings`]; algorithm URIs fall back to the defaults.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SigningSettingsDocument {
	/// PEM-encoded RSA private key.
	pub private_key_pem: String,
	/// PEM-encoded certificate.
	pub certificate_pem: String,
	/// Signature method URI.
	#[serde(default)]
	pub signature_algorithm: Option<String>,
	/// Digest method URI.
	#[serde(default)]
	pub digest_algorithm: Option<String>,
	/// Canonicalization method URI.
	#[serde(default)]
	pub canonicalization_algorithm: Option<String>,
}
impl Debug for SigningSettingsDocument {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SigningSettingsDocument")
			.field("private_key_pem", &"<redacted>")
			.field("signature_algorithm", &self.signature_algorithm)
			.field("digest_algorithm", &self.digest_algorithm)
			.field("canonicalization_algorithm", &self.canonicalization_algorithm)
			.finish_non_exhaustive()
	}
}
impl From<SigningSettingsDocument> for SigningSettings {
	fn from(value: SigningSettingsDocument) -> Self {
		let mut settings = SigningSettings::new(value.private_key_pem, value.certificate_pem);

		if let Some(uri) = value.signature_algorithm {
			settings = settings.signature_algorithm(uri);
		}
		if let Some(uri) = value.digest_algorithm {
			settings = settings.digest_algorithm(uri);
		}
		if let Some(uri) = value.canonicalization_algorithm {
			settings = settings.canonicalization_algorithm(uri);
		}

		settings
	}
}
