//! Immutable client configuration, its builder, and the JSON settings document.
//!
//! A [`Saml2Configuration`] is only ever produced by [`Saml2ConfigurationBuilder::build`], which
//! validates every field. The resulting value is shared read-only by all issuances.

pub mod builder;
pub mod settings;

pub use builder::*;
pub use settings::*;

// self
use crate::{
	_prelude::*,
	binding::SamlBinding,
	id::EntityId,
	request::{AuthnContextComparison, NameIdPolicy},
	signing::algorithm::{DEFAULT_CANONICALIZATION, DEFAULT_DIGEST, DEFAULT_SIGNATURE},
};

/// Validated service provider configuration.
#[derive(Clone, Debug)]
pub struct Saml2Configuration {
	/// Service provider entity identifier, used as the request issuer.
	pub service_provider_entity_id: EntityId,
	/// Emit `NameQualifier` on the issuer.
	pub use_name_qualifier: bool,
	/// Ask the IdP to re-authenticate the user.
	pub force_auth: bool,
	/// Ask the IdP not to interact with the user.
	pub passive: bool,
	/// Requested authentication context comparison.
	pub comparison: Option<AuthnContextComparison>,
	/// Requested authentication context class references.
	pub authn_context_class_refs: Vec<String>,
	/// Requested name-id policy.
	pub name_id_policy: Option<NameIdPolicy>,
	/// Human-readable `ProviderName`.
	pub provider_name: Option<String>,
	/// `AttributeConsumingServiceIndex`.
	pub attribute_consuming_service_index: Option<u32>,
	/// `AssertionConsumerServiceIndex`; replaces the ACS URL and binding on the wire.
	pub assertion_consumer_service_index: Option<u32>,
	/// Identity provider single sign-on endpoint.
	pub identity_provider_sso_url: Url,
	/// Service provider assertion consumer service endpoint.
	pub assertion_consumer_service_url: Url,
	/// Binding the IdP should use for its response.
	pub response_binding: SamlBinding,
	/// Binding used to deliver the AuthnRequest.
	pub authn_request_binding: SamlBinding,
	/// Sign outbound AuthnRequests.
	pub authn_request_signed: bool,
	/// Key material and algorithms, required when signing is enabled.
	pub signing: Option<SigningSettings>,
	/// Generate an opaque relay state when the caller supplies none.
	pub generate_relay_state: bool,
	/// Lifetime of persisted protocol state; no expiry is written when unset.
	pub protocol_state_ttl: Option<Duration>,
}
impl Saml2Configuration {
	/// Creates an empty builder.
	pub fn builder() -> Saml2ConfigurationBuilder {
		Saml2ConfigurationBuilder::default()
	}

	/// Parses a JSON [`Saml2Settings`] document and validates it.
	pub fn from_json_str(json: &str) -> Result<Self, crate::error::ConfigError> {
		Saml2Settings::from_json_str(json)?.into_builder().build()
	}
}

/// PEM-encoded key material plus the algorithm identifiers used for signing.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSettings {
	/// PKCS#8 or PKCS#1 RSA private key.
	pub private_key_pem: String,
	/// X.509 certificate matching the private key.
	pub certificate_pem: String,
	/// XML-DSig signature method URI.
	pub signature_algorithm: String,
	/// XML-DSig digest method URI.
	pub digest_algorithm: String,
	/// XML-DSig canonicalization method URI.
	pub canonicalization_algorithm: String,
}
impl SigningSettings {
	/// Creates settings with RSA-SHA256, SHA-256, and exclusive canonicalization.
	pub fn new(private_key_pem: impl Into<String>, certificate_pem: impl Into<String>) -> Self {
		Self {
			private_key_pem: private_key_pem.into(),
			certificate_pem: certificate_pem.into(),
			signature_algorithm: DEFAULT_SIGNATURE.to_owned(),
			digest_algorithm: DEFAULT_DIGEST.to_owned(),
			canonicalization_algorithm: DEFAULT_CANONICALIZATION.to_owned(),
		}
	}

	/// Overrides the signature method URI.
	pub fn signature_algorithm(mut self, uri: impl Into<String>) -> Self {
		self.signature_algorithm = uri.into();

		self
	}

	/// Overrides the digest method URI.
	pub fn digest_algorithm(mut self, uri: impl Into<String>) -> Self {
		self.digest_algorithm = uri.into();

		self
	}

	/// Overrides the canonicalization method URI.
	pub fn canonicalization_algorithm(mut self, uri: impl Into<String>) -> Self {
		self.canonicalization_algorithm = uri.into();

		self
	}
}
impl Debug for SigningSettings {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SigningSettings")
			.field("private_key_pem", &"<redacted>")
			.field("certificate_pem", &self.certificate_pem.len())
			.field("signature_algorithm", &self.signature_algorithm)
			.field("digest_algorithm", &self.digest_algorithm)
			.field("canonicalization_algorithm", &self.canonicalization_algorithm)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::*;

	#[test]
	fn signing_settings_debug_redacts_the_key() {
		let rendered = format!("{:?}", test_signing_settings());

		assert!(rendered.contains("<redacted>"));
		assert!(!rendered.contains("PRIVATE KEY"));
		assert!(rendered.contains(DEFAULT_SIGNATURE));
	}
}
