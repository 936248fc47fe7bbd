//! Validating builder for [`Saml2Configuration`](crate::config::Saml2Configuration).

// self
use crate::{
	_prelude::*,
	binding::SamlBinding,
	config::{Saml2Configuration, SigningSettings},
	error::ConfigError,
	id::EntityId,
	request::{AuthnContextComparison, NameIdPolicy},
};

/// Builder for [`Saml2Configuration`] values.
///
/// String-typed setters (`comparison_type`, `*_binding_type`) accept the raw values found in
/// deployment settings; they are parsed and rejected in [`build`](Self::build).
#[derive(Clone, Debug, Default)]
pub struct Saml2ConfigurationBuilder {
	service_provider_entity_id: Option<String>,
	use_name_qualifier: bool,
	force_auth: bool,
	passive: bool,
	comparison_type: Option<String>,
	authn_context_class_refs: Vec<String>,
	name_id_policy: Option<NameIdPolicy>,
	provider_name: Option<String>,
	attribute_consuming_service_index: Option<u32>,
	assertion_consumer_service_index: Option<u32>,
	identity_provider_sso_url: Option<Url>,
	assertion_consumer_service_url: Option<Url>,
	response_binding_type: Option<String>,
	authn_request_binding_type: Option<String>,
	authn_request_signed: bool,
	signing: Option<SigningSettings>,
	generate_relay_state: bool,
	protocol_state_ttl: Option<Duration>,
}
impl Saml2ConfigurationBuilder {
	/// Sets the service provider entity identifier.
	pub fn service_provider_entity_id(mut self, entity_id: impl Into<String>) -> Self {
		self.service_provider_entity_id = Some(entity_id.into());

		self
	}

	/// Toggles the issuer `NameQualifier` attribute.
	pub fn use_name_qualifier(mut self, enabled: bool) -> Self {
		self.use_name_qualifier = enabled;

		self
	}

	/// Toggles `ForceAuthn`.
	pub fn force_auth(mut self, enabled: bool) -> Self {
		self.force_auth = enabled;

		self
	}

	/// Toggles `IsPassive`.
	pub fn passive(mut self, enabled: bool) -> Self {
		self.passive = enabled;

		self
	}

	/// Sets the comparison from its schema value (`exact`, `minimum`, `maximum`, `better`).
	pub fn comparison_type(mut self, value: impl Into<String>) -> Self {
		self.comparison_type = Some(value.into());

		self
	}

	/// Sets the comparison mode.
	pub fn comparison(self, comparison: AuthnContextComparison) -> Self {
		self.comparison_type(comparison.as_str())
	}

	/// Appends a requested authentication context class reference.
	pub fn authn_context_class_ref(mut self, class_ref: impl Into<String>) -> Self {
		self.authn_context_class_refs.push(class_ref.into());

		self
	}

	/// Appends multiple requested authentication context class references.
	pub fn authn_context_class_refs<I, S>(mut self, class_refs: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.authn_context_class_refs.extend(class_refs.into_iter().map(Into::into));

		self
	}

	/// Sets the name-id policy.
	pub fn name_id_policy(mut self, policy: NameIdPolicy) -> Self {
		self.name_id_policy = Some(policy);

		self
	}

	/// Sets `ProviderName`.
	pub fn provider_name(mut self, name: impl Into<String>) -> Self {
		self.provider_name = Some(name.into());

		self
	}

	/// Sets `AttributeConsumingServiceIndex`.
	pub fn attribute_consuming_service_index(mut self, index: u32) -> Self {
		self.attribute_consuming_service_index = Some(index);

		self
	}

	/// Sets `AssertionConsumerServiceIndex`.
	pub fn assertion_consumer_service_index(mut self, index: u32) -> Self {
		self.assertion_consumer_service_index = Some(index);

		self
	}

	/// Sets the identity provider SSO endpoint.
	pub fn identity_provider_sso_url(mut self, url: Url) -> Self {
		self.identity_provider_sso_url = Some(url);

		self
	}

	/// Sets the assertion consumer service endpoint.
	pub fn assertion_consumer_service_url(mut self, url: Url) -> Self {
		self.assertion_consumer_service_url = Some(url);

		self
	}

	/// Sets the response binding from its URI.
	pub fn response_binding_type(mut self, uri: impl Into<String>) -> Self {
		self.response_binding_type = Some(uri.into());

		self
	}

	/// Sets the response binding.
	pub fn response_binding(self, binding: SamlBinding) -> Self {
		self.response_binding_type(binding.uri())
	}

	/// Sets the request binding from its URI.
	pub fn authn_request_binding_type(mut self, uri: impl Into<String>) -> Self {
		self.authn_request_binding_type = Some(uri.into());

		self
	}

	/// Sets the request binding.
	pub fn authn_request_binding(self, binding: SamlBinding) -> Self {
		self.authn_request_binding_type(binding.uri())
	}

	/// Toggles request signing.
	pub fn authn_request_signed(mut self, enabled: bool) -> Self {
		self.authn_request_signed = enabled;

		self
	}

	/// Provides signing key material and algorithms.
	pub fn signing(mut self, settings: SigningSettings) -> Self {
		self.signing = Some(settings);

		self
	}

	/// Toggles relay state generation.
	pub fn generate_relay_state(mut self, enabled: bool) -> Self {
		self.generate_relay_state = enabled;

		self
	}

	/// Sets how long persisted protocol state stays valid.
	pub fn protocol_state_ttl(mut self, ttl: Duration) -> Self {
		self.protocol_state_ttl = Some(ttl);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<Saml2Configuration, ConfigError> {
		let service_provider_entity_id =
			EntityId::new(self.service_provider_entity_id.as_deref().unwrap_or_default())
				.map_err(ConfigError::InvalidEntityId)?;
		let identity_provider_sso_url =
			self.identity_provider_sso_url.ok_or(ConfigError::MissingDestination)?;
		let assertion_consumer_service_url = self
			.assertion_consumer_service_url
			.ok_or(ConfigError::MissingAssertionConsumerService)?;
		let comparison = self
			.comparison_type
			.as_deref()
			.map(str::parse::<AuthnContextComparison>)
			.transpose()?;
		let response_binding = parse_binding(self.response_binding_type.as_deref())?;
		let authn_request_binding = parse_binding(self.authn_request_binding_type.as_deref())?;

		if self.authn_request_signed && self.signing.is_none() {
			return Err(ConfigError::MissingSigningKey);
		}
		if self.protocol_state_ttl.is_some_and(|ttl| !ttl.is_positive()) {
			return Err(ConfigError::NonPositiveStateTtl);
		}

		Ok(Saml2Configuration {
			service_provider_entity_id,
			use_name_qualifier: self.use_name_qualifier,
			force_auth: self.force_auth,
			passive: self.passive,
			comparison,
			authn_context_class_refs: self.authn_context_class_refs,
			name_id_policy: self.name_id_policy,
			provider_name: self.provider_name,
			attribute_consuming_service_index: self.attribute_consuming_service_index,
			assertion_consumer_service_index: self.assertion_consumer_service_index,
			identity_provider_sso_url,
			assertion_consumer_service_url,
			response_binding,
			authn_request_binding,
			authn_request_signed: self.authn_request_signed,
			signing: self.signing,
			generate_relay_state: self.generate_relay_state,
			protocol_state_ttl: self.protocol_state_ttl,
		})
	}
}

fn parse_binding(uri: Option<&str>) -> Result<SamlBinding, ConfigError> {
	uri.map(str::parse::<SamlBinding>).transpose().map(Option::unwrap_or_default)
}
