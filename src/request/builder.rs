//! Assembles an [`AuthnRequestDescriptor`](crate::request::AuthnRequestDescriptor) from the
//! client configuration, with a fresh request id per call.

// self
use crate::{
	_prelude::*,
	config::Saml2Configuration,
	id::RequestId,
	request::{
		AssertionConsumerService, AuthnRequestDescriptor, Issuer, NAME_ID_FORMAT_ENTITY,
		RequestedAuthnContext,
	},
};

/// Assembles [`AuthnRequestDescriptor`] values from a configuration snapshot.
///
/// The builder borrows the configuration and never mutates it; every call produces a
/// descriptor with a freshly generated request identifier.
#[derive(Clone, Copy, Debug)]
pub struct AuthnRequestBuilder<'a> {
	configuration: &'a Saml2Configuration,
}
impl<'a> AuthnRequestBuilder<'a> {
	/// Creates a builder over the provided configuration.
	pub fn new(configuration: &'a Saml2Configuration) -> Self {
		Self { configuration }
	}

	/// Builds a descriptor issued now.
	pub fn build(&self) -> AuthnRequestDescriptor {
		self.build_at(OffsetDateTime::now_utc())
	}

	/// Builds a descriptor with an explicit issue instant.
	pub fn build_at(&self, issue_instant: OffsetDateTime) -> AuthnRequestDescriptor {
		let cfg = self.configuration;
		let entity_id = cfg.service_provider_entity_id.clone();
		let issuer = Issuer {
			name_qualifier: cfg.use_name_qualifier.then(|| entity_id.to_string()),
			entity_id,
			format: NAME_ID_FORMAT_ENTITY,
		};
		let assertion_consumer_service = match cfg.assertion_consumer_service_index {
			Some(index) => AssertionConsumerService::Index(index),
			None => AssertionConsumerService::Endpoint {
				url: cfg.assertion_consumer_service_url.clone(),
				binding: cfg.response_binding,
			},
		};
		let requested_authn_context = (cfg.comparison.is_some()
			|| !cfg.authn_context_class_refs.is_empty())
		.then(|| RequestedAuthnContext {
			comparison: cfg.comparison,
			class_refs: cfg.authn_context_class_refs.clone(),
		});

		AuthnRequestDescriptor {
			id: RequestId::generate(),
			issue_instant,
			destination: cfg.identity_provider_sso_url.clone(),
			issuer,
			assertion_consumer_service,
			force_authn: cfg.force_auth,
			is_passive: cfg.passive,
			provider_name: cfg.provider_name.clone(),
			attribute_consuming_service_index: cfg.attribute_consuming_service_index,
			name_id_policy: cfg.name_id_policy.clone(),
			requested_authn_context,
		}
	}
}
