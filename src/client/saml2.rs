//! SAML2 service-provider client issuing AuthnRequests.

// self
use crate::{
	_prelude::*,
	action::RedirectionAction,
	binding::{EncodedPayload, SamlBinding},
	client::{CallContext, Client, ClientRuntime, Lifecycle},
	config::Saml2Configuration,
	obs::{self, IssueOutcome, IssueSpan, IssueStage},
	request::AuthnRequestBuilder,
	signing::XmlSigner,
	state::ProtocolState,
};

/// Issues AuthnRequests for one identity provider.
///
/// The client is cheap to share across threads; initialization happens once, lazily on the first
/// issuance or eagerly through [`init`](Self::init).
#[derive(Debug)]
pub struct Saml2Client {
	name: String,
	configuration: Arc<Saml2Configuration>,
	lifecycle: Lifecycle,
}
impl Saml2Client {
	/// Creates an uninitialized client.
	pub fn new(name: impl Into<String>, configuration: Saml2Configuration) -> Self {
		Self { name: name.into(), configuration: Arc::new(configuration), lifecycle: Lifecycle::new() }
	}

	/// Validates the configuration and loads key material; repeated calls are no-ops.
	pub fn init(&self) -> Result<()> {
		self.lifecycle.init(&self.configuration).map(|_| ())
	}

	/// Returns `true` once [`init`](Self::init) has succeeded.
	pub fn is_initialized(&self) -> bool {
		self.lifecycle.runtime().is_some()
	}

	/// Configuration the client was created with.
	pub fn configuration(&self) -> &Saml2Configuration {
		&self.configuration
	}

	fn issue(&self, runtime: &ClientRuntime, ctx: &CallContext<'_>) -> Result<RedirectionAction> {
		let cfg = runtime.configuration.as_ref();
		let binding = cfg.authn_request_binding;
		let states = ctx.protocol_state();
		let relay_state =
			states.resolve_relay_state(ctx.relay_state.clone(), cfg.generate_relay_state)?;
		let (descriptor, xml) = {
			let _span = IssueSpan::stage(IssueStage::BuildRequest).entered();
			let descriptor = AuthnRequestBuilder::new(cfg).build();
			let xml = descriptor.to_xml()?;

			(descriptor, xml)
		};
		let signer = runtime.signing.as_deref().map(XmlSigner::new);
		let xml = match (signer, binding) {
			(Some(signer), SamlBinding::Post) => {
				let _span = IssueSpan::stage(IssueStage::Sign).entered();

				signer.sign_document(&xml, descriptor.id.as_ref())?
			},
			_ => xml,
		};
		let payload = {
			let _span = IssueSpan::stage(IssueStage::Encode).entered();

			EncodedPayload::encode(binding, &xml)?
		};
		let query_signature = match (signer, &payload) {
			(Some(signer), EncodedPayload::Redirect(value)) => {
				let _span = IssueSpan::stage(IssueStage::Sign).entered();

				Some(signer.sign_query(value, relay_state.as_deref())?)
			},
			_ => None,
		};
		let action = {
			let _span = IssueSpan::stage(IssueStage::BuildAction).entered();

			RedirectionAction::from_payload(
				&payload,
				relay_state.as_deref(),
				&descriptor.destination,
				query_signature.as_ref(),
			)?
		};

		{
			let _span = IssueSpan::stage(IssueStage::PersistState).entered();
			let state = ProtocolState::new(
				descriptor.id,
				relay_state,
				descriptor.issue_instant,
				cfg.protocol_state_ttl,
			);

			states.save(&state)?;
		}

		Ok(action)
	}
}
impl Client for Saml2Client {
	fn name(&self) -> &str {
		&self.name
	}

	fn redirection_action(&self, ctx: &CallContext<'_>) -> Result<RedirectionAction> {
		let binding = self.configuration.authn_request_binding;
		let _span = IssueSpan::new(&self.name, binding).entered();

		obs::record_issue_outcome(binding, IssueOutcome::Attempt);

		let result =
			self.lifecycle.init(&self.configuration).and_then(|runtime| self.issue(&runtime, ctx));

		match &result {
			Ok(_action) => {
				obs::record_issue_outcome(binding, IssueOutcome::Success);

				#[cfg(feature = "tracing")]
				tracing::debug!(destination = %_action.url(), "AuthnRequest issued.");
			},
			Err(_e) => {
				obs::record_issue_outcome(binding, IssueOutcome::Failure);

				#[cfg(feature = "tracing")]
				tracing::warn!(error = %_e, "AuthnRequest issuance failed.");
			},
		}

		result
	}

	fn process_logout(&self, _ctx: &CallContext<'_>) -> Result<RedirectionAction> {
		Err(Error::Unsupported { reason: "SAML2 logout processing is not implemented" })
	}

	fn logout_action(
		&self,
		_ctx: &CallContext<'_>,
		_target_url: Option<&Url>,
	) -> Result<RedirectionAction> {
		Err(Error::Unsupported { reason: "SAML2 single logout initiation is not implemented" })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::*,
		state::{CREATED_AT_KEY, RELAY_STATE_KEY, REQUEST_ID_KEY},
		store::SessionStore,
	};

	#[test]
	fn lazy_init_on_first_issuance() {
		let client = build_test_client(test_configuration_builder());
		let (store, session) = test_session();

		assert!(!client.is_initialized());

		client
			.redirection_action(&test_context(&store, &session))
			.expect("Issuance should succeed.");

		assert!(client.is_initialized());
	}

	#[test]
	fn failed_issuance_leaves_session_untouched() {
		let mut configuration =
			test_configuration_builder().build().expect("Configuration should build.");

		// Bypasses builder validation; `init` must catch it.
		configuration.authn_request_signed = true;

		let client = Saml2Client::new("SAML2Client", configuration);
		let (store, session) = test_session();

		store.set(&session, RELAY_STATE_KEY, "seeded".into()).expect("Seed should succeed.");

		let err = client
			.redirection_action(&test_context(&store, &session))
			.expect_err("Signing without a key must fail.");

		assert!(matches!(err, Error::Config(_)));
		assert_eq!(store.len(&session), 1);
		assert_eq!(
			store.get(&session, RELAY_STATE_KEY).expect("Get should succeed."),
			Some("seeded".into())
		);
	}

	#[test]
	fn explicit_relay_state_is_persisted() {
		let client = build_test_client(test_configuration_builder());
		let (store, session) = test_session();
		let ctx = test_context(&store, &session).with_relay_state("return-to-cart");
		let action = client.redirection_action(&ctx).expect("Issuance should succeed.");
		let RedirectionAction::FormPost { fields, .. } = &action else {
			panic!("POST binding should produce a form, got {action:?}.");
		};

		assert_eq!(fields.get("RelayState"), Some("return-to-cart"));
		assert_eq!(
			store.get(&session, RELAY_STATE_KEY).expect("Get should succeed."),
			Some("return-to-cart".into())
		);
		assert!(store.get(&session, REQUEST_ID_KEY).expect("Get should succeed.").is_some());
		assert!(store.get(&session, CREATED_AT_KEY).expect("Get should succeed.").is_some());
	}

	#[test]
	fn logout_operations_are_unsupported() {
		let client = build_test_client(test_configuration_builder());
		let (store, session) = test_session();
		let ctx = test_context(&store, &session);

		assert!(matches!(client.process_logout(&ctx), Err(Error::Unsupported { .. })));
		assert!(matches!(client.logout_action(&ctx, None), Err(Error::Unsupported { .. })));
		assert!(store.is_empty(&session));
	}
}
