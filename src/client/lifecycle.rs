//! One-shot client initialization as an explicit state machine.

// self
use crate::{
	_prelude::*,
	config::Saml2Configuration,
	error::ConfigError,
	signing::SigningContext,
};

/// Frozen, shareable state of an initialized client.
#[derive(Debug)]
pub struct ClientRuntime {
	/// Validated configuration.
	pub configuration: Arc<Saml2Configuration>,
	/// Loaded key material, present when request signing is enabled.
	pub signing: Option<Arc<SigningContext>>,
}

/// Lifecycle states; transitions only move forward except for a failed initialization, which
/// returns to [`Uninitialized`](Self::Uninitialized) so it can be retried.
#[derive(Clone, Debug)]
pub enum LifecycleState {
	/// `init` has not completed.
	Uninitialized,
	/// `init` is running its stages.
	Initializing,
	/// `init` completed; the runtime is frozen.
	Ready(Arc<ClientRuntime>),
}
impl LifecycleState {
	/// Returns a stable label suitable for span or log fields.
	pub const fn as_str(&self) -> &'static str {
		match self {
			LifecycleState::Uninitialized => "uninitialized",
			LifecycleState::Initializing => "initializing",
			LifecycleState::Ready(_) => "ready",
		}
	}
}

/// Lifecycle cell owned by a client.
#[derive(Debug)]
pub struct Lifecycle {
	state: RwLock<LifecycleState>,
}
impl Lifecycle {
	/// Creates an uninitialized cell.
	pub fn new() -> Self {
		Self { state: RwLock::new(LifecycleState::Uninitialized) }
	}

	/// Current state.
	pub fn state(&self) -> LifecycleState {
		self.state.read().clone()
	}

	/// Runtime of a ready client.
	pub fn runtime(&self) -> Option<Arc<ClientRuntime>> {
		match &*self.state.read() {
			LifecycleState::Ready(runtime) => Some(runtime.clone()),
			_ => None,
		}
	}

	/// Runs the ordered initialization stages once; later calls return the frozen runtime.
	///
	/// Concurrent callers block on the write lock and observe the result of the first.
	pub fn init(&self, configuration: &Arc<Saml2Configuration>) -> Result<Arc<ClientRuntime>> {
		if let Some(runtime) = self.runtime() {
			return Ok(runtime);
		}

		let mut state = self.state.write();

		if let LifecycleState::Ready(runtime) = &*state {
			return Ok(runtime.clone());
		}

		*state = LifecycleState::Initializing;

		#[cfg(feature = "tracing")]
		tracing::debug!(entity_id = %configuration.service_provider_entity_id, "Client initializing.");

		let result = validate_configuration(configuration)
			.and_then(|()| load_signing_context(configuration))
			.map(|signing| freeze(configuration, signing));

		match result {
			Ok(runtime) => {
				*state = LifecycleState::Ready(runtime.clone());

				#[cfg(feature = "tracing")]
				tracing::debug!(signed = runtime.signing.is_some(), "Client ready.");

				Ok(runtime)
			},
			Err(e) => {
				*state = LifecycleState::Uninitialized;

				#[cfg(feature = "tracing")]
				tracing::debug!(error = %e, "Client initialization failed.");

				Err(e)
			},
		}
	}
}
impl Default for Lifecycle {
	fn default() -> Self {
		Self::new()
	}
}

// Configuration fields are public, so a built value may have been edited since validation.
fn validate_configuration(configuration: &Saml2Configuration) -> Result<()> {
	if configuration.authn_request_signed && configuration.signing.is_none() {
		return Err(ConfigError::MissingSigningKey.into());
	}
	if configuration.protocol_state_ttl.is_some_and(|ttl| !ttl.is_positive()) {
		return Err(ConfigError::NonPositiveStateTtl.into());
	}

	Ok(())
}

fn load_signing_context(configuration: &Saml2Configuration) -> Result<Option<Arc<SigningContext>>> {
	if !configuration.authn_request_signed {
		return Ok(None);
	}

	let settings = configuration.signing.as_ref().ok_or(ConfigError::MissingSigningKey)?;

	Ok(Some(Arc::new(SigningContext::from_settings(settings)?)))
}

fn freeze(
	configuration: &Arc<Saml2Configuration>,
	signing: Option<Arc<SigningContext>>,
) -> Arc<ClientRuntime> {
	Arc::new(ClientRuntime { configuration: configuration.clone(), signing })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::*;

	#[test]
	fn init_is_idempotent() {
		let configuration = Arc::new(
			test_configuration_builder()
				.authn_request_signed(true)
				.signing(test_signing_settings())
				.build()
				.expect("Configuration should build."),
		);
		let lifecycle = Lifecycle::new();

		assert_eq!(lifecycle.state().as_str(), "uninitialized");

		let first = lifecycle.init(&configuration).expect("First init should succeed.");
		let second = lifecycle.init(&configuration).expect("Second init should succeed.");

		assert!(Arc::ptr_eq(&first, &second));
		assert!(first.signing.is_some());
		assert_eq!(lifecycle.state().as_str(), "ready");
	}

	#[test]
	fn failed_init_can_be_retried() {
		let mut configuration =
			test_configuration_builder().build().expect("Configuration should build.");

		configuration.authn_request_signed = true;

		let lifecycle = Lifecycle::new();
		let err = lifecycle
			.init(&Arc::new(configuration.clone()))
			.expect_err("Signing without key material must fail.");

		assert!(matches!(err, Error::Config(ConfigError::MissingSigningKey)));
		assert_eq!(lifecycle.state().as_str(), "uninitialized");

		configuration.signing = Some(test_signing_settings());

		lifecycle.init(&Arc::new(configuration)).expect("Retry with key material should succeed.");

		assert!(lifecycle.runtime().is_some());
	}
}
