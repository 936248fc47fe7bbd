//! Client facade: the [`Client`] contract, the SAML2 issuing client, and the direct client.
//!
//! Callers hold one client per identity provider and pass a [`CallContext`] per browser request.

pub mod direct;
pub mod lifecycle;
pub mod saml2;

pub use direct::*;
pub use lifecycle::*;
pub use saml2::*;

// self
use crate::{
	_prelude::*,
	action::RedirectionAction,
	id::SessionId,
	state::ProtocolStateStore,
	store::SessionStore,
};

/// Per-call inputs: the caller's session and the store backing it.
#[derive(Clone)]
pub struct CallContext<'a> {
	/// Session the protocol state is written to.
	pub session: &'a SessionId,
	/// Session storage adapter.
	pub store: &'a dyn SessionStore,
	/// Explicit relay state for this call; takes precedence over any seeded value.
	pub relay_state: Option<String>,
}
impl<'a> CallContext<'a> {
	/// Creates a context without an explicit relay state.
	pub fn new(session: &'a SessionId, store: &'a dyn SessionStore) -> Self {
		Self { session, store, relay_state: None }
	}

	/// Sets an explicit relay state.
	pub fn with_relay_state(mut self, relay_state: impl Into<String>) -> Self {
		self.relay_state = Some(relay_state.into());

		self
	}

	/// Protocol state accessor bound to this session.
	pub fn protocol_state(&self) -> ProtocolStateStore<'a> {
		ProtocolStateStore::new(self.session, self.store)
	}
}
impl Debug for CallContext<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CallContext")
			.field("session", self.session)
			.field("relay_state", &self.relay_state)
			.finish_non_exhaustive()
	}
}

/// Operations every authentication client exposes.
///
/// Modes that cannot perform an operation return [`Error::Unsupported`] instead of panicking.
pub trait Client
where
	Self: Send + Sync,
{
	/// Stable client name, used in logs and callback URLs.
	fn name(&self) -> &str;

	/// Produces the action that sends the browser to the identity provider.
	fn redirection_action(&self, ctx: &CallContext<'_>) -> Result<RedirectionAction>;

	/// Handles an inbound logout request or response.
	fn process_logout(&self, ctx: &CallContext<'_>) -> Result<RedirectionAction>;

	/// Produces the action that starts a logout, returning to `target_url` afterwards.
	fn logout_action(
		&self,
		ctx: &CallContext<'_>,
		target_url: Option<&Url>,
	) -> Result<RedirectionAction>;
}
