//! Credential-direct client: authenticates from request credentials, never redirects.

// self
use crate::{
	_prelude::*,
	action::RedirectionAction,
	client::{CallContext, Client},
};

/// Client mode where credentials arrive on every request, so no browser redirection exists.
#[derive(Clone, Debug)]
pub struct DirectClient {
	name: String,
}
impl DirectClient {
	/// Creates a direct client.
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into() }
	}
}
impl Client for DirectClient {
	fn name(&self) -> &str {
		&self.name
	}

	fn redirection_action(&self, _ctx: &CallContext<'_>) -> Result<RedirectionAction> {
		Err(Error::Unsupported { reason: "direct clients cannot redirect for login" })
	}

	fn process_logout(&self, _ctx: &CallContext<'_>) -> Result<RedirectionAction> {
		Err(Error::Unsupported { reason: "direct clients cannot process logout" })
	}

	fn logout_action(
		&self,
		_ctx: &CallContext<'_>,
		_target_url: Option<&Url>,
	) -> Result<RedirectionAction> {
		Err(Error::Unsupported { reason: "direct clients cannot redirect for logout" })
	}
}
