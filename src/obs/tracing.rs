//! Span helpers for issuance; inert without the `tracing` feature.

// self
use crate::{_prelude::*, binding::SamlBinding, obs::IssueStage};

/// A span builder used by the issuance pipeline.
#[derive(Clone, Debug)]
pub struct IssueSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl IssueSpan {
	/// Creates the root span for one issuance.
	pub fn new(client: &str, binding: SamlBinding) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("saml2_initiator.issue", client, binding = binding.as_str());

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (client, binding);

			Self {}
		}
	}

	/// Creates a span for one pipeline stage, nested under the current span.
	pub fn stage(stage: IssueStage) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::debug_span!("saml2_initiator.stage", stage = stage.as_str());

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;

			Self {}
		}
	}

	/// Enters the span for the rest of the current scope.
	pub fn entered(self) -> IssueSpanGuard {
		#[cfg(feature = "tracing")]
		{
			IssueSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			IssueSpanGuard {}
		}
	}
}

/// RAII guard returned by [`IssueSpan::entered`].
pub struct IssueSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for IssueSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("IssueSpanGuard(..)")
	}
}
