//! Optional observability helpers for request issuance.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) to emit a `saml2_initiator.issue` span per issuance with the
//!   `client` and `binding` fields, nested `saml2_initiator.stage` spans, and `debug!` events
//!   for state writes and lifecycle transitions.
//! - Enable `metrics` to increment the `saml2_initiator_issue_total` counter for every
//!   attempt/success/failure, labeled by `binding` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Pipeline stages observed during issuance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IssueStage {
	/// Descriptor assembly and XML serialization.
	BuildRequest,
	/// Enveloped or query signature.
	Sign,
	/// Binding encoding.
	Encode,
	/// Session state persistence.
	PersistState,
	/// Redirection action assembly.
	BuildAction,
}
impl IssueStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			IssueStage::BuildRequest => "build_request",
			IssueStage::Sign => "sign",
			IssueStage::Encode => "encode",
			IssueStage::PersistState => "persist_state",
			IssueStage::BuildAction => "build_action",
		}
	}
}
impl Display for IssueStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each issuance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IssueOutcome {
	/// Entry to the pipeline.
	Attempt,
	/// A redirection action was produced.
	Success,
	/// An error was propagated back to the caller.
	Failure,
}
impl IssueOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			IssueOutcome::Attempt => "attempt",
			IssueOutcome::Success => "success",
			IssueOutcome::Failure => "failure",
		}
	}
}
impl Display for IssueOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
