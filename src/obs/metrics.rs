//! Issuance counters; no-ops without the `metrics` feature.

// self
use crate::{binding::SamlBinding, obs::IssueOutcome};

/// Records an issuance outcome via the global metrics recorder (when enabled).
pub fn record_issue_outcome(binding: SamlBinding, outcome: IssueOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"saml2_initiator_issue_total",
			"binding" => binding.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (binding, outcome);
	}
}
