//! Browser-deliverable redirection actions built from encoded payloads.

// crates.io
use quick_xml::escape::escape;
// self
use crate::{
	_prelude::*,
	binding::{self, EncodedPayload},
	error::EncodingError,
	signing::QuerySignature,
};

/// Form field / query parameter carrying the encoded request.
pub const SAML_REQUEST_PARAM: &str = "SAMLRequest";
/// Form field / query parameter carrying the relay state.
pub const RELAY_STATE_PARAM: &str = "RelayState";
/// Query parameter carrying the signature algorithm URI.
pub const SIG_ALG_PARAM: &str = "SigAlg";
/// Query parameter carrying the detached signature.
pub const SIGNATURE_PARAM: &str = "Signature";

/// Insertion-ordered form fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormFields(Vec<(String, String)>);
impl FormFields {
	/// Appends a field.
	pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.0.push((name.into(), value.into()));
	}

	/// Returns the first value for `name`.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
	}

	/// Number of fields.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no field is present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates fields in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
	}
}

/// What the browser must do next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RedirectionAction {
	/// Auto-submitting HTML form POST.
	FormPost {
		/// Form action.
		url: Url,
		/// Hidden fields, in submission order.
		fields: FormFields,
	},
	/// HTTP redirect.
	Redirect {
		/// Full target, including the protocol query parameters.
		url: Url,
	},
}
impl RedirectionAction {
	/// Combines an encoded payload, relay state, and destination into an action.
	///
	/// `query_signature` only applies to redirect payloads; POST payloads carry their signature
	/// inside the document.
	pub fn from_payload(
		payload: &EncodedPayload,
		relay_state: Option<&str>,
		destination: &Url,
		query_signature: Option<&QuerySignature>,
	) -> Result<Self, EncodingError> {
		match payload {
			EncodedPayload::Post(value) => {
				let mut fields = FormFields::default();

				fields.push(SAML_REQUEST_PARAM, value.as_str());

				if let Some(relay_state) = relay_state {
					fields.push(RELAY_STATE_PARAM, relay_state);
				}

				Ok(Self::FormPost { url: destination.clone(), fields })
			},
			EncodedPayload::Redirect(value) => {
				let mut query = binding::redirect_query(
					value,
					relay_state,
					query_signature.map(|signature| signature.algorithm),
				);

				if let Some(signature) = query_signature {
					query.push('&');
					query.push_str(SIGNATURE_PARAM);
					query.push('=');
					query.push_str(&urlencoding::encode(&signature.value));
				}

				Ok(Self::Redirect { url: append_query(destination, &query)? })
			},
		}
	}

	/// Target URL of the action.
	pub fn url(&self) -> &Url {
		match self {
			Self::FormPost { url, .. } | Self::Redirect { url } => url,
		}
	}

	/// Renders the auto-submitting HTML page for form posts; `None` for redirects.
	pub fn content(&self) -> Option<String> {
		let Self::FormPost { url, fields } = self else {
			return None;
		};
		let inputs = fields
			.iter()
			.map(|(name, value)| {
				format!(
					"<input type=\"hidden\" name=\"{}\" value=\"{}\"/>",
					escape(name),
					escape(value)
				)
			})
			.collect::<Vec<_>>()
			.join("\n");

		Some(format!(
			r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
</head>
<body onload="document.forms[0].submit()">
<noscript>
<p>JavaScript is disabled. Click the button below to continue.</p>
</noscript>
<form action="{}" method="post">
{inputs}
<noscript>
<input type="submit" value="Continue"/>
</noscript>
</form>
</body>
</html>"#,
			escape(url.as_str())
		))
	}
}

fn append_query(destination: &Url, query: &str) -> Result<Url, EncodingError> {
	let mut base = destination.clone();

	base.set_fragment(None);

	let separator = match base.query() {
		None => "?",
		Some("") => "",
		Some(_) => "&",
	};

	Url::parse(&format!("{base}{separator}{query}")).map_err(EncodingError::InvalidRedirect)
}
