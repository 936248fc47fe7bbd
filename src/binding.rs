//! HTTP binding identifiers and the wire encodings applied to outbound protocol messages.
//!
//! - HTTP-POST: base64 of the raw document bytes.
//! - HTTP-Redirect: raw DEFLATE (no zlib header), then base64, then percent-encoding.

// std
use std::io::{Read, Write};
// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use flate2::{Compression, read::DeflateDecoder, write::DeflateEncoder};
// self
use crate::{_prelude::*, error::EncodingError};

/// Binding URI for HTTP-POST.
pub const HTTP_POST_BINDING_URI: &str = "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST";
/// Binding URI for HTTP-Redirect.
pub const HTTP_REDIRECT_BINDING_URI: &str = "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect";

/// HTTP transports supported for delivering protocol messages through the browser.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SamlBinding {
	/// Auto-submitting HTML form.
	#[default]
	Post,
	/// Query-string redirect.
	Redirect,
}
impl SamlBinding {
	/// Returns the SAML binding URI.
	pub const fn uri(self) -> &'static str {
		match self {
			SamlBinding::Post => HTTP_POST_BINDING_URI,
			SamlBinding::Redirect => HTTP_REDIRECT_BINDING_URI,
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SamlBinding::Post => "post",
			SamlBinding::Redirect => "redirect",
		}
	}
}
impl Display for SamlBinding {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.uri())
	}
}
impl FromStr for SamlBinding {
	type Err = crate::error::ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			HTTP_POST_BINDING_URI => Ok(SamlBinding::Post),
			HTTP_REDIRECT_BINDING_URI => Ok(SamlBinding::Redirect),
			_ => Err(crate::error::ConfigError::UnsupportedBinding { value: s.to_owned() }),
		}
	}
}
impl TryFrom<String> for SamlBinding {
	type Error = crate::error::ConfigError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}
impl From<SamlBinding> for String {
	fn from(value: SamlBinding) -> Self {
		value.uri().to_owned()
	}
}

/// A protocol message encoded for exactly one binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncodedPayload {
	/// Base64 of the raw document.
	Post(String),
	/// Percent-encoded base64 of the raw-deflated document.
	Redirect(String),
}
impl EncodedPayload {
	/// Encodes the document for the given binding.
	pub fn encode(binding: SamlBinding, document: &str) -> Result<Self, EncodingError> {
		match binding {
			SamlBinding::Post => Ok(Self::Post(encode_post(document))),
			SamlBinding::Redirect => encode_redirect(document).map(Self::Redirect),
		}
	}

	/// Binding this payload was encoded for.
	pub fn binding(&self) -> SamlBinding {
		match self {
			Self::Post(_) => SamlBinding::Post,
			Self::Redirect(_) => SamlBinding::Redirect,
		}
	}

	/// Encoded wire value.
	pub fn as_str(&self) -> &str {
		match self {
			Self::Post(value) | Self::Redirect(value) => value,
		}
	}

	/// Reverses the binding's encoding, returning the original document.
	pub fn decode(&self) -> Result<String, EncodingError> {
		match self {
			Self::Post(value) => decode_post(value),
			Self::Redirect(value) => decode_redirect(value),
		}
	}
}

/// Base64-encodes the document for the HTTP-POST binding.
pub fn encode_post(document: &str) -> String {
	STANDARD.encode(document.as_bytes())
}

/// Raw-deflates, base64-encodes, then percent-encodes the document for the HTTP-Redirect
/// binding.
pub fn encode_redirect(document: &str) -> Result<String, EncodingError> {
	let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());

	encoder.write_all(document.as_bytes())?;

	let compressed = encoder.finish()?;

	Ok(urlencoding::encode(&STANDARD.encode(compressed)).into_owned())
}

/// Builds the HTTP-Redirect query string, in the exact octet order covered by a detached query
/// signature: `SAMLRequest=…[&RelayState=…][&SigAlg=…]`.
///
/// `saml_request` must already be encoded by [`encode_redirect`]; the relay state and algorithm
/// URI are percent-encoded here.
pub fn redirect_query(saml_request: &str, relay_state: Option<&str>, sig_alg: Option<&str>) -> String {
	let mut query = format!("SAMLRequest={saml_request}");

	if let Some(relay_state) = relay_state {
		query.push_str("&RelayState=");
		query.push_str(&urlencoding::encode(relay_state));
	}
	if let Some(sig_alg) = sig_alg {
		query.push_str("&SigAlg=");
		query.push_str(&urlencoding::encode(sig_alg));
	}

	query
}

/// Decodes an HTTP-POST payload.
pub fn decode_post(value: &str) -> Result<String, EncodingError> {
	// Some IdPs and form encoders wrap base64 at 76 columns.
	let stripped: String = value.chars().filter(|c| !c.is_ascii_whitespace()).collect();

	Ok(String::from_utf8(STANDARD.decode(stripped)?)?)
}

/// Decodes an HTTP-Redirect payload that is still percent-encoded.
pub fn decode_redirect(value: &str) -> Result<String, EncodingError> {
	let unescaped = urlencoding::decode(value)?;

	inflate_base64(&unescaped)
}

/// Decodes an HTTP-Redirect payload whose percent-encoding was already removed (e.g. by a
/// query-string parser).
pub fn inflate_base64(value: &str) -> Result<String, EncodingError> {
	let compressed = STANDARD.decode(value)?;
	let mut decoder = DeflateDecoder::new(compressed.as_slice());
	let mut document = String::new();

	decoder.read_to_string(&mut document)?;

	Ok(document)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const DOCUMENT: &str = "<samlp:AuthnRequest ID=\"_abc\">payload &amp; more</samlp:AuthnRequest>";

	#[test]
	fn binding_uris_parse_and_reject_unknown_values() {
		assert_eq!(HTTP_POST_BINDING_URI.parse::<SamlBinding>().ok(), Some(SamlBinding::Post));
		assert_eq!(
			HTTP_REDIRECT_BINDING_URI.parse::<SamlBinding>().ok(),
			Some(SamlBinding::Redirect)
		);

		let err = "urn:oasis:names:tc:SAML:2.0:bindings:SOAP"
			.parse::<SamlBinding>()
			.expect_err("SOAP is not a supported request binding.");

		assert!(err.to_string().contains("SOAP"));
	}

	#[test]
	fn post_payload_is_plain_base64() {
		let payload = EncodedPayload::encode(SamlBinding::Post, DOCUMENT)
			.expect("POST encoding should not fail.");

		assert_eq!(payload.binding(), SamlBinding::Post);
		assert_eq!(
			STANDARD.decode(payload.as_str()).expect("Payload should be base64."),
			DOCUMENT.as_bytes()
		);
	}

	#[test]
	fn redirect_payload_is_raw_deflate_without_zlib_header() {
		let payload = EncodedPayload::encode(SamlBinding::Redirect, DOCUMENT)
			.expect("Redirect encoding should not fail.");
		let unescaped =
			urlencoding::decode(payload.as_str()).expect("Payload should percent-decode.");
		let compressed = STANDARD.decode(unescaped.as_bytes()).expect("Payload should be base64.");

		// A zlib stream would start with 0x78.
		assert_ne!(compressed.first(), Some(&0x78));
		assert!(!payload.as_str().contains('+'));
		assert!(!payload.as_str().contains('/'));
		assert!(!payload.as_str().contains('='));
		assert_eq!(payload.decode().expect("Payload should inflate."), DOCUMENT);
	}

	#[test]
	fn decode_post_tolerates_wrapped_base64() {
		let encoded = encode_post(DOCUMENT);
		let wrapped = format!("{}\r\n{}", &encoded[..10], &encoded[10..]);

		assert_eq!(decode_post(&wrapped).expect("Wrapped payload should decode."), DOCUMENT);
	}

	#[test]
	fn redirect_query_orders_signed_parameters() {
		assert_eq!(redirect_query("abc%2B", None, None), "SAMLRequest=abc%2B");
		assert_eq!(
			redirect_query(
				"abc",
				Some("state a&b"),
				Some("http://www.w3.org/2001/04/xmldsig-more#rsa-sha256")
			),
			"SAMLRequest=abc&RelayState=state%20a%26b&SigAlg=http%3A%2F%2Fwww.w3.org%2F2001%2F04%2Fxmldsig-more%23rsa-sha256"
		);
	}

	#[test]
	fn malformed_payloads_surface_encoding_errors() {
		assert!(matches!(decode_post("!!!"), Err(EncodingError::Base64(_))));
		assert!(matches!(decode_redirect("not base64!"), Err(EncodingError::Base64(_))));
	}
}
