//! Crate-level error types shared across configuration, signing, encoding, and session storage.

// self
use crate::{_prelude::*, id::IdentifierError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical error exposed by public APIs.
///
/// Issuance is all-or-nothing: any variant returned from a redirection call means no
/// redirection action was produced.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Session storage failure, propagated unchanged from the store implementation.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem; fatal for the client until reconfigured.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Per-request signing failure.
	#[error(transparent)]
	Signing(#[from] SigningError),
	/// Internal encoding failure (XML writer, compression, URL assembly).
	#[error(transparent)]
	Encoding(#[from] EncodingError),

	/// The operation is not supported by this protocol mode.
	#[error("Operation not supported by this protocol mode: {reason}.")]
	Unsupported {
		/// Which operation was refused and why.
		reason: &'static str,
	},
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Service provider entity identifier is blank or malformed.
	#[error("Service provider entity id is invalid.")]
	InvalidEntityId(#[source] IdentifierError),
	/// Identity provider SSO endpoint was never configured.
	#[error("Identity provider SSO URL is missing.")]
	MissingDestination,
	/// Assertion consumer service URL was never configured.
	#[error("Assertion consumer service URL is missing.")]
	MissingAssertionConsumerService,
	/// A configured URL cannot be parsed.
	#[error("The {field} URL is invalid.")]
	InvalidUrl {
		/// Configuration field holding the URL.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Comparison type is not one of `exact`, `minimum`, `maximum`, `better`.
	#[error("Unknown authentication context comparison type `{value}`.")]
	UnknownComparison {
		/// Rejected value.
		value: String,
	},
	/// Binding identifier is not the HTTP-POST or HTTP-Redirect binding URI.
	#[error("Unsupported binding `{value}`.")]
	UnsupportedBinding {
		/// Rejected value.
		value: String,
	},
	/// Request signing is enabled but no key material was configured.
	#[error("AuthnRequest signing is enabled but no signing key is configured.")]
	MissingSigningKey,
	/// The private key PEM cannot be decoded.
	#[error("Signing key cannot be decoded: {message}.")]
	InvalidSigningKey {
		/// Decoder message.
		message: String,
	},
	/// The certificate PEM cannot be decoded.
	#[error("Signing certificate cannot be decoded: {message}.")]
	InvalidCertificate {
		/// Decoder message.
		message: String,
	},
	/// Protocol state TTL must be positive.
	#[error("Protocol state TTL must be positive.")]
	NonPositiveStateTtl,
	/// JSON settings could not be deserialized.
	#[error("Settings document is invalid.")]
	InvalidSettings {
		/// Structured parsing failure carrying the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Signature creation failures.
#[derive(Debug, ThisError)]
pub enum SigningError {
	/// Algorithm identifier is not on the allow-list.
	#[error("Unsupported {kind} algorithm `{uri}`.")]
	UnsupportedAlgorithm {
		/// Which algorithm slot was rejected (signature, digest, canonicalization).
		kind: &'static str,
		/// Rejected identifier.
		uri: String,
	},
	/// The certificate's public key does not belong to the private key.
	#[error("Signing certificate does not match the private key.")]
	KeyCertificateMismatch,
	/// Canonicalization of the document or `SignedInfo` failed.
	#[error("XML canonicalization failed: {message}.")]
	Canonicalization {
		/// Canonicalizer message.
		message: String,
	},
	/// The element to sign could not be located.
	#[error("Signed element `{reference}` not found.")]
	ReferenceNotFound {
		/// Referenced identifier.
		reference: String,
	},
	/// The RSA primitive failed.
	#[error("Signature creation failed: {message}.")]
	Creation {
		/// Underlying message.
		message: String,
	},
}

/// Encoding failures; these indicate an internal fault rather than bad input.
#[derive(Debug, ThisError)]
pub enum EncodingError {
	/// XML writer failure.
	#[error("XML serialization failed: {message}.")]
	Xml {
		/// Writer message.
		message: String,
	},
	/// DEFLATE compression or decompression failure.
	#[error("DEFLATE stream failed.")]
	Deflate(#[from] std::io::Error),
	/// Base64 decoding failure.
	#[error("Base64 payload is malformed.")]
	Base64(#[from] base64::DecodeError),
	/// Percent-decoding or UTF-8 decoding failure.
	#[error("Payload is not valid UTF-8.")]
	Utf8(#[from] std::string::FromUtf8Error),
	/// The final redirect URL could not be assembled.
	#[error("Redirect URL is invalid.")]
	InvalidRedirect(#[source] url::ParseError),
}
impl EncodingError {
	/// Wraps an XML writer failure.
	pub fn xml(src: impl Display) -> Self {
		Self::Xml { message: src.to_string() }
	}
}
