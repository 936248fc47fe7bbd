//! XML-DSig algorithm allow-lists and the primitives behind them.

// crates.io
use rsa::{
	RsaPrivateKey,
	pkcs1v15::SigningKey,
	signature::{SignatureEncoding, Signer},
};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};
// self
use crate::{error::SigningError, signing::c14n};

/// `rsa-sha1` signature method.
pub const RSA_SHA1: &str = "http://www.w3.org/2000/09/xmldsig#rsa-sha1";
/// `rsa-sha256` signature method.
pub const RSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256";
/// `rsa-sha384` signature method.
pub const RSA_SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha384";
/// `rsa-sha512` signature method.
pub const RSA_SHA512: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha512";
/// SHA-1 digest method.
pub const DIGEST_SHA1: &str = "http://www.w3.org/2000/09/xmldsig#sha1";
/// SHA-256 digest method.
pub const DIGEST_SHA256: &str = "http://www.w3.org/2001/04/xmlenc#sha256";
/// SHA-384 digest method.
pub const DIGEST_SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#sha384";
/// SHA-512 digest method.
pub const DIGEST_SHA512: &str = "http://www.w3.org/2001/04/xmlenc#sha512";
/// Exclusive canonicalization without comments.
pub const EXC_C14N: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";
/// Exclusive canonicalization with comments.
pub const EXC_C14N_WITH_COMMENTS: &str = "http://www.w3.org/2001/10/xml-exc-c14n#WithComments";
/// Enveloped-signature transform.
pub const ENVELOPED_SIGNATURE: &str = "http://www.w3.org/2000/09/xmldsig#enveloped-signature";

/// Default signature method.
pub const DEFAULT_SIGNATURE: &str = RSA_SHA256;
/// Default digest method.
pub const DEFAULT_DIGEST: &str = DIGEST_SHA256;
/// Default canonicalization method.
pub const DEFAULT_CANONICALIZATION: &str = EXC_C14N;

/// Allowed signature methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
	/// RSA PKCS#1 v1.5 with SHA-1; accepted for legacy IdPs only.
	RsaSha1,
	/// RSA PKCS#1 v1.5 with SHA-256.
	RsaSha256,
	/// RSA PKCS#1 v1.5 with SHA-384.
	RsaSha384,
	/// RSA PKCS#1 v1.5 with SHA-512.
	RsaSha512,
}
impl SignatureAlgorithm {
	/// Resolves an allow-listed URI.
	pub fn from_uri(uri: &str) -> Result<Self, SigningError> {
		match uri {
			RSA_SHA1 => Ok(Self::RsaSha1),
			RSA_SHA256 => Ok(Self::RsaSha256),
			RSA_SHA384 => Ok(Self::RsaSha384),
			RSA_SHA512 => Ok(Self::RsaSha512),
			_ => Err(SigningError::UnsupportedAlgorithm { kind: "signature", uri: uri.to_owned() }),
		}
	}

	/// Returns the algorithm URI.
	pub const fn uri(self) -> &'static str {
		match self {
			Self::RsaSha1 => RSA_SHA1,
			Self::RsaSha256 => RSA_SHA256,
			Self::RsaSha384 => RSA_SHA384,
			Self::RsaSha512 => RSA_SHA512,
		}
	}

	/// Signs `message` with PKCS#1 v1.5 padding.
	pub fn sign(self, key: &RsaPrivateKey, message: &[u8]) -> Result<Vec<u8>, SigningError> {
		let key = key.clone();
		let signature = match self {
			Self::RsaSha1 => SigningKey::<Sha1>::new(key).try_sign(message),
			Self::RsaSha256 => SigningKey::<Sha256>::new(key).try_sign(message),
			Self::RsaSha384 => SigningKey::<Sha384>::new(key).try_sign(message),
			Self::RsaSha512 => SigningKey::<Sha512>::new(key).try_sign(message),
		}
		.map_err(|e| SigningError::Creation { message: e.to_string() })?;

		Ok(signature.to_vec())
	}
}

/// Allowed digest methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
	/// SHA-1; accepted for legacy IdPs only.
	Sha1,
	/// SHA-256.
	Sha256,
	/// SHA-384.
	Sha384,
	/// SHA-512.
	Sha512,
}
impl DigestAlgorithm {
	/// Resolves an allow-listed URI.
	pub fn from_uri(uri: &str) -> Result<Self, SigningError> {
		match uri {
			DIGEST_SHA1 => Ok(Self::Sha1),
			DIGEST_SHA256 => Ok(Self::Sha256),
			DIGEST_SHA384 => Ok(Self::Sha384),
			DIGEST_SHA512 => Ok(Self::Sha512),
			_ => Err(SigningError::UnsupportedAlgorithm { kind: "digest", uri: uri.to_owned() }),
		}
	}

	/// Returns the algorithm URI.
	pub const fn uri(self) -> &'static str {
		match self {
			Self::Sha1 => DIGEST_SHA1,
			Self::Sha256 => DIGEST_SHA256,
			Self::Sha384 => DIGEST_SHA384,
			Self::Sha512 => DIGEST_SHA512,
		}
	}

	/// Hashes `data`.
	pub fn digest(self, data: &[u8]) -> Vec<u8> {
		match self {
			Self::Sha1 => Sha1::digest(data).to_vec(),
			Self::Sha256 => Sha256::digest(data).to_vec(),
			Self::Sha384 => Sha384::digest(data).to_vec(),
			Self::Sha512 => Sha512::digest(data).to_vec(),
		}
	}
}

/// Allowed canonicalization methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CanonicalizationAlgorithm {
	/// Exclusive C14N, comments stripped.
	ExclusiveC14n,
	/// Exclusive C14N, comments kept.
	ExclusiveC14nWithComments,
}
impl CanonicalizationAlgorithm {
	/// Resolves an allow-listed URI.
	pub fn from_uri(uri: &str) -> Result<Self, SigningError> {
		match uri {
			EXC_C14N => Ok(Self::ExclusiveC14n),
			EXC_C14N_WITH_COMMENTS => Ok(Self::ExclusiveC14nWithComments),
			_ => Err(SigningError::UnsupportedAlgorithm {
				kind: "canonicalization",
				uri: uri.to_owned(),
			}),
		}
	}

	/// Returns the algorithm URI.
	pub const fn uri(self) -> &'static str {
		match self {
			Self::ExclusiveC14n => EXC_C14N,
			Self::ExclusiveC14nWithComments => EXC_C14N_WITH_COMMENTS,
		}
	}

	/// Canonicalizes a standalone XML document or fragment.
	pub fn canonicalize(self, xml: &str) -> Result<String, SigningError> {
		c14n::canonicalize(xml, matches!(self, Self::ExclusiveC14nWithComments))
	}
}
