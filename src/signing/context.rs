//! Signing key material decoded once per client, plus the algorithm set it signs with.

// crates.io
use rsa::{
	RsaPrivateKey, RsaPublicKey,
	pkcs1::DecodeRsaPrivateKey,
	pkcs8::{DecodePrivateKey, DecodePublicKey},
};
use x509_parser::pem::parse_x509_pem;
// self
use crate::{
	_prelude::*,
	config::SigningSettings,
	error::{ConfigError, SigningError},
	signing::algorithm::{CanonicalizationAlgorithm, DigestAlgorithm, SignatureAlgorithm},
};

/// Loaded key material plus the resolved algorithm set.
///
/// Built once per client and shared read-only; the private key never appears in `Debug` output.
#[derive(Clone)]
pub struct SigningContext {
	key: RsaPrivateKey,
	certificate_der: Vec<u8>,
	/// Signature method.
	pub signature: SignatureAlgorithm,
	/// Digest method.
	pub digest: DigestAlgorithm,
	/// Canonicalization method.
	pub canonicalization: CanonicalizationAlgorithm,
}
impl SigningContext {
	/// Decodes the key and certificate, resolves the algorithms, and checks that the certificate
	/// belongs to the key.
	pub fn from_settings(settings: &SigningSettings) -> Result<Self> {
		let signature = SignatureAlgorithm::from_uri(&settings.signature_algorithm)?;
		let digest = DigestAlgorithm::from_uri(&settings.digest_algorithm)?;
		let canonicalization =
			CanonicalizationAlgorithm::from_uri(&settings.canonicalization_algorithm)?;
		let key = decode_private_key(&settings.private_key_pem)?;
		let (certificate_der, certificate_key) = decode_certificate(&settings.certificate_pem)?;

		if certificate_key != key.to_public_key() {
			return Err(SigningError::KeyCertificateMismatch.into());
		}

		Ok(Self { key, certificate_der, signature, digest, canonicalization })
	}

	/// Private key used for signing.
	pub fn key(&self) -> &RsaPrivateKey {
		&self.key
	}

	/// DER bytes of the signing certificate.
	pub fn certificate_der(&self) -> &[u8] {
		&self.certificate_der
	}
}
impl Debug for SigningContext {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SigningContext")
			.field("key", &"<redacted>")
			.field("certificate_der_len", &self.certificate_der.len())
			.field("signature", &self.signature)
			.field("digest", &self.digest)
			.field("canonicalization", &self.canonicalization)
			.finish()
	}
}

fn decode_private_key(pem: &str) -> Result<RsaPrivateKey, ConfigError> {
	RsaPrivateKey::from_pkcs8_pem(pem).or_else(|pkcs8| {
		RsaPrivateKey::from_pkcs1_pem(pem).map_err(|pkcs1| ConfigError::InvalidSigningKey {
			message: format!("PKCS#8: {pkcs8}; PKCS#1: {pkcs1}"),
		})
	})
}

fn decode_certificate(pem: &str) -> Result<(Vec<u8>, RsaPublicKey), ConfigError> {
	let (_, pem) = parse_x509_pem(pem.as_bytes())
		.map_err(|e| ConfigError::InvalidCertificate { message: e.to_string() })?;
	let certificate =
		pem.parse_x509().map_err(|e| ConfigError::InvalidCertificate { message: e.to_string() })?;
	let public_key = RsaPublicKey::from_public_key_der(certificate.public_key().raw)
		.map_err(|e| ConfigError::InvalidCertificate { message: e.to_string() })?;

	drop(certificate);

	Ok((pem.contents, public_key))
}
