//! Enveloped document signatures and detached HTTP-Redirect query signatures.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
// self
use crate::{
	binding,
	error::SigningError,
	signing::{SigningContext, algorithm::ENVELOPED_SIGNATURE},
};

const XMLDSIG_NS: &str = "http://www.w3.org/2000/09/xmldsig#";

/// Detached HTTP-Redirect signature parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuerySignature {
	/// `SigAlg` value (algorithm URI, not yet percent-encoded).
	pub algorithm: &'static str,
	/// `Signature` value (base64, not yet percent-encoded).
	pub value: String,
}

/// Applies signatures using a borrowed [`SigningContext`].
#[derive(Clone, Copy, Debug)]
pub struct XmlSigner<'a> {
	context: &'a SigningContext,
}
impl<'a> XmlSigner<'a> {
	/// Creates a signer over the shared context.
	pub fn new(context: &'a SigningContext) -> Self {
		Self { context }
	}

	/// Embeds an enveloped signature over the element whose `ID` is `reference_id`.
	///
	/// The document must be the single root element carrying that `ID`; the signature is
	/// inserted right after its `Issuer` child.
	pub fn sign_document(&self, xml: &str, reference_id: &str) -> Result<String, SigningError> {
		let not_found = || SigningError::ReferenceNotFound { reference: reference_id.to_owned() };

		if !xml.contains(&format!(" ID=\"{reference_id}\"")) {
			return Err(not_found());
		}

		let insert_at = find_issuer_end(xml).ok_or_else(not_found)?;
		let ctx = self.context;
		let canonical = ctx.canonicalization.canonicalize(xml)?;
		let digest = STANDARD.encode(ctx.digest.digest(canonical.as_bytes()));
		let signed_info = build_signed_info(ctx, reference_id, &digest);
		let canonical_signed_info = ctx.canonicalization.canonicalize(&signed_info)?;
		let signature_value =
			STANDARD.encode(ctx.signature.sign(ctx.key(), canonical_signed_info.as_bytes())?);
		let certificate = STANDARD.encode(ctx.certificate_der());
		let signature = format!(
			"<ds:Signature xmlns:ds=\"{XMLDSIG_NS}\">{signed_info}\
			<ds:SignatureValue>{signature_value}</ds:SignatureValue>\
			<ds:KeyInfo><ds:X509Data><ds:X509Certificate>{certificate}</ds:X509Certificate>\
			</ds:X509Data></ds:KeyInfo></ds:Signature>"
		);
		let mut signed = String::with_capacity(xml.len() + signature.len());

		signed.push_str(&xml[..insert_at]);
		signed.push_str(&signature);
		signed.push_str(&xml[insert_at..]);

		Ok(signed)
	}

	/// Signs the HTTP-Redirect query octets `SAMLRequest=…[&RelayState=…]&SigAlg=…`.
	///
	/// `saml_request` is the already percent-encoded payload.
	pub fn sign_query(
		&self,
		saml_request: &str,
		relay_state: Option<&str>,
	) -> Result<QuerySignature, SigningError> {
		let algorithm = self.context.signature.uri();
		let octets = binding::redirect_query(saml_request, relay_state, Some(algorithm));
		let value =
			STANDARD.encode(self.context.signature.sign(self.context.key(), octets.as_bytes())?);

		Ok(QuerySignature { algorithm, value })
	}
}

fn build_signed_info(ctx: &SigningContext, reference_id: &str, digest: &str) -> String {
	let c14n = ctx.canonicalization.uri();
	let signature_method = ctx.signature.uri();
	let digest_method = ctx.digest.uri();

	// Explicit end tags keep the embedded form identical to its canonical form.
	format!(
		"<ds:SignedInfo xmlns:ds=\"{XMLDSIG_NS}\">\
		<ds:CanonicalizationMethod Algorithm=\"{c14n}\"></ds:CanonicalizationMethod>\
		<ds:SignatureMethod Algorithm=\"{signature_method}\"></ds:SignatureMethod>\
		<ds:Reference URI=\"#{reference_id}\"><ds:Transforms>\
		<ds:Transform Algorithm=\"{ENVELOPED_SIGNATURE}\"></ds:Transform>\
		<ds:Transform Algorithm=\"{c14n}\"></ds:Transform></ds:Transforms>\
		<ds:DigestMethod Algorithm=\"{digest_method}\"></ds:DigestMethod>\
		<ds:DigestValue>{digest}</ds:DigestValue></ds:Reference></ds:SignedInfo>"
	)
}

fn find_issuer_end(xml: &str) -> Option<usize> {
	xml.match_indices("</").find_map(|(start, _)| {
		let rest = &xml[start + 2..];
		let end = rest.find('>')?;
		let name = &rest[..end];

		(name == "Issuer" || name.ends_with(":Issuer")).then_some(start + 2 + end + 1)
	})
}
