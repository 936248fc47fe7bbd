//! Canonical-friendly XML rendering of [`AuthnRequestDescriptor`].

// crates.io
use quick_xml::{
	Writer,
	events::{BytesEnd, BytesStart, BytesText, Event},
};
use time::format_description::well_known::iso8601::{self, TimePrecision};
// self
use crate::{
	_prelude::*,
	error::EncodingError,
	request::{
		AssertionConsumerService, AuthnRequestDescriptor, NameIdPolicy, RequestedAuthnContext,
		SAML2_NS, SAML2P_NS,
	},
};

/// `xs:dateTime` rendering with whole seconds; many IdPs reject fractional precision.
pub const DATE_TIME_FORMAT: iso8601::Iso8601<
	{
		iso8601::Config::DEFAULT
			.set_time_precision(TimePrecision::Second { decimal_digits: None })
			.encode()
	},
> = iso8601::Iso8601;

const SAML_VERSION: &str = "2.0";

impl AuthnRequestDescriptor {
	/// Serializes the request without an XML declaration.
	///
	/// Attributes are written in exclusive-canonical order and every element gets an explicit
	/// end tag, so canonicalizing the output is a no-op apart from whitespace handling.
	pub fn to_xml(&self) -> Result<String, EncodingError> {
		let mut writer = XmlWriter::new();
		let issue_instant =
			self.issue_instant.format(&DATE_TIME_FORMAT).map_err(EncodingError::xml)?;
		let force_authn = self.force_authn.then_some("true");
		let is_passive = self.is_passive.then_some("true");
		let (acs_index, acs_url, protocol_binding) = match &self.assertion_consumer_service {
			AssertionConsumerService::Index(index) => (Some(index.to_string()), None, None),
			AssertionConsumerService::Endpoint { url, binding } =>
				(None, Some(url.as_str()), Some(binding.uri())),
		};
		let attribute_consuming_service_index =
			self.attribute_consuming_service_index.map(|index| index.to_string());

		writer.start(
			"saml2p:AuthnRequest",
			Some(("xmlns:saml2p", SAML2P_NS)),
			[
				("AssertionConsumerServiceIndex", acs_index.as_deref()),
				("AssertionConsumerServiceURL", acs_url),
				("AttributeConsumingServiceIndex", attribute_consuming_service_index.as_deref()),
				("Destination", Some(self.destination.as_str())),
				("ForceAuthn", force_authn),
				("ID", Some(self.id.as_ref())),
				("IsPassive", is_passive),
				("IssueInstant", Some(issue_instant.as_str())),
				("ProtocolBinding", protocol_binding),
				("ProviderName", self.provider_name.as_deref()),
				("Version", Some(SAML_VERSION)),
			],
		)?;
		writer.start(
			"saml2:Issuer",
			Some(("xmlns:saml2", SAML2_NS)),
			[
				("Format", Some(self.issuer.format)),
				("NameQualifier", self.issuer.name_qualifier.as_deref()),
			],
		)?;
		writer.text(&self.issuer.entity_id)?;
		writer.end("saml2:Issuer")?;

		if let Some(policy) = &self.name_id_policy {
			write_name_id_policy(&mut writer, policy)?;
		}
		if let Some(context) = &self.requested_authn_context {
			write_requested_authn_context(&mut writer, context)?;
		}

		writer.end("saml2p:AuthnRequest")?;

		writer.finish()
	}
}

fn write_name_id_policy(writer: &mut XmlWriter, policy: &NameIdPolicy) -> Result<(), EncodingError> {
	let allow_create = policy.allow_create.map(|allow| if allow { "true" } else { "false" });

	writer.start(
		"saml2p:NameIDPolicy",
		None,
		[("AllowCreate", allow_create), ("Format", policy.format.as_deref())],
	)?;
	writer.end("saml2p:NameIDPolicy")
}

fn write_requested_authn_context(
	writer: &mut XmlWriter,
	context: &RequestedAuthnContext,
) -> Result<(), EncodingError> {
	writer.start(
		"saml2p:RequestedAuthnContext",
		None,
		[("Comparison", context.comparison.map(|comparison| comparison.as_str()))],
	)?;

	for class_ref in &context.class_refs {
		writer.start("saml2:AuthnContextClassRef", Some(("xmlns:saml2", SAML2_NS)), [])?;
		writer.text(class_ref)?;
		writer.end("saml2:AuthnContextClassRef")?;
	}

	writer.end("saml2p:RequestedAuthnContext")
}

struct XmlWriter {
	inner: Writer<Vec<u8>>,
}
impl XmlWriter {
	fn new() -> Self {
		Self { inner: Writer::new(Vec::new()) }
	}

	/// Writes a start tag. `attributes` must already be in canonical order; absent values are
	/// skipped.
	fn start<const N: usize>(
		&mut self,
		name: &str,
		namespace: Option<(&str, &str)>,
		attributes: [(&str, Option<&str>); N],
	) -> Result<(), EncodingError> {
		let mut start = BytesStart::new(name);

		if let Some(namespace) = namespace {
			start.push_attribute(namespace);
		}

		for (key, value) in attributes {
			if let Some(value) = value {
				start.push_attribute((key, value));
			}
		}

		self.write(Event::Start(start))
	}

	fn text(&mut self, value: &str) -> Result<(), EncodingError> {
		self.write(Event::Text(BytesText::new(value)))
	}

	fn end(&mut self, name: &str) -> Result<(), EncodingError> {
		self.write(Event::End(BytesEnd::new(name)))
	}

	fn write(&mut self, event: Event) -> Result<(), EncodingError> {
		self.inner.write_event(event).map_err(EncodingError::xml)
	}

	fn finish(self) -> Result<String, EncodingError> {
		Ok(String::from_utf8(self.inner.into_inner())?)
	}
}
