//! Structured AuthnRequest value and the parts it is made of.

// self
use crate::{
	_prelude::*,
	binding::SamlBinding,
	error::ConfigError,
	id::{EntityId, RequestId},
};

/// Comparison mode applied to the requested authentication context classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthnContextComparison {
	/// The IdP must use one of the listed classes.
	Exact,
	/// At least as strong as one of the listed classes.
	Minimum,
	/// As strong as possible without exceeding the listed classes.
	Maximum,
	/// Stronger than any of the listed classes.
	Better,
}
impl AuthnContextComparison {
	/// Returns the schema value used in the `Comparison` attribute.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthnContextComparison::Exact => "exact",
			AuthnContextComparison::Minimum => "minimum",
			AuthnContextComparison::Maximum => "maximum",
			AuthnContextComparison::Better => "better",
		}
	}
}
impl Display for AuthnContextComparison {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for AuthnContextComparison {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"exact" => Ok(Self::Exact),
			"minimum" => Ok(Self::Minimum),
			"maximum" => Ok(Self::Maximum),
			"better" => Ok(Self::Better),
			_ => Err(ConfigError::UnknownComparison { value: s.to_owned() }),
		}
	}
}

/// `<saml2:Issuer>` element of the request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Issuer {
	/// Service provider entity identifier (element text).
	pub entity_id: EntityId,
	/// Explicit `NameQualifier` attribute, when enabled.
	pub name_qualifier: Option<String>,
	/// `Format` attribute.
	pub format: &'static str,
}

/// Where and how the IdP should deliver its response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssertionConsumerService {
	/// Explicit endpoint plus response binding.
	Endpoint {
		/// `AssertionConsumerServiceURL`.
		url: Url,
		/// `ProtocolBinding` the IdP should answer with.
		binding: SamlBinding,
	},
	/// Index into the ACS list published in the SP metadata.
	Index(u32),
}

/// `<saml2p:RequestedAuthnContext>` element of the request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestedAuthnContext {
	/// `Comparison` attribute.
	pub comparison: Option<AuthnContextComparison>,
	/// `AuthnContextClassRef` children.
	pub class_refs: Vec<String>,
}

/// `<saml2p:NameIDPolicy>` element of the request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameIdPolicy {
	/// `Format` attribute.
	pub format: Option<String>,
	/// `AllowCreate` attribute.
	pub allow_create: Option<bool>,
}

/// Structured AuthnRequest ready for serialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthnRequestDescriptor {
	/// Unique protocol identifier.
	pub id: RequestId,
	/// `IssueInstant`.
	pub issue_instant: OffsetDateTime,
	/// IdP SSO endpoint the request is addressed to.
	pub destination: Url,
	/// Requesting service provider.
	pub issuer: Issuer,
	/// Response delivery instructions.
	pub assertion_consumer_service: AssertionConsumerService,
	/// `ForceAuthn="true"` when set; omitted otherwise.
	pub force_authn: bool,
	/// `IsPassive="true"` when set; omitted otherwise.
	pub is_passive: bool,
	/// Optional human-readable `ProviderName`.
	pub provider_name: Option<String>,
	/// Optional `AttributeConsumingServiceIndex`.
	pub attribute_consuming_service_index: Option<u32>,
	/// Optional name-id policy.
	pub name_id_policy: Option<NameIdPolicy>,
	/// Optional requested authentication context.
	pub requested_authn_context: Option<RequestedAuthnContext>,
}
