//! Strongly typed identifiers used across request issuance and session correlation.

// std
use std::{borrow::Borrow, ops::Deref};
// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal, $max:expr) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, $max, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, $max, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

// SAML 2.0 core caps entityID at 1024 characters.
const ENTITY_ID_MAX_LEN: usize = 1024;
const SESSION_ID_MAX_LEN: usize = 256;
const REQUEST_ID_MAX_LEN: usize = 256;
// 40 alphanumeric characters carry ~238 bits of entropy.
const REQUEST_ID_RANDOM_LEN: usize = 40;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (entity, session, request).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (entity, session, request).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (entity, session, request).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { EntityId, "Globally unique URI identifying a SAML participant.", "Entity", ENTITY_ID_MAX_LEN }
def_id! { SessionId, "Identifier of the caller's web session; the correlation anchor.", "Session", SESSION_ID_MAX_LEN }
def_id! { RequestId, "Protocol identifier carried in the `ID` attribute of an AuthnRequest.", "Request", REQUEST_ID_MAX_LEN }

impl RequestId {
	/// Generates a fresh identifier from the thread-local CSPRNG.
	///
	/// The leading underscore keeps the value a valid `xs:ID` (an NCName cannot start with a
	/// digit).
	pub fn generate() -> Self {
		Self(format!("_{}", random_token(REQUEST_ID_RANDOM_LEN)))
	}
}

/// Returns `len` alphanumeric characters drawn from the thread-local CSPRNG.
pub(crate) fn random_token(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}

fn validate_view(kind: &'static str, max: usize, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > max {
		return Err(IdentifierError::TooLong { kind, max });
	}

	Ok(())
}
