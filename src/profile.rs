//! Profile kinds and their restoration from typed identifiers.
//!
//! A typed identifier has the form `<kind>#<id>`. Only the finite set of [`ProfileKind`]s can be
//! restored; anything else falls back to the definition's default kind.

// self
use crate::_prelude::*;

/// Separator between the kind and the identifier in a typed identifier.
pub const TYPED_ID_SEPARATOR: char = '#';

/// Known profile kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
	/// Generic profile with the common attribute set.
	#[default]
	Common,
	/// Minimal profile carrying only an identifier.
	Basic,
	/// Profile built from a SAML2 assertion.
	Saml2,
}
impl ProfileKind {
	/// Every kind the registry can restore.
	pub const ALL: [ProfileKind; 3] = [ProfileKind::Common, ProfileKind::Basic, ProfileKind::Saml2];

	/// Stable identifier used as the typed-id prefix.
	pub const fn id(self) -> &'static str {
		match self {
			ProfileKind::Common => "CommonProfile",
			ProfileKind::Basic => "BasicUserProfile",
			ProfileKind::Saml2 => "SAML2Profile",
		}
	}

	/// Looks up a kind by its stable identifier.
	pub fn from_id(id: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.id() == id)
	}
}
impl Display for ProfileKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.id())
	}
}

/// A freshly created profile shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserProfile {
	/// Restored or default kind.
	pub kind: ProfileKind,
	/// Identifier without the kind prefix, when one was given.
	pub id: Option<String>,
}
impl UserProfile {
	/// Renders the typed identifier `<kind>#<id>`.
	pub fn typed_id(&self) -> String {
		format!("{}{TYPED_ID_SEPARATOR}{}", self.kind, self.id.as_deref().unwrap_or_default())
	}
}

/// Creates profiles of a default kind, optionally restoring the kind from a typed identifier.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProfileDefinition {
	default_kind: ProfileKind,
	restore_from_typed_id: bool,
}
impl ProfileDefinition {
	/// Creates a definition producing `default_kind`.
	pub fn new(default_kind: ProfileKind) -> Self {
		Self { default_kind, restore_from_typed_id: false }
	}

	/// Enables or disables restoring the kind from typed identifiers.
	pub fn restore_from_typed_id(mut self, enabled: bool) -> Self {
		self.restore_from_typed_id = enabled;

		self
	}

	/// Creates a profile of the default kind.
	pub fn new_default_profile(&self) -> UserProfile {
		UserProfile { kind: self.default_kind, id: None }
	}

	/// Creates a profile for `typed_id`.
	///
	/// With restoration enabled, a known kind before the separator wins. A missing separator or
	/// an unknown kind yields the default kind.
	pub fn new_profile(&self, typed_id: &str) -> UserProfile {
		let Some((kind, id)) = typed_id.split_once(TYPED_ID_SEPARATOR) else {
			return self.new_default_profile();
		};
		let id = (!id.is_empty()).then(|| id.to_owned());
		let kind = if self.restore_from_typed_id {
			ProfileKind::from_id(kind).unwrap_or(self.default_kind)
		} else {
			self.default_kind
		};

		UserProfile { kind, id }
	}
}
