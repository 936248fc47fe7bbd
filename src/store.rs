//! Session storage contract consumed by the protocol state store, plus an in-memory backend.

pub mod memory;

pub use memory::MemorySessionStore;

// self
use crate::{_prelude::*, id::SessionId};

/// Key/value storage scoped to a caller's web session.
///
/// Implementations are usually adapters over a web framework's session; they must be safe to
/// share between request handlers.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Reads a value, if present.
	fn get(&self, session: &SessionId, key: &str) -> Result<Option<SessionValue>, StoreError>;

	/// Inserts or replaces a value.
	fn set(&self, session: &SessionId, key: &str, value: SessionValue) -> Result<(), StoreError>;

	/// Removes a value; removing an absent key is not an error.
	fn remove(&self, session: &SessionId, key: &str) -> Result<(), StoreError>;
}

/// Value stored under a session key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionValue {
	/// Opaque text (request id, relay state).
	Text(String),
	/// Point in time (creation, expiry).
	Timestamp(#[serde(with = "time::serde::rfc3339")] OffsetDateTime),
}
impl SessionValue {
	/// Returns the text payload, if this is a text value.
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(value) => Some(value),
			Self::Timestamp(_) => None,
		}
	}

	/// Returns the timestamp payload, if this is a timestamp value.
	pub fn as_timestamp(&self) -> Option<OffsetDateTime> {
		match self {
			Self::Timestamp(value) => Some(*value),
			Self::Text(_) => None,
		}
	}
}
impl From<String> for SessionValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}
impl From<&str> for SessionValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}
impl From<OffsetDateTime> for SessionValue {
	fn from(value: OffsetDateTime) -> Self {
		Self::Timestamp(value)
	}
}

/// Error type produced by [`SessionStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// A key held a value of an unexpected kind.
	#[error("Session key `{key}` holds an unexpected value kind.")]
	UnexpectedValue {
		/// Offending key.
		key: String,
	},
}
