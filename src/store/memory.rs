//! Thread-safe in-memory [`SessionStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	id::SessionId,
	store::{SessionStore, SessionValue, StoreError},
};

type SessionMap = Arc<RwLock<HashMap<SessionId, HashMap<String, SessionValue>>>>;

/// Thread-safe session backend that keeps values in-process for tests and demos.
///
/// Clones share the same underlying map.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionStore(SessionMap);
impl MemorySessionStore {
	/// Number of keys currently held for the session.
	pub fn len(&self, session: &SessionId) -> usize {
		self.0.read().get(session).map_or(0, HashMap::len)
	}

	/// Returns `true` when the session holds no keys.
	pub fn is_empty(&self, session: &SessionId) -> bool {
		self.len(session) == 0
	}
}
impl SessionStore for MemorySessionStore {
	fn get(&self, session: &SessionId, key: &str) -> Result<Option<SessionValue>, StoreError> {
		Ok(self.0.read().get(session).and_then(|values| values.get(key)).cloned())
	}

	fn set(&self, session: &SessionId, key: &str, value: SessionValue) -> Result<(), StoreError> {
		self.0.write().entry(session.clone()).or_default().insert(key.to_owned(), value);

		Ok(())
	}

	fn remove(&self, session: &SessionId, key: &str) -> Result<(), StoreError> {
		let mut guard = self.0.write();

		if let Some(values) = guard.get_mut(session) {
			values.remove(key);

			if values.is_empty() {
				guard.remove(session);
			}
		}

		Ok(())
	}
}
