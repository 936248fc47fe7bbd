//! Session-scoped protocol state correlating an outbound AuthnRequest with the later response.

// self
use crate::{
	_prelude::*,
	id::{RequestId, SessionId, random_token},
	store::{SessionStore, SessionValue, StoreError},
};

/// Session key holding the outstanding request identifier.
pub const REQUEST_ID_KEY: &str = "samlRequestId";
/// Session key holding the relay state; callers may pre-seed it before issuance.
pub const RELAY_STATE_KEY: &str = "samlRelayState";
/// Session key holding the issuance time.
pub const CREATED_AT_KEY: &str = "samlRequestCreatedAt";
/// Session key holding the expiry time, when a TTL is configured.
pub const EXPIRES_AT_KEY: &str = "samlRequestExpiresAt";

// 32 alphanumeric characters carry ~190 bits of entropy.
const RELAY_STATE_LEN: usize = 32;
// The request id goes last; `load` treats its presence as a committed state.
const SAVE_ORDER: [&str; 4] = [RELAY_STATE_KEY, CREATED_AT_KEY, EXPIRES_AT_KEY, REQUEST_ID_KEY];

/// Correlation data for one outstanding request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtocolState {
	/// Identifier of the issued request.
	pub request_id: RequestId,
	/// Relay state sent alongside the request.
	pub relay_state: Option<String>,
	/// Issuance time.
	pub created_at: OffsetDateTime,
	/// Expiry time.
	pub expires_at: Option<OffsetDateTime>,
}
impl ProtocolState {
	/// Creates state for a request issued at `created_at`, expiring after `ttl` when set.
	pub fn new(
		request_id: RequestId,
		relay_state: Option<String>,
		created_at: OffsetDateTime,
		ttl: Option<Duration>,
	) -> Self {
		Self { request_id, relay_state, created_at, expires_at: ttl.map(|ttl| created_at + ttl) }
	}

	/// Returns `true` when an expiry is set and `now` is at or past it.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expires_at| now >= expires_at)
	}
}

/// Reads and writes [`ProtocolState`] for one session through a [`SessionStore`].
#[derive(Clone, Copy)]
pub struct ProtocolStateStore<'a> {
	session: &'a SessionId,
	store: &'a dyn SessionStore,
}
impl<'a> ProtocolStateStore<'a> {
	/// Binds the store to a session.
	pub fn new(session: &'a SessionId, store: &'a dyn SessionStore) -> Self {
		Self { session, store }
	}

	/// Persists the state. Keys for absent optional fields are cleared so a previous issuance
	/// cannot leak into this one.
	///
	/// All or nothing: when a write fails, keys already touched are put back to their previous
	/// values before the error is returned.
	pub fn save(&self, state: &ProtocolState) -> Result<(), StoreError> {
		let mut previous = Vec::with_capacity(SAVE_ORDER.len());

		for key in SAVE_ORDER {
			previous.push((key, self.store.get(self.session, key)?));
		}

		let values = [
			state.relay_state.clone().map(SessionValue::from),
			Some(SessionValue::from(state.created_at)),
			state.expires_at.map(SessionValue::from),
			Some(SessionValue::from(state.request_id.to_string())),
		];

		for (written, (key, value)) in SAVE_ORDER.into_iter().zip(values).enumerate() {
			if let Err(e) = self.put_or_clear(key, value) {
				self.restore(&previous[..=written]);

				return Err(e);
			}
		}

		#[cfg(feature = "tracing")]
		tracing::debug!(
			request_id = %state.request_id,
			relay_state = state.relay_state.is_some(),
			expires = state.expires_at.is_some(),
			"Protocol state saved."
		);

		Ok(())
	}

	/// Reads the state back; `None` when no request is outstanding.
	pub fn load(&self) -> Result<Option<ProtocolState>, StoreError> {
		let Some(request_id) = self.text(REQUEST_ID_KEY)? else {
			return Ok(None);
		};
		let request_id = RequestId::new(&request_id)
			.map_err(|e| StoreError::Serialization { message: e.to_string() })?;
		let relay_state = self.text(RELAY_STATE_KEY)?;
		let created_at = self
			.timestamp(CREATED_AT_KEY)?
			.ok_or_else(|| StoreError::UnexpectedValue { key: CREATED_AT_KEY.to_owned() })?;
		let expires_at = self.timestamp(EXPIRES_AT_KEY)?;

		Ok(Some(ProtocolState { request_id, relay_state, created_at, expires_at }))
	}

	/// Reads the state once and removes every key, so a response can be matched at most once.
	pub fn consume(&self) -> Result<Option<ProtocolState>, StoreError> {
		let state = self.load()?;

		for key in [REQUEST_ID_KEY, RELAY_STATE_KEY, CREATED_AT_KEY, EXPIRES_AT_KEY] {
			self.store.remove(self.session, key)?;
		}

		#[cfg(feature = "tracing")]
		tracing::debug!(found = state.is_some(), "Protocol state consumed.");

		Ok(state)
	}

	/// Picks the relay state for a new issuance.
	///
	/// Order: the caller's explicit value, then a value pre-seeded under [`RELAY_STATE_KEY`],
	/// then a fresh random token when `generate` is set. Nothing is written here; the seeded
	/// value is replaced by the next [`save`](Self::save), so a failed issuance leaves the
	/// session untouched.
	pub fn resolve_relay_state(
		&self,
		explicit: Option<String>,
		generate: bool,
	) -> Result<Option<String>, StoreError> {
		if explicit.is_some() {
			return Ok(explicit);
		}
		if let Some(seeded) = self.text(RELAY_STATE_KEY)? {
			return Ok(Some(seeded));
		}

		Ok(generate.then(|| random_token(RELAY_STATE_LEN)))
	}

	// Best effort; the original write error is what the caller sees.
	fn restore(&self, previous: &[(&str, Option<SessionValue>)]) {
		for (key, value) in previous.iter().rev() {
			if let Err(_e) = self.put_or_clear(key, value.clone()) {
				#[cfg(feature = "tracing")]
				tracing::warn!(key, error = %_e, "Failed to restore protocol state.");
			}
		}
	}

	fn put_or_clear(&self, key: &str, value: Option<SessionValue>) -> Result<(), StoreError> {
		match value {
			Some(value) => self.store.set(self.session, key, value),
			None => self.store.remove(self.session, key),
		}
	}

	fn text(&self, key: &str) -> Result<Option<String>, StoreError> {
		match self.store.get(self.session, key)? {
			None => Ok(None),
			Some(SessionValue::Text(value)) => Ok(Some(value)),
			Some(SessionValue::Timestamp(_)) =>
				Err(StoreError::UnexpectedValue { key: key.to_owned() }),
		}
	}

	fn timestamp(&self, key: &str) -> Result<Option<OffsetDateTime>, StoreError> {
		match self.store.get(self.session, key)? {
			None => Ok(None),
			Some(SessionValue::Timestamp(value)) => Ok(Some(value)),
			Some(SessionValue::Text(_)) =>
				Err(StoreError::UnexpectedValue { key: key.to_owned() }),
		}
	}
}
impl Debug for ProtocolStateStore<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProtocolStateStore").field("session", self.session).finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;
	use crate::{_preludet::*, store::MemorySessionStore};

	// Delegates to memory but refuses writes to one key.
	struct FailingStore {
		inner: MemorySessionStore,
		failing_key: &'static str,
	}
	impl SessionStore for FailingStore {
		fn get(&self, session: &SessionId, key: &str) -> Result<Option<SessionValue>, StoreError> {
			self.inner.get(session, key)
		}

		fn set(
			&self,
			session: &SessionId,
			key: &str,
			value: SessionValue,
		) -> Result<(), StoreError> {
			if key == self.failing_key {
				return Err(StoreError::Backend { message: format!("write to {key} refused") });
			}

			self.inner.set(session, key, value)
		}

		fn remove(&self, session: &SessionId, key: &str) -> Result<(), StoreError> {
			self.inner.remove(session, key)
		}
	}

	fn state(relay_state: Option<&str>, ttl: Option<Duration>) -> ProtocolState {
		ProtocolState::new(
			RequestId::new("_request-1").expect("Request id fixture should be valid."),
			relay_state.map(str::to_owned),
			datetime!(2026-03-01 12:00 UTC),
			ttl,
		)
	}

	#[test]
	fn save_without_relay_state_writes_id_and_creation_only() {
		let (store, session) = test_session();
		let states = ProtocolStateStore::new(&session, &store);

		states.save(&state(None, None)).expect("Save should succeed.");

		assert_eq!(store.len(&session), 2);
		assert_eq!(
			store.get(&session, REQUEST_ID_KEY).expect("Get should succeed."),
			Some(SessionValue::from("_request-1"))
		);
		assert_eq!(store.get(&session, RELAY_STATE_KEY).expect("Get should succeed."), None);
	}

	#[test]
	fn load_round_trips_every_field() {
		let (store, session) = test_session();
		let states = ProtocolStateStore::new(&session, &store);
		let saved = state(Some("relay-1"), Some(Duration::minutes(5)));

		states.save(&saved).expect("Save should succeed.");

		let loaded = states.load().expect("Load should succeed.").expect("State should exist.");

		assert_eq!(loaded, saved);
		assert_eq!(loaded.expires_at, Some(datetime!(2026-03-01 12:05 UTC)));
		assert!(!loaded.is_expired_at(datetime!(2026-03-01 12:04:59 UTC)));
		assert!(loaded.is_expired_at(datetime!(2026-03-01 12:05 UTC)));
	}

	#[test]
	fn consume_removes_state() {
		let (store, session) = test_session();
		let states = ProtocolStateStore::new(&session, &store);

		states
			.save(&state(Some("relay-1"), Some(Duration::minutes(5))))
			.expect("Save should succeed.");

		assert!(states.consume().expect("Consume should succeed.").is_some());
		assert!(states.consume().expect("Second consume should succeed.").is_none());
		assert!(store.is_empty(&session));
	}

	#[test]
	fn relay_state_resolution_order() {
		let (store, session) = test_session();
		let states = ProtocolStateStore::new(&session, &store);

		store.set(&session, RELAY_STATE_KEY, "seeded".into()).expect("Seed should succeed.");

		assert_eq!(
			states
				.resolve_relay_state(Some("explicit".into()), true)
				.expect("Resolve should succeed."),
			Some("explicit".into())
		);
		assert_eq!(
			states.resolve_relay_state(None, false).expect("Resolve should succeed."),
			Some("seeded".into())
		);

		store.remove(&session, RELAY_STATE_KEY).expect("Remove should succeed.");

		assert_eq!(states.resolve_relay_state(None, false).expect("Resolve should succeed."), None);

		let generated = states
			.resolve_relay_state(None, true)
			.expect("Resolve should succeed.")
			.expect("Relay state should be generated.");

		assert_eq!(generated.len(), RELAY_STATE_LEN);
	}

	#[test]
	fn mistyped_values_surface_store_errors() {
		let store = MemorySessionStore::default();
		let session = SessionId::new("session-typed").expect("Session fixture should be valid.");
		let states = ProtocolStateStore::new(&session, &store);

		store
			.set(&session, REQUEST_ID_KEY, datetime!(2026-03-01 12:00 UTC).into())
			.expect("Set should succeed.");

		let err = states.load().expect_err("A timestamp request id must be rejected.");

		assert_eq!(err, StoreError::UnexpectedValue { key: REQUEST_ID_KEY.into() });
	}

	#[test]
	fn failed_save_keeps_the_previous_state() {
		let (inner, session) = test_session();
		let previous = ProtocolState::new(
			RequestId::new("_old").expect("Request id fixture should be valid."),
			None,
			datetime!(1970-01-01 0:00 UTC),
			None,
		);

		ProtocolStateStore::new(&session, &inner).save(&previous).expect("Seed should succeed.");

		let store = FailingStore { inner, failing_key: RELAY_STATE_KEY };
		let states = ProtocolStateStore::new(&session, &store);
		let err = states
			.save(&state(Some("relay-1"), Some(Duration::minutes(5))))
			.expect_err("A refused relay-state write must fail the save.");

		assert!(matches!(err, StoreError::Backend { .. }));
		assert_eq!(states.load().expect("Load should succeed."), Some(previous));
		assert_eq!(store.inner.len(&session), 2);
	}

	#[test]
	fn failed_request_id_write_rolls_back_earlier_keys() {
		let store =
			FailingStore { inner: MemorySessionStore::default(), failing_key: REQUEST_ID_KEY };
		let session = SessionId::new("session-rollback").expect("Session fixture should be valid.");
		let states = ProtocolStateStore::new(&session, &store);

		store.inner.set(&session, RELAY_STATE_KEY, "seeded".into()).expect("Seed should succeed.");
		states
			.save(&state(Some("relay-1"), Some(Duration::minutes(5))))
			.expect_err("A refused request-id write must fail the save.");

		assert_eq!(states.load().expect("Load should succeed."), None);
		assert_eq!(
			store.inner.get(&session, RELAY_STATE_KEY).expect("Get should succeed."),
			Some(SessionValue::from("seeded"))
		);
		assert_eq!(store.inner.len(&session), 1);
	}
}
