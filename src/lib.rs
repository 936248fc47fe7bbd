//! Service-provider side SAML 2.0 SSO initiation: build an `AuthnRequest`, sign it, encode it
//! for the HTTP-POST or HTTP-Redirect binding, correlate it with session state, and hand back a
//! browser-deliverable redirection action.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod action;
pub mod binding;
pub mod client;
pub mod config;
pub mod error;
pub mod id;
pub mod obs;
pub mod profile;
pub mod request;
pub mod signing;
pub mod state;
pub mod store;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::{CallContext, Saml2Client},
		config::{Saml2Configuration, Saml2ConfigurationBuilder, SigningSettings},
		id::SessionId,
		store::MemorySessionStore,
	};

	/// Entity identifier used by the integration fixtures.
	pub const TEST_SP_ENTITY_ID: &str = "http://localhost:8080/cb";
	/// Identity provider SSO endpoint used by the integration fixtures.
	pub const TEST_IDP_SSO_URL: &str = "https://idp.testshib.org/idp/profile/SAML2/POST/SSO";
	/// Assertion consumer service URL used by the integration fixtures.
	pub const TEST_ACS_URL: &str = "http://localhost:8080/callback?client_name=SAML2Client";
	/// PEM-encoded PKCS#8 RSA key matching [`TEST_SP_CERTIFICATE_PEM`].
	pub const TEST_SP_KEY_PEM: &str = include_str!("../tests/fixtures/sp-key.pem");
	/// PEM-encoded certificate matching [`TEST_SP_KEY_PEM`].
	pub const TEST_SP_CERTIFICATE_PEM: &str = include_str!("../tests/fixtures/sp-cert.pem");
	/// PEM-encoded certificate for an unrelated key pair.
	pub const TEST_OTHER_CERTIFICATE_PEM: &str = include_str!("../tests/fixtures/other-cert.pem");

	/// Returns a configuration builder pre-populated with the fixture endpoints.
	pub fn test_configuration_builder() -> Saml2ConfigurationBuilder {
		Saml2Configuration::builder()
			.service_provider_entity_id(TEST_SP_ENTITY_ID)
			.identity_provider_sso_url(
				Url::parse(TEST_IDP_SSO_URL).expect("Fixture IdP SSO URL should parse."),
			)
			.assertion_consumer_service_url(
				Url::parse(TEST_ACS_URL).expect("Fixture ACS URL should parse."),
			)
	}

	/// Signing settings backed by the fixture key pair.
	pub fn test_signing_settings() -> SigningSettings {
		SigningSettings::new(TEST_SP_KEY_PEM, TEST_SP_CERTIFICATE_PEM)
	}

	/// Builds a client from the provided builder, panicking on configuration errors.
	pub fn build_test_client(builder: Saml2ConfigurationBuilder) -> Saml2Client {
		let configuration = builder.build().expect("Fixture configuration should build.");

		Saml2Client::new("SAML2Client", configuration)
	}

	/// Creates a fresh in-memory session store plus a session identifier bound to it.
	pub fn test_session() -> (MemorySessionStore, SessionId) {
		let session = SessionId::new("session-1").expect("Fixture session id should be valid.");

		(MemorySessionStore::default(), session)
	}

	/// Borrows the store + session pair as a [`CallContext`].
	pub fn test_context<'a>(
		store: &'a MemorySessionStore,
		session: &'a SessionId,
	) -> CallContext<'a> {
		CallContext::new(session, store)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use url;
#[cfg(test)] use color_eyre as _;
