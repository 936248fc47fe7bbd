//! AuthnRequest data model, the configuration-driven builder, and its XML serialization.
//!
//! `descriptor` holds the structured request value, `builder` assembles it from an immutable
//! [`Saml2Configuration`](crate::config::Saml2Configuration), and `xml` renders it in a form that
//! exclusive canonicalization leaves stable (sorted attributes, explicit end tags).

pub mod builder;
pub mod descriptor;
pub mod xml;

pub use builder::*;
pub use descriptor::*;

/// SAML 2.0 protocol namespace.
pub const SAML2P_NS: &str = "urn:oasis:names:tc:SAML:2.0:protocol";
/// SAML 2.0 assertion namespace.
pub const SAML2_NS: &str = "urn:oasis:names:tc:SAML:2.0:assertion";
/// Name-id format used for entity issuers.
pub const NAME_ID_FORMAT_ENTITY: &str = "urn:oasis:names:tc:SAML:2.0:nameid-format:entity";
