//! XML-DSig signing for outbound AuthnRequests.
//!
//! HTTP-POST requests carry an enveloped signature; HTTP-Redirect requests are signed over the
//! query string instead, because the deflated message cannot carry one.

pub mod algorithm;
pub mod context;
pub mod signer;

mod c14n;

pub use context::*;
pub use signer::*;
