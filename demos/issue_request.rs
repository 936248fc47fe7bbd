//! Issues one HTTP-Redirect AuthnRequest, then reads the protocol state back the way an
//! assertion consumer service would before validating the response.

// crates.io
use color_eyre::Result;
use time::Duration;
use url::Url;
// self
use saml2_initiator::{
	binding::SamlBinding,
	client::{CallContext, Client, Saml2Client},
	config::Saml2Configuration,
	id::SessionId,
	store::MemorySessionStore,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let configuration = Saml2Configuration::builder()
		.service_provider_entity_id("https://sp.example.com/saml")
		.identity_provider_sso_url(Url::parse("https://idp.example.com/sso")?)
		.assertion_consumer_service_url(Url::parse("https://sp.example.com/saml/acs")?)
		.authn_request_binding(SamlBinding::Redirect)
		.force_auth(true)
		.comparison_type("exact")
		.generate_relay_state(true)
		.protocol_state_ttl(Duration::minutes(5))
		.build()?;
	let client = Saml2Client::new("demo-idp", configuration);
	let store = MemorySessionStore::default();
	let session = SessionId::new("browser-session-1")?;
	let ctx = CallContext::new(&session, &store);
	let action = client.redirection_action(&ctx)?;

	println!("Send your user to {}.", action.url());

	// Simulate the ACS handler matching the response to the outstanding request.
	match ctx.protocol_state().consume()? {
		Some(state) => println!(
			"Expect InResponseTo={} with RelayState={:?}.",
			state.request_id, state.relay_state
		),
		None => eprintln!("No outstanding request for session `{session}`."),
	}

	Ok(())
}
