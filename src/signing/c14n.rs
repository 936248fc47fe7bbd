//! Exclusive XML canonicalization (`xml-exc-c14n#`) over a streaming `quick-xml` reader.
//!
//! Only visibly utilized namespaces are rendered, and only where the nearest rendered ancestor
//! does not already carry the same binding. Declarations come first, sorted by prefix, followed
//! by attributes sorted by namespace URI and local name.

// std
use std::borrow::Cow;
// crates.io
use quick_xml::{
	Reader,
	escape,
	events::{BytesStart, Event},
};
// self
use crate::error::SigningError;

const XML_PREFIX: &str = "xml";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Canonicalizes a standalone document; `with_comments` keeps comment nodes.
pub(crate) fn canonicalize(xml: &str, with_comments: bool) -> Result<String, SigningError> {
	let mut reader = Reader::from_str(xml);
	let mut scopes = NamespaceScopes::default();
	let mut output = String::with_capacity(xml.len());
	let mut depth = 0_usize;
	let mut seen_root = false;

	loop {
		match reader.read_event().map_err(failure)? {
			Event::Start(e) => {
				write_start(&mut output, &mut scopes, &e)?;

				depth += 1;
				seen_root = true;
			},
			Event::Empty(e) => {
				let name = write_start(&mut output, &mut scopes, &e)?;

				write_end(&mut output, &mut scopes, &name);

				seen_root = true;
			},
			Event::End(e) => {
				let name = e.name();

				write_end(&mut output, &mut scopes, utf8(name.as_ref())?);

				depth = depth.saturating_sub(1);
			},
			Event::Text(e) if depth > 0 => {
				let raw = e.into_inner();
				let raw = normalize_line_breaks(utf8(&raw)?);
				let text = escape::unescape(&raw).map_err(failure)?;

				escape_text(&mut output, &text);
			},
			Event::CData(e) if depth > 0 => {
				let raw = e.into_inner();

				escape_text(&mut output, &normalize_line_breaks(utf8(&raw)?));
			},
			Event::Comment(e) if with_comments => {
				let raw = e.into_inner();
				let node = format!("<!--{}-->", normalize_line_breaks(utf8(&raw)?));

				push_node(&mut output, &node, depth, seen_root);
			},
			Event::PI(e) => {
				let target = utf8(e.target())?;
				let data = normalize_line_breaks(utf8(e.content())?);
				let data = data.trim_start_matches([' ', '\t', '\n']);
				let node = if data.is_empty() {
					format!("<?{target}?>")
				} else {
					format!("<?{target} {data}?>")
				};

				push_node(&mut output, &node, depth, seen_root);
			},
			Event::Eof => break,
			// Declarations, DOCTYPE, dropped comments and whitespace outside the root.
			_ => (),
		}
	}

	if !seen_root {
		return Err(SigningError::Canonicalization {
			message: "document has no root element".into(),
		});
	}

	Ok(output)
}

#[derive(Debug, Default)]
struct NamespaceScopes {
	// (prefix, URI) pairs declared on each open element; the default namespace uses "".
	declared: Vec<Vec<(String, String)>>,
	// (prefix, URI) pairs written on each open element.
	rendered: Vec<Vec<(String, String)>>,
}
impl NamespaceScopes {
	fn resolve(&self, prefix: &str) -> Result<&str, SigningError> {
		if prefix == XML_PREFIX {
			return Ok(XML_NS);
		}

		let bound = self
			.declared
			.iter()
			.rev()
			.flat_map(|frame| frame.iter())
			.find(|(declared, _)| declared == prefix)
			.map(|(_, uri)| uri.as_str());

		match bound {
			Some(uri) => Ok(uri),
			None if prefix.is_empty() => Ok(""),
			None => Err(SigningError::Canonicalization {
				message: format!("namespace prefix `{prefix}` is not bound"),
			}),
		}
	}

	fn rendered(&self, prefix: &str) -> Option<&str> {
		self.rendered
			.iter()
			.rev()
			.flat_map(|frame| frame.iter())
			.find(|(rendered, _)| rendered == prefix)
			.map(|(_, uri)| uri.as_str())
	}

	fn needs_rendering(&self, prefix: &str, uri: &str) -> bool {
		match self.rendered(prefix) {
			Some(rendered) => rendered != uri,
			// An undeclared default namespace is already the empty one.
			None => !(prefix.is_empty() && uri.is_empty()),
		}
	}
}

struct CanonicalAttribute {
	namespace: String,
	local: String,
	name: String,
	value: String,
}

fn write_start(
	output: &mut String,
	scopes: &mut NamespaceScopes,
	e: &BytesStart,
) -> Result<String, SigningError> {
	let name = utf8(e.name().as_ref())?.to_owned();
	let mut declarations = Vec::new();
	let mut attributes = Vec::new();

	for attribute in e.attributes() {
		let attribute = attribute.map_err(failure)?;
		let key = utf8(attribute.key.as_ref())?;
		let raw = normalize_attribute_whitespace(utf8(&attribute.value)?);
		let value = escape::unescape(&raw).map_err(failure)?.into_owned();

		if key == "xmlns" {
			declarations.push((String::new(), value));
		} else if let Some(prefix) = key.strip_prefix("xmlns:") {
			declarations.push((prefix.to_owned(), value));
		} else {
			attributes.push((key.to_owned(), value));
		}
	}

	scopes.declared.push(declarations);

	let mut utilized = vec![prefix_of(&name).to_owned()];

	for (key, _) in &attributes {
		let prefix = prefix_of(key);

		if !prefix.is_empty() && prefix != XML_PREFIX && !utilized.iter().any(|p| p == prefix) {
			utilized.push(prefix.to_owned());
		}
	}

	let mut rendered = Vec::new();

	for prefix in utilized {
		let uri = scopes.resolve(&prefix)?.to_owned();

		if scopes.needs_rendering(&prefix, &uri) {
			rendered.push((prefix, uri));
		}
	}

	rendered.sort();

	let mut canonical = attributes
		.into_iter()
		.map(|(name, value)| {
			let (namespace, local) = match name.split_once(':') {
				Some((prefix, local)) => (scopes.resolve(prefix)?.to_owned(), local.to_owned()),
				None => (String::new(), name.clone()),
			};

			Ok(CanonicalAttribute { namespace, local, name, value })
		})
		.collect::<Result<Vec<_>, SigningError>>()?;

	canonical.sort_by(|a, b| (&a.namespace, &a.local).cmp(&(&b.namespace, &b.local)));

	output.push('<');
	output.push_str(&name);

	for (prefix, uri) in &rendered {
		if prefix.is_empty() {
			output.push_str(" xmlns=\"");
		} else {
			output.push_str(" xmlns:");
			output.push_str(prefix);
			output.push_str("=\"");
		}

		escape_attribute(output, uri);
		output.push('"');
	}
	for attribute in &canonical {
		output.push(' ');
		output.push_str(&attribute.name);
		output.push_str("=\"");
		escape_attribute(output, &attribute.value);
		output.push('"');
	}

	output.push('>');
	scopes.rendered.push(rendered);

	Ok(name)
}

fn write_end(output: &mut String, scopes: &mut NamespaceScopes, name: &str) {
	output.push_str("</");
	output.push_str(name);
	output.push('>');
	scopes.declared.pop();
	scopes.rendered.pop();
}

fn push_node(output: &mut String, node: &str, depth: usize, seen_root: bool) {
	match (depth, seen_root) {
		(0, false) => {
			output.push_str(node);
			output.push('\n');
		},
		(0, true) => {
			output.push('\n');
			output.push_str(node);
		},
		_ => output.push_str(node),
	}
}

fn prefix_of(name: &str) -> &str {
	name.split_once(':').map_or("", |(prefix, _)| prefix)
}

fn escape_text(output: &mut String, text: &str) {
	for c in text.chars() {
		match c {
			'&' => output.push_str("&amp;"),
			'<' => output.push_str("&lt;"),
			'>' => output.push_str("&gt;"),
			'\r' => output.push_str("&#xD;"),
			_ => output.push(c),
		}
	}
}

fn escape_attribute(output: &mut String, value: &str) {
	for c in value.chars() {
		match c {
			'&' => output.push_str("&amp;"),
			'<' => output.push_str("&lt;"),
			'"' => output.push_str("&quot;"),
			'\t' => output.push_str("&#x9;"),
			'\n' => output.push_str("&#xA;"),
			'\r' => output.push_str("&#xD;"),
			_ => output.push(c),
		}
	}
}

fn normalize_line_breaks(raw: &str) -> Cow<'_, str> {
	if raw.contains('\r') {
		Cow::Owned(raw.replace("\r\n", "\n").replace('\r', "\n"))
	} else {
		Cow::Borrowed(raw)
	}
}

// Literal whitespace in attribute values collapses to spaces; character references survive.
fn normalize_attribute_whitespace(raw: &str) -> Cow<'_, str> {
	let raw = normalize_line_breaks(raw);

	if raw.contains(['\t', '\n']) {
		Cow::Owned(raw.replace(['\t', '\n'], " "))
	} else {
		raw
	}
}

fn utf8(bytes: &[u8]) -> Result<&str, SigningError> {
	std::str::from_utf8(bytes).map_err(failure)
}

fn failure(e: impl ToString) -> SigningError {
	SigningError::Canonicalization { message: e.to_string() }
}
