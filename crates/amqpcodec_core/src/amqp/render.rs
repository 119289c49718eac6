use std::fmt::Write as _;

use crate::amqp::node::{Atom, NodeId, Payload, Tree};
use crate::amqp::{BodyShape, DescribedDef, Registry, Value};

/// Rendering limits for diagnostic dumps.
#[derive(Debug, Clone)]
pub struct RenderOptions {
	/// Longest string, symbol or binary shown before truncation with `...`.
	pub max_string_len: usize,
	/// Children shown per composite before `...`.
	pub max_items: usize,
	/// Nesting below which composites collapse to `...`.
	pub max_depth: u32,
	/// Label list fields of known described types with their names.
	pub field_names: bool,
}

impl Default for RenderOptions {
	fn default() -> Self {
		Self {
			max_string_len: 200,
			max_items: 32,
			max_depth: 16,
			field_names: true,
		}
	}
}

impl RenderOptions {
	/// Preset for one-line log output.
	pub fn compact() -> Self {
		Self {
			max_string_len: 32,
			max_items: 8,
			max_depth: 4,
			field_names: false,
		}
	}
}

pub(crate) fn render_node(tree: &Tree, id: NodeId, options: RenderOptions, registry: Option<&Registry>) -> String {
	let mut renderer = Renderer {
		tree,
		options,
		registry,
		out: String::new(),
	};
	renderer.node(id, 0);
	renderer.out
}

struct Renderer<'a> {
	tree: &'a Tree,
	options: RenderOptions,
	registry: Option<&'a Registry>,
	out: String,
}

impl Renderer<'_> {
	fn node(&mut self, id: NodeId, depth: u32) {
		let tree = self.tree;
		match &tree.node(id).payload {
			Payload::Atom(atom) => self.atom(atom),
			_ if depth >= self.options.max_depth => self.out.push_str("..."),
			Payload::List => self.sequence(id, depth, "[", "]", None),
			Payload::Map => self.map(id, depth),
			Payload::Array(header) => {
				let mut elements = tree.children(id);
				if header.described {
					self.descriptor(elements.next(), depth);
					self.out.push(' ');
				}
				let _ = write!(self.out, "@{}", header.element);
				self.items(elements, depth, "[", "]", None);
			}
			Payload::Described => self.described(id, depth),
		}
	}

	fn sequence(&mut self, id: NodeId, depth: u32, open: &str, close: &str, names: Option<&[&str]>) {
		let tree = self.tree;
		self.items(tree.children(id), depth, open, close, names);
	}

	fn items(&mut self, items: impl Iterator<Item = NodeId>, depth: u32, open: &str, close: &str, names: Option<&[&str]>) {
		self.out.push_str(open);
		for (idx, child) in items.enumerate() {
			if idx > 0 {
				self.out.push_str(", ");
			}
			if idx >= self.options.max_items {
				self.out.push_str("...");
				break;
			}
			if let Some(name) = names.and_then(|names| names.get(idx)) {
				let _ = write!(self.out, "{name}=");
			}
			self.node(child, depth + 1);
		}
		self.out.push_str(close);
	}

	fn map(&mut self, id: NodeId, depth: u32) {
		let tree = self.tree;
		self.out.push('{');
		let mut children = tree.children(id);
		let mut idx = 0;
		while let Some(key) = children.next() {
			if idx > 0 {
				self.out.push_str(", ");
			}
			if idx >= self.options.max_items {
				self.out.push_str("...");
				break;
			}
			self.node(key, depth + 1);
			self.out.push('=');
			if let Some(value) = children.next() {
				self.node(value, depth + 1);
			}
			idx += 1;
		}
		self.out.push('}');
	}

	fn described(&mut self, id: NodeId, depth: u32) {
		let tree = self.tree;
		let mut slots = tree.children(id);
		let descriptor = slots.next();
		let value = slots.next();

		let known = self.descriptor(descriptor, depth);
		self.out.push(' ');

		let Some(value) = value else {
			self.out.push_str("null");
			return;
		};
		match known.map(|def| def.body) {
			Some(BodyShape::List(fields)) if self.options.field_names && matches!(tree.node(value).payload, Payload::List) => {
				if depth + 1 >= self.options.max_depth {
					self.out.push_str("...");
				} else {
					self.sequence(value, depth + 1, "[", "]", Some(fields));
				}
			}
			_ => self.node(value, depth + 1),
		}
	}

	/// Write `@name(code)` for registered descriptors, otherwise `@` and the raw descriptor.
	fn descriptor(&mut self, descriptor: Option<NodeId>, depth: u32) -> Option<DescribedDef> {
		let tree = self.tree;
		let Some(descriptor) = descriptor else {
			self.out.push_str("@null");
			return None;
		};
		let known = Value::from_tree(tree, descriptor)
			.ok()
			.and_then(|value| self.registry.and_then(|registry| registry.lookup(&value)).copied());
		match (known, &tree.node(descriptor).payload) {
			(Some(def), _) => {
				let _ = write!(self.out, "@{}({})", def.name, def.code);
			}
			(None, Payload::Atom(Atom::ULong(code))) => {
				let _ = write!(self.out, "@0x{code:x}");
			}
			(None, _) => {
				self.out.push('@');
				self.node(descriptor, depth + 1);
			}
		}
		known
	}

	fn atom(&mut self, atom: &Atom) {
		let out = &mut self.out;
		let _ = match atom {
			Atom::Null => write!(out, "null"),
			Atom::Boolean(v) => write!(out, "{v}"),
			Atom::UByte(v) => write!(out, "{v}"),
			Atom::UShort(v) => write!(out, "{v}"),
			Atom::UInt(v) => write!(out, "{v}"),
			Atom::ULong(v) => write!(out, "{v}"),
			Atom::Byte(v) => write!(out, "{v}"),
			Atom::Short(v) => write!(out, "{v}"),
			Atom::Int(v) => write!(out, "{v}"),
			Atom::Long(v) => write!(out, "{v}"),
			Atom::Float(v) => write!(out, "{v}"),
			Atom::Double(v) => write!(out, "{v}"),
			Atom::Decimal32(bits) => write!(out, "D32(0x{bits:08x})"),
			Atom::Decimal64(bits) => write!(out, "D64(0x{bits:016x})"),
			Atom::Decimal128(bytes) => write!(out, "D128(0x{})", hex(bytes)),
			Atom::Char(c) => write!(out, "'{}'", c.escape_debug()),
			Atom::Timestamp(ms) => write!(out, "{ms}"),
			Atom::Uuid(bytes) => write!(out, "UUID({})", uuid(bytes)),
			Atom::Binary(bytes) => self.binary(bytes),
			Atom::String(text) => self.quoted("", text),
			Atom::Symbol(name) if is_bare_symbol(name) => self.bare_symbol(name),
			Atom::Symbol(name) => self.quoted(":", name),
		};
	}

	fn binary(&mut self, bytes: &[u8]) -> std::fmt::Result {
		let shown = bytes.len().min(self.options.max_string_len);
		self.out.push_str("b\"");
		for &byte in &bytes[..shown] {
			match byte {
				b'"' | b'\\' => write!(self.out, "\\{}", byte as char)?,
				0x20..=0x7e => self.out.push(byte as char),
				_ => write!(self.out, "\\x{byte:02x}")?,
			}
		}
		self.out.push('"');
		if shown < bytes.len() {
			self.out.push_str("...");
		}
		Ok(())
	}

	fn quoted(&mut self, prefix: &str, text: &str) -> std::fmt::Result {
		self.out.push_str(prefix);
		self.out.push('"');
		let mut chars = text.chars();
		for ch in chars.by_ref().take(self.options.max_string_len) {
			write!(self.out, "{}", ch.escape_debug())?;
		}
		self.out.push('"');
		if chars.next().is_some() {
			self.out.push_str("...");
		}
		Ok(())
	}

	fn bare_symbol(&mut self, name: &str) -> std::fmt::Result {
		self.out.push(':');
		let shown: String = name.chars().take(self.options.max_string_len).collect();
		self.out.push_str(&shown);
		if shown.len() < name.len() {
			self.out.push_str("...");
		}
		Ok(())
	}
}

fn is_bare_symbol(name: &str) -> bool {
	!name.is_empty() && name.bytes().all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b':' | b'/' | b'*'))
}

fn hex(bytes: &[u8]) -> String {
	bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, byte| {
		let _ = write!(out, "{byte:02x}");
		out
	})
}

fn uuid(bytes: &[u8; 16]) -> String {
	let text = hex(bytes);
	format!("{}-{}-{}-{}-{}", &text[..8], &text[8..12], &text[12..16], &text[16..20], &text[20..])
}
