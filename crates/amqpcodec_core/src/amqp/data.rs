use crate::amqp::node::{ArrayHeader, Atom, NodeId, NodeRef, Payload, Tree};
use crate::amqp::render::RenderOptions;
use crate::amqp::{ByteSink, CodecError, Kind, Registry, Result, Value};

/// Cursor-based builder and navigator over one AMQP value tree.
///
/// The cursor is a `(current, parent)` pair. `put_*` inserts after `current`
/// (or as the last child of `parent` when `current` is unset) and moves
/// `current` to the new node. At top level a put replaces the root: a `Data`
/// holds at most one root value.
#[derive(Debug, Default)]
pub struct Data {
	tree: Tree,
	root: Option<NodeId>,
	current: Option<NodeId>,
	parent: Option<NodeId>,
}

impl Data {
	/// Create an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	pub(crate) fn put_atom(&mut self, atom: Atom) -> Result<()> {
		self.put(Payload::Atom(atom))
	}

	fn put(&mut self, payload: Payload) -> Result<()> {
		let id = match self.parent {
			Some(parent) => {
				let payload = self.tree.admit(parent, payload)?;
				match self.current {
					Some(current) => self.tree.insert_after(current, payload),
					None => self.tree.append_child(parent, payload),
				}
			}
			None => {
				if let Some(root) = self.root.take() {
					self.tree.release(root);
				}
				let id = self.tree.alloc(payload, None);
				self.root = Some(id);
				id
			}
		};
		self.current = Some(id);
		Ok(())
	}

	/// Append a null.
	pub fn put_null(&mut self) -> Result<()> {
		self.put_atom(Atom::Null)
	}

	/// Append a boolean.
	pub fn put_bool(&mut self, value: bool) -> Result<()> {
		self.put_atom(Atom::Boolean(value))
	}

	/// Append an unsigned byte.
	pub fn put_ubyte(&mut self, value: u8) -> Result<()> {
		self.put_atom(Atom::UByte(value))
	}

	/// Append a signed byte.
	pub fn put_byte(&mut self, value: i8) -> Result<()> {
		self.put_atom(Atom::Byte(value))
	}

	/// Append an unsigned short.
	pub fn put_ushort(&mut self, value: u16) -> Result<()> {
		self.put_atom(Atom::UShort(value))
	}

	/// Append a signed short.
	pub fn put_short(&mut self, value: i16) -> Result<()> {
		self.put_atom(Atom::Short(value))
	}

	/// Append an unsigned int.
	pub fn put_uint(&mut self, value: u32) -> Result<()> {
		self.put_atom(Atom::UInt(value))
	}

	/// Append a signed int.
	pub fn put_int(&mut self, value: i32) -> Result<()> {
		self.put_atom(Atom::Int(value))
	}

	/// Append an unsigned long.
	pub fn put_ulong(&mut self, value: u64) -> Result<()> {
		self.put_atom(Atom::ULong(value))
	}

	/// Append a signed long.
	pub fn put_long(&mut self, value: i64) -> Result<()> {
		self.put_atom(Atom::Long(value))
	}

	/// Append a binary32 float.
	pub fn put_float(&mut self, value: f32) -> Result<()> {
		self.put_atom(Atom::Float(value))
	}

	/// Append a binary64 float.
	pub fn put_double(&mut self, value: f64) -> Result<()> {
		self.put_atom(Atom::Double(value))
	}

	/// Append a decimal32 given its raw bits.
	pub fn put_decimal32(&mut self, bits: u32) -> Result<()> {
		self.put_atom(Atom::Decimal32(bits))
	}

	/// Append a decimal64 given its raw bits.
	pub fn put_decimal64(&mut self, bits: u64) -> Result<()> {
		self.put_atom(Atom::Decimal64(bits))
	}

	/// Append a decimal128 given its raw bytes.
	pub fn put_decimal128(&mut self, bytes: [u8; 16]) -> Result<()> {
		self.put_atom(Atom::Decimal128(bytes))
	}

	/// Append a char.
	pub fn put_char(&mut self, value: char) -> Result<()> {
		self.put_atom(Atom::Char(value))
	}

	/// Append a timestamp in milliseconds since the Unix epoch.
	pub fn put_timestamp(&mut self, millis: i64) -> Result<()> {
		self.put_atom(Atom::Timestamp(millis))
	}

	/// Append a UUID.
	pub fn put_uuid(&mut self, bytes: [u8; 16]) -> Result<()> {
		self.put_atom(Atom::Uuid(bytes))
	}

	/// Append a binary.
	pub fn put_binary(&mut self, bytes: &[u8]) -> Result<()> {
		self.put_atom(Atom::Binary(bytes.to_vec()))
	}

	/// Append a string.
	pub fn put_string(&mut self, text: &str) -> Result<()> {
		self.put_atom(Atom::String(text.to_owned()))
	}

	/// Append a symbol.
	pub fn put_symbol(&mut self, name: &str) -> Result<()> {
		self.put_atom(Atom::Symbol(name.to_owned()))
	}

	/// Append an empty list; [`Data::enter`] it to add items.
	pub fn put_list(&mut self) -> Result<()> {
		self.put(Payload::List)
	}

	/// Append an empty map; entered children alternate key, value.
	pub fn put_map(&mut self) -> Result<()> {
		self.put(Payload::Map)
	}

	/// Append an empty array of `element` values.
	///
	/// When `described` is set the first child put inside the array is its descriptor.
	pub fn put_array(&mut self, described: bool, element: Kind) -> Result<()> {
		if element == Kind::Described {
			return Err(CodecError::InvalidArrayElement { kind: element });
		}
		self.put(Payload::Array(ArrayHeader::new(element, described)))
	}

	/// Append an empty described type; its first child is the descriptor, the second the value.
	pub fn put_described(&mut self) -> Result<()> {
		self.put(Payload::Described)
	}

	/// Descend into the current composite node.
	///
	/// Returns `false` and leaves the cursor unchanged when there is no current
	/// node or it is not a composite.
	pub fn enter(&mut self) -> bool {
		match self.current {
			Some(current) if self.tree.kind(current).is_composite() => {
				self.parent = Some(current);
				self.current = None;
				true
			}
			_ => false,
		}
	}

	/// Return to the composite that was entered last; it becomes the current node.
	///
	/// Returns `false` when no composite has been entered.
	pub fn exit(&mut self) -> bool {
		let Some(parent) = self.parent else {
			return false;
		};
		self.current = Some(parent);
		self.parent = self.tree.node(parent).parent;
		true
	}

	pub(crate) fn descend(&mut self) -> Result<()> {
		if self.enter() { Ok(()) } else { Err(CodecError::UnbalancedEnter) }
	}

	pub(crate) fn ascend(&mut self) -> Result<()> {
		if self.exit() { Ok(()) } else { Err(CodecError::UnbalancedExit) }
	}

	/// Move to the next sibling, or to the first child of the entered composite
	/// (the root at top level) when there is no current node.
	///
	/// Returns the kind of the node moved to; the cursor stays put on `None`.
	pub fn next(&mut self) -> Option<Kind> {
		let target = match (self.current, self.parent) {
			(Some(current), _) => self.tree.node(current).next,
			(None, Some(parent)) => self.tree.node(parent).first_child,
			(None, None) => self.root,
		}?;
		self.current = Some(target);
		Some(self.tree.kind(target))
	}

	/// Move to the previous sibling.
	///
	/// Returns the kind of the node moved to; the cursor stays put on `None`.
	pub fn prev(&mut self) -> Option<Kind> {
		let target = self.tree.node(self.current?).prev?;
		self.current = Some(target);
		Some(self.tree.kind(target))
	}

	/// Move the cursor back to before the root without touching the tree.
	pub fn rewind(&mut self) {
		self.current = None;
		self.parent = None;
	}

	/// Release every node and reset the cursor.
	pub fn clear(&mut self) {
		self.tree.clear();
		self.root = None;
		self.current = None;
		self.parent = None;
	}

	/// Return `true` when no root value exists.
	pub fn is_empty(&self) -> bool {
		self.root.is_none()
	}

	/// Number of live nodes in the tree.
	pub fn node_count(&self) -> usize {
		self.tree.len()
	}

	/// Kind of the current node.
	pub fn kind(&self) -> Option<Kind> {
		self.current.map(|id| self.tree.kind(id))
	}

	/// View of the current node.
	pub fn current(&self) -> Option<NodeRef<'_>> {
		self.current.map(|id| NodeRef::new(&self.tree, id))
	}

	/// View of the entered composite, if any.
	pub fn parent(&self) -> Option<NodeRef<'_>> {
		self.parent.map(|id| NodeRef::new(&self.tree, id))
	}

	/// View of the root value.
	pub fn root(&self) -> Option<NodeRef<'_>> {
		self.root.map(|id| NodeRef::new(&self.tree, id))
	}

	/// Encoded length of the root value, 0 when empty.
	pub fn size(&self) -> usize {
		self.root().map_or(0, |root| root.size())
	}

	/// Encode the root value into `sink`.
	///
	/// Returns the bytes written, or 0 without writing anything when the tree is
	/// empty or `sink` cannot take the whole value.
	pub fn encode<S: ByteSink + ?Sized>(&self, sink: &mut S) -> usize {
		self.root().map_or(0, |root| root.encode(sink))
	}

	/// Encode the root value into a fresh buffer.
	pub fn encode_to_vec(&self) -> Vec<u8> {
		self.root().map_or_else(Vec::new, |root| root.encode_to_vec())
	}

	/// Human-readable dump of the root value.
	pub fn render(&self) -> String {
		self.root().map_or_else(String::new, |root| root.render())
	}

	/// Human-readable dump of the root value with explicit options.
	pub fn render_with(&self, options: RenderOptions, registry: Option<&Registry>) -> String {
		self.root().map_or_else(String::new, |root| root.render_with(options, registry))
	}

	/// Put an owned value at the cursor, building composites recursively.
	///
	/// The cursor ends on the new node, as after a single `put_*`. On error the
	/// cursor may be left inside the partially built value.
	pub fn put_value(&mut self, value: &Value) -> Result<()> {
		if let Some(atom) = value.to_atom() {
			return self.put_atom(atom);
		}
		match value {
			Value::List(items) => {
				self.put_list()?;
				self.put_children(items.iter())
			}
			Value::Map(entries) => {
				self.put_map()?;
				self.put_children(entries.iter().flat_map(|(key, value)| [key, value]))
			}
			Value::Array(array) => {
				self.put_array(array.descriptor.is_some(), array.element)?;
				self.put_children(array.descriptor.as_deref().into_iter().chain(array.items.iter()))
			}
			Value::Described(described) => {
				self.put_described()?;
				self.put_children([&described.descriptor, &described.value].into_iter())
			}
			_ => Ok(()),
		}
	}

	fn put_children<'v>(&mut self, children: impl Iterator<Item = &'v Value>) -> Result<()> {
		self.descend()?;
		for child in children {
			self.put_value(child)?;
		}
		self.ascend()
	}

	/// Convert the current node (the root when the cursor is unset) to an owned value.
	pub fn value(&self) -> Result<Value> {
		let id = self.current.or(self.root).ok_or(CodecError::EmptyTree)?;
		Value::from_tree(&self.tree, id)
	}
}

#[cfg(test)]
mod tests;
