use std::cell::Cell;

use crate::amqp::array::require;
use crate::amqp::render::{RenderOptions, render_node};
use crate::amqp::{ByteSink, Kind, Registry, Result, Value, WidthClass, codes};

/// Index of a node slot inside a [`Tree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

/// Serialization context of one node.
///
/// Array children are written without their own constructor, in the width class
/// the array settles on; the class cell is how a child widens its array.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Context<'a> {
	/// Node carries its own constructor and picks its smallest encoding.
	Standalone,
	/// Node is an element of the array owning this width class.
	Element(&'a Cell<WidthClass>),
}

/// Scalar payload of an atomic node.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Atom {
	Null,
	Boolean(bool),
	UByte(u8),
	UShort(u16),
	UInt(u32),
	ULong(u64),
	Byte(i8),
	Short(i16),
	Int(i32),
	Long(i64),
	Float(f32),
	Double(f64),
	Decimal32(u32),
	Decimal64(u64),
	Decimal128([u8; 16]),
	Char(char),
	Timestamp(i64),
	Uuid([u8; 16]),
	Binary(Vec<u8>),
	String(String),
	Symbol(String),
}

impl Atom {
	pub(crate) fn kind(&self) -> Kind {
		match self {
			Self::Null => Kind::Null,
			Self::Boolean(_) => Kind::Boolean,
			Self::UByte(_) => Kind::UByte,
			Self::UShort(_) => Kind::UShort,
			Self::UInt(_) => Kind::UInt,
			Self::ULong(_) => Kind::ULong,
			Self::Byte(_) => Kind::Byte,
			Self::Short(_) => Kind::Short,
			Self::Int(_) => Kind::Int,
			Self::Long(_) => Kind::Long,
			Self::Float(_) => Kind::Float,
			Self::Double(_) => Kind::Double,
			Self::Decimal32(_) => Kind::Decimal32,
			Self::Decimal64(_) => Kind::Decimal64,
			Self::Decimal128(_) => Kind::Decimal128,
			Self::Char(_) => Kind::Char,
			Self::Timestamp(_) => Kind::Timestamp,
			Self::Uuid(_) => Kind::Uuid,
			Self::Binary(_) => Kind::Binary,
			Self::String(_) => Kind::String,
			Self::Symbol(_) => Kind::Symbol,
		}
	}

	/// Convert to `target` when [`Kind::widens_to`] allows it.
	pub(crate) fn widen(self, target: Kind) -> Option<Atom> {
		let widened = match (self, target) {
			(Self::Byte(v), Kind::Short) => Self::Short(i16::from(v)),
			(Self::Byte(v), Kind::Int) => Self::Int(i32::from(v)),
			(Self::Byte(v), Kind::Long) => Self::Long(i64::from(v)),
			(Self::Short(v), Kind::Int) => Self::Int(i32::from(v)),
			(Self::Short(v), Kind::Long) => Self::Long(i64::from(v)),
			(Self::Int(v), Kind::Long) => Self::Long(i64::from(v)),
			(Self::UByte(v), Kind::UShort) => Self::UShort(u16::from(v)),
			(Self::UByte(v), Kind::UInt) => Self::UInt(u32::from(v)),
			(Self::UByte(v), Kind::ULong) => Self::ULong(u64::from(v)),
			(Self::UByte(v), Kind::Short) => Self::Short(i16::from(v)),
			(Self::UByte(v), Kind::Int) => Self::Int(i32::from(v)),
			(Self::UByte(v), Kind::Long) => Self::Long(i64::from(v)),
			(Self::UShort(v), Kind::UInt) => Self::UInt(u32::from(v)),
			(Self::UShort(v), Kind::ULong) => Self::ULong(u64::from(v)),
			(Self::UShort(v), Kind::Int) => Self::Int(i32::from(v)),
			(Self::UShort(v), Kind::Long) => Self::Long(i64::from(v)),
			(Self::UInt(v), Kind::ULong) => Self::ULong(u64::from(v)),
			(Self::UInt(v), Kind::Long) => Self::Long(i64::from(v)),
			(Self::Float(v), Kind::Double) => Self::Double(f64::from(v)),
			_ => return None,
		};
		Some(widened)
	}

	pub(crate) fn size(&self, ctx: Context<'_>) -> usize {
		match ctx {
			Context::Standalone => self.standalone_size(),
			Context::Element(width) => self.element_size(width),
		}
	}

	pub(crate) fn write<S: ByteSink + ?Sized>(&self, ctx: Context<'_>, sink: &mut S) {
		match ctx {
			Context::Standalone => self.write_standalone(sink),
			Context::Element(width) => self.write_element(width.get(), sink),
		}
	}

	fn standalone_size(&self) -> usize {
		match self {
			Self::Null | Self::Boolean(_) => 1,
			Self::UByte(_) | Self::Byte(_) => 2,
			Self::UShort(_) | Self::Short(_) => 3,
			Self::UInt(0) => 1,
			Self::UInt(v) => if *v <= 0xff { 2 } else { 5 },
			Self::ULong(0) => 1,
			Self::ULong(v) => if *v <= 0xff { 2 } else { 9 },
			Self::Int(v) => if fits_i8(i64::from(*v)) { 2 } else { 5 },
			Self::Long(v) => if fits_i8(*v) { 2 } else { 9 },
			Self::Float(_) | Self::Decimal32(_) | Self::Char(_) => 5,
			Self::Double(_) | Self::Decimal64(_) | Self::Timestamp(_) => 9,
			Self::Decimal128(_) | Self::Uuid(_) => 17,
			Self::Binary(bytes) => variable_standalone_size(bytes.len()),
			Self::String(text) | Self::Symbol(text) => variable_standalone_size(text.len()),
		}
	}

	fn element_size(&self, width: &Cell<WidthClass>) -> usize {
		match self {
			Self::Null => 0,
			Self::Boolean(_) | Self::UByte(_) | Self::Byte(_) => 1,
			Self::UShort(_) | Self::Short(_) => 2,
			Self::Float(_) | Self::Decimal32(_) | Self::Char(_) => 4,
			Self::Double(_) | Self::Decimal64(_) | Self::Timestamp(_) => 8,
			Self::Decimal128(_) | Self::Uuid(_) => 16,
			Self::UInt(v) => match require(width, unsigned_class(u64::from(*v))) {
				WidthClass::Tiny => 0,
				WidthClass::Small => 1,
				WidthClass::Large => 4,
			},
			Self::ULong(v) => match require(width, unsigned_class(*v)) {
				WidthClass::Tiny => 0,
				WidthClass::Small => 1,
				WidthClass::Large => 8,
			},
			Self::Int(v) => match require(width, signed_class(i64::from(*v))) {
				WidthClass::Large => 4,
				_ => 1,
			},
			Self::Long(v) => match require(width, signed_class(*v)) {
				WidthClass::Large => 8,
				_ => 1,
			},
			Self::Binary(bytes) => variable_element_size(width, bytes.len()),
			Self::String(text) | Self::Symbol(text) => variable_element_size(width, text.len()),
		}
	}

	fn write_standalone<S: ByteSink + ?Sized>(&self, sink: &mut S) {
		match self {
			Self::Null => sink.put_u8(codes::NULL),
			Self::Boolean(true) => sink.put_u8(codes::BOOLEAN_TRUE),
			Self::Boolean(false) => sink.put_u8(codes::BOOLEAN_FALSE),
			Self::UByte(v) => {
				sink.put_u8(codes::UBYTE);
				sink.put_u8(*v);
			}
			Self::Byte(v) => {
				sink.put_u8(codes::BYTE);
				sink.put_u8(*v as u8);
			}
			Self::UShort(v) => {
				sink.put_u8(codes::USHORT);
				sink.put_u16(*v);
			}
			Self::Short(v) => {
				sink.put_u8(codes::SHORT);
				sink.put_u16(*v as u16);
			}
			Self::UInt(0) => sink.put_u8(codes::UINT0),
			Self::UInt(v) if *v <= 0xff => {
				sink.put_u8(codes::SMALL_UINT);
				sink.put_u8(*v as u8);
			}
			Self::UInt(v) => {
				sink.put_u8(codes::UINT);
				sink.put_u32(*v);
			}
			Self::ULong(0) => sink.put_u8(codes::ULONG0),
			Self::ULong(v) if *v <= 0xff => {
				sink.put_u8(codes::SMALL_ULONG);
				sink.put_u8(*v as u8);
			}
			Self::ULong(v) => {
				sink.put_u8(codes::ULONG);
				sink.put_u64(*v);
			}
			Self::Int(v) if fits_i8(i64::from(*v)) => {
				sink.put_u8(codes::SMALL_INT);
				sink.put_u8(*v as i8 as u8);
			}
			Self::Int(v) => {
				sink.put_u8(codes::INT);
				sink.put_u32(*v as u32);
			}
			Self::Long(v) if fits_i8(*v) => {
				sink.put_u8(codes::SMALL_LONG);
				sink.put_u8(*v as i8 as u8);
			}
			Self::Long(v) => {
				sink.put_u8(codes::LONG);
				sink.put_u64(*v as u64);
			}
			Self::Float(v) => {
				sink.put_u8(codes::FLOAT);
				sink.put_u32(v.to_bits());
			}
			Self::Double(v) => {
				sink.put_u8(codes::DOUBLE);
				sink.put_u64(v.to_bits());
			}
			Self::Decimal32(bits) => {
				sink.put_u8(codes::DECIMAL32);
				sink.put_u32(*bits);
			}
			Self::Decimal64(bits) => {
				sink.put_u8(codes::DECIMAL64);
				sink.put_u64(*bits);
			}
			Self::Decimal128(bytes) => {
				sink.put_u8(codes::DECIMAL128);
				sink.put_bytes(bytes);
			}
			Self::Char(c) => {
				sink.put_u8(codes::CHAR);
				sink.put_u32(u32::from(*c));
			}
			Self::Timestamp(ms) => {
				sink.put_u8(codes::TIMESTAMP);
				sink.put_u64(*ms as u64);
			}
			Self::Uuid(bytes) => {
				sink.put_u8(codes::UUID);
				sink.put_bytes(bytes);
			}
			Self::Binary(bytes) => write_variable_standalone(codes::VBIN8, codes::VBIN32, bytes, sink),
			Self::String(text) => write_variable_standalone(codes::STR8, codes::STR32, text.as_bytes(), sink),
			Self::Symbol(text) => write_variable_standalone(codes::SYM8, codes::SYM32, text.as_bytes(), sink),
		}
	}

	fn write_element<S: ByteSink + ?Sized>(&self, width: WidthClass, sink: &mut S) {
		match self {
			Self::Null => {}
			Self::Boolean(v) => sink.put_u8(u8::from(*v)),
			Self::UByte(v) => sink.put_u8(*v),
			Self::Byte(v) => sink.put_u8(*v as u8),
			Self::UShort(v) => sink.put_u16(*v),
			Self::Short(v) => sink.put_u16(*v as u16),
			Self::UInt(v) => match width {
				WidthClass::Tiny => {}
				WidthClass::Small => sink.put_u8(*v as u8),
				WidthClass::Large => sink.put_u32(*v),
			},
			Self::ULong(v) => match width {
				WidthClass::Tiny => {}
				WidthClass::Small => sink.put_u8(*v as u8),
				WidthClass::Large => sink.put_u64(*v),
			},
			Self::Int(v) => match width {
				WidthClass::Large => sink.put_u32(*v as u32),
				_ => sink.put_u8(*v as i8 as u8),
			},
			Self::Long(v) => match width {
				WidthClass::Large => sink.put_u64(*v as u64),
				_ => sink.put_u8(*v as i8 as u8),
			},
			Self::Float(v) => sink.put_u32(v.to_bits()),
			Self::Double(v) => sink.put_u64(v.to_bits()),
			Self::Decimal32(bits) => sink.put_u32(*bits),
			Self::Decimal64(bits) => sink.put_u64(*bits),
			Self::Decimal128(bytes) | Self::Uuid(bytes) => sink.put_bytes(bytes),
			Self::Char(c) => sink.put_u32(u32::from(*c)),
			Self::Timestamp(ms) => sink.put_u64(*ms as u64),
			Self::Binary(bytes) => write_variable_element(width, bytes, sink),
			Self::String(text) | Self::Symbol(text) => write_variable_element(width, text.as_bytes(), sink),
		}
	}
}

fn fits_i8(value: i64) -> bool {
	(-128..=127).contains(&value)
}

fn unsigned_class(value: u64) -> WidthClass {
	match value {
		0 => WidthClass::Tiny,
		1..=0xff => WidthClass::Small,
		_ => WidthClass::Large,
	}
}

fn signed_class(value: i64) -> WidthClass {
	if fits_i8(value) { WidthClass::Small } else { WidthClass::Large }
}

fn variable_class(len: usize) -> WidthClass {
	if len <= 0xff { WidthClass::Small } else { WidthClass::Large }
}

fn variable_standalone_size(len: usize) -> usize {
	if len <= 0xff { 2 + len } else { 5 + len }
}

fn variable_element_size(width: &Cell<WidthClass>, len: usize) -> usize {
	match require(width, variable_class(len)) {
		WidthClass::Large => 4 + len,
		_ => 1 + len,
	}
}

fn write_variable_standalone<S: ByteSink + ?Sized>(small: u8, large: u8, bytes: &[u8], sink: &mut S) {
	if bytes.len() <= 0xff {
		sink.put_u8(small);
		sink.put_u8(bytes.len() as u8);
	} else {
		sink.put_u8(large);
		sink.put_u32(bytes.len() as u32);
	}
	sink.put_bytes(bytes);
}

fn write_variable_element<S: ByteSink + ?Sized>(width: WidthClass, bytes: &[u8], sink: &mut S) {
	match width {
		WidthClass::Large => sink.put_u32(bytes.len() as u32),
		_ => sink.put_u8(bytes.len() as u8),
	}
	sink.put_bytes(bytes);
}

/// Declared element kind, descriptor flag and current width class of an array node.
#[derive(Debug)]
pub(crate) struct ArrayHeader {
	pub(crate) element: Kind,
	pub(crate) described: bool,
	pub(crate) width: Cell<WidthClass>,
}

impl ArrayHeader {
	pub(crate) fn new(element: Kind, described: bool) -> Self {
		Self {
			element,
			described,
			width: Cell::new(element.initial_width()),
		}
	}
}

/// Payload of one node: a scalar, or the header of a composite.
#[derive(Debug)]
pub(crate) enum Payload {
	Atom(Atom),
	List,
	Map,
	Array(ArrayHeader),
	Described,
}

impl Payload {
	pub(crate) fn kind(&self) -> Kind {
		match self {
			Self::Atom(atom) => atom.kind(),
			Self::List => Kind::List,
			Self::Map => Kind::Map,
			Self::Array(_) => Kind::Array,
			Self::Described => Kind::Described,
		}
	}
}

/// One arena slot.
///
/// `parent` is a lookup-only back link; ownership runs from a parent through
/// `first_child` and the `next` chain.
#[derive(Debug)]
pub(crate) struct Node {
	pub(crate) payload: Payload,
	pub(crate) parent: Option<NodeId>,
	pub(crate) prev: Option<NodeId>,
	pub(crate) next: Option<NodeId>,
	pub(crate) first_child: Option<NodeId>,
	pub(crate) last_child: Option<NodeId>,
	pub(crate) child_count: usize,
}

impl Node {
	fn new(payload: Payload, parent: Option<NodeId>) -> Self {
		Self {
			payload,
			parent,
			prev: None,
			next: None,
			first_child: None,
			last_child: None,
			child_count: 0,
		}
	}
}

/// Node arena with slot reuse.
#[derive(Debug, Default)]
pub(crate) struct Tree {
	nodes: Vec<Node>,
	free: Vec<NodeId>,
}

impl Tree {
	pub(crate) fn node(&self, id: NodeId) -> &Node {
		&self.nodes[id.0]
	}

	fn node_mut(&mut self, id: NodeId) -> &mut Node {
		&mut self.nodes[id.0]
	}

	pub(crate) fn kind(&self, id: NodeId) -> Kind {
		self.node(id).payload.kind()
	}

	/// Number of live nodes.
	pub(crate) fn len(&self) -> usize {
		self.nodes.len() - self.free.len()
	}

	pub(crate) fn alloc(&mut self, payload: Payload, parent: Option<NodeId>) -> NodeId {
		let node = Node::new(payload, parent);
		if let Some(id) = self.free.pop() {
			self.nodes[id.0] = node;
			return id;
		}
		self.nodes.push(node);
		NodeId(self.nodes.len() - 1)
	}

	/// Append a new last child to `parent`.
	pub(crate) fn append_child(&mut self, parent: NodeId, payload: Payload) -> NodeId {
		let id = self.alloc(payload, Some(parent));
		let last = self.node(parent).last_child;
		match last {
			Some(last) => {
				self.node_mut(last).next = Some(id);
				self.node_mut(id).prev = Some(last);
			}
			None => self.node_mut(parent).first_child = Some(id),
		}
		let parent_node = self.node_mut(parent);
		parent_node.last_child = Some(id);
		parent_node.child_count += 1;
		id
	}

	/// Splice a new node into the sibling chain right after `sibling`.
	pub(crate) fn insert_after(&mut self, sibling: NodeId, payload: Payload) -> NodeId {
		let parent = self.node(sibling).parent;
		let id = self.alloc(payload, parent);
		let after = self.node(sibling).next;

		self.node_mut(sibling).next = Some(id);
		self.node_mut(id).prev = Some(sibling);
		self.node_mut(id).next = after;
		match after {
			Some(after) => self.node_mut(after).prev = Some(id),
			None => {
				if let Some(parent) = parent {
					self.node_mut(parent).last_child = Some(id);
				}
			}
		}
		if let Some(parent) = parent {
			self.node_mut(parent).child_count += 1;
		}
		id
	}

	/// Return the slots of a detached subtree to the free list.
	pub(crate) fn release(&mut self, id: NodeId) {
		let mut stack = vec![id];
		while let Some(item) = stack.pop() {
			let mut child = self.node(item).first_child;
			while let Some(current) = child {
				stack.push(current);
				child = self.node(current).next;
			}
			*self.node_mut(item) = Node::new(Payload::Atom(Atom::Null), None);
			self.free.push(item);
		}
	}

	pub(crate) fn clear(&mut self) {
		self.nodes.clear();
		self.free.clear();
	}

	pub(crate) fn children(&self, id: NodeId) -> Children<'_> {
		Children {
			tree: self,
			next: self.node(id).first_child,
		}
	}

	/// Encoded byte length of a node in `ctx`.
	///
	/// In element context this may widen the owning array's class.
	pub(crate) fn size(&self, id: NodeId, ctx: Context<'_>) -> usize {
		match &self.node(id).payload {
			Payload::Atom(atom) => atom.size(ctx),
			Payload::List => self.list_size(id, ctx),
			Payload::Map => self.map_size(id, ctx),
			Payload::Array(header) => self.array_size(id, header, ctx),
			Payload::Described => self.described_size(id),
		}
	}

	/// Write a node whose size has already been settled in `ctx`.
	pub(crate) fn write<S: ByteSink + ?Sized>(&self, id: NodeId, ctx: Context<'_>, sink: &mut S) {
		match &self.node(id).payload {
			Payload::Atom(atom) => atom.write(ctx, sink),
			Payload::List => self.write_list(id, ctx, sink),
			Payload::Map => self.write_map(id, ctx, sink),
			Payload::Array(header) => self.write_array(id, header, ctx, sink),
			Payload::Described => self.write_described(id, sink),
		}
	}

	/// Encode a standalone node, or write nothing and return 0 when `sink` is too small.
	pub(crate) fn encode<S: ByteSink + ?Sized>(&self, id: NodeId, sink: &mut S) -> usize {
		let size = self.size(id, Context::Standalone);
		if size > sink.remaining() {
			return 0;
		}
		let start = sink.position();
		self.write(id, Context::Standalone, sink);
		debug_assert_eq!(sink.position() - start, size, "encoded length disagrees with size");
		size
	}
}

/// Iterator over the direct children of a node.
pub(crate) struct Children<'a> {
	tree: &'a Tree,
	next: Option<NodeId>,
}

impl Iterator for Children<'_> {
	type Item = NodeId;

	fn next(&mut self) -> Option<Self::Item> {
		let id = self.next?;
		self.next = self.tree.node(id).next;
		Some(id)
	}
}

/// Read-only view of one node in a [`crate::amqp::Data`] tree.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
	pub(crate) tree: &'a Tree,
	pub(crate) id: NodeId,
}

impl<'a> NodeRef<'a> {
	pub(crate) fn new(tree: &'a Tree, id: NodeId) -> Self {
		Self { tree, id }
	}

	/// Logical kind of this node.
	pub fn kind(&self) -> Kind {
		self.tree.kind(self.id)
	}

	/// Encoded length of this node written on its own, constructor included.
	pub fn size(&self) -> usize {
		self.tree.size(self.id, Context::Standalone)
	}

	/// Encode this node on its own; returns 0 without writing when `sink` lacks room.
	pub fn encode<S: ByteSink + ?Sized>(&self, sink: &mut S) -> usize {
		self.tree.encode(self.id, sink)
	}

	/// Encode this node into a fresh buffer.
	pub fn encode_to_vec(&self) -> Vec<u8> {
		let mut out = Vec::with_capacity(self.size());
		self.encode(&mut out);
		out
	}

	/// Human-readable dump of this subtree.
	pub fn render(&self) -> String {
		render_node(self.tree, self.id, RenderOptions::default(), None)
	}

	/// Human-readable dump with explicit options and an optional registry for descriptor names.
	pub fn render_with(&self, options: RenderOptions, registry: Option<&Registry>) -> String {
		render_node(self.tree, self.id, options, registry)
	}

	/// Parent node, if any.
	pub fn parent(&self) -> Option<NodeRef<'a>> {
		self.tree.node(self.id).parent.map(|id| NodeRef::new(self.tree, id))
	}

	/// Direct children in order; an array's descriptor comes first.
	pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
		let tree = self.tree;
		tree.children(self.id).map(move |id| NodeRef::new(tree, id))
	}

	/// Number of direct children.
	pub fn child_count(&self) -> usize {
		self.tree.node(self.id).child_count
	}

	/// Declared element kind when this node is an array.
	pub fn array_element(&self) -> Option<Kind> {
		match &self.tree.node(self.id).payload {
			Payload::Array(header) => Some(header.element),
			_ => None,
		}
	}

	/// Return `true` when this node is a described array.
	pub fn is_described_array(&self) -> bool {
		matches!(&self.tree.node(self.id).payload, Payload::Array(header) if header.described)
	}

	/// Current width class when this node is an array.
	pub fn width_class(&self) -> Option<WidthClass> {
		match &self.tree.node(self.id).payload {
			Payload::Array(header) => Some(header.width.get()),
			_ => None,
		}
	}

	/// Convert this subtree to an owned [`Value`].
	pub fn value(&self) -> Result<Value> {
		Value::from_tree(self.tree, self.id)
	}
}

#[cfg(test)]
mod tests;
