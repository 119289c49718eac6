use crate::amqp::node::{Atom, NodeId, Payload, Tree};
use crate::amqp::{CodecError, Data, Kind, Result};

/// Owned AMQP value, detached from any builder.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Null.
	Null,
	/// Boolean.
	Bool(bool),
	/// Unsigned 8-bit integer.
	UByte(u8),
	/// Unsigned 16-bit integer.
	UShort(u16),
	/// Unsigned 32-bit integer.
	UInt(u32),
	/// Unsigned 64-bit integer.
	ULong(u64),
	/// Signed 8-bit integer.
	Byte(i8),
	/// Signed 16-bit integer.
	Short(i16),
	/// Signed 32-bit integer.
	Int(i32),
	/// Signed 64-bit integer.
	Long(i64),
	/// 32-bit float.
	Float(f32),
	/// 64-bit float.
	Double(f64),
	/// Raw decimal32 bits.
	Decimal32(u32),
	/// Raw decimal64 bits.
	Decimal64(u64),
	/// Raw decimal128 bytes.
	Decimal128([u8; 16]),
	/// Unicode scalar value.
	Char(char),
	/// Milliseconds since the Unix epoch.
	Timestamp(i64),
	/// UUID bytes.
	Uuid([u8; 16]),
	/// Opaque bytes.
	Binary(Vec<u8>),
	/// UTF-8 text.
	String(String),
	/// Symbolic name.
	Symbol(String),
	/// Heterogeneous list.
	List(Vec<Value>),
	/// Key/value pairs in wire order; duplicate keys are kept.
	Map(Vec<(Value, Value)>),
	/// Homogeneous array.
	Array(ArrayValue),
	/// Descriptor plus described value.
	Described(Box<Described>),
}

/// Owned array payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
	/// Declared element kind.
	pub element: Kind,
	/// Descriptor shared by every element of a described array.
	pub descriptor: Option<Box<Value>>,
	/// Elements, each of kind `element`.
	pub items: Vec<Value>,
}

/// Owned described type.
#[derive(Debug, Clone, PartialEq)]
pub struct Described {
	/// Descriptor, usually a ulong code or a symbol.
	pub descriptor: Value,
	/// Described value.
	pub value: Value,
}

impl Value {
	/// Shorthand for a symbol value.
	pub fn symbol(name: &str) -> Self {
		Self::Symbol(name.to_owned())
	}

	/// Shorthand for a string value.
	pub fn string(text: &str) -> Self {
		Self::String(text.to_owned())
	}

	/// Shorthand for a described value.
	pub fn described(descriptor: Value, value: Value) -> Self {
		Self::Described(Box::new(Described { descriptor, value }))
	}

	/// Logical kind of this value.
	pub fn kind(&self) -> Kind {
		match self {
			Self::Null => Kind::Null,
			Self::Bool(_) => Kind::Boolean,
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
			Self::List(_) => Kind::List,
			Self::Map(_) => Kind::Map,
			Self::Array(_) => Kind::Array,
			Self::Described(_) => Kind::Described,
		}
	}

	/// Return the code when this is a ulong.
	pub fn as_ulong(&self) -> Option<u64> {
		match self {
			Self::ULong(value) => Some(*value),
			_ => None,
		}
	}

	/// Return the name when this is a symbol.
	pub fn as_symbol(&self) -> Option<&str> {
		match self {
			Self::Symbol(name) => Some(name),
			_ => None,
		}
	}

	/// Return the text when this is a string.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(text) => Some(text),
			_ => None,
		}
	}

	/// Return the items when this is a list.
	pub fn as_list(&self) -> Option<&[Value]> {
		match self {
			Self::List(items) => Some(items),
			_ => None,
		}
	}

	/// Encode through a fresh builder.
	pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
		let mut data = Data::new();
		data.put_value(self)?;
		Ok(data.encode_to_vec())
	}

	pub(crate) fn to_atom(&self) -> Option<Atom> {
		let atom = match self {
			Self::Null => Atom::Null,
			Self::Bool(v) => Atom::Boolean(*v),
			Self::UByte(v) => Atom::UByte(*v),
			Self::UShort(v) => Atom::UShort(*v),
			Self::UInt(v) => Atom::UInt(*v),
			Self::ULong(v) => Atom::ULong(*v),
			Self::Byte(v) => Atom::Byte(*v),
			Self::Short(v) => Atom::Short(*v),
			Self::Int(v) => Atom::Int(*v),
			Self::Long(v) => Atom::Long(*v),
			Self::Float(v) => Atom::Float(*v),
			Self::Double(v) => Atom::Double(*v),
			Self::Decimal32(v) => Atom::Decimal32(*v),
			Self::Decimal64(v) => Atom::Decimal64(*v),
			Self::Decimal128(v) => Atom::Decimal128(*v),
			Self::Char(v) => Atom::Char(*v),
			Self::Timestamp(v) => Atom::Timestamp(*v),
			Self::Uuid(v) => Atom::Uuid(*v),
			Self::Binary(v) => Atom::Binary(v.clone()),
			Self::String(v) => Atom::String(v.clone()),
			Self::Symbol(v) => Atom::Symbol(v.clone()),
			Self::List(_) | Self::Map(_) | Self::Array(_) | Self::Described(_) => return None,
		};
		Some(atom)
	}

	fn from_atom(atom: &Atom) -> Self {
		match atom {
			Atom::Null => Self::Null,
			Atom::Boolean(v) => Self::Bool(*v),
			Atom::UByte(v) => Self::UByte(*v),
			Atom::UShort(v) => Self::UShort(*v),
			Atom::UInt(v) => Self::UInt(*v),
			Atom::ULong(v) => Self::ULong(*v),
			Atom::Byte(v) => Self::Byte(*v),
			Atom::Short(v) => Self::Short(*v),
			Atom::Int(v) => Self::Int(*v),
			Atom::Long(v) => Self::Long(*v),
			Atom::Float(v) => Self::Float(*v),
			Atom::Double(v) => Self::Double(*v),
			Atom::Decimal32(v) => Self::Decimal32(*v),
			Atom::Decimal64(v) => Self::Decimal64(*v),
			Atom::Decimal128(v) => Self::Decimal128(*v),
			Atom::Char(v) => Self::Char(*v),
			Atom::Timestamp(v) => Self::Timestamp(*v),
			Atom::Uuid(v) => Self::Uuid(*v),
			Atom::Binary(v) => Self::Binary(v.clone()),
			Atom::String(v) => Self::String(v.clone()),
			Atom::Symbol(v) => Self::Symbol(v.clone()),
		}
	}

	/// Copy a subtree out of the arena.
	///
	/// Missing described slots read as null, matching what the encoder writes.
	pub(crate) fn from_tree(tree: &Tree, id: NodeId) -> Result<Value> {
		let children = move || tree.children(id).map(move |child| Value::from_tree(tree, child));
		let value = match &tree.node(id).payload {
			Payload::Atom(atom) => Self::from_atom(atom),
			Payload::List => Self::List(children().collect::<Result<_>>()?),
			Payload::Map => {
				let count = tree.node(id).child_count;
				if count % 2 != 0 {
					return Err(CodecError::OddMapCount { count });
				}
				let flat = children().collect::<Result<Vec<_>>>()?;
				let mut entries = Vec::with_capacity(count / 2);
				let mut flat = flat.into_iter();
				while let (Some(key), Some(value)) = (flat.next(), flat.next()) {
					entries.push((key, value));
				}
				Self::Map(entries)
			}
			Payload::Array(header) => {
				let mut items = children().collect::<Result<Vec<_>>>()?;
				let descriptor = if header.described && !items.is_empty() {
					Some(Box::new(items.remove(0)))
				} else if header.described {
					Some(Box::new(Self::Null))
				} else {
					None
				};
				Self::Array(ArrayValue {
					element: header.element,
					descriptor,
					items,
				})
			}
			Payload::Described => {
				let mut slots = children().collect::<Result<Vec<_>>>()?.into_iter();
				let descriptor = slots.next().unwrap_or(Self::Null);
				let value = slots.next().unwrap_or(Self::Null);
				Self::described(descriptor, value)
			}
		};
		Ok(value)
	}
}

#[cfg(test)]
mod tests;
