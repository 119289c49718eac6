use std::fmt;

/// AMQP 1.0 format codes.
pub mod codes {
	/// Described-type indicator.
	pub const DESCRIBED: u8 = 0x00;
	/// Null.
	pub const NULL: u8 = 0x40;
	/// Boolean true, no payload.
	pub const BOOLEAN_TRUE: u8 = 0x41;
	/// Boolean false, no payload.
	pub const BOOLEAN_FALSE: u8 = 0x42;
	/// Unsigned int zero, no payload.
	pub const UINT0: u8 = 0x43;
	/// Unsigned long zero, no payload.
	pub const ULONG0: u8 = 0x44;
	/// Empty list, no payload.
	pub const LIST0: u8 = 0x45;
	/// Unsigned byte.
	pub const UBYTE: u8 = 0x50;
	/// Signed byte.
	pub const BYTE: u8 = 0x51;
	/// Unsigned int in one byte.
	pub const SMALL_UINT: u8 = 0x52;
	/// Unsigned long in one byte.
	pub const SMALL_ULONG: u8 = 0x53;
	/// Signed int in one byte.
	pub const SMALL_INT: u8 = 0x54;
	/// Signed long in one byte.
	pub const SMALL_LONG: u8 = 0x55;
	/// Boolean with a one-byte payload.
	pub const BOOLEAN: u8 = 0x56;
	/// Unsigned short.
	pub const USHORT: u8 = 0x60;
	/// Signed short.
	pub const SHORT: u8 = 0x61;
	/// Unsigned int.
	pub const UINT: u8 = 0x70;
	/// Signed int.
	pub const INT: u8 = 0x71;
	/// IEEE 754 binary32.
	pub const FLOAT: u8 = 0x72;
	/// UTF-32BE code point.
	pub const CHAR: u8 = 0x73;
	/// IEEE 754 decimal32.
	pub const DECIMAL32: u8 = 0x74;
	/// Unsigned long.
	pub const ULONG: u8 = 0x80;
	/// Signed long.
	pub const LONG: u8 = 0x81;
	/// IEEE 754 binary64.
	pub const DOUBLE: u8 = 0x82;
	/// Milliseconds since the Unix epoch.
	pub const TIMESTAMP: u8 = 0x83;
	/// IEEE 754 decimal64.
	pub const DECIMAL64: u8 = 0x84;
	/// IEEE 754 decimal128.
	pub const DECIMAL128: u8 = 0x94;
	/// RFC 4122 UUID.
	pub const UUID: u8 = 0x98;
	/// Binary with one-byte length.
	pub const VBIN8: u8 = 0xa0;
	/// UTF-8 string with one-byte length.
	pub const STR8: u8 = 0xa1;
	/// Symbol with one-byte length.
	pub const SYM8: u8 = 0xa3;
	/// Binary with four-byte length.
	pub const VBIN32: u8 = 0xb0;
	/// UTF-8 string with four-byte length.
	pub const STR32: u8 = 0xb1;
	/// Symbol with four-byte length.
	pub const SYM32: u8 = 0xb3;
	/// List with one-byte size and count.
	pub const LIST8: u8 = 0xc0;
	/// Map with one-byte size and count.
	pub const MAP8: u8 = 0xc1;
	/// List with four-byte size and count.
	pub const LIST32: u8 = 0xd0;
	/// Map with four-byte size and count.
	pub const MAP32: u8 = 0xd1;
	/// Array with one-byte size and count.
	pub const ARRAY8: u8 = 0xe0;
	/// Array with four-byte size and count.
	pub const ARRAY32: u8 = 0xf0;
}

/// Logical AMQP type of one value node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
	/// Absent value.
	Null,
	/// Boolean.
	Boolean,
	/// Unsigned 8-bit integer.
	UByte,
	/// Unsigned 16-bit integer.
	UShort,
	/// Unsigned 32-bit integer.
	UInt,
	/// Unsigned 64-bit integer.
	ULong,
	/// Signed 8-bit integer.
	Byte,
	/// Signed 16-bit integer.
	Short,
	/// Signed 32-bit integer.
	Int,
	/// Signed 64-bit integer.
	Long,
	/// 32-bit float.
	Float,
	/// 64-bit float.
	Double,
	/// 32-bit decimal, opaque bits.
	Decimal32,
	/// 64-bit decimal, opaque bits.
	Decimal64,
	/// 128-bit decimal, opaque bytes.
	Decimal128,
	/// Unicode scalar value.
	Char,
	/// Milliseconds since the Unix epoch.
	Timestamp,
	/// 16-byte UUID.
	Uuid,
	/// Opaque bytes.
	Binary,
	/// UTF-8 text.
	String,
	/// Symbolic ASCII name.
	Symbol,
	/// Heterogeneous sequence.
	List,
	/// Flat key/value sequence.
	Map,
	/// Homogeneous sequence with one shared constructor.
	Array,
	/// Descriptor plus described value.
	Described,
}

impl Kind {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Boolean => "bool",
			Self::UByte => "ubyte",
			Self::UShort => "ushort",
			Self::UInt => "uint",
			Self::ULong => "ulong",
			Self::Byte => "byte",
			Self::Short => "short",
			Self::Int => "int",
			Self::Long => "long",
			Self::Float => "float",
			Self::Double => "double",
			Self::Decimal32 => "decimal32",
			Self::Decimal64 => "decimal64",
			Self::Decimal128 => "decimal128",
			Self::Char => "char",
			Self::Timestamp => "timestamp",
			Self::Uuid => "uuid",
			Self::Binary => "binary",
			Self::String => "string",
			Self::Symbol => "symbol",
			Self::List => "list",
			Self::Map => "map",
			Self::Array => "array",
			Self::Described => "described",
		}
	}

	/// Return `true` for kinds that own child nodes.
	pub fn is_composite(self) -> bool {
		matches!(self, Self::List | Self::Map | Self::Array | Self::Described)
	}

	/// Return `true` when a value of `self` converts to `target` without loss.
	///
	/// Identity is not a widening; callers compare kinds first.
	pub fn widens_to(self, target: Kind) -> bool {
		use Kind::*;
		matches!(
			(self, target),
			(Byte, Short | Int | Long)
				| (Short, Int | Long)
				| (Int, Long)
				| (UByte, UShort | UInt | ULong | Short | Int | Long)
				| (UShort, UInt | ULong | Int | Long)
				| (UInt, ULong | Long)
				| (Float, Double)
		)
	}

	/// Width class a fresh array of this element kind starts from.
	pub fn initial_width(self) -> WidthClass {
		match self {
			Self::UInt | Self::ULong | Self::List => WidthClass::Tiny,
			_ => WidthClass::Small,
		}
	}

	/// Shared element constructor written by an array of this kind in `width`.
	pub fn element_code(self, width: WidthClass) -> u8 {
		use WidthClass::*;
		match (self, width) {
			(Self::Null, _) => codes::NULL,
			(Self::Boolean, _) => codes::BOOLEAN,
			(Self::UByte, _) => codes::UBYTE,
			(Self::Byte, _) => codes::BYTE,
			(Self::UShort, _) => codes::USHORT,
			(Self::Short, _) => codes::SHORT,
			(Self::UInt, Tiny) => codes::UINT0,
			(Self::UInt, Small) => codes::SMALL_UINT,
			(Self::UInt, Large) => codes::UINT,
			(Self::ULong, Tiny) => codes::ULONG0,
			(Self::ULong, Small) => codes::SMALL_ULONG,
			(Self::ULong, Large) => codes::ULONG,
			(Self::Int, Large) => codes::INT,
			(Self::Int, _) => codes::SMALL_INT,
			(Self::Long, Large) => codes::LONG,
			(Self::Long, _) => codes::SMALL_LONG,
			(Self::Float, _) => codes::FLOAT,
			(Self::Double, _) => codes::DOUBLE,
			(Self::Decimal32, _) => codes::DECIMAL32,
			(Self::Decimal64, _) => codes::DECIMAL64,
			(Self::Decimal128, _) => codes::DECIMAL128,
			(Self::Char, _) => codes::CHAR,
			(Self::Timestamp, _) => codes::TIMESTAMP,
			(Self::Uuid, _) => codes::UUID,
			(Self::Binary, Large) => codes::VBIN32,
			(Self::Binary, _) => codes::VBIN8,
			(Self::String, Large) => codes::STR32,
			(Self::String, _) => codes::STR8,
			(Self::Symbol, Large) => codes::SYM32,
			(Self::Symbol, _) => codes::SYM8,
			(Self::List, Tiny) => codes::LIST0,
			(Self::List, Small) => codes::LIST8,
			(Self::List, Large) => codes::LIST32,
			(Self::Map, Large) => codes::MAP32,
			(Self::Map, _) => codes::MAP8,
			(Self::Array, Large) => codes::ARRAY32,
			(Self::Array, _) => codes::ARRAY8,
			(Self::Described, _) => codes::DESCRIBED,
		}
	}
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Width of the shared encoding chosen for the elements of one array.
///
/// Only ever grows while an array is being sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WidthClass {
	/// Zero-width element payloads (uint0, ulong0, list0).
	Tiny,
	/// One-byte element payloads or one-byte size/count prefixes.
	Small,
	/// Full-width element payloads or four-byte size/count prefixes.
	Large,
}

impl WidthClass {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Tiny => "tiny",
			Self::Small => "small",
			Self::Large => "large",
		}
	}
}
