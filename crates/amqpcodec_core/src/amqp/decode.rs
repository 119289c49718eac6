use std::sync::OnceLock;

use crate::amqp::bytes::Cursor;
use crate::amqp::node::Atom;
use crate::amqp::{CodecError, Data, Kind, Result, Value, codes};

/// Runtime limits and behavior switches for wire decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Maximum nesting of composites and described types.
	pub max_depth: u32,
	/// Maximum declared element count of one list, map or array.
	///
	/// Each element becomes one tree node. Lists and maps spend at least one input byte
	/// per element, so their node count is also bounded by the input length.
	pub max_count: usize,
	/// Maximum declared count of an array whose shared constructor has no payload
	/// (`null`, `true`, `false`, `uint0`, `ulong0`, `list0`).
	///
	/// Such arrays allocate one node per element from a constant-size header.
	pub max_zero_width_count: usize,
	/// Error when a composite's declared size is not fully consumed by its children.
	pub strict_sizes: bool,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			max_depth: 64,
			max_count: 1_048_576,
			max_zero_width_count: 65_536,
			strict_sizes: true,
		}
	}
}

impl DecodeOptions {
	/// Preset that skips trailing bytes inside composites instead of failing.
	pub fn lenient() -> Self {
		Self {
			strict_sizes: false,
			..Self::default()
		}
	}
}

/// How the payload after a format code is delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
	/// Fixed payload of this many bytes.
	Fixed(usize),
	/// One-byte length, then that many bytes.
	Variable8,
	/// Four-byte length, then that many bytes.
	Variable32,
	/// One-byte size covering a one-byte count and the items.
	Compound8,
	/// Four-byte size covering a four-byte count and the items.
	Compound32,
	/// A descriptor value followed by the described value.
	Described,
}

type ParseFn = fn(&mut Decoder<'_>, u8, &mut Cursor<'_>) -> Result<()>;

/// One slot of the format-code dispatch table.
#[derive(Clone, Copy)]
pub struct Constructor {
	/// Format code.
	pub code: u8,
	/// AMQP encoding name, such as `smalluint` or `list8`.
	pub name: &'static str,
	/// Kind of the node this code produces.
	pub kind: Kind,
	/// Payload delimiting rule.
	pub layout: Layout,
	parse: ParseFn,
}

impl std::fmt::Debug for Constructor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Constructor")
			.field("code", &format_args!("0x{:02x}", self.code))
			.field("name", &self.name)
			.field("kind", &self.kind)
			.field("layout", &self.layout)
			.finish()
	}
}

impl Constructor {
	/// Return `true` when this code can be the shared constructor of an array.
	pub fn valid_in_array(&self) -> bool {
		self.layout != Layout::Described
	}
}

fn entry(code: u8, name: &'static str, kind: Kind, layout: Layout, parse: ParseFn) -> Constructor {
	Constructor {
		code,
		name,
		kind,
		layout,
		parse,
	}
}

fn table() -> &'static [Option<Constructor>; 256] {
	static TABLE: OnceLock<[Option<Constructor>; 256]> = OnceLock::new();
	TABLE.get_or_init(|| {
		use Layout::*;
		let entries = [
			entry(codes::DESCRIBED, "described", Kind::Described, Described, parse_described),
			entry(codes::NULL, "null", Kind::Null, Fixed(0), |d, _, _| d.data.put_null()),
			entry(codes::BOOLEAN_TRUE, "true", Kind::Boolean, Fixed(0), |d, _, _| d.data.put_bool(true)),
			entry(codes::BOOLEAN_FALSE, "false", Kind::Boolean, Fixed(0), |d, _, _| d.data.put_bool(false)),
			entry(codes::UINT0, "uint0", Kind::UInt, Fixed(0), |d, _, _| d.data.put_uint(0)),
			entry(codes::ULONG0, "ulong0", Kind::ULong, Fixed(0), |d, _, _| d.data.put_ulong(0)),
			entry(codes::LIST0, "list0", Kind::List, Fixed(0), |d, _, _| d.data.put_list()),
			entry(codes::UBYTE, "ubyte", Kind::UByte, Fixed(1), |d, _, c| d.data.put_ubyte(c.read_u8()?)),
			entry(codes::BYTE, "byte", Kind::Byte, Fixed(1), |d, _, c| d.data.put_byte(c.read_u8()? as i8)),
			entry(codes::SMALL_UINT, "smalluint", Kind::UInt, Fixed(1), |d, _, c| d.data.put_uint(u32::from(c.read_u8()?))),
			entry(codes::SMALL_ULONG, "smallulong", Kind::ULong, Fixed(1), |d, _, c| d.data.put_ulong(u64::from(c.read_u8()?))),
			entry(codes::SMALL_INT, "smallint", Kind::Int, Fixed(1), |d, _, c| d.data.put_int(i32::from(c.read_u8()? as i8))),
			entry(codes::SMALL_LONG, "smalllong", Kind::Long, Fixed(1), |d, _, c| d.data.put_long(i64::from(c.read_u8()? as i8))),
			entry(codes::BOOLEAN, "boolean", Kind::Boolean, Fixed(1), parse_boolean),
			entry(codes::USHORT, "ushort", Kind::UShort, Fixed(2), |d, _, c| d.data.put_ushort(c.read_u16()?)),
			entry(codes::SHORT, "short", Kind::Short, Fixed(2), |d, _, c| d.data.put_short(c.read_u16()? as i16)),
			entry(codes::UINT, "uint", Kind::UInt, Fixed(4), |d, _, c| d.data.put_uint(c.read_u32()?)),
			entry(codes::INT, "int", Kind::Int, Fixed(4), |d, _, c| d.data.put_int(c.read_u32()? as i32)),
			entry(codes::FLOAT, "float", Kind::Float, Fixed(4), |d, _, c| d.data.put_float(f32::from_bits(c.read_u32()?))),
			entry(codes::CHAR, "char", Kind::Char, Fixed(4), parse_char),
			entry(codes::DECIMAL32, "decimal32", Kind::Decimal32, Fixed(4), |d, _, c| d.data.put_decimal32(c.read_u32()?)),
			entry(codes::ULONG, "ulong", Kind::ULong, Fixed(8), |d, _, c| d.data.put_ulong(c.read_u64()?)),
			entry(codes::LONG, "long", Kind::Long, Fixed(8), |d, _, c| d.data.put_long(c.read_u64()? as i64)),
			entry(codes::DOUBLE, "double", Kind::Double, Fixed(8), |d, _, c| d.data.put_double(f64::from_bits(c.read_u64()?))),
			entry(codes::TIMESTAMP, "ms64", Kind::Timestamp, Fixed(8), |d, _, c| d.data.put_timestamp(c.read_u64()? as i64)),
			entry(codes::DECIMAL64, "decimal64", Kind::Decimal64, Fixed(8), |d, _, c| d.data.put_decimal64(c.read_u64()?)),
			entry(codes::DECIMAL128, "decimal128", Kind::Decimal128, Fixed(16), |d, _, c| d.data.put_decimal128(c.read_array()?)),
			entry(codes::UUID, "uuid", Kind::Uuid, Fixed(16), |d, _, c| d.data.put_uuid(c.read_array()?)),
			entry(codes::VBIN8, "vbin8", Kind::Binary, Variable8, parse_binary),
			entry(codes::STR8, "str8-utf8", Kind::String, Variable8, parse_string),
			entry(codes::SYM8, "sym8", Kind::Symbol, Variable8, parse_symbol),
			entry(codes::VBIN32, "vbin32", Kind::Binary, Variable32, parse_binary),
			entry(codes::STR32, "str32-utf8", Kind::String, Variable32, parse_string),
			entry(codes::SYM32, "sym32", Kind::Symbol, Variable32, parse_symbol),
			entry(codes::LIST8, "list8", Kind::List, Compound8, parse_list),
			entry(codes::MAP8, "map8", Kind::Map, Compound8, parse_map),
			entry(codes::LIST32, "list32", Kind::List, Compound32, parse_list),
			entry(codes::MAP32, "map32", Kind::Map, Compound32, parse_map),
			entry(codes::ARRAY8, "array8", Kind::Array, Compound8, parse_array),
			entry(codes::ARRAY32, "array32", Kind::Array, Compound32, parse_array),
		];

		let mut table = [None; 256];
		for item in entries {
			table[usize::from(item.code)] = Some(item);
		}
		table
	})
}

/// Look up the dispatch slot of a format code.
pub fn constructor(code: u8) -> Option<&'static Constructor> {
	table()[usize::from(code)].as_ref()
}

/// Iterate over every populated dispatch slot in code order.
pub fn constructors() -> impl Iterator<Item = &'static Constructor> {
	table().iter().flatten()
}

/// Decode one value from the front of `bytes` into an owned value.
///
/// Returns the value and the number of bytes it occupied.
pub fn decode_value(bytes: &[u8], options: &DecodeOptions) -> Result<(Value, usize)> {
	let mut data = Data::new();
	let consumed = data.decode_with(bytes, options)?;
	Ok((data.value()?, consumed))
}

/// Encoded length of the value starting `offset` bytes past the cursor, found by peeking only.
pub(crate) fn peek_value_len(cursor: &Cursor<'_>, offset: usize, depth: u32, max_depth: u32) -> Result<usize> {
	if depth >= max_depth {
		return Err(CodecError::DecodeDepthExceeded { max_depth });
	}
	let code = cursor.peek_u8_at(offset)?;
	let ctor = constructor(code).ok_or(CodecError::UnknownFormatCode {
		code,
		at: cursor.pos() + offset,
	})?;
	let payload = match ctor.layout {
		Layout::Fixed(n) => n,
		Layout::Variable8 | Layout::Compound8 => 1 + usize::from(cursor.peek_u8_at(offset + 1)?),
		Layout::Variable32 | Layout::Compound32 => 4 + cursor.peek_u32_at(offset + 1)? as usize,
		Layout::Described => {
			let descriptor = peek_value_len(cursor, offset + 1, depth + 1, max_depth)?;
			descriptor + peek_value_len(cursor, offset + 1 + descriptor, depth + 1, max_depth)?
		}
	};
	Ok(1 + payload)
}

impl Data {
	/// Decode one value from the front of `bytes` with default options.
	///
	/// The value is put at the cursor like any `put_*`; returns the bytes consumed.
	pub fn decode(&mut self, bytes: &[u8]) -> Result<usize> {
		self.decode_with(bytes, &DecodeOptions::default())
	}

	/// Decode one value from the front of `bytes`.
	///
	/// On error the builder is cleared, so no partial tree stays observable.
	pub fn decode_with(&mut self, bytes: &[u8], options: &DecodeOptions) -> Result<usize> {
		let mut cursor = Cursor::new(bytes);
		let mut decoder = Decoder {
			data: self,
			options,
			depth: 0,
		};
		match decoder.value(&mut cursor) {
			Ok(()) => Ok(cursor.pos()),
			Err(err) => {
				tracing::debug!(error = %err, at = cursor.pos(), "decode failed");
				self.clear();
				Err(err)
			}
		}
	}
}

struct Decoder<'d> {
	data: &'d mut Data,
	options: &'d DecodeOptions,
	depth: u32,
}

impl Decoder<'_> {
	/// Read a format code and parse its payload.
	fn value(&mut self, cursor: &mut Cursor<'_>) -> Result<()> {
		let at = cursor.pos();
		let code = cursor.read_u8()?;
		let ctor = constructor(code).ok_or(CodecError::UnknownFormatCode { code, at })?;
		tracing::trace!(code, kind = ctor.kind.as_str(), at, "constructor");
		(ctor.parse)(self, code, cursor)
	}

	fn push_level(&mut self) -> Result<()> {
		if self.depth >= self.options.max_depth {
			return Err(CodecError::DecodeDepthExceeded {
				max_depth: self.options.max_depth,
			});
		}
		self.depth += 1;
		self.data.descend()
	}

	fn pop_level(&mut self) -> Result<()> {
		self.depth -= 1;
		self.data.ascend()
	}

	fn check_count(&self, count: usize) -> Result<()> {
		if count > self.options.max_count {
			return Err(CodecError::CountTooLarge {
				count,
				max: self.options.max_count,
			});
		}
		Ok(())
	}

	fn check_leftover(&self, kind: Kind, body: &Cursor<'_>) -> Result<()> {
		let leftover = body.remaining();
		if leftover > 0 && self.options.strict_sizes {
			return Err(CodecError::LayoutMismatch { kind, leftover });
		}
		Ok(())
	}
}

fn is_large(code: u8) -> bool {
	matches!(code, codes::VBIN32 | codes::STR32 | codes::SYM32 | codes::LIST32 | codes::MAP32 | codes::ARRAY32)
}

/// Read the length prefix of `code` and carve out the bytes it covers.
fn sized<'a>(code: u8, cursor: &mut Cursor<'a>) -> Result<Cursor<'a>> {
	let at = cursor.pos();
	let declared = if is_large(code) { cursor.read_u32()? as usize } else { usize::from(cursor.read_u8()?) };
	let available = cursor.remaining();
	if declared > available {
		return Err(CodecError::DeclaredLengthExceeded { at, declared, available });
	}
	cursor.split(declared)
}

fn read_count(code: u8, body: &mut Cursor<'_>) -> Result<usize> {
	if is_large(code) { Ok(body.read_u32()? as usize) } else { Ok(usize::from(body.read_u8()?)) }
}

fn parse_boolean(d: &mut Decoder<'_>, _: u8, c: &mut Cursor<'_>) -> Result<()> {
	let at = c.pos();
	match c.read_u8()? {
		0x00 => d.data.put_bool(false),
		0x01 => d.data.put_bool(true),
		byte => Err(CodecError::InvalidBoolean { byte, at }),
	}
}

fn parse_char(d: &mut Decoder<'_>, _: u8, c: &mut Cursor<'_>) -> Result<()> {
	let at = c.pos();
	let value = c.read_u32()?;
	let ch = char::from_u32(value).ok_or(CodecError::InvalidChar { value, at })?;
	d.data.put_char(ch)
}

fn parse_binary(d: &mut Decoder<'_>, code: u8, c: &mut Cursor<'_>) -> Result<()> {
	let mut body = sized(code, c)?;
	let bytes = body.read_exact(body.remaining())?;
	d.data.put_binary(bytes)
}

fn read_text(code: u8, c: &mut Cursor<'_>) -> Result<String> {
	let mut body = sized(code, c)?;
	let at = body.pos();
	let bytes = body.read_exact(body.remaining())?;
	String::from_utf8(bytes.to_vec()).map_err(|_| CodecError::InvalidUtf8 { at })
}

fn parse_string(d: &mut Decoder<'_>, code: u8, c: &mut Cursor<'_>) -> Result<()> {
	let text = read_text(code, c)?;
	d.data.put_atom(Atom::String(text))
}

fn parse_symbol(d: &mut Decoder<'_>, code: u8, c: &mut Cursor<'_>) -> Result<()> {
	let name = read_text(code, c)?;
	d.data.put_atom(Atom::Symbol(name))
}

fn parse_list(d: &mut Decoder<'_>, code: u8, c: &mut Cursor<'_>) -> Result<()> {
	parse_compound(d, code, c, Kind::List)
}

fn parse_map(d: &mut Decoder<'_>, code: u8, c: &mut Cursor<'_>) -> Result<()> {
	parse_compound(d, code, c, Kind::Map)
}

fn parse_compound(d: &mut Decoder<'_>, code: u8, c: &mut Cursor<'_>, kind: Kind) -> Result<()> {
	let mut body = sized(code, c)?;
	let count = read_count(code, &mut body)?;
	d.check_count(count)?;

	match kind {
		Kind::Map => d.data.put_map()?,
		_ => d.data.put_list()?,
	}
	d.push_level()?;
	for _ in 0..count {
		d.value(&mut body)?;
	}
	d.pop_level()?;
	d.check_leftover(kind, &body)
}

fn parse_described(d: &mut Decoder<'_>, _: u8, c: &mut Cursor<'_>) -> Result<()> {
	d.data.put_described()?;
	d.push_level()?;
	d.value(c)?;
	d.value(c)?;
	d.pop_level()
}

/// Array payload: count, optional `0x00 descriptor`, one element constructor, element payloads.
fn parse_array(d: &mut Decoder<'_>, code: u8, c: &mut Cursor<'_>) -> Result<()> {
	let mut body = sized(code, c)?;
	let count = read_count(code, &mut body)?;
	d.check_count(count)?;

	let described = body.peek_u8_at(0)? == codes::DESCRIBED;
	let element_offset = if described {
		1 + peek_value_len(&body, 1, d.depth, d.options.max_depth)?
	} else {
		0
	};
	let element_at = body.pos() + element_offset;
	let element_code = body.peek_u8_at(element_offset)?;
	let element = constructor(element_code).ok_or(CodecError::UnknownFormatCode {
		code: element_code,
		at: element_at,
	})?;
	if !element.valid_in_array() {
		return Err(CodecError::InvalidArrayConstructor {
			code: element_code,
			at: element_at,
		});
	}

	if element.layout == Layout::Fixed(0) && count > d.options.max_zero_width_count {
		return Err(CodecError::CountTooLarge {
			count,
			max: d.options.max_zero_width_count,
		});
	}

	d.data.put_array(described, element.kind)?;
	d.push_level()?;
	if described {
		body.read_u8()?;
		d.value(&mut body)?;
	}
	body.read_u8()?;
	for _ in 0..count {
		(element.parse)(d, element_code, &mut body)?;
	}
	d.pop_level()?;
	d.check_leftover(Kind::Array, &body)
}

#[cfg(test)]
mod tests;
