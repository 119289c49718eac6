use thiserror::Error;

use crate::amqp::Kind;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors produced while building, encoding, and decoding AMQP value trees.
#[derive(Debug, Error)]
pub enum CodecError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Array child kind differs from the declared element kind and cannot be widened.
	#[error("array type mismatch: expected {expected}, got {got}")]
	ArrayTypeMismatch {
		/// Declared array element kind.
		expected: Kind,
		/// Kind of the rejected child.
		got: Kind,
	},
	/// Arrays cannot declare this element kind.
	#[error("invalid array element kind {kind}")]
	InvalidArrayElement {
		/// Rejected element kind.
		kind: Kind,
	},
	/// A described type already holds its descriptor and value.
	#[error("described type already has a descriptor and a value")]
	DescribedArity,
	/// `enter` was requested on a node that is absent or not composite.
	#[error("cannot enter: current node is not a composite")]
	UnbalancedEnter,
	/// `exit` was requested with no parent pushed.
	#[error("cannot exit: no parent node")]
	UnbalancedExit,
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Seek target lies past the end of the source.
	#[error("seek to offset {at} is past the end of a {len}-byte source")]
	SeekOutOfRange {
		/// Absolute offset requested.
		at: usize,
		/// Length of the source being sought in.
		len: usize,
	},
	/// Leading byte does not name any AMQP constructor.
	#[error("unrecognized format code 0x{code:02x} at offset {at}")]
	UnknownFormatCode {
		/// Offending format code.
		code: u8,
		/// Byte offset of the format code.
		at: usize,
	},
	/// Declared size prefix is larger than the bytes left in the source.
	#[error("declared length {declared} at offset {at} exceeds available {available}")]
	DeclaredLengthExceeded {
		/// Byte offset of the length prefix.
		at: usize,
		/// Declared byte length.
		declared: usize,
		/// Bytes still available.
		available: usize,
	},
	/// Boolean payload byte was neither 0x00 nor 0x01.
	#[error("invalid boolean payload 0x{byte:02x} at offset {at}")]
	InvalidBoolean {
		/// Offending payload byte.
		byte: u8,
		/// Byte offset of the payload.
		at: usize,
	},
	/// String payload is not valid UTF-8.
	#[error("invalid utf-8 payload at offset {at}")]
	InvalidUtf8 {
		/// Byte offset of the payload.
		at: usize,
	},
	/// Char payload is not a Unicode scalar value.
	#[error("invalid char code point 0x{value:08x} at offset {at}")]
	InvalidChar {
		/// Raw UTF-32 value.
		value: u32,
		/// Byte offset of the payload.
		at: usize,
	},
	/// Array element constructor is not usable for array elements.
	#[error("invalid array element constructor 0x{code:02x} at offset {at}")]
	InvalidArrayConstructor {
		/// Offending constructor code.
		code: u8,
		/// Byte offset of the constructor.
		at: usize,
	},
	/// Declared element count exceeded configured limit.
	#[error("declared count too large: count={count}, max={max}")]
	CountTooLarge {
		/// Declared element count.
		count: usize,
		/// Maximum permitted count.
		max: usize,
	},
	/// Decoder nesting depth exceeded configured limit.
	#[error("decode depth exceeded (max={max_depth})")]
	DecodeDepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Strict size mode found bytes left over inside a composite payload.
	#[error("decode layout mismatch in {kind}: leftover={leftover}")]
	LayoutMismatch {
		/// Composite kind being decoded.
		kind: Kind,
		/// Unconsumed bytes.
		leftover: usize,
	},
	/// Value conversion requested on a builder without a node.
	#[error("no value at cursor")]
	EmptyTree,
	/// Map node holds an odd number of children.
	#[error("map has odd child count {count}")]
	OddMapCount {
		/// Number of children in the map node.
		count: usize,
	},
	/// CLI hex input was invalid.
	#[error("invalid hex input: {input}")]
	InvalidHex {
		/// User-provided hex string.
		input: String,
	},
	/// CLI descriptor argument was invalid.
	#[error("invalid descriptor: {input}")]
	InvalidDescriptor {
		/// User-provided descriptor text.
		input: String,
	},
	/// Re-encoding a decoded value did not reproduce the input.
	#[error("round trip mismatch: input {input_len} bytes, output {output_len} bytes")]
	RoundTripMismatch {
		/// Input byte length.
		input_len: usize,
		/// Re-encoded byte length.
		output_len: usize,
	},
}
