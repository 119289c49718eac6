use crate::amqp::{CodecError, Result};

/// Bounded big-endian cursor over an immutable byte slice.
///
/// Offsets reported in errors are absolute: a cursor produced by [`Cursor::split`]
/// keeps the base offset of its parent.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
	base: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0, base: 0 }
	}

	/// Return current absolute byte offset.
	pub fn pos(&self) -> usize {
		self.base + self.pos
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Move to a position relative to the start of this cursor.
	pub fn seek(&mut self, pos: usize) -> Result<()> {
		if pos > self.bytes.len() {
			return Err(CodecError::SeekOutOfRange {
				at: self.base + pos,
				len: self.bytes.len(),
			});
		}
		self.pos = pos;
		Ok(())
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(self.eof(n));
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Carve the next `n` bytes into an isolated cursor and advance past them.
	pub fn split(&mut self, n: usize) -> Result<Cursor<'a>> {
		let base = self.pos();
		let bytes = self.read_exact(n)?;
		Ok(Cursor { bytes, pos: 0, base })
	}

	/// Read one byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_exact(1)?[0])
	}

	/// Read a big-endian `u16`.
	pub fn read_u16(&mut self) -> Result<u16> {
		Ok(u16::from_be_bytes(self.read_array()?))
	}

	/// Read a big-endian `u32`.
	pub fn read_u32(&mut self) -> Result<u32> {
		Ok(u32::from_be_bytes(self.read_array()?))
	}

	/// Read a big-endian `u64`.
	pub fn read_u64(&mut self) -> Result<u64> {
		Ok(u64::from_be_bytes(self.read_array()?))
	}

	/// Read a fixed-size byte array.
	pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
		let raw = self.read_exact(N)?;
		let mut out = [0_u8; N];
		out.copy_from_slice(raw);
		Ok(out)
	}

	/// Peek one byte `offset` bytes past the current position without consuming.
	pub fn peek_u8_at(&self, offset: usize) -> Result<u8> {
		self.bytes
			.get(self.pos + offset)
			.copied()
			.ok_or_else(|| self.eof(offset + 1))
	}

	/// Peek a big-endian `u32` `offset` bytes past the current position without consuming.
	pub fn peek_u32_at(&self, offset: usize) -> Result<u32> {
		let start = self.pos + offset;
		let raw = self.bytes.get(start..start + 4).ok_or_else(|| self.eof(offset + 4))?;
		let mut buf = [0_u8; 4];
		buf.copy_from_slice(raw);
		Ok(u32::from_be_bytes(buf))
	}

	fn eof(&self, need: usize) -> CodecError {
		CodecError::UnexpectedEof {
			at: self.pos(),
			need,
			rem: self.remaining(),
		}
	}
}
