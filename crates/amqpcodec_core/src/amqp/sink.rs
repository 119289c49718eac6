/// Destination for encoded bytes.
///
/// Writers check [`ByteSink::remaining`] before writing a value; the `put_*` methods
/// assume the capacity has been checked.
pub trait ByteSink {
	/// Bytes that can still be written.
	fn remaining(&self) -> usize;
	/// Bytes written so far.
	fn position(&self) -> usize;
	/// Write raw bytes.
	fn put_bytes(&mut self, bytes: &[u8]);

	/// Write one byte.
	fn put_u8(&mut self, value: u8) {
		self.put_bytes(&[value]);
	}

	/// Write a big-endian `u16`.
	fn put_u16(&mut self, value: u16) {
		self.put_bytes(&value.to_be_bytes());
	}

	/// Write a big-endian `u32`.
	fn put_u32(&mut self, value: u32) {
		self.put_bytes(&value.to_be_bytes());
	}

	/// Write a big-endian `u64`.
	fn put_u64(&mut self, value: u64) {
		self.put_bytes(&value.to_be_bytes());
	}
}

impl ByteSink for Vec<u8> {
	fn remaining(&self) -> usize {
		usize::MAX - self.len()
	}

	fn position(&self) -> usize {
		self.len()
	}

	fn put_bytes(&mut self, bytes: &[u8]) {
		self.extend_from_slice(bytes);
	}
}

/// Bounded sink writing into a caller-provided buffer.
pub struct FixedSink<'a> {
	buf: &'a mut [u8],
	pos: usize,
}

impl<'a> FixedSink<'a> {
	/// Create an empty sink over `buf`.
	pub fn new(buf: &'a mut [u8]) -> Self {
		Self { buf, pos: 0 }
	}

	/// Bytes written so far.
	pub fn written(&self) -> &[u8] {
		&self.buf[..self.pos]
	}

	/// Forget written bytes so the buffer can be reused.
	pub fn reset(&mut self) {
		self.pos = 0;
	}
}

impl ByteSink for FixedSink<'_> {
	fn remaining(&self) -> usize {
		self.buf.len() - self.pos
	}

	fn position(&self) -> usize {
		self.pos
	}

	fn put_bytes(&mut self, bytes: &[u8]) {
		let end = self.pos + bytes.len();
		self.buf[self.pos..end].copy_from_slice(bytes);
		self.pos = end;
	}
}
