use std::cell::Cell;

use crate::amqp::node::{ArrayHeader, Context, NodeId, Payload, Tree};
use crate::amqp::{ByteSink, CodecError, Result, WidthClass, codes};

/// Raise `width` to at least `need` and return the class now in effect.
pub(crate) fn require(width: &Cell<WidthClass>, need: WidthClass) -> WidthClass {
	let current = width.get();
	if need > current {
		width.set(need);
		return need;
	}
	current
}

/// Class needed by a composite header whose payload after the count field is `body` bytes.
pub(crate) fn composite_class(body: usize, count: usize) -> WidthClass {
	if count <= 0xff && body + 1 <= 0xff { WidthClass::Small } else { WidthClass::Large }
}

/// Write a composite size/count header in `class` (Tiny is written as Small).
pub(crate) fn write_composite_header<S: ByteSink + ?Sized>(class: WidthClass, body: usize, count: usize, sink: &mut S) {
	match class {
		WidthClass::Large => {
			sink.put_u32((body + 4) as u32);
			sink.put_u32(count as u32);
		}
		_ => {
			sink.put_u8((body + 1) as u8);
			sink.put_u8(count as u8);
		}
	}
}

impl Tree {
	/// Check a node about to join `parent`, widening scalars into an array's element kind.
	pub(crate) fn admit(&self, parent: NodeId, payload: Payload) -> Result<Payload> {
		let node = self.node(parent);
		match &node.payload {
			Payload::Array(header) => {
				if header.described && node.child_count == 0 {
					return Ok(payload);
				}
				let got = payload.kind();
				if got == header.element {
					return Ok(payload);
				}
				let mismatch = CodecError::ArrayTypeMismatch {
					expected: header.element,
					got,
				};
				match payload {
					Payload::Atom(atom) if got.widens_to(header.element) => atom.widen(header.element).map(Payload::Atom).ok_or(mismatch),
					_ => Err(mismatch),
				}
			}
			Payload::Described if node.child_count >= 2 => Err(CodecError::DescribedArity),
			_ => Ok(payload),
		}
	}

	/// Number of homogeneous elements, excluding a descriptor.
	pub(crate) fn array_count(&self, id: NodeId, header: &ArrayHeader) -> usize {
		let count = self.node(id).child_count;
		if header.described { count.saturating_sub(1) } else { count }
	}

	fn array_elements(&self, id: NodeId, header: &ArrayHeader) -> impl Iterator<Item = NodeId> + '_ {
		self.children(id).skip(usize::from(header.described))
	}

	/// Bytes after the count field: constructor, optional descriptor pair, element payloads.
	///
	/// Re-sums the elements until the width class stops moving. The class has three
	/// values and only grows, so this settles after at most two escalations.
	fn array_body(&self, id: NodeId, header: &ArrayHeader) -> usize {
		let mut fixed = 1;
		if header.described {
			fixed += 1;
			fixed += match self.children(id).next() {
				Some(descriptor) => self.size(descriptor, Context::Standalone),
				None => 1,
			};
		}

		let mut escalations = 0_u32;
		loop {
			let before = header.width.get();
			let elements: usize = self
				.array_elements(id, header)
				.map(|child| self.size(child, Context::Element(&header.width)))
				.sum();
			let after = header.width.get();
			if after == before {
				return fixed + elements;
			}

			escalations += 1;
			tracing::trace!(element = %header.element, from = before.as_str(), to = after.as_str(), "array width escalated");
			debug_assert!(escalations <= 2, "array width escalated more than twice");
		}
	}

	pub(crate) fn array_size(&self, id: NodeId, header: &ArrayHeader, ctx: Context<'_>) -> usize {
		let body = self.array_body(id, header);
		let count = self.array_count(id, header);
		match ctx {
			Context::Standalone => match composite_class(body, count) {
				WidthClass::Large => 9 + body,
				_ => 3 + body,
			},
			Context::Element(width) => match require(width, composite_class(body, count)) {
				WidthClass::Large => 8 + body,
				_ => 2 + body,
			},
		}
	}

	pub(crate) fn write_array<S: ByteSink + ?Sized>(&self, id: NodeId, header: &ArrayHeader, ctx: Context<'_>, sink: &mut S) {
		let body = self.array_body(id, header);
		let count = self.array_count(id, header);
		match ctx {
			Context::Standalone => {
				let class = composite_class(body, count);
				sink.put_u8(if class == WidthClass::Large { codes::ARRAY32 } else { codes::ARRAY8 });
				write_composite_header(class, body, count, sink);
			}
			Context::Element(width) => write_composite_header(width.get(), body, count, sink),
		}

		if header.described {
			sink.put_u8(codes::DESCRIBED);
			match self.children(id).next() {
				Some(descriptor) => self.write(descriptor, Context::Standalone, sink),
				None => sink.put_u8(codes::NULL),
			}
		}

		sink.put_u8(header.element.element_code(header.width.get()));
		for child in self.array_elements(id, header) {
			self.write(child, Context::Element(&header.width), sink);
		}
	}
}

#[cfg(test)]
mod tests;
