use crate::amqp::array::{composite_class, require, write_composite_header};
use crate::amqp::node::{Context, NodeId, Tree};
use crate::amqp::{ByteSink, WidthClass, codes};

impl Tree {
	fn children_size(&self, id: NodeId) -> usize {
		self.children(id).map(|child| self.size(child, Context::Standalone)).sum()
	}

	fn write_children<S: ByteSink + ?Sized>(&self, id: NodeId, sink: &mut S) {
		for child in self.children(id) {
			self.write(child, Context::Standalone, sink);
		}
	}

	pub(crate) fn list_size(&self, id: NodeId, ctx: Context<'_>) -> usize {
		let count = self.node(id).child_count;
		let body = self.children_size(id);
		match ctx {
			Context::Standalone if count == 0 => 1,
			Context::Standalone => match composite_class(body, count) {
				WidthClass::Large => 9 + body,
				_ => 3 + body,
			},
			Context::Element(width) => {
				let need = if count == 0 { WidthClass::Tiny } else { composite_class(body, count) };
				match require(width, need) {
					WidthClass::Tiny => 0,
					WidthClass::Small => 2 + body,
					WidthClass::Large => 8 + body,
				}
			}
		}
	}

	pub(crate) fn write_list<S: ByteSink + ?Sized>(&self, id: NodeId, ctx: Context<'_>, sink: &mut S) {
		let count = self.node(id).child_count;
		match ctx {
			Context::Standalone if count == 0 => sink.put_u8(codes::LIST0),
			Context::Standalone => {
				let body = self.children_size(id);
				let class = composite_class(body, count);
				sink.put_u8(if class == WidthClass::Large { codes::LIST32 } else { codes::LIST8 });
				write_composite_header(class, body, count, sink);
				self.write_children(id, sink);
			}
			Context::Element(width) => {
				if width.get() == WidthClass::Tiny {
					return;
				}
				write_composite_header(width.get(), self.children_size(id), count, sink);
				self.write_children(id, sink);
			}
		}
	}

	/// Map children are a flat key, value, key, value sequence; pairing is not checked here.
	pub(crate) fn map_size(&self, id: NodeId, ctx: Context<'_>) -> usize {
		let count = self.node(id).child_count;
		let body = self.children_size(id);
		let class = match ctx {
			Context::Standalone => composite_class(body, count),
			Context::Element(width) => require(width, composite_class(body, count)),
		};
		let prefix = match (ctx, class) {
			(Context::Standalone, WidthClass::Large) => 9,
			(Context::Standalone, _) => 3,
			(Context::Element(_), WidthClass::Large) => 8,
			(Context::Element(_), _) => 2,
		};
		prefix + body
	}

	pub(crate) fn write_map<S: ByteSink + ?Sized>(&self, id: NodeId, ctx: Context<'_>, sink: &mut S) {
		let count = self.node(id).child_count;
		let body = self.children_size(id);
		match ctx {
			Context::Standalone => {
				let class = composite_class(body, count);
				sink.put_u8(if class == WidthClass::Large { codes::MAP32 } else { codes::MAP8 });
				write_composite_header(class, body, count, sink);
			}
			Context::Element(width) => write_composite_header(width.get(), body, count, sink),
		}
		self.write_children(id, sink);
	}

	/// Described types always carry two slots; a missing descriptor or value is written as null.
	pub(crate) fn described_size(&self, id: NodeId) -> usize {
		let present = self.node(id).child_count.min(2);
		1 + self.children_size(id) + (2 - present)
	}

	pub(crate) fn write_described<S: ByteSink + ?Sized>(&self, id: NodeId, sink: &mut S) {
		sink.put_u8(codes::DESCRIBED);
		let mut written = 0;
		for child in self.children(id) {
			self.write(child, Context::Standalone, sink);
			written += 1;
		}
		for _ in written..2 {
			sink.put_u8(codes::NULL);
		}
	}
}
