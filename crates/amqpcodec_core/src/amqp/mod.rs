mod array;
mod bytes;
mod composite;
mod data;
mod decode;
mod error;
mod kind;
mod node;
mod registry;
mod render;
mod sink;
mod value;

/// Bounded big-endian byte source.
pub use bytes::Cursor;
/// Cursor-based tree builder and navigator.
pub use data::Data;
/// Dispatch-table decoder entry points and options.
pub use decode::{Constructor, DecodeOptions, Layout, constructor, constructors, decode_value};
/// Error and result aliases.
pub use error::{CodecError, Result};
/// Type kinds, width classes and format codes.
pub use kind::{Kind, WidthClass, codes};
/// Read-only node view.
pub use node::NodeRef;
/// Described-type definitions and lookup.
pub use registry::{AMQP_DEFINITIONS, BodyShape, DescribedDef, DescribedValue, KnownDescribed, Registry};
/// Diagnostic rendering options.
pub use render::RenderOptions;
/// Byte sink contract and a bounded implementation.
pub use sink::{ByteSink, FixedSink};
/// Owned value model.
pub use value::{ArrayValue, Described, Value};
