use std::collections::HashMap;

use crate::amqp::{Described, Result, Value};

/// Shape of the value a described type wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
	/// List whose positions carry these field names.
	List(&'static [&'static str]),
	/// Map of annotations or properties.
	Map,
	/// Opaque binary.
	Binary,
	/// Any single value.
	Any,
}

/// Definition of one described type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescribedDef {
	/// Short name, such as `attach`.
	pub name: &'static str,
	/// Numeric descriptor (domain id in the high 32 bits).
	pub code: u64,
	/// Symbolic descriptor, such as `amqp:attach:list`.
	pub symbol: &'static str,
	/// Shape of the described value.
	pub body: BodyShape,
}

impl DescribedDef {
	/// Field names when the body is a list.
	pub fn fields(&self) -> &'static [&'static str] {
		match self.body {
			BodyShape::List(fields) => fields,
			_ => &[],
		}
	}
}

const fn def(name: &'static str, code: u64, symbol: &'static str, body: BodyShape) -> DescribedDef {
	DescribedDef { name, code, symbol, body }
}

const OPEN: &[&str] = &[
	"container-id",
	"hostname",
	"max-frame-size",
	"channel-max",
	"idle-time-out",
	"outgoing-locales",
	"incoming-locales",
	"offered-capabilities",
	"desired-capabilities",
	"properties",
];
const BEGIN: &[&str] = &[
	"remote-channel",
	"next-outgoing-id",
	"incoming-window",
	"outgoing-window",
	"handle-max",
	"offered-capabilities",
	"desired-capabilities",
	"properties",
];
const ATTACH: &[&str] = &[
	"name",
	"handle",
	"role",
	"snd-settle-mode",
	"rcv-settle-mode",
	"source",
	"target",
	"unsettled",
	"incomplete-unsettled",
	"initial-delivery-count",
	"max-message-size",
	"offered-capabilities",
	"desired-capabilities",
	"properties",
];
const FLOW: &[&str] = &[
	"next-incoming-id",
	"incoming-window",
	"next-outgoing-id",
	"outgoing-window",
	"handle",
	"delivery-count",
	"link-credit",
	"available",
	"drain",
	"echo",
	"properties",
];
const TRANSFER: &[&str] = &[
	"handle",
	"delivery-id",
	"delivery-tag",
	"message-format",
	"settled",
	"more",
	"rcv-settle-mode",
	"state",
	"resume",
	"aborted",
	"batchable",
];
const DISPOSITION: &[&str] = &["role", "first", "last", "settled", "state", "batchable"];
const DETACH: &[&str] = &["handle", "closed", "error"];
const ERROR_ONLY: &[&str] = &["error"];
const ERROR: &[&str] = &["condition", "description", "info"];
const RECEIVED: &[&str] = &["section-number", "section-offset"];
const MODIFIED: &[&str] = &["delivery-failed", "undeliverable-here", "message-annotations"];
const SOURCE: &[&str] = &[
	"address",
	"durable",
	"expiry-policy",
	"timeout",
	"dynamic",
	"dynamic-node-properties",
	"distribution-mode",
	"filter",
	"default-outcome",
	"outcomes",
	"capabilities",
];
const TARGET: &[&str] = &["address", "durable", "expiry-policy", "timeout", "dynamic", "dynamic-node-properties", "capabilities"];
const CAPABILITIES: &[&str] = &["capabilities"];
const DECLARE: &[&str] = &["global-id"];
const DISCHARGE: &[&str] = &["txn-id", "fail"];
const DECLARED: &[&str] = &["txn-id"];
const TRANSACTIONAL_STATE: &[&str] = &["txn-id", "outcome"];
const SASL_MECHANISMS: &[&str] = &["sasl-server-mechanisms"];
const SASL_INIT: &[&str] = &["mechanism", "initial-response", "hostname"];
const SASL_CHALLENGE: &[&str] = &["challenge"];
const SASL_RESPONSE: &[&str] = &["response"];
const SASL_OUTCOME: &[&str] = &["code", "additional-data"];
const HEADER: &[&str] = &["durable", "priority", "ttl", "first-acquirer", "delivery-count"];
const PROPERTIES: &[&str] = &[
	"message-id",
	"user-id",
	"to",
	"subject",
	"reply-to",
	"correlation-id",
	"content-type",
	"content-encoding",
	"absolute-expiry-time",
	"creation-time",
	"group-id",
	"group-sequence",
	"reply-to-group-id",
];

/// Every described type defined by the AMQP 1.0 core specification.
pub const AMQP_DEFINITIONS: &[DescribedDef] = &[
	def("error", 0x1d, "amqp:error:list", BodyShape::List(ERROR)),
	def("received", 0x23, "amqp:received:list", BodyShape::List(RECEIVED)),
	def("accepted", 0x24, "amqp:accepted:list", BodyShape::List(&[])),
	def("rejected", 0x25, "amqp:rejected:list", BodyShape::List(ERROR_ONLY)),
	def("released", 0x26, "amqp:released:list", BodyShape::List(&[])),
	def("modified", 0x27, "amqp:modified:list", BodyShape::List(MODIFIED)),
	def("source", 0x28, "amqp:source:list", BodyShape::List(SOURCE)),
	def("target", 0x29, "amqp:target:list", BodyShape::List(TARGET)),
	def("delete-on-close", 0x2b, "amqp:delete-on-close:list", BodyShape::List(&[])),
	def("delete-on-no-links", 0x2c, "amqp:delete-on-no-links:list", BodyShape::List(&[])),
	def("delete-on-no-messages", 0x2d, "amqp:delete-on-no-messages:list", BodyShape::List(&[])),
	def("delete-on-no-links-or-messages", 0x2e, "amqp:delete-on-no-links-or-messages:list", BodyShape::List(&[])),
	def("open", 0x10, "amqp:open:list", BodyShape::List(OPEN)),
	def("begin", 0x11, "amqp:begin:list", BodyShape::List(BEGIN)),
	def("attach", 0x12, "amqp:attach:list", BodyShape::List(ATTACH)),
	def("flow", 0x13, "amqp:flow:list", BodyShape::List(FLOW)),
	def("transfer", 0x14, "amqp:transfer:list", BodyShape::List(TRANSFER)),
	def("disposition", 0x15, "amqp:disposition:list", BodyShape::List(DISPOSITION)),
	def("detach", 0x16, "amqp:detach:list", BodyShape::List(DETACH)),
	def("end", 0x17, "amqp:end:list", BodyShape::List(ERROR_ONLY)),
	def("close", 0x18, "amqp:close:list", BodyShape::List(ERROR_ONLY)),
	def("coordinator", 0x30, "amqp:coordinator:list", BodyShape::List(CAPABILITIES)),
	def("declare", 0x31, "amqp:declare:list", BodyShape::List(DECLARE)),
	def("discharge", 0x32, "amqp:discharge:list", BodyShape::List(DISCHARGE)),
	def("declared", 0x33, "amqp:declared:list", BodyShape::List(DECLARED)),
	def("transactional-state", 0x34, "amqp:transactional-state:list", BodyShape::List(TRANSACTIONAL_STATE)),
	def("sasl-mechanisms", 0x40, "amqp:sasl-mechanisms:list", BodyShape::List(SASL_MECHANISMS)),
	def("sasl-init", 0x41, "amqp:sasl-init:list", BodyShape::List(SASL_INIT)),
	def("sasl-challenge", 0x42, "amqp:sasl-challenge:list", BodyShape::List(SASL_CHALLENGE)),
	def("sasl-response", 0x43, "amqp:sasl-response:list", BodyShape::List(SASL_RESPONSE)),
	def("sasl-outcome", 0x44, "amqp:sasl-outcome:list", BodyShape::List(SASL_OUTCOME)),
	def("header", 0x70, "amqp:header:list", BodyShape::List(HEADER)),
	def("delivery-annotations", 0x71, "amqp:delivery-annotations:map", BodyShape::Map),
	def("message-annotations", 0x72, "amqp:message-annotations:map", BodyShape::Map),
	def("properties", 0x73, "amqp:properties:list", BodyShape::List(PROPERTIES)),
	def("application-properties", 0x74, "amqp:application-properties:map", BodyShape::Map),
	def("data", 0x75, "amqp:data:binary", BodyShape::Binary),
	def("amqp-sequence", 0x76, "amqp:amqp-sequence:list", BodyShape::Any),
	def("amqp-value", 0x77, "amqp:amqp-value:*", BodyShape::Any),
	def("footer", 0x78, "amqp:footer:map", BodyShape::Map),
];

/// Descriptor to described-type lookup.
#[derive(Debug, Clone, Default)]
pub struct Registry {
	defs: Vec<DescribedDef>,
	by_code: HashMap<u64, usize>,
	by_symbol: HashMap<&'static str, usize>,
	by_name: HashMap<&'static str, usize>,
}

impl Registry {
	/// Registry without any definitions; every lookup misses.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Registry preloaded with [`AMQP_DEFINITIONS`].
	pub fn amqp() -> Self {
		let mut registry = Self::empty();
		for item in AMQP_DEFINITIONS {
			registry.register(*item);
		}
		registry
	}

	/// Add or replace a definition; the code, symbol and name all index it.
	///
	/// Every existing definition sharing the code, symbol or name is evicted. The new
	/// definition takes the earliest evicted slot.
	pub fn register(&mut self, item: DescribedDef) {
		let mut clashes: Vec<usize> = [
			self.by_code.get(&item.code),
			self.by_symbol.get(item.symbol),
			self.by_name.get(item.name),
		]
		.into_iter()
		.flatten()
		.copied()
		.collect();
		clashes.sort_unstable();
		clashes.dedup();

		let Some((&slot, evicted)) = clashes.split_first() else {
			let idx = self.defs.len();
			self.defs.push(item);
			self.index(idx);
			return;
		};
		self.defs[slot] = item;
		for &idx in evicted.iter().rev() {
			let old = self.defs.remove(idx);
			tracing::debug!(name = old.name, code = old.code, "evicted clashing definition");
		}
		self.reindex();
	}

	fn index(&mut self, idx: usize) {
		let item = self.defs[idx];
		self.by_code.insert(item.code, idx);
		self.by_symbol.insert(item.symbol, idx);
		self.by_name.insert(item.name, idx);
	}

	fn reindex(&mut self) {
		self.by_code.clear();
		self.by_symbol.clear();
		self.by_name.clear();
		for idx in 0..self.defs.len() {
			self.index(idx);
		}
	}

	/// Number of definitions.
	pub fn len(&self) -> usize {
		self.defs.len()
	}

	/// Return `true` when no definitions are registered.
	pub fn is_empty(&self) -> bool {
		self.defs.is_empty()
	}

	/// Iterate definitions in registration order.
	pub fn iter(&self) -> impl Iterator<Item = &DescribedDef> {
		self.defs.iter()
	}

	/// Find the definition for a ulong or symbol descriptor.
	pub fn lookup(&self, descriptor: &Value) -> Option<&DescribedDef> {
		let idx = match descriptor {
			Value::ULong(code) => self.by_code.get(code),
			Value::Symbol(symbol) => self.by_symbol.get(symbol.as_str()),
			_ => None,
		}?;
		self.defs.get(*idx)
	}

	/// Find a definition by numeric code.
	pub fn by_code(&self, code: u64) -> Option<&DescribedDef> {
		self.by_code.get(&code).and_then(|idx| self.defs.get(*idx))
	}

	/// Find a definition by short name or symbol.
	pub fn by_name(&self, name: &str) -> Option<&DescribedDef> {
		self.by_name
			.get(name)
			.or_else(|| self.by_symbol.get(name))
			.and_then(|idx| self.defs.get(*idx))
	}

	/// Attach a definition to a described value when its descriptor is known.
	///
	/// A miss is not an error: the value comes back unchanged as [`DescribedValue::Unknown`].
	pub fn construct(&self, described: Described) -> DescribedValue {
		match self.lookup(&described.descriptor) {
			Some(def) => DescribedValue::Known(KnownDescribed { def: *def, described }),
			None => {
				tracing::debug!(descriptor = ?described.descriptor, "unknown described type");
				DescribedValue::Unknown(described)
			}
		}
	}
}

/// Described value with its registry definition.
#[derive(Debug, Clone, PartialEq)]
pub struct KnownDescribed {
	def: DescribedDef,
	described: Described,
}

impl KnownDescribed {
	/// Matching definition.
	pub fn def(&self) -> &DescribedDef {
		&self.def
	}

	/// Short type name.
	pub fn name(&self) -> &'static str {
		self.def.name
	}

	/// Descriptor exactly as decoded.
	pub fn descriptor(&self) -> &Value {
		&self.described.descriptor
	}

	/// Described value exactly as decoded.
	pub fn body(&self) -> &Value {
		&self.described.value
	}

	/// Field by name for list-shaped types; `None` when the field is unknown or not present.
	pub fn field(&self, name: &str) -> Option<&Value> {
		let idx = self.def.fields().iter().position(|field| *field == name)?;
		self.described.value.as_list()?.get(idx)
	}

	/// Present list fields paired with their names; extra positions are named `#<index>`.
	pub fn fields(&self) -> Vec<(String, &Value)> {
		let names = self.def.fields();
		self.described
			.value
			.as_list()
			.unwrap_or_default()
			.iter()
			.enumerate()
			.map(|(idx, value)| {
				let name = names.get(idx).map_or_else(|| format!("#{idx}"), |name| (*name).to_owned());
				(name, value)
			})
			.collect()
	}

	/// Give back the plain described value.
	pub fn into_described(self) -> Described {
		self.described
	}
}

/// Result of a registry lookup on a described value.
#[derive(Debug, Clone, PartialEq)]
pub enum DescribedValue {
	/// Descriptor matched a registered definition.
	Known(KnownDescribed),
	/// Descriptor unknown; descriptor and value are kept as-is.
	Unknown(Described),
}

impl DescribedValue {
	/// Short type name when known.
	pub fn name(&self) -> Option<&'static str> {
		match self {
			Self::Known(known) => Some(known.name()),
			Self::Unknown(_) => None,
		}
	}

	/// Underlying descriptor and value.
	pub fn described(&self) -> &Described {
		match self {
			Self::Known(known) => &known.described,
			Self::Unknown(described) => described,
		}
	}

	/// Re-encode the descriptor and value.
	pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
		let described = self.described();
		Value::described(described.descriptor.clone(), described.value.clone()).encode_to_vec()
	}
}
