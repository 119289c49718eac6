use std::fmt::Write as _;
use std::path::PathBuf;

use amqpcodec::amqp::{BodyShape, CodecError, Registry, Result, Value};

/// Where the encoded bytes come from.
#[derive(clap::Args)]
pub struct InputArgs {
	/// Hex-encoded bytes; whitespace is ignored and `#` starts a comment
	pub hex: Option<String>,
	/// Read hex text from a file instead
	#[arg(long, conflicts_with = "hex")]
	pub file: Option<PathBuf>,
	/// Treat `--file` contents as raw bytes rather than hex text
	#[arg(long, requires = "file")]
	pub raw: bool,
}

/// Resolve input bytes from an argument, a file or stdin.
pub(crate) fn read_input(input: InputArgs) -> Result<Vec<u8>> {
	let InputArgs { hex, file, raw } = input;
	match (hex, file) {
		(Some(hex), _) => parse_hex(&hex),
		(None, Some(path)) if raw => Ok(std::fs::read(path)?),
		(None, Some(path)) => parse_hex(&std::fs::read_to_string(path)?),
		(None, None) => parse_hex(&std::io::read_to_string(std::io::stdin())?),
	}
}

/// Parse hex text, skipping whitespace and `#` comments.
pub(crate) fn parse_hex(text: &str) -> Result<Vec<u8>> {
	let digits: Vec<u8> = text
		.lines()
		.map(|line| line.split_once('#').map_or(line, |(data, _)| data))
		.flat_map(str::bytes)
		.filter(|byte| !byte.is_ascii_whitespace())
		.collect();
	let invalid = || CodecError::InvalidHex { input: text.trim().to_owned() };
	if digits.len() % 2 != 0 || !digits.iter().all(u8::is_ascii_hexdigit) {
		return Err(invalid());
	}
	digits
		.chunks(2)
		.map(|pair| std::str::from_utf8(pair).ok().and_then(|pair| u8::from_str_radix(pair, 16).ok()).ok_or_else(invalid))
		.collect()
}

pub(crate) fn hex(bytes: &[u8]) -> String {
	bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, byte| {
		let _ = write!(out, "{byte:02x}");
		out
	})
}

pub(crate) fn code_hex(code: u64) -> String {
	format!("0x{code:016x}")
}

pub(crate) fn body_name(body: BodyShape) -> &'static str {
	match body {
		BodyShape::List(_) => "list",
		BodyShape::Map => "map",
		BodyShape::Binary => "binary",
		BodyShape::Any => "any",
	}
}

pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) {
	match serde_json::to_string_pretty(payload) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: json encode failed: {err}"),
	}
}

/// Typed JSON view of a decoded value.
#[derive(serde::Serialize)]
pub(crate) struct ValueJson {
	#[serde(rename = "type")]
	kind: &'static str,
	#[serde(skip_serializing_if = "Option::is_none")]
	value: Option<serde_json::Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	element: Option<&'static str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	name: Option<&'static str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	descriptor: Option<Box<ValueJson>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	body: Option<Box<ValueJson>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	items: Option<Vec<ValueJson>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	entries: Option<Vec<EntryJson>>,
}

#[derive(serde::Serialize)]
pub(crate) struct EntryJson {
	key: ValueJson,
	value: ValueJson,
}

impl ValueJson {
	fn scalar(value: &Value, json: Option<serde_json::Value>) -> Self {
		Self {
			kind: value.kind().as_str(),
			value: json,
			element: None,
			name: None,
			descriptor: None,
			body: None,
			items: None,
			entries: None,
		}
	}
}

pub(crate) fn value_json(value: &Value, registry: &Registry) -> ValueJson {
	use serde_json::Value as Json;

	let text = |text: String| Some(Json::String(text));
	match value {
		Value::Null => ValueJson::scalar(value, None),
		Value::Bool(v) => ValueJson::scalar(value, Some(Json::from(*v))),
		Value::UByte(v) => ValueJson::scalar(value, Some(Json::from(*v))),
		Value::UShort(v) => ValueJson::scalar(value, Some(Json::from(*v))),
		Value::UInt(v) => ValueJson::scalar(value, Some(Json::from(*v))),
		Value::ULong(v) => ValueJson::scalar(value, Some(Json::from(*v))),
		Value::Byte(v) => ValueJson::scalar(value, Some(Json::from(*v))),
		Value::Short(v) => ValueJson::scalar(value, Some(Json::from(*v))),
		Value::Int(v) => ValueJson::scalar(value, Some(Json::from(*v))),
		Value::Long(v) | Value::Timestamp(v) => ValueJson::scalar(value, Some(Json::from(*v))),
		Value::Float(v) => ValueJson::scalar(value, Some(Json::from(*v))),
		Value::Double(v) => ValueJson::scalar(value, Some(Json::from(*v))),
		Value::Decimal32(bits) => ValueJson::scalar(value, text(format!("0x{bits:08x}"))),
		Value::Decimal64(bits) => ValueJson::scalar(value, text(format!("0x{bits:016x}"))),
		Value::Decimal128(bytes) | Value::Uuid(bytes) => ValueJson::scalar(value, text(hex(bytes))),
		Value::Char(c) => ValueJson::scalar(value, text(c.to_string())),
		Value::Binary(bytes) => ValueJson::scalar(value, text(hex(bytes))),
		Value::String(s) | Value::Symbol(s) => ValueJson::scalar(value, text(s.clone())),
		Value::List(items) => ValueJson {
			items: Some(items.iter().map(|item| value_json(item, registry)).collect()),
			..ValueJson::scalar(value, None)
		},
		Value::Map(entries) => ValueJson {
			entries: Some(
				entries
					.iter()
					.map(|(key, value)| EntryJson {
						key: value_json(key, registry),
						value: value_json(value, registry),
					})
					.collect(),
			),
			..ValueJson::scalar(value, None)
		},
		Value::Array(array) => ValueJson {
			element: Some(array.element.as_str()),
			descriptor: array.descriptor.as_deref().map(|descriptor| Box::new(value_json(descriptor, registry))),
			items: Some(array.items.iter().map(|item| value_json(item, registry)).collect()),
			..ValueJson::scalar(value, None)
		},
		Value::Described(described) => ValueJson {
			name: registry.lookup(&described.descriptor).map(|def| def.name),
			descriptor: Some(Box::new(value_json(&described.descriptor, registry))),
			body: Some(Box::new(value_json(&described.value, registry))),
			..ValueJson::scalar(value, None)
		},
	}
}
