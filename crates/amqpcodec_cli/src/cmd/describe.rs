use amqpcodec::amqp::{CodecError, DescribedDef, Registry, Result};

use crate::cmd::util::{body_name, code_hex, emit_json};

#[derive(clap::Args)]
pub struct Args {
	/// Numeric code (`0x12`, `18`), short name (`attach`) or symbol (`amqp:attach:list`)
	pub descriptor: String,
	#[arg(long)]
	pub json: bool,
}

/// Print the registry entry for one described type.
pub fn run(args: Args) -> Result<()> {
	let Args { descriptor, json } = args;
	let registry = Registry::amqp();
	let def = *lookup(&registry, &descriptor)?;

	if json {
		emit_json(&DescribeJson {
			name: def.name,
			code: code_hex(def.code),
			symbol: def.symbol,
			body: body_name(def.body),
			fields: def.fields().to_vec(),
		});
		return Ok(());
	}

	println!("name: {}", def.name);
	println!("code: {}", code_hex(def.code));
	println!("symbol: {}", def.symbol);
	println!("body: {}", body_name(def.body));
	if !def.fields().is_empty() {
		println!("fields:");
		for (idx, field) in def.fields().iter().enumerate() {
			println!("{idx}\t{field}");
		}
	}
	Ok(())
}

pub(crate) fn lookup<'r>(registry: &'r Registry, input: &str) -> Result<&'r DescribedDef> {
	let invalid = || CodecError::InvalidDescriptor { input: input.to_owned() };
	let code = if let Some(hex) = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
		Some(u64::from_str_radix(hex, 16).map_err(|_| invalid())?)
	} else if !input.is_empty() && input.bytes().all(|byte| byte.is_ascii_digit()) {
		Some(input.parse::<u64>().map_err(|_| invalid())?)
	} else {
		None
	};
	let def = match code {
		Some(code) => registry.by_code(code),
		None => registry.by_name(input),
	};
	def.ok_or_else(invalid)
}

#[derive(serde::Serialize)]
struct DescribeJson {
	name: &'static str,
	code: String,
	symbol: &'static str,
	body: &'static str,
	fields: Vec<&'static str>,
}
