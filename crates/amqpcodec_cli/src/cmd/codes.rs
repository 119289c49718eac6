use amqpcodec::amqp::{Constructor, Layout, Result, constructors};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	#[arg(long)]
	pub json: bool,
}

/// Print the format-code dispatch table.
pub fn run(args: Args) -> Result<()> {
	if args.json {
		let payload = CodesJson {
			codes: constructors().map(code_json).collect(),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("code\tname\tkind\tlayout\tin_array");
	for ctor in constructors() {
		println!(
			"0x{:02x}\t{}\t{}\t{}\t{}",
			ctor.code,
			ctor.name,
			ctor.kind,
			layout_name(ctor.layout),
			ctor.valid_in_array()
		);
	}
	Ok(())
}

fn layout_name(layout: Layout) -> String {
	match layout {
		Layout::Fixed(width) => format!("fixed({width})"),
		Layout::Variable8 => "variable8".to_owned(),
		Layout::Variable32 => "variable32".to_owned(),
		Layout::Compound8 => "compound8".to_owned(),
		Layout::Compound32 => "compound32".to_owned(),
		Layout::Described => "described".to_owned(),
	}
}

fn code_json(ctor: &Constructor) -> CodeJson {
	CodeJson {
		code: format!("0x{:02x}", ctor.code),
		name: ctor.name,
		kind: ctor.kind.as_str(),
		layout: layout_name(ctor.layout),
		in_array: ctor.valid_in_array(),
	}
}

#[derive(serde::Serialize)]
struct CodesJson {
	codes: Vec<CodeJson>,
}

#[derive(serde::Serialize)]
struct CodeJson {
	code: String,
	name: &'static str,
	kind: &'static str,
	layout: String,
	in_array: bool,
}
