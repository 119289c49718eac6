use amqpcodec::amqp::{Data, DecodeOptions, Registry, RenderOptions, Result};

use crate::cmd::util::{InputArgs, ValueJson, emit_json, read_input, value_json};

#[derive(clap::Args)]
pub struct Args {
	#[command(flatten)]
	pub input: InputArgs,
	/// Accept composites whose declared size exceeds their children
	#[arg(long)]
	pub lenient: bool,
	/// Shorten strings and collections in the rendering
	#[arg(long)]
	pub compact: bool,
	#[arg(long)]
	pub json: bool,
}

/// Decode the first value of the input and print it.
pub fn run(args: Args) -> Result<()> {
	let Args {
		input,
		lenient,
		compact,
		json,
	} = args;

	let bytes = read_input(input)?;
	let options = if lenient { DecodeOptions::lenient() } else { DecodeOptions::default() };
	let render = if compact { RenderOptions::compact() } else { RenderOptions::default() };
	let registry = Registry::amqp();

	let mut data = Data::new();
	let consumed = data.decode_with(&bytes, &options)?;
	tracing::debug!(consumed, input_len = bytes.len(), nodes = data.node_count(), "decoded value");
	let value = data.value()?;
	let rendered = data.render_with(render, Some(&registry));

	if json {
		let payload = DecodeJson {
			input_len: bytes.len(),
			consumed,
			kind: value.kind().as_str(),
			render: rendered,
			value: value_json(&value, &registry),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("input_len: {}", bytes.len());
	println!("consumed: {consumed}");
	println!("kind: {}", value.kind());
	println!("value: {rendered}");
	Ok(())
}

#[derive(serde::Serialize)]
struct DecodeJson {
	input_len: usize,
	consumed: usize,
	kind: &'static str,
	render: String,
	value: ValueJson,
}
