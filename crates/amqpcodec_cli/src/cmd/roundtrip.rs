use amqpcodec::amqp::{CodecError, Data, Result};

use crate::cmd::util::{InputArgs, emit_json, hex, read_input};

#[derive(clap::Args)]
pub struct Args {
	#[command(flatten)]
	pub input: InputArgs,
	#[arg(long)]
	pub json: bool,
}

/// Decode the input, re-encode it and fail when the bytes differ.
pub fn run(args: Args) -> Result<()> {
	let Args { input, json } = args;

	let bytes = read_input(input)?;
	let mut data = Data::new();
	let consumed = data.decode(&bytes)?;
	let input = &bytes[..consumed];
	let output = data.encode_to_vec();
	let matches = output == input;
	tracing::debug!(consumed, output_len = output.len(), matches, "re-encoded value");

	if json {
		emit_json(&RoundTripJson {
			input_len: input.len(),
			output_len: output.len(),
			trailing: bytes.len() - consumed,
			matches,
			input: hex(input),
			output: hex(&output),
		});
	} else {
		println!("input:  {} ({} bytes)", hex(input), input.len());
		println!("output: {} ({} bytes)", hex(&output), output.len());
		if consumed < bytes.len() {
			println!("trailing: {} bytes ignored", bytes.len() - consumed);
		}
		println!("matches: {matches}");
	}

	if !matches {
		return Err(CodecError::RoundTripMismatch {
			input_len: input.len(),
			output_len: output.len(),
		});
	}
	Ok(())
}

#[derive(serde::Serialize)]
struct RoundTripJson {
	input_len: usize,
	output_len: usize,
	trailing: usize,
	matches: bool,
	input: String,
	output: String,
}
