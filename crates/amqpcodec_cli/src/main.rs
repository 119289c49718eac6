#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};

mod cmd;

#[derive(Parser)]
#[command(name = "amqpcodec", version, about = "AMQP 1.0 wire inspection tools")]
struct Cli {
	#[command(flatten)]
	verbosity: Verbosity<WarnLevel>,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Decode one encoded value and print it
	Decode(cmd::decode::Args),
	/// Decode, re-encode and compare against the input bytes
	Roundtrip(cmd::roundtrip::Args),
	/// List every format code the decoder understands
	Codes(cmd::codes::Args),
	/// Look up a described type by code, name or symbol
	Describe(cmd::describe::Args),
}

fn main() {
	let cli = Cli::parse();
	tracing_subscriber::fmt().with_writer(std::io::stderr).with_max_level(cli.verbosity).init();

	if let Err(err) = run(cli.command) {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run(command: Commands) -> amqpcodec::amqp::Result<()> {
	match command {
		Commands::Decode(args) => cmd::decode::run(args),
		Commands::Roundtrip(args) => cmd::roundtrip::run(args),
		Commands::Codes(args) => cmd::codes::run(args),
		Commands::Describe(args) => cmd::describe::run(args),
	}
}
