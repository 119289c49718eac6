#![allow(missing_docs)]

use std::process::{Command, Output};

use amqpcodec_testkit::{fixture_path, stdout_json};
use serde_json::Value;

fn run(args: &[&str]) -> Output {
	Command::new(env!("CARGO_BIN_EXE_amqpcodec")).args(args).output().expect("command executes")
}

fn run_json(args: &[&str]) -> Value {
	let output = run(args);
	assert!(
		output.status.success(),
		"amqpcodec failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	stdout_json(&output.stdout)
}

#[test]
fn decode_json_reports_named_described_value() {
	let path = fixture_path("open.hex");
	let json = run_json(&["decode", "--file", &path.display().to_string(), "--json"]);

	assert_eq!(json["input_len"], 18);
	assert_eq!(json["consumed"], 18);
	assert_eq!(json["kind"], "described");
	assert_eq!(json["value"]["name"], "open");
	assert_eq!(json["value"]["body"]["items"][0]["value"], "test");
	assert!(json["render"].as_str().is_some_and(|text| text.starts_with("@open(16) [container-id=\"test\"")));
}

#[test]
fn decode_accepts_inline_hex() {
	let json = run_json(&["decode", "e0 04 02 52 00 05", "--json"]);
	assert_eq!(json["value"]["type"], "array");
	assert_eq!(json["value"]["element"], "uint");
	assert_eq!(json["value"]["items"][1]["value"], 5);
}

#[test]
fn roundtrip_json_matches_canonical_fixture() {
	let path = fixture_path("attach.hex");
	let json = run_json(&["roundtrip", "--file", &path.display().to_string(), "--json"]);
	assert_eq!(json["matches"], true);
	assert_eq!(json["input_len"], json["output_len"]);
}

#[test]
fn roundtrip_fails_on_noncanonical_input() {
	let path = fixture_path("noncanonical_int.hex");
	let output = run(&["roundtrip", "--file", &path.display().to_string()]);
	assert!(!output.status.success());
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("error: round trip mismatch: input 5 bytes, output 2 bytes"), "stderr: {stderr}");
}

#[test]
fn codes_json_lists_dispatch_table() {
	let json = run_json(&["codes", "--json"]);
	let codes = json["codes"].as_array().expect("codes array");
	assert_eq!(codes.len(), 40);
	assert_eq!(codes[0]["code"], "0x00");
	assert_eq!(codes[0]["in_array"], false);
	assert!(codes.iter().any(|code| code["name"] == "smalluint" && code["layout"] == "fixed(1)"));
}

#[test]
fn describe_json_by_symbol() {
	let json = run_json(&["describe", "amqp:transfer:list", "--json"]);
	assert_eq!(json["name"], "transfer");
	assert_eq!(json["code"], "0x0000000000000014");
	assert_eq!(json["body"], "list");
	assert_eq!(json["fields"][0], "handle");
}

#[test]
fn malformed_input_exits_with_error() {
	let output = run(&["decode", "c0 05 01 40"]);
	assert!(!output.status.success());
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("error:"), "stderr: {stderr}");
}
