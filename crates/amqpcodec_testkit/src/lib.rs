//! Shared test helpers for workspace crates.

use std::path::{Path, PathBuf};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Parse hex text into bytes.
///
/// Whitespace is ignored and `#` starts a comment that runs to the end of the line.
/// Panics on malformed input.
pub fn parse_hex(text: &str) -> Vec<u8> {
	let digits: Vec<u8> = text
		.lines()
		.map(|line| line.split_once('#').map_or(line, |(data, _)| data))
		.flat_map(|line| line.bytes().filter(|byte| !byte.is_ascii_whitespace()))
		.collect();
	assert!(digits.len() % 2 == 0, "odd number of hex digits");
	digits
		.chunks(2)
		.map(|pair| {
			let pair = std::str::from_utf8(pair).expect("hex digits are ascii");
			u8::from_str_radix(pair, 16).unwrap_or_else(|_| panic!("invalid hex byte {pair:?}"))
		})
		.collect()
}

/// Read and parse a `.hex` fixture under `<workspace>/fixtures`.
pub fn read_hex_fixture(name: &str) -> Vec<u8> {
	let path = fixture_path(name);
	let text = std::fs::read_to_string(&path).unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
	parse_hex(&text)
}

/// Parse command stdout as JSON.
pub fn stdout_json(stdout: &[u8]) -> serde_json::Value {
	serde_json::from_slice(stdout).expect("stdout should be valid json")
}

#[cfg(test)]
mod tests {
	use super::parse_hex;

	#[test]
	fn parse_hex_skips_comments_and_whitespace() {
		assert_eq!(parse_hex("00 53\n# comment 99\n10 c0  # trailing\n45"), [0x00, 0x53, 0x10, 0xc0, 0x45]);
		assert!(parse_hex("  \n# only a comment\n").is_empty());
	}
}
