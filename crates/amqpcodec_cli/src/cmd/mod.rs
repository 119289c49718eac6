/// Format-code table listing.
pub mod codes;
/// Single value decode command.
pub mod decode;
/// Described-type registry lookup.
pub mod describe;
/// Decode/re-encode comparison command.
pub mod roundtrip;
/// Shared input parsing and JSON helpers.
pub mod util;
