use crate::amqp::{CodecError, Data, DecodeOptions, Kind, Layout, Value, codes, constructor, constructors, decode_value};

fn roundtrip(bytes: &[u8]) -> Data {
	let mut data = Data::new();
	let consumed = data.decode(bytes).expect("decode succeeds");
	assert_eq!(consumed, bytes.len());
	assert_eq!(data.encode_to_vec(), bytes, "re-encoding reproduces input");
	data
}

#[test]
fn dispatch_table_covers_every_amqp_code() {
	assert_eq!(constructors().count(), 40);
	assert!(constructor(0x01).is_none());
	assert!(constructor(0xff).is_none());

	let smalluint = constructor(codes::SMALL_UINT).expect("smalluint slot");
	assert_eq!(smalluint.kind, Kind::UInt);
	assert_eq!(smalluint.layout, Layout::Fixed(1));
	assert_eq!(constructor(codes::LIST32).expect("list32 slot").layout, Layout::Compound32);
	assert!(!constructor(codes::DESCRIBED).expect("described slot").valid_in_array());

	let codes: Vec<u8> = constructors().map(|ctor| ctor.code).collect();
	let mut sorted = codes.clone();
	sorted.sort_unstable();
	assert_eq!(codes, sorted);
}

#[test]
fn unknown_format_code_is_fatal() {
	let err = Data::new().decode(&[0x01]).expect_err("0x01 is unassigned");
	assert!(matches!(err, CodecError::UnknownFormatCode { code: 0x01, at: 0 }));

	let err = Data::new().decode(&[0xc0, 0x02, 0x01, 0x02]).expect_err("nested unknown code");
	assert!(matches!(err, CodecError::UnknownFormatCode { code: 0x02, at: 3 }));
}

#[test]
fn scalars_roundtrip_at_width_boundaries() {
	roundtrip(&[0x54, 0x80]);
	roundtrip(&[0x54, 0x7f]);
	roundtrip(&[0x71, 0x00, 0x00, 0x00, 0x80]);
	roundtrip(&[0x71, 0xff, 0xff, 0xff, 0x7f]);
	roundtrip(&[0x43]);
	roundtrip(&[0x52, 0xff]);
	roundtrip(&[0x70, 0x00, 0x00, 0x01, 0x00]);
	roundtrip(&[0x44]);
	roundtrip(&[0x53, 0x01]);
	roundtrip(&[0x41]);
	roundtrip(&[0x42]);
	roundtrip(&[0x73, 0x00, 0x01, 0xf6, 0x00]);
	roundtrip(&[0xa3, 0x03, b'a', b'b', b'c']);
}

#[test]
fn decode_reports_consumed_prefix() {
	let mut data = Data::new();
	assert_eq!(data.decode(&[0x54, 0x01, 0xff, 0xff]).expect("decode"), 2);
	assert_eq!(data.value().expect("value"), Value::Int(1));
}

#[test]
fn non_canonical_input_reencodes_minimally() {
	let mut data = Data::new();
	data.decode(&[0x71, 0x00, 0x00, 0x00, 0x05]).expect("decode");
	assert_eq!(data.encode_to_vec(), [0x54, 0x05]);

	data.decode(&[0x56, 0x01]).expect("decode");
	assert_eq!(data.encode_to_vec(), [0x41]);
}

#[test]
fn declared_length_past_end_is_fatal() {
	let err = Data::new().decode(&[0xc0, 0x05, 0x01, 0x40]).expect_err("list overruns input");
	assert!(matches!(
		err,
		CodecError::DeclaredLengthExceeded {
			at: 1,
			declared: 5,
			available: 2
		}
	));

	let err = Data::new().decode(&[0xb1, 0x00, 0x00, 0x01, 0x00, b'x']).expect_err("str32 overruns input");
	assert!(matches!(err, CodecError::DeclaredLengthExceeded { declared: 256, available: 1, .. }));
}

#[test]
fn failed_decode_leaves_no_partial_tree() {
	let mut data = Data::new();
	data.put_int(7).expect("existing value");
	let err = data.decode(&[0xc0, 0x04, 0x02, 0x40, 0x56, 0x02]).expect_err("bad boolean");
	assert!(matches!(err, CodecError::InvalidBoolean { byte: 0x02, at: 5 }));
	assert!(data.is_empty());
	assert_eq!(data.node_count(), 0);
	assert_eq!(data.kind(), None);
}

#[test]
fn malformed_payloads_are_rejected() {
	let err = Data::new().decode(&[0xa1, 0x01, 0xff]).expect_err("invalid utf-8");
	assert!(matches!(err, CodecError::InvalidUtf8 { at: 2 }));

	let err = Data::new().decode(&[0x73, 0x00, 0x00, 0xd8, 0x00]).expect_err("surrogate char");
	assert!(matches!(err, CodecError::InvalidChar { value: 0xd800, at: 1 }));

	let err = Data::new().decode(&[]).expect_err("empty input");
	assert!(matches!(err, CodecError::UnexpectedEof { at: 0, need: 1, rem: 0 }));

	let err = Data::new().decode(&[0x70, 0x00]).expect_err("truncated uint");
	assert!(matches!(err, CodecError::UnexpectedEof { at: 1, need: 4, rem: 1 }));
}

#[test]
fn strict_sizes_reject_trailing_composite_bytes() {
	let bytes = [0xc0, 0x03, 0x01, 0x40, 0x40];
	let err = Data::new().decode(&bytes).expect_err("leftover byte");
	assert!(matches!(err, CodecError::LayoutMismatch { kind: Kind::List, leftover: 1 }));

	let mut data = Data::new();
	let consumed = data.decode_with(&bytes, &DecodeOptions::lenient()).expect("lenient decode");
	assert_eq!(consumed, 5);
	assert_eq!(data.value().expect("value"), Value::List(vec![Value::Null]));
}

#[test]
fn limits_bound_depth_and_count() {
	let nested = [0xc0, 0x05, 0x01, 0xc0, 0x02, 0x01, 0x40];
	let shallow = DecodeOptions {
		max_depth: 1,
		..DecodeOptions::default()
	};
	let err = Data::new().decode_with(&nested, &shallow).expect_err("too deep");
	assert!(matches!(err, CodecError::DecodeDepthExceeded { max_depth: 1 }));
	roundtrip(&nested);

	let few = DecodeOptions {
		max_count: 2,
		..DecodeOptions::default()
	};
	let err = Data::new().decode_with(&[0xc0, 0x04, 0x03, 0x40, 0x40, 0x40], &few).expect_err("too many");
	assert!(matches!(err, CodecError::CountTooLarge { count: 3, max: 2 }));
}

#[test]
fn arrays_decode_with_shared_constructor() {
	let data = roundtrip(&[0xe0, 0x04, 0x02, 0x52, 0x00, 0x05]);
	assert_eq!(data.root().expect("root").array_element(), Some(Kind::UInt));
	assert_eq!(data.value().expect("value"), {
		Value::Array(crate::amqp::ArrayValue {
			element: Kind::UInt,
			descriptor: None,
			items: vec![Value::UInt(0), Value::UInt(5)],
		})
	});

	roundtrip(&[0xe0, 0x02, 0x02, 0x43]);
	roundtrip(&[0xe0, 0x08, 0x02, 0xc0, 0x01, 0x00, 0x03, 0x01, 0x54, 0x01]);
	roundtrip(&[0xe0, 0x07, 0x01, 0xe0, 0x04, 0x02, 0x54, 0x01, 0x02]);
	roundtrip(&[0xe0, 0x02, 0x00, 0xa1]);
}

#[test]
fn described_array_roundtrips() {
	let data = roundtrip(&[0xe0, 0x0a, 0x02, 0x00, 0x53, 0x10, 0xa3, 0x01, b'a', 0x02, b'b', b'c']);
	let root = data.root().expect("root");
	assert!(root.is_described_array());
	assert_eq!(root.child_count(), 3);
}

#[test]
fn described_constructor_cannot_be_array_element() {
	let err = Data::new().decode(&[0xe0, 0x04, 0x01, 0x00, 0x40, 0x00]).expect_err("described element code");
	assert!(matches!(err, CodecError::InvalidArrayConstructor { code: 0x00, at: 5 }));
}

#[test]
fn decode_value_returns_owned_tree() {
	let bytes = [0x00, 0x53, 0x24, 0x45];
	let (value, consumed) = decode_value(&bytes, &DecodeOptions::default()).expect("decode");
	assert_eq!(consumed, 4);
	assert_eq!(value, Value::described(Value::ULong(0x24), Value::List(Vec::new())));
}

#[test]
fn decode_puts_at_cursor_inside_entered_composite() {
	let mut data = Data::new();
	data.put_list().expect("list");
	assert!(data.enter());
	data.decode(&[0x54, 0x01]).expect("first");
	data.decode(&[0xa1, 0x01, b'x']).expect("second");
	assert!(data.exit());
	assert_eq!(data.encode_to_vec(), [0xc0, 0x06, 0x02, 0x54, 0x01, 0xa1, 0x01, b'x']);
}

#[test]
fn zero_width_arrays_have_their_own_count_limit() {
	let nulls = [0xf0, 0x00, 0x00, 0x00, 0x05, 0x00, 0x0f, 0x42, 0x40, 0x40];
	let err = Data::new().decode(&nulls).expect_err("a million nulls from ten bytes");
	assert!(matches!(err, CodecError::CountTooLarge { count: 1_000_000, max: 65_536 }));

	let tight = DecodeOptions {
		max_zero_width_count: 2,
		..DecodeOptions::default()
	};
	let uint0 = [0xe0, 0x02, 0x03, 0x43];
	let err = Data::new().decode_with(&uint0, &tight).expect_err("three uint0 elements");
	assert!(matches!(err, CodecError::CountTooLarge { count: 3, max: 2 }));

	let mut data = Data::new();
	data.decode(&uint0).expect("within default limit");
	assert_eq!(data.root().expect("root").child_count(), 3);

	data.decode_with(&[0xe0, 0x05, 0x03, 0x50, 0x01, 0x02, 0x03], &tight).expect("sized elements");
	assert_eq!(data.root().expect("root").child_count(), 3);
}
