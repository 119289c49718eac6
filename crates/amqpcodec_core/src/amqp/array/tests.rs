use crate::amqp::{CodecError, Data, Kind, Value, WidthClass};

fn array_of(element: Kind, put: impl FnOnce(&mut Data)) -> Data {
	let mut data = Data::new();
	data.put_array(false, element).expect("array");
	assert!(data.enter());
	put(&mut data);
	assert!(data.exit());
	data
}

#[test]
fn large_ints_promote_whole_array() {
	let data = array_of(Kind::Int, |d| {
		for value in 0..256 {
			d.put_int(1_000 + value).expect("int");
		}
	});

	let root = data.root().expect("root");
	assert_eq!(root.width_class(), Some(WidthClass::Small));
	let bytes = data.encode_to_vec();
	assert_eq!(root.width_class(), Some(WidthClass::Large));

	assert_eq!(bytes.len(), 9 + 1 + 256 * 4);
	assert_eq!(bytes[0], 0xf0);
	assert_eq!(&bytes[1..5], &1_029_u32.to_be_bytes());
	assert_eq!(&bytes[5..9], &256_u32.to_be_bytes());
	assert_eq!(bytes[9], 0x71);
	assert_eq!(&bytes[10..14], &1_000_i32.to_be_bytes());
	assert_eq!(&bytes[bytes.len() - 4..], &1_255_i32.to_be_bytes());
}

#[test]
fn late_wide_element_resizes_earlier_ones() {
	let data = array_of(Kind::Int, |d| {
		d.put_int(1).expect("int");
		d.put_int(2).expect("int");
		d.put_int(1_000).expect("int");
	});
	assert_eq!(
		data.encode_to_vec(),
		[0xe0, 0x0e, 0x03, 0x71, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0x03, 0xe8]
	);
}

#[test]
fn sizing_is_idempotent() {
	let data = array_of(Kind::ULong, |d| {
		d.put_ulong(0).expect("ulong");
		d.put_ulong(9).expect("ulong");
		d.put_ulong(u64::MAX).expect("ulong");
	});
	let first = data.size();
	let bytes = data.encode_to_vec();
	assert_eq!(data.size(), first);
	assert_eq!(data.encode_to_vec(), bytes);
	assert_eq!(bytes.len(), first);
	assert_eq!(bytes[3], 0x80);
}

#[test]
fn uint_arrays_pick_smallest_shared_constructor() {
	let zeros = array_of(Kind::UInt, |d| {
		d.put_uint(0).expect("uint");
		d.put_uint(0).expect("uint");
	});
	assert_eq!(zeros.encode_to_vec(), [0xe0, 0x02, 0x02, 0x43]);

	let small = array_of(Kind::UInt, |d| {
		d.put_uint(0).expect("uint");
		d.put_uint(5).expect("uint");
	});
	assert_eq!(small.encode_to_vec(), [0xe0, 0x04, 0x02, 0x52, 0x00, 0x05]);

	let large = array_of(Kind::UInt, |d| {
		d.put_uint(0).expect("uint");
		d.put_uint(300).expect("uint");
	});
	assert_eq!(large.encode_to_vec(), [0xe0, 0x0a, 0x02, 0x70, 0, 0, 0, 0, 0, 0, 0x01, 0x2c]);
}

#[test]
fn narrower_kinds_widen_on_append() {
	let mut data = array_of(Kind::Long, |d| {
		d.put_byte(-3).expect("byte widens to long");
		d.put_int(7).expect("int widens to long");
		d.put_uint(9).expect("uint widens to long");
	});
	assert_eq!(
		data.value().expect("value"),
		Value::Array(crate::amqp::ArrayValue {
			element: Kind::Long,
			descriptor: None,
			items: vec![Value::Long(-3), Value::Long(7), Value::Long(9)],
		})
	);

	assert!(data.enter());
	let err = data.put_string("nope").expect_err("string cannot join a long array");
	assert!(matches!(
		err,
		CodecError::ArrayTypeMismatch {
			expected: Kind::Long,
			got: Kind::String
		}
	));
	let err = data.put_ulong(1).expect_err("ulong does not widen to long");
	assert!(matches!(err, CodecError::ArrayTypeMismatch { .. }));
	assert_eq!(data.parent().expect("still inside").child_count(), 3);
}

#[test]
fn described_array_writes_descriptor_before_constructor() {
	let mut data = Data::new();
	data.put_array(true, Kind::Symbol).expect("array");
	assert!(data.enter());
	data.put_ulong(0x10).expect("descriptor accepted regardless of element kind");
	data.put_symbol("a").expect("symbol");
	data.put_symbol("bc").expect("symbol");
	assert!(data.exit());

	let root = data.root().expect("root");
	assert!(root.is_described_array());
	assert_eq!(root.array_element(), Some(Kind::Symbol));
	assert_eq!(
		data.encode_to_vec(),
		[0xe0, 0x0a, 0x02, 0x00, 0x53, 0x10, 0xa3, 0x01, b'a', 0x02, b'b', b'c']
	);
}

#[test]
fn list_elements_share_list_constructor() {
	let empty = array_of(Kind::List, |d| {
		d.put_list().expect("list");
		d.put_list().expect("list");
	});
	assert_eq!(empty.encode_to_vec(), [0xe0, 0x02, 0x02, 0x45]);

	let mixed = array_of(Kind::List, |d| {
		d.put_list().expect("list");
		d.put_list().expect("list");
		assert!(d.enter());
		d.put_int(1).expect("int");
		assert!(d.exit());
	});
	assert_eq!(
		mixed.encode_to_vec(),
		[0xe0, 0x08, 0x02, 0xc0, 0x01, 0x00, 0x03, 0x01, 0x54, 0x01]
	);
}

#[test]
fn nested_arrays_drop_their_own_constructor() {
	let mut data = Data::new();
	data.put_array(false, Kind::Array).expect("outer");
	assert!(data.enter());
	data.put_array(false, Kind::Int).expect("inner");
	assert!(data.enter());
	data.put_int(1).expect("int");
	data.put_int(2).expect("int");
	assert!(data.exit());
	assert!(data.exit());

	assert_eq!(
		data.encode_to_vec(),
		[0xe0, 0x07, 0x01, 0xe0, 0x04, 0x02, 0x54, 0x01, 0x02]
	);
}

#[test]
fn described_element_kind_is_rejected() {
	let mut data = Data::new();
	let err = data.put_array(false, Kind::Described).expect_err("described arrays are unsupported");
	assert!(matches!(err, CodecError::InvalidArrayElement { kind: Kind::Described }));
	assert!(data.is_empty());
}

#[test]
fn empty_array_keeps_element_constructor() {
	let data = array_of(Kind::String, |_| {});
	assert_eq!(data.encode_to_vec(), [0xe0, 0x02, 0x00, 0xa1]);
}
