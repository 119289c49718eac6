use crate::amqp::{ByteSink, Data, FixedSink, Kind, Value};

fn encode_one(put: impl FnOnce(&mut Data) -> crate::amqp::Result<()>) -> Vec<u8> {
	let mut data = Data::new();
	put(&mut data).expect("put succeeds");
	let bytes = data.encode_to_vec();
	assert_eq!(bytes.len(), data.size(), "size agrees with encoded length");
	bytes
}

#[test]
fn small_ints_self_select_one_byte_payload() {
	assert_eq!(encode_one(|d| d.put_int(-128)), [0x54, 0x80]);
	assert_eq!(encode_one(|d| d.put_int(127)), [0x54, 0x7f]);
	assert_eq!(encode_one(|d| d.put_int(128)), [0x71, 0x00, 0x00, 0x00, 0x80]);
	assert_eq!(encode_one(|d| d.put_int(-129)), [0x71, 0xff, 0xff, 0xff, 0x7f]);
	assert_eq!(encode_one(|d| d.put_long(-1)), [0x55, 0xff]);
	assert_eq!(encode_one(|d| d.put_long(1 << 40)), [0x81, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00]);
}

#[test]
fn unsigned_zero_uses_empty_payload() {
	assert_eq!(encode_one(|d| d.put_uint(0)), [0x43]);
	assert_eq!(encode_one(|d| d.put_uint(255)), [0x52, 0xff]);
	assert_eq!(encode_one(|d| d.put_uint(256)), [0x70, 0x00, 0x00, 0x01, 0x00]);
	assert_eq!(encode_one(|d| d.put_ulong(0)), [0x44]);
	assert_eq!(encode_one(|d| d.put_ulong(7)), [0x53, 0x07]);
}

#[test]
fn fixed_width_scalars() {
	assert_eq!(encode_one(|d| d.put_null()), [0x40]);
	assert_eq!(encode_one(|d| d.put_bool(true)), [0x41]);
	assert_eq!(encode_one(|d| d.put_bool(false)), [0x42]);
	assert_eq!(encode_one(|d| d.put_ubyte(0xab)), [0x50, 0xab]);
	assert_eq!(encode_one(|d| d.put_short(-2)), [0x61, 0xff, 0xfe]);
	assert_eq!(encode_one(|d| d.put_char('A')), [0x73, 0x00, 0x00, 0x00, 0x41]);
	assert_eq!(encode_one(|d| d.put_float(1.0)), [0x72, 0x3f, 0x80, 0x00, 0x00]);
	assert_eq!(encode_one(|d| d.put_uuid([7; 16])).len(), 17);
	assert_eq!(encode_one(|d| d.put_timestamp(1)), [0x83, 0, 0, 0, 0, 0, 0, 0, 1]);
}

#[test]
fn variable_width_switches_at_256_bytes() {
	assert_eq!(encode_one(|d| d.put_string("hi")), [0xa1, 0x02, b'h', b'i']);
	assert_eq!(encode_one(|d| d.put_symbol("x")), [0xa3, 0x01, b'x']);

	let short = encode_one(|d| d.put_binary(&[1; 255]));
	assert_eq!(&short[..2], &[0xa0, 0xff]);
	assert_eq!(short.len(), 257);

	let long = encode_one(|d| d.put_binary(&[1; 256]));
	assert_eq!(&long[..5], &[0xb0, 0x00, 0x00, 0x01, 0x00]);
	assert_eq!(long.len(), 261);
}

#[test]
fn encode_writes_nothing_when_sink_is_short() {
	let mut data = Data::new();
	data.put_string("hello").expect("put succeeds");

	let mut small = [0_u8; 4];
	let mut sink = FixedSink::new(&mut small);
	assert_eq!(data.encode(&mut sink), 0);
	assert_eq!(sink.position(), 0);

	let mut exact = [0_u8; 7];
	let mut sink = FixedSink::new(&mut exact);
	assert_eq!(data.encode(&mut sink), 7);
	assert_eq!(sink.written(), &[0xa1, 0x05, b'h', b'e', b'l', b'l', b'o']);
	assert_eq!(sink.remaining(), 0);
}

#[test]
fn node_ref_exposes_structure() {
	let mut data = Data::new();
	data.put_list().expect("list");
	assert!(data.enter());
	data.put_int(1).expect("int");
	data.put_symbol("s").expect("symbol");
	assert!(data.exit());

	let root = data.root().expect("root exists");
	assert_eq!(root.kind(), Kind::List);
	assert_eq!(root.child_count(), 2);
	let kinds: Vec<Kind> = root.children().map(|child| child.kind()).collect();
	assert_eq!(kinds, [Kind::Int, Kind::Symbol]);

	let last = root.children().last().expect("last child");
	assert_eq!(last.parent().map(|parent| parent.kind()), Some(Kind::List));
	assert_eq!(last.value().expect("value"), Value::symbol("s"));
	assert_eq!(last.encode_to_vec(), [0xa3, 0x01, b's']);
	assert_eq!(root.array_element(), None);
	assert_eq!(root.width_class(), None);
}

#[test]
fn replaced_root_slots_are_recycled() {
	let mut data = Data::new();
	for value in 0..4 {
		data.put_list().expect("list");
		assert!(data.enter());
		data.put_int(value).expect("int");
		data.put_int(value + 1).expect("int");
		assert!(data.exit());
		data.rewind();
	}
	assert_eq!(data.node_count(), 3);
	assert_eq!(data.value().expect("value"), Value::List(vec![Value::Int(3), Value::Int(4)]));
}
