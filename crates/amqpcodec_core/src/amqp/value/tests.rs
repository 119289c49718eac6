use crate::amqp::{ArrayValue, CodecError, Data, Kind, Value};

#[test]
fn odd_map_converts_with_error_but_still_encodes() {
	let mut data = Data::new();
	data.put_map().expect("map");
	assert!(data.enter());
	data.put_symbol("k").expect("key");
	data.put_int(1).expect("value");
	data.put_symbol("dangling").expect("key without value");
	assert!(data.exit());

	let err = data.value().expect_err("odd map");
	assert!(matches!(err, CodecError::OddMapCount { count: 3 }));
	assert_eq!(data.encode_to_vec()[..3], [0xc1, 0x10, 0x03]);
}

#[test]
fn duplicate_map_keys_are_kept_in_order() {
	let value = Value::Map(vec![
		(Value::symbol("k"), Value::Int(1)),
		(Value::symbol("k"), Value::Int(2)),
	]);
	let mut data = Data::new();
	data.put_value(&value).expect("put");
	assert_eq!(data.value().expect("value"), value);
}

#[test]
fn missing_described_slots_read_as_null() {
	let mut data = Data::new();
	data.put_described().expect("described");
	assert_eq!(data.value().expect("value"), Value::described(Value::Null, Value::Null));

	assert!(data.enter());
	data.put_symbol("x:y").expect("descriptor");
	assert!(data.exit());
	assert_eq!(data.value().expect("value"), Value::described(Value::symbol("x:y"), Value::Null));
}

#[test]
fn described_array_without_elements_has_null_descriptor() {
	let mut data = Data::new();
	data.put_array(true, Kind::Int).expect("array");
	assert_eq!(
		data.value().expect("value"),
		Value::Array(ArrayValue {
			element: Kind::Int,
			descriptor: Some(Box::new(Value::Null)),
			items: Vec::new(),
		})
	);
}

#[test]
fn value_kinds_and_accessors() {
	assert_eq!(Value::Bool(true).kind(), Kind::Boolean);
	assert_eq!(Value::Timestamp(0).kind(), Kind::Timestamp);
	assert_eq!(Value::described(Value::Null, Value::Null).kind(), Kind::Described);
	assert_eq!(Value::ULong(9).as_ulong(), Some(9));
	assert_eq!(Value::UInt(9).as_ulong(), None);
	assert_eq!(Value::symbol("s").as_symbol(), Some("s"));
	assert_eq!(Value::string("s").as_symbol(), None);
	assert_eq!(Value::string("s").as_str(), Some("s"));
	assert_eq!(Value::List(vec![Value::Null]).as_list().map(<[Value]>::len), Some(1));
}

#[test]
fn encode_to_vec_reports_invalid_arrays() {
	let bad = Value::Array(ArrayValue {
		element: Kind::Int,
		descriptor: None,
		items: vec![Value::Int(1), Value::string("x")],
	});
	let err = bad.encode_to_vec().expect_err("string in int array");
	assert!(matches!(
		err,
		CodecError::ArrayTypeMismatch {
			expected: Kind::Int,
			got: Kind::String
		}
	));

	let good = Value::List(vec![Value::Decimal32(1), Value::Uuid([0; 16])]);
	let bytes = good.encode_to_vec().expect("encode");
	assert_eq!(&bytes[..3], &[0xc0, 0x17, 0x02]);
	assert_eq!(bytes[3], 0x74);
	assert_eq!(bytes[8], 0x98);
}
