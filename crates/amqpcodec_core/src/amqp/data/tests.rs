use crate::amqp::{ArrayValue, Data, Kind, Value};

fn sample_list(data: &mut Data) {
	data.put_list().expect("list");
	assert!(data.enter());
	data.put_int(1).expect("int");
	data.put_string("a").expect("string");
	data.put_null().expect("null");
	assert!(data.exit());
}

#[test]
fn second_top_level_put_replaces_root() {
	let mut data = Data::new();
	data.put_int(1).expect("first");
	data.put_int(2).expect("second");

	data.rewind();
	assert_eq!(data.next(), Some(Kind::Int));
	assert_eq!(data.value().expect("value"), Value::Int(2));
	assert_eq!(data.next(), None);
	assert_eq!(data.prev(), None);
	assert_eq!(data.node_count(), 1);
}

#[test]
fn enter_and_exit_report_failure_without_moving() {
	let mut data = Data::new();
	assert!(!data.enter());
	assert!(!data.exit());

	data.put_uint(3).expect("uint");
	assert!(!data.enter());
	assert_eq!(data.kind(), Some(Kind::UInt));
	assert!(!data.exit());
	assert_eq!(data.kind(), Some(Kind::UInt));
}

#[test]
fn navigation_walks_siblings_and_levels() {
	let mut data = Data::new();
	sample_list(&mut data);

	data.rewind();
	assert_eq!(data.kind(), None);
	assert_eq!(data.next(), Some(Kind::List));
	assert!(data.enter());
	assert_eq!(data.kind(), None);
	assert_eq!(data.next(), Some(Kind::Int));
	assert_eq!(data.next(), Some(Kind::String));
	assert_eq!(data.next(), Some(Kind::Null));
	assert_eq!(data.next(), None);
	assert_eq!(data.kind(), Some(Kind::Null));
	assert_eq!(data.prev(), Some(Kind::String));
	assert_eq!(data.prev(), Some(Kind::Int));
	assert_eq!(data.prev(), None);
	assert!(data.exit());
	assert_eq!(data.kind(), Some(Kind::List));
	assert!(data.parent().is_none());
}

#[test]
fn put_after_current_splices_into_sibling_chain() {
	let mut data = Data::new();
	data.put_list().expect("list");
	assert!(data.enter());
	data.put_int(1).expect("int");
	data.put_int(3).expect("int");
	assert!(data.exit());

	assert!(data.enter());
	assert_eq!(data.next(), Some(Kind::Int));
	data.put_int(2).expect("spliced");
	assert!(data.exit());

	assert_eq!(
		data.value().expect("value"),
		Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
	);
}

#[test]
fn entering_without_current_appends_at_end() {
	let mut data = Data::new();
	sample_list(&mut data);
	assert!(data.enter());
	data.put_bool(true).expect("appended");
	assert!(data.exit());

	let root = data.root().expect("root");
	assert_eq!(root.child_count(), 4);
	assert_eq!(root.children().last().map(|child| child.kind()), Some(Kind::Boolean));
}

#[test]
fn clear_releases_everything() {
	let mut data = Data::new();
	sample_list(&mut data);
	assert!(data.enter());

	data.clear();
	assert!(data.is_empty());
	assert_eq!(data.node_count(), 0);
	assert_eq!(data.kind(), None);
	assert!(data.parent().is_none());
	assert_eq!(data.size(), 0);
	assert!(data.encode_to_vec().is_empty());
	assert!(data.value().is_err());

	data.put_symbol("fresh").expect("put after clear");
	assert_eq!(data.encode_to_vec(), [0xa3, 0x05, b'f', b'r', b'e', b's', b'h']);
}

#[test]
fn value_bridge_builds_nested_trees() {
	let value = Value::described(
		Value::ULong(0x12),
		Value::List(vec![
			Value::string("link"),
			Value::UInt(0),
			Value::Map(vec![(Value::symbol("k"), Value::Array(ArrayValue {
				element: Kind::Int,
				descriptor: None,
				items: vec![Value::Int(1), Value::Int(-1)],
			}))]),
		]),
	);

	let mut data = Data::new();
	data.put_value(&value).expect("put value");
	assert_eq!(data.kind(), Some(Kind::Described));
	assert_eq!(data.value().expect("value"), value);
	assert_eq!(data.encode_to_vec(), value.encode_to_vec().expect("encode"));
}

#[test]
fn render_of_empty_builder_is_empty() {
	let data = Data::new();
	assert_eq!(data.render(), "");
}
