use serde_backref::{
    decode, decode_with_options, encode, encode_with_options, to_string, value, values,
    CodecOptions, Error, ErrorKind, Value,
};
use std::collections::BTreeMap;

fn roundtrip(values: &[Value]) -> Vec<Value> {
    let payload = encode(values).unwrap();
    println!("Payload: {}", payload);
    decode(&payload).unwrap()
}

#[test]
fn test_rejects_more_than_1000_items() {
    let too_many: Vec<Value> = (0..1001).map(Value::from).collect();
    let err = encode(&too_many).unwrap_err();
    assert_eq!(err, Error::size_limit(1001, 1000));

    let just_enough: Vec<Value> = (0..1000).map(Value::from).collect();
    assert_eq!(roundtrip(&just_enough), just_enough);
}

#[test]
fn test_rejects_invalid_data_types() {
    let with_object = vec![serde_json::json!({})];
    let err = to_string(&with_object).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedType);

    for bad in [
        serde_json::json!([true]),
        serde_json::json!([1.5]),
        serde_json::json!([null]),
        serde_json::json!([[1, [false]]]),
    ] {
        let err = to_string(&bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedType, "{bad}");
    }
}

#[test]
fn test_rejects_non_sequence_input() {
    let mut map = BTreeMap::new();
    map.insert("a", 1);

    assert_eq!(to_string(&true).unwrap_err().kind(), ErrorKind::InvalidInput);
    assert_eq!(to_string(&1.5f64).unwrap_err().kind(), ErrorKind::InvalidInput);
    assert_eq!(to_string(&None::<i32>).unwrap_err().kind(), ErrorKind::InvalidInput);
    assert_eq!(to_string(&map).unwrap_err().kind(), ErrorKind::InvalidInput);

    for bad in [
        serde_json::json!({"a": 1}),
        serde_json::json!(true),
        serde_json::json!(null),
        serde_json::json!(2.5),
        serde_json::json!("text"),
    ] {
        let err = to_string(&bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput, "{bad}");
    }
}

#[test]
fn test_integer_range_bounds() {
    let err = to_string(&[2_147_483_648i64]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
    let err = to_string(&[-2_147_483_649i64]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);

    let payload = to_string(&[2_147_483_647i64, -2_147_483_648i64]).unwrap();
    assert_eq!(payload, "[2147483647,-2147483648]");
    assert_eq!(
        decode(&payload).unwrap(),
        vec![Value::Integer(i32::MAX), Value::Integer(i32::MIN)]
    );
}

#[test]
fn test_string_length_bound() {
    let longest = "a".repeat(1_000_000);
    assert!(encode(&[Value::from(longest.as_str())]).is_ok());

    let too_long = "a".repeat(1_000_001);
    let err = encode(&[Value::from(too_long)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);

    // Nested strings are bounded too
    let nested = Value::List(vec![Value::from("b".repeat(1_000_001))]);
    assert_eq!(encode(&[nested]).unwrap_err().kind(), ErrorKind::Range);
}

#[test]
fn test_size_checked_before_serializing() {
    // The oversized string would fail with Range if elements were visited first
    let mut values: Vec<Value> = (0..1001).map(Value::from).collect();
    values[0] = Value::from("x".repeat(1_000_001));
    assert_eq!(encode(&values).unwrap_err().kind(), ErrorKind::SizeLimit);
}

#[test]
fn test_size_checked_before_converting_elements() {
    let mut values: Vec<serde_json::Value> = (0..1001).map(|i| serde_json::json!(i)).collect();
    values[500] = serde_json::json!(true);
    assert_eq!(to_string(&values).unwrap_err(), Error::size_limit(1001, 1000));

    values.truncate(1000);
    assert_eq!(to_string(&values).unwrap_err().kind(), ErrorKind::UnsupportedType);
}

#[test]
fn test_deeply_nested_payload_is_rejected() {
    let depth = 10_000;
    let payload = format!("[{}{}]", "[".repeat(depth), "]".repeat(depth));
    let err = decode(&payload).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedPayload);

    let payload = format!("[{}{}]", "[".repeat(256), "]".repeat(256));
    assert_eq!(decode(&payload).unwrap().len(), 1);

    let options = CodecOptions::new().with_max_depth(2);
    assert!(decode_with_options("[[[1]]]", &options).is_ok());
    let err = decode_with_options("[[[[1]]]]", &options).unwrap_err();
    assert_eq!(err, Error::malformed(3, "nesting too deep"));
}

#[test]
fn test_deeply_nested_value_is_rejected() {
    let nested = (0..300).fold(Value::from(0), |inner, _| Value::List(vec![inner]));
    let err = encode(&[nested]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);

    let options = CodecOptions::new().with_max_depth(2);
    assert!(encode_with_options(&values![[[1]]], &options).is_ok());
    let err = encode_with_options(&values![[[[1]]]], &options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
}

#[test]
fn test_simple_array_case() {
    let values = values![1, 2, 3];
    assert_eq!(encode(&values).unwrap(), "[1,2,3]");
    assert_eq!(roundtrip(&values), values);
}

#[test]
fn test_simple_string_case() {
    let values = values!["Hey", "I'm", "a", "string"];
    assert_eq!(
        encode(&values).unwrap(),
        r#"["Hey","I0x27m","a","string"]"#
    );
    assert_eq!(roundtrip(&values), values);
}

#[test]
fn test_special_string_characters() {
    let values = values![",", "\"", "It's me", ",\"'<>;", "[not;a,list]"];
    assert_eq!(roundtrip(&values), values);
}

#[test]
fn test_mixed_scalars() {
    let values = values!["Hey", 1, "I'm", 2, "a", 3, "string"];
    assert_eq!(roundtrip(&values), values);
}

#[test]
fn test_simple_nested_array_case() {
    let values = values!["foo", ["bar", 42]];
    assert_eq!(encode(&values).unwrap(), r#"["foo",["bar";42]]"#);
    assert_eq!(roundtrip(&values), values);
}

#[test]
fn test_repeated_values_become_pointers() {
    let values = values![1, 1, 2, 2, 3, 3];
    let payload = encode(&values).unwrap();
    assert_eq!(payload, "[1,<0>,2,<2>,3,<4>]");
    assert_eq!(decode(&payload).unwrap(), values);
}

#[test]
fn test_repeated_scalars_and_lists() {
    let values = values!["foo", "foo", 23, ["bar", 42], 23, ["bar", 42]];
    let payload = encode(&values).unwrap();
    assert_eq!(payload, r#"["foo",<0>,23,["bar";42],<2>,<3>]"#);
    assert_eq!(decode(&payload).unwrap(), values);
}

#[test]
fn test_lists_with_repeated_members() {
    let values = values![1, 1, 2, 2, [3, 3]];
    let payload = encode(&values).unwrap();
    assert_eq!(payload, "[1,<0>,2,<2>,[3;3]]");
    assert_eq!(decode(&payload).unwrap(), values);
}

#[test]
fn test_deep_nested_arrays() {
    let values = values![1, 1, 2, 2, [3, [4, 5]], 6];
    let payload = encode(&values).unwrap();
    assert_eq!(payload, "[1,<0>,2,<2>,[3;[4;5]],6]");
    assert_eq!(decode(&payload).unwrap(), values);

    let deeper = values![[[[["x"]]], [], [[]]], [[[["x"]]], [], [[]]]];
    assert_eq!(encode(&deeper).unwrap(), r#"[[[[["x"]]];[];[[]]],<0>]"#);
    assert_eq!(roundtrip(&deeper), deeper);
}

#[test]
fn test_partial_list_matches_are_not_shared() {
    let values = values![["bar", 42], ["bar", 43], [["bar", 42]]];
    let payload = encode(&values).unwrap();
    assert!(!payload.contains('<'));
    assert_eq!(roundtrip(&values), values);
}

#[test]
fn test_string_and_integer_with_same_digits() {
    let values = values![23, "23", 23, "23"];
    assert_eq!(encode(&values).unwrap(), r#"[23,"23",<0>,<1>]"#);
}

#[test]
fn test_larger_array_case() {
    let values: Vec<Value> = (0..1000)
        .map(|i| {
            let n = (i * 7919 + 13) % 1000;
            if i % 2 == 0 {
                Value::from(format!("Number {} is a string", n))
            } else {
                Value::from(n)
            }
        })
        .collect();

    let payload = encode(&values).unwrap();
    assert!(payload.contains('<'));
    assert_eq!(decode(&payload).unwrap(), values);
}

#[test]
fn test_encoding_is_deterministic() {
    let values = values!["a", ["b", 1], "a", 2, ["b", 1]];
    assert_eq!(encode(&values).unwrap(), encode(&values).unwrap());
}

#[test]
fn test_empty_inputs() {
    assert_eq!(encode(&[]).unwrap(), "[]");
    assert!(decode("[]").unwrap().is_empty());

    let values = values![[], "", [""], [[]]];
    assert_eq!(encode(&values).unwrap(), r#"[[],"",[""],[[]]]"#);
    assert_eq!(roundtrip(&values), values);
}

#[test]
fn test_dedup_can_be_disabled() {
    let values = values![1, 1, [2], [2]];
    let options = CodecOptions::new().with_dedup(false);
    let payload = encode_with_options(&values, &options).unwrap();
    assert_eq!(payload, "[1,1,[2],[2]]");
    assert_eq!(decode(&payload).unwrap(), values);
}

#[test]
fn test_custom_limits() {
    let options = CodecOptions::new().with_max_len(2).with_max_string_len(2);
    assert!(encode_with_options(&values!["ab", "cd"], &options).is_ok());
    assert_eq!(
        encode_with_options(&values![1, 2, 3], &options)
            .unwrap_err()
            .kind(),
        ErrorKind::SizeLimit
    );
    assert_eq!(
        encode_with_options(&values!["abc"], &options)
            .unwrap_err()
            .kind(),
        ErrorKind::Range
    );
}

#[test]
fn test_escape_code_text_collides() {
    // The wire format cannot tell a literal code from an escaped character
    let values = values!["0x2c"];
    assert_eq!(encode(&values).unwrap(), r#"["0x2c"]"#);
    assert_eq!(decode(r#"["0x2c"]"#).unwrap(), vec![value!(",")]);
}

#[test]
fn test_decode_errors() {
    let cases = [
        ("1,2", ErrorKind::MalformedPayload),
        ("[1,2", ErrorKind::MalformedPayload),
        ("[1,,2]", ErrorKind::MalformedPayload),
        ("[[1;2]", ErrorKind::MalformedPayload),
        (r#"["abc]"#, ErrorKind::MalformedPayload),
        ("[1,[2;<0>]]", ErrorKind::MalformedPayload),
        ("[<x>]", ErrorKind::MalformedPayload),
        ("[1,<1>]", ErrorKind::DanglingPointer),
        ("[1,<2>,3]", ErrorKind::DanglingPointer),
        ("[1,<0>,<1>]", ErrorKind::DanglingPointer),
        ("[abc]", ErrorKind::InvalidInteger),
        ("[1.5]", ErrorKind::InvalidInteger),
        ("[2147483648]", ErrorKind::InvalidInteger),
        ("[ 1]", ErrorKind::InvalidInteger),
    ];

    for (payload, kind) in cases {
        let err = decode(payload).unwrap_err();
        println!("{} -> {}", payload, err);
        assert_eq!(err.kind(), kind, "payload {payload:?}");
        assert!(err.is_decode());
    }
}

#[test]
fn test_decode_error_positions() {
    assert_eq!(
        decode("[1,abc]").unwrap_err(),
        Error::invalid_integer(3, "abc")
    );
    assert_eq!(
        decode("[1,[2;x]]").unwrap_err(),
        Error::invalid_integer(6, "x")
    );
}
