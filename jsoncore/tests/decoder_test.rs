use jsoncore::Decoder;

#[test]
fn full_tokenization_sequence() {
    let input = r#"{"a": 1,"b": 123.456, "c": null, "d": [1, -2, "three", true, false, ""]}"#;
    let mut d = Decoder::new(input.as_bytes());

    let expected: &[&[u8]] = &[
        b"{", b"\"a\"", b"1", b"\"b\"", b"123.456", b"\"c\"", b"null", b"\"d\"", b"[", b"1",
        b"-2", b"\"three\"", b"true", b"false", b"\"\"", b"]", b"}",
    ];
    for tok in expected {
        assert_eq!(d.next_token().unwrap(), *tok);
    }
    assert!(d.next_token().unwrap_err().is_eof());
}

#[test]
fn number_literal_round_trips_as_a_single_token() {
    let mut d = Decoder::new(b"-1234567.8e+90");
    assert_eq!(d.next_token().unwrap(), b"-1234567.8e+90");
}

#[test]
fn capture_raw_deeply_nested() {
    let mut d = Decoder::new(br#"[[[[[[{"true":true}]]]]]]"#);
    for _ in 0..6 {
        assert_eq!(d.next_token().unwrap(), b"[");
    }
    assert_eq!(d.capture_raw().unwrap(), br#"{"true":true}"#);
    for _ in 0..6 {
        assert_eq!(d.next_token().unwrap(), b"]");
    }
    assert!(d.next_token().unwrap_err().is_eof());
}

#[test]
fn object_key_must_be_a_string() {
    let mut d = Decoder::new(br#"{{"key":1}:2}"#);
    let mut err = None;
    for _ in 0..5 {
        if let Err(e) = d.next_token() {
            err = Some(e);
            break;
        }
    }
    let err = err.expect("expected a structural failure");
    assert!(!err.is_eof());
}

#[test]
fn decode_int_boundary_max() {
    let mut d = Decoder::new(b"9223372036854775807");
    assert_eq!(d.decode_int().unwrap(), i64::MAX);
}

#[test]
fn decode_ptr_int_null_is_none() {
    let mut d = Decoder::new(b"null");
    assert_eq!(d.decode_ptr_int().unwrap(), None);
}

#[test]
fn decode_slice_of_int_rejects_floats() {
    let mut d = Decoder::new(b"[1.0]");
    assert!(d.decode_slice_of_int().is_err());
}

#[test]
fn decode_int_or_slice_rejects_string() {
    let mut d = Decoder::new(br#""a""#);
    assert!(d.decode_int_or_slice().is_err());
}

#[test]
fn decode_int_or_slice_accepts_bare_scalar() {
    let mut d = Decoder::new(b"1");
    assert_eq!(d.decode_int_or_slice().unwrap(), Some(vec![1]));
}

#[test]
fn skip_value_then_decode_resumes_at_same_structural_position() {
    // Property 2: skipping a value leaves the pump in the same post-value
    // state as fully consuming it token by token.
    let a = br#"{"skip": [1, 2, {"x": 3}], "after": "ok"}"#;
    let b = br#"{"skip": [1, 2, {"x": 3}], "after": "ok"}"#;

    let mut skipper = Decoder::new(a);
    assert_eq!(skipper.next_token().unwrap(), b"{");
    assert_eq!(skipper.next_token().unwrap(), b"\"skip\"");
    skipper.skip_value().unwrap();

    let mut walker = Decoder::new(b);
    assert_eq!(walker.next_token().unwrap(), b"{");
    assert_eq!(walker.next_token().unwrap(), b"\"skip\"");
    for tok in [b"[".as_slice(), b"1", b"2", b"{", b"\"x\"", b"3", b"}", b"]"] {
        assert_eq!(walker.next_token().unwrap(), tok);
    }

    assert_eq!(skipper.next_token().unwrap(), b"\"after\"");
    assert_eq!(walker.next_token().unwrap(), b"\"after\"");
}

#[test]
fn reset_reinitializes_state() {
    let mut d = Decoder::new(b"[1, 2]");
    assert_eq!(d.next_token().unwrap(), b"[");
    d.reset(b"{}");
    assert_eq!(d.next_token().unwrap(), b"{");
    assert_eq!(d.next_token().unwrap(), b"}");
    assert!(d.next_token().unwrap_err().is_eof());
}

#[test]
fn string_escapes_are_preserved_verbatim() {
    let mut d = Decoder::new(br#""line1\nline2""#);
    assert_eq!(d.decode_str().unwrap(), r"line1\nline2");
}
