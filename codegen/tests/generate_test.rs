//! End-to-end: Rust source -> `descriptors::RecordGraph` -> emitted decoder
//! source, exercising both engines against a small record graph with a
//! nested record reference, an embedded field, and a raw field.

use std::io::Write;

fn write_temp(src: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".rs").tempfile().unwrap();
    file.write_all(src.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const SOURCE: &str = r#"
struct Address {
    street: String,
    zip: String,
}

struct Person {
    name: String,
    age: i64,
    address: Address,
    #[bitjson(embed)]
    contact: Contact,
    #[bitjson(rename = "raw_extra", raw)]
    extra: Vec<u8>,
    tags: Vec<String>,
}

struct Contact {
    email: String,
}
"#;

#[test]
fn custom_engine_emits_full_record_family_with_nested_and_embedded_fields() {
    let file = write_temp(SOURCE);
    let graph = descriptors::graph_for_path(file.path(), "generated").unwrap();

    let opts = codegen::Options {
        pkgname: "generated".to_string(),
        noformat: true,
    };
    let source = codegen::generate(&graph, &codegen::CustomEngine, &opts).unwrap();

    assert!(source.contains("pub fn decode_person("));
    assert!(source.contains("pub fn decode_ptr_person("));
    assert!(source.contains("pub fn decode_slice_person("));
    assert!(source.contains("pub fn decode_ptr_slice_person("));
    assert!(source.contains("pub fn release_person("));
    assert!(source.contains("pub fn person_pool("));

    // nested record reference dispatches to the referenced record's decoder
    assert!(source.contains("out.address = decode_address(d)?;"));

    // the embedded record's field is flattened into Person's own dispatch,
    // not decoded via a nested call
    assert!(source.contains("\"email\" =>"));

    // raw field uses capture_raw and the renamed wire key
    assert!(source.contains("\"raw_extra\" => { out.extra = d.capture_raw()?.to_vec(); }"));
}

#[test]
fn fastjson_engine_emits_value_based_decoders_for_the_same_graph() {
    let file = write_temp(SOURCE);
    let graph = descriptors::graph_for_path(file.path(), "generated").unwrap();

    let opts = codegen::Options {
        pkgname: "generated".to_string(),
        noformat: true,
    };
    let source = codegen::generate(&graph, &codegen::FastjsonEngine, &opts).unwrap();

    assert!(source.contains("pub fn decode_person(v: &Value)"));
    assert!(source.contains("pub struct DecodeError(pub String)"));
    assert!(source.contains("decode_address(field_v)?"));
}

#[test]
fn record_cycle_is_rejected_before_any_text_is_emitted() {
    let file = write_temp(
        r#"
        struct A {
            #[bitjson(embed)]
            b: B,
        }
        struct B {
            #[bitjson(embed)]
            a: A,
        }
        "#,
    );
    let graph = descriptors::graph_for_path(file.path(), "generated").unwrap();
    let err = codegen::flatten_graph(&graph).unwrap_err();
    assert!(matches!(err, codegen::Error::Cycle { .. }));
}
