//! The `custom` engine: emits code that calls straight into `jsoncore`'s
//! own [`jsoncore::Decoder`], the native decoder this toolkit was built
//! around.

use std::fmt::Write as _;

use descriptors::{PrimitiveKind, RecordGraph, TypeInfo};

use crate::engine::Engine;
use crate::error::Result;
use crate::flatten::FlatRecord;
use crate::naming::to_snake_case;

/// Emits `decode_x`/`decode_ptr_x`/`decode_slice_x`/`decode_ptr_slice_x`
/// families bound to `jsoncore::Decoder`, plus `release_x` and a trivial
/// `x_pool` free-list -- an optimization hook, not a mandated behavior (see
/// the design notes on pool allocator symbols).
#[derive(Debug, Default)]
pub struct CustomEngine;

impl Engine for CustomEngine {
    fn name(&self) -> &'static str {
        "custom"
    }

    fn emit_prelude(&self, out: &mut String) {
        out.push_str("use jsoncore::Decoder;\n");
    }

    fn emit_record(&self, record: &FlatRecord, graph: &RecordGraph, out: &mut String) -> Result<()> {
        let base = to_snake_case(&record.name);
        let ty = &record.name;

        writeln!(
            out,
            "pub fn decode_{base}(d: &mut Decoder) -> jsoncore::Result<{ty}> {{"
        )
        .unwrap();
        writeln!(out, "    d.expect_token(b\"{{\")?;").unwrap();
        writeln!(out, "    decode_{base}_fields(d)").unwrap();
        writeln!(out, "}}\n").unwrap();

        writeln!(
            out,
            "fn decode_{base}_fields(d: &mut Decoder) -> jsoncore::Result<{ty}> {{"
        )
        .unwrap();
        writeln!(out, "    let mut out = {ty}::default();").unwrap();
        writeln!(out, "    loop {{").unwrap();
        writeln!(out, "        let tok = d.next_token()?;").unwrap();
        writeln!(out, "        if tok == b\"}}\" {{ break; }}").unwrap();
        writeln!(
            out,
            "        let key = Decoder::token_as_str(tok, d.offset())?;"
        )
        .unwrap();
        writeln!(out, "        match key {{").unwrap();
        for field in &record.fields {
            let wire = &field.wire_name;
            let assign = emit_field_decode(field, graph);
            writeln!(out, "            \"{wire}\" => {{ out.{} = {assign}; }}", field.source_name).unwrap();
        }
        writeln!(out, "            _ => {{ d.skip_value()?; }}").unwrap();
        writeln!(out, "        }}").unwrap();
        writeln!(out, "    }}").unwrap();
        writeln!(out, "    Ok(out)").unwrap();
        writeln!(out, "}}\n").unwrap();

        writeln!(
            out,
            "pub fn decode_ptr_{base}(d: &mut Decoder) -> jsoncore::Result<Option<{ty}>> {{"
        )
        .unwrap();
        writeln!(out, "    if d.expect_object_or_null()? {{").unwrap();
        writeln!(out, "        Ok(Some(decode_{base}_fields(d)?))").unwrap();
        writeln!(out, "    }} else {{").unwrap();
        writeln!(out, "        Ok(None)").unwrap();
        writeln!(out, "    }}").unwrap();
        writeln!(out, "}}\n").unwrap();

        writeln!(
            out,
            "pub fn decode_slice_{base}(d: &mut Decoder) -> jsoncore::Result<Vec<{ty}>> {{"
        )
        .unwrap();
        writeln!(out, "    d.expect_token(b\"[\")?;").unwrap();
        writeln!(out, "    let mut out = Vec::new();").unwrap();
        writeln!(out, "    loop {{").unwrap();
        writeln!(out, "        let tok = d.next_token()?;").unwrap();
        writeln!(out, "        if tok == b\"]\" {{ break; }}").unwrap();
        writeln!(
            out,
            "        if tok != b\"{{\" {{ return Err(jsoncore::Error::format(d.offset())); }}"
        )
        .unwrap();
        writeln!(out, "        out.push(decode_{base}_fields(d)?);").unwrap();
        writeln!(out, "    }}").unwrap();
        writeln!(out, "    Ok(out)").unwrap();
        writeln!(out, "}}\n").unwrap();

        writeln!(
            out,
            "pub fn decode_ptr_slice_{base}(d: &mut Decoder) -> jsoncore::Result<Option<Vec<{ty}>>> {{"
        )
        .unwrap();
        writeln!(out, "    if !d.expect_array_or_null()? {{").unwrap();
        writeln!(out, "        return Ok(None);").unwrap();
        writeln!(out, "    }}").unwrap();
        writeln!(out, "    let mut out = Vec::new();").unwrap();
        writeln!(out, "    loop {{").unwrap();
        writeln!(out, "        let tok = d.next_token()?;").unwrap();
        writeln!(out, "        if tok == b\"]\" {{ break; }}").unwrap();
        writeln!(
            out,
            "        if tok != b\"{{\" {{ return Err(jsoncore::Error::format(d.offset())); }}"
        )
        .unwrap();
        writeln!(out, "        out.push(decode_{base}_fields(d)?);").unwrap();
        writeln!(out, "    }}").unwrap();
        writeln!(out, "    Ok(Some(out))").unwrap();
        writeln!(out, "}}\n").unwrap();

        crate::pooling::emit_release_and_pool(ty, &base, out);

        Ok(())
    }
}

/// Renders the expression that decodes one field, per the priority order of
/// §4.5: raw, then custom-unmarshal, then record reference, then
/// primitive/slice/pointer, falling back to a skip-and-default with a
/// compile-time-visible warning comment for shapes this engine does not
/// recognize.
fn emit_field_decode(field: &descriptors::FieldDescriptor, graph: &RecordGraph) -> String {
    if field.markers.raw || matches!(field.type_info, TypeInfo::Raw) {
        return "d.capture_raw()?.to_vec()".to_string();
    }
    if field.markers.custom || matches!(field.type_info, TypeInfo::CustomDecoded) {
        return format!("{}::decode_custom(d)?", field.declared_type);
    }
    match &field.type_info {
        TypeInfo::Primitive(PrimitiveKind::Int) => "d.decode_int()?".to_string(),
        TypeInfo::Primitive(PrimitiveKind::Float) => "d.decode_float64()?".to_string(),
        TypeInfo::Primitive(PrimitiveKind::Bool) => "d.decode_bool()?".to_string(),
        TypeInfo::Primitive(PrimitiveKind::String) => {
            "{ let mut s = String::new(); d.decode_string(&mut s)?; s }".to_string()
        }
        TypeInfo::Primitive(PrimitiveKind::Bytes) => "d.capture_raw()?.to_vec()".to_string(),
        TypeInfo::PointerTo(inner) => match inner.as_ref() {
            TypeInfo::Primitive(PrimitiveKind::Int) => "d.decode_ptr_int()?".to_string(),
            TypeInfo::RecordRef(id) => {
                format!("decode_ptr_{}(d)?", to_snake_case(&graph.get(*id).name))
            }
            _ => format!(
                "{{ /* unsupported pointer shape for `{}`; skipping */ d.skip_value()?; {} }}",
                field.source_name,
                crate::types::default_expr(&field.type_info, graph)
            ),
        },
        TypeInfo::SliceOf(inner) => match inner.as_ref() {
            TypeInfo::Primitive(PrimitiveKind::String) if field.markers.allow_single => {
                "d.decode_string_or_slice()?.unwrap_or_default()".to_string()
            }
            TypeInfo::Primitive(PrimitiveKind::String) => {
                "d.decode_slice_of_string()?.unwrap_or_default()".to_string()
            }
            TypeInfo::Primitive(PrimitiveKind::Int) if field.markers.allow_single => {
                "d.decode_int_or_slice()?.unwrap_or_default()".to_string()
            }
            TypeInfo::Primitive(PrimitiveKind::Int) => {
                "d.decode_slice_of_int()?.unwrap_or_default()".to_string()
            }
            TypeInfo::RecordRef(id) => {
                format!("decode_slice_{}(d)?", to_snake_case(&graph.get(*id).name))
            }
            _ => format!(
                "{{ /* unsupported slice shape for `{}`; skipping */ d.skip_value()?; {} }}",
                field.source_name,
                crate::types::default_expr(&field.type_info, graph)
            ),
        },
        TypeInfo::RecordRef(id) => format!("decode_{}(d)?", to_snake_case(&graph.get(*id).name)),
        TypeInfo::Raw | TypeInfo::CustomDecoded => unreachable!("handled above"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use descriptors::{FieldDescriptor, Markers, RecordDescriptor, RecordGraph};

    fn sample_graph() -> RecordGraph {
        let mut graph = RecordGraph::new();
        graph.insert(RecordDescriptor {
            name: "Point".to_string(),
            qualified_name: "Point".to_string(),
            fields: vec![
                FieldDescriptor {
                    source_name: "x".to_string(),
                    wire_name: "x".to_string(),
                    type_info: TypeInfo::Primitive(PrimitiveKind::Int),
                    markers: Markers::default(),
                    default: None,
                    declared_type: "i64".to_string(),
                },
                FieldDescriptor {
                    source_name: "label".to_string(),
                    wire_name: "label".to_string(),
                    type_info: TypeInfo::Primitive(PrimitiveKind::String),
                    markers: Markers::default(),
                    default: None,
                    declared_type: "String".to_string(),
                },
            ],
        });
        graph
    }

    #[test]
    fn emits_all_four_entry_points_plus_release_and_pool() {
        let graph = sample_graph();
        let flat = crate::flatten_graph(&graph).unwrap();
        let mut out = String::new();
        CustomEngine.emit_record(&flat[0], &graph, &mut out).unwrap();

        assert!(out.contains("pub fn decode_point("));
        assert!(out.contains("pub fn decode_ptr_point("));
        assert!(out.contains("pub fn decode_slice_point("));
        assert!(out.contains("pub fn decode_ptr_slice_point("));
        assert!(out.contains("pub fn release_point("));
        assert!(out.contains("pub fn point_pool("));
        assert!(out.contains("\"x\" => { out.x = d.decode_int()?; }"));
        assert!(out.contains(
            "\"label\" => { out.label = { let mut s = String::new(); d.decode_string(&mut s)?; s }; }"
        ));
    }
}
