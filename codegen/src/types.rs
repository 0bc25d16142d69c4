//! Rust type/default rendering shared by both engines.

use descriptors::{PrimitiveKind, RecordGraph, TypeInfo};

/// Renders the Rust type a decoded field of this shape should hold.
#[must_use]
pub fn rust_type_name(ty: &TypeInfo, graph: &RecordGraph) -> String {
    match ty {
        TypeInfo::Primitive(PrimitiveKind::Int) => "i64".to_string(),
        TypeInfo::Primitive(PrimitiveKind::Float) => "f64".to_string(),
        TypeInfo::Primitive(PrimitiveKind::String) => "String".to_string(),
        TypeInfo::Primitive(PrimitiveKind::Bool) => "bool".to_string(),
        TypeInfo::Primitive(PrimitiveKind::Bytes) => "Vec<u8>".to_string(),
        TypeInfo::PointerTo(inner) => format!("Option<{}>", rust_type_name(inner, graph)),
        TypeInfo::SliceOf(inner) => format!("Vec<{}>", rust_type_name(inner, graph)),
        TypeInfo::RecordRef(id) => graph.get(*id).name.clone(),
        TypeInfo::Raw => "Vec<u8>".to_string(),
        TypeInfo::CustomDecoded => "Box<dyn std::any::Any>".to_string(),
    }
}

/// A zero-value expression for `ty`, used when a field's shape is
/// unsupported and its token is skipped rather than decoded.
#[must_use]
pub fn default_expr(ty: &TypeInfo, graph: &RecordGraph) -> String {
    match ty {
        TypeInfo::Primitive(PrimitiveKind::Int) => "0".to_string(),
        TypeInfo::Primitive(PrimitiveKind::Float) => "0.0".to_string(),
        TypeInfo::Primitive(PrimitiveKind::String) => "String::new()".to_string(),
        TypeInfo::Primitive(PrimitiveKind::Bool) => "false".to_string(),
        TypeInfo::Primitive(PrimitiveKind::Bytes) => "Vec::new()".to_string(),
        TypeInfo::PointerTo(_) => "None".to_string(),
        TypeInfo::SliceOf(_) => "Vec::new()".to_string(),
        TypeInfo::RecordRef(id) => format!("{}::default()", graph.get(*id).name),
        TypeInfo::Raw => "Vec::new()".to_string(),
        TypeInfo::CustomDecoded => "Default::default()".to_string(),
    }
}
