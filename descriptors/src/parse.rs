//! Reads Rust source files into a [`RecordGraph`] using `syn`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use quote::ToTokens;
use syn::{Attribute, Fields, Item, ItemImpl, ItemStruct, Type};

use crate::error::{Error, Result};
use crate::model::{FieldDescriptor, Markers, PrimitiveKind, RecordDescriptor, RecordGraph, RecordId, TypeInfo};

const TOOL_ATTR: &str = "bitjson";

/// A struct declaration collected on the first pass, held onto until every
/// record name in the batch is known so field types can reference records
/// declared later in the same file (or a different file).
struct PendingStruct {
    record_id: RecordId,
    item: ItemStruct,
}

/// Walks one or more Rust source files (or directories of them) and builds
/// up a [`RecordGraph`].
///
/// Two passes run over the collected files: the first records every
/// record's name and qualified path so forward references resolve; the
/// second fills in each record's fields. Call [`SourceWalker::walk_path`]
/// for each input path, then [`SourceWalker::finish`] once.
#[derive(Default)]
pub struct SourceWalker {
    graph: RecordGraph,
    structs: Vec<PendingStruct>,
    custom_decoders: HashSet<String>,
    module_path: String,
}

impl SourceWalker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the module path prefix used to build each record's
    /// `qualified_name` (e.g. `"generated"`).
    pub fn set_module_path(&mut self, module_path: impl Into<String>) {
        self.module_path = module_path.into();
    }

    /// Parses `path`: a single `.rs` file, or a directory walked
    /// recursively for `.rs` files (skipping `target/` build directories).
    pub fn walk_path(&mut self, path: &Path) -> Result<()> {
        if path.is_dir() {
            for entry in walk_rs_files(path) {
                self.walk_file(&entry)?;
            }
        } else {
            self.walk_file(path)?;
        }
        Ok(())
    }

    fn walk_file(&mut self, path: &Path) -> Result<()> {
        let src = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file = syn::parse_file(&src).map_err(|source| Error::Parse {
            path: path.display().to_string(),
            source,
        })?;

        for item in file.items {
            match item {
                Item::Struct(s) => self.declare_struct(s),
                Item::Impl(i) => self.visit_impl(&i),
                _ => {}
            }
        }
        Ok(())
    }

    fn visit_impl(&mut self, item: &ItemImpl) {
        let Type::Path(type_path) = &*item.self_ty else {
            return;
        };
        let Some(seg) = type_path.path.segments.last() else {
            return;
        };
        let has_decode_custom = item
            .items
            .iter()
            .any(|i| matches!(i, syn::ImplItem::Fn(f) if f.sig.ident == "decode_custom"));
        if has_decode_custom {
            self.custom_decoders.insert(seg.ident.to_string());
        }
    }

    /// First pass: register the record's name so later field resolution can
    /// see it regardless of declaration order, deferring field inspection.
    fn declare_struct(&mut self, item: ItemStruct) {
        if !matches!(item.fields, Fields::Named(_)) {
            return; // tuple/unit structs are not record-shaped
        }
        let name = item.ident.to_string();
        let qualified_name = if self.module_path.is_empty() {
            name.clone()
        } else {
            format!("{}::{}", self.module_path, name)
        };
        let record_id = self.graph.insert(RecordDescriptor {
            name,
            qualified_name,
            fields: Vec::new(),
        });
        self.structs.push(PendingStruct { record_id, item });
    }

    /// Second pass: resolves every field's type now that all record names
    /// in the batch are registered.
    fn resolve_fields(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.structs);
        for PendingStruct { record_id, item } in &pending {
            let Fields::Named(named) = &item.fields else {
                continue;
            };
            let record_name = self.graph.get(*record_id).name.clone();
            let mut fields = Vec::with_capacity(named.named.len());
            for field in &named.named {
                let source_name = field
                    .ident
                    .as_ref()
                    .map(std::string::ToString::to_string)
                    .unwrap_or_default();
                let markers = read_markers(&field.attrs);
                let wire_name = read_rename(&field.attrs).unwrap_or_else(|| source_name.clone());
                let default = read_default(&field.attrs);
                let declared_type = field.ty.to_token_stream().to_string().replace(' ', "");

                let type_info = if markers.raw {
                    TypeInfo::Raw
                } else if markers.custom {
                    TypeInfo::CustomDecoded
                } else {
                    self.resolve_type(&field.ty, &source_name, &record_name)?
                };

                fields.push(FieldDescriptor {
                    source_name,
                    wire_name,
                    type_info,
                    markers,
                    default,
                    declared_type,
                });
            }
            self.graph.get_mut(*record_id).fields = fields;
        }
        Ok(())
    }

    /// Maps a `syn::Type` to a `TypeInfo`. A named type that is neither a
    /// recognized primitive nor a wrapper (`Option`/`Vec`) nor a type with a
    /// hand-written `decode_custom` is resolved against the record graph;
    /// a type never declared in any walked file is logged and demoted to
    /// `CustomDecoded` so the emitter can still delegate to a hand-written
    /// decoder.
    fn resolve_type(&self, ty: &Type, field_name: &str, record_name: &str) -> Result<TypeInfo> {
        let Type::Path(type_path) = ty else {
            return Err(Error::UnsupportedType {
                record: record_name.to_string(),
                field: field_name.to_string(),
                detail: "only named path types are supported".to_string(),
            });
        };
        let Some(seg) = type_path.path.segments.last() else {
            return Err(Error::UnsupportedType {
                record: record_name.to_string(),
                field: field_name.to_string(),
                detail: "empty type path".to_string(),
            });
        };
        let ident = seg.ident.to_string();

        if ident == "Option" {
            let inner = generic_arg(seg).ok_or_else(|| Error::UnsupportedType {
                record: record_name.to_string(),
                field: field_name.to_string(),
                detail: "Option<..> without a type argument".to_string(),
            })?;
            let inner_info = self.resolve_type(inner, field_name, record_name)?;
            return Ok(TypeInfo::PointerTo(Box::new(inner_info)));
        }

        if ident == "Vec" {
            let inner = generic_arg(seg).ok_or_else(|| Error::UnsupportedType {
                record: record_name.to_string(),
                field: field_name.to_string(),
                detail: "Vec<..> without a type argument".to_string(),
            })?;
            if is_ident(inner, "u8") {
                return Ok(TypeInfo::Primitive(PrimitiveKind::Bytes));
            }
            let inner_info = self.resolve_type(inner, field_name, record_name)?;
            return Ok(TypeInfo::SliceOf(Box::new(inner_info)));
        }

        if let Some(kind) = primitive_kind(&ident) {
            return Ok(TypeInfo::Primitive(kind));
        }

        if ident == "RawMessage" {
            return Ok(TypeInfo::Raw);
        }

        if self.custom_decoders.contains(&ident) {
            return Ok(TypeInfo::CustomDecoded);
        }

        if let Some(id) = self.graph.id_for_name(&ident) {
            return Ok(TypeInfo::RecordRef(id));
        }
        // Also try the qualified form, in case this batch was walked with a
        // module path prefix.
        let qualified = if self.module_path.is_empty() {
            ident.clone()
        } else {
            format!("{}::{}", self.module_path, ident)
        };
        if let Some(id) = self.graph.id_for_name(&qualified) {
            return Ok(TypeInfo::RecordRef(id));
        }

        log::warn!(
            "descriptors: field `{field_name}` of record `{record_name}` references unknown type `{ident}`; treating as custom-decoded"
        );
        Ok(TypeInfo::CustomDecoded)
    }

    /// Resolves every field in the batch and returns the finished graph.
    pub fn finish(mut self) -> Result<RecordGraph> {
        self.resolve_fields()?;
        Ok(self.graph)
    }
}

fn primitive_kind(ident: &str) -> Option<PrimitiveKind> {
    match ident {
        "i8" | "i16" | "i32" | "i64" | "isize" | "u8" | "u16" | "u32" | "u64" | "usize" => {
            Some(PrimitiveKind::Int)
        }
        "f32" | "f64" => Some(PrimitiveKind::Float),
        "String" | "str" => Some(PrimitiveKind::String),
        "bool" => Some(PrimitiveKind::Bool),
        _ => None,
    }
}

fn is_ident(ty: &Type, name: &str) -> bool {
    matches!(ty, Type::Path(p) if p.path.is_ident(name))
}

fn generic_arg(seg: &syn::PathSegment) -> Option<&Type> {
    let syn::PathArguments::AngleBracketed(args) = &seg.arguments else {
        return None;
    };
    args.args.iter().find_map(|a| match a {
        syn::GenericArgument::Type(t) => Some(t),
        _ => None,
    })
}

fn read_markers(attrs: &[Attribute]) -> Markers {
    let mut markers = Markers::default();
    for_each_tool_attr(attrs, |meta| {
        let path = meta.path();
        if path.is_ident("raw") {
            markers.raw = true;
        } else if path.is_ident("custom") {
            markers.custom = true;
        } else if path.is_ident("pointer") {
            markers.pointer = true;
        } else if path.is_ident("releasable") {
            markers.releasable = true;
        } else if path.is_ident("allow_single") {
            markers.allow_single = true;
        } else if path.is_ident("embed") {
            markers.embed = true;
        } else if !path.is_ident("rename") && !path.is_ident("default") {
            log::warn!(
                "descriptors: unknown #[bitjson] option `{}`; ignoring",
                path.get_ident()
                    .map_or_else(|| "?".to_string(), std::string::ToString::to_string)
            );
        }
    });
    markers
}

fn read_rename(attrs: &[Attribute]) -> Option<String> {
    let mut found = None;
    for_each_tool_attr(attrs, |meta| {
        if meta.path().is_ident("rename") {
            if let Ok(value) = meta.require_name_value().and_then(|nv| {
                if let syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(s),
                    ..
                }) = &nv.value
                {
                    Ok(s.value())
                } else {
                    Err(syn::Error::new_spanned(&nv.value, "expected string literal"))
                }
            }) {
                found = Some(value);
            }
        }
    });
    if found.is_none() {
        // Fall back to `#[serde(rename = "...")]` so pre-annotated structs
        // need no changes.
        for attr in attrs {
            if attr.path().is_ident("serde") {
                let _ = attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("rename") {
                        if let Ok(value) = meta.value().and_then(|v| v.parse::<syn::LitStr>()) {
                            found = Some(value.value());
                        }
                    }
                    Ok(())
                });
            }
        }
    }
    found
}

fn read_default(attrs: &[Attribute]) -> Option<String> {
    let mut found = None;
    for_each_tool_attr(attrs, |meta| {
        if meta.path().is_ident("default") {
            if let Ok(nv) = meta.require_name_value() {
                if let syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(s),
                    ..
                }) = &nv.value
                {
                    found = Some(s.value());
                }
            }
        }
    });
    found
}

fn for_each_tool_attr(attrs: &[Attribute], mut f: impl FnMut(&syn::meta::ParseNestedMeta)) {
    for attr in attrs {
        if !attr.path().is_ident(TOOL_ATTR) {
            continue;
        }
        let _ = attr.parse_nested_meta(|meta| {
            f(&meta);
            Ok(())
        });
    }
}

fn walk_rs_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                if path.file_name().and_then(|n| n.to_str()) == Some("target") {
                    continue;
                }
                stack.push(path);
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                out.push(path);
            }
        }
    }
    out.sort();
    out
}

/// Convenience entry point: walks `path`, returning the finished graph.
pub fn graph_for_path(path: &Path, module_path: &str) -> Result<RecordGraph> {
    let mut walker = SourceWalker::new();
    walker.set_module_path(module_path);
    walker.walk_path(path)?;
    walker.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn walk_src(src: &str) -> RecordGraph {
        let mut file = tempfile_with(src);
        let mut walker = SourceWalker::new();
        walker.walk_path(file.path()).unwrap();
        file.flush().unwrap();
        walker.finish().unwrap()
    }

    fn tempfile_with(src: &str) -> NamedFile {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        src.hash(&mut hasher);
        let dir = std::env::temp_dir();
        let path = dir.join(format!("descriptors_test_{}.rs", hasher.finish()));
        std::fs::write(&path, src).unwrap();
        NamedFile { path }
    }

    struct NamedFile {
        path: PathBuf,
    }
    impl NamedFile {
        fn path(&self) -> &Path {
            &self.path
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
    impl Drop for NamedFile {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    #[test]
    fn primitive_fields_resolve() {
        let graph = walk_src(
            r#"
            struct Point {
                x: i64,
                y: f64,
                label: String,
                visible: bool,
            }
            "#,
        );
        assert_eq!(graph.len(), 1);
        let record = graph.get(0);
        assert_eq!(record.fields.len(), 4);
        assert_eq!(record.fields[0].type_info, TypeInfo::Primitive(PrimitiveKind::Int));
        assert_eq!(record.fields[1].type_info, TypeInfo::Primitive(PrimitiveKind::Float));
        assert_eq!(record.fields[2].type_info, TypeInfo::Primitive(PrimitiveKind::String));
        assert_eq!(record.fields[3].type_info, TypeInfo::Primitive(PrimitiveKind::Bool));
    }

    #[test]
    fn forward_reference_resolves() {
        let graph = walk_src(
            r#"
            struct Parent {
                child: Child,
            }
            struct Child {
                value: i64,
            }
            "#,
        );
        let parent = graph.get(graph.id_for_name("Parent").unwrap());
        let child_id = graph.id_for_name("Child").unwrap();
        assert_eq!(parent.fields[0].type_info, TypeInfo::RecordRef(child_id));
    }

    #[test]
    fn option_and_vec_wrap_correctly() {
        let graph = walk_src(
            r#"
            struct Item {
                tags: Vec<String>,
                parent: Option<Item>,
            }
            "#,
        );
        let record = graph.get(0);
        assert_eq!(
            record.fields[0].type_info,
            TypeInfo::SliceOf(Box::new(TypeInfo::Primitive(PrimitiveKind::String)))
        );
        let self_id = graph.id_for_name("Item").unwrap();
        assert_eq!(
            record.fields[1].type_info,
            TypeInfo::PointerTo(Box::new(TypeInfo::RecordRef(self_id)))
        );
    }

    #[test]
    fn bitjson_attributes_are_read() {
        let graph = walk_src(
            r#"
            struct Envelope {
                #[bitjson(rename = "raw_payload", raw)]
                payload: Vec<u8>,
                #[bitjson(custom)]
                timestamp: MyTimestamp,
            }
            "#,
        );
        let record = graph.get(0);
        assert_eq!(record.fields[0].wire_name, "raw_payload");
        assert_eq!(record.fields[0].type_info, TypeInfo::Raw);
        assert!(record.fields[0].markers.raw);
        assert_eq!(record.fields[1].type_info, TypeInfo::CustomDecoded);
    }

    #[test]
    fn unknown_external_type_becomes_custom_decoded() {
        let graph = walk_src(
            r#"
            struct Wrapper {
                inner: SomeExternalCrateType,
            }
            "#,
        );
        assert_eq!(graph.get(0).fields[0].type_info, TypeInfo::CustomDecoded);
    }

    #[test]
    fn vec_u8_is_bytes_not_slice_of_int() {
        let graph = walk_src(
            r#"
            struct Blob {
                data: Vec<u8>,
            }
            "#,
        );
        assert_eq!(
            graph.get(0).fields[0].type_info,
            TypeInfo::Primitive(PrimitiveKind::Bytes)
        );
    }
}
