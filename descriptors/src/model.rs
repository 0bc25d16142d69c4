//! The record-descriptor graph: the structural description consumed by the
//! code emitter.

/// An index into a [`RecordGraph`]'s arena.
pub type RecordId = usize;

/// A primitive JSON-adjacent scalar kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Int,
    Float,
    String,
    Bool,
    Bytes,
}

/// A field's declared type, as a tagged sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeInfo {
    Primitive(PrimitiveKind),
    PointerTo(Box<TypeInfo>),
    SliceOf(Box<TypeInfo>),
    RecordRef(RecordId),
    /// Field is captured verbatim via `capture_raw`, never parsed.
    Raw,
    /// Field's type implements its own decode routine; the emitter
    /// delegates to it instead of generating one.
    CustomDecoded,
}

/// Per-field markers recognized from `#[bitjson(...)]` attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Markers {
    pub raw: bool,
    pub custom: bool,
    pub pointer: bool,
    pub releasable: bool,
    pub allow_single: bool,
    pub embed: bool,
}

/// One field of a [`RecordDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// The Rust field identifier.
    pub source_name: String,
    /// The JSON key this field decodes from.
    pub wire_name: String,
    pub type_info: TypeInfo,
    pub markers: Markers,
    pub default: Option<String>,
    /// The field's type as written in source (e.g. `"MyTimestamp"`,
    /// `"Vec<u8>"`). Carried alongside `type_info` because `CustomDecoded`
    /// and `Raw` erase the concrete type name the emitter still needs to
    /// call into (e.g. `MyTimestamp::decode_custom`).
    pub declared_type: String,
}

/// True if `field` carries the named `#[bitjson(...)]` marker.
#[must_use]
pub fn has_marker(field: &FieldDescriptor, marker: &str) -> bool {
    match marker {
        "raw" => field.markers.raw,
        "custom" => field.markers.custom,
        "pointer" => field.markers.pointer,
        "releasable" => field.markers.releasable,
        "allow_single" => field.markers.allow_single,
        "embed" => field.markers.embed,
        _ => false,
    }
}

/// A record (struct) description: name, qualified path, and fields in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDescriptor {
    pub name: String,
    pub qualified_name: String,
    pub fields: Vec<FieldDescriptor>,
}

/// The full set of records discovered by a [`crate::SourceWalker`] pass,
/// addressed by [`RecordId`].
#[derive(Debug, Default)]
pub struct RecordGraph {
    records: Vec<RecordDescriptor>,
    by_name: std::collections::HashMap<String, RecordId>,
}

impl RecordGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, returning its id. A record with the same
    /// `qualified_name` already present is not duplicated; the existing id
    /// is returned (memoization by qualified name, per the core's nesting
    /// contract).
    pub fn insert(&mut self, record: RecordDescriptor) -> RecordId {
        if let Some(&id) = self.by_name.get(&record.qualified_name) {
            return id;
        }
        let id = self.records.len();
        self.by_name.insert(record.qualified_name.clone(), id);
        self.records.push(record);
        id
    }

    #[must_use]
    pub fn get(&self, id: RecordId) -> &RecordDescriptor {
        &self.records[id]
    }

    pub fn get_mut(&mut self, id: RecordId) -> &mut RecordDescriptor {
        &mut self.records[id]
    }

    #[must_use]
    pub fn id_for_name(&self, qualified_name: &str) -> Option<RecordId> {
        self.by_name.get(qualified_name).copied()
    }

    /// All records, in the order they were first inserted.
    #[must_use]
    pub fn enumerate_records(&self) -> &[RecordDescriptor] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
