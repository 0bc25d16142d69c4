//! Structural description provider.
//!
//! Reads Rust source files annotated with `#[bitjson(...)]` field
//! attributes and produces a [`RecordGraph`]: a memoized, by-qualified-name
//! description of every record's fields, their wire names, and their
//! decode-relevant types. This is the front end the code emitter consumes;
//! it never touches a JSON document itself.

mod error;
mod model;
mod parse;

pub use error::{Error, Result};
pub use model::{
    has_marker, FieldDescriptor, Markers, PrimitiveKind, RecordDescriptor, RecordGraph, RecordId, TypeInfo,
};
pub use parse::{graph_for_path, SourceWalker};
