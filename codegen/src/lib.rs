//! Template-driven decoder emitter.
//!
//! Turns a [`descriptors::RecordGraph`] into Rust source text: one
//! `decode_x`/`decode_ptr_x`/`decode_slice_x`/`decode_ptr_slice_x` family
//! per record, bound either to `jsoncore`'s native decoder or to
//! `serde_json`, depending on the selected [`Engine`].

mod custom;
mod engine;
mod error;
mod fastjson;
mod flatten;
mod format;
mod naming;
mod pooling;
mod types;

pub use custom::CustomEngine;
pub use engine::Engine;
pub use error::{Error, Result};
pub use fastjson::FastjsonEngine;
pub use flatten::{flatten_graph, FlatRecord};
pub use format::format_source;

use descriptors::RecordGraph;

/// Options controlling a single [`generate`] call.
#[derive(Debug, Clone)]
pub struct Options {
    /// Symbolic module name emitted in the header comment.
    pub pkgname: String,
    /// Bypasses `rustfmt` when set, returning the raw emitted text.
    pub noformat: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            pkgname: "generated".to_string(),
            noformat: false,
        }
    }
}

/// Flattens `graph`, renders every record with `engine`, and (unless
/// `opts.noformat`) passes the result through `rustfmt`.
pub fn generate(graph: &RecordGraph, engine: &dyn Engine, opts: &Options) -> Result<String> {
    let flat = flatten_graph(graph)?;

    let mut out = String::new();
    out.push_str(&format!(
        "// Code generated by bitjson-cli ({} engine) for module `{}`. DO NOT EDIT.\n\n",
        engine.name(),
        opts.pkgname
    ));
    engine.emit_prelude(&mut out);
    out.push('\n');

    for record in &flat {
        out.push_str(&format!("// {}: ", record.name));
        let field_types: Vec<String> = record
            .fields
            .iter()
            .map(|f| format!("{} {}", f.wire_name, types::rust_type_name(&f.type_info, graph)))
            .collect();
        out.push_str(&field_types.join(", "));
        out.push('\n');
        engine.emit_record(record, graph, &mut out)?;
        out.push('\n');
    }

    if opts.noformat {
        Ok(out)
    } else {
        format_source(&out)
    }
}
