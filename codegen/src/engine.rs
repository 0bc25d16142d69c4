//! The shared contract both emission engines implement.

use descriptors::RecordGraph;

use crate::error::Result;
use crate::flatten::FlatRecord;

/// Renders decode routines for one record into `out`.
///
/// Implementations never see the whole graph as a single blob; each call is
/// handed one already-flattened record plus the graph it came from (for
/// resolving `RecordRef` targets by name).
pub trait Engine {
    /// Short identifier used in the emitted module's header comment and by
    /// the CLI's `--engine` flag.
    fn name(&self) -> &'static str;

    /// Emits a `use` (or equivalent) prelude needed once per generated
    /// module, before any record's routines.
    fn emit_prelude(&self, out: &mut String);

    /// Emits the `decode_x` / `decode_ptr_x` / `decode_slice_x` /
    /// `decode_ptr_slice_x` family (plus `release_x` / `x_pool`) for one
    /// record.
    fn emit_record(&self, record: &FlatRecord, graph: &RecordGraph, out: &mut String) -> Result<()>;
}
