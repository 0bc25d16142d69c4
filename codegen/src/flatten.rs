//! Embedded-field flattening: the pre-emit pass that inlines
//! `#[bitjson(embed)]` fields before any code is rendered.

use std::collections::{HashMap, HashSet};

use descriptors::{FieldDescriptor, RecordGraph, RecordId, TypeInfo};

use crate::error::{Error, Result};

/// A record after embedded fields have been inlined. Holds the same shape
/// as [`descriptors::RecordDescriptor`] but is no longer tied to the
/// original graph's field list.
#[derive(Debug, Clone)]
pub struct FlatRecord {
    pub id: RecordId,
    pub name: String,
    pub qualified_name: String,
    pub fields: Vec<FieldDescriptor>,
}

/// Flattens every record in `graph`, in declaration order. Returns
/// [`Error::Cycle`] if an embed chain revisits a record already being
/// flattened (e.g. `A` embeds `B` embeds `A`).
pub fn flatten_graph(graph: &RecordGraph) -> Result<Vec<FlatRecord>> {
    let mut cache: HashMap<RecordId, Vec<FieldDescriptor>> = HashMap::new();
    let mut out = Vec::with_capacity(graph.len());
    for (id, record) in graph.enumerate_records().iter().enumerate() {
        let mut visiting = HashSet::new();
        let fields = flatten_fields(id, graph, &mut cache, &mut visiting)?;
        out.push(FlatRecord {
            id,
            name: record.name.clone(),
            qualified_name: record.qualified_name.clone(),
            fields,
        });
    }
    Ok(out)
}

fn flatten_fields(
    id: RecordId,
    graph: &RecordGraph,
    cache: &mut HashMap<RecordId, Vec<FieldDescriptor>>,
    visiting: &mut HashSet<RecordId>,
) -> Result<Vec<FieldDescriptor>> {
    if let Some(cached) = cache.get(&id) {
        return Ok(cached.clone());
    }
    if !visiting.insert(id) {
        return Err(Error::Cycle {
            path: graph.get(id).qualified_name.clone(),
        });
    }

    let record = graph.get(id);
    let mut fields = Vec::with_capacity(record.fields.len());
    for field in &record.fields {
        if field.markers.embed {
            let target = embed_target(field).ok_or_else(|| Error::MissingRecord {
                record: field.declared_type.clone(),
            })?;
            let inner = flatten_fields(target, graph, cache, visiting)?;
            fields.extend(inner);
        } else {
            fields.push(field.clone());
        }
    }

    visiting.remove(&id);
    cache.insert(id, fields.clone());
    Ok(fields)
}

fn embed_target(field: &FieldDescriptor) -> Option<RecordId> {
    match &field.type_info {
        TypeInfo::RecordRef(id) => Some(*id),
        TypeInfo::PointerTo(inner) => match inner.as_ref() {
            TypeInfo::RecordRef(id) => Some(*id),
            _ => None,
        },
        _ => None,
    }
}
