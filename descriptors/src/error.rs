//! Errors produced while reading source files into a record-descriptor graph.

/// Convenient type alias for `descriptors` results.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {path} as Rust source: {source}")]
    Parse {
        path: String,
        #[source]
        source: syn::Error,
    },

    #[error("unsupported field type on {record}.{field}: {detail}")]
    UnsupportedType {
        record: String,
        field: String,
        detail: String,
    },
}
