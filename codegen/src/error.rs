//! Errors produced while flattening a record graph or emitting source text.

/// Convenient type alias for `codegen` results.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("record cycle detected: {path}")]
    Cycle { path: String },

    #[error("record `{record}` not found in graph")]
    MissingRecord { record: String },

    #[error("rustfmt failed: {detail}")]
    Format { detail: String },

    #[error("could not invoke rustfmt: {source}")]
    FormatIo {
        #[source]
        source: std::io::Error,
    },

    #[error("could not write output: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },
}
