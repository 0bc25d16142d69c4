//! Error types for `jsoncore`.

/// Convenient type alias for `jsoncore` results.
pub type Result<T> = core::result::Result<T, Error>;

/// The kind of error produced while scanning, pumping, or decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ErrorType {
    /// Normal end of document, after a complete top-level value was read.
    #[error("end of input")]
    Eof,
    /// A token was started but the buffer ran out before it completed.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// The byte sequence does not match any token production.
    #[error("invalid JSON token")]
    Lex,
    /// The token is lexically valid but violates object/array structure.
    #[error("{0}")]
    Structure(&'static str),
    /// A well-formed token of the wrong shape was handed to a primitive decoder.
    #[error("format error")]
    Format,
}

/// An error from a `jsoncore` operation, tagged with the byte index at which
/// it was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{error_type} at byte {index}")]
pub struct Error {
    /// What went wrong.
    pub error_type: ErrorType,
    /// Byte offset into the input buffer where the error was detected.
    pub index: usize,
}

impl Error {
    pub(crate) fn new(error_type: ErrorType, index: usize) -> Self {
        Error { error_type, index }
    }

    pub(crate) fn eof(index: usize) -> Self {
        Self::new(ErrorType::Eof, index)
    }

    pub(crate) fn unexpected_eof(index: usize) -> Self {
        Self::new(ErrorType::UnexpectedEof, index)
    }

    pub(crate) fn lex(index: usize) -> Self {
        Self::new(ErrorType::Lex, index)
    }

    pub(crate) fn structure(index: usize, msg: &'static str) -> Self {
        Self::new(ErrorType::Structure(msg), index)
    }

    /// Builds a [`ErrorType::Format`] error at `index`. Public so that
    /// `codegen`-emitted record decoders (outside this crate) can report a
    /// wrong-shape element the same way `jsoncore`'s own primitive decoders
    /// do, without inventing a second error type.
    #[must_use]
    pub fn format(index: usize) -> Self {
        Self::new(ErrorType::Format, index)
    }

    /// True if this error is the normal end-of-document signal rather than a
    /// real failure.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self.error_type, ErrorType::Eof)
    }
}
