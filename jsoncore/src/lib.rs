#![doc = include_str!("../README.md")]

mod decoder;
/// Error types returned by scanning, pumping, and decoding.
pub mod error;
mod pump;
/// The byte-level lexical scanner.
pub mod scanner;

pub use decoder::Decoder;
pub use error::{Error, ErrorType, Result};
