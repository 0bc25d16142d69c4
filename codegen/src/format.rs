//! Optional `rustfmt` pass over emitted source text.

use std::io::Write as _;
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// Pipes `source` through the `rustfmt` binary on `PATH` and returns the
/// formatted text. Callers that want to bypass formatting (e.g. the CLI's
/// `--noformat` switch, or while diagnosing a miscompiling emission) should
/// skip calling this and use the raw text directly.
pub fn format_source(source: &str) -> Result<String> {
    let mut child = Command::new("rustfmt")
        .arg("--edition")
        .arg("2021")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| Error::FormatIo { source })?;

    child
        .stdin
        .take()
        .expect("stdin was piped")
        .write_all(source.as_bytes())
        .map_err(|source| Error::FormatIo { source })?;

    let output = child.wait_with_output().map_err(|source| Error::FormatIo { source })?;

    if !output.status.success() {
        return Err(Error::Format {
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    String::from_utf8(output.stdout).map_err(|e| Error::Format {
        detail: format!("rustfmt produced non-UTF-8 output: {e}"),
    })
}
