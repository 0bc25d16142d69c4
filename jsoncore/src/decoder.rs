//! `Decoder`: sub-document skip/capture and typed primitive decode
//! operations layered on top of the [`Pump`].

use crate::error::{Error, Result};
use crate::pump::Pump;

const NUMBER_START: [bool; 256] = {
    let mut table = [false; 256];
    let mut c = b'0';
    while c <= b'9' {
        table[c as usize] = true;
        c += 1;
    }
    table[b'-' as usize] = true;
    table
};

fn is_number_start(tok: &[u8]) -> bool {
    !tok.is_empty() && NUMBER_START[tok[0] as usize]
}

/// Zero-copy pull decoder over a single contiguous JSON buffer.
///
/// `Decoder` is move-only: it owns the pump's state and a capture mark that
/// both encode positional assumptions about the scanner underneath. It
/// deliberately does not implement `Clone`/`Copy`.
pub struct Decoder<'b> {
    pump: Pump<'b>,
    data: &'b [u8],
    /// Active capture mark; `Some(start)` while `capture_raw` is buffering.
    boff: Option<usize>,
}

impl<'b> Decoder<'b> {
    /// Creates a decoder positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'b [u8]) -> Self {
        Decoder {
            pump: Pump::new(data),
            data,
            boff: None,
        }
    }

    /// Re-initializes the decoder to read `data` from the start. Clears any
    /// in-progress capture.
    pub fn reset(&mut self, data: &'b [u8]) {
        self.pump.reset(data);
        self.data = data;
        self.boff = None;
    }

    /// Start offset of the last token read.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.pump.offset()
    }

    /// Read cursor / one-past-the-end offset of the last token read.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pump.position()
    }

    /// Returns the next logical token (see [`Pump::next_token`]).
    pub fn next_token(&mut self) -> Result<&'b [u8]> {
        self.pump.next_token()
    }

    /// Reads the next token and requires it to equal `expected` exactly
    /// (e.g. `b"{"` or `b"["`), which a generated record decoder uses to
    /// validate the composite it is about to walk without reaching into
    /// `jsoncore`'s error constructors itself.
    pub fn expect_token(&mut self, expected: &[u8]) -> Result<()> {
        let tok = self.next_token()?;
        if tok == expected {
            Ok(())
        } else {
            Err(Error::format(self.offset()))
        }
    }

    /// Interprets an already-read token (typically an object key, captured
    /// by the caller's own field-dispatch loop) as a `&str`. `offset` is
    /// only used to tag a format error if `tok` is not a well-formed JSON
    /// string token.
    pub fn token_as_str<'t>(tok: &'t [u8], offset: usize) -> Result<&'t str> {
        string_token_to_str(tok, offset)
    }

    fn start_buffering(&mut self) {
        assert!(self.boff.is_none(), "jsoncore: capture already in progress");
        self.boff = Some(self.offset());
    }

    fn stop_buffering(&mut self) -> &'b [u8] {
        let start = self
            .boff
            .take()
            .expect("jsoncore: stop_buffering called without an active capture");
        &self.data[start..self.position()]
    }

    /// Consumes and discards one JSON value: a primitive token, or a
    /// balanced `{...}`/`[...]` composite.
    pub fn skip_value(&mut self) -> Result<()> {
        let tok = self.next_token()?;
        match tok[0] {
            b'n' | b't' | b'f' | b'"' => Ok(()),
            _ if is_number_start(tok) => Ok(()),
            b'{' => self.skip_balanced(b'{', b'}', 1),
            b'[' => self.skip_balanced(b'[', b']', 1),
            _ => Err(Error::format(self.offset())),
        }
    }

    fn skip_balanced(&mut self, open: u8, close: u8, mut depth: i32) -> Result<()> {
        loop {
            let tok = self.next_token()?;
            if tok[0] == open {
                depth += 1;
            } else if tok[0] == close {
                depth -= 1;
            }
            if depth == 0 {
                return Ok(());
            }
        }
    }

    /// Consumes one JSON value exactly like [`Decoder::skip_value`], but
    /// returns the raw bytes spanned by it (original whitespace and
    /// formatting preserved, not re-validated).
    ///
    /// Starting a second capture before the first completes is a programmer
    /// error and panics.
    pub fn capture_raw(&mut self) -> Result<&'b [u8]> {
        let tok = self.next_token()?;
        self.start_buffering();
        match tok[0] {
            b'n' | b't' | b'f' | b'"' => Ok(self.stop_buffering()),
            _ if is_number_start(tok) => Ok(self.stop_buffering()),
            b'{' => {
                self.skip_balanced(b'{', b'}', 1)?;
                Ok(self.stop_buffering())
            }
            b'[' => {
                self.skip_balanced(b'[', b']', 1)?;
                Ok(self.stop_buffering())
            }
            _ => {
                self.boff = None;
                Err(Error::format(self.offset()))
            }
        }
    }

    /// Reads the next token and interprets it as either `null` or the start
    /// of an object. Returns `Ok(true)` positioned just past the consumed
    /// `{` (ready for a field-dispatch loop), `Ok(false)` if the token was
    /// `null`. Anything else is a format error. This is the building block
    /// `codegen`'s `decode_ptr_x` family uses to implement "record or
    /// null" without reaching into `jsoncore`'s error constructors itself.
    pub fn expect_object_or_null(&mut self) -> Result<bool> {
        let tok = self.next_token()?;
        match tok {
            b"null" => Ok(false),
            b"{" => Ok(true),
            _ => Err(Error::format(self.offset())),
        }
    }

    /// Like [`Decoder::expect_object_or_null`], but for `[` instead of `{`;
    /// the building block `decode_ptr_slice_x` uses for "array of records,
    /// or null".
    pub fn expect_array_or_null(&mut self) -> Result<bool> {
        let tok = self.next_token()?;
        match tok {
            b"null" => Ok(false),
            b"[" => Ok(true),
            _ => Err(Error::format(self.offset())),
        }
    }

    // -- primitive decoders --------------------------------------------

    /// Decodes a signed 64-bit integer. `null` and non-numbers are format
    /// errors.
    pub fn decode_int(&mut self) -> Result<i64> {
        let tok = self.next_token()?;
        if !is_number_start(tok) {
            return Err(Error::format(self.offset()));
        }
        parse_int(tok, self.offset())
    }

    /// Decodes `null` as `None`, otherwise behaves like [`Decoder::decode_int`].
    pub fn decode_ptr_int(&mut self) -> Result<Option<i64>> {
        let tok = self.next_token()?;
        if tok == b"null" {
            return Ok(None);
        }
        if !is_number_start(tok) {
            return Err(Error::format(self.offset()));
        }
        parse_int(tok, self.offset()).map(Some)
    }

    /// Decodes an IEEE-754 double. `null` and non-numbers are format errors.
    pub fn decode_float64(&mut self) -> Result<f64> {
        let tok = self.next_token()?;
        if !is_number_start(tok) {
            return Err(Error::format(self.offset()));
        }
        let off = self.offset();
        core::str::from_utf8(tok)
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or_else(|| Error::format(off))
    }

    /// Decodes `true`/`false`. Anything else is a format error.
    pub fn decode_bool(&mut self) -> Result<bool> {
        let tok = self.next_token()?;
        match tok {
            b"true" => Ok(true),
            b"false" => Ok(false),
            _ => Err(Error::format(self.offset())),
        }
    }

    /// Decodes a JSON string as a borrowed `&str` aliasing the input
    /// buffer. Escape sequences are preserved verbatim, not interpreted.
    /// `null` is a format error here; see [`Decoder::decode_string`] for the
    /// null-tolerant, owned-copy sibling.
    pub fn decode_str(&mut self) -> Result<&'b str> {
        let tok = self.next_token()?;
        string_token_to_str(tok, self.offset())
    }

    /// Decodes a JSON string into an owned `String`. `null` leaves `dst`
    /// untouched and returns success, matching the original's "copy the
    /// zero value through on null" contract.
    pub fn decode_string(&mut self, dst: &mut String) -> Result<()> {
        let tok = self.next_token()?;
        if tok == b"null" {
            return Ok(());
        }
        let s = string_token_to_str(tok, self.offset())?;
        dst.clear();
        dst.push_str(s);
        Ok(())
    }

    /// Decodes a homogeneous array of strings. `null` yields `None`; an
    /// empty array yields `Some(vec![])`, never `None`.
    pub fn decode_slice_of_string(&mut self) -> Result<Option<Vec<String>>> {
        self.decode_slice_of_string_impl(false)
    }

    /// Like [`Decoder::decode_slice_of_string`], but also accepts a bare
    /// scalar string as a singleton vector.
    pub fn decode_string_or_slice(&mut self) -> Result<Option<Vec<String>>> {
        self.decode_slice_of_string_impl(true)
    }

    fn decode_slice_of_string_impl(&mut self, allow_single: bool) -> Result<Option<Vec<String>>> {
        let tok = self.next_token()?;
        if tok == b"null" {
            return Ok(None);
        }
        if allow_single && !tok.is_empty() && tok[0] == b'"' {
            let s = string_token_to_str(tok, self.offset())?;
            return Ok(Some(vec![s.to_string()]));
        }
        if tok != b"[" {
            return Err(Error::format(self.offset()));
        }

        let mut out = Vec::new();
        let tok = self.next_token()?;
        if tok == b"]" {
            return Ok(Some(out));
        }
        if tok.is_empty() || tok[0] != b'"' {
            return Err(Error::format(self.offset()));
        }
        out.push(string_token_to_str(tok, self.offset())?.to_string());

        loop {
            let tok = self.next_token()?;
            if tok == b"]" {
                break;
            }
            if tok.is_empty() || tok[0] != b'"' {
                return Err(Error::format(self.offset()));
            }
            out.push(string_token_to_str(tok, self.offset())?.to_string());
        }
        Ok(Some(out))
    }

    /// Decodes a homogeneous array of integers. `null` yields `None`; an
    /// empty array yields `Some(vec![])`, never `None`.
    pub fn decode_slice_of_int(&mut self) -> Result<Option<Vec<i64>>> {
        self.decode_slice_of_int_impl(false)
    }

    /// Like [`Decoder::decode_slice_of_int`], but also accepts a bare
    /// scalar integer as a singleton vector.
    pub fn decode_int_or_slice(&mut self) -> Result<Option<Vec<i64>>> {
        self.decode_slice_of_int_impl(true)
    }

    fn decode_slice_of_int_impl(&mut self, allow_single: bool) -> Result<Option<Vec<i64>>> {
        let tok = self.next_token()?;
        if tok == b"null" {
            return Ok(None);
        }
        if allow_single && is_number_start(tok) {
            return parse_int(tok, self.offset()).map(|n| Some(vec![n]));
        }
        if tok != b"[" {
            return Err(Error::format(self.offset()));
        }

        let mut out = Vec::new();
        let tok = self.next_token()?;
        if tok == b"]" {
            return Ok(Some(out));
        }
        if !is_number_start(tok) {
            return Err(Error::format(self.offset()));
        }
        out.push(parse_int(tok, self.offset())?);

        loop {
            let tok = self.next_token()?;
            if tok == b"]" {
                break;
            }
            if !is_number_start(tok) {
                return Err(Error::format(self.offset()));
            }
            out.push(parse_int(tok, self.offset())?);
        }
        Ok(Some(out))
    }
}

fn parse_int(tok: &[u8], offset: usize) -> Result<i64> {
    core::str::from_utf8(tok)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| Error::format(offset))
}

fn string_token_to_str(tok: &[u8], offset: usize) -> Result<&str> {
    if tok.len() < 2 || tok[0] != b'"' {
        return Err(Error::format(offset));
    }
    core::str::from_utf8(&tok[1..tok.len() - 1]).map_err(|_| Error::format(offset))
}
