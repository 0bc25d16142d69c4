//! Nesting-aware token pump: wraps the [`Scanner`](crate::scanner::Scanner)
//! with a state enum and a delimiter stack, filtering out commas and colons
//! and guaranteeing balanced `{}`/`[]` nesting in its output.

use crate::error::{Error, Result};
use crate::scanner::Scanner;

/// Pump state, closed and small enough to dispatch with a single `match` --
/// no virtual dispatch over state objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Value,
    ObjectString,
    ObjectColon,
    ObjectValue,
    ObjectComma,
    ArrayValue,
    ArrayComma,
    End,
}

/// Nesting stack: `true` means "inside object", `false` means "inside array".
#[derive(Default)]
struct Stack(Vec<bool>);

impl Stack {
    fn push(&mut self, in_object: bool) {
        self.0.push(in_object);
    }

    /// Pops the stack and returns the new top's value, or `false` if empty.
    fn pop(&mut self) -> bool {
        self.0.pop();
        self.0.last().copied().unwrap_or(false)
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn clear(&mut self) {
        self.0.clear();
    }
}

/// Wraps a [`Scanner`] with nesting-aware structural validation.
pub struct Pump<'b> {
    scanner: Scanner<'b>,
    state: State,
    stack: Stack,
}

impl<'b> Pump<'b> {
    #[must_use]
    pub fn new(data: &'b [u8]) -> Self {
        Pump {
            scanner: Scanner::new(data),
            state: State::Value,
            stack: Stack::default(),
        }
    }

    pub fn reset(&mut self, data: &'b [u8]) {
        self.scanner = Scanner::new(data);
        self.state = State::Value;
        self.stack.clear();
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.scanner.offset()
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.scanner.position()
    }

    #[must_use]
    pub(crate) fn scanner(&self) -> &Scanner<'b> {
        &self.scanner
    }

    pub(crate) fn scanner_mut(&mut self) -> &mut Scanner<'b> {
        &mut self.scanner
    }

    /// Returns the next logical token: a delimiter, key, or value, with all
    /// colons and commas elided. `Err(Eof)` signals the normal end of the
    /// document; every other error is a real structural or lexical failure.
    pub fn next_token(&mut self) -> Result<&'b [u8]> {
        match self.state {
            State::Value => self.state_value(),
            State::ObjectString => self.state_object_string(),
            State::ObjectColon => self.state_object_colon(),
            State::ObjectValue => self.state_object_value(),
            State::ObjectComma => self.state_object_comma(),
            State::ArrayValue => self.state_array_value(),
            State::ArrayComma => self.state_array_comma(),
            State::End => Err(Error::eof(self.scanner.position())),
        }
    }

    fn scan_or_unexpected_eof(&mut self) -> Result<&'b [u8]> {
        let tok = self.scanner.next();
        if tok.is_empty() {
            if self.scanner.truncated() {
                return Err(Error::unexpected_eof(self.scanner.position()));
            }
            return Err(Error::lex(self.scanner.offset()));
        }
        Ok(tok)
    }

    // Pops the stack and selects the state that follows closing a composite
    // (`}` or `]`), mirroring the `inObj`/`d.len()` dispatch in the original.
    fn after_close(&mut self) -> State {
        let in_obj = self.stack.pop();
        if self.stack.len() == 0 {
            State::End
        } else if in_obj {
            State::ObjectComma
        } else {
            State::ArrayComma
        }
    }

    fn state_value(&mut self) -> Result<&'b [u8]> {
        let tok = self.scan_or_unexpected_eof()?;
        match tok[0] {
            b'{' => {
                self.state = State::ObjectString;
                self.stack.push(true);
                Ok(tok)
            }
            b'[' => {
                self.state = State::ArrayValue;
                self.stack.push(false);
                Ok(tok)
            }
            b',' => Err(Error::structure(self.scanner.offset(), "unexpected comma")),
            _ => {
                self.state = State::End;
                Ok(tok)
            }
        }
    }

    fn state_object_string(&mut self) -> Result<&'b [u8]> {
        let tok = self.scan_or_unexpected_eof()?;
        match tok[0] {
            b'}' => {
                self.state = self.after_close();
                Ok(tok)
            }
            b'"' => {
                self.state = State::ObjectColon;
                Ok(tok)
            }
            _ => Err(Error::structure(
                self.scanner.offset(),
                "object key must be a string",
            )),
        }
    }

    fn state_object_colon(&mut self) -> Result<&'b [u8]> {
        let tok = self.scan_or_unexpected_eof()?;
        match tok[0] {
            b':' => {
                self.state = State::ObjectValue;
                self.next_token()
            }
            _ => Err(Error::structure(self.scanner.offset(), "expected colon")),
        }
    }

    fn state_object_value(&mut self) -> Result<&'b [u8]> {
        let tok = self.scan_or_unexpected_eof()?;
        match tok[0] {
            b'{' => {
                self.state = State::ObjectString;
                self.stack.push(true);
                Ok(tok)
            }
            b'[' => {
                self.state = State::ArrayValue;
                self.stack.push(false);
                Ok(tok)
            }
            _ => {
                self.state = State::ObjectComma;
                Ok(tok)
            }
        }
    }

    fn state_object_comma(&mut self) -> Result<&'b [u8]> {
        let tok = self.scan_or_unexpected_eof()?;
        match tok[0] {
            b'}' => {
                self.state = self.after_close();
                Ok(tok)
            }
            b',' => {
                self.state = State::ObjectString;
                self.next_token()
            }
            _ => Err(Error::structure(self.scanner.offset(), "expected comma")),
        }
    }

    fn state_array_value(&mut self) -> Result<&'b [u8]> {
        let tok = self.scan_or_unexpected_eof()?;
        match tok[0] {
            b'{' => {
                self.state = State::ObjectString;
                self.stack.push(true);
                Ok(tok)
            }
            b'[' => {
                self.state = State::ArrayValue;
                self.stack.push(false);
                Ok(tok)
            }
            b']' => {
                self.state = self.after_close();
                Ok(tok)
            }
            b',' => Err(Error::structure(self.scanner.offset(), "unexpected comma")),
            _ => {
                self.state = State::ArrayComma;
                Ok(tok)
            }
        }
    }

    fn state_array_comma(&mut self) -> Result<&'b [u8]> {
        let tok = self.scan_or_unexpected_eof()?;
        match tok[0] {
            b']' => {
                self.state = self.after_close();
                Ok(tok)
            }
            b',' => {
                self.state = State::ArrayValue;
                self.next_token()
            }
            _ => Err(Error::structure(self.scanner.offset(), "expected comma")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<String> {
        let mut p = Pump::new(input.as_bytes());
        let mut out = Vec::new();
        loop {
            match p.next_token() {
                Ok(tok) => out.push(String::from_utf8(tok.to_vec()).unwrap()),
                Err(e) if e.is_eof() => break,
                Err(e) => panic!("unexpected error: {e:?}"),
            }
        }
        out
    }

    #[test]
    fn elides_commas_and_colons() {
        let got = tokens(r#"{"a": 1,"b": 123.456, "c": null, "d": [1, -2, "three", true, false, ""]}"#);
        let want: Vec<&str> = vec![
            "{", "\"a\"", "1", "\"b\"", "123.456", "\"c\"", "null", "\"d\"", "[", "1", "-2",
            "\"three\"", "true", "false", "\"\"", "]", "}",
        ];
        assert_eq!(got, want);
    }

    #[test]
    fn rejects_non_string_object_key() {
        let mut p = Pump::new(br#"{{"key":1}:2}"#);
        let mut last_err = None;
        for _ in 0..10 {
            match p.next_token() {
                Ok(_) => {}
                Err(e) => {
                    last_err = Some(e);
                    break;
                }
            }
        }
        let err = last_err.expect("expected a structural error");
        assert!(!err.is_eof());
    }

    #[test]
    fn nested_brackets_balance() {
        let got = tokens("[[[[[[1]]]]]]");
        assert_eq!(got.len(), 14);
        assert_eq!(got.iter().filter(|t| *t == "[").count(), 6);
        assert_eq!(got.iter().filter(|t| *t == "]").count(), 6);
    }

    #[test]
    fn truncated_token_is_unexpected_eof_not_lex() {
        use crate::error::ErrorType;

        for input in [&b"\"abc"[..], b"tru", b"1."] {
            let mut p = Pump::new(input);
            let err = p.next_token().unwrap_err();
            assert_eq!(
                err.error_type,
                ErrorType::UnexpectedEof,
                "input {input:?} should be UnexpectedEof"
            );
        }
    }

    #[test]
    fn malformed_token_with_bytes_remaining_is_lex() {
        use crate::error::ErrorType;

        for input in [&b"+1"[..], b".1"] {
            let mut p = Pump::new(input);
            let err = p.next_token().unwrap_err();
            assert_eq!(err.error_type, ErrorType::Lex, "input {input:?} should be Lex");
        }
    }
}
