//! Byte-level lexical scanner for a single JSON document held in memory.

const WHITESPACE: [bool; 256] = {
    let mut table = [false; 256];
    table[b' ' as usize] = true;
    table[b'\r' as usize] = true;
    table[b'\n' as usize] = true;
    table[b'\t' as usize] = true;
    table
};

const SIMPLE_TOKEN: [bool; 256] = {
    let mut table = [false; 256];
    table[b'{' as usize] = true;
    table[b'}' as usize] = true;
    table[b':' as usize] = true;
    table[b',' as usize] = true;
    table[b'[' as usize] = true;
    table[b']' as usize] = true;
    table
};

/// A single-pass byte classifier over an in-memory JSON buffer.
///
/// `Scanner` never allocates: every token it returns is a sub-slice of the
/// buffer it was constructed with. An empty slice is the only failure
/// signal; callers distinguish a token that ran out mid-scan from one that
/// simply does not match any production by calling [`Scanner::truncated`].
pub struct Scanner<'b> {
    data: &'b [u8],
    off: usize,
    pos: usize,
    /// Set by the last failed `next` when the buffer ran out mid-token
    /// (unterminated string, truncated literal, number cut short before a
    /// required digit); left clear when the failure was a byte sequence
    /// that simply does not match any token production with input left to
    /// examine. Lets callers distinguish `UnexpectedEof` from `Lex`.
    truncated: bool,
}

impl<'b> Scanner<'b> {
    /// Creates a scanner positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'b [u8]) -> Self {
        Scanner {
            data,
            off: 0,
            pos: 0,
            truncated: false,
        }
    }

    /// Start offset of the last token returned by `next`.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.off
    }

    /// One-past-the-end offset of the last token returned by `next`; also
    /// the read cursor for the next call.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length of the underlying buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the underlying buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True after a failed `next` iff the buffer ran out mid-token rather
    /// than containing a byte sequence that simply matches no production.
    #[must_use]
    pub(crate) fn truncated(&self) -> bool {
        self.truncated
    }

    /// Returns the next lexical token, or an empty slice on end-of-input or
    /// a malformed token.
    ///
    /// A valid token begins with one of:
    /// `{ } [ ] : ,`, the literals `true`/`false`/`null`, a double-quoted
    /// string, or a number (`-`/`0`..`9`).
    pub fn next(&mut self) -> &'b [u8] {
        let data = self.data;
        let mut pos = self.pos;
        self.truncated = false;

        while pos < data.len() {
            let c = data[pos];

            if WHITESPACE[c as usize] {
                pos += 1;
                continue;
            }

            if SIMPLE_TOKEN[c as usize] {
                self.off = pos;
                self.pos = pos + 1;
                return &data[pos..self.pos];
            }

            self.off = pos;

            let ok = match c {
                b't' => self.validate_token("true"),
                b'f' => self.validate_token("false"),
                b'n' => self.validate_token("null"),
                b'"' => self.parse_string(),
                _ => self.parse_number(),
            };

            if !ok {
                return &[];
            }
            return &data[self.off..self.pos];
        }

        self.off = pos;
        self.pos = pos;
        self.truncated = true;
        &[]
    }

    fn validate_token(&mut self, expected: &str) -> bool {
        let w = &self.data[self.off..];
        let n = expected.len();
        if w.len() < n {
            self.truncated = true;
            return false;
        }
        if &w[..n] != expected.as_bytes() {
            return false;
        }
        self.pos = self.off + n;
        true
    }

    fn parse_string(&mut self) -> bool {
        let data = self.data;
        let mut pos = self.off + 1;
        while pos < data.len() {
            match data[pos] {
                b'"' => {
                    self.pos = pos + 1;
                    return true;
                }
                b'\\' => {
                    pos += 2;
                    continue;
                }
                _ => {
                    pos += 1;
                }
            }
        }
        self.truncated = true;
        false
    }

    /// Single-pass number DFA. `c` is the byte already observed at `self.off`.
    #[allow(clippy::too_many_lines)]
    fn parse_number(&mut self) -> bool {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum State {
            Begin,
            LeadingZero,
            AnyDigit1,
            Decimal,
            AnyDigit2,
            Exponent,
            ExpSign,
            AnyDigit3,
        }

        let data = self.data;
        let mut pos = self.off;
        let mut state = State::Begin;

        if data[pos] == b'-' {
            pos += 1;
            if pos >= data.len() {
                self.truncated = true;
                return false;
            }
        }

        loop {
            if pos >= data.len() {
                break;
            }
            let elem = data[pos];
            match state {
                State::Begin => {
                    if elem.is_ascii_digit() && elem != b'0' {
                        state = State::AnyDigit1;
                    } else if elem == b'0' {
                        state = State::LeadingZero;
                    } else {
                        return false;
                    }
                }
                State::AnyDigit1 => {
                    if elem.is_ascii_digit() {
                        // stay
                    } else if elem == b'.' {
                        state = State::Decimal;
                    } else if elem == b'e' || elem == b'E' {
                        state = State::Exponent;
                    } else {
                        self.pos = pos;
                        return true;
                    }
                }
                State::LeadingZero => {
                    if elem == b'.' {
                        state = State::Decimal;
                    } else if elem == b'e' || elem == b'E' {
                        state = State::Exponent;
                    } else {
                        self.pos = pos;
                        return true;
                    }
                }
                State::Decimal => {
                    if elem.is_ascii_digit() {
                        state = State::AnyDigit2;
                    } else {
                        return false;
                    }
                }
                State::AnyDigit2 => {
                    if elem.is_ascii_digit() {
                        // stay
                    } else if elem == b'e' || elem == b'E' {
                        state = State::Exponent;
                    } else {
                        self.pos = pos;
                        return true;
                    }
                }
                State::Exponent => {
                    if elem == b'+' || elem == b'-' {
                        state = State::ExpSign;
                    } else if elem.is_ascii_digit() {
                        state = State::AnyDigit3;
                    } else {
                        return false;
                    }
                }
                State::ExpSign => {
                    if elem.is_ascii_digit() {
                        state = State::AnyDigit3;
                    } else {
                        return false;
                    }
                }
                State::AnyDigit3 => {
                    if !elem.is_ascii_digit() {
                        self.pos = pos;
                        return true;
                    }
                }
            }
            pos += 1;
        }

        // Reaching here always means the loop broke on exhaustion (every
        // mismatched-byte path above returns directly), so a non-accepting
        // state at this point is a truncation, not a lex mismatch.
        match state {
            State::LeadingZero | State::AnyDigit1 | State::AnyDigit2 | State::AnyDigit3 => {
                self.pos = pos;
                true
            }
            _ => {
                self.truncated = true;
                false
            }
        }
    }
}
