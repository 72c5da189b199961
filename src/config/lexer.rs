//! Byte-level scanner for `option = value` entries.
//!
//! The grammar is flat, so the scanner is a single forward pass over the
//! buffered file with a position and a line counter. It never looks further
//! ahead than the next byte.
use super::{ParserLimits, SyntaxError};

/// How a value was written in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// `"..."` or `'...'`
    Quoted,
    /// `{ ... }`, possibly spanning several lines
    Braced,
    /// Unquoted token
    Bare,
}

/// One scanned `option = value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub option: String,
    pub value: String,
    pub kind: ValueKind,
    /// 1-based line on which the option name starts.
    pub line: usize,
}

/// Iterator over the entries of a configuration buffer.
///
/// Yields `Err` at most once; the iterator is exhausted after the first
/// structural error.
pub struct Lexer<'a> {
    input: &'a [u8],
    limits: ParserLimits,
    pos: usize,
    line: usize,
    entry_line: usize,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a [u8], limits: &ParserLimits) -> Self {
        Self {
            input,
            limits: *limits,
            pos: 0,
            line: 1,
            entry_line: 1,
            failed: false,
        }
    }

    /// Current 1-based line of the scan position.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Line on which the most recent (possibly failed) entry started.
    pub fn entry_line(&self) -> usize {
        self.entry_line
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn text(&self, start: usize) -> String {
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek().filter(|&b| is_space(b)) {
            if b == b'\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
    }

    /// Skips to and including the end of the current line.
    fn skip_comment(&mut self) {
        tracing::trace!(line = self.line, "Skipping comment");
        while let Some(b) = self.peek() {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                break;
            }
        }
    }

    fn read_option(&mut self) -> Result<String, SyntaxError> {
        let start = self.pos;
        while self.peek().is_some_and(is_option_byte) {
            if self.pos - start == self.limits.max_option_len {
                return Err(SyntaxError::OptionTooLong {
                    max: self.limits.max_option_len,
                });
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(SyntaxError::EmptyOption);
        }
        Ok(self.text(start))
    }

    fn value_too_long(&self, option: &str) -> SyntaxError {
        SyntaxError::ValueTooLong {
            option: option.to_owned(),
            max: self.limits.max_value_len,
        }
    }

    /// Single-line value between two `quote` bytes. The closing quote is consumed.
    fn read_quoted(&mut self, option: &str, quote: u8) -> Result<String, SyntaxError> {
        self.pos += 1;
        let start = self.pos;
        loop {
            match self.peek() {
                None => {
                    return Err(SyntaxError::Unterminated {
                        option: option.to_owned(),
                        delimiter: char::from(quote),
                    })
                }
                Some(b'\n') => {
                    return Err(SyntaxError::NewlineInQuote {
                        option: option.to_owned(),
                    })
                }
                Some(b) if b == quote => break,
                Some(_) => {
                    if self.pos - start == self.limits.max_value_len {
                        return Err(self.value_too_long(option));
                    }
                    self.pos += 1;
                }
            }
        }
        let value = self.text(start);
        self.pos += 1;
        Ok(value)
    }

    /// Everything between `{` and the next `}`, line breaks included.
    fn read_braced(&mut self, option: &str) -> Result<String, SyntaxError> {
        tracing::trace!(line = self.line, option, "Reading multi-line value");
        self.pos += 1;
        let start = self.pos;
        loop {
            match self.peek() {
                None => {
                    return Err(SyntaxError::Unterminated {
                        option: option.to_owned(),
                        delimiter: '}',
                    })
                }
                Some(b'}') => break,
                Some(b) => {
                    if self.pos - start == self.limits.max_value_len {
                        return Err(self.value_too_long(option));
                    }
                    if b == b'\n' {
                        self.line += 1;
                    }
                    self.pos += 1;
                }
            }
        }
        let value = self.text(start);
        self.pos += 1;
        Ok(value)
    }

    fn read_bare(&mut self, option: &str) -> Result<String, SyntaxError> {
        let start = self.pos;
        while self.peek().is_some_and(is_bare_byte) {
            if self.pos - start == self.limits.max_value_len {
                return Err(self.value_too_long(option));
            }
            self.pos += 1;
        }
        Ok(self.text(start))
    }

    /// Scans the next entry. `Ok(None)` means the input ended cleanly.
    fn scan_entry(&mut self) -> Result<Option<Entry>, SyntaxError> {
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Ok(None),
                Some(b'#') => self.skip_comment(),
                Some(_) => break,
            }
        }

        self.entry_line = self.line;
        let option = self.read_option()?;

        self.skip_whitespace();
        if self.peek() != Some(b'=') {
            return Err(SyntaxError::MissingEquals { option });
        }
        self.pos += 1;
        self.skip_whitespace();

        let (value, kind) = match self.peek() {
            Some(quote @ (b'"' | b'\'')) => (self.read_quoted(&option, quote)?, ValueKind::Quoted),
            Some(b'{') => (self.read_braced(&option)?, ValueKind::Braced),
            _ => (self.read_bare(&option)?, ValueKind::Bare),
        };
        self.skip_whitespace();

        tracing::trace!(line = self.entry_line, option = %option, ?kind, "Scanned entry");
        Ok(Some(Entry {
            option,
            value,
            kind,
            line: self.entry_line,
        }))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Entry, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = self.scan_entry().transpose()?;
        self.failed = result.is_err();
        Some(result)
    }
}

/// C `isspace` in the "C" locale.
pub(crate) fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

fn is_print(b: u8) -> bool {
    (0x20..=0x7e).contains(&b)
}

fn is_option_byte(b: u8) -> bool {
    is_print(b) && !matches!(b, b' ' | b'#' | b'=')
}

fn is_bare_byte(b: u8) -> bool {
    is_print(b) && !is_space(b) && b != b'#'
}
