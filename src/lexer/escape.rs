//! The escape preprocessor (spec.md §4.1): finds `\uXXXX` Unicode escapes
//! that occur *outside* string/character/text-block literals and records
//! their decoded codepoint and original byte span, without allocating a
//! second copy of the source.
//!
//! Escapes that occur inside a literal are left alone here; the
//! string/char/text-block scanners in `string.rs` decode those themselves,
//! since a literal's own quoting rules (not this preprocessor's odd/even
//! backslash rule) govern what counts as content there.

use crate::diagnostic::Diagnostic;

/// One recognized `\uXXXX` escape (or `\uuXXXX`, `\uuuXXXX`, ... — one or
/// more `u`s is legal) outside any literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EscapeSpan {
    pub start: u32,
    pub end: u32,
    pub decoded: char,
}

#[derive(Debug, Default)]
pub(crate) struct EscapeTable {
    /// Sorted by `start`; scanned linearly since lookups are sequential
    /// (the lexer advances monotonically through the source).
    spans: Vec<EscapeSpan>,
}

impl EscapeTable {
    /// Scans `source` once, in a single pass, tracking only enough literal
    /// state (string / char / text-block) to skip over their contents.
    pub fn scan(source: &str) -> (Self, Vec<Diagnostic>) {
        let bytes = source.as_bytes();
        let len = bytes.len();
        let mut spans = Vec::new();
        let mut diagnostics = Vec::new();

        #[derive(Clone, Copy, PartialEq)]
        enum State {
            Normal,
            InString,
            InChar,
            InTextBlock,
        }

        let mut state = State::Normal;
        let mut i = 0usize;

        while i < len {
            let b = bytes[i];
            match state {
                State::Normal => {
                    if b == b'\\' {
                        let run_start = i;
                        let mut j = i;
                        while j < len && bytes[j] == b'\\' {
                            j += 1;
                        }
                        let backslash_count = j - run_start;
                        if backslash_count % 2 == 1 && j < len && bytes[j] == b'u' {
                            let escape_start = j - 1;
                            let mut k = j;
                            while k < len && bytes[k] == b'u' {
                                k += 1;
                            }
                            if k + 4 <= len && source.is_char_boundary(k) && source.is_char_boundary(k + 4)
                            {
                                let hex = &source[k..k + 4];
                                if hex.len() == 4 && hex.bytes().all(|c| c.is_ascii_hexdigit()) {
                                    let code = u32::from_str_radix(hex, 16)
                                        .expect("validated as four ASCII hex digits");
                                    if let Some(decoded) = char::from_u32(code) {
                                        spans.push(EscapeSpan {
                                            start: escape_start as u32,
                                            end: (k + 4) as u32,
                                            decoded,
                                        });
                                        i = k + 4;
                                        continue;
                                    } else {
                                        diagnostics.push(invalid_escape_diagnostic(
                                            source,
                                            escape_start,
                                            &format!("\\u{hex} is not a valid Unicode codepoint"),
                                        ));
                                    }
                                } else {
                                    diagnostics.push(invalid_escape_diagnostic(
                                        source,
                                        escape_start,
                                        "\\u must be followed by four hexadecimal digits",
                                    ));
                                }
                            } else {
                                diagnostics.push(invalid_escape_diagnostic(
                                    source,
                                    escape_start,
                                    "\\u must be followed by four hexadecimal digits",
                                ));
                            }
                        }
                        i = j.max(i + 1);
                        continue;
                    }
                    if b == b'"' {
                        if i + 2 < len && bytes[i + 1] == b'"' && bytes[i + 2] == b'"' {
                            state = State::InTextBlock;
                            i += 3;
                        } else {
                            state = State::InString;
                            i += 1;
                        }
                        continue;
                    }
                    if b == b'\'' {
                        state = State::InChar;
                        i += 1;
                        continue;
                    }
                    i += 1;
                }
                State::InString | State::InChar => {
                    let closing = if state == State::InString { b'"' } else { b'\'' };
                    if b == b'\\' && i + 1 < len {
                        i += 2;
                        continue;
                    }
                    if b == closing || b == b'\n' {
                        state = State::Normal;
                    }
                    i += 1;
                }
                State::InTextBlock => {
                    if b == b'\\' && i + 1 < len {
                        i += 2;
                        continue;
                    }
                    if b == b'"' && i + 2 < len && bytes[i + 1] == b'"' && bytes[i + 2] == b'"' {
                        state = State::Normal;
                        i += 3;
                        continue;
                    }
                    i += 1;
                }
            }
        }

        (Self { spans }, diagnostics)
    }

    /// Returns the escape starting exactly at `offset`, if any.
    pub fn at(&self, offset: u32) -> Option<EscapeSpan> {
        self.spans
            .binary_search_by_key(&offset, |s| s.start)
            .ok()
            .map(|idx| self.spans[idx])
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

fn invalid_escape_diagnostic(source: &str, offset: usize, message: &str) -> Diagnostic {
    let (line, column) = crate::buffer::line_column_of(source, offset as u32);
    Diagnostic::new(offset as u32, line, column, message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_escape_outside_literal() {
        let (table, diags) = EscapeTable::scan("cl\\u0061ss Foo {}");
        assert!(diags.is_empty());
        let span = table.at(2).expect("escape at offset 2");
        assert_eq!(span.decoded, 'a');
        assert_eq!(span.end, 8);
    }

    #[test]
    fn ignores_escape_inside_string_literal() {
        let (table, diags) = EscapeTable::scan("String s = \"\\u0061\";");
        assert!(diags.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn even_backslash_run_is_not_an_escape() {
        let (table, diags) = EscapeTable::scan("a\\\\u0061b");
        assert!(diags.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn multiple_u_characters_are_accepted() {
        let (table, _) = EscapeTable::scan("\\uuu0061");
        let span = table.at(0).expect("escape at offset 0");
        assert_eq!(span.decoded, 'a');
    }

    #[test]
    fn invalid_hex_digits_report_a_diagnostic() {
        let (table, diags) = EscapeTable::scan("\\uZZZZ");
        assert!(table.is_empty());
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message().contains("hexadecimal"));
    }
}
