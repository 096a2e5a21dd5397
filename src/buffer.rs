//! Owns the immutable input text and answers byte-offset ↔ line/column queries.

/// The immutable input to a single parser scope.
///
/// Created once from the caller's text, lives as long as the enclosing
/// [`crate::SyntaxTree`], and is never mutated. All positions elsewhere in
/// the crate are half-open byte ranges `[start, end)` into this buffer.
pub struct SourceBuffer {
    text: Box<str>,
    /// Byte offset of the start of each line, in ascending order. `line_starts[0]` is
    /// always 0.
    line_starts: Vec<u32>,
}

impl SourceBuffer {
    pub fn new(text: impl Into<Box<str>>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0u32];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i as u32 + 1);
            }
        }
        Self { text, line_starts }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Substring covering the half-open byte range `[start, end)`.
    pub fn slice(&self, start: u32, end: u32) -> &str {
        &self.text[start as usize..end as usize]
    }

    /// 1-based `(line, column)` for a byte offset into this buffer.
    pub fn line_column(&self, offset: u32) -> (u32, u32) {
        line_column_with_starts(&self.text, &self.line_starts, offset)
    }
}

fn line_column_with_starts(text: &str, line_starts: &[u32], offset: u32) -> (u32, u32) {
    let line_idx = match line_starts.binary_search(&offset) {
        Ok(i) => i,
        Err(i) => i - 1,
    };
    let line_start = line_starts[line_idx];
    // Column is a count of UTF-8 chars since line start, matching what editors show.
    let column = text[line_start as usize..offset as usize].chars().count() as u32 + 1;
    (line_idx as u32 + 1, column)
}

/// Standalone version of [`SourceBuffer::line_column`] for callers (the
/// escape preprocessor) that only have raw text, not a buffer, in hand.
pub(crate) fn line_column_of(text: &str, offset: u32) -> (u32, u32) {
    let mut line_starts = vec![0u32];
    for (i, b) in text.bytes().enumerate() {
        if b == b'\n' {
            line_starts.push(i as u32 + 1);
        }
    }
    line_column_with_starts(text, &line_starts, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_first_column() {
        let buf = SourceBuffer::new("class Test {}\n");
        assert_eq!(buf.line_column(0), (1, 1));
    }

    #[test]
    fn line_column_after_newline() {
        let buf = SourceBuffer::new("a\nbc\n");
        // 'b' is byte offset 2, on line 2, column 1.
        assert_eq!(buf.line_column(2), (2, 1));
        // 'c' is byte offset 3, on line 2, column 2.
        assert_eq!(buf.line_column(3), (2, 2));
    }

    #[test]
    fn slice_round_trips() {
        let buf = SourceBuffer::new("class Test {}\n");
        assert_eq!(buf.slice(0, 5), "class");
    }
}
