// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Source location tracking.

/// A byte range in the source code. `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// An inclusive range of 1-based line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

/// Precomputed line-start offsets for O(log n) byte-offset → line:col lookup.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Byte offset of the start of each line. line_starts[0] is always 0.
    line_starts: Vec<u32>,
}

impl LineMap {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        LineMap { line_starts }
    }

    /// Convert byte offset to (line, col), both 1-based. O(log n).
    pub fn offset_to_line_col(&self, offset: usize) -> (u32, u32) {
        let offset = offset as u32;
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line = (line_idx + 1) as u32;
        let col = offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// 1-based line holding the byte at `offset`.
    pub fn line_of(&self, offset: usize) -> u32 {
        self.offset_to_line_col(offset).0
    }

    /// Lines covered by a span. The exclusive end is mapped back onto the
    /// last byte, so a span ending right before a newline stays on its line.
    pub fn lines(&self, span: Span) -> LineRange {
        let start = self.line_of(span.start);
        let end = if span.is_empty() {
            start
        } else {
            self.line_of(span.end - 1)
        };
        LineRange { start, end }
    }

    /// Get the source text of a 1-based line number.
    pub fn line_text<'a>(&self, source: &'a str, line: u32) -> Option<&'a str> {
        let idx = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)? as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&s| (s as usize).saturating_sub(1)) // exclude the \n
            .unwrap_or(source.len());
        source.get(start..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_map_to_lines() {
        let src = "package p\n\nfunc f() int {\n\treturn 1\n}\n";
        let lm = LineMap::new(src);
        assert_eq!(lm.offset_to_line_col(0), (1, 1));
        assert_eq!(lm.line_of(11), 3);
        assert_eq!(lm.offset_to_line_col(src.find("return").unwrap()), (4, 2));
        assert_eq!(lm.line_text(src, 3), Some("func f() int {"));
        assert_eq!(lm.line_text(src, 9), None);
    }

    #[test]
    fn span_ending_before_newline_stays_on_line() {
        let src = "func f(a int,\n\tb int) string\n{";
        let lm = LineMap::new(src);
        let sig_end = src.find(" string").unwrap() + " string".len();
        let range = lm.lines(Span::new(0, sig_end));
        assert_eq!(range, LineRange { start: 1, end: 2 });
    }

    #[test]
    fn empty_span_uses_start_line() {
        let lm = LineMap::new("a\nb\n");
        assert_eq!(lm.lines(Span::new(2, 2)), LineRange { start: 2, end: 2 });
    }

    #[test]
    fn span_union() {
        assert_eq!(Span::new(4, 6).to(Span::new(1, 3)), Span::new(1, 6));
    }
}
