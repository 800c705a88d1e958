//! Source positions
//!
//! Every node built by the grammar carries the 1-based line and column of
//! its first token. The grammar only knows byte offsets into the input, so
//! a [`LineIndex`] is computed once per parse and consulted whenever a node
//! is constructed.

use std::fmt;

/// Source location information for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Byte offset → (line, column) table for one input.
///
/// `\n` starts a new line and resets the column, `\r` is ignored, every
/// other character advances the column by one. Offsets that fall inside a
/// multi-byte character share that character's position.
#[derive(Debug, Clone)]
pub struct LineIndex {
    positions: Vec<SourceLocation>,
}

impl LineIndex {
    /// Scan `source` once and build the table.
    pub fn new(source: &str) -> Self {
        let mut positions = Vec::with_capacity(source.len() + 1);
        let mut line = 1;
        let mut column = 1;

        for ch in source.chars() {
            let here = SourceLocation::new(line, column);
            for _ in 0..ch.len_utf8() {
                positions.push(here);
            }
            match ch {
                '\n' => {
                    line += 1;
                    column = 1;
                }
                '\r' => {}
                _ => column += 1,
            }
        }
        // One past the end, so end-of-input failures have a position too
        positions.push(SourceLocation::new(line, column));

        Self { positions }
    }

    /// Position of the character starting at `offset`. Offsets past the end
    /// clamp to the end-of-input position.
    pub fn locate(&self, offset: usize) -> SourceLocation {
        let last = self.positions.len() - 1;
        self.positions[offset.min(last)]
    }

    /// Number of addressable offsets (input length + 1).
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.len() <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let index = LineIndex::new("int a;");
        assert_eq!(index.locate(0), SourceLocation::new(1, 1));
        assert_eq!(index.locate(4), SourceLocation::new(1, 5));
        assert_eq!(index.locate(6), SourceLocation::new(1, 7));
    }

    #[test]
    fn test_newline_resets_column() {
        let index = LineIndex::new("a\n  b");
        assert_eq!(index.locate(2), SourceLocation::new(2, 1));
        assert_eq!(index.locate(4), SourceLocation::new(2, 3));
    }

    #[test]
    fn test_carriage_return_ignored() {
        let index = LineIndex::new("a\r\nb c");
        assert_eq!(index.locate(3), SourceLocation::new(2, 1));
        assert_eq!(index.locate(5), SourceLocation::new(2, 3));
    }

    #[test]
    fn test_multibyte_characters() {
        let index = LineIndex::new("\"é\" x");
        // 'é' is two bytes but one column
        assert_eq!(index.locate(1), SourceLocation::new(1, 2));
        assert_eq!(index.locate(2), SourceLocation::new(1, 2));
        assert_eq!(index.locate(5), SourceLocation::new(1, 5));
    }

    #[test]
    fn test_offset_past_end_clamps() {
        let index = LineIndex::new("ab");
        assert_eq!(index.locate(100), SourceLocation::new(1, 3));
        assert_eq!(index.len(), 3);
        assert!(LineIndex::new("").is_empty());
    }
}
