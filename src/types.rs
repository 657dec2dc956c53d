/// A line of the host document.
///
/// Offsets and lengths are counted in `char`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    /// Offset of the first character of the line.
    pub offset: usize,
    /// Length including the line delimiter, if any.
    pub length: usize,
    /// Length excluding the line delimiter.
    pub editable_length: usize,
}

impl LineSegment {
    /// Offset just past the last editable character.
    pub fn end_offset(&self) -> usize {
        self.offset + self.editable_length
    }
}

/// Region of the document that needs to be redrawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentUpdate {
    /// A single line, zero-based.
    Line(usize),
    /// Everything.
    Full,
}

/// A caret location, zero-based.
///
/// Columns may lie past the end of the line (virtual space).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// The origin location (0, 0).
    pub const ZERO: Location = Location { line: 0, column: 0 };

    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}
