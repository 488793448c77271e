use std::fmt;

/// Zero-based row and byte column in source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub const ZERO: Self = Self { row: 0, column: 0 };

    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Position reached after reading `text` from `self`.
    pub fn advance(self, text: &str) -> Self {
        match text.rfind('\n') {
            Some(last) => Self {
                row: self.row + text.bytes().filter(|&b| b == b'\n').count(),
                column: text.len() - last - 1,
            },
            None => Self {
                row: self.row,
                column: self.column + text.len(),
            },
        }
    }

    /// Position reached after moving by `extent`, a distance measured as a
    /// position from [`Point::ZERO`].
    pub fn offset_by(self, extent: Point) -> Self {
        if extent.row == 0 {
            Self {
                row: self.row,
                column: self.column + extent.column,
            }
        } else {
            Self {
                row: self.row + extent.row,
                column: extent.column,
            }
        }
    }

    /// Position of byte `offset` in `text`, counting from the start.
    pub fn of_offset(text: &str, offset: usize) -> Self {
        Self::ZERO.advance(&text[..offset])
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}
