/// Terminal buffer dimensions measured in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Index of the bottom row, where the bar lives.
    pub fn last_row(&self) -> u16 {
        self.height.saturating_sub(1)
    }
}

/// Zero-based cursor location within the terminal buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub column: u16,
    pub row: u16,
}

impl Position {
    pub const fn new(column: u16, row: u16) -> Self {
        Self { column, row }
    }

    /// Start of the given row.
    pub const fn row_start(row: u16) -> Self {
        Self { column: 0, row }
    }
}
