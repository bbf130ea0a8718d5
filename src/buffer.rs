use crate::{Col, Pattern, Row, MATRIX_SIZE};

/// The 6×6 grid currently being scanned onto the matrix.
///
/// Cells are addressed by [`Row`] and [`Col`], so every access is in range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayBuffer {
    cells: [[bool; MATRIX_SIZE]; MATRIX_SIZE],
}

impl DisplayBuffer {
    /// A buffer with every cell off.
    pub const fn new() -> Self {
        Self {
            cells: [[false; MATRIX_SIZE]; MATRIX_SIZE],
        }
    }

    pub const fn get(&self, row: Row, col: Col) -> bool {
        self.cells[row.index()][col.index()]
    }

    pub fn set(&mut self, row: Row, col: Col, lit: bool) {
        self.cells[row.index()][col.index()] = lit;
    }

    /// Turns every cell off.
    pub fn clear(&mut self) {
        self.cells = [[false; MATRIX_SIZE]; MATRIX_SIZE];
    }

    /// Replaces the whole buffer with `pattern`.
    pub fn load(&mut self, pattern: &Pattern) {
        for row in Row::ALL {
            for col in Col::ALL {
                self.set(row, col, pattern.is_lit(row, col));
            }
        }
    }

    /// Column mask of `row`, bit `c` set if cell `(row, c)` is lit.
    pub fn row_mask(&self, row: Row) -> u8 {
        Col::ALL
            .iter()
            .filter(|col| self.get(row, **col))
            .fold(0, |mask, col| mask | 1 << col.index())
    }

    /// Returns `true` if the buffer holds exactly `pattern`.
    pub fn shows(&self, pattern: &Pattern) -> bool {
        Row::ALL
            .iter()
            .all(|row| self.row_mask(*row) == pattern.row_mask(*row))
    }

    pub fn is_blank(&self) -> bool {
        self.shows(&Pattern::IDLE)
    }

    pub fn lit_count(&self) -> usize {
        self.cells.iter().flatten().filter(|lit| **lit).count()
    }
}

impl From<Pattern> for DisplayBuffer {
    fn from(pattern: Pattern) -> Self {
        let mut buffer = DisplayBuffer::new();
        buffer.load(&pattern);
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_blank() {
        let buffer = DisplayBuffer::new();
        assert!(buffer.is_blank());
        assert_eq!(buffer.lit_count(), 0);
        assert_eq!(buffer, DisplayBuffer::default());
    }

    #[test]
    fn test_set_and_get_every_cell() {
        for row in Row::ALL {
            for col in Col::ALL {
                let mut buffer = DisplayBuffer::new();
                buffer.set(row, col, true);

                assert!(buffer.get(row, col));
                assert_eq!(buffer.lit_count(), 1);
                assert_eq!(buffer.row_mask(row), 1 << col.index());
            }
        }
    }

    #[test]
    fn test_load_replaces_previous_content() {
        let mut buffer = DisplayBuffer::from(Pattern::HAZARD_ON);
        assert_eq!(buffer.lit_count(), 36);

        buffer.load(&Pattern::TURN_LEFT);
        assert!(buffer.shows(&Pattern::TURN_LEFT));
        assert!(buffer.get(Row::R0, Col::C5));
        assert!(!buffer.get(Row::R0, Col::C0));

        buffer.clear();
        assert!(buffer.is_blank());
    }
}
