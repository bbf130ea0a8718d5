use crate::{Col, Row, SignalState, MATRIX_SIZE};

/// Fixed 6×6 bitmap, stored as one column mask per row.
///
/// Bit `c` of row `r` set means cell `(r, c)` is lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pattern {
    rows: [u8; MATRIX_SIZE],
}

impl Pattern {
    const COLUMN_MASK: u8 = (1 << MATRIX_SIZE) - 1;

    /// All LEDs off.
    pub const IDLE: Pattern = Pattern::from_rows([0; MATRIX_SIZE]);

    /// Main diagonal, (0,0) to (5,5).
    #[rustfmt::skip]
    pub const TURN_RIGHT: Pattern = Pattern::from_rows([
        0b000001,
        0b000010,
        0b000100,
        0b001000,
        0b010000,
        0b100000,
    ]);

    /// Anti diagonal, (0,5) to (5,0).
    #[rustfmt::skip]
    pub const TURN_LEFT: Pattern = Pattern::from_rows([
        0b100000,
        0b010000,
        0b001000,
        0b000100,
        0b000010,
        0b000001,
    ]);

    /// All LEDs lit.
    pub const HAZARD_ON: Pattern = Pattern::from_rows([Self::COLUMN_MASK; MATRIX_SIZE]);

    /// Ring around the border with the corners cut off.
    #[rustfmt::skip]
    pub const STOP: Pattern = Pattern::from_rows([
        0b011110,
        0b100001,
        0b100001,
        0b100001,
        0b100001,
        0b011110,
    ]);

    /// Create a pattern from row masks. Bits above column 5 are dropped.
    pub const fn from_rows(rows: [u8; MATRIX_SIZE]) -> Self {
        let mut masked = [0; MATRIX_SIZE];
        let mut i = 0;
        while i < MATRIX_SIZE {
            masked[i] = rows[i] & Self::COLUMN_MASK;
            i += 1;
        }
        Pattern { rows: masked }
    }

    /// Column mask of `row`.
    pub const fn row_mask(&self, row: Row) -> u8 {
        self.rows[row.index()]
    }

    pub const fn is_lit(&self, row: Row, col: Col) -> bool {
        self.row_mask(row) & (1 << col.index()) != 0
    }

    /// Number of lit cells.
    pub fn lit_count(&self) -> u32 {
        self.rows.iter().map(|mask| mask.count_ones()).sum()
    }
}

/// What a [`SignalState`] shows on the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Display {
    /// A single pattern, shown for as long as the state is active
    Steady(Pattern),
    /// Two patterns alternating with the configured half period, starting with `on`
    Blink { on: Pattern, off: Pattern },
}

impl Display {
    /// Pattern shown first after entering the state.
    pub const fn first(&self) -> Pattern {
        match *self {
            Display::Steady(pattern) => pattern,
            Display::Blink { on, .. } => on,
        }
    }

    /// Pattern of the given blink phase. Steady displays ignore the phase.
    pub const fn phase(&self, lit: bool) -> Pattern {
        match *self {
            Display::Steady(pattern) => pattern,
            Display::Blink { on, off } => {
                if lit {
                    on
                } else {
                    off
                }
            }
        }
    }

    pub const fn blinks(&self) -> bool {
        matches!(self, Display::Blink { .. })
    }
}

impl SignalState {
    /// Patterns associated with this state.
    pub const fn display(self) -> Display {
        match self {
            SignalState::Idle => Display::Steady(Pattern::IDLE),
            SignalState::TurnRight => Display::Steady(Pattern::TURN_RIGHT),
            SignalState::TurnLeft => Display::Steady(Pattern::TURN_LEFT),
            SignalState::Hazard => Display::Blink {
                on: Pattern::HAZARD_ON,
                off: Pattern::IDLE,
            },
            SignalState::Stop => Display::Steady(Pattern::STOP),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_right_is_main_diagonal() {
        for row in Row::ALL {
            for col in Col::ALL {
                assert_eq!(
                    Pattern::TURN_RIGHT.is_lit(row, col),
                    row.index() == col.index(),
                    "cell ({}, {})",
                    row.index(),
                    col.index()
                );
            }
        }
    }

    #[test]
    fn test_turn_left_is_anti_diagonal() {
        for row in Row::ALL {
            for col in Col::ALL {
                assert_eq!(
                    Pattern::TURN_LEFT.is_lit(row, col),
                    row.index() + col.index() == MATRIX_SIZE - 1
                );
            }
        }
    }

    #[test]
    fn test_lit_counts() {
        assert_eq!(Pattern::IDLE.lit_count(), 0);
        assert_eq!(Pattern::TURN_RIGHT.lit_count(), 6);
        assert_eq!(Pattern::TURN_LEFT.lit_count(), 6);
        assert_eq!(Pattern::HAZARD_ON.lit_count(), 36);
        assert_eq!(Pattern::STOP.lit_count(), 16);
    }

    #[test]
    fn test_stop_ring_corners_are_dark() {
        assert!(!Pattern::STOP.is_lit(Row::R0, Col::C0));
        assert!(!Pattern::STOP.is_lit(Row::R0, Col::C5));
        assert!(!Pattern::STOP.is_lit(Row::R5, Col::C0));
        assert!(!Pattern::STOP.is_lit(Row::R5, Col::C5));
        assert!(Pattern::STOP.is_lit(Row::R0, Col::C1));
        assert!(Pattern::STOP.is_lit(Row::R3, Col::C0));
        assert!(!Pattern::STOP.is_lit(Row::R3, Col::C3));
    }

    #[test]
    fn test_from_rows_masks_extra_bits() {
        let pattern = Pattern::from_rows([0xff; MATRIX_SIZE]);
        assert_eq!(pattern, Pattern::HAZARD_ON);
        assert_eq!(pattern.row_mask(Row::R2), 0b111111);
    }

    #[test]
    fn test_state_displays() {
        assert_eq!(
            SignalState::Idle.display(),
            Display::Steady(Pattern::IDLE)
        );
        assert_eq!(
            SignalState::Stop.display(),
            Display::Steady(Pattern::STOP)
        );

        let hazard = SignalState::Hazard.display();
        assert!(hazard.blinks());
        assert_eq!(hazard.first(), Pattern::HAZARD_ON);
        assert_eq!(hazard.phase(false), Pattern::IDLE);

        let right = SignalState::TurnRight.display();
        assert!(!right.blinks());
        assert_eq!(right.phase(false), Pattern::TURN_RIGHT);
    }
}
