use embedded_hal::digital::{InputPin, OutputPin, PinState};

use crate::{Col, Control, Error, Row, MATRIX_SIZE};

/// Electrical level that asserts a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Line is asserted when driven or read high
    ActiveHigh,
    /// Line is asserted when driven or read low
    ActiveLow,
}

impl Polarity {
    /// Pin level that puts a line with this polarity into the `active` state.
    pub const fn level(self, active: bool) -> PinState {
        match (self, active) {
            (Polarity::ActiveHigh, true) | (Polarity::ActiveLow, false) => PinState::High,
            (Polarity::ActiveHigh, false) | (Polarity::ActiveLow, true) => PinState::Low,
        }
    }

    /// Whether a pin read as `high` is asserted.
    pub const fn is_active(self, high: bool) -> bool {
        match self {
            Polarity::ActiveHigh => high,
            Polarity::ActiveLow => !high,
        }
    }
}

/// Trait for driving the row select and column lines of the matrix
pub trait MatrixLines {
    type Error;

    /// Asserts or deasserts the select line of `row`.
    fn select_row(&mut self, row: Row, active: bool) -> Result<(), Self::Error>;

    /// Drives the line of `col` so the cell in the selected row is lit or dark.
    fn drive_column(&mut self, col: Col, lit: bool) -> Result<(), Self::Error>;

    /// Deasserts every row and darkens every column.
    fn blank(&mut self) -> Result<(), Self::Error> {
        for row in Row::ALL {
            self.select_row(row, false)?;
        }
        for col in Col::ALL {
            self.drive_column(col, false)?;
        }

        Ok(())
    }
}

/// Trait for reading the raw, undebounced state of the controls
pub trait ControlInputs {
    type Error;

    /// Returns `true` if `control` currently reads as asserted.
    fn is_asserted(&mut self, control: Control) -> Result<bool, Self::Error>;
}

/// [`MatrixLines`] backed by one output pin per row and per column.
pub struct PinMatrix<R, C> {
    rows: [R; MATRIX_SIZE],
    cols: [C; MATRIX_SIZE],
    row_polarity: Polarity,
    col_polarity: Polarity,
}

impl<R, C> PinMatrix<R, C> {
    /// Rows are switched by pulling them low and columns source current when
    /// driven high.
    pub fn new(rows: [R; MATRIX_SIZE], cols: [C; MATRIX_SIZE]) -> Self {
        Self::with_polarity(rows, cols, Polarity::ActiveLow, Polarity::ActiveHigh)
    }

    pub fn with_polarity(
        rows: [R; MATRIX_SIZE],
        cols: [C; MATRIX_SIZE],
        row_polarity: Polarity,
        col_polarity: Polarity,
    ) -> Self {
        Self {
            rows,
            cols,
            row_polarity,
            col_polarity,
        }
    }

    /// Destroys the interface and returns the row and column pins.
    pub fn release(self) -> ([R; MATRIX_SIZE], [C; MATRIX_SIZE]) {
        (self.rows, self.cols)
    }
}

impl<R, C, PE> MatrixLines for PinMatrix<R, C>
where
    R: OutputPin<Error = PE>,
    C: OutputPin<Error = PE>,
{
    type Error = Error<PE>;

    fn select_row(&mut self, row: Row, active: bool) -> Result<(), Self::Error> {
        let level = self.row_polarity.level(active);
        self.rows[row.index()]
            .set_state(level)
            .map_err(Error::Pin)
    }

    fn drive_column(&mut self, col: Col, lit: bool) -> Result<(), Self::Error> {
        let level = self.col_polarity.level(lit);
        self.cols[col.index()]
            .set_state(level)
            .map_err(Error::Pin)
    }
}

/// [`ControlInputs`] backed by one input pin per control.
pub struct PinInputs<P> {
    turn_right: P,
    turn_left: P,
    hazard: P,
    polarity: Polarity,
}

impl<P> PinInputs<P> {
    /// Controls short the pin to ground, pull-ups have to be enabled by the HAL.
    pub fn new(turn_right: P, turn_left: P, hazard: P) -> Self {
        Self::with_polarity(turn_right, turn_left, hazard, Polarity::ActiveLow)
    }

    pub fn with_polarity(turn_right: P, turn_left: P, hazard: P, polarity: Polarity) -> Self {
        Self {
            turn_right,
            turn_left,
            hazard,
            polarity,
        }
    }

    /// Destroys the interface and returns the turn right, turn left and hazard pins.
    pub fn release(self) -> (P, P, P) {
        (self.turn_right, self.turn_left, self.hazard)
    }
}

impl<P, PE> ControlInputs for PinInputs<P>
where
    P: InputPin<Error = PE>,
{
    type Error = Error<PE>;

    fn is_asserted(&mut self, control: Control) -> Result<bool, Self::Error> {
        let pin = match control {
            Control::TurnRight => &mut self.turn_right,
            Control::TurnLeft => &mut self.turn_left,
            Control::Hazard => &mut self.hazard,
        };
        let high = pin.is_high().map_err(Error::Pin)?;

        Ok(self.polarity.is_active(high))
    }
}
