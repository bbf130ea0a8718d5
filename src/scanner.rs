use embedded_hal::delay::DelayNs;

use crate::{
    interface::MatrixLines, Col, DisplayBuffer, Row, MATRIX_SIZE, MAX_ROW_DWELL_US, ROW_DWELL_US,
};

/// Paints a [`DisplayBuffer`] onto the matrix one row at a time.
///
/// A single frame only lights each row for one dwell interval. To show a
/// steady image the scanner has to run continuously, use
/// [`Scanner::render_for`] for anything that should stay visible.
///
/// The scan position is kept between calls. Consecutive renders continue the
/// same row sequence, so no row waits longer than one frame period to be
/// selected again, however the rendering is split up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scanner {
    row_dwell_us: u32,
    row: Row,
    row_lit_us: u32,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(ROW_DWELL_US)
    }
}

impl Scanner {
    /// The dwell is clamped to `1..=MAX_ROW_DWELL_US`.
    pub const fn new(row_dwell_us: u32) -> Self {
        let row_dwell_us = if row_dwell_us == 0 {
            1
        } else if row_dwell_us > MAX_ROW_DWELL_US {
            MAX_ROW_DWELL_US
        } else {
            row_dwell_us
        };

        Self {
            row_dwell_us,
            row: Row::R0,
            row_lit_us: 0,
        }
    }

    pub const fn row_dwell_us(&self) -> u32 {
        self.row_dwell_us
    }

    /// Duration of one full pass over all rows.
    pub const fn frame_period_us(&self) -> u32 {
        self.row_dwell_us * MATRIX_SIZE as u32
    }

    /// Renders one frame period. A fresh scanner lights rows 0 to 5 in order.
    pub fn render_frame<M, D>(
        &mut self,
        lines: &mut M,
        buffer: &DisplayBuffer,
        delay: &mut D,
    ) -> Result<(), M::Error>
    where
        M: MatrixLines,
        D: DelayNs,
    {
        self.render_for(lines, buffer, self.frame_period_us(), delay)
    }

    /// Keeps scanning `buffer` until `duration_us` has elapsed.
    ///
    /// The last dwell is cut short so the total is exactly `duration_us`. The
    /// next call lights that row again for the rest of its dwell.
    pub fn render_for<M, D>(
        &mut self,
        lines: &mut M,
        buffer: &DisplayBuffer,
        duration_us: u32,
        delay: &mut D,
    ) -> Result<(), M::Error>
    where
        M: MatrixLines,
        D: DelayNs,
    {
        let mut remaining_us = duration_us;

        while remaining_us > 0 {
            let (row, dwell_us) = self.next_dwell(remaining_us);

            show_row(lines, buffer, row)?;
            delay.delay_us(dwell_us);
            lines.select_row(row, false)?;

            self.advance(dwell_us);
            remaining_us -= dwell_us;
        }

        Ok(())
    }

    /// Row to light next and for how long, with `remaining_us` left to render.
    pub(crate) fn next_dwell(&self, remaining_us: u32) -> (Row, u32) {
        let dwell_us = (self.row_dwell_us - self.row_lit_us).min(remaining_us);
        (self.row, dwell_us)
    }

    /// Books `dwell_us` on the current row and moves on once its dwell is
    /// complete.
    pub(crate) fn advance(&mut self, dwell_us: u32) {
        self.row_lit_us += dwell_us;
        if self.row_lit_us >= self.row_dwell_us {
            self.row_lit_us = 0;
            self.row = self.row.next();
        }
    }
}

/// Drives the columns of `row` and selects it. The previous row has to be
/// deselected already.
pub(crate) fn show_row<M: MatrixLines>(
    lines: &mut M,
    buffer: &DisplayBuffer,
    row: Row,
) -> Result<(), M::Error> {
    for col in Col::ALL {
        lines.drive_column(col, buffer.get(row, col))?;
    }
    lines.select_row(row, true)
}
