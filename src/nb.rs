//! Scanner and debouncer on top of `embedded-hal-async` delays.
//!
//! Dwell and settle waits become `.await` points, so an async executor can
//! run other tasks while a row is lit or a control settles. The signal state
//! machine has no waits of its own and is shared with the blocking API.

use embedded_hal_async::delay::DelayNs;

use crate::{
    interface::{ControlInputs, MatrixLines},
    scanner::show_row,
    Control, Debouncer, DisplayBuffer, Scanner,
};

impl Scanner {
    /// Renders one frame period, awaiting each dwell. See
    /// [`Scanner::render_frame`].
    pub async fn render_frame_async<M, D>(
        &mut self,
        lines: &mut M,
        buffer: &DisplayBuffer,
        delay: &mut D,
    ) -> Result<(), M::Error>
    where
        M: MatrixLines,
        D: DelayNs,
    {
        let frame_period_us = self.frame_period_us();
        self.render_for_async(lines, buffer, frame_period_us, delay)
            .await
    }

    /// Keeps scanning `buffer` until `duration_us` has elapsed, see
    /// [`Scanner::render_for`].
    pub async fn render_for_async<M, D>(
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
            delay.delay_us(dwell_us).await;
            lines.select_row(row, false)?;

            self.advance(dwell_us);
            remaining_us -= dwell_us;
        }

        Ok(())
    }
}

impl Debouncer {
    /// Samples `control`, awaiting the settle interval if the first read is
    /// asserted. See [`Debouncer::sample`].
    pub async fn sample_async<I, D>(
        &self,
        inputs: &mut I,
        control: Control,
        delay: &mut D,
    ) -> Result<bool, I::Error>
    where
        I: ControlInputs,
        D: DelayNs,
    {
        if !inputs.is_asserted(control)? {
            return Ok(false);
        }

        delay.delay_ms(self.settle_ms()).await;

        let pressed = inputs.is_asserted(control)?;
        if !pressed {
            trace!("{} glitch rejected", control);
        }

        Ok(pressed)
    }
}
