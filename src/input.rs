use embedded_hal::delay::DelayNs;

use crate::{interface::ControlInputs, DEBOUNCE_SETTLE_MS};

/// Physical controls of the indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Control {
    /// Turn right switch
    TurnRight,
    /// Turn left switch
    TurnLeft,
    /// Hazard button, also the mode button of the sequential cycle policy
    Hazard,
}

/// Two sample debouncer.
///
/// A control is reported pressed only if it reads asserted, and still reads
/// asserted after the settle interval. Glitches shorter than the settle
/// interval are rejected. A control held down is reported pressed on every
/// sample, edge detection is left to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    settle_ms: u32,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_SETTLE_MS)
    }
}

impl Debouncer {
    pub const fn new(settle_ms: u32) -> Self {
        Self { settle_ms }
    }

    pub const fn settle_ms(&self) -> u32 {
        self.settle_ms
    }

    /// Samples `control`, blocking on `delay` for the settle interval if the
    /// first read is asserted.
    pub fn sample<I, D>(&self, inputs: &mut I, control: Control, delay: &mut D) -> Result<bool, I::Error>
    where
        I: ControlInputs,
        D: DelayNs,
    {
        self.sample_with(inputs, control, |settle_ms| {
            delay.delay_ms(settle_ms);
            Ok(())
        })
    }

    /// Samples `control`, calling `settle` with the settle interval in
    /// milliseconds if the first read is asserted. `settle` has to return
    /// once that much time has passed.
    pub fn sample_with<I, E, W>(&self, inputs: &mut I, control: Control, settle: W) -> Result<bool, E>
    where
        I: ControlInputs,
        E: From<I::Error>,
        W: FnOnce(u32) -> Result<(), E>,
    {
        if !inputs.is_asserted(control)? {
            return Ok(false);
        }

        settle(self.settle_ms)?;

        let pressed = inputs.is_asserted(control)?;
        if !pressed {
            trace!("{} glitch rejected", control);
        }

        Ok(pressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::{mock::Board, PinInputs};
    use embedded_hal_mock::eh1::{
        delay::NoopDelay,
        digital::{Mock as PinMock, State as PinMockState, Transaction as PinTransaction},
    };

    fn hazard_only(transactions: &[PinTransaction]) -> PinInputs<PinMock> {
        PinInputs::new(
            PinMock::new(&[]),
            PinMock::new(&[]),
            PinMock::new(transactions),
        )
    }

    fn done(inputs: PinInputs<PinMock>) {
        let (mut turn_right, mut turn_left, mut hazard) = inputs.release();
        turn_right.done();
        turn_left.done();
        hazard.done();
    }

    #[test]
    fn test_released_control_reads_once() {
        let mut inputs = hazard_only(&[PinTransaction::get(PinMockState::High)]);
        let mut delay = NoopDelay::new();

        let pressed = Debouncer::default()
            .sample(&mut inputs, Control::Hazard, &mut delay)
            .unwrap();

        assert!(!pressed);
        done(inputs);
    }

    #[test]
    fn test_confirmed_press() {
        let mut inputs = hazard_only(&[
            PinTransaction::get(PinMockState::Low),
            PinTransaction::get(PinMockState::Low),
        ]);
        let mut delay = NoopDelay::new();

        let pressed = Debouncer::default()
            .sample(&mut inputs, Control::Hazard, &mut delay)
            .unwrap();

        assert!(pressed);
        done(inputs);
    }

    #[test]
    fn test_bounce_is_rejected() {
        let mut inputs = hazard_only(&[
            PinTransaction::get(PinMockState::Low),
            PinTransaction::get(PinMockState::High),
        ]);
        let mut delay = NoopDelay::new();

        let pressed = Debouncer::default()
            .sample(&mut inputs, Control::Hazard, &mut delay)
            .unwrap();

        assert!(!pressed);
        done(inputs);
    }

    #[test]
    fn test_settle_only_when_first_read_asserted() {
        let board = Board::new();
        board.assert_control(Control::TurnLeft, 0, 1_000);
        let mut inputs = board.inputs();
        let mut delay = board.delay();
        let debouncer = Debouncer::default();

        assert!(!debouncer
            .sample(&mut inputs, Control::TurnRight, &mut delay)
            .unwrap());
        assert_eq!(board.now_ms(), 0);

        assert!(debouncer
            .sample(&mut inputs, Control::TurnLeft, &mut delay)
            .unwrap());
        assert_eq!(board.now_ms(), 50);
        assert_eq!(board.input_reads(), 3);
    }

    #[test]
    fn test_pulse_shorter_than_settle_is_never_pressed() {
        let debouncer = Debouncer::default();

        for pulse_ms in [1, 10, 25, 49] {
            for offset_ms in 0..pulse_ms {
                let board = Board::new();
                board.assert_control(Control::Hazard, 100, 100 + pulse_ms);
                let mut inputs = board.inputs();
                let mut delay = board.delay();

                // move the virtual clock to the sampling instant
                embedded_hal::delay::DelayNs::delay_ms(&mut delay, 100 + offset_ms as u32);

                let pressed = debouncer
                    .sample(&mut inputs, Control::Hazard, &mut delay)
                    .unwrap();
                assert!(!pressed, "pulse of {pulse_ms}ms sampled at +{offset_ms}ms");
            }
        }
    }

    #[test]
    fn test_held_control_is_pressed_on_every_sample() {
        let board = Board::new();
        board.assert_control(Control::Hazard, 0, 500);
        let mut inputs = board.inputs();
        let mut delay = board.delay();
        let debouncer = Debouncer::default();

        let presses = (0..4)
            .filter(|_| {
                debouncer
                    .sample(&mut inputs, Control::Hazard, &mut delay)
                    .unwrap()
            })
            .count();

        assert_eq!(presses, 4);
        assert_eq!(board.now_ms(), 200);
    }

    #[test]
    fn test_sample_with_custom_settle() {
        let board = Board::new();
        board.assert_control(Control::TurnRight, 0, 30);
        let mut inputs = board.inputs();
        let mut settled = 0;

        let pressed = Debouncer::new(20)
            .sample_with(&mut inputs, Control::TurnRight, |ms| {
                settled += ms;
                Ok::<(), crate::Error<core::convert::Infallible>>(())
            })
            .unwrap();

        // the virtual clock never moved, so the second read still sees the press
        assert!(pressed);
        assert_eq!(settled, 20);
    }
}
