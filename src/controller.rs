use core::convert::Infallible;

use embedded_hal::delay::DelayNs;

use crate::{
    interface::{ControlInputs, MatrixLines},
    ConfigBuilder, Debouncer, Display, DisplayBuffer, Policy, Scanner, SignalState,
    StateMachine, TurnWindow,
};

/// Display half of the controller: the buffer, the lines it is scanned onto
/// and the blink phase of the current state.
struct Output<M, D> {
    lines: M,
    delay: D,
    scanner: Scanner,
    buffer: DisplayBuffer,
    display: Display,
    lit: bool,
    phase_elapsed_us: u32,
    blink_half_period_us: u32,
}

impl<M, D> Output<M, D>
where
    M: MatrixLines,
    D: DelayNs,
{
    /// Loads the first pattern of `state` and restarts its blink phase.
    fn apply(&mut self, state: SignalState) {
        self.display = state.display();
        self.lit = true;
        self.phase_elapsed_us = 0;
        self.buffer.load(&self.display.first());
    }

    /// Scans the buffer for `duration_us`, switching blink phases on time.
    ///
    /// The buffer is only reloaded between two dwells, so no row is ever lit
    /// from a half loaded pattern.
    fn show(&mut self, duration_us: u32) -> Result<(), M::Error> {
        let mut remaining_us = duration_us;

        while remaining_us > 0 {
            let slice_us = if self.display.blinks() {
                remaining_us.min(self.blink_half_period_us - self.phase_elapsed_us)
            } else {
                remaining_us
            };

            self.scanner
                .render_for(&mut self.lines, &self.buffer, slice_us, &mut self.delay)?;
            remaining_us -= slice_us;
            self.advance_phase(slice_us);
        }

        Ok(())
    }

    fn advance_phase(&mut self, elapsed_us: u32) {
        if !self.display.blinks() {
            return;
        }

        self.phase_elapsed_us += elapsed_us;
        if self.phase_elapsed_us >= self.blink_half_period_us {
            self.phase_elapsed_us = 0;
            self.lit = !self.lit;
            self.buffer.load(&self.display.phase(self.lit));
        }
    }
}

/// Owns the display buffer and runs the control loop: poll the debounced
/// controls, pick the signal state, keep the matrix scanned.
///
/// Every wait, including the debounce settle interval, is spent scanning, so
/// the matrix never goes dark while the controls are polled.
pub struct Controller<M, I, D> {
    output: Output<M, D>,
    inputs: I,
    debouncer: Debouncer,
    machine: StateMachine,
    turn_window: TurnWindow,
    poll_period_us: u32,
}

/// Errors of the inputs are reported as errors of the matrix lines. With
/// [`PinMatrix`](crate::interface::PinMatrix) and
/// [`PinInputs`](crate::interface::PinInputs) on pins of the same HAL both are
/// [`Error<PE>`](crate::Error) already.
impl<M, I, D> Controller<M, I, D>
where
    M: MatrixLines,
    I: ControlInputs,
    M::Error: From<I::Error>,
    D: DelayNs,
{
    /// Create a new controller with the given `config`.
    ///
    /// All matrix lines are released before the controller is returned. It
    /// starts out `Idle` with an empty buffer.
    pub fn new(config: &ConfigBuilder, mut lines: M, inputs: I, delay: D) -> Result<Self, M::Error> {
        let configuration = &config.configuration;

        lines.blank()?;
        info!(
            "matrix controller started, policy {}, frame period {}us",
            configuration.policy,
            configuration.frame_period_us()
        );

        Ok(Controller {
            output: Output {
                lines,
                delay,
                scanner: Scanner::new(configuration.row_dwell_us),
                buffer: DisplayBuffer::new(),
                display: SignalState::Idle.display(),
                lit: true,
                phase_elapsed_us: 0,
                blink_half_period_us: configuration.blink_half_period_us(),
            },
            inputs,
            debouncer: Debouncer::new(configuration.settle_ms),
            machine: StateMachine::new(configuration.policy),
            turn_window: configuration.turn_window,
            poll_period_us: configuration.poll_period_us(),
        })
    }

    pub fn state(&self) -> SignalState {
        self.machine.state()
    }

    pub fn policy(&self) -> Policy {
        self.machine.policy()
    }

    /// The buffer as it is currently scanned.
    pub fn buffer(&self) -> &DisplayBuffer {
        &self.output.buffer
    }

    /// Runs one control cycle and returns the state it selected.
    pub fn step(&mut self) -> Result<SignalState, M::Error> {
        let Self {
            output,
            inputs,
            debouncer,
            machine,
            ..
        } = self;

        let previous = machine.state();
        let state = machine.poll(|control| {
            debouncer.sample_with(&mut *inputs, control, |settle_ms| {
                output.show(settle_ms.saturating_mul(1_000))
            })
        })?;
        if state != previous {
            output.apply(state);
        }

        let hold_us = self.hold_us(state);
        self.output.show(hold_us)?;

        Ok(state)
    }

    /// Runs control cycles until a pin fails.
    pub fn run(&mut self) -> Result<Infallible, M::Error> {
        loop {
            self.step()?;
        }
    }

    /// Destroys the controller and returns the matrix lines, the inputs and the delay.
    pub fn release(self) -> (M, I, D) {
        (self.output.lines, self.inputs, self.output.delay)
    }

    fn hold_us(&self, state: SignalState) -> u32 {
        match (state, self.turn_window) {
            (SignalState::TurnRight | SignalState::TurnLeft, TurnWindow::Bounded(window_ms)) => {
                window_ms.saturating_mul(1_000).max(self.poll_period_us)
            }
            _ => self.poll_period_us,
        }
    }
}
