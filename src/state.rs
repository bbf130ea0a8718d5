use crate::{Control, SignalState};

/// Rule deciding how sampled controls select the signal state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Policy {
    /// Every cycle the first pressed control out of turn right, turn left and
    /// hazard selects the state, `Idle` if none is pressed. Hazard only blinks
    /// while the button is held. `Stop` is never selected.
    PriorityPolling,
    /// Each new press of the hazard button advances the state to
    /// [`SignalState::next`]. The state persists between presses and the turn
    /// switches are ignored.
    SequentialCycle,
}

/// Controls in the order they are polled, with the state each one selects.
const PRIORITY: [(Control, SignalState); 3] = [
    (Control::TurnRight, SignalState::TurnRight),
    (Control::TurnLeft, SignalState::TurnLeft),
    (Control::Hazard, SignalState::Hazard),
];

/// Decides the signal state from sampled controls.
#[derive(Debug, Clone)]
pub struct StateMachine {
    policy: Policy,
    state: SignalState,
    mode_button_held: bool,
}

impl StateMachine {
    pub const fn new(policy: Policy) -> Self {
        Self {
            policy,
            state: SignalState::Idle,
            mode_button_held: false,
        }
    }

    pub const fn policy(&self) -> Policy {
        self.policy
    }

    pub const fn state(&self) -> SignalState {
        self.state
    }

    /// Runs one control cycle.
    ///
    /// `sample` is called for each control that has to be looked at and
    /// returns whether it is pressed. Under [`Policy::PriorityPolling`]
    /// sampling stops at the first pressed control.
    pub fn poll<E, F>(&mut self, mut sample: F) -> Result<SignalState, E>
    where
        F: FnMut(Control) -> Result<bool, E>,
    {
        let next = match self.policy {
            Policy::PriorityPolling => {
                let mut selected = SignalState::Idle;
                for (control, state) in PRIORITY {
                    if sample(control)? {
                        selected = state;
                        break;
                    }
                }
                selected
            }
            Policy::SequentialCycle => {
                let pressed = sample(Control::Hazard)?;
                let press_event = pressed && !self.mode_button_held;
                self.mode_button_held = pressed;

                if press_event {
                    self.state.next()
                } else {
                    self.state
                }
            }
        };

        if next != self.state {
            debug!("state {} -> {}", self.state, next);
        }
        self.state = next;

        Ok(next)
    }
}
