//! Driver for a multiplexed 6×6 LED matrix used as a vehicle turn signal,
//! hazard and stop indicator.
//!
//! The matrix has one select line per row and one drive line per column, so
//! only a single row can be lit at a time. The [`Scanner`] paints the
//! [`DisplayBuffer`] row by row fast enough for persistence of vision, while
//! the [`Controller`] polls debounced inputs and decides which pattern the
//! buffer holds.
//!
//! GPIO and timing are consumed through `embedded-hal` traits, see
//! [`interface::PinMatrix`] and [`interface::PinInputs`].

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

mod buffer;
mod configuration;
mod controller;
mod input;
pub mod interface;
pub mod nb;
mod pattern;
mod scanner;
mod state;

pub use buffer::DisplayBuffer;
pub use configuration::{ConfigBuilder, TurnWindow};
pub use controller::Controller;
pub use input::{Control, Debouncer};
pub use pattern::{Display, Pattern};
pub use scanner::Scanner;
pub use state::{Policy, StateMachine};

/// Error enum for the matrix driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<PE> {
    /// A GPIO pin operation has failed
    Pin(PE),
}

/// Number of rows and columns of the matrix.
pub const MATRIX_SIZE: usize = 6;

/// Default time a row stays selected during one scan pass (1ms).
pub const ROW_DWELL_US: u32 = 1_000;

/// Upper bound for a full frame. Slower refresh rates are perceived as flicker.
pub const FLICKER_FUSION_US: u32 = 16_000;

/// Largest row dwell that keeps the frame period below [`FLICKER_FUSION_US`].
pub const MAX_ROW_DWELL_US: u32 = FLICKER_FUSION_US / MATRIX_SIZE as u32 - 1;

/// Time between the two reads of a debounced sample.
pub const DEBOUNCE_SETTLE_MS: u32 = 50;

/// Duration of each of the two hazard blink phases.
pub const BLINK_HALF_PERIOD_MS: u32 = 250;

/// Full frames rendered per control cycle.
pub const POLL_FRAMES: u16 = 1;

/// Visible window of a bounded turn signal before inputs are evaluated again.
pub const TURN_WINDOW_MS: u32 = 1_000;

macro_rules! matrix_line {
    ($name:ident, $doc:literal, $($variant:ident = $index:literal),+ $(,)?) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        pub enum $name {
            $(
                #[doc = concat!("Line ", stringify!($index))]
                $variant,
            )+
        }

        impl $name {
            /// All lines in scan order.
            pub const ALL: [$name; MATRIX_SIZE] = [$($name::$variant),+];

            /// Zero based position of this line.
            pub const fn index(self) -> usize {
                match self {
                    $($name::$variant => $index,)+
                }
            }

            /// Following line in scan order, wrapping around after the last one.
            pub const fn next(self) -> Self {
                Self::ALL[(self.index() + 1) % MATRIX_SIZE]
            }

            /// Line at `index`, or `None` if `index` is outside the matrix.
            pub const fn from_index(index: usize) -> Option<Self> {
                match index {
                    $($index => Some($name::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

matrix_line!(Row, "Row select line of the matrix", R0 = 0, R1 = 1, R2 = 2, R3 = 3, R4 = 4, R5 = 5);
matrix_line!(Col, "Column drive line of the matrix", C0 = 0, C1 = 1, C2 = 2, C3 = 3, C4 = 4, C5 = 5);

/// Visual state of the indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SignalState {
    /// All LEDs off
    #[default]
    Idle,
    /// Main diagonal
    TurnRight,
    /// Anti diagonal
    TurnLeft,
    /// Whole matrix blinking
    Hazard,
    /// Ring
    Stop,
}

impl SignalState {
    /// All states in cycle order.
    pub const ALL: [SignalState; 5] = [
        SignalState::Idle,
        SignalState::TurnRight,
        SignalState::TurnLeft,
        SignalState::Hazard,
        SignalState::Stop,
    ];

    /// The state following `self` in cycle order, wrapping from `Stop` to `Idle`.
    pub const fn next(self) -> Self {
        match self {
            SignalState::Idle => SignalState::TurnRight,
            SignalState::TurnRight => SignalState::TurnLeft,
            SignalState::TurnLeft => SignalState::Hazard,
            SignalState::Hazard => SignalState::Stop,
            SignalState::Stop => SignalState::Idle,
        }
    }
}
