use crate::{
    Policy, BLINK_HALF_PERIOD_MS, DEBOUNCE_SETTLE_MS, MATRIX_SIZE, MAX_ROW_DWELL_US,
    POLL_FRAMES, ROW_DWELL_US, TURN_WINDOW_MS,
};

/// How long a turn signal stays on the matrix once it has been selected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TurnWindow {
    /// Inputs are evaluated again after every control cycle
    #[default]
    WhileAsserted,
    /// The pattern is held for the given number of milliseconds before inputs
    /// are evaluated again
    Bounded(u32),
}

impl TurnWindow {
    /// Turn signals stay visible for [`TURN_WINDOW_MS`].
    pub const FIXED: TurnWindow = TurnWindow::Bounded(TURN_WINDOW_MS);
}

#[derive(Debug, Clone)]
pub(crate) struct Configuration {
    pub(crate) policy: Policy,
    pub(crate) row_dwell_us: u32,
    pub(crate) settle_ms: u32,
    pub(crate) blink_half_period_ms: u32,
    pub(crate) turn_window: TurnWindow,
    pub(crate) poll_frames: u16,
}

impl Configuration {
    pub(crate) const fn frame_period_us(&self) -> u32 {
        self.row_dwell_us * MATRIX_SIZE as u32
    }

    pub(crate) const fn blink_half_period_us(&self) -> u32 {
        self.blink_half_period_ms.saturating_mul(1_000)
    }

    pub(crate) const fn poll_period_us(&self) -> u32 {
        self.frame_period_us().saturating_mul(self.poll_frames as u32)
    }
}

/// Builder for creating the controller configuration.
///
/// There is no default policy, pick one with [`ConfigBuilder::priority_polling`]
/// or [`ConfigBuilder::sequential_cycle`].
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    pub(crate) configuration: Configuration,
}

macro_rules! builder_property {
    ($field:ident, $field_type:path, $doc:literal) => {
        #[doc = $doc]
        pub fn $field(mut self, $field: $field_type) -> Self {
            self.configuration.$field = $field;
            self
        }
    };
}

macro_rules! new_policy_config {
    ($name:ident, $policy:path, $doc:literal) => {
        #[doc = $doc]
        pub fn $name() -> Self {
            Self::new($policy)
        }
    };
}

impl ConfigBuilder {
    fn new(policy: Policy) -> Self {
        ConfigBuilder {
            configuration: Configuration {
                policy,
                row_dwell_us: ROW_DWELL_US,
                settle_ms: DEBOUNCE_SETTLE_MS,
                blink_half_period_ms: BLINK_HALF_PERIOD_MS,
                turn_window: TurnWindow::WhileAsserted,
                poll_frames: POLL_FRAMES,
            },
        }
    }

    new_policy_config!(
        priority_polling,
        Policy::PriorityPolling,
        "Create a configuration where the highest priority asserted control selects the state."
    );
    new_policy_config!(
        sequential_cycle,
        Policy::SequentialCycle,
        "Create a configuration where presses of the mode button step through all states."
    );

    /// Time each row stays selected during a scan pass.
    ///
    /// Clamped to `1..=MAX_ROW_DWELL_US` so a full frame stays below the
    /// flicker fusion threshold.
    pub fn row_dwell_us(mut self, row_dwell_us: u32) -> Self {
        self.configuration.row_dwell_us = row_dwell_us.clamp(1, MAX_ROW_DWELL_US);
        self
    }

    /// Half period of blinking states, at least 1ms.
    pub fn blink_half_period_ms(mut self, blink_half_period_ms: u32) -> Self {
        self.configuration.blink_half_period_ms = blink_half_period_ms.max(1);
        self
    }

    /// Number of full frames rendered per control cycle, at least one.
    pub fn poll_frames(mut self, poll_frames: u16) -> Self {
        self.configuration.poll_frames = poll_frames.max(1);
        self
    }

    builder_property!(
        settle_ms,
        u32,
        "Wait between the two reads of a debounced sample"
    );
    builder_property!(
        turn_window,
        TurnWindow,
        "How long a turn signal is held before inputs are evaluated again"
    );

    pub fn policy(&self) -> Policy {
        self.configuration.policy
    }

    /// Period of one full scan pass over all rows.
    pub fn frame_period_us(&self) -> u32 {
        self.configuration.frame_period_us()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FLICKER_FUSION_US;

    #[test]
    fn test_config_builder() {
        let builder = ConfigBuilder::sequential_cycle()
            .settle_ms(20)
            .turn_window(TurnWindow::Bounded(800))
            .blink_half_period_ms(400);

        assert_eq!(builder.policy(), Policy::SequentialCycle);
        assert_eq!(builder.configuration.settle_ms, 20);
        assert_eq!(builder.configuration.turn_window, TurnWindow::Bounded(800));
        assert_eq!(builder.configuration.blink_half_period_us(), 400_000);
    }

    #[test]
    fn test_defaults() {
        let builder = ConfigBuilder::priority_polling();

        assert_eq!(builder.policy(), Policy::PriorityPolling);
        assert_eq!(builder.configuration.settle_ms, 50);
        assert_eq!(builder.configuration.blink_half_period_ms, 250);
        assert_eq!(builder.configuration.turn_window, TurnWindow::WhileAsserted);
        assert_eq!(builder.frame_period_us(), 6_000);
        assert_eq!(builder.configuration.poll_period_us(), 6_000);
    }

    #[test]
    fn test_timing_is_clamped() {
        let builder = ConfigBuilder::priority_polling()
            .row_dwell_us(100_000)
            .blink_half_period_ms(0)
            .poll_frames(0);

        assert!(builder.frame_period_us() < FLICKER_FUSION_US);
        assert_eq!(builder.configuration.blink_half_period_ms, 1);
        assert_eq!(builder.configuration.poll_frames, 1);

        let builder = ConfigBuilder::priority_polling().row_dwell_us(0);
        assert_eq!(builder.frame_period_us(), 6);
    }
}
