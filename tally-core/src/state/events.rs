//! Input events delivered by the poll loop

/// Debounced falling edge on one of the two input channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    /// Channel 1 (button A) was pressed
    Channel1Fell,
    /// Channel 2 (button B) was pressed
    Channel2Fell,
}

/// Edge flags of both channels for one polling cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputSample {
    pub channel1: bool,
    pub channel2: bool,
}

impl InputSample {
    pub const IDLE: InputSample = InputSample {
        channel1: false,
        channel2: false,
    };

    pub const fn new(channel1: bool, channel2: bool) -> Self {
        Self { channel1, channel2 }
    }

    /// Reduce the sample to at most one event
    ///
    /// Channel 1 is checked first; when both channels fell in the same cycle
    /// the channel 2 edge is dropped.
    pub fn event(&self) -> Option<InputEvent> {
        if self.channel1 {
            Some(InputEvent::Channel1Fell)
        } else if self.channel2 {
            Some(InputEvent::Channel2Fell)
        } else {
            None
        }
    }
}
