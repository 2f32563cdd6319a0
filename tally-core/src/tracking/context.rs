//! Per-session tracking context

use super::TimeStamp;

/// Time-in and time-out of the current (or most recent) session
///
/// One instance lives in the machine's context and is handed to every state
/// operation, so the stamp captured on entering Tracking1 is still visible
/// when VoiceNote captures the time-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrackingContext {
    time_in: Option<TimeStamp>,
    time_out: Option<TimeStamp>,
}

impl TrackingContext {
    pub const fn new() -> Self {
        Self {
            time_in: None,
            time_out: None,
        }
    }

    /// Start a new session at `time_in`, discarding the previous session
    pub fn begin_session(&mut self, time_in: TimeStamp) {
        self.time_in = Some(time_in);
        self.time_out = None;
    }

    /// Record the end of the current session
    pub fn end_session(&mut self, time_out: TimeStamp) {
        self.time_out = Some(time_out);
    }

    /// Forget both timestamps
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn time_in(&self) -> Option<TimeStamp> {
        self.time_in
    }

    pub fn time_out(&self) -> Option<TimeStamp> {
        self.time_out
    }

    /// A session was started and has not been closed yet
    pub fn is_open(&self) -> bool {
        self.time_in.is_some() && self.time_out.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp(hour: u8, minute: u8, second: u8) -> TimeStamp {
        TimeStamp::new(2024, 3, 1, hour, minute, second).unwrap()
    }

    #[test]
    fn test_new_context_is_empty() {
        let ctx = TrackingContext::new();
        assert_eq!(ctx.time_in(), None);
        assert_eq!(ctx.time_out(), None);
        assert!(!ctx.is_open());
    }

    #[test]
    fn test_session_lifecycle() {
        let mut ctx = TrackingContext::new();

        ctx.begin_session(stamp(9, 15, 30));
        assert_eq!(ctx.time_in(), Some(stamp(9, 15, 30)));
        assert!(ctx.is_open());

        ctx.end_session(stamp(10, 0, 5));
        assert_eq!(ctx.time_out(), Some(stamp(10, 0, 5)));
        assert!(!ctx.is_open());
    }

    #[test]
    fn test_new_session_clears_previous_time_out() {
        let mut ctx = TrackingContext::new();
        ctx.begin_session(stamp(9, 0, 0));
        ctx.end_session(stamp(9, 30, 0));

        ctx.begin_session(stamp(11, 0, 0));
        assert_eq!(ctx.time_in(), Some(stamp(11, 0, 0)));
        assert_eq!(ctx.time_out(), None);
    }

    #[test]
    fn test_clear() {
        let mut ctx = TrackingContext::new();
        ctx.begin_session(stamp(9, 0, 0));
        ctx.clear();
        assert_eq!(ctx, TrackingContext::default());
    }
}
