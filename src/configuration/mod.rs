use std::time::Duration;

use crate::errors::{Result, TimerError};

const DEFAULT_TIMER_NAME: &str = "deadline-signal";

/// Deadline timer settings.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TimerConfiguration {
    /// Countdown length for every armed period.
    pub duration: Duration,

    /// Name of the countdown thread. Also used in log messages.
    pub name: String,
}

impl TimerConfiguration {
    pub fn new(duration: Duration) -> TimerConfiguration {
        TimerConfiguration {
            duration,
            name: DEFAULT_TIMER_NAME.to_string(),
        }
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> TimerConfiguration {
        self.name = name.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.duration == Duration::from_secs(0) {
            return Err(TimerError::InvalidDuration(self.duration));
        }

        Ok(())
    }
}
