use std::error::Error;
use std::time::Duration;

use derive_more::Display;

use crate::signal::TimerState;

/// Errors reported by the deadline timer.
#[derive(Clone, Debug, Eq, PartialEq, Display)]
pub enum TimerError {
	/// Timer duration must be positive.
	#[display(fmt = "Invalid timer duration: {:?}. Duration must be positive", _0)]
	InvalidDuration(Duration),

	/// Control operation was called on a stopped timer.
	#[display(fmt = "Invalid timer state: {}. Control operations are not allowed", _0)]
	InvalidState(TimerState),

	/// Countdown worker thread could not be started.
	#[display(fmt = "Cannot start countdown worker. Cause: {}", _0)]
	WorkerSpawn(String),
}

pub(crate) type Result<T> = std::result::Result<T, TimerError>;

impl Error for TimerError {}
