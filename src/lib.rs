#![warn(missing_debug_implementations, unsafe_code)]

//! Election deadline timer for Raft-style followers.
//!
//! [`DeadlineSignal`] counts down a fixed duration after each
//! [`reset`](DeadlineSignal::reset) and delivers a single
//! [`TimeoutNotification`] through a crossbeam channel when the duration
//! elapses without another `reset`, `pause` or `stop`. Stopping the timer
//! closes the channel, which lets consumer loops exit.

#[macro_use] extern crate log;
#[macro_use] extern crate crossbeam_channel;

mod common;
mod configuration;
mod errors;
mod signal;

pub use configuration::TimerConfiguration;
pub use errors::TimerError;
pub use signal::{DeadlineSignal, TimeoutNotification, TimerState};
