use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;

use crate::common::{self, Worker};
use crate::configuration::TimerConfiguration;
use crate::errors::{Result, TimerError};
use crate::signal::countdown::{run_countdown, CountdownParams};
use crate::signal::state::{CountdownCommand, ProtectedSignalState, SignalState};

mod countdown;
mod state;


pub use state::{TimeoutNotification, TimerState};

/// Resettable, pausable and stoppable deadline timer.
///
/// Every [`reset`](DeadlineSignal::reset) arms a fresh countdown of the configured
/// duration and invalidates the previous one. When a countdown elapses without an
/// intervening `reset`, `pause` or `stop`, exactly one [`TimeoutNotification`] is
/// delivered on the channel returned by [`receiver`](DeadlineSignal::receiver) and
/// the timer goes back to the paused state.
///
/// [`stop`](DeadlineSignal::stop) is terminal: the notification channel is closed
/// and receivers get `RecvError` instead of blocking. Control calls after `stop`
/// are ignored; use [`try_reset`](DeadlineSignal::try_reset) or
/// [`try_pause`](DeadlineSignal::try_pause) to detect them.
///
/// Clones are handles to the same timer. The timer is stopped and its countdown
/// thread joined when the last handle is dropped.
#[derive(Clone, Debug)]
pub struct DeadlineSignal {
    handle: Arc<SignalHandle>,
}

#[derive(Debug)]
struct SignalHandle {
    name: String,
    duration: Duration,
    protected_state: ProtectedSignalState,
    notification_rx: Receiver<TimeoutNotification>,
    countdown_worker: Mutex<Option<Worker>>,
}

impl DeadlineSignal {
    /// Creates a paused timer with the fixed countdown `duration`.
    pub fn new(duration: Duration) -> Result<DeadlineSignal> {
        DeadlineSignal::with_configuration(TimerConfiguration::new(duration))
    }

    pub fn with_configuration(config: TimerConfiguration) -> Result<DeadlineSignal> {
        config.validate()?;

        let (countdown_command_tx, countdown_command_rx): (
            Sender<CountdownCommand>,
            Receiver<CountdownCommand>,
        ) = crossbeam_channel::unbounded();

        let (state, notification_rx) = SignalState::new(countdown_command_tx);
        let protected_state = Arc::new(Mutex::new(state));

        let countdown_worker = common::run_worker(
            config.name.clone(),
            run_countdown,
            CountdownParams {
                name: config.name.clone(),
                duration: config.duration,
                protected_state: protected_state.clone(),
                countdown_command_rx,
            },
        )?;

        Ok(DeadlineSignal {
            handle: Arc::new(SignalHandle {
                name: config.name,
                duration: config.duration,
                protected_state,
                notification_rx,
                countdown_worker: Mutex::new(Some(countdown_worker)),
            }),
        })
    }

    /// Notification channel. Disconnected once the timer is stopped.
    pub fn receiver(&self) -> Receiver<TimeoutNotification> {
        self.handle.notification_rx.clone()
    }

    /// Re-arms the timer for a full duration starting now. Ignored after `stop`.
    pub fn reset(&self) {
        if let Err(err) = self.try_reset() {
            warn!("Deadline signal '{}' reset ignored: {}", self.handle.name, err);
        }
    }

    pub fn try_reset(&self) -> Result<()> {
        let mut state = self.handle.protected_state.lock();
        match state.arm() {
            Some(generation) => {
                trace!(
                    "Deadline signal '{}' reset: generation {}",
                    self.handle.name,
                    generation
                );
                Ok(())
            }
            None => Err(TimerError::InvalidState(state.status())),
        }
    }

    /// Cancels the pending countdown and any unconsumed notification. Ignored after `stop`.
    pub fn pause(&self) {
        if let Err(err) = self.try_pause() {
            warn!("Deadline signal '{}' pause ignored: {}", self.handle.name, err);
        }
    }

    pub fn try_pause(&self) -> Result<()> {
        let mut state = self.handle.protected_state.lock();
        if state.disarm() {
            Ok(())
        } else {
            Err(TimerError::InvalidState(state.status()))
        }
    }

    /// Stops the timer permanently and closes the notification channel.
    ///
    /// Idempotent. Does not wait for the countdown thread to exit.
    pub fn stop(&self) {
        self.handle.stop();
    }

    pub fn state(&self) -> TimerState {
        self.handle.protected_state.lock().status()
    }

    pub fn is_stopped(&self) -> bool {
        self.state() == TimerState::Stopped
    }

    /// Advances on every `reset`, on a `pause` of an armed timer and on `stop`.
    pub fn generation(&self) -> u64 {
        self.handle.protected_state.lock().generation()
    }

    pub fn duration(&self) -> Duration {
        self.handle.duration
    }
}

impl SignalHandle {
    fn stop(&self) {
        let stopped = self.protected_state.lock().stop();
        if !stopped {
            return;
        }

        info!("Deadline signal '{}' stopped", self.name);
        if let Some(ref worker) = *self.countdown_worker.lock() {
            worker.terminate();
        }
    }
}

impl Drop for SignalHandle {
    fn drop(&mut self) {
        self.stop();

        if let Some(worker) = self.countdown_worker.get_mut().take() {
            worker.join();
        }
    }
}
