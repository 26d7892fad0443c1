use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use derive_more::Display;
use parking_lot::Mutex;

/// Lifecycle status of the deadline timer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display)]
pub enum TimerState {
    /// No countdown is live. Initial state.
    Paused,

    /// Countdown is running for the current generation.
    Armed,

    /// Terminal state. Notification channel is closed.
    Stopped,
}

/// Fired when the armed duration elapsed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display)]
#[display(fmt = "Timeout for generation {}", generation)]
pub struct TimeoutNotification {
    /// Generation of the countdown that elapsed.
    pub generation: u64,

    /// Moment the countdown worker observed the deadline.
    pub expired_at: Instant,
}

pub(crate) enum CountdownCommand {
    Arm(u64),
    Disarm,
}

pub(crate) type ProtectedSignalState = Arc<Mutex<SignalState>>;

#[derive(Debug)]
pub(crate) struct SignalState {
    status: TimerState,
    generation: u64,
    notification_tx: Option<Sender<TimeoutNotification>>,
    // keeps a handle on the slot so stale notifications can be discarded
    pending_notification_rx: Receiver<TimeoutNotification>,
    countdown_command_tx: Sender<CountdownCommand>,
}

impl SignalState {
    pub fn new(
        countdown_command_tx: Sender<CountdownCommand>,
    ) -> (SignalState, Receiver<TimeoutNotification>) {
        let (notification_tx, notification_rx): (
            Sender<TimeoutNotification>,
            Receiver<TimeoutNotification>,
        ) = crossbeam_channel::bounded(1);

        let state = SignalState {
            status: TimerState::Paused,
            generation: 0,
            notification_tx: Some(notification_tx),
            pending_notification_rx: notification_rx.clone(),
            countdown_command_tx,
        };

        (state, notification_rx)
    }

    pub fn status(&self) -> TimerState {
        self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts a new generation. Returns `None` when the timer is stopped.
    pub fn arm(&mut self) -> Option<u64> {
        if self.status == TimerState::Stopped {
            return None;
        }

        self.generation += 1;
        self.status = TimerState::Armed;
        self.discard_pending_notification();

        // Sent under the state lock: the worker receives arm commands in generation order.
        self.send_countdown_command(CountdownCommand::Arm(self.generation));

        Some(self.generation)
    }

    /// Cancels the live countdown, if any. Returns `false` when the timer is stopped.
    pub fn disarm(&mut self) -> bool {
        match self.status {
            TimerState::Stopped => return false,
            TimerState::Armed => {
                self.generation += 1;
                self.status = TimerState::Paused;
                self.send_countdown_command(CountdownCommand::Disarm);
            }
            TimerState::Paused => {}
        }
        self.discard_pending_notification();

        true
    }

    /// Emits a notification if `generation` is still the armed one.
    pub fn expire(&mut self, generation: u64) -> bool {
        if self.status != TimerState::Armed || self.generation != generation {
            trace!(
                "Stale countdown suppressed: generation {}, current generation {}, status {}",
                generation,
                self.generation,
                self.status
            );
            return false;
        }

        self.status = TimerState::Paused;

        let notification = TimeoutNotification {
            generation,
            expired_at: Instant::now(),
        };

        if let Some(ref notification_tx) = self.notification_tx {
            match notification_tx.try_send(notification) {
                Ok(()) => return true,
                Err(TrySendError::Full(_)) => {
                    debug!("Unconsumed notification is pending. Generation {} coalesced", generation)
                }
                Err(TrySendError::Disconnected(_)) => {
                    error!("Notification channel is disconnected for generation {}", generation)
                }
            }
        }

        false
    }

    /// Moves to the terminal state and closes the notification channel.
    /// Returns `false` if the timer was already stopped.
    pub fn stop(&mut self) -> bool {
        if self.status == TimerState::Stopped {
            return false;
        }

        self.generation += 1;
        self.status = TimerState::Stopped;
        self.discard_pending_notification();

        // the only sender: dropping it disconnects every receiver
        self.notification_tx = None;

        true
    }

    fn discard_pending_notification(&self) {
        while let Ok(notification) = self.pending_notification_rx.try_recv() {
            trace!("Unconsumed notification discarded: {}", notification);
        }
    }

    fn send_countdown_command(&self, command: CountdownCommand) {
        if self.countdown_command_tx.send(command).is_err() {
            error!("Countdown worker is not running. Command dropped");
        }
    }
}
