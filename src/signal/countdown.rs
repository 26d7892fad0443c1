use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvError};

use crate::signal::state::{CountdownCommand, ProtectedSignalState};

pub(crate) struct CountdownParams {
    pub name: String,
    pub duration: Duration,
    pub protected_state: ProtectedSignalState,
    pub countdown_command_rx: Receiver<CountdownCommand>,
}

enum CountdownEvent {
    Terminate(bool),
    Command(Result<CountdownCommand, RecvError>),
    DeadlineElapsed,
}

pub(crate) fn run_countdown(params: CountdownParams, terminate_worker_rx: Receiver<()>) {
    info!("Deadline signal '{}' countdown worker started", params.name);

    let mut deadline: Receiver<Instant> = crossbeam_channel::never();
    let mut armed_generation: Option<u64> = None;
    loop {
        let event = select!(
            recv(terminate_worker_rx) -> res => CountdownEvent::Terminate(res.is_ok()),
            recv(params.countdown_command_rx) -> res => CountdownEvent::Command(res),
            recv(deadline) -> _ => CountdownEvent::DeadlineElapsed,
        );

        match event {
            CountdownEvent::Terminate(normal_exit) => {
                if !normal_exit {
                    error!("Abnormal exit for deadline signal '{}' countdown worker", params.name);
                }
                break;
            }
            CountdownEvent::Command(Ok(CountdownCommand::Arm(generation))) => {
                trace!("Deadline signal '{}' armed: generation {}", params.name, generation);
                deadline = crossbeam_channel::after(params.duration);
                armed_generation = Some(generation);
            }
            CountdownEvent::Command(Ok(CountdownCommand::Disarm)) => {
                trace!("Deadline signal '{}' paused", params.name);
                deadline = crossbeam_channel::never();
                armed_generation = None;
            }
            CountdownEvent::Command(Err(err)) => {
                error!("Invalid result from countdown_command_rx: {}", err);
                break;
            }
            CountdownEvent::DeadlineElapsed => {
                deadline = crossbeam_channel::never();
                if let Some(generation) = armed_generation.take() {
                    expire_countdown(&params, generation);
                }
            }
        }
    }

    info!("Deadline signal '{}' countdown worker stopped", params.name);
}

fn expire_countdown(params: &CountdownParams, generation: u64) {
    let delivered = params.protected_state.lock().expire(generation);
    if delivered {
        debug!(
            "Deadline signal '{}' expired: generation {}",
            params.name, generation
        );
    }
}
