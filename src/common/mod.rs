use std::thread;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};

use crate::errors::{Result, TimerError};

/// Background thread with its termination channel.
#[derive(Debug)]
pub struct Worker {
	name: String,
	join_handle: JoinHandle<()>,
	terminate_worker_tx: Sender<()>,
}

impl Worker {
	pub fn terminate(&self) {
		let send_result = self.terminate_worker_tx.send(());
		if send_result.is_err() {
			error!("Cannot send termination signal to worker '{}'", self.name)
		}
	}

	pub fn join(self) {
		let join_result = self.join_handle.join();
		if join_result.is_err() {
			error!("Worker '{}' returned an error", self.name)
		}
	}
}

/// Spawns a named thread running `worker(params, terminate_worker_rx)`.
pub fn run_worker<T, F>(name: String, worker: F, params: T) -> Result<Worker>
where
	T: Send + 'static,
	F: FnOnce(T, Receiver<()>) + Send + 'static,
{
	let (terminate_worker_tx, terminate_worker_rx): (Sender<()>, Receiver<()>) =
		crossbeam_channel::unbounded();

	let join_handle = thread::Builder::new()
		.name(name.clone())
		.spawn(move || worker(params, terminate_worker_rx))
		.map_err(|err| TimerError::WorkerSpawn(err.to_string()))?;

	Ok(Worker {
		name,
		join_handle,
		terminate_worker_tx,
	})
}
