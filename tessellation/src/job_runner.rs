//! Optional worker pool for independent per-scanline approximator work.
//!
//! The reference leaves this abstraction "incomplete and partly commented
//! out" (spec.md §9, `renderer/src/api.rs`). This is the completed version:
//! a small fixed-size pool of stateless `std::thread` workers pulling bound
//! closures off a `crossbeam-channel`, the same fan-out primitive `servo`
//! reaches for elsewhere in this corpus. Workers never share mutable state;
//! the only thing that crosses a worker boundary is the closure itself and,
//! on panic, an error.
//!
//! Parallelism here must never change the deterministic output ordering of
//! [`crate::SegmentApproximator::segments`] (spec.md §5): callers are
//! expected to keep per-bucket segment lists disjoint across jobs and merge
//! results only after [`JobRunner::join`] returns.

use crate::error::TessellationError;
use crossbeam_channel::{bounded, Sender};
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A fixed-size pool of worker threads that consume bound closures from a
/// queue. Dropping (or [`join`](JobRunner::join)ing) the runner closes the
/// queue and waits for every worker to finish its current job.
pub struct JobRunner {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<Result<(), TessellationError>>>,
}

impl JobRunner {
    /// Spawns `worker_count` threads (clamped to at least 1) sharing one
    /// bounded queue.
    pub fn new(worker_count: usize) -> Self {
        let worker_count = worker_count.max(1);
        let (sender, receiver) = bounded::<Job>(worker_count * 4);
        let mut workers = Vec::with_capacity(worker_count);

        for index in 0..worker_count {
            let receiver = receiver.clone();
            workers.push(thread::spawn(move || {
                while let Ok(job) = receiver.recv() {
                    let result = panic::catch_unwind(AssertUnwindSafe(job));
                    if let Err(payload) = result {
                        let message = panic_message(&payload);
                        log::debug!("job runner worker {} caught a panic: {}", index, message);
                        return Err(TessellationError::WorkerPanicked(message));
                    }
                }
                Ok(())
            }));
        }

        JobRunner { sender: Some(sender), workers }
    }

    /// Queues `job` for execution on whichever worker is free next.
    pub fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self.sender.as_ref().expect("spawn called after join");
        sender.send(Box::new(job)).expect("job runner workers outlive the sender");
    }

    /// Closes the queue and joins every worker, surfacing the first captured
    /// panic (if any) as a [`TessellationError`].
    pub fn join(mut self) -> Result<(), TessellationError> {
        self.sender.take();
        let mut first_error = None;
        for worker in self.workers.drain(..) {
            match worker.join() {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    first_error.get_or_insert(err);
                }
                Err(_) => {
                    first_error.get_or_insert(TessellationError::WorkerPanicked("worker thread did not return".to_string()));
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Drop for JobRunner {
    /// Drains the queue and waits for every worker even if `join` was never
    /// called explicitly, matching the "runner's destructor drains the
    /// queue" contract of spec.md §9.
    fn drop(&mut self) {
        self.sender.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn runs_every_spawned_job() {
        let runner = JobRunner::new(4);
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..50 {
            let counter = Arc::clone(&counter);
            runner.spawn(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        runner.join().expect("no worker panicked");
        assert_eq!(counter.load(Ordering::SeqCst), 50);
    }

    #[test]
    fn a_worker_panic_is_surfaced_as_an_error_not_a_poisoned_pool() {
        let runner = JobRunner::new(2);
        runner.spawn(|| panic!("boom"));
        let result = runner.join();
        assert!(matches!(result, Err(TessellationError::WorkerPanicked(_))));
    }
}
