//! Long-lived extraction worker.
//!
//! Jobs travel over a tokio channel to one dedicated OS thread that extracts them one
//! at a time. Every call is bounded by a timeout. When it elapses the running job is
//! cancelled through its abort flag, the thread is retired and a fresh one is started.
//! Jobs still queued on a retired thread are rejected with
//! [`ExtractError::WorkerUnavailable`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::core::{AbortFlag, ExtractOptions, Report};
use crate::error::{ExtractError, Result};
use crate::plugins::ExtractorRegistry;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

struct Job {
    source: String,
    file_name: String,
    options: ExtractOptions,
    reply: oneshot::Sender<Result<Report>>,
}

/// Channel into one worker thread.
struct Lane {
    jobs: mpsc::UnboundedSender<Job>,
    retired: Arc<AtomicBool>,
    generation: u64,
}

pub struct ExtractionWorker {
    registry: Arc<ExtractorRegistry>,
    timeout: Duration,
    lane: Mutex<Lane>,
}

impl ExtractionWorker {
    pub fn new(registry: ExtractorRegistry, timeout: Duration) -> Self {
        let registry = Arc::new(registry);
        let lane = spawn_lane(Arc::clone(&registry), 0);
        Self {
            registry,
            timeout,
            lane: Mutex::new(lane),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Extract `source` on the worker thread.
    ///
    /// # Errors
    ///
    /// Everything [`extract`](crate::core::extract) returns, plus `Timeout` when the
    /// worker does not answer in time and `WorkerUnavailable` when the thread it was
    /// queued on went away.
    pub async fn extract(
        &self,
        source: impl Into<String>,
        file_name: impl Into<String>,
        options: ExtractOptions,
    ) -> Result<Report> {
        let abort = options.abort.clone().unwrap_or_default();
        let (reply, answer) = oneshot::channel();
        let job = Job {
            source: source.into(),
            file_name: file_name.into(),
            options: options.with_abort(abort.clone()),
            reply,
        };
        let generation = self.submit(job)?;

        match tokio::time::timeout(self.timeout, answer).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => {
                self.restart_if_current(generation);
                Err(ExtractError::WorkerUnavailable)
            }
            Err(_) => {
                abort.abort();
                let millis = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(millis, "extraction timed out, restarting worker");
                self.restart_if_current(generation);
                Err(ExtractError::Timeout { millis })
            }
        }
    }

    /// Retire the current thread and start a fresh one.
    pub fn restart(&self) {
        let mut lane = self.lane.lock().unwrap_or_else(PoisonError::into_inner);
        self.replace(&mut lane);
    }

    /// Queue `job`, starting a fresh thread once if the current one is gone.
    fn submit(&self, job: Job) -> Result<u64> {
        let mut lane = self.lane.lock().unwrap_or_else(PoisonError::into_inner);
        let job = match lane.jobs.send(job) {
            Ok(()) => return Ok(lane.generation),
            Err(mpsc::error::SendError(job)) => job,
        };
        self.replace(&mut lane);
        lane.jobs
            .send(job)
            .map(|()| lane.generation)
            .map_err(|_| ExtractError::WorkerUnavailable)
    }

    fn restart_if_current(&self, generation: u64) {
        let mut lane = self.lane.lock().unwrap_or_else(PoisonError::into_inner);
        if lane.generation == generation {
            self.replace(&mut lane);
        }
    }

    fn replace(&self, lane: &mut Lane) {
        lane.retired.store(true, Ordering::Relaxed);
        *lane = spawn_lane(Arc::clone(&self.registry), lane.generation + 1);
        debug!(generation = lane.generation, "started extraction worker");
    }
}

impl Default for ExtractionWorker {
    fn default() -> Self {
        Self::new(ExtractorRegistry::default(), DEFAULT_TIMEOUT)
    }
}

fn spawn_lane(registry: Arc<ExtractorRegistry>, generation: u64) -> Lane {
    let (jobs, mut queue) = mpsc::unbounded_channel::<Job>();
    let retired = Arc::new(AtomicBool::new(false));
    let retired_for_thread = Arc::clone(&retired);

    thread::spawn(move || {
        while let Some(job) = queue.blocking_recv() {
            let result = if retired_for_thread.load(Ordering::Relaxed) {
                Err(ExtractError::WorkerUnavailable)
            } else {
                registry.extract(&job.source, &job.file_name, &job.options)
            };
            // The caller may have timed out and dropped its end.
            let _ = job.reply.send(result);
        }
    });

    Lane {
        jobs,
        retired,
        generation,
    }
}
