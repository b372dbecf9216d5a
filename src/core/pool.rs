//! # Worker Pool
//!
//! Fans a list of image paths out across worker threads and fans completion
//! notices back for progress tracking.
//!
//! ## Shutdown
//! Tasks flow through a bounded multi-producer/multi-consumer channel;
//! workers consume until the channel *closes* (every sender dropped) rather
//! than until a counted sentinel arrives. Results flow back the same way:
//! the drain ends when the last worker exits, not after a fixed count - so
//! a worker that dies early can never hang the join.
//!
//! ## Isolation
//! Each worker builds its own operation sequence and owns every image
//! buffer it touches; the two channels are the only shared state. A
//! per-image failure is logged, reported as a failed outcome and never
//! aborts sibling tasks.

use crate::core::executor::ImageExecutor;
use crate::core::persist::VariantWriter;
use crate::core::registry::{OpConfig, OpRegistry};
use crate::core::resolver::ExecutionPlan;
use crate::error::Result;
use crate::events::{BatchEvent, Event, EventSender};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use serde::Serialize;
use std::path::PathBuf;
use std::thread;
use std::time::Instant;
use tracing::{error, info, warn};

/// Worker pool sizing.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of worker threads.
    pub workers: usize,
}

impl PoolConfig {
    /// Leave two cores for the main thread and the OS, with a floor of one.
    pub fn from_available_parallelism() -> Self {
        let cores = thread::available_parallelism().map_or(1, |n| n.get());
        Self {
            workers: cores.saturating_sub(2).max(1),
        }
    }

    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::from_available_parallelism()
    }
}

/// One task's completion notice. Order across workers is unspecified;
/// only counts are meaningful.
#[derive(Debug)]
pub struct TaskOutcome {
    pub path: PathBuf,
    pub result: std::result::Result<(), String>,
}

/// Summary of a finished batch.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    /// Tasks submitted
    pub total: usize,
    /// Tasks that completed successfully
    pub processed: usize,
    /// Failed tasks with their error messages
    pub failed: Vec<(PathBuf, String)>,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

impl BatchReport {
    /// True when every submitted task came back, successful or not.
    pub fn is_complete(&self) -> bool {
        self.processed + self.failed.len() == self.total
    }
}

fn worker_loop(
    worker_id: usize,
    plan: ExecutionPlan,
    config: OpConfig,
    writer: Option<VariantWriter>,
    tasks: Receiver<PathBuf>,
    results: Sender<TaskOutcome>,
) {
    // Fresh registry and operation instances per worker.
    let registry = OpRegistry::standard();
    let executor = match ImageExecutor::new(plan, &registry, &config, writer) {
        Ok(executor) => executor,
        Err(e) => {
            // The plan was validated before spawn, so this is a bug; bail
            // out and let the closed channels unwind the batch.
            error!(worker = worker_id, error = %e, "failed to build operation sequence");
            return;
        }
    };

    for path in tasks.iter() {
        let result = match executor.process(&path) {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!(worker = worker_id, path = %path.display(), error = %e, "image failed");
                Err(e.to_string())
            }
        };
        if results.send(TaskOutcome { path, result }).is_err() {
            break;
        }
    }
}

/// Process a batch of image paths across the pool.
///
/// The requested operation list is resolved (and rejected) *before* any
/// worker is spawned; per-image failures afterwards are isolated and
/// reported through the events channel and the returned report.
pub fn process_batch(
    paths: &[PathBuf],
    requested: &[String],
    config: &OpConfig,
    pool: &PoolConfig,
    writer: Option<VariantWriter>,
    events: &EventSender,
) -> Result<BatchReport> {
    let registry = OpRegistry::standard();
    let plan = crate::core::resolver::resolve(requested, &registry)?;

    let start = Instant::now();
    let workers = pool.workers.max(1);
    info!(total = paths.len(), workers, "starting batch");
    events.send(Event::Batch(BatchEvent::Started {
        total_images: paths.len(),
    }));

    let (task_tx, task_rx) = bounded::<PathBuf>(workers * 2);
    let (result_tx, result_rx) = unbounded::<TaskOutcome>();

    let mut handles = Vec::with_capacity(workers);
    for worker_id in 0..workers {
        let tasks = task_rx.clone();
        let results = result_tx.clone();
        let plan = plan.clone();
        let config = config.clone();
        let writer = writer.clone();
        handles.push(
            thread::Builder::new()
                .name(format!("leaf-worker-{worker_id}"))
                .spawn(move || worker_loop(worker_id, plan, config, writer, tasks, results))
                .map_err(|e| crate::error::LeafPipelineError::Config(e.to_string()))?,
        );
    }
    // The main thread keeps no receiving/sending ends it does not need:
    // dropping these is what lets both channels close.
    drop(task_rx);
    drop(result_tx);

    for path in paths {
        if task_tx.send(path.clone()).is_err() {
            break;
        }
    }
    drop(task_tx);

    let mut processed = 0usize;
    let mut failed: Vec<(PathBuf, String)> = Vec::new();
    for outcome in result_rx.iter() {
        match outcome.result {
            Ok(()) => {
                processed += 1;
                events.send(Event::Batch(BatchEvent::ImageCompleted {
                    path: outcome.path,
                }));
            }
            Err(message) => {
                events.send(Event::Batch(BatchEvent::ImageFailed {
                    path: outcome.path.clone(),
                    message: message.clone(),
                }));
                failed.push((outcome.path, message));
            }
        }
    }

    for handle in handles {
        if handle.join().is_err() {
            error!("worker thread panicked");
        }
    }

    events.send(Event::Batch(BatchEvent::Completed {
        processed,
        failed: failed.len(),
    }));

    Ok(BatchReport {
        total: paths.len(),
        processed,
        failed,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}
