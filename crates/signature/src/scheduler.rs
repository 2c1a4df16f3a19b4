//! Render scheduler: a single background worker that owns the stroke engine
//! while the pad is active.
//!
//! Jobs run strictly in the order they were posted, so at most one drain
//! pass executes at a time and passes never overlap. Once the scheduler is
//! stopping, drain passes only discard queued samples; every other job still
//! runs so no clear or restore posted before teardown is lost.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Sender, unbounded};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::engine::StrokeEngine;
use crate::state::PadState;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Failed to spawn render worker: {0}")]
    Spawn(#[from] io::Error),
    #[error("Render worker is not running")]
    NotRunning,
    #[error("Render worker panicked")]
    WorkerPanicked,
}

/// Work the render worker performs on the engine
#[derive(Debug)]
pub enum RenderJob {
    /// Drain the point queue and commit a lifted stroke
    Pass,
    /// Bring the raster in line with the surface size
    SyncSurface,
    /// Replace the history with saved strokes
    Restore(PadState),
    /// Reply with a snapshot of the history
    Save(Sender<Option<PadState>>),
    /// Reply once every earlier job has finished
    Barrier(Sender<()>),
}

/// Handle to the running worker
#[derive(Debug)]
pub struct RenderScheduler {
    tx: Sender<RenderJob>,
    stop: Arc<AtomicBool>,
    handle: JoinHandle<StrokeEngine>,
}

impl RenderScheduler {
    /// Move `engine` onto a new worker thread.
    pub fn spawn(mut engine: StrokeEngine) -> Result<Self, SchedulerError> {
        let (tx, rx) = unbounded::<RenderJob>();
        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("signature-render".to_string())
            .spawn(move || {
                debug!("RenderScheduler: worker started");
                for job in rx.iter() {
                    let stopping = worker_stop.load(Ordering::Acquire);
                    run_job(&mut engine, job, stopping);
                }
                debug!("RenderScheduler: worker exiting");
                engine
            })?;

        info!("RenderScheduler: spawned render worker");
        Ok(Self { tx, stop, handle })
    }

    /// Queue a job. Fails only if the worker has exited.
    pub fn post(&self, job: RenderJob) -> Result<(), SchedulerError> {
        self.tx.send(job).map_err(|_| SchedulerError::NotRunning)
    }

    /// Block until every job posted so far has run.
    pub fn wait_idle(&self) -> Result<(), SchedulerError> {
        let (reply_tx, reply_rx) = unbounded();
        self.post(RenderJob::Barrier(reply_tx))?;
        reply_rx.recv().map_err(|_| SchedulerError::NotRunning)
    }

    /// Ask the worker for a snapshot of the history.
    pub fn save_state(&self) -> Result<Option<PadState>, SchedulerError> {
        let (reply_tx, reply_rx) = unbounded();
        self.post(RenderJob::Save(reply_tx))?;
        reply_rx.recv().map_err(|_| SchedulerError::NotRunning)
    }

    /// Finish the posted jobs without drawing queued samples, then take the
    /// engine back.
    pub fn stop(self) -> Result<StrokeEngine, SchedulerError> {
        let Self { tx, stop, handle } = self;
        stop.store(true, Ordering::Release);
        drop(tx);

        match handle.join() {
            Ok(engine) => {
                info!("RenderScheduler: render worker stopped");
                Ok(engine)
            }
            Err(_) => {
                warn!("RenderScheduler: render worker panicked");
                Err(SchedulerError::WorkerPanicked)
            }
        }
    }
}

fn run_job(engine: &mut StrokeEngine, job: RenderJob, stopping: bool) {
    match job {
        RenderJob::Pass if stopping => {
            engine.discard_pending();
        }
        RenderJob::Pass => {
            engine.drain_pass();
        }
        RenderJob::SyncSurface => {
            engine.sync_surface();
        }
        RenderJob::Restore(state) => engine.restore(state),
        RenderJob::Save(reply) => {
            let _ = reply.send(engine.save_state());
        }
        RenderJob::Barrier(reply) => {
            let _ = reply.send(());
        }
    }
}
