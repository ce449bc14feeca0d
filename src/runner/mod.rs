//! # Runner Module - Background Step Loop
//!
//! Drives an [`Engine`] from a dedicated worker thread at a fixed outer
//! cadence (~30 ticks per second). Each tick the worker takes the engine
//! lock once, executes a small batch of inner steps, extracts a snapshot,
//! releases the lock, and sends the frame over an MPSC channel. External
//! commands (pause, resume, temperature retarget, config updates, reset)
//! acquire the same lock through the shared handle and therefore always
//! land between batches, never inside one.
//!
//! Control uses two atomic flags, checked once per tick: `running` gates
//! whether the engine advances, `shutdown` ends the thread. Dropping the
//! worker requests shutdown and joins the thread.


use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::engine::Engine;
use crate::engine::snapshot::Frame;

/// Pacing parameters for the worker loop.
#[derive(Debug, Clone, Copy)]
pub struct WorkerConfig {
    /// Outer ticks per second
    pub frame_rate: f64,
    /// Inner `step()` calls per outer tick
    pub steps_per_frame: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        WorkerConfig {
            frame_rate: 30.0,
            steps_per_frame: 10,
        }
    }
}

/// Handle to a background simulation thread.
pub struct SimulationWorker {
    engine: Arc<Mutex<Engine>>,
    running: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SimulationWorker {
    /// Spawns the worker thread. The loop starts paused; call
    /// [`SimulationWorker::start`] to begin stepping.
    pub fn spawn(engine: Engine, config: WorkerConfig, frames: mpsc::Sender<Frame>) -> Self {
        let engine = Arc::new(Mutex::new(engine));
        let running = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(AtomicBool::new(false));

        let handle = {
            let engine = Arc::clone(&engine);
            let running = Arc::clone(&running);
            let shutdown = Arc::clone(&shutdown);
            std::thread::spawn(move || {
                run_loop(&engine, &running, &shutdown, config, frames);
            })
        };

        SimulationWorker {
            engine,
            running,
            shutdown,
            handle: Some(handle),
        }
    }

    /// Shared engine handle for issuing commands between batches.
    pub fn engine(&self) -> Arc<Mutex<Engine>> {
        Arc::clone(&self.engine)
    }

    /// Resumes stepping.
    pub fn start(&self) {
        self.running.store(true, Ordering::Relaxed);
    }

    /// Pauses stepping; the worker keeps ticking idle.
    pub fn pause(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    /// Whether the loop is currently stepping.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Stops the worker thread and waits for it to exit.
    pub fn stop(mut self) {
        self.shutdown_and_join();
    }

    fn shutdown_and_join(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("simulation worker thread panicked");
        }
    }
}

impl Drop for SimulationWorker {
    /// Fail-safe shutdown when the handle goes out of scope.
    fn drop(&mut self) {
        self.shutdown_and_join();
    }
}

fn run_loop(
    engine: &Mutex<Engine>,
    running: &AtomicBool,
    shutdown: &AtomicBool,
    config: WorkerConfig,
    frames: mpsc::Sender<Frame>,
) {
    let tick = Duration::from_secs_f64(1.0 / config.frame_rate.max(1.0));
    info!(
        "simulation worker online: {} steps per tick at {} Hz",
        config.steps_per_frame, config.frame_rate
    );

    let mut receiver_gone = false;
    while !shutdown.load(Ordering::Relaxed) {
        let tick_started = Instant::now();

        if running.load(Ordering::Relaxed) {
            // One lock acquisition covers the whole batch plus the snapshot,
            // so commands never observe a half-stepped state
            let frame = {
                let mut engine = engine.lock().expect("engine lock poisoned");
                engine.step_batch(config.steps_per_frame);
                engine.snapshot()
            };

            // A vanished receiver pauses streaming but not the simulation
            if !receiver_gone && frames.send(frame).is_err() {
                warn!("frame receiver disconnected; continuing without streaming");
                receiver_gone = true;
            }
        }

        if let Some(remaining) = tick.checked_sub(tick_started.elapsed()) {
            std::thread::sleep(remaining);
        }
    }
}
