//! Running a callable over and over on its own thread until told to stop.
//!
//! Cancellation is cooperative: the loop looks at its [`CancelToken`] before
//! every iteration, an iteration that is already running is never interrupted.
//! The finalizer runs exactly once, after the last iteration, also when an
//! iteration panics.

use crate::builtin::rejected;
use crate::shape::XShape;
use crate::xerror::XError;
use crate::xvalue::XValue;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{sync_channel, Receiver, RecvTimeoutError};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct RepeatConfig {
    pub thread_name: Option<String>,
    /// sleep between two iterations
    pub pause_ms: Option<u64>,
    /// stop on our own after this many iterations
    pub max_iterations: Option<usize>,
}

/// A one-shot stop flag. Once cancelled it stays cancelled.
#[derive(Debug, Default, Clone)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` only for the call that actually flipped the flag.
    pub fn cancel(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What [`RepeatHandle::wait_timeout`] found.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RepeatStatus {
    /// the finalizer has run after this many iterations
    Finished(usize),
    Running,
    /// an iteration or the finalizer panicked
    Panicked,
}

/// Owner side of a running repeat loop.
///
/// Dropping the handle without cancelling leaves the loop running detached.
#[derive(Debug)]
pub struct RepeatHandle {
    token: CancelToken,
    done: Receiver<usize>,
    finished: OnceLock<usize>,
    thread: JoinHandle<usize>,
}

impl RepeatHandle {
    /// Request the loop to stop. Returns immediately, without waiting for the
    /// loop or its finalizer. Cancelling more than once is harmless.
    pub fn cancel(&self) -> bool {
        let triggered = self.token.cancel();
        if triggered {
            debug!("repeat cancelled");
        }
        triggered
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Block until the finalizer has run, returning the number of iterations.
    ///
    /// This does not cancel the loop by itself.
    pub fn wait(self) -> usize {
        match self.thread.join() {
            Ok(iterations) => iterations,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    /// Like [`RepeatHandle::wait`] but gives up after `timeout`, and reports a
    /// panicked loop instead of propagating the panic.
    pub fn wait_timeout(&self, timeout: Duration) -> RepeatStatus {
        if let Some(&iterations) = self.finished.get() {
            return RepeatStatus::Finished(iterations);
        }
        match self.done.recv_timeout(timeout) {
            Ok(iterations) => {
                let _ = self.finished.set(iterations);
                RepeatStatus::Finished(iterations)
            }
            Err(RecvTimeoutError::Timeout) => RepeatStatus::Running,
            // the count is only sent once the loop and its finalizer returned
            Err(RecvTimeoutError::Disconnected) => RepeatStatus::Panicked,
        }
    }

    pub fn cancel_and_wait(self) -> usize {
        self.cancel();
        self.wait()
    }
}

// runs `on_stop` when dropped, so an unwinding loop still gets finalized
struct Finalizer<S: FnOnce()>(Option<S>);

impl<S: FnOnce()> Drop for Finalizer<S> {
    fn drop(&mut self) {
        if thread::panicking() {
            warn!("repeat action panicked, finalizing");
        }
        if let Some(on_stop) = self.0.take() {
            on_stop();
        }
    }
}

/// Run `action` repeatedly on a new thread until cancelled, then run `on_stop` once.
pub fn repeat_fn<A, S>(action: A, on_stop: S) -> RepeatHandle
where
    A: FnMut() + Send + 'static,
    S: FnOnce() + Send + 'static,
{
    repeat_fn_with(action, on_stop, RepeatConfig::default())
}

pub fn repeat_fn_with<A, S>(mut action: A, on_stop: S, config: RepeatConfig) -> RepeatHandle
where
    A: FnMut() + Send + 'static,
    S: FnOnce() + Send + 'static,
{
    let token = CancelToken::new();
    let (done_tx, done) = sync_channel(1);
    let loop_token = token.clone();
    let pause = config.pause_ms.map(Duration::from_millis);
    let max_iterations = config.max_iterations;

    let mut builder = thread::Builder::new();
    if let Some(name) = config.thread_name.clone() {
        builder = builder.name(name);
    }
    let thread = builder
        .spawn(move || {
            let finalizer = Finalizer(Some(on_stop));
            let mut iterations = 0usize;
            while !loop_token.is_cancelled() {
                if max_iterations.map_or(false, |max| iterations >= max) {
                    debug!(iterations, "repeat reached its iteration limit");
                    break;
                }
                action();
                iterations += 1;
                if let Some(pause) = pause {
                    thread::sleep(pause);
                }
            }
            drop(finalizer);
            info!(iterations, "repeat stopped");
            // the owner may have dropped its handle already
            let _ = done_tx.send(iterations);
            iterations
        })
        .unwrap_or_else(|e| panic!("failed to spawn repeat thread: {}", e));
    info!(thread_name = ?config.thread_name, "repeat started");

    RepeatHandle {
        token,
        done,
        finished: OnceLock::new(),
        thread,
    }
}

/// Dynamic counterpart of [`repeat_fn`]: both `action` and `on_stop` must be
/// functions taking and returning nothing. Nothing is started if either is not.
pub fn repeat(action: &XValue, on_stop: &XValue) -> Result<RepeatHandle, XError> {
    repeat_with(action, on_stop, RepeatConfig::default())
}

pub fn repeat_with(
    action: &XValue,
    on_stop: &XValue,
    config: RepeatConfig,
) -> Result<RepeatHandle, XError> {
    let shape = XShape::nullary();
    let checked = shape
        .validate(action)
        .and_then(|action| Ok((action.clone(), shape.validate(on_stop)?.clone())));
    let (action, on_stop) = checked.map_err(rejected("repeat"))?;
    Ok(repeat_fn_with(
        move || {
            if let Err(e) = action.invoke(&[]) {
                warn!(error = %e, "repeat action broke its signature");
            }
        },
        move || {
            if let Err(e) = on_stop.invoke(&[]) {
                warn!(error = %e, "repeat finalizer broke its signature");
            }
        },
        config,
    ))
}
