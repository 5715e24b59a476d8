//! Shared animation loop.
//!
//! One coordinator drives every animating gauge from a single frame loop.
//! It is an ordinary value: construct it once when wiring the application
//! and hand clones to each gauge. Clones share the same registry.
//!
//! The model is single-threaded and cooperative. Callbacks may register or
//! unregister entries (including themselves) while a tick is running; each
//! tick iterates over a snapshot of the registry.

use std::cell::{Cell, RefCell};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use crate::errors::AnimationError;

/// Default frame rate cap
pub const DEFAULT_TARGET_FPS: f64 = 60.0;
pub const MIN_TARGET_FPS: f64 = 1.0;
pub const MAX_TARGET_FPS: f64 = 120.0;

/// Scheduling jitter tolerated before a frame is considered early, in ms
const FRAME_SLACK_MS: f64 = 1.0;
/// Per-active-animation stagger step and its cap, in ms
const STAGGER_STEP_MS: f64 = 16.0;
const STAGGER_MAX_MS: f64 = 100.0;

/// Timing shared by every callback within one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// Milliseconds, from the host's clock
    pub timestamp: f64,
    /// Milliseconds since the previous executed frame (0 on the first)
    pub delta: f64,
}

/// What a callback returns: `Ok(true)` to keep running, `Ok(false)` when
/// finished, `Err` on failure (the entry is dropped).
pub type CallbackResult = Result<bool, Box<dyn std::error::Error>>;

type Callback = Rc<RefCell<dyn FnMut(&FrameInfo) -> CallbackResult>>;

/// The host's frame primitive (e.g. an animation-frame request).
///
/// The coordinator asks for one frame at a time; the host answers by calling
/// [`AnimationCoordinator::tick`].
pub trait FrameScheduler {
    fn request_frame(&self);
    fn cancel_frame(&self);
}

/// A [`FrameScheduler`] that only records requests, for hosts that poll and
/// for tests. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct FrameQueue {
    state: Rc<FrameQueueState>,
}

#[derive(Debug, Default)]
struct FrameQueueState {
    pending: Cell<bool>,
    requests: Cell<u64>,
    cancels: Cell<u64>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Is a frame requested and not yet taken?
    pub fn is_pending(&self) -> bool {
        self.state.pending.get()
    }

    /// Consume the pending request, if any
    pub fn take_pending(&self) -> bool {
        self.state.pending.replace(false)
    }

    pub fn request_count(&self) -> u64 {
        self.state.requests.get()
    }

    pub fn cancel_count(&self) -> u64 {
        self.state.cancels.get()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&self) {
        self.state.pending.set(true);
        self.state.requests.set(self.state.requests.get() + 1);
    }

    fn cancel_frame(&self) {
        self.state.pending.set(false);
        self.state.cancels.set(self.state.cancels.get() + 1);
    }
}

/// One registered animation
struct AnimationEntry {
    id: String,
    priority: i32,
    /// Timestamp of the first tick that saw this entry
    start_time: Option<f64>,
    /// Registration order, for stable ordering among equal priorities
    seq: u64,
    callback: Callback,
}

#[derive(Default)]
struct Registry {
    entries: Vec<AnimationEntry>,
    next_seq: u64,
}

impl Registry {
    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Is `callback` still the one registered under `id`?
    fn holds(&self, id: &str, callback: &Callback) -> bool {
        self.entries
            .iter()
            .any(|e| e.id == id && Rc::ptr_eq(&e.callback, callback))
    }

    fn remove_if_same(&mut self, id: &str, callback: &Callback) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|e| !(e.id == id && Rc::ptr_eq(&e.callback, callback)));
        self.entries.len() != before
    }
}

/// Outcome of one [`AnimationCoordinator::tick`]
#[derive(Debug, Default)]
pub struct TickReport {
    /// False when the tick was skipped (not running, FPS cap, re-entrant call)
    pub ran: bool,
    /// Ids invoked this tick, in invocation order
    pub invoked: Vec<String>,
    /// Ids that reported completion
    pub completed: Vec<String>,
    /// Callbacks that failed and were dropped
    pub failures: Vec<AnimationError>,
}

struct Inner {
    registry: RefCell<Registry>,
    scheduler: Box<dyn FrameScheduler>,
    target_fps: Cell<f64>,
    last_frame: Cell<Option<f64>>,
    running: Cell<bool>,
    in_tick: Cell<bool>,
}

/// Process-wide animation scheduler, shared by handle.
#[derive(Clone)]
pub struct AnimationCoordinator {
    inner: Rc<Inner>,
}

impl std::fmt::Debug for AnimationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationCoordinator")
            .field("active", &self.active_count())
            .field("running", &self.is_running())
            .field("target_fps", &self.target_fps())
            .finish()
    }
}

impl AnimationCoordinator {
    pub fn new(scheduler: impl FrameScheduler + 'static) -> Self {
        Self {
            inner: Rc::new(Inner {
                registry: RefCell::new(Registry::default()),
                scheduler: Box::new(scheduler),
                target_fps: Cell::new(DEFAULT_TARGET_FPS),
                last_frame: Cell::new(None),
                running: Cell::new(false),
                in_tick: Cell::new(false),
            }),
        }
    }

    /// Add an animation, or replace the one already registered under `id`.
    /// Starts the shared loop if it is idle.
    pub fn register<F>(&self, id: impl Into<String>, priority: i32, callback: F)
    where
        F: FnMut(&FrameInfo) -> CallbackResult + 'static,
    {
        let id = id.into();
        let callback: Callback = Rc::new(RefCell::new(callback));
        {
            let mut registry = self.inner.registry.borrow_mut();
            let seq = registry.next_seq;
            registry.next_seq += 1;
            let entry = AnimationEntry {
                id: id.clone(),
                priority,
                start_time: None,
                seq,
                callback,
            };
            match registry.position(&id) {
                Some(idx) => registry.entries[idx] = entry,
                None => registry.entries.push(entry),
            }
        }
        crate::log::debug!(id = %id, priority, "animation registered");
        self.start();
    }

    /// Remove an animation. Unknown ids are ignored. Stops the loop when the
    /// registry becomes empty.
    pub fn unregister(&self, id: &str) -> bool {
        let removed = {
            let mut registry = self.inner.registry.borrow_mut();
            match registry.position(id) {
                Some(idx) => {
                    registry.entries.remove(idx);
                    true
                }
                None => false,
            }
        };
        if removed && !self.inner.in_tick.get() {
            self.stop_if_idle();
        }
        removed
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.inner.registry.borrow().position(id).is_some()
    }

    pub fn active_count(&self) -> usize {
        self.inner.registry.borrow().entries.len()
    }

    /// Is the shared loop waiting on frames?
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    /// Timestamp of the first tick that invoked `id`
    pub fn started_at(&self, id: &str) -> Option<f64> {
        let registry = self.inner.registry.borrow();
        registry
            .position(id)
            .and_then(|idx| registry.entries[idx].start_time)
    }

    pub fn target_fps(&self) -> f64 {
        self.inner.target_fps.get()
    }

    /// Set the frame rate cap, clamped to `[1, 120]`.
    pub fn set_target_fps(&self, fps: f64) {
        let fps = if fps.is_nan() {
            DEFAULT_TARGET_FPS
        } else {
            fps.clamp(MIN_TARGET_FPS, MAX_TARGET_FPS)
        };
        self.inner.target_fps.set(fps);
    }

    /// Start offset for a new animation so simultaneous mounts do not all
    /// move on the same frame: `base + min(active * 16, 100)` ms.
    pub fn stagger_delay(&self, base: f64) -> f64 {
        base + (self.active_count() as f64 * STAGGER_STEP_MS).min(STAGGER_MAX_MS)
    }

    fn start(&self) {
        if !self.inner.running.get() {
            self.inner.running.set(true);
            self.inner.last_frame.set(None);
            if !self.inner.in_tick.get() {
                self.inner.scheduler.request_frame();
            }
        }
    }

    fn stop_if_idle(&self) {
        if self.inner.running.get() && self.active_count() == 0 {
            self.inner.running.set(false);
            self.inner.scheduler.cancel_frame();
            crate::log::debug!("animation loop stopped");
        }
    }

    /// Run one frame at `timestamp` (ms). The host calls this when the
    /// frame requested through the scheduler fires.
    pub fn tick(&self, timestamp: f64) -> TickReport {
        let mut report = TickReport::default();
        if !self.inner.running.get() || self.inner.in_tick.get() {
            return report;
        }

        let interval = 1000.0 / self.target_fps();
        let last = self.inner.last_frame.get();
        if let Some(last) = last {
            if timestamp - last + FRAME_SLACK_MS < interval {
                self.inner.scheduler.request_frame();
                return report;
            }
        }

        let frame = FrameInfo {
            timestamp,
            delta: last.map_or(0.0, |l| (timestamp - l).max(0.0)),
        };
        self.inner.last_frame.set(Some(timestamp));
        self.inner.in_tick.set(true);
        report.ran = true;

        let snapshot: Vec<(String, Callback)> = {
            let mut registry = self.inner.registry.borrow_mut();
            registry
                .entries
                .sort_by(|a, b| b.priority.cmp(&a.priority).then(a.seq.cmp(&b.seq)));
            for entry in registry.entries.iter_mut() {
                entry.start_time.get_or_insert(timestamp);
            }
            registry
                .entries
                .iter()
                .map(|e| (e.id.clone(), Rc::clone(&e.callback)))
                .collect()
        };

        for (id, callback) in snapshot {
            // Removed or replaced by an earlier callback this tick
            if !self.inner.registry.borrow().holds(&id, &callback) {
                continue;
            }
            report.invoked.push(id.clone());

            let outcome = catch_unwind(AssertUnwindSafe(|| (&mut *callback.borrow_mut())(&frame)));
            let failure = match outcome {
                Ok(Ok(true)) => continue,
                Ok(Ok(false)) => None,
                Ok(Err(err)) => Some(err.to_string()),
                Err(panic) => Some(panic_message(panic.as_ref())),
            };

            self.inner.registry.borrow_mut().remove_if_same(&id, &callback);
            match failure {
                None => report.completed.push(id),
                Some(message) => {
                    let err = AnimationError::new(id, message);
                    crate::log::error!(error = %err, "animation callback failed; dropping it");
                    report.failures.push(err);
                }
            }
        }

        self.inner.in_tick.set(false);

        if self.active_count() == 0 {
            self.inner.running.set(false);
            crate::log::debug!("animation loop idle");
        } else {
            self.inner.running.set(true);
            self.inner.scheduler.request_frame();
        }

        report
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "callback panicked".to_string()
    }
}
