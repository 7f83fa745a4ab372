//! Self-rescheduling per-frame loop with an owned, cancellable handle.
//!
//! The loop keeps at most one pending frame request. Stopping (or dropping
//! the `FrameLoop`) cancels that request, so no callback runs afterwards.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use crate::domain::errors::{AppError, RenderingResult};
use crate::domain::logging::LogComponent;
use crate::log_error;

pub type FrameRequestId = i32;
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Something that can run a callback on the next display frame.
pub trait FrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> RenderingResult<FrameRequestId>;
    fn cancel_frame(&self, id: FrameRequestId);
}

/// `requestAnimationFrame` on the browser window.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationFrameScheduler;

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> RenderingResult<FrameRequestId> {
        let window = web_sys::window().ok_or_else(|| AppError::RenderingError("window not available".into()))?;
        // released by wasm-bindgen after the single invocation
        let closure = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
        window
            .request_animation_frame(closure.unchecked_ref())
            .map_err(|e| AppError::from_js("requestAnimationFrame", e))
    }

    fn cancel_frame(&self, id: FrameRequestId) {
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(id);
        }
    }
}

/// Host-side scheduler driven by hand: `run_frame` fires everything that is pending.
#[derive(Clone, Default)]
pub struct ManualFrameScheduler {
    next_id: Rc<Cell<FrameRequestId>>,
    pending: Rc<RefCell<BTreeMap<FrameRequestId, FrameCallback>>>,
}

impl ManualFrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Fire the callbacks queued before this call. Requests made while they
    /// run wait for the next frame. Returns how many fired.
    pub fn run_frame(&self, timestamp: f64) -> usize {
        let due = std::mem::take(&mut *self.pending.borrow_mut());
        let fired = due.len();
        for (_, callback) in due {
            callback(timestamp);
        }
        fired
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> RenderingResult<FrameRequestId> {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.pending.borrow_mut().insert(id, callback);
        Ok(id)
    }

    fn cancel_frame(&self, id: FrameRequestId) {
        self.pending.borrow_mut().remove(&id);
    }
}

struct LoopState<S: FrameScheduler> {
    scheduler: S,
    tick: RefCell<Box<dyn FnMut(f64)>>,
    pending: Cell<Option<FrameRequestId>>,
    running: Cell<bool>,
    frames: Cell<u64>,
}

/// Owned frame loop: `tick` runs once per frame until `stop` or drop.
pub struct FrameLoop<S: FrameScheduler + 'static> {
    state: Rc<LoopState<S>>,
}

impl<S: FrameScheduler + 'static> FrameLoop<S> {
    pub fn new(scheduler: S, tick: impl FnMut(f64) + 'static) -> Self {
        Self {
            state: Rc::new(LoopState {
                scheduler,
                tick: RefCell::new(Box::new(tick)),
                pending: Cell::new(None),
                running: Cell::new(false),
                frames: Cell::new(0),
            }),
        }
    }

    /// Draw immediately, then keep drawing every frame.
    pub fn start(&self, timestamp: f64) -> RenderingResult<()> {
        if self.state.running.replace(true) {
            return Ok(());
        }
        Self::run_tick(&self.state, timestamp);
        Self::schedule(&self.state)
    }

    pub fn stop(&self) {
        self.state.running.set(false);
        if let Some(id) = self.state.pending.take() {
            self.state.scheduler.cancel_frame(id);
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.running.get()
    }

    pub fn frames(&self) -> u64 {
        self.state.frames.get()
    }

    fn run_tick(state: &LoopState<S>, timestamp: f64) {
        state.frames.set(state.frames.get() + 1);
        (state.tick.borrow_mut())(timestamp);
    }

    fn schedule(state: &Rc<LoopState<S>>) -> RenderingResult<()> {
        let weak: Weak<LoopState<S>> = Rc::downgrade(state);
        let id = state.scheduler.request_frame(Box::new(move |timestamp| {
            let Some(state) = weak.upgrade() else { return };
            state.pending.set(None);
            if !state.running.get() {
                return;
            }
            Self::run_tick(&state, timestamp);
            // tick may have stopped the loop
            if state.running.get() {
                if let Err(e) = Self::schedule(&state) {
                    state.running.set(false);
                    log_error!(LogComponent::Infrastructure("FrameLoop"), "❌ Could not request next frame: {}", e);
                }
            }
        }))?;
        state.pending.set(Some(id));
        Ok(())
    }
}

impl<S: FrameScheduler + 'static> Drop for FrameLoop<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_exactly_one_request_pending() {
        let scheduler = ManualFrameScheduler::new();
        let frame_loop = FrameLoop::new(scheduler.clone(), |_| {});
        frame_loop.start(0.0).unwrap();

        for frame in 1..=5 {
            assert_eq!(scheduler.pending(), 1);
            scheduler.run_frame(frame as f64 * 16.0);
        }
        assert_eq!(frame_loop.frames(), 6);
    }

    #[test]
    fn drop_cancels_pending_request() {
        let scheduler = ManualFrameScheduler::new();
        let ticks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&ticks);
        let frame_loop = FrameLoop::new(scheduler.clone(), move |_| counter.set(counter.get() + 1));
        frame_loop.start(0.0).unwrap();
        drop(frame_loop);

        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.run_frame(16.0), 0);
        assert_eq!(ticks.get(), 1);
    }
}
