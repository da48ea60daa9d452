//! Cancellable `requestAnimationFrame` loop.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;

type Tick = Box<dyn FnMut(f64) -> bool>;

struct Inner {
	callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
	tick: RefCell<Option<Tick>>,
	handle: Cell<Option<i32>>,
	generation: Cell<u64>,
}

/// Runs a tick closure once per animation frame until it returns `false` or
/// the loop is cancelled. Restarting or cancelling bumps a generation
/// counter, so a frame scheduled for an older tick never runs it. Dropping
/// the last handle cancels the pending frame.
#[derive(Clone)]
pub struct FrameLoop {
	inner: Rc<Inner>,
}

impl FrameLoop {
	pub fn new() -> Self {
		let inner = Rc::new_cyclic(|weak: &Weak<Inner>| {
			let weak = weak.clone();
			Inner {
				callback: RefCell::new(Some(Closure::new(move |ts: f64| {
					if let Some(inner) = weak.upgrade() {
						inner.on_frame(ts);
					}
				}))),
				tick: RefCell::new(None),
				handle: Cell::new(None),
				generation: Cell::new(0),
			}
		});
		Self { inner }
	}

	/// Replace the running tick (if any) with `tick`, starting next frame.
	pub fn start(&self, tick: impl FnMut(f64) -> bool + 'static) {
		let inner = &self.inner;
		inner.generation.set(inner.generation.get() + 1);
		*inner.tick.borrow_mut() = Some(Box::new(tick));
		if inner.handle.get().is_none() {
			inner.schedule();
		}
	}

	pub fn cancel(&self) {
		self.inner.cancel();
	}
}

impl Default for FrameLoop {
	fn default() -> Self {
		Self::new()
	}
}

impl Inner {
	fn schedule(&self) {
		let Some(window) = web_sys::window() else {
			return;
		};
		let callback = self.callback.borrow();
		let Some(cb) = callback.as_ref() else {
			return;
		};
		if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
			self.handle.set(Some(id));
		}
	}

	fn on_frame(&self, ts: f64) {
		self.handle.set(None);
		let generation = self.generation.get();
		let Some(mut tick) = self.tick.borrow_mut().take() else {
			return;
		};
		let keep_going = tick(ts);
		// restarted or cancelled from inside the tick
		if self.generation.get() != generation {
			return;
		}
		if keep_going {
			*self.tick.borrow_mut() = Some(tick);
			self.schedule();
		}
	}

	fn cancel(&self) {
		self.generation.set(self.generation.get() + 1);
		self.tick.borrow_mut().take();
		if let Some(id) = self.handle.take() {
			if let Some(window) = web_sys::window() {
				let _ = window.cancel_animation_frame(id);
			}
		}
	}
}

impl Drop for Inner {
	fn drop(&mut self) {
		self.cancel();
	}
}
