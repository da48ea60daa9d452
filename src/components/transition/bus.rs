//! Typed publish/subscribe channel for transition signals.
//!
//! Handlers run on the emitting call stack. A signal emitted while a dispatch
//! is already running is queued and delivered after it, so a handler never
//! runs re-entrantly.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// A node or link was activated at `(x, y)`.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionStart {
	pub x: f64,
	pub y: f64,
	pub href: String,
	pub color: String,
}

/// A return control was activated.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionBack {
	pub href: String,
	pub color: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TransitionSignal {
	Start(TransitionStart),
	Back(TransitionBack),
	/// Navigation was requested by the transition overlay.
	Navigated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Rc<RefCell<dyn FnMut(&TransitionSignal)>>;

#[derive(Default)]
struct BusInner {
	next_id: u64,
	handlers: Vec<(SubscriptionId, Handler)>,
	queue: VecDeque<TransitionSignal>,
	dispatching: bool,
}

/// Cheap to clone; clones share the same subscriber list.
#[derive(Clone, Default)]
pub struct SignalBus {
	inner: Rc<RefCell<BusInner>>,
}

impl SignalBus {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn subscribe(&self, handler: impl FnMut(&TransitionSignal) + 'static) -> SubscriptionId {
		let mut inner = self.inner.borrow_mut();
		let id = SubscriptionId(inner.next_id);
		inner.next_id += 1;
		let handler: Handler = Rc::new(RefCell::new(handler));
		inner.handlers.push((id, handler));
		id
	}

	pub fn unsubscribe(&self, id: SubscriptionId) {
		self.inner.borrow_mut().handlers.retain(|(h, _)| *h != id);
	}

	pub fn subscriber_count(&self) -> usize {
		self.inner.borrow().handlers.len()
	}

	pub fn emit(&self, signal: TransitionSignal) {
		{
			let mut inner = self.inner.borrow_mut();
			inner.queue.push_back(signal);
			if inner.dispatching {
				return;
			}
			inner.dispatching = true;
		}

		loop {
			let next = {
				let mut inner = self.inner.borrow_mut();
				match inner.queue.pop_front() {
					Some(signal) => Some((signal, inner.handlers.clone())),
					None => {
						inner.dispatching = false;
						None
					}
				}
			};
			let Some((signal, handlers)) = next else {
				break;
			};
			for (id, handler) in handlers {
				let live = self.inner.borrow().handlers.iter().any(|(h, _)| *h == id);
				if live {
					let mut handler = handler.borrow_mut();
					(*handler)(&signal);
				}
			}
		}
	}
}
