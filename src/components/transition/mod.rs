//! Circular wipe transitions between pages.
//!
//! Nodes and links publish [`TransitionSignal`]s on a [`SignalBus`]; the
//! [`TransitionOverlay`] feeds them to a [`TransitionMachine`] that drives a
//! full-screen overlay and asks the router to navigate. The bus, the
//! [`TransitionCenters`] registry, the overlay's current [`Phase`] and a
//! settle counter are created once by [`TransitionContext::provide`] and
//! shared through Leptos context.

pub mod bus;
mod driver;
mod link;
pub mod machine;
mod overlay;
pub mod registry;
pub mod route;

use leptos::prelude::*;

pub use bus::{SignalBus, SubscriptionId, TransitionBack, TransitionSignal, TransitionStart};
pub use driver::{DriverFrame, TransitionDriver};
pub use link::{BackButton, TransitionLink};
pub use machine::{Phase, TransitionMachine, TransitionTimings};
pub use overlay::TransitionOverlay;
pub use registry::TransitionCenters;
pub use route::{LeptosRouter, Router, route_key};

/// Session-wide transition services.
#[derive(Clone, Copy)]
pub struct TransitionContext {
	bus: StoredValue<SignalBus, LocalStorage>,
	centers: StoredValue<TransitionCenters, LocalStorage>,
	phase: RwSignal<Phase>,
	settle: RwSignal<u64>,
}

impl TransitionContext {
	/// Create the services and provide them to descendants. Call once, at
	/// the application root.
	pub fn provide() -> Self {
		let ctx = Self {
			bus: StoredValue::new_local(SignalBus::new()),
			centers: StoredValue::new_local(TransitionCenters::new()),
			phase: RwSignal::new(Phase::Idle),
			settle: RwSignal::new(0),
		};
		provide_context(ctx);
		ctx
	}

	pub fn from_context() -> Option<Self> {
		use_context::<Self>()
	}

	pub fn bus(&self) -> SignalBus {
		self.bus.get_value()
	}

	pub fn centers(&self) -> TransitionCenters {
		self.centers.get_value()
	}

	pub fn emit(&self, signal: TransitionSignal) {
		self.bus().emit(signal);
	}

	/// Drop a subscription; a no-op once the context has been disposed.
	pub fn unsubscribe(&self, id: SubscriptionId) {
		if let Some(bus) = self.bus.try_get_value() {
			bus.unsubscribe(id);
		}
	}

	/// Phase the overlay is in. Tracks reactively.
	pub fn phase(&self) -> Phase {
		self.phase.get()
	}

	pub fn phase_untracked(&self) -> Phase {
		self.phase.get_untracked()
	}

	pub(super) fn set_phase(&self, phase: Phase) {
		if self.phase.get_untracked() != phase {
			self.phase.set(phase);
		}
	}

	/// Ask every entrance animation to jump to its end state.
	pub fn request_settle(&self) {
		self.settle.update(|n| *n += 1);
	}

	/// Number of settle requests so far. Tracks reactively.
	pub fn settle_requests(&self) -> u64 {
		self.settle.get()
	}
}
