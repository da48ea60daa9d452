//! Runs the transition machine against a real router and the signal bus.

use log::debug;

use super::bus::{SignalBus, TransitionSignal};
use super::machine::{Effect, Overlay, Phase, TransitionMachine};
use super::registry::TransitionCenters;
use super::route::Router;
use crate::geometry::Viewport;

/// Result of driving the machine for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct DriverFrame {
	pub overlay: Option<Overlay>,
	/// Entrance animations should be forced to their end state now.
	pub settle: bool,
}

impl DriverFrame {
	/// More frames are needed.
	pub fn is_active(&self) -> bool {
		self.overlay.is_some()
	}
}

/// Connects a [`TransitionMachine`] to a router, the signal bus and the
/// center registry.
pub struct TransitionDriver<R> {
	machine: TransitionMachine,
	router: R,
	bus: SignalBus,
	centers: TransitionCenters,
}

impl<R: Router> TransitionDriver<R> {
	pub fn new(machine: TransitionMachine, router: R, bus: SignalBus, centers: TransitionCenters) -> Self {
		Self {
			machine,
			router,
			bus,
			centers,
		}
	}

	pub fn machine(&self) -> &TransitionMachine {
		&self.machine
	}

	pub fn router(&self) -> &R {
		&self.router
	}

	pub fn router_mut(&mut self) -> &mut R {
		&mut self.router
	}

	/// Feed a bus signal to the machine. Returns whether a transition started.
	pub fn handle_signal(&mut self, signal: &TransitionSignal, now: f64, viewport: Viewport) -> bool {
		match signal {
			TransitionSignal::Start(start) => self.machine.start(start, now, &self.centers),
			TransitionSignal::Back(back) => {
				let current = self.router.current_route();
				self.machine
					.back(back, &current, now, viewport, &self.centers)
			}
			TransitionSignal::Navigated => false,
		}
	}

	/// Poll the router, advance the machine and carry out its effects.
	pub fn frame(&mut self, now: f64, viewport: Viewport) -> DriverFrame {
		let current = self.router.current_route();
		let effects = self.machine.advance(now, &current);
		let settle = self.apply(effects);
		DriverFrame {
			overlay: self.machine.overlay(now, viewport),
			settle,
		}
	}

	/// The overlay's opacity transition finished.
	pub fn transition_end(&mut self, now: f64) -> bool {
		let effects = self.machine.transition_end(now);
		self.apply(effects)
	}

	pub fn phase(&self) -> Phase {
		self.machine.phase()
	}

	fn apply(&mut self, effects: Vec<Effect>) -> bool {
		let mut settle = false;
		for effect in effects {
			match effect {
				Effect::Navigate(path) => {
					debug!("transition: navigating to {path}");
					self.router.navigate(&path);
				}
				Effect::EmitNavigated => self.bus.emit(TransitionSignal::Navigated),
				Effect::SettleEntrances => settle = true,
			}
		}
		settle
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use super::*;
	use crate::components::transition::bus::{TransitionBack, TransitionStart};
	use crate::geometry::{Clip, Point};

	/// Router whose navigations commit `lag_ms` after they were requested.
	struct MemoryRouter {
		current: String,
		pending: Option<(String, f64)>,
		clock: Rc<RefCell<f64>>,
		lag_ms: f64,
		requests: Vec<String>,
	}

	impl MemoryRouter {
		fn new(route: &str, clock: Rc<RefCell<f64>>, lag_ms: f64) -> Self {
			Self {
				current: route.into(),
				pending: None,
				clock,
				lag_ms,
				requests: Vec::new(),
			}
		}

		fn commit_due(&mut self) {
			let now = *self.clock.borrow();
			if let Some((path, at)) = self.pending.take() {
				if now >= at {
					self.current = path;
				} else {
					self.pending = Some((path, at));
				}
			}
		}
	}

	impl Router for MemoryRouter {
		fn navigate(&mut self, path: &str) {
			let now = *self.clock.borrow();
			self.requests.push(path.to_string());
			self.pending = Some((path.to_string(), now + self.lag_ms));
		}

		fn current_route(&self) -> String {
			self.current.clone()
		}
	}

	const VP: Viewport = Viewport::new(1000.0, 1000.0);
	const FRAME_MS: f64 = 16.0;

	struct Harness {
		driver: TransitionDriver<MemoryRouter>,
		clock: Rc<RefCell<f64>>,
		navigated: Rc<RefCell<usize>>,
	}

	impl Harness {
		fn new(route: &str, lag_ms: f64, centers: TransitionCenters) -> Self {
			let clock = Rc::new(RefCell::new(0.0));
			let bus = SignalBus::new();
			let navigated = Rc::new(RefCell::new(0));
			let n = navigated.clone();
			bus.subscribe(move |s| {
				if *s == TransitionSignal::Navigated {
					*n.borrow_mut() += 1;
				}
			});
			let router = MemoryRouter::new(route, clock.clone(), lag_ms);
			let driver = TransitionDriver::new(TransitionMachine::default(), router, bus, centers);
			Self {
				driver,
				clock,
				navigated,
			}
		}

		fn now(&self) -> f64 {
			*self.clock.borrow()
		}

		/// Run frames until `until` ms, returning every frame produced.
		fn run_until(&mut self, until: f64) -> Vec<(f64, DriverFrame)> {
			let mut frames = Vec::new();
			while self.now() < until {
				*self.clock.borrow_mut() += FRAME_MS;
				self.driver.router_mut().commit_due();
				let now = self.now();
				frames.push((now, self.driver.frame(now, VP)));
			}
			frames
		}
	}

	#[test]
	fn scenario_forward_click_on_about() {
		let mut h = Harness::new("/", 50.0, TransitionCenters::new());
		let start = TransitionSignal::Start(TransitionStart {
			x: 500.0,
			y: 500.0,
			href: "/about".into(),
			color: "yellow".into(),
		});
		assert!(h.driver.handle_signal(&start, 0.0, VP));
		assert_eq!(h.driver.phase(), Phase::ForwardExpand);

		let frames = h.run_until(1344.0);
		assert!(h.driver.router().requests.is_empty());
		assert!(frames.iter().all(|(_, f)| f.overlay.as_ref().unwrap().opacity == 1.0));

		h.run_until(1360.0);
		assert_eq!(h.driver.router().requests, vec!["/about"]);
		assert_eq!(*h.navigated.borrow(), 1);

		let frames = h.run_until(1440.0);
		assert_eq!(h.driver.router().requests.len(), 1);
		assert_eq!(h.driver.phase(), Phase::ForwardFadeOut);
		let (entered, fade) = frames
			.iter()
			.find_map(|(now, f)| {
				let o = f.overlay.as_ref()?;
				(o.phase == Phase::ForwardFadeOut).then(|| (*now, o.fade.clone()))
			})
			.unwrap();
		let fade = fade.unwrap();
		assert_eq!((fade.from, fade.to, fade.duration_ms), (1.0, 0.0, 400.0));

		// the opacity transition reports its end
		h.driver.transition_end(entered + 400.0);
		assert_eq!(h.driver.phase(), Phase::Idle);
		assert!(h.run_until(h.now() + FRAME_MS).iter().all(|(_, f)| !f.is_active()));
	}

	#[test]
	fn scenario_back_without_events_or_registry_entry() {
		let mut h = Harness::new("/about", 30.0, TransitionCenters::new());
		let back = TransitionSignal::Back(TransitionBack {
			href: "/".into(),
			color: "yellow".into(),
		});
		assert!(h.driver.handle_signal(&back, 0.0, VP));
		assert_eq!(h.driver.machine().state().center, VP.center());

		let mut phases = vec![h.driver.phase()];
		let mut settled = 0;
		let mut idle_at = None;
		while h.now() < 2000.0 && idle_at.is_none() {
			for (now, f) in h.run_until(h.now() + FRAME_MS) {
				settled += usize::from(f.settle);
				if phases.last() != Some(&h.driver.phase()) {
					phases.push(h.driver.phase());
				}
				if !f.is_active() {
					idle_at = Some(now);
				}
			}
		}
		assert_eq!(
			phases,
			vec![
				Phase::BackFadeIn,
				Phase::BackNavigate,
				Phase::BackShrink,
				Phase::Idle
			]
		);
		assert_eq!(settled, 1);
		assert_eq!(h.driver.router().requests, vec!["/"]);
		assert!(idle_at.unwrap() <= 2000.0);
	}

	#[test]
	fn back_shrinks_toward_point_route_was_entered_from() {
		let centers = TransitionCenters::new();
		let mut h = Harness::new("/", 0.0, centers.clone());
		let start = TransitionSignal::Start(TransitionStart {
			x: 120.0,
			y: 700.0,
			href: "/works".into(),
			color: "yellow".into(),
		});
		h.driver.handle_signal(&start, 0.0, VP);
		h.run_until(3000.0);
		assert_eq!(h.driver.phase(), Phase::Idle);
		assert_eq!(h.driver.router().current_route(), "/works");

		let back = TransitionSignal::Back(TransitionBack {
			href: "/".into(),
			color: "yellow".into(),
		});
		let now = h.now();
		h.driver.handle_signal(&back, now, VP);
		let shrinking = h
			.run_until(now + 1000.0)
			.into_iter()
			.find_map(|(_, f)| match f.overlay?.clip {
				Clip::Circle { center, .. } => Some(center),
				_ => None,
			});
		assert_eq!(shrinking, Some(Point::new(120.0, 700.0)));
	}

	#[test]
	fn signals_while_busy_are_ignored() {
		let mut h = Harness::new("/", 0.0, TransitionCenters::new());
		let start = |href: &str| {
			TransitionSignal::Start(TransitionStart {
				x: 1.0,
				y: 1.0,
				href: href.into(),
				color: "c".into(),
			})
		};
		assert!(h.driver.handle_signal(&start("/about"), 0.0, VP));
		let before = h.driver.machine().state().clone();
		assert!(!h.driver.handle_signal(&start("/works"), 5.0, VP));
		assert!(!h.driver.handle_signal(&TransitionSignal::Navigated, 5.0, VP));
		assert_eq!(h.driver.machine().state(), &before);
	}
}
