//! Phase machine for page-transition wipes.
//!
//! Forward: `ForwardExpand` grows a circle from the click point to the window
//! diagonal and asks for navigation at 85% of the way. Once the route has
//! actually changed the flat layer fades out (`ForwardFadeOut`).
//!
//! Back: `BackFadeIn` fades a full-screen layer in, `BackNavigate` waits for
//! the parent route to commit, and `BackShrink` shrinks a circle toward the
//! point the current route was entered from.
//!
//! The machine owns no timers. Callers feed it timestamps through
//! [`TransitionMachine::advance`] (every animation frame) and
//! [`TransitionMachine::transition_end`] (CSS `transitionend`), and carry out
//! the returned [`Effect`]s. Every wait has a deadline, so every sequence
//! returns to [`Phase::Idle`].

use log::debug;

use super::bus::{TransitionBack, TransitionStart};
use super::registry::TransitionCenters;
use super::route::route_key;
use crate::geometry::{Clip, Point, Viewport};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
	#[default]
	Idle,
	ForwardExpand,
	ForwardFadeOut,
	BackFadeIn,
	BackNavigate,
	BackShrink,
}

/// Durations in milliseconds.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionTimings {
	pub expand_ms: f64,
	/// Fraction of the expand at which navigation is requested.
	pub navigate_at: f64,
	pub fade_ms: f64,
	/// Deadline for a fade's `transitionend`.
	pub fade_timeout_ms: f64,
	pub shrink_ms: f64,
	/// Deadline for the router to report the destination after navigation
	/// was requested.
	pub commit_timeout_ms: f64,
}

impl Default for TransitionTimings {
	fn default() -> Self {
		Self {
			expand_ms: 1600.0,
			navigate_at: 0.85,
			fade_ms: 400.0,
			fade_timeout_ms: 600.0,
			shrink_ms: 800.0,
			commit_timeout_ms: 2000.0,
		}
	}
}

pub fn ease_out_cubic(p: f64) -> f64 {
	1.0 - (1.0 - p).powi(3)
}

pub fn ease_in_quad(p: f64) -> f64 {
	p * p
}

/// The single in-flight wipe.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransitionState {
	pub phase: Phase,
	pub center: Point,
	pub color: String,
	/// Path the transition is heading to.
	pub target_route: String,
	/// Destination exactly as given by the signal.
	pub target_href: String,
}

/// Work the machine asks its caller to do.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
	Navigate(String),
	/// Announce that navigation was requested.
	EmitNavigated,
	/// Jump pending entrance animations on the new page to their end state.
	SettleEntrances,
}

/// CSS opacity transition to run on the overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct Fade {
	pub from: f64,
	pub to: f64,
	pub duration_ms: f64,
	pub easing: &'static str,
	pub started_at: f64,
}

impl Fade {
	pub fn css(&self) -> String {
		format!("opacity {}s {}", self.duration_ms / 1000.0, self.easing)
	}

	/// Linear estimate of the opacity at `now`.
	pub fn opacity_at(&self, now: f64) -> f64 {
		let p = ((now - self.started_at) / self.duration_ms).clamp(0.0, 1.0);
		self.from + (self.to - self.from) * p
	}
}

/// Everything needed to draw the overlay for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
	pub phase: Phase,
	pub color: String,
	pub clip: Clip,
	pub opacity: f64,
	pub fade: Option<Fade>,
}

#[derive(Clone, Debug, Default)]
pub struct TransitionMachine {
	timings: TransitionTimings,
	state: TransitionState,
	phase_started_at: f64,
	navigation_requested_at: Option<f64>,
}

impl TransitionMachine {
	pub fn new(timings: TransitionTimings) -> Self {
		Self {
			timings,
			..Self::default()
		}
	}

	pub fn state(&self) -> &TransitionState {
		&self.state
	}

	pub fn phase(&self) -> Phase {
		self.state.phase
	}

	pub fn is_idle(&self) -> bool {
		self.state.phase == Phase::Idle
	}

	/// Begin a forward wipe. Ignored unless idle.
	pub fn start(&mut self, signal: &TransitionStart, now: f64, centers: &TransitionCenters) -> bool {
		if !self.is_idle() {
			debug!("transition: start to {} ignored in {:?}", signal.href, self.state.phase);
			return false;
		}
		let center = Point::new(signal.x, signal.y);
		let target_route = route_key(&signal.href);
		centers.record(target_route.clone(), center);
		self.state = TransitionState {
			phase: Phase::Idle,
			center,
			color: signal.color.clone(),
			target_route,
			target_href: signal.href.clone(),
		};
		self.enter(Phase::ForwardExpand, now);
		true
	}

	/// Begin a back wipe out of `current_route`. Ignored unless idle.
	pub fn back(
		&mut self,
		signal: &TransitionBack,
		current_route: &str,
		now: f64,
		viewport: Viewport,
		centers: &TransitionCenters,
	) -> bool {
		if !self.is_idle() {
			debug!("transition: back to {} ignored in {:?}", signal.href, self.state.phase);
			return false;
		}
		let center = centers
			.lookup(current_route)
			.unwrap_or_else(|| viewport.center());
		self.state = TransitionState {
			phase: Phase::Idle,
			center,
			color: signal.color.clone(),
			target_route: route_key(&signal.href),
			target_href: signal.href.clone(),
		};
		self.enter(Phase::BackFadeIn, now);
		true
	}

	/// Progress the running phase to `now`, given the route currently shown.
	pub fn advance(&mut self, now: f64, current_route: &str) -> Vec<Effect> {
		let mut effects = Vec::new();
		let elapsed = now - self.phase_started_at;
		let t = &self.timings;
		match self.state.phase {
			Phase::Idle => {}
			Phase::ForwardExpand => {
				if self.navigation_requested_at.is_none() && elapsed >= t.expand_ms * t.navigate_at {
					self.request_navigation(now, &mut effects);
				}
				if self.route_committed(now, current_route) {
					self.enter(Phase::ForwardFadeOut, now);
				}
			}
			Phase::ForwardFadeOut => {
				if elapsed >= t.fade_timeout_ms {
					debug!("transition: fade-out end not observed, finishing");
					self.reset();
				}
			}
			Phase::BackFadeIn => {
				if elapsed >= t.fade_timeout_ms {
					debug!("transition: fade-in end not observed, navigating");
					self.fade_in_done(now, &mut effects);
				}
			}
			Phase::BackNavigate => {
				if self.route_committed(now, current_route) {
					self.enter(Phase::BackShrink, now);
					effects.push(Effect::SettleEntrances);
				}
			}
			Phase::BackShrink => {
				if elapsed >= t.shrink_ms {
					self.reset();
				}
			}
		}
		effects
	}

	/// The overlay's CSS opacity transition finished.
	pub fn transition_end(&mut self, now: f64) -> Vec<Effect> {
		let mut effects = Vec::new();
		match self.state.phase {
			Phase::ForwardFadeOut => self.reset(),
			Phase::BackFadeIn => self.fade_in_done(now, &mut effects),
			_ => {}
		}
		effects
	}

	/// Drop any in-flight transition.
	pub fn reset(&mut self) {
		if !self.is_idle() {
			debug!("transition: {:?} -> Idle", self.state.phase);
		}
		self.state = TransitionState::default();
		self.phase_started_at = 0.0;
		self.navigation_requested_at = None;
	}

	/// Overlay geometry at `now`, or `None` while idle.
	pub fn overlay(&self, now: f64, viewport: Viewport) -> Option<Overlay> {
		let t = &self.timings;
		let elapsed = (now - self.phase_started_at).max(0.0);
		let center = self.state.center;
		let reach = viewport.diagonal();
		let full = Clip::Circle {
			center,
			radius: reach,
		};
		let fade = |from: f64, to: f64, easing| Fade {
			from,
			to,
			duration_ms: t.fade_ms,
			easing,
			started_at: self.phase_started_at,
		};

		let (clip, fade) = match self.state.phase {
			Phase::Idle => return None,
			Phase::ForwardExpand => {
				let p = (elapsed / t.expand_ms).min(1.0);
				let clip = Clip::Circle {
					center,
					radius: ease_out_cubic(p) * reach,
				};
				(clip, None)
			}
			Phase::ForwardFadeOut => (full, Some(fade(1.0, 0.0, "ease-out"))),
			Phase::BackFadeIn => (Clip::None, Some(fade(0.0, 1.0, "ease-in"))),
			Phase::BackNavigate => (Clip::None, None),
			Phase::BackShrink => {
				let p = (elapsed / t.shrink_ms).min(1.0);
				let clip = Clip::Circle {
					center,
					radius: reach * (1.0 - ease_in_quad(p)),
				};
				(clip, None)
			}
		};
		let opacity = fade.as_ref().map_or(1.0, |f| f.opacity_at(now));
		Some(Overlay {
			phase: self.state.phase,
			color: self.state.color.clone(),
			clip,
			opacity,
			fade,
		})
	}

	fn enter(&mut self, phase: Phase, now: f64) {
		debug!("transition: {:?} -> {:?}", self.state.phase, phase);
		self.state.phase = phase;
		self.phase_started_at = now;
		if matches!(phase, Phase::ForwardExpand | Phase::BackFadeIn) {
			self.navigation_requested_at = None;
		}
	}

	fn request_navigation(&mut self, now: f64, effects: &mut Vec<Effect>) {
		self.navigation_requested_at = Some(now);
		effects.push(Effect::EmitNavigated);
		effects.push(Effect::Navigate(self.state.target_href.clone()));
	}

	fn fade_in_done(&mut self, now: f64, effects: &mut Vec<Effect>) {
		self.enter(Phase::BackNavigate, now);
		self.request_navigation(now, effects);
	}

	/// The destination is showing, or the router had long enough to show it.
	fn route_committed(&self, now: f64, current_route: &str) -> bool {
		let Some(requested) = self.navigation_requested_at else {
			return false;
		};
		if current_route == self.state.target_route {
			return true;
		}
		let overdue = now - requested >= self.timings.commit_timeout_ms;
		if overdue {
			debug!(
				"transition: route {} never committed, continuing",
				self.state.target_route
			);
		}
		overdue
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const VP: Viewport = Viewport::new(1000.0, 800.0);

	fn start_about() -> TransitionStart {
		TransitionStart {
			x: 500.0,
			y: 500.0,
			href: "/about".into(),
			color: "yellow".into(),
		}
	}

	fn navigations(effects: &[Effect]) -> Vec<&str> {
		effects
			.iter()
			.filter_map(|e| match e {
				Effect::Navigate(p) => Some(p.as_str()),
				_ => None,
			})
			.collect()
	}

	#[test]
	fn second_start_while_busy_changes_nothing() {
		let centers = TransitionCenters::new();
		let mut m = TransitionMachine::default();
		assert!(m.start(&start_about(), 0.0, &centers));
		let before = m.state().clone();

		let other = TransitionStart {
			x: 1.0,
			y: 1.0,
			href: "/works".into(),
			color: "pink".into(),
		};
		assert!(!m.start(&other, 100.0, &centers));
		let back = TransitionBack {
			href: "/".into(),
			color: "pink".into(),
		};
		assert!(!m.back(&back, "/", 100.0, VP, &centers));
		assert_eq!(m.state(), &before);
		assert_eq!(centers.lookup("/works"), None);
	}

	#[test]
	fn forward_start_records_center_for_destination() {
		let centers = TransitionCenters::new();
		let mut m = TransitionMachine::default();
		let signal = TransitionStart {
			href: "/works/a?ref=home".into(),
			..start_about()
		};
		m.start(&signal, 0.0, &centers);
		assert_eq!(centers.lookup("/works/a"), Some(Point::new(500.0, 500.0)));
		assert_eq!(m.state().target_route, "/works/a");
		assert_eq!(m.state().target_href, "/works/a?ref=home");
	}

	#[test]
	fn expand_radius_follows_cubic_ease_out() {
		let mut m = TransitionMachine::default();
		m.start(&start_about(), 1000.0, &TransitionCenters::new());
		let at = |now| match m.overlay(now, VP).unwrap().clip {
			Clip::Circle { radius, .. } => radius,
			other => panic!("unexpected clip {other:?}"),
		};
		assert_eq!(at(1000.0), 0.0);
		let half = at(1800.0);
		assert!((half - ease_out_cubic(0.5) * VP.diagonal()).abs() < 1e-9);
		assert!((at(2600.0) - VP.diagonal()).abs() < 1e-9);
		assert!((at(9000.0) - VP.diagonal()).abs() < 1e-9);
	}

	#[test]
	fn navigation_is_requested_once_at_85_percent() {
		let mut m = TransitionMachine::default();
		m.start(&start_about(), 0.0, &TransitionCenters::new());
		assert!(m.advance(1359.0, "/").is_empty());
		let effects = m.advance(1360.0, "/");
		assert_eq!(navigations(&effects), vec!["/about"]);
		assert!(effects.contains(&Effect::EmitNavigated));
		assert!(navigations(&m.advance(1400.0, "/")).is_empty());
		assert_eq!(m.phase(), Phase::ForwardExpand);
	}

	#[test]
	fn fade_out_ends_on_transition_end() {
		let mut m = TransitionMachine::default();
		m.start(&start_about(), 0.0, &TransitionCenters::new());
		m.advance(1360.0, "/");
		m.advance(1400.0, "/about");
		assert_eq!(m.phase(), Phase::ForwardFadeOut);

		let overlay = m.overlay(1400.0, VP).unwrap();
		let fade = overlay.fade.unwrap();
		assert_eq!((fade.from, fade.to), (1.0, 0.0));
		assert_eq!(fade.css(), "opacity 0.4s ease-out");
		assert_eq!(overlay.opacity, 1.0);
		assert!((m.overlay(1600.0, VP).unwrap().opacity - 0.5).abs() < 1e-9);

		m.transition_end(1800.0);
		assert!(m.is_idle());
		assert!(m.overlay(1800.0, VP).is_none());
	}

	#[test]
	fn fade_out_times_out_without_transition_end() {
		let mut m = TransitionMachine::default();
		m.start(&start_about(), 0.0, &TransitionCenters::new());
		m.advance(1360.0, "/about");
		assert_eq!(m.phase(), Phase::ForwardFadeOut);
		m.advance(1959.0, "/about");
		assert_eq!(m.phase(), Phase::ForwardFadeOut);
		m.advance(1960.0, "/about");
		assert!(m.is_idle());
	}

	#[test]
	fn forward_completes_when_router_never_commits() {
		let mut m = TransitionMachine::default();
		m.start(&start_about(), 0.0, &TransitionCenters::new());
		m.advance(1360.0, "/");
		m.advance(3359.0, "/");
		assert_eq!(m.phase(), Phase::ForwardExpand);
		m.advance(3360.0, "/");
		assert_eq!(m.phase(), Phase::ForwardFadeOut);
		m.advance(3960.0, "/");
		assert!(m.is_idle());
	}

	#[test]
	fn link_to_current_route_still_completes() {
		let mut m = TransitionMachine::default();
		m.start(&start_about(), 0.0, &TransitionCenters::new());
		// already on /about: no commit before the navigation request
		m.advance(100.0, "/about");
		assert_eq!(m.phase(), Phase::ForwardExpand);
		m.advance(1360.0, "/about");
		assert_eq!(m.phase(), Phase::ForwardFadeOut);
	}

	#[test]
	fn back_anchors_on_recorded_center_of_current_route() {
		let centers = TransitionCenters::new();
		centers.record("/about", Point::new(120.0, 640.0));
		let mut m = TransitionMachine::default();
		let back = TransitionBack {
			href: "/".into(),
			color: "yellow".into(),
		};
		assert!(m.back(&back, "/about", 0.0, VP, &centers));
		assert_eq!(m.state().center, Point::new(120.0, 640.0));
		assert_eq!(m.overlay(0.0, VP).unwrap().clip, Clip::None);
	}

	#[test]
	fn back_fade_in_end_requests_navigation_then_shrinks() {
		let mut m = TransitionMachine::default();
		let back = TransitionBack {
			href: "/works".into(),
			color: "yellow".into(),
		};
		m.back(&back, "/works/a", 0.0, VP, &TransitionCenters::new());
		assert_eq!(m.state().center, VP.center());

		let effects = m.transition_end(400.0);
		assert_eq!(navigations(&effects), vec!["/works"]);
		assert_eq!(m.phase(), Phase::BackNavigate);
		// a late timeout must not navigate twice
		assert!(navigations(&m.advance(600.0, "/works/a")).is_empty());

		let effects = m.advance(650.0, "/works");
		assert_eq!(effects, vec![Effect::SettleEntrances]);
		assert_eq!(m.phase(), Phase::BackShrink);

		let radius = |now| match m.overlay(now, VP).unwrap().clip {
			Clip::Circle { radius, .. } => radius,
			other => panic!("unexpected clip {other:?}"),
		};
		assert!((radius(650.0) - VP.diagonal()).abs() < 1e-9);
		assert!((radius(1050.0) - VP.diagonal() * 0.75).abs() < 1e-9);
		m.advance(1450.0, "/works");
		assert!(m.is_idle());
	}
}
