//! One-shot "pop-in" of the circle field.
//!
//! Each node grows from nothing after its own random delay and overshoots
//! slightly before settling at full size. Once every node has settled the
//! scheduler remembers it for the rest of the session, so regenerating the
//! layout (e.g. on resize) shows the circles at full size straight away.

use super::types::Node;

/// Overshoot of [`viscous_pop`]; the peak is about 5% above full size.
pub const POP_OVERSHOOT: f64 = 1.2;

/// Overshoot-and-settle easing: 0 at `t = 0`, 1 at `t = 1`, a single hump
/// above 1 in between and no oscillation.
///
/// `1 + (c+1)(t-1)^3 + c(t-1)^2`, expanded around `t` so the start is exactly
/// zero rather than a rounding error below it.
pub fn viscous_pop(t: f64, c: f64) -> f64 {
	t * ((c + 1.0) * t * t - (2.0 * c + 3.0) * t + (c + 3.0))
}

/// Scale of one node `elapsed` seconds after the animation started.
pub fn node_scale(node: &Node, elapsed: f64) -> f64 {
	let duration = node.anim.duration.max(f64::EPSILON);
	let t = ((elapsed - node.anim.delay) / duration).clamp(0.0, 1.0);
	if t <= 0.0 {
		0.0
	} else if t >= 1.0 {
		1.0
	} else {
		viscous_pop(t, POP_OVERSHOOT)
	}
}

/// Per-frame output of the scheduler.
#[derive(Clone, Debug, PartialEq)]
pub struct EntranceFrame {
	pub scales: Vec<f64>,
	pub finished: bool,
}

#[derive(Clone, Debug, Default)]
pub struct EntranceScheduler {
	started_at: Option<f64>,
	running: bool,
	completed: bool,
}

impl EntranceScheduler {
	pub fn new() -> Self {
		Self::default()
	}

	/// The pop-in has played (or was skipped) this session.
	pub fn is_completed(&self) -> bool {
		self.completed
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Prepare for a freshly generated layout of `count` nodes and return the
	/// scales to show before the first frame. Deep links (`on_home == false`)
	/// skip the animation for good.
	pub fn begin(&mut self, count: usize, on_home: bool) -> Vec<f64> {
		self.started_at = None;
		if self.completed || !on_home {
			self.completed = true;
			self.running = false;
			vec![1.0; count]
		} else {
			self.running = true;
			vec![0.0; count]
		}
	}

	/// Scales at timestamp `now_ms`. The first call after [`Self::begin`]
	/// defines time zero.
	pub fn frame(&mut self, nodes: &[Node], now_ms: f64) -> EntranceFrame {
		if !self.running {
			return EntranceFrame {
				scales: vec![1.0; nodes.len()],
				finished: true,
			};
		}
		let start = *self.started_at.get_or_insert(now_ms);
		let elapsed = (now_ms - start) / 1000.0;
		let scales: Vec<f64> = nodes.iter().map(|n| node_scale(n, elapsed)).collect();
		let finished = nodes
			.iter()
			.all(|n| elapsed - n.anim.delay >= n.anim.duration);
		if finished {
			self.settle();
			return EntranceFrame {
				scales: vec![1.0; nodes.len()],
				finished,
			};
		}
		EntranceFrame { scales, finished }
	}

	/// Jump every node to its end state and stop.
	pub fn settle(&mut self) {
		self.running = false;
		self.completed = true;
	}
}
