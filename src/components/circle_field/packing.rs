//! Circle packing by iterative relaxation.
//!
//! Every step pulls ordinary nodes toward a point slightly above the origin
//! (stretched to the screen's aspect ratio), drags special nodes under the
//! lowest large node, then resolves pairwise overlaps. The result is in an
//! arbitrary coordinate space; [`super::fit::fit_to_screen`] maps it onto the
//! window.

use rand::Rng;

use super::types::{AnimSeed, ClusterSpec, Node, NodeKind, Rotation, Spin};
use crate::geometry::{Point, Viewport};

/// Tuning constants of the relaxation.
#[derive(Clone, Debug, PartialEq)]
pub struct PackingParams {
	/// Step budget for clusters up to [`Self::FULL_BUDGET_NODES`] nodes.
	pub iterations: usize,
	/// Never run fewer steps than this, however large the cluster.
	pub min_iterations: usize,
	pub base_radius: f64,
	/// Small radius = large radius × this.
	pub size_ratio: f64,
	/// Fraction of the distance to the anchor a special node covers per step.
	pub anchor_gain: f64,
	/// Constant downward drift of special nodes per step.
	pub anchor_drop: f64,
	pub base_gravity: f64,
	/// Ordinary nodes gather around `(0, gravity_target_y)`.
	pub gravity_target_y: f64,
	/// Extra clearance between a special node and an ordinary small node, in
	/// multiples of the special node's radius.
	pub special_gap: f64,
	/// Half-width of the square that initial positions are drawn from.
	pub seed_spread: f64,
	pub special_start_y: f64,
}

impl PackingParams {
	pub const FULL_BUDGET_NODES: usize = 64;

	/// Step budget for `n` nodes. Each step is O(n²), so past
	/// [`Self::FULL_BUDGET_NODES`] the budget shrinks to keep the total pair
	/// evaluations roughly constant.
	pub fn iterations_for(&self, n: usize) -> usize {
		if n <= Self::FULL_BUDGET_NODES {
			return self.iterations;
		}
		let ratio = Self::FULL_BUDGET_NODES as f64 / n as f64;
		((self.iterations as f64 * ratio * ratio) as usize).max(self.min_iterations)
	}

	pub fn radius_for(&self, kind: NodeKind) -> f64 {
		match kind {
			NodeKind::Large => self.base_radius,
			NodeKind::Small => self.base_radius * self.size_ratio,
		}
	}
}

impl Default for PackingParams {
	fn default() -> Self {
		Self {
			iterations: 3000,
			min_iterations: 300,
			base_radius: 10.0,
			size_ratio: 0.7,
			anchor_gain: 0.05,
			anchor_drop: 0.5,
			base_gravity: 0.005,
			gravity_target_y: -20.0,
			special_gap: 3.0,
			seed_spread: 1.0,
			special_start_y: 100.0,
		}
	}
}

/// Entrance jitter ranges, in seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct EntranceParams {
	pub max_delay: f64,
	pub min_duration: f64,
	pub duration_spread: f64,
}

impl Default for EntranceParams {
	fn default() -> Self {
		Self {
			max_delay: 0.5,
			min_duration: 1.0,
			duration_spread: 0.4,
		}
	}
}

/// Place every node of `spec` at a random starting point near the origin and
/// roll its cosmetic and entrance parameters.
pub fn seed_nodes<R: Rng + ?Sized>(
	spec: &ClusterSpec,
	params: &PackingParams,
	entrance: &EntranceParams,
	rng: &mut R,
) -> Vec<Node> {
	let spread = params.seed_spread;
	spec.nodes
		.iter()
		.map(|s| {
			let x = rng.gen_range(-spread..=spread);
			let y = if s.special {
				params.special_start_y
			} else {
				rng.gen_range(-spread..=spread)
			};
			let rotation = Rotation {
				initial_deg: rng.gen_range(0.0..360.0),
				spin: if rng.gen_bool(0.5) {
					Spin::Clockwise
				} else {
					Spin::CounterClockwise
				},
			};
			let anim = AnimSeed {
				delay: rng.gen_range(0.0..=entrance.max_delay),
				duration: entrance.min_duration
					+ rng.gen_range(0.0..=entrance.duration_spread),
			};
			Node {
				position: Point::new(x, y),
				radius: params.radius_for(s.kind),
				kind: s.kind,
				special: s.special,
				payload: s.payload.clone(),
				image: s.image.clone(),
				anim,
				rotation,
			}
		})
		.collect()
}

/// Index of the large node lowest on screen (largest y).
pub fn anchor_index(nodes: &[Node]) -> Option<usize> {
	nodes
		.iter()
		.enumerate()
		.filter(|(_, n)| n.kind == NodeKind::Large)
		.max_by(|(_, a), (_, b)| a.position.y.total_cmp(&b.position.y))
		.map(|(i, _)| i)
}

/// Clearance required between `a` and `b` on top of their radii.
fn pair_gap(a: &Node, b: &Node, params: &PackingParams) -> f64 {
	if a.special && b.is_ordinary_small() {
		a.radius * params.special_gap
	} else if b.special && a.is_ordinary_small() {
		b.radius * params.special_gap
	} else {
		0.0
	}
}

/// One relaxation step. Nodes are updated in place, in order, so later nodes
/// see the moves of earlier ones within the same step.
pub fn step(nodes: &mut [Node], viewport: Viewport, params: &PackingParams) {
	let aspect = viewport.aspect_ratio();
	let anchor = anchor_index(nodes);
	let gravity_x = params.base_gravity / aspect;
	let gravity_y = params.base_gravity * aspect;

	for i in 0..nodes.len() {
		if nodes[i].special {
			if let Some(a) = anchor {
				let target = nodes[a].position;
				let p = &mut nodes[i].position;
				p.x += (target.x - p.x) * params.anchor_gain;
				p.y += (target.y - p.y) * params.anchor_gain + params.anchor_drop;
			}
		} else {
			let p = &mut nodes[i].position;
			p.x -= p.x * gravity_x;
			p.y -= (p.y - params.gravity_target_y) * gravity_y;
		}

		for j in 0..nodes.len() {
			if i == j {
				continue;
			}
			let (a, b) = (&nodes[i], &nodes[j]);
			let (dx, dy) = (a.position.x - b.position.x, a.position.y - b.position.y);
			let d = dx.hypot(dy);
			let min_dist = a.radius + b.radius + pair_gap(a, b, params);
			// coincident centers have no direction to push along
			if d > 0.0 && d < min_dist {
				let push = (min_dist - d) / 2.0;
				let p = &mut nodes[i].position;
				p.x += dx / d * push;
				p.y += dy / d * push;
			}
		}
	}
}

/// Seed and relax a cluster for the given viewport.
pub fn pack<R: Rng + ?Sized>(
	spec: &ClusterSpec,
	viewport: Viewport,
	params: &PackingParams,
	entrance: &EntranceParams,
	rng: &mut R,
) -> Vec<Node> {
	let mut nodes = seed_nodes(spec, params, entrance, rng);
	for _ in 0..params.iterations_for(nodes.len()) {
		step(&mut nodes, viewport, params);
	}
	nodes
}
