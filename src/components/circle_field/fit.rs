//! Screen fitting of a packed cluster.

use super::types::Node;
use crate::geometry::Viewport;

/// Gap kept between the cluster and every window edge, in pixels.
pub const MARGIN: f64 = 20.0;

/// Axis-aligned bounds of a set of circles, radii included.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl Bounds {
	pub fn of(nodes: &[Node]) -> Option<Self> {
		let first = nodes.first()?;
		let init = Bounds {
			min_x: first.position.x - first.radius,
			min_y: first.position.y - first.radius,
			max_x: first.position.x + first.radius,
			max_y: first.position.y + first.radius,
		};
		Some(nodes.iter().fold(init, |b, n| Bounds {
			min_x: b.min_x.min(n.position.x - n.radius),
			min_y: b.min_y.min(n.position.y - n.radius),
			max_x: b.max_x.max(n.position.x + n.radius),
			max_y: b.max_y.max(n.position.y + n.radius),
		}))
	}

	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}
}

/// Scale the packed cluster uniformly so it fills the window minus `margin`,
/// and center it. Single pass.
pub fn fit_to_screen(nodes: &mut [Node], viewport: Viewport, margin: f64) {
	let Some(bounds) = Bounds::of(nodes) else {
		return;
	};
	let target_w = viewport.width - margin * 2.0;
	let target_h = viewport.height - margin * 2.0;
	let scale = match (bounds.width() > 0.0, bounds.height() > 0.0) {
		(true, true) => (target_w / bounds.width()).min(target_h / bounds.height()),
		(true, false) => target_w / bounds.width(),
		(false, true) => target_h / bounds.height(),
		(false, false) => return,
	};
	// no room inside the margins
	if !scale.is_finite() || scale <= 0.0 {
		return;
	}
	let cx = (bounds.min_x + bounds.max_x) / 2.0;
	let cy = (bounds.min_y + bounds.max_y) / 2.0;
	let center = viewport.center();

	for n in nodes.iter_mut() {
		n.position.x = center.x + (n.position.x - cx) * scale;
		n.position.y = center.y + (n.position.y - cy) * scale;
		n.radius *= scale;
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;
	use crate::components::circle_field::packing::{EntranceParams, PackingParams, pack};
	use crate::components::circle_field::types::ClusterSpec;

	#[test]
	fn fitted_cluster_stays_inside_margins() {
		let viewports = [
			Viewport::new(1920.0, 1080.0),
			Viewport::new(390.0, 844.0),
			Viewport::new(1000.0, 1000.0),
		];
		let eps = 1e-6;
		for (seed, vp) in viewports.into_iter().enumerate() {
			let mut rng = StdRng::seed_from_u64(seed as u64);
			let mut nodes = pack(
				&ClusterSpec::with_counts(5, 8, 2),
				vp,
				&PackingParams::default(),
				&EntranceParams::default(),
				&mut rng,
			);
			fit_to_screen(&mut nodes, vp, MARGIN);
			let b = Bounds::of(&nodes).unwrap();
			assert!(b.min_x >= MARGIN - eps && b.max_x <= vp.width - MARGIN + eps);
			assert!(b.min_y >= MARGIN - eps && b.max_y <= vp.height - MARGIN + eps);
			// one axis is tight
			let tight_x = (b.width() - (vp.width - 2.0 * MARGIN)).abs() < eps;
			let tight_y = (b.height() - (vp.height - 2.0 * MARGIN)).abs() < eps;
			assert!(tight_x || tight_y);
		}
	}

	#[test]
	fn fit_preserves_radius_ratio() {
		let mut rng = StdRng::seed_from_u64(9);
		let vp = Viewport::new(1280.0, 720.0);
		let mut nodes = pack(
			&ClusterSpec::with_counts(5, 8, 2),
			vp,
			&PackingParams::default(),
			&EntranceParams::default(),
			&mut rng,
		);
		fit_to_screen(&mut nodes, vp, MARGIN);
		let large = nodes[0].radius;
		let small = nodes[5].radius;
		assert!((large / small - 1.0 / 0.7).abs() < 1e-9);
	}

	#[test]
	fn margins_wider_than_viewport_leave_cluster_unscaled() {
		let mut rng = StdRng::seed_from_u64(3);
		let spec = ClusterSpec::with_counts(5, 4, 2);
		let vp = Viewport::new(30.0, 30.0);
		let mut nodes = pack(&spec, vp, &PackingParams::default(), &EntranceParams::default(), &mut rng);
		let before = nodes.clone();
		fit_to_screen(&mut nodes, vp, MARGIN);
		assert_eq!(nodes, before);
		assert!(nodes.iter().all(|n| n.radius > 0.0));
	}

	#[test]
	fn empty_cluster_is_left_alone() {
		let mut nodes: Vec<Node> = Vec::new();
		fit_to_screen(&mut nodes, Viewport::new(100.0, 100.0), MARGIN);
		assert!(nodes.is_empty());
	}
}
