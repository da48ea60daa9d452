//! Layout generation, and the state the circle field component renders from.

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::entrance::EntranceScheduler;
use super::fit::{MARGIN, fit_to_screen};
use super::packing::{EntranceParams, PackingParams, pack};
use super::types::{ClusterSpec, Node, Payload};
use crate::geometry::{Clip, Viewport};
use crate::site;

/// Displayed circle diameter relative to the packed diameter.
pub const DISPLAY_FILL: f64 = 0.95;
/// Vertical stretch of the circle masks (80:81).
pub const MASK_ASPECT: f64 = 81.0 / 80.0;

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
	#[error("viewport {width}x{height} has no usable area")]
	EmptyViewport { width: f64, height: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	pub margin: f64,
	pub packing: PackingParams,
	pub entrance: EntranceParams,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			margin: MARGIN,
			packing: PackingParams::default(),
			entrance: EntranceParams::default(),
		}
	}
}

/// Pack `spec` and fit it to `viewport`. A viewport with no room left inside
/// the margins is refused.
pub fn generate_layout(
	spec: &ClusterSpec,
	viewport: Viewport,
	config: &LayoutConfig,
	rng: &mut StdRng,
) -> Result<Vec<Node>, LayoutError> {
	let room = config.margin * 2.0;
	if !viewport.is_usable() || viewport.width <= room || viewport.height <= room {
		return Err(LayoutError::EmptyViewport {
			width: viewport.width,
			height: viewport.height,
		});
	}
	let mut nodes = pack(spec, viewport, &config.packing, &config.entrance, rng);
	fit_to_screen(&mut nodes, viewport, config.margin);
	Ok(nodes)
}

/// Full-screen color layer painted behind a section page, clipped to an
/// ellipse grown out of the node that leads there.
#[derive(Clone, Debug, PartialEq)]
pub struct Backdrop {
	pub color: String,
	pub clip: Clip,
}

pub struct CircleFieldState {
	pub nodes: Vec<Node>,
	pub scales: Vec<f64>,
	pub viewport: Viewport,
	pub entrance: EntranceScheduler,
	/// Node whose wipe is in progress from the home screen.
	pub clicked: Option<usize>,
	wipe_running: bool,
	mounted: bool,
	spec: ClusterSpec,
	config: LayoutConfig,
	rng: StdRng,
}

impl CircleFieldState {
	pub fn new(spec: ClusterSpec, config: LayoutConfig, seed: u64) -> Self {
		Self {
			nodes: Vec::new(),
			scales: Vec::new(),
			viewport: Viewport::default(),
			entrance: EntranceScheduler::new(),
			clicked: None,
			wipe_running: false,
			mounted: false,
			spec,
			config,
			rng: StdRng::seed_from_u64(seed),
		}
	}

	/// A layout exists.
	pub fn is_mounted(&self) -> bool {
		self.mounted
	}

	/// Generate a new layout for `viewport`. Returns whether the entrance
	/// animation has to run.
	pub fn regenerate(&mut self, viewport: Viewport, route: &str) -> Result<bool, LayoutError> {
		let nodes = generate_layout(&self.spec, viewport, &self.config, &mut self.rng)?;
		self.scales = self.entrance.begin(nodes.len(), route == "/");
		self.nodes = nodes;
		self.viewport = viewport;
		// node order is fixed per cluster, so the clicked index survives a resize
		if !self.wipe_running {
			self.clicked = None;
		}
		self.mounted = true;
		Ok(self.entrance.is_running())
	}

	/// Advance the entrance animation. Returns `true` while more frames are needed.
	pub fn tick(&mut self, now_ms: f64) -> bool {
		let frame = self.entrance.frame(&self.nodes, now_ms);
		self.scales = frame.scales;
		!frame.finished
	}

	pub fn settle(&mut self) {
		self.entrance.settle();
		self.scales = vec![1.0; self.nodes.len()];
	}

	/// Node whose destination is the current route.
	pub fn active_index(&self, route: &str) -> Option<usize> {
		if route == "/" {
			return None;
		}
		self.nodes.iter().position(|n| n.route() == Some(route))
	}

	pub fn is_hidden(&self, index: usize, route: &str) -> bool {
		if site::is_detail_page(route) {
			return true;
		}
		if route == "/" {
			return self.clicked.is_some_and(|c| c != index);
		}
		self.active_index(route).is_some_and(|a| a != index)
	}

	/// Clicks only land on the home screen while no wipe is running.
	pub fn accepts_clicks(&self, route: &str) -> bool {
		route == "/" && self.clicked.is_none() && !self.wipe_running
	}

	/// Track the transition overlay. When it goes idle the field is released
	/// even if the wipe it started never got under way.
	pub fn set_wipe_running(&mut self, running: bool) {
		self.wipe_running = running;
		if !running {
			self.clicked = None;
		}
	}

	pub fn backdrop(&self, route: &str) -> Option<Backdrop> {
		let active = self.active_index(route).map(|i| &self.nodes[i]);
		let color = match active.and_then(|n| n.payload.as_ref()) {
			Some(Payload::Route { color, .. }) => color.clone(),
			_ => site::background_for_path(route)?.to_string(),
		};
		let clip = match active {
			Some(n) => {
				let reach = self.viewport.diagonal();
				Clip::Ellipse {
					center: n.position,
					rx: reach,
					ry: reach * MASK_ASPECT,
				}
			}
			None => Clip::None,
		};
		Some(Backdrop { color, clip })
	}
}
