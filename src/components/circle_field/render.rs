//! Inline styles for the circle field's DOM.

use super::state::{Backdrop, DISPLAY_FILL};
use super::types::{Node, Payload, Spin};
use crate::site;

/// Displayed diameter of a node in pixels.
pub fn display_size(node: &Node) -> f64 {
	node.radius * 2.0 * DISPLAY_FILL
}

/// Absolutely positioned wrapper centered on the node, scaled by the
/// entrance animation.
pub fn wrapper_style(node: &Node, scale: f64, hidden: bool, interactive: bool) -> String {
	let size = display_size(node);
	format!(
		"position: absolute; left: {}px; top: {}px; width: {size}px; height: {size}px; \
		 transform: translate(-50%, -50%) scale({scale}); visibility: {}; \
		 pointer-events: {}; cursor: {};",
		node.position.x,
		node.position.y,
		if hidden { "hidden" } else { "visible" },
		if interactive { "auto" } else { "none" },
		if interactive && node.payload.is_some() {
			"pointer"
		} else {
			"default"
		},
	)
}

pub fn mask_class(spin: Spin) -> &'static str {
	match spin {
		Spin::Clockwise => "circle-mask circle-mask-cw",
		Spin::CounterClockwise => "circle-mask circle-mask-ccw",
	}
}

/// Fill behind a node's image.
pub fn node_background(node: &Node) -> &str {
	match &node.payload {
		Some(Payload::Route { color, .. }) => color,
		Some(Payload::External { .. }) => site::PURPLE_BACKGROUND,
		_ => "transparent",
	}
}

pub fn mask_style(node: &Node) -> String {
	format!(
		"width: 100%; height: 100%; background-color: {}; --initial-rotation: {}deg;",
		node_background(node),
		node.rotation.initial_deg,
	)
}

pub fn backdrop_style(backdrop: &Backdrop) -> String {
	format!(
		"position: fixed; inset: 0; background-color: {}; clip-path: {};",
		backdrop.color,
		backdrop.clip.to_css(),
	)
}

/// White-fading layer over the backdrop. Fades in once a section route is
/// showing and out again on home.
pub fn gradient_style(color: Option<&str>) -> String {
	let (background, opacity) = match color {
		Some(color) => (format!("linear-gradient({color}, #ffffff) no-repeat fixed"), 1),
		None => ("none".to_string(), 0),
	};
	format!(
		"position: fixed; inset: 0; pointer-events: none; background: {background}; \
		 opacity: {opacity}; transition: opacity 0.4s ease-out;"
	)
}
