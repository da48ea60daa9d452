//! Node model for the circle field.

use crate::geometry::Point;
use crate::site::{EXTERNAL_LINKS, MAX_THUMBNAILS, NAV_ENTRIES, WorkThumbnail};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
	/// Navigation anchor.
	Large,
	/// Thumbnail or utility circle, 0.7× the large radius.
	Small,
}

/// What activating a node leads to.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
	/// In-site destination reached through a wipe transition.
	Route { href: String, color: String },
	/// Off-site link opened in a new tab.
	External { url: String },
	/// A work thumbnail; clicking opens the work page.
	Thumbnail { slug: String },
}

/// Entrance timing in seconds, rolled once when the node is generated.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnimSeed {
	pub delay: f64,
	pub duration: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Spin {
	#[default]
	Clockwise,
	CounterClockwise,
}

/// Cosmetic rotation of the node's image. Not part of the physics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotation {
	pub initial_deg: f64,
	pub spin: Spin,
}

/// One circle of the field.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub position: Point,
	pub radius: f64,
	pub kind: NodeKind,
	/// Repelled from ordinary small nodes and pulled under the anchor.
	pub special: bool,
	pub payload: Option<Payload>,
	pub image: Option<String>,
	pub anim: AnimSeed,
	pub rotation: Rotation,
}

impl Node {
	pub fn is_ordinary_small(&self) -> bool {
		self.kind == NodeKind::Small && !self.special
	}

	/// Route this node leads to, when it is a wipe target.
	pub fn route(&self) -> Option<&str> {
		match &self.payload {
			Some(Payload::Route { href, .. }) => Some(href),
			_ => None,
		}
	}
}

/// Description of one node before it has a position.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSpec {
	pub kind: NodeKind,
	pub special: bool,
	pub payload: Option<Payload>,
	pub image: Option<String>,
}

/// The fixed set of nodes a layout is generated from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClusterSpec {
	pub nodes: Vec<NodeSpec>,
}

impl ClusterSpec {
	/// Five nav circles, up to eight work thumbnails and the external links.
	pub fn for_site(thumbnails: &[WorkThumbnail]) -> Self {
		let large = NAV_ENTRIES.iter().map(|e| NodeSpec {
			kind: NodeKind::Large,
			special: false,
			payload: Some(Payload::Route {
				href: e.href.to_string(),
				color: e.color.to_string(),
			}),
			image: Some(e.image.to_string()),
		});
		let small = thumbnails.iter().take(MAX_THUMBNAILS).map(|t| NodeSpec {
			kind: NodeKind::Small,
			special: false,
			payload: Some(Payload::Thumbnail {
				slug: t.slug.clone(),
			}),
			image: Some(t.thumbnail.clone()),
		});
		let special = EXTERNAL_LINKS.iter().map(|l| NodeSpec {
			kind: NodeKind::Small,
			special: true,
			payload: Some(Payload::External {
				url: l.url.to_string(),
			}),
			image: Some(l.image.to_string()),
		});
		Self {
			nodes: large.chain(small).chain(special).collect(),
		}
	}

	/// Anonymous cluster with the given class counts.
	pub fn with_counts(large: usize, small: usize, special: usize) -> Self {
		let spec = |kind, special| NodeSpec {
			kind,
			special,
			payload: None,
			image: None,
		};
		let nodes = std::iter::repeat_n(spec(NodeKind::Large, false), large)
			.chain(std::iter::repeat_n(spec(NodeKind::Small, false), small))
			.chain(std::iter::repeat_n(spec(NodeKind::Small, true), special))
			.collect();
		Self { nodes }
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}
