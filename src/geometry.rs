//! Screen-space primitives shared by the circle layout and the transition overlay.

/// A point in CSS pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		(self.x - other.x).hypot(self.y - other.y)
	}
}

/// Size of the browser window at the time a layout or animation was computed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Both dimensions are finite and strictly positive.
	pub fn is_usable(&self) -> bool {
		self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
	}

	pub fn center(&self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}

	/// Length of the window diagonal; a circle of this radius covers the
	/// screen from any anchor point inside it.
	pub fn diagonal(&self) -> f64 {
		self.width.hypot(self.height)
	}

	pub fn aspect_ratio(&self) -> f64 {
		self.width / self.height
	}
}

/// Visible region of a full-screen layer, rendered as CSS `clip-path`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Clip {
	/// Whole layer visible.
	None,
	Circle { center: Point, radius: f64 },
	Ellipse { center: Point, rx: f64, ry: f64 },
}

impl Clip {
	pub fn to_css(&self) -> String {
		match self {
			Clip::None => "none".to_string(),
			Clip::Circle { center, radius } => {
				format!("circle({}px at {}px {}px)", radius.max(0.0), center.x, center.y)
			}
			Clip::Ellipse { center, rx, ry } => format!(
				"ellipse({}px {}px at {}px {}px)",
				rx.max(0.0),
				ry.max(0.0),
				center.x,
				center.y
			),
		}
	}
}

/// Read the current window size. `None` outside a browser or before layout.
pub fn window_viewport() -> Option<Viewport> {
	let window = web_sys::window()?;
	let width = window.inner_width().ok()?.as_f64()?;
	let height = window.inner_height().ok()?.as_f64()?;
	Some(Viewport::new(width, height))
}

/// High resolution timestamp in milliseconds, on the same clock as
/// `requestAnimationFrame` callbacks.
pub fn now_ms() -> f64 {
	web_sys::window()
		.and_then(|w| w.performance())
		.map(|p| p.now())
		.unwrap_or_else(js_sys::Date::now)
}
