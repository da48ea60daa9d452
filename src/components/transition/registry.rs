//! Where each route was entered from, so a back wipe can shrink toward it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::geometry::Point;

/// Session-wide record of where each route was last entered from, so the
/// wipe back out of a route can shrink toward the same point.
///
/// Constructed once in `App` and shared through context; clones share storage.
/// Last write wins per route key.
#[derive(Clone, Debug, Default)]
pub struct TransitionCenters {
	centers: Rc<RefCell<HashMap<String, Point>>>,
}

impl TransitionCenters {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn record(&self, route: impl Into<String>, point: Point) {
		self.centers.borrow_mut().insert(route.into(), point);
	}

	pub fn lookup(&self, route: &str) -> Option<Point> {
		self.centers.borrow().get(route).copied()
	}

	pub fn len(&self) -> usize {
		self.centers.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.centers.borrow().is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn last_write_wins_and_clones_share() {
		let centers = TransitionCenters::new();
		let other = centers.clone();
		centers.record("/about", Point::new(1.0, 1.0));
		other.record("/about", Point::new(5.0, 6.0));
		assert_eq!(centers.lookup("/about"), Some(Point::new(5.0, 6.0)));
		assert_eq!(centers.lookup("/works"), None);
		assert_eq!(centers.len(), 1);
	}
}
