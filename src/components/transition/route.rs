//! Router seam for the transition machine.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use log::debug;
use url::Url;

/// Base used to resolve relative destinations; only the path is kept.
const ROUTE_BASE: &str = "http://localhost/";

/// Routing the transition machine needs: request a navigation, and observe
/// which route is actually showing. Navigation may commit later than it was
/// requested.
pub trait Router {
	fn navigate(&mut self, path: &str);
	fn current_route(&self) -> String;
}

/// Path component of `href`, which is how routes are compared and keyed.
/// Strings that do not parse as a URL are used verbatim.
pub fn route_key(href: &str) -> String {
	let parsed = Url::parse(ROUTE_BASE).and_then(|base| base.join(href));
	match parsed {
		Ok(url) => url.path().to_string(),
		Err(e) => {
			debug!("circle-nav: using unparsable destination {href:?} verbatim ({e})");
			href.to_string()
		}
	}
}

/// [`Router`] over `leptos_router`'s navigate function and location.
pub struct LeptosRouter<N> {
	navigate: N,
	pathname: Memo<String>,
}

impl<N> LeptosRouter<N>
where
	N: Fn(&str, NavigateOptions),
{
	pub fn new(navigate: N, pathname: Memo<String>) -> Self {
		Self { navigate, pathname }
	}
}

impl<N> Router for LeptosRouter<N>
where
	N: Fn(&str, NavigateOptions),
{
	fn navigate(&mut self, path: &str) {
		(self.navigate)(path, NavigateOptions::default());
	}

	fn current_route(&self) -> String {
		self.pathname.get_untracked()
	}
}
