//! Leptos client-side app: packed-circle navigation with circular wipes
//! between pages.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod components;
mod geometry;
mod pages;
mod site;

use crate::components::circle_field::CircleField;
use crate::components::transition::{TransitionContext, TransitionOverlay};

// Top-Level pages
use crate::pages::content::{SectionPage, WorkPage};
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// The site shell: the circle field and the transition overlay stay mounted
/// across every route, pages render above them.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();
	TransitionContext::provide();
	let thumbnails = site::load_work_thumbnails();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Home" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<CircleField thumbnails=thumbnails />
			<main class="page">
				<Routes fallback=|| view! { <NotFound /> }>
					<Route path=path!("/") view=Home />
					<Route path=path!("/about") view=|| view! { <SectionPage title="About" /> } />
					<Route path=path!("/diary") view=|| view! { <SectionPage title="Diary" /> } />
					<Route path=path!("/diary/:slug") view=WorkPage />
					<Route path=path!("/works") view=|| view! { <SectionPage title="Works" /> } />
					<Route path=path!("/works/:slug") view=WorkPage />
					<Route
						path=path!("/media-archive")
						view=|| view! { <SectionPage title="Media Archive" /> }
					/>
					<Route
						path=path!("/request-a-job")
						view=|| view! { <SectionPage title="Request a Job" /> }
					/>
				</Routes>
			</main>
			<TransitionOverlay />
		</Router>
	}
}
