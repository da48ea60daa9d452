//! Section and detail pages. Their content enters with the `fadeIn` CSS
//! animation, which a back transition finishes early.

use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::hooks::{use_location, use_params_map};

use crate::components::transition::BackButton;
use crate::site;

/// A top-level section reached from one of the large circles.
#[component]
pub fn SectionPage(#[prop(into)] title: String) -> impl IntoView {
	let pathname = use_location().pathname;
	let background = move || site::background_for_path(&pathname.get()).unwrap_or("transparent");

	view! {
		<Title text=title.clone() />
		<BackButton />
		<section class="section-page fadeIn" data-background=background>
			<h1>{title}</h1>
		</section>
	}
}

/// A diary entry or a work, addressed by slug.
#[component]
pub fn WorkPage() -> impl IntoView {
	let params = use_params_map();
	let slug = move || params.read().get("slug").unwrap_or_default();

	view! {
		<Title text=slug />
		<BackButton />
		<article class="detail-page fadeIn">
			<h1>{slug}</h1>
		</article>
	}
}
