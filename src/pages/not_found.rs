use leptos::prelude::*;
use leptos_meta::Title;

use crate::components::transition::TransitionLink;
use crate::site::YELLOW_BACKGROUND;

/// 404 page with a wipe back home.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<Title text="Not Found" />
		<section class="not-found fadeIn">
			<h1>"Page not found"</h1>
			<TransitionLink href="/" color=YELLOW_BACKGROUND>
				"Back home"
			</TransitionLink>
		</section>
	}
}
