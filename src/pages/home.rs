use leptos::prelude::*;
use leptos_meta::Title;

/// Home page. The circle field mounted by the app is the whole page, so
/// this only names it.
#[component]
pub fn Home() -> impl IntoView {
	view! { <Title text="Home" /> }
}
