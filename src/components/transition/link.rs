use leptos::prelude::*;
use leptos_router::hooks::use_location;
use web_sys::MouseEvent;

use super::TransitionContext;
use super::bus::{TransitionBack, TransitionSignal, TransitionStart};
use crate::site;

/// Anchor that navigates through a forward wipe growing from the click
/// point. Without a [`TransitionContext`] it behaves as a plain link.
#[component]
pub fn TransitionLink(
	#[prop(into)] href: String,
	#[prop(into)] color: String,
	#[prop(optional, into)] class: String,
	children: Children,
) -> impl IntoView {
	let ctx = TransitionContext::from_context();
	let target = href.clone();
	let on_click = move |ev: MouseEvent| {
		let Some(ctx) = ctx else {
			return;
		};
		ev.prevent_default();
		ctx.emit(TransitionSignal::Start(TransitionStart {
			x: f64::from(ev.client_x()),
			y: f64::from(ev.client_y()),
			href: target.clone(),
			color: color.clone(),
		}));
	};

	view! {
		<a href=href class=class on:click=on_click>
			{children()}
		</a>
	}
}

/// Return control shown on every page but home. Goes to the parent route
/// through a back wipe in the current page's color.
#[component]
pub fn BackButton() -> impl IntoView {
	let pathname = use_location().pathname;
	let ctx = TransitionContext::from_context();
	let on_click = move |ev: MouseEvent| {
		let Some(ctx) = ctx else {
			return;
		};
		ev.prevent_default();
		let route = pathname.get_untracked();
		let color = site::background_for_path(&route).unwrap_or(site::YELLOW_BACKGROUND);
		ctx.emit(TransitionSignal::Back(TransitionBack {
			href: site::parent_route(&route),
			color: color.to_string(),
		}));
	};

	view! {
		<Show when=move || pathname.get() != "/">
			<a
				class="back-button"
				href=move || site::parent_route(&pathname.get())
				on:click=on_click
			>
				<img src="/pinchout_icon.svg" alt="Back" width="48" height="48" />
			</a>
		</Show>
	}
}
