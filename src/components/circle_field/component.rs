use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::MouseEvent;

use super::render;
use super::state::{CircleFieldState, LayoutConfig};
use super::types::{ClusterSpec, Node, Payload};
use crate::components::frame::FrameLoop;
use crate::components::transition::{Phase, TransitionContext, TransitionSignal, TransitionStart};
use crate::geometry::window_viewport;
use crate::site::{self, WorkThumbnail};

/// Reactive handles onto one field. `Copy`, so view closures can hold it.
#[derive(Clone, Copy)]
struct Field {
	state: StoredValue<CircleFieldState, LocalStorage>,
	nodes: RwSignal<Vec<Node>>,
	scales: RwSignal<Vec<f64>>,
	clicked: RwSignal<Option<usize>>,
}

impl Field {
	fn new(state: CircleFieldState) -> Self {
		Self {
			state: StoredValue::new_local(state),
			nodes: RwSignal::new(Vec::new()),
			scales: RwSignal::new(Vec::new()),
			clicked: RwSignal::new(None),
		}
	}

	/// Pack a fresh layout for the current window and start its entrance.
	fn layout(self, frames: &FrameLoop, route: &str) {
		let Some(viewport) = window_viewport() else {
			return;
		};
		let Some(result) = self.state.try_update_value(|s| s.regenerate(viewport, route)) else {
			return;
		};
		match result {
			Ok(animate) => {
				let (nodes, scales) = self.state.with_value(|s| (s.nodes.clone(), s.scales.clone()));
				info!(
					"circle-nav: laid out {} nodes in {}x{}",
					nodes.len(),
					viewport.width,
					viewport.height
				);
				self.nodes.set(nodes);
				self.scales.set(scales);
				self.clicked.set(self.state.with_value(|s| s.clicked));
				if animate {
					frames.start(move |now| self.tick(now));
				} else {
					frames.cancel();
				}
			}
			Err(e) => debug!("circle-nav: layout deferred until resize: {e}"),
		}
	}

	fn tick(self, now: f64) -> bool {
		let Some((more, scales)) = self
			.state
			.try_update_value(|s| (s.tick(now), s.scales.clone()))
		else {
			return false;
		};
		self.scales.set(scales);
		more
	}

	fn settle(self) {
		if let Some(scales) = self.state.try_update_value(|s| {
			s.settle();
			s.scales.clone()
		}) {
			self.scales.set(scales);
		}
	}

	fn clear_click(self) {
		self.state.update_value(|s| s.clicked = None);
		self.clicked.set(None);
	}

	fn set_wipe_running(self, running: bool) {
		self.state.update_value(|s| s.set_wipe_running(running));
		self.clicked.set(self.state.with_value(|s| s.clicked));
	}

	/// Carry out whatever node `index` leads to.
	fn activate<N>(
		self,
		index: usize,
		ev: &MouseEvent,
		route: &str,
		transitions: Option<TransitionContext>,
		navigate: StoredValue<N, LocalStorage>,
	) where
		N: Fn(&str, NavigateOptions) + 'static,
	{
		let payload = self.state.with_value(|s| {
			if !s.accepts_clicks(route) {
				return None;
			}
			s.nodes.get(index).and_then(|n| n.payload.clone())
		});
		let Some(payload) = payload else {
			return;
		};
		if transitions.is_some_and(|ctx| ctx.phase_untracked() != Phase::Idle) {
			return;
		}
		ev.prevent_default();
		match payload {
			Payload::Route { href, color } => {
				let Some(ctx) = transitions else {
					navigate.with_value(|nav| nav(&href, NavigateOptions::default()));
					return;
				};
				self.state.update_value(|s| s.clicked = Some(index));
				self.clicked.set(Some(index));
				ctx.emit(TransitionSignal::Start(TransitionStart {
					x: f64::from(ev.client_x()),
					y: f64::from(ev.client_y()),
					href,
					color,
				}));
				// dispatch is synchronous; still idle means nobody took the wipe
				if ctx.phase_untracked() == Phase::Idle {
					debug!("circle-nav: wipe to node {index} was not started");
					self.clear_click();
				}
			}
			Payload::External { url } => {
				let Some(window) = web_sys::window() else {
					return;
				};
				if let Err(e) =
					window.open_with_url_and_target_and_features(&url, "_blank", "noopener,noreferrer")
				{
					warn!("circle-nav: could not open {url}: {e:?}");
				}
			}
			Payload::Thumbnail { slug } => {
				navigate.with_value(|nav| nav(&site::work_href(&slug), NavigateOptions::default()));
			}
		}
	}
}

/// Seed for layouts that only need to differ between visits.
fn clock_seed() -> u64 {
	let high = (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
	(high << 32) ^ js_sys::Date::now() as u64
}

/// Full-window field of packed circles. Stays mounted across routes: on
/// home it is the navigation, elsewhere it shows the node the current page
/// was entered through under a colored backdrop.
#[component]
pub fn CircleField(
	#[prop(optional)] thumbnails: Vec<WorkThumbnail>,
	#[prop(default = None)] seed: Option<u64>,
) -> impl IntoView {
	let pathname = use_location().pathname;
	let navigate = StoredValue::new_local(use_navigate());
	let transitions = TransitionContext::from_context();
	let spec = ClusterSpec::for_site(&thumbnails);
	let seed = seed.unwrap_or_else(clock_seed);
	let field = Field::new(CircleFieldState::new(spec, LayoutConfig::default(), seed));
	let frames = FrameLoop::new();
	let resize_cb = StoredValue::new_local(None::<Closure<dyn FnMut()>>);

	let frames_init = frames.clone();
	Effect::new(move |_| {
		let Some(window) = web_sys::window() else {
			return;
		};
		field.layout(&frames_init, &pathname.get_untracked());

		let frames_resize = frames_init.clone();
		let cb: Closure<dyn FnMut()> = Closure::new(move || {
			field.layout(&frames_resize, &pathname.get_untracked());
		});
		let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		resize_cb.set_value(Some(cb));
	});
	on_cleanup(move || {
		let Some(Some(cb)) = resize_cb.try_update_value(Option::take) else {
			return;
		};
		if let Some(window) = web_sys::window() {
			let _ =
				window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
	});

	Effect::new(move |prev: Option<String>| {
		let route = pathname.get();
		if prev.is_some_and(|p| p != route) {
			field.clear_click();
		}
		route
	});

	if let Some(ctx) = transitions {
		Effect::new(move |_| {
			if ctx.settle_requests() > 0 {
				frames.cancel();
				field.settle();
			}
		});
		Effect::new(move |_| field.set_wipe_running(ctx.phase() != Phase::Idle));
	}

	let backdrop = move || {
		let route = pathname.get();
		field.nodes.track();
		field
			.state
			.with_value(|s| s.backdrop(&route))
			.map(|b| view! { <div class="route-backdrop" style=render::backdrop_style(&b) /> })
	};
	let gradient = move || {
		let route = pathname.get();
		field.nodes.track();
		let backdrop = field.state.with_value(|s| s.backdrop(&route));
		render::gradient_style(backdrop.as_ref().map(|b| b.color.as_str()))
	};

	let node_views = move || {
		field
			.nodes
			.get()
			.into_iter()
			.enumerate()
			.map(move |(i, node)| {
				let mask_class = render::mask_class(node.rotation.spin);
				let mask_style = render::mask_style(&node);
				let image = node.image.clone();
				let style = move || {
					let route = pathname.get();
					field.clicked.track();
					let wipe_idle = transitions.is_none_or(|ctx| ctx.phase() == Phase::Idle);
					let scale = field.scales.with(|s| s.get(i).copied().unwrap_or(0.0));
					let (hidden, clickable) = field
						.state
						.with_value(|s| (s.is_hidden(i, &route), s.accepts_clicks(&route)));
					render::wrapper_style(&node, scale, hidden, clickable && wipe_idle && !hidden)
				};
				let on_click = move |ev: MouseEvent| {
					field.activate(i, &ev, &pathname.get_untracked(), transitions, navigate);
				};
				view! {
					<div class="circle-node" style=style on:click=on_click>
						<div class=mask_class style=mask_style>
							{image.map(|src| view! { <img src=src alt="" draggable="false" /> })}
						</div>
					</div>
				}
			})
			.collect_view()
	};

	view! {
		<div class="circle-field" style="position: fixed; inset: 0; overflow: hidden;">
			{backdrop}
			<div class="route-gradient" style=gradient />
			{node_views}
		</div>
	}
}
