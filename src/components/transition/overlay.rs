use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};
use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{CssAnimation, HtmlElement};

use super::TransitionContext;
use super::bus::TransitionSignal;
use super::driver::TransitionDriver;
use super::machine::{Overlay, Phase, TransitionMachine, TransitionTimings};
use super::route::LeptosRouter;
use crate::components::frame::FrameLoop;
use crate::geometry::{now_ms, window_viewport};

/// Name fragment of the CSS keyframes page content enters with.
const ENTRANCE_ANIMATION: &str = "fadeIn";

/// Full-screen wipe layer. Mount once, inside the router and below
/// [`TransitionContext::provide`].
#[component]
pub fn TransitionOverlay(#[prop(optional)] timings: Option<TransitionTimings>) -> impl IntoView {
	let overlay_ref = NodeRef::<leptos::html::Div>::new();
	let ctx = expect_context::<TransitionContext>();
	let router = LeptosRouter::new(use_navigate(), use_location().pathname);
	let machine = TransitionMachine::new(timings.unwrap_or_default());
	let driver = Rc::new(RefCell::new(TransitionDriver::new(
		machine,
		router,
		ctx.bus(),
		ctx.centers(),
	)));
	let painter = Rc::new(RefCell::new(Painter::default()));
	let frames = FrameLoop::new();

	let (driver_frame, painter_frame) = (driver.clone(), painter.clone());
	let run = move || {
		let (driver, painter) = (driver_frame.clone(), painter_frame.clone());
		frames.start(move |now| {
			let viewport = window_viewport().unwrap_or_default();
			// a bus dispatch holding the driver; try again next frame
			let Ok((frame, phase)) = driver.try_borrow_mut().map(|mut d| {
				let frame = d.frame(now, viewport);
				(frame, d.phase())
			}) else {
				return true;
			};
			ctx.set_phase(phase);
			if frame.settle {
				settle_entrances(ctx);
			}
			if let Some(el) = overlay_ref.get_untracked() {
				painter.borrow_mut().paint(&el, frame.overlay.as_ref());
			}
			frame.is_active()
		});
	};

	let driver_bus = driver.clone();
	let subscription = ctx.bus().subscribe(move |signal| {
		if matches!(signal, TransitionSignal::Navigated) {
			return;
		}
		let viewport = window_viewport().unwrap_or_default();
		let started = match driver_bus.try_borrow_mut() {
			Ok(mut d) => {
				let started = d.handle_signal(signal, now_ms(), viewport);
				ctx.set_phase(d.phase());
				started
			}
			Err(_) => {
				warn!("transition: dropped {signal:?} raised while the overlay was busy");
				false
			}
		};
		if started {
			run();
		}
	});
	on_cleanup(move || ctx.unsubscribe(subscription));

	let on_transition_end = move |_| {
		let settle = driver
			.try_borrow_mut()
			.map(|mut d| {
				let settle = d.transition_end(now_ms());
				ctx.set_phase(d.phase());
				settle
			})
			.unwrap_or(false);
		if settle {
			settle_entrances(ctx);
		}
	};

	view! {
		<div
			node_ref=overlay_ref
			class="transition-overlay"
			style="position: fixed; inset: 0; z-index: 1000; pointer-events: none; display: none;"
			on:transitionend=on_transition_end
		/>
	}
}

/// Jump CSS and scheduled entrance animations to their end state.
fn settle_entrances(ctx: TransitionContext) {
	ctx.request_settle();
	let Some(document) = web_sys::window().and_then(|w| w.document()) else {
		return;
	};
	let mut finished = 0;
	for animation in document.get_animations().iter() {
		let Ok(animation) = animation.dyn_into::<CssAnimation>() else {
			continue;
		};
		if animation.animation_name().contains(ENTRANCE_ANIMATION) && animation.finish().is_ok() {
			finished += 1;
		}
	}
	debug!("transition: settled entrances, finished {finished} css animations");
}

/// Writes overlay frames to the element's inline style. Fades are handed to
/// a CSS transition once, when their phase is entered.
#[derive(Default)]
struct Painter {
	phase: Option<Phase>,
}

impl Painter {
	fn paint(&mut self, el: &HtmlElement, overlay: Option<&Overlay>) {
		let style = el.style();
		let Some(overlay) = overlay else {
			if self.phase.take().is_some() {
				let _ = style.set_property("transition", "none");
				let _ = style.set_property("display", "none");
			}
			return;
		};
		let _ = style.set_property("display", "block");
		let _ = style.set_property("background-color", &overlay.color);
		let _ = style.set_property("clip-path", &overlay.clip.to_css());

		if self.phase == Some(overlay.phase) {
			return;
		}
		self.phase = Some(overlay.phase);
		match &overlay.fade {
			Some(fade) => {
				let _ = style.set_property("transition", "none");
				let _ = style.set_property("opacity", &fade.from.to_string());
				// flush the start value so the transition has something to run from
				let _ = el.offset_width();
				let _ = style.set_property("transition", &fade.css());
				let _ = style.set_property("opacity", &fade.to.to_string());
			}
			None => {
				let _ = style.set_property("transition", "none");
				let _ = style.set_property("opacity", &overlay.opacity.to_string());
			}
		}
	}
}
