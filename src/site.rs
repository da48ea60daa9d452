//! Static navigation table: which nav image leads where, and in what color.

use log::{info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

pub const YELLOW_BACKGROUND: &str = "var(--yellow-background)";
pub const PURPLE_BACKGROUND: &str = "var(--purple-background)";

/// A large navigation circle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavEntry {
	pub image: &'static str,
	pub href: &'static str,
	pub color: &'static str,
}

/// A special circle that leaves the site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExternalLink {
	pub image: &'static str,
	pub url: &'static str,
}

pub const NAV_ENTRIES: [NavEntry; 5] = [
	NavEntry {
		image: "/nav/nav_about.svg",
		href: "/about",
		color: YELLOW_BACKGROUND,
	},
	NavEntry {
		image: "/nav/nav_what_im_thinking.svg",
		href: "/diary",
		color: PURPLE_BACKGROUND,
	},
	NavEntry {
		image: "/nav/nav_media_archive.svg",
		href: "/media-archive",
		color: YELLOW_BACKGROUND,
	},
	NavEntry {
		image: "/nav/nav_request_a_job.svg",
		href: "/request-a-job",
		color: PURPLE_BACKGROUND,
	},
	NavEntry {
		image: "/nav/nav_works.svg",
		href: "/works",
		color: YELLOW_BACKGROUND,
	},
];

pub const EXTERNAL_LINKS: [ExternalLink; 2] = [
	ExternalLink {
		image: "/nav/nav_x.svg",
		url: "https://x.com/mrhkokr",
	},
	ExternalLink {
		image: "/nav/nav_instagram.svg",
		url: "https://www.instagram.com/murahikaokaru/",
	},
];

/// Thumbnails beyond this count are not given a circle.
pub const MAX_THUMBNAILS: usize = 8;

/// A work entry supplied by the CMS, shown as a small circle.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct WorkThumbnail {
	pub slug: String,
	pub thumbnail: String,
}

pub fn nav_entry_for_route(route: &str) -> Option<&'static NavEntry> {
	NAV_ENTRIES.iter().find(|e| e.href == route)
}

/// Background fill for routes that have one even without an active nav circle.
pub fn background_for_path(path: &str) -> Option<&'static str> {
	if path.starts_with("/works/") {
		return Some(YELLOW_BACKGROUND);
	}
	if path == "/diary" || path.starts_with("/diary/") {
		return Some(PURPLE_BACKGROUND);
	}
	nav_entry_for_route(path).map(|e| e.color)
}

/// `/works/<slug>` and `/diary/<slug>` pages hide the whole circle field.
pub fn is_detail_page(path: &str) -> bool {
	let nested = |section: &str| {
		path.strip_prefix(section)
			.and_then(|rest| rest.strip_prefix('/'))
			.is_some_and(|slug| !slug.is_empty())
	};
	nested("/works") || nested("/diary")
}

/// The route one level above `path`.
pub fn parent_route(path: &str) -> String {
	let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
	if segments.len() <= 1 {
		"/".to_string()
	} else {
		format!("/{}", segments[..segments.len() - 1].join("/"))
	}
}

pub fn work_href(slug: &str) -> String {
	format!("/works/{slug}")
}

/// Parse the thumbnail data island. Malformed input yields no thumbnails.
pub fn parse_work_thumbnails(json: &str) -> Vec<WorkThumbnail> {
	match serde_json::from_str::<Vec<WorkThumbnail>>(json) {
		Ok(thumbs) => thumbs,
		Err(e) => {
			warn!("circle-nav: failed to parse work thumbnails: {}", e);
			Vec::new()
		}
	}
}

/// Load thumbnails from a script element with id="work-thumbnails".
/// Expected format: JSON array of `{ "slug": ..., "thumbnail": ... }`.
pub fn load_work_thumbnails() -> Vec<WorkThumbnail> {
	let Some(json) = script_text("work-thumbnails") else {
		return Vec::new();
	};
	let thumbs = parse_work_thumbnails(&json);
	info!("circle-nav: loaded {} work thumbnails", thumbs.len());
	thumbs
}

fn script_text(id: &str) -> Option<String> {
	let document = web_sys::window()?.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parent_route_drops_last_segment() {
		assert_eq!(parent_route("/about"), "/");
		assert_eq!(parent_route("/works/some-slug"), "/works");
		assert_eq!(parent_route("/"), "/");
		assert_eq!(parent_route("/a/b/c/"), "/a/b");
	}

	#[test]
	fn detail_pages() {
		assert!(is_detail_page("/works/covid"));
		assert!(is_detail_page("/diary/2024-01-01"));
		assert!(!is_detail_page("/works"));
		assert!(!is_detail_page("/works/"));
		assert!(!is_detail_page("/workshop/x"));
		assert!(!is_detail_page("/about"));
	}

	#[test]
	fn backgrounds_follow_section() {
		assert_eq!(background_for_path("/works/x"), Some(YELLOW_BACKGROUND));
		assert_eq!(background_for_path("/diary/x"), Some(PURPLE_BACKGROUND));
		assert_eq!(background_for_path("/request-a-job"), Some(PURPLE_BACKGROUND));
		assert_eq!(background_for_path("/"), None);
		assert_eq!(background_for_path("/nowhere"), None);
	}

	#[test]
	fn thumbnails_parse_or_fall_back_to_empty() {
		let thumbs = parse_work_thumbnails(r#"[{"slug":"a","thumbnail":"/a.png"}]"#);
		assert_eq!(
			thumbs,
			vec![WorkThumbnail {
				slug: "a".into(),
				thumbnail: "/a.png".into()
			}]
		);
		assert!(parse_work_thumbnails("{not json").is_empty());
	}
}
