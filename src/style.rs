use crate::{
	casing::{camelize, capitalize, hyphenate},
	host::HostNode,
	value::{StyleEntry, Value},
};
use hashbrown::HashMap;
use std::borrow::Cow;
use tracing::{error, instrument, level_filters::STATIC_MAX_LEVEL, trace, warn, Level};

const IMPORTANT: &str = "!important";

/// Memoizes which (possibly vendor-prefixed) style accessor a raw property name resolves to.
///
/// Never invalidated: the set of supported properties doesn't change while a host is running.
#[derive(Debug, Clone)]
pub struct PrefixCache {
	resolved: HashMap<String, String>,
	vendor_prefixes: Vec<Cow<'static, str>>,
}
impl PrefixCache {
	#[must_use]
	pub fn new(vendor_prefixes: Vec<Cow<'static, str>>) -> Self {
		Self {
			resolved: HashMap::new(),
			vendor_prefixes,
		}
	}

	/// Returns the accessor name to use for `raw_name` on `node`'s style surface.
	///
	/// Unresolvable names are returned as-is and not cached.
	pub fn resolve<N: HostNode>(&mut self, node: &N, raw_name: &str) -> String {
		if let Some(cached) = self.resolved.get(raw_name) {
			return cached.clone();
		}

		let name = camelize(raw_name);
		// `filter` exists as a legacy alias with different semantics on some hosts, so its presence proves nothing.
		if name != "filter" && node.style_has(&name) {
			return self.remember(raw_name, name);
		}

		let capitalized = capitalize(&name);
		for prefix in &self.vendor_prefixes {
			let prefixed = format!("{}{}", prefix, capitalized);
			if node.style_has(&prefixed) {
				trace!(raw_name, %prefixed, "Resolved vendor-prefixed style property.");
				return self.remember(raw_name, prefixed);
			}
		}

		trace!(raw_name, "Style property not recognised. Using it unresolved.");
		raw_name.to_owned()
	}

	fn remember(&mut self, raw_name: &str, resolved: String) -> String {
		self.resolved.insert(raw_name.to_owned(), resolved.clone());
		resolved
	}

	/// The hyphenated property name for the priority-aware setter, e.g. `WebkitTransform` → `-webkit-transform`.
	fn css_name(&self, resolved: &str) -> String {
		let hyphenated = hyphenate(resolved);
		let vendor_prefixed = self.vendor_prefixes.iter().any(|prefix| {
			resolved
				.strip_prefix(prefix.as_ref())
				.and_then(|rest| rest.chars().next())
				.map_or(false, |c| c.is_ascii_uppercase())
		});
		if vendor_prefixed {
			format!("-{}", hyphenated)
		} else {
			hyphenated
		}
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.resolved.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.resolved.is_empty()
	}
}

/// Strips a trailing `!important` (ignoring case and surrounding whitespace).
fn strip_important(value: &str) -> Option<&str> {
	let trimmed = value.trim_end();
	let split = trimmed.len().checked_sub(IMPORTANT.len())?;
	trimmed
		.get(split..)
		.filter(|marker| marker.eq_ignore_ascii_case(IMPORTANT))
		.map(|_| trimmed[..split].trim_end())
}

/// Reconciles `node`'s inline style from `prev` to `next`.
///
/// `visibility_controlled` marks that a visibility toggle owns `display`,
/// which then survives replacement of the whole style text.
#[instrument(skip(node, prev, next, prefix_cache))]
pub fn patch_style<N: HostNode>(node: &N, prev: &Value<N::Event>, next: &Value<N::Event>, prefix_cache: &mut PrefixCache, visibility_controlled: bool) {
	match next {
		Value::Null => remove_style(node),
		Value::Str(text) if text.is_empty() => remove_style(node),

		Value::Str(text) => {
			if prev.as_str() == Some(text.as_str()) {
				return trace!("Style text unchanged.");
			}

			let current_display = node.style_get("display");
			if let Err(error) = node.set_style_text(text) {
				error!("Failed to set style text: {}", error)
			}
			if visibility_controlled {
				trace!(display = %current_display, "Restoring visibility-controlled `display`.");
				if let Err(error) = node.style_set("display", &current_display) {
					error!("Failed to restore `display`: {}", error)
				}
			}
		}

		Value::Style(next) => {
			for (name, entry) in next.iter() {
				set_style(node, prefix_cache, name, entry);
			}

			if let Value::Style(prev) = prev {
				for (name, _) in prev.iter() {
					if next.get(name).map_or(true, StyleEntry::is_null) {
						trace!(name, "Clearing removed style property.");
						set_style_value(node, prefix_cache, name, "");
					}
				}
			}
		}

		unsupported => {
			if STATIC_MAX_LEVEL >= Level::WARN {
				warn!("Unsupported style value {:?}. Removing the inline style instead.", unsupported)
			}
			remove_style(node)
		}
	}
}

fn remove_style<N: HostNode>(node: &N) {
	if let Err(error) = node.remove_attribute("style") {
		error!("Failed to remove style attribute: {}", error)
	}
}

fn set_style<N: HostNode>(node: &N, prefix_cache: &mut PrefixCache, name: &str, entry: &StyleEntry) {
	match entry {
		StyleEntry::Null => set_style_value(node, prefix_cache, name, ""),
		StyleEntry::One(value) => set_style_value(node, prefix_cache, name, value),
		StyleEntry::Many(values) => {
			for value in values {
				set_style_value(node, prefix_cache, name, value)
			}
		}
	}
}

fn set_style_value<N: HostNode>(node: &N, prefix_cache: &mut PrefixCache, name: &str, value: &str) {
	let result = if name.starts_with("--") {
		node.style_set_property(name, value, None)
	} else {
		let resolved = prefix_cache.resolve(node, name);
		match strip_important(value) {
			Some(value) => node.style_set_property(&prefix_cache.css_name(&resolved), value, Some("important")),
			None => node.style_set(&resolved, value),
		}
	};

	if let Err(error) = result {
		error!("Failed to set style property {:?} to {:?}: {}", name, value, error)
	}
}
