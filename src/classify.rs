//! Decides which path a key takes.

use crate::{host::HostNode, value::Value};

/// The handler a key is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
	Class,
	Style,
	Event,
	/// Two-way binding listeners belong to the model directive, not to this crate.
	IgnoredModelListener,
	Property,
	Attribute,
}

/// Keys whose native properties are boolean while their attributes are enumerated,
/// so a string `"false"` would be coerced to `true`, and `form`, which is read-only as a property.
static ALWAYS_ATTRIBUTE: &[&str] = &["spellcheck", "draggable", "form"];

/// (key, tag name) pairs that must be set as attributes on that element type only.
static TAG_SPECIFIC_ATTRIBUTE: &[(&str, &str)] = &[("list", "INPUT"), ("type", "TEXTAREA")];

/// Content-replacement keys that still work as properties on namespaced elements.
static NAMESPACED_PROPERTIES: &[&str] = &["innerHTML"];

/// `onClick`, `onUpdate:value`, `on-click` - anything but `on` followed by a lower-case letter.
#[must_use]
pub fn is_event_binding_key(key: &str) -> bool {
	key.strip_prefix("on")
		.and_then(|rest| rest.chars().next())
		.map_or(false, |c| !c.is_ascii_lowercase())
}

#[must_use]
pub fn is_model_listener(key: &str) -> bool {
	key.starts_with("onUpdate:")
}

/// `onclick` and friends, i.e. native inline event handler properties.
#[must_use]
pub fn is_native_event_key(key: &str) -> bool {
	key.strip_prefix("on")
		.and_then(|rest| rest.chars().next())
		.map_or(false, |c| c.is_ascii_lowercase())
}

/// Whether `key` is written through the property path rather than as an attribute.
///
/// Doesn't consider the special keys `class` and `style` or event bindings.
#[must_use]
pub fn should_use_property<N: HostNode>(node: &N, key: &str, value: &Value<N::Event>, is_namespaced: bool) -> bool {
	if is_namespaced {
		return NAMESPACED_PROPERTIES.contains(&key) || (node.has_property(key) && is_native_event_key(key) && value.is_callable());
	}

	if ALWAYS_ATTRIBUTE.contains(&key) {
		return false;
	}

	if let Some(&(_, tag)) = TAG_SPECIFIC_ATTRIBUTE.iter().find(|(k, _)| *k == key) {
		if node.tag_name() == tag {
			return false;
		}
	}

	// Inline string handlers are markup, not live bindings.
	if is_native_event_key(key) && value.as_str().is_some() {
		return false;
	}

	node.has_property(key)
}

/// Routes one key.
#[must_use]
pub fn classify<N: HostNode>(node: &N, key: &str, value: &Value<N::Event>, is_namespaced: bool) -> KeyKind {
	match key {
		"class" => KeyKind::Class,
		"style" => KeyKind::Style,
		key if is_event_binding_key(key) => {
			if is_model_listener(key) {
				KeyKind::IgnoredModelListener
			} else {
				KeyKind::Event
			}
		}
		key if should_use_property(node, key, value, is_namespaced) => KeyKind::Property,
		_ => KeyKind::Attribute,
	}
}
