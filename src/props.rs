use crate::{
	host::{HostNode, PropertyType},
	patch::PatchExtra,
	value::Value,
};
use tracing::{error, instrument, level_filters::STATIC_MAX_LEVEL, trace, warn, Level};

/// Keys that replace the node's entire content.
static CONTENT_KEYS: &[&str] = &["innerHTML", "textContent"];

/// Writes `key` through the property path, coercing `value` to what the property's current native type expects.
///
/// `shadow_value` receives the raw declared `value` for the `value` key, since the live property stringifies it.
#[instrument(skip(node, value, extra, shadow_value))]
pub fn patch_property<N: HostNode>(node: &N, key: &str, value: &Value<N::Event>, extra: &PatchExtra<'_>, shadow_value: &mut Option<Value<N::Event>>) {
	if CONTENT_KEYS.contains(&key) {
		if !extra.prev_children.is_empty() {
			match extra.unmount_children {
				Some(unmount_children) => {
					trace!(count = extra.prev_children.len(), "Unmounting children before content replacement.");
					unmount_children(extra.prev_children, extra.owner, extra.suspense)
				}
				None => warn!("{} previously mounted children can't be unmounted before replacing {:?}: No unmount callback given.", extra.prev_children.len(), key),
			}
		}
		let content = match value {
			Value::Null => Value::Str(String::new()),
			value => value.clone(),
		};
		return assign(node, key, &content);
	}

	if key == "value" && node.tag_name() != "PROGRESS" {
		*shadow_value = Some(value.clone());
		let stringified = value.to_js_string();
		if node.property_as_string("value").as_deref() == Some(stringified.as_str()) {
			return trace!("Live value unchanged.");
		}
		return assign(node, key, &Value::Str(stringified));
	}

	let is_empty_string = value.as_str().map_or(false, str::is_empty);
	if value.is_null() || is_empty_string {
		match node.property_type(key) {
			// e.g. `<select multiple>` is declared as `{ multiple: "" }`.
			PropertyType::Boolean if is_empty_string => return assign(node, key, &Value::Bool(true)),
			PropertyType::String if value.is_null() => {
				assign(node, key, &Value::Str(String::new()));
				return remove_attribute(node, key);
			}
			PropertyType::Number => {
				assign(node, key, &Value::Number(0.0));
				return remove_attribute(node, key);
			}
			_ => (),
		}
	}

	assign(node, key, value)
}

/// Some properties validate their values and throw. Whatever the failed assignment left behind stays.
fn assign<N: HostNode>(node: &N, key: &str, value: &Value<N::Event>) {
	if let Err(error) = node.set_property(key, value) {
		if STATIC_MAX_LEVEL >= Level::WARN {
			let tag = node.tag_name().to_ascii_lowercase();
			if cfg!(feature = "dangerous-logging") {
				warn!("Failed setting prop {:?} on <{}>: value {:?} is invalid. ({})", key, tag, value, error)
			} else {
				warn!("Failed setting prop {:?} on <{}>: value is invalid. ({})", key, tag, error)
			}
		}
	}
}

fn remove_attribute<N: HostNode>(node: &N, key: &str) {
	if let Err(error) = node.remove_attribute(key) {
		error!("Failed to remove attribute {:?}: {}", key, error)
	}
}
