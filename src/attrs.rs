use crate::{host::HostNode, value::Value};
use tracing::{error, instrument};

pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// Boolean attributes without a same-named property, so they never take the property path.
static SPECIAL_BOOLEAN_ATTRIBUTES: &[&str] = &["itemscope", "allowfullscreen", "formnovalidate", "ismap", "nomodule", "novalidate", "readonly"];

#[must_use]
pub fn is_special_boolean_attribute(key: &str) -> bool {
	SPECIAL_BOOLEAN_ATTRIBUTES.contains(&key)
}

/// Writes `key` through the attribute path.
#[instrument(skip(node, value))]
pub fn patch_attr<N: HostNode>(node: &N, key: &str, value: &Value<N::Event>, is_namespaced: bool) {
	let result = match key.strip_prefix("xlink:") {
		Some(local_name) if is_namespaced => match value {
			Value::Null => node.remove_attribute_ns(XLINK_NAMESPACE, local_name),
			value => node.set_attribute_ns(XLINK_NAMESPACE, key, &value.to_js_string()),
		},
		_ => {
			let is_boolean = is_special_boolean_attribute(key);
			if value.is_null() || (is_boolean && *value == Value::Bool(false)) {
				node.remove_attribute(key)
			} else if is_boolean {
				node.set_attribute(key, "")
			} else {
				node.set_attribute(key, &value.to_js_string())
			}
		}
	};

	if let Err(error) = result {
		error!("Failed to patch attribute {:?}: {}", key, error)
	}
}
