use crate::host::HostNode;
use tracing::{error, instrument, trace};

/// Writes the class list of `node`.
///
/// `transition_classes` are appended even if `value` is empty,
/// so that classes added by running transitions survive declarative updates.
#[instrument(skip(node))]
pub fn patch_class<N: HostNode>(node: &N, value: Option<&str>, is_namespaced: bool, transition_classes: Option<&[String]>) {
	let value = value.unwrap_or("");
	let result = if is_namespaced {
		// Namespaced elements don't reliably support the `className` fast path.
		node.set_attribute("class", value)
	} else {
		match transition_classes {
			Some(transition_classes) => {
				trace!(?transition_classes, "Merging transition classes.");
				let merged = (!value.is_empty())
					.then(|| value)
					.into_iter()
					.chain(transition_classes.iter().map(String::as_str))
					.collect::<Vec<_>>()
					.join(" ");
				node.set_class_name(&merged)
			}
			None => node.set_class_name(value),
		}
	};

	if let Err(error) = result {
		error!("Failed to set class {:?}: {}", value, error)
	}
}
