//! Auxiliary per-node state, kept out of band instead of on the host's nodes.

use crate::{events::InvokerRecord, host::HostNode, value::Value};
use hashbrown::{hash_map::Entry, HashMap};

/// Everything this crate (and its direct collaborators) remember about one node between patch calls.
pub(crate) struct NodeState<N: HostNode> {
	/// Keyed by raw event-binding key, e.g. `onClickOnce`.
	pub invokers: HashMap<String, InvokerRecord<N>>,
	/// The last declared `value`, before stringification.
	pub shadow_value: Option<Value<N::Event>>,
	pub true_value: Option<Value<N::Event>>,
	pub false_value: Option<Value<N::Event>>,
	/// Set by transition orchestration. Only read here.
	pub transition_classes: Option<Vec<String>>,
	/// `Some` while a visibility toggle controls `display`. Holds the original `display` value.
	pub visibility_original_display: Option<String>,
}
impl<N: HostNode> Default for NodeState<N> {
	fn default() -> Self {
		Self {
			invokers: HashMap::new(),
			shadow_value: None,
			true_value: None,
			false_value: None,
			transition_classes: None,
			visibility_original_display: None,
		}
	}
}
impl<N: HostNode> NodeState<N> {
	fn is_empty(&self) -> bool {
		self.invokers.is_empty()
			&& self.shadow_value.is_none()
			&& self.true_value.is_none()
			&& self.false_value.is_none()
			&& self.transition_classes.is_none()
			&& self.visibility_original_display.is_none()
	}
}

pub(crate) struct SideTable<N: HostNode>(HashMap<N::Key, NodeState<N>>);
impl<N: HostNode> Default for SideTable<N> {
	fn default() -> Self {
		Self::new()
	}
}
impl<N: HostNode> SideTable<N> {
	#[must_use]
	pub fn new() -> Self {
		Self(HashMap::new())
	}

	pub fn get(&self, key: &N::Key) -> Option<&NodeState<N>> {
		self.0.get(key)
	}

	pub fn get_or_insert_default(&mut self, key: N::Key) -> &mut NodeState<N> {
		match self.0.entry(key) {
			Entry::Occupied(occupied) => occupied.into_mut(),
			Entry::Vacant(vacant) => vacant.insert(NodeState::default()),
		}
	}

	pub fn remove(&mut self, key: &N::Key) -> Option<NodeState<N>> {
		self.0.remove(key)
	}

	/// Drops the entry for `key` if nothing is remembered for it anymore.
	pub fn prune(&mut self, key: &N::Key) {
		if self.0.get(key).map_or(false, NodeState::is_empty) {
			self.0.remove(key);
		}
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn capacity(&self) -> usize {
		self.0.capacity()
	}
}
