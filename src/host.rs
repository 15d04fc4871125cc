//! The imperative side of a patch: what this crate needs from the platform that owns the nodes.
//!
//! [`web`](`crate::web`) implements these for [`web_sys`].
//! Other hosts (or in-memory test doubles) can implement them too.

use crate::{error::HostError, value::Value};
use core::{fmt::Debug, hash::Hash};
use std::rc::Rc;

/// The function actually registered with the host for one invoker.
pub type Dispatch<E> = Rc<dyn Fn(&E)>;

/// A native event as delivered to a registered listener.
pub trait HostEvent {
	/// The event's own timestamp, or `0.0` if the host didn't provide one.
	fn time_stamp(&self) -> f64;

	fn stop_immediate_propagation(&self);
}

/// Native listener registration options, parsed from event-binding key suffixes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ListenerOptions {
	pub once: bool,
	pub passive: bool,
	pub capture: bool,
}
impl ListenerOptions {
	/// A dense index in `0..8`, for caching host-side option objects.
	#[must_use]
	pub fn cache_index(self) -> usize {
		usize::from(self.capture) + usize::from(self.once) * 2 + usize::from(self.passive) * 4
	}
}

/// The current native type of a node property, as far as the host can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
	Undefined,
	Boolean,
	Number,
	String,
	Object,
	Function,
}

/// A live, externally owned UI node.
///
/// Handles are cheap to clone and compare by node identity through [`HostNode::key`].
pub trait HostNode {
	type Event: HostEvent + 'static;
	/// Stable for the node's lifetime and unique among live nodes.
	type Key: Copy + Eq + Hash + Debug;
	/// Keeps a native listener registration's callback alive.
	type Listener;

	fn key(&self) -> Self::Key;

	/// Upper-case for HTML elements, as the host reports it.
	fn tag_name(&self) -> String;

	fn set_attribute(&self, name: &str, value: &str) -> Result<(), HostError>;
	fn set_attribute_ns(&self, namespace: &str, qualified_name: &str, value: &str) -> Result<(), HostError>;
	fn remove_attribute(&self, name: &str) -> Result<(), HostError>;
	fn remove_attribute_ns(&self, namespace: &str, local_name: &str) -> Result<(), HostError>;

	/// The fast path for the class list.
	fn set_class_name(&self, class_name: &str) -> Result<(), HostError>;

	/// Whether `key` names a property on the node (including inherited ones).
	fn has_property(&self, key: &str) -> bool;
	fn property_type(&self, key: &str) -> PropertyType;
	fn property_as_string(&self, key: &str) -> Option<String>;
	/// # Errors
	///
	/// Iff the host rejects the value, e.g. during enumerated property validation.
	/// The property may have been changed anyway.
	fn set_property(&self, key: &str, value: &Value<Self::Event>) -> Result<(), HostError>;

	/// Whether the inline style surface has an accessor named `name` (camel-case).
	fn style_has(&self, name: &str) -> bool;
	fn style_get(&self, name: &str) -> String;
	/// Assigns through the accessor named `name` (camel-case).
	fn style_set(&self, name: &str, value: &str) -> Result<(), HostError>;
	/// Assigns through the priority-aware setter. `name` is hyphenated or a custom property.
	fn style_set_property(&self, name: &str, value: &str, priority: Option<&str>) -> Result<(), HostError>;
	fn set_style_text(&self, text: &str) -> Result<(), HostError>;

	fn add_event_listener(&self, name: &str, dispatch: Dispatch<Self::Event>, options: ListenerOptions) -> Result<Self::Listener, HostError>;
	fn remove_event_listener(&self, name: &str, listener: &Self::Listener, options: ListenerOptions) -> Result<(), HostError>;
}

/// Process- or page-level host facilities, consulted by the coalesced clock and the capability probe.
pub trait Platform {
	/// Milliseconds since the UNIX epoch.
	fn epoch_now(&self) -> f64;
	/// High-resolution milliseconds relative to page load.
	fn high_res_now(&self) -> f64;
	/// The timestamp of a freshly created event, sampled *after* [`Platform::epoch_now`] during probing.
	fn fresh_event_time_stamp(&self) -> f64;
	fn user_agent(&self) -> Option<String>;
	/// Runs `task` after the current tick, before any further host events.
	fn queue_microtask(&self, task: Box<dyn FnOnce()>);
}
