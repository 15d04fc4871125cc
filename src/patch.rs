use crate::{
	attrs::patch_attr,
	class::patch_class,
	classify::{classify, KeyKind},
	clock::{CoalescedClock, TimestampCapabilities},
	config::Config,
	error::{ErrorHandler, LogErrors},
	events::{patch_event, InvokerContext},
	host::{HostNode, Platform},
	props::patch_property,
	side_table::SideTable,
	style::{patch_style, PrefixCache},
	value::Value,
};
use core::{
	any::Any,
	fmt::{self, Debug, Formatter},
};
use std::{borrow::Cow, rc::Rc};
use tracing::{debug, instrument, trace, trace_span};

/// Opaque reference to the component instance that owns a node.
pub type ComponentRef = Rc<dyn Any>;
/// Opaque reference to an enclosing suspense boundary.
pub type SuspenseRef = Rc<dyn Any>;
/// Opaque descriptor of one previously mounted child.
pub type ChildRef = Rc<dyn Any>;
/// Releases previously mounted children before their container's content is overwritten.
pub type UnmountChildren<'a> = dyn Fn(&[ChildRef], Option<&ComponentRef>, Option<&SuspenseRef>) + 'a;

/// Parameters that are only interpreted by content-replacing property writes and event bindings.
#[derive(Clone, Copy, Default)]
pub struct PatchExtra<'a> {
	pub prev_children: &'a [ChildRef],
	pub owner: Option<&'a ComponentRef>,
	pub suspense: Option<&'a SuspenseRef>,
	pub unmount_children: Option<&'a UnmountChildren<'a>>,
}
impl<'a> Debug for PatchExtra<'a> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("PatchExtra")
			.field("prev_children.len()", &self.prev_children.len())
			.field("owner", &self.owner.is_some())
			.field("suspense", &self.suspense.is_some())
			.field("unmount_children", &self.unmount_children.is_some())
			.finish()
	}
}

/// Applies declared per-key values to live nodes of one host.
///
/// Each instance owns its own prefix cache, coalesced clock and per-node side table,
/// so independent instances never interfere.
///
/// # Correct Use
///
/// Call [`Reconciler::forget`] for every node this instance has patched before it's discarded.
/// Nodes are tracked by [`HostNode::key`] only, so entries for dropped nodes (shadow `value`s,
/// checkbox values, transition classes, event bindings) otherwise stay in memory indefinitely.
///
/// Native listeners that are still registered when their invoker is dropped
/// (on [`forget`](`Reconciler::forget`)-less teardown or when this instance is dropped)
/// may start throwing errors into the host, depending on the [`HostNode`] implementation.
pub struct Reconciler<N: HostNode> {
	side_table: SideTable<N>,
	prefix_cache: PrefixCache,
	clock: CoalescedClock,
	capabilities: TimestampCapabilities,
	error_handler: Rc<dyn ErrorHandler<N::Event>>,
}
impl<N: HostNode> Reconciler<N> {
	#[must_use]
	pub fn new(platform: Rc<dyn Platform>) -> Self {
		Self::with_config(platform, Config::default())
	}

	/// Probes `platform`'s timestamp behaviour once.
	#[must_use]
	#[instrument(skip(platform))]
	pub fn with_config(platform: Rc<dyn Platform>, config: Config) -> Self {
		let capabilities = TimestampCapabilities::probe(&*platform, config.timestamp_guard);
		Self {
			side_table: SideTable::new(),
			prefix_cache: PrefixCache::new(config.vendor_prefixes),
			clock: CoalescedClock::new(platform, capabilities),
			capabilities,
			error_handler: Rc::new(LogErrors),
		}
	}

	/// Replaces the default [`LogErrors`] policy for event handler failures.
	#[must_use]
	pub fn with_error_handler(mut self, error_handler: Rc<dyn ErrorHandler<N::Event>>) -> Self {
		self.error_handler = error_handler;
		self
	}

	#[must_use]
	pub fn capabilities(&self) -> TimestampCapabilities {
		self.capabilities
	}

	/// Whether the diff engine must patch `key` even if its declared value didn't change.
	///
	/// A live `value` can drift from the declared one through user input.
	#[must_use]
	pub fn force_patch_prop(&self, _node: &N, key: &str) -> bool {
		key == "value"
	}

	/// Makes `node`'s state match `next` for `key`.
	///
	/// `prev` must be the value declared for `key` in the previous call (or [`Value::Null`]).
	/// Never fails. Host rejections are logged and affect only this key.
	#[instrument(skip(self, node, prev, next, extra))]
	pub fn patch_prop(&mut self, node: &N, key: &str, prev: &Value<N::Event>, next: &Value<N::Event>, is_namespaced: bool, extra: PatchExtra<'_>) {
		let node_key = node.key();
		let kind = classify(node, key, next, is_namespaced);
		let span = trace_span!("Patching", ?node_key, ?kind);
		let _enter = span.enter();

		match kind {
			KeyKind::Class => {
				let transition_classes = self.side_table.get(&node_key).and_then(|state| state.transition_classes.as_deref());
				let value = match next {
					Value::Null => None,
					Value::Str(value) => Some(Cow::Borrowed(value.as_str())),
					value => Some(Cow::Owned(value.to_js_string())),
				};
				patch_class(node, value.as_deref(), is_namespaced, transition_classes)
			}

			KeyKind::Style => {
				let visibility_controlled = self.side_table.get(&node_key).map_or(false, |state| state.visibility_original_display.is_some());
				patch_style(node, prev, next, &mut self.prefix_cache, visibility_controlled)
			}

			KeyKind::Event => {
				let Self {
					side_table,
					clock,
					capabilities,
					error_handler,
					..
				} = self;
				let context = InvokerContext {
					clock,
					capabilities: *capabilities,
					error_handler,
				};
				patch_event(node, &mut side_table.get_or_insert_default(node_key).invokers, key, next, extra.owner, &context);
				side_table.prune(&node_key);
			}

			KeyKind::IgnoredModelListener => trace!("Ignoring model listener."),

			KeyKind::Property => {
				patch_property(node, key, next, &extra, &mut self.side_table.get_or_insert_default(node_key).shadow_value);
				self.side_table.prune(&node_key);
			}

			KeyKind::Attribute => {
				// Checkbox bindings read these back, and attributes would stringify them.
				let remembered = (!next.is_null()).then(|| next.clone());
				match key {
					"true-value" => self.side_table.get_or_insert_default(node_key).true_value = remembered,
					"false-value" => self.side_table.get_or_insert_default(node_key).false_value = remembered,
					_ => (),
				}
				self.side_table.prune(&node_key);
				patch_attr(node, key, next, is_namespaced)
			}
		}
	}

	/// Sets (or with `None` clears) the classes a running transition has added to `node`.
	pub fn set_transition_classes(&mut self, node: &N, classes: Option<Vec<String>>) {
		let node_key = node.key();
		self.side_table.get_or_insert_default(node_key).transition_classes = classes;
		self.side_table.prune(&node_key);
	}

	#[must_use]
	pub fn transition_classes(&self, node: &N) -> Option<&[String]> {
		self.side_table.get(&node.key())?.transition_classes.as_deref()
	}

	/// Hands control of `node`'s `display` to a visibility toggle, remembering the original `display`.
	///
	/// `None` returns control to declared styles.
	pub fn set_visibility_controlled(&mut self, node: &N, original_display: Option<String>) {
		let node_key = node.key();
		self.side_table.get_or_insert_default(node_key).visibility_original_display = original_display;
		self.side_table.prune(&node_key);
	}

	#[must_use]
	pub fn visibility_original_display(&self, node: &N) -> Option<&str> {
		self.side_table.get(&node.key())?.visibility_original_display.as_deref()
	}

	/// The last declared `value` of `node`, before it was stringified for the live property.
	#[must_use]
	pub fn shadow_value(&self, node: &N) -> Option<&Value<N::Event>> {
		self.side_table.get(&node.key())?.shadow_value.as_ref()
	}

	#[must_use]
	pub fn true_value(&self, node: &N) -> Option<&Value<N::Event>> {
		self.side_table.get(&node.key())?.true_value.as_ref()
	}

	#[must_use]
	pub fn false_value(&self, node: &N) -> Option<&Value<N::Event>> {
		self.side_table.get(&node.key())?.false_value.as_ref()
	}

	/// When the invoker currently bound to `raw_key` on `node` was attached, on the coalesced clock.
	#[must_use]
	pub fn invoker_attached_at(&self, node: &N, raw_key: &str) -> Option<f64> {
		self.side_table.get(&node.key())?.invokers.get(raw_key).map(|record| record.attached())
	}

	/// Deregisters all of `node`'s listeners and drops everything remembered about it.
	///
	/// Required once per patched node before it's discarded, whether or not it had event bindings.
	#[instrument(skip(self, node))]
	pub fn forget(&mut self, node: &N) {
		let node_key = node.key();
		if let Some(state) = self.side_table.remove(&node_key) {
			let listener_count = state.invokers.len();
			for (_, record) in state.invokers {
				record.deregister(node)
			}
			trace!(?node_key, listener_count, "Forgot node.");
		}
		debug!("Tracked node count/cached capacity: {}/{}", self.side_table.len(), self.side_table.capacity());
	}

	/// How many nodes currently have auxiliary state.
	#[must_use]
	pub fn tracked_node_count(&self) -> usize {
		self.side_table.len()
	}
}
impl<N: HostNode> Debug for Reconciler<N> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Reconciler")
			.field("tracked_nodes", &self.side_table.len())
			.field("prefix_cache.len()", &self.prefix_cache.len())
			.field("clock", &self.clock)
			.field("capabilities", &self.capabilities)
			.finish()
	}
}
