//! Event bindings, implemented as one stable native listener (the invoker) per binding key
//! whose handler value is swapped in place on update.

use crate::{
	casing::hyphenate,
	clock::{CoalescedClock, TimestampCapabilities},
	error::{ErrorCode, ErrorHandler},
	host::{Dispatch, HostEvent, HostNode, ListenerOptions},
	patch::ComponentRef,
	value::{EventValue, Value},
};
use core::cell::{Cell, RefCell};
use hashbrown::HashMap;
use std::rc::Rc;
use tracing::{error, instrument, level_filters::STATIC_MAX_LEVEL, trace, trace_span, warn, Level};

/// Listener option suffixes, recognised repeatedly from the end of a binding key.
static MODIFIERS: &[(&str, fn(&mut ListenerOptions))] = &[
	("Once", |options: &mut ListenerOptions| options.once = true),
	("Passive", |options: &mut ListenerOptions| options.passive = true),
	("Capture", |options: &mut ListenerOptions| options.capture = true),
];

/// Splits a raw event-binding key into the host's event name and listener options.
///
/// `onClickOnceCapture` → `("click", once + capture)`, `onMouseEnter` → `("mouse-enter", default)`.
#[must_use]
pub fn parse_event_name(raw_key: &str) -> (String, ListenerOptions) {
	let mut name = raw_key;
	let mut options = ListenerOptions::default();
	'strip: loop {
		for (suffix, set) in MODIFIERS {
			if let Some(stripped) = name.strip_suffix(suffix) {
				name = stripped;
				set(&mut options);
				continue 'strip;
			}
		}
		break;
	}
	(hyphenate(name.strip_prefix("on").unwrap_or(name)), options)
}

/// A native event as seen by declared handlers.
pub struct InvokedEvent<'a, E> {
	native: &'a E,
	stopped: &'a Cell<bool>,
}
impl<'a, E: HostEvent> InvokedEvent<'a, E> {
	#[must_use]
	pub fn native(&self) -> &'a E {
		self.native
	}

	/// Stops native propagation and also skips the remaining handlers bound to the same key,
	/// which were all registered as one native listener.
	pub fn stop_immediate_propagation(&self) {
		self.native.stop_immediate_propagation();
		self.stopped.set(true);
	}

	#[must_use]
	pub fn is_immediate_propagation_stopped(&self) -> bool {
		self.stopped.get()
	}
}

/// The part of an invoker that its native listener closes over.
struct Invoker<E> {
	value: RefCell<EventValue<E>>,
	attached: f64,
	owner: Option<ComponentRef>,
}

/// One registered invoker. Dropping it releases the native callback, so it must be deregistered first.
pub(crate) struct InvokerRecord<N: HostNode> {
	invoker: Rc<Invoker<N::Event>>,
	listener: N::Listener,
	name: String,
	options: ListenerOptions,
}
impl<N: HostNode> InvokerRecord<N> {
	pub fn attached(&self) -> f64 {
		self.invoker.attached
	}

	pub fn deregister(self, node: &N) {
		if let Err(error) = node.remove_event_listener(&self.name, &self.listener, self.options) {
			error!("Failed to remove event listener {:?} ({:?}): {}", self.name, self.options, error)
		}
	}
}

/// Everything an invoker needs from its [`Reconciler`](`crate::Reconciler`).
pub(crate) struct InvokerContext<'a, E> {
	pub clock: &'a CoalescedClock,
	pub capabilities: TimestampCapabilities,
	pub error_handler: &'a Rc<dyn ErrorHandler<E>>,
}

/// Binds, updates or unbinds the handlers for `raw_key` on `node`.
#[instrument(skip(node, invokers, next, owner, context))]
pub(crate) fn patch_event<N: HostNode>(
	node: &N,
	invokers: &mut HashMap<String, InvokerRecord<N>>,
	raw_key: &str,
	next: &Value<N::Event>,
	owner: Option<&ComponentRef>,
	context: &InvokerContext<'_, N::Event>,
) {
	let next = match next {
		Value::Handlers(handlers) => Some(handlers),
		Value::Null => None,
		unsupported => {
			if STATIC_MAX_LEVEL >= Level::WARN {
				warn!("Event binding {:?} expects handlers but got {:?}. Unbinding instead.", raw_key, unsupported)
			}
			None
		}
	};

	if let (Some(next), Some(existing)) = (next, invokers.get(raw_key)) {
		trace!("Swapping handlers of existing invoker.");
		*existing.invoker.value.borrow_mut() = next.clone();
		return;
	}

	let (name, options) = parse_event_name(raw_key);
	if let Some(next) = next {
		let invoker = Rc::new(Invoker {
			value: RefCell::new(next.clone()),
			attached: context.clock.now(),
			owner: owner.cloned(),
		});
		let dispatch = create_dispatch(Rc::clone(&invoker), context.clock.clone(), context.capabilities, Rc::clone(context.error_handler));
		match node.add_event_listener(&name, dispatch, options) {
			Ok(listener) => {
				trace!(%name, ?options, attached = invoker.attached, "Registered invoker.");
				invokers.insert(raw_key.to_owned(), InvokerRecord { invoker, listener, name, options });
			}
			Err(error) => error!("Failed to add event listener {:?} ({:?}): {}", name, options, error),
		}
	} else if let Some(record) = invokers.remove(raw_key) {
		trace!(%name, "Unbinding invoker.");
		record.deregister(node);
	}
}

/// Calls `value` for `event` outside of any invoker, e.g. for handlers assigned as native inline event properties.
///
/// Failures are logged. There is no re-entrancy guard.
pub(crate) fn call_handlers<E: HostEvent>(value: &EventValue<E>, event: &E) {
	let stopped = Cell::new(false);
	let invoked = InvokedEvent { native: event, stopped: &stopped };
	let handlers = match value {
		EventValue::Single(handler) => core::slice::from_ref(handler),
		EventValue::Many(handlers) => handlers.as_slice(),
	};
	for handler in handlers {
		if stopped.get() {
			break;
		}
		if let Err(handler_error) = handler(&invoked) {
			error!("Unhandled error in inline event handler: {}", handler_error)
		}
	}
}

fn create_dispatch<E: HostEvent + 'static>(
	invoker: Rc<Invoker<E>>,
	clock: CoalescedClock,
	capabilities: TimestampCapabilities,
	error_handler: Rc<dyn ErrorHandler<E>>,
) -> Dispatch<E> {
	Rc::new(move |event: &E| {
		let span = trace_span!("invoker", attached = invoker.attached);
		let _enter = span.enter();

		let time_stamp = match event.time_stamp() {
			t if t == 0.0 || t.is_nan() => clock.now(),
			t => t,
		};

		// A patch caused by an inner listener may attach this listener to an ancestor
		// while the same event is still propagating. Such an event began before the listener existed.
		if !capabilities.skip_check && time_stamp < invoker.attached - 1.0 {
			return trace!(time_stamp, "Discarding event that began before its listener was attached.");
		}

		// Cloned so that handlers can re-patch this binding.
		let value = invoker.value.borrow().clone();
		let stopped = Cell::new(false);
		let invoked = InvokedEvent { native: event, stopped: &stopped };
		match &value {
			EventValue::Single(handler) => error_handler.call_with_error_handling(handler, invoker.owner.as_ref(), ErrorCode::NativeEventHandler, &invoked),
			EventValue::Many(handlers) => {
				for handler in handlers {
					if stopped.get() {
						trace!("Immediate propagation stopped. Skipping remaining handlers.");
						break;
					}
					error_handler.call_with_error_handling(handler, invoker.owner.as_ref(), ErrorCode::NativeEventHandler, &invoked)
				}
			}
		}
	})
}
