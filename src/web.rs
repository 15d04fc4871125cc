//! [`HostNode`] and [`Platform`] for browser DOM elements via [`web_sys`].

use crate::{
	error::HostError,
	events::call_handlers,
	host::{Dispatch, HostEvent, HostNode, ListenerOptions, Platform, PropertyType},
	value::{StyleEntry, Value},
};
use core::cell::{Cell, RefCell};
use js_sys::{Function, Object, Reflect, WeakMap};
use tracing::trace;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{AddEventListenerOptions, CssStyleDeclaration, Element};

thread_local! {
	/// Element → key, without touching the elements themselves.
	static NODE_KEYS: WeakMap = WeakMap::new();
	static NEXT_NODE_KEY: Cell<u32> = Cell::new(0);
	static ADD_EVENT_LISTENER_OPTIONS_CACHE: RefCell<[Option<AddEventListenerOptions>; 8]> = RefCell::new(Default::default());
}

fn js_error(error: JsValue) -> HostError {
	HostError::Js(error.as_string().unwrap_or_else(|| format!("{:?}", error)))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn node_key(element: &Element) -> u32 {
	NODE_KEYS.with(|node_keys| {
		let object: &Object = element.as_ref();
		match node_keys.get(object).as_f64() {
			Some(key) => key as u32,
			None => {
				let key = NEXT_NODE_KEY.with(|next| {
					let key = next.get();
					next.set(key.wrapping_add(1));
					key
				});
				node_keys.set(object, &JsValue::from(key));
				trace!(key, "Assigned node key.");
				key
			}
		}
	})
}

/// A DOM [`Element`] handle. Clones refer to the same element.
#[derive(Debug, Clone)]
pub struct WebNode {
	element: Element,
	key: u32,
}
impl WebNode {
	#[must_use]
	pub fn new(element: Element) -> Self {
		let key = node_key(&element);
		Self { element, key }
	}

	#[must_use]
	pub fn element(&self) -> &Element {
		&self.element
	}

	fn style(&self) -> Result<CssStyleDeclaration, HostError> {
		Reflect::get(&self.element, &JsValue::from_str("style"))
			.map_err(js_error)?
			.dyn_into::<CssStyleDeclaration>()
			.map_err(|_| HostError::Unsupported("element without inline style"))
	}
}
impl From<Element> for WebNode {
	fn from(element: Element) -> Self {
		Self::new(element)
	}
}

impl HostEvent for web_sys::Event {
	fn time_stamp(&self) -> f64 {
		web_sys::Event::time_stamp(self)
	}

	fn stop_immediate_propagation(&self) {
		web_sys::Event::stop_immediate_propagation(self)
	}
}

fn to_js(value: &Value<web_sys::Event>) -> Result<JsValue, HostError> {
	Ok(match value {
		Value::Null => JsValue::NULL,
		Value::Bool(b) => JsValue::from_bool(*b),
		Value::Number(n) => JsValue::from_f64(*n),
		Value::Str(s) => JsValue::from_str(s),
		Value::Style(map) => {
			let object = Object::new();
			for (name, entry) in map.iter() {
				let entry = match entry {
					StyleEntry::Null => JsValue::NULL,
					StyleEntry::One(value) => JsValue::from_str(value),
					StyleEntry::Many(values) => values.iter().map(|value| JsValue::from_str(value)).collect::<js_sys::Array>().into(),
				};
				Reflect::set(&object, &JsValue::from_str(name), &entry).map_err(js_error)?;
			}
			object.into()
		}
		Value::Handlers(handlers) => {
			let handlers = handlers.clone();
			Closure::wrap(Box::new(move |event: web_sys::Event| call_handlers(&handlers, &event)) as Box<dyn Fn(web_sys::Event)>).into_js_value()
		}
	})
}

impl HostNode for WebNode {
	type Event = web_sys::Event;
	type Key = u32;
	type Listener = Closure<dyn Fn(web_sys::Event)>;

	fn key(&self) -> Self::Key {
		self.key
	}

	fn tag_name(&self) -> String {
		self.element.tag_name()
	}

	fn set_attribute(&self, name: &str, value: &str) -> Result<(), HostError> {
		self.element.set_attribute(name, value).map_err(js_error)
	}

	fn set_attribute_ns(&self, namespace: &str, qualified_name: &str, value: &str) -> Result<(), HostError> {
		self.element.set_attribute_ns(Some(namespace), qualified_name, value).map_err(js_error)
	}

	fn remove_attribute(&self, name: &str) -> Result<(), HostError> {
		self.element.remove_attribute(name).map_err(js_error)
	}

	fn remove_attribute_ns(&self, namespace: &str, local_name: &str) -> Result<(), HostError> {
		self.element.remove_attribute_ns(Some(namespace), local_name).map_err(js_error)
	}

	fn set_class_name(&self, class_name: &str) -> Result<(), HostError> {
		self.element.set_class_name(class_name);
		Ok(())
	}

	fn has_property(&self, key: &str) -> bool {
		Reflect::has(&self.element, &JsValue::from_str(key)).unwrap_or(false)
	}

	fn property_type(&self, key: &str) -> PropertyType {
		match Reflect::get(&self.element, &JsValue::from_str(key)) {
			Err(_) => PropertyType::Undefined,
			Ok(value) if value.is_undefined() => PropertyType::Undefined,
			Ok(value) if value.as_bool().is_some() => PropertyType::Boolean,
			Ok(value) if value.as_f64().is_some() => PropertyType::Number,
			Ok(value) if value.is_string() => PropertyType::String,
			Ok(value) if value.is_function() => PropertyType::Function,
			Ok(_) => PropertyType::Object,
		}
	}

	fn property_as_string(&self, key: &str) -> Option<String> {
		Reflect::get(&self.element, &JsValue::from_str(key)).ok()?.as_string()
	}

	fn set_property(&self, key: &str, value: &Value<Self::Event>) -> Result<(), HostError> {
		if Reflect::set(&self.element, &JsValue::from_str(key), &to_js(value)?).map_err(js_error)? {
			Ok(())
		} else {
			Err(HostError::Rejected {
				key: key.to_owned(),
				reason: "property is read-only".to_owned(),
			})
		}
	}

	fn style_has(&self, name: &str) -> bool {
		self.style().map_or(false, |style| Reflect::has(&style, &JsValue::from_str(name)).unwrap_or(false))
	}

	fn style_get(&self, name: &str) -> String {
		self.style()
			.ok()
			.and_then(|style| Reflect::get(&style, &JsValue::from_str(name)).ok())
			.and_then(|value| value.as_string())
			.unwrap_or_default()
	}

	fn style_set(&self, name: &str, value: &str) -> Result<(), HostError> {
		let style = self.style()?;
		Reflect::set(&style, &JsValue::from_str(name), &JsValue::from_str(value)).map_err(js_error)?;
		Ok(())
	}

	fn style_set_property(&self, name: &str, value: &str, priority: Option<&str>) -> Result<(), HostError> {
		let style = self.style()?;
		let result = match priority {
			Some(priority) => style.set_property_with_priority(name, value, priority),
			None => style.set_property(name, value),
		};
		result.map_err(js_error)
	}

	fn set_style_text(&self, text: &str) -> Result<(), HostError> {
		self.style()?.set_css_text(text);
		Ok(())
	}

	fn add_event_listener(&self, name: &str, dispatch: Dispatch<Self::Event>, options: ListenerOptions) -> Result<Self::Listener, HostError> {
		let listener = Closure::wrap(Box::new(move |event: web_sys::Event| dispatch(&event)) as Box<dyn Fn(web_sys::Event)>);
		ADD_EVENT_LISTENER_OPTIONS_CACHE.with(|cache| {
			let mut cache = cache.borrow_mut();
			let web_options = cache[options.cache_index()].get_or_insert_with(|| {
				let web_options = AddEventListenerOptions::new();
				web_options.set_capture(options.capture);
				web_options.set_once(options.once);
				web_options.set_passive(options.passive);
				web_options
			});
			self.element
				.add_event_listener_with_callback_and_add_event_listener_options(name, listener.as_ref().unchecked_ref::<Function>(), web_options)
				.map_err(js_error)
		})?;
		Ok(listener)
	}

	fn remove_event_listener(&self, name: &str, listener: &Self::Listener, options: ListenerOptions) -> Result<(), HostError> {
		self.element
			.remove_event_listener_with_callback_and_bool(name, listener.as_ref().unchecked_ref::<Function>(), options.capture)
			.map_err(js_error)
	}
}

/// The current browser window.
#[derive(Debug, Clone)]
pub struct WebPlatform {
	window: web_sys::Window,
}
impl WebPlatform {
	/// `None` outside of a window context.
	#[must_use]
	pub fn new() -> Option<Self> {
		web_sys::window().map(|window| Self { window })
	}
}
impl Platform for WebPlatform {
	fn epoch_now(&self) -> f64 {
		js_sys::Date::now()
	}

	fn high_res_now(&self) -> f64 {
		self.window.performance().map_or_else(js_sys::Date::now, |performance| performance.now())
	}

	fn fresh_event_time_stamp(&self) -> f64 {
		self.window
			.document()
			.and_then(|document| document.create_event("Event").ok())
			.map_or(0.0, |event| event.time_stamp())
	}

	fn user_agent(&self) -> Option<String> {
		self.window.navigator().user_agent().ok()
	}

	fn queue_microtask(&self, task: Box<dyn FnOnce()>) {
		let callback = Closure::once_into_js(move || task());
		self.window.queue_microtask(callback.unchecked_ref::<Function>())
	}
}
