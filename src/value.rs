//! The declarative side of a patch: what a single key on a single node *should* be.

use crate::{error::HandlerError, events::InvokedEvent};
use core::fmt::{self, Debug, Formatter};
use std::rc::Rc;

/// A single event handler, receiving the native event wrapped in an [`InvokedEvent`].
pub type Handler<E> = Rc<dyn Fn(&InvokedEvent<'_, E>) -> Result<(), HandlerError>>;

/// One handler or an ordered list of them, bound to a single event-binding key.
pub enum EventValue<E> {
	Single(Handler<E>),
	Many(Vec<Handler<E>>),
}
impl<E> Clone for EventValue<E> {
	fn clone(&self) -> Self {
		match self {
			Self::Single(handler) => Self::Single(Rc::clone(handler)),
			Self::Many(handlers) => Self::Many(handlers.clone()),
		}
	}
}
impl<E> Debug for EventValue<E> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::Single(_) => f.write_str("EventValue::Single(..)"),
			Self::Many(handlers) => write!(f, "EventValue::Many([..; {}])", handlers.len()),
		}
	}
}

/// A single style property value.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleEntry {
	Null,
	One(String),
	/// Applied in order, e.g. for progressively enhanced values.
	Many(Vec<String>),
}
impl StyleEntry {
	#[must_use]
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}
}
impl From<&str> for StyleEntry {
	fn from(value: &str) -> Self {
		Self::One(value.to_owned())
	}
}
impl From<String> for StyleEntry {
	fn from(value: String) -> Self {
		Self::One(value)
	}
}
impl From<Vec<String>> for StyleEntry {
	fn from(values: Vec<String>) -> Self {
		Self::Many(values)
	}
}

/// Style mapping in declaration order.
///
/// Keys are camel-case (`fontSize`), kebab-case (`font-size`) or custom properties (`--accent`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleMap(Vec<(String, StyleEntry)>);
impl StyleMap {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts or replaces `name`, keeping its original position when replacing.
	pub fn insert(&mut self, name: impl Into<String>, entry: impl Into<StyleEntry>) -> &mut Self {
		let name = name.into();
		let entry = entry.into();
		match self.0.iter_mut().find(|(n, _)| *n == name) {
			Some((_, existing)) => *existing = entry,
			None => self.0.push((name, entry)),
		}
		self
	}

	#[must_use]
	pub fn get(&self, name: &str) -> Option<&StyleEntry> {
		self.0.iter().find(|(n, _)| n == name).map(|(_, entry)| entry)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleEntry)> {
		self.0.iter().map(|(name, entry)| (name.as_str(), entry))
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl<N: Into<String>, V: Into<StyleEntry>> core::iter::FromIterator<(N, V)> for StyleMap {
	fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
		let mut map = Self::new();
		for (name, entry) in iter {
			map.insert(name, entry);
		}
		map
	}
}

/// A declared value for one key.
///
/// `E` is the host's native event type.
pub enum Value<E> {
	Null,
	Bool(bool),
	Number(f64),
	Str(String),
	Style(StyleMap),
	Handlers(EventValue<E>),
}
impl<E> Value<E> {
	#[must_use]
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	#[must_use]
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Str(s) => Some(s),
			_ => None,
		}
	}

	#[must_use]
	pub fn is_callable(&self) -> bool {
		matches!(self, Self::Handlers(_))
	}

	/// Stringifies like a scripting host would when assigning to a string-typed slot.
	///
	/// [`Null`](`Value::Null`) becomes the empty string.
	#[must_use]
	pub fn to_js_string(&self) -> String {
		match self {
			Self::Null => String::new(),
			Self::Bool(b) => b.to_string(),
			Self::Number(n) => number_to_js_string(*n),
			Self::Str(s) => s.clone(),
			Self::Style(_) => "[object Object]".to_owned(),
			Self::Handlers(_) => "function".to_owned(),
		}
	}
}
impl<E> Clone for Value<E> {
	fn clone(&self) -> Self {
		match self {
			Self::Null => Self::Null,
			Self::Bool(b) => Self::Bool(*b),
			Self::Number(n) => Self::Number(*n),
			Self::Str(s) => Self::Str(s.clone()),
			Self::Style(map) => Self::Style(map.clone()),
			Self::Handlers(handlers) => Self::Handlers(handlers.clone()),
		}
	}
}
impl<E> Debug for Value<E> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::Null => f.write_str("Null"),
			Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
			Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
			Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
			Self::Style(map) => f.debug_tuple("Style").field(map).finish(),
			Self::Handlers(handlers) => handlers.fmt(f),
		}
	}
}
impl<E> PartialEq for Value<E> {
	/// Handlers compare by identity.
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Null, Self::Null) => true,
			(Self::Bool(a), Self::Bool(b)) => a == b,
			#[allow(clippy::float_cmp)]
			(Self::Number(a), Self::Number(b)) => a == b,
			(Self::Str(a), Self::Str(b)) => a == b,
			(Self::Style(a), Self::Style(b)) => a == b,
			(Self::Handlers(EventValue::Single(a)), Self::Handlers(EventValue::Single(b))) => Rc::ptr_eq(a, b),
			(Self::Handlers(EventValue::Many(a)), Self::Handlers(EventValue::Many(b))) => {
				a.len() == b.len() && a.iter().zip(b).all(|(a, b)| Rc::ptr_eq(a, b))
			}
			_ => false,
		}
	}
}
impl<E> From<&str> for Value<E> {
	fn from(value: &str) -> Self {
		Self::Str(value.to_owned())
	}
}
impl<E> From<String> for Value<E> {
	fn from(value: String) -> Self {
		Self::Str(value)
	}
}
impl<E> From<bool> for Value<E> {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}
impl<E> From<f64> for Value<E> {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}
impl<E> From<StyleMap> for Value<E> {
	fn from(value: StyleMap) -> Self {
		Self::Style(value)
	}
}
impl<E> From<EventValue<E>> for Value<E> {
	fn from(value: EventValue<E>) -> Self {
		Self::Handlers(value)
	}
}
impl<E, T: Into<Value<E>>> From<Option<T>> for Value<E> {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}

/// Shortest round-trip digits, with exponent notation outside of `1e-6..1e21`.
fn number_to_js_string(n: f64) -> String {
	if n.is_nan() {
		"NaN".to_owned()
	} else if n.is_infinite() {
		let sign = if n > 0.0 { "" } else { "-" };
		format!("{}Infinity", sign)
	} else if n == 0.0 {
		// Also -0.
		"0".to_owned()
	} else if n.abs() >= 1e21 || n.abs() < 1e-6 {
		let exponential = format!("{:e}", n);
		match exponential.split_once('e') {
			Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{}e+{}", mantissa, exponent),
			_ => exponential,
		}
	} else {
		format!("{}", n)
	}
}
