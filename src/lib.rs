#![doc(html_root_url = "https://docs.rs/dom-prop-patch/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Applies declared per-key values to live UI nodes.
//!
//! Start with a [`Reconciler`] over a [`HostNode`] implementation, for example [`web::WebNode`].

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod attrs;
pub mod casing;
pub mod class;
pub mod classify;
pub mod clock;
pub mod config;
pub mod css_module;
pub mod error;
pub mod events;
pub mod host;
pub mod props;
pub mod style;
pub mod value;
pub mod web;

mod patch;
mod side_table;

pub use config::{Config, TimestampGuard};
pub use error::{ErrorCode, ErrorHandler, HandlerError, HostError, LogErrors};
pub use events::{parse_event_name, InvokedEvent};
pub use host::{HostEvent, HostNode, ListenerOptions, Platform, PropertyType};
pub use patch::{ChildRef, ComponentRef, PatchExtra, Reconciler, SuspenseRef, UnmountChildren};
pub use value::{EventValue, Handler, StyleEntry, StyleMap, Value};
