use crate::{events::InvokedEvent, patch::ComponentRef, value::Handler};
use thiserror::Error;
use tracing::error;

/// A host platform refused an operation.
///
/// These never escape a patch call. They are logged and the affected key is left as the host applied it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
	#[error("the host rejected {key:?}: {reason}")]
	Rejected { key: String, reason: String },

	#[error("unsupported by this host: {0}")]
	Unsupported(&'static str),

	#[error("script error: {0}")]
	Js(String),
}

/// Returned by event handlers that failed.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct HandlerError {
	message: String,
	#[source]
	source: Option<Box<dyn std::error::Error + 'static>>,
}
impl HandlerError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			source: None,
		}
	}

	pub fn with_source(message: impl Into<String>, source: impl std::error::Error + 'static) -> Self {
		Self {
			message: message.into(),
			source: Some(Box::new(source)),
		}
	}
}

/// Classifies where a handler error originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
	NativeEventHandler,
}

/// Isolates handler failures according to the surrounding application's error policy.
pub trait ErrorHandler<E> {
	fn call_with_error_handling(&self, handler: &Handler<E>, owner: Option<&ComponentRef>, code: ErrorCode, event: &InvokedEvent<'_, E>);
}

/// Reports handler failures through [`tracing`] and otherwise ignores them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogErrors;
impl<E> ErrorHandler<E> for LogErrors {
	fn call_with_error_handling(&self, handler: &Handler<E>, owner: Option<&ComponentRef>, code: ErrorCode, event: &InvokedEvent<'_, E>) {
		if let Err(handler_error) = handler(event) {
			error!(?code, has_owner = owner.is_some(), "Unhandled error in event handler: {}", handler_error);
		}
	}
}
