use std::borrow::Cow;

/// How the event re-entrancy guard decides whether it runs at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampGuard {
	/// Decide once from the host's timestamp behaviour and user agent.
	Probe,
	AlwaysCheck,
	/// For hosts that never run microtasks between propagation steps.
	Skip,
}
impl Default for TimestampGuard {
	fn default() -> Self {
		Self::Probe
	}
}

/// Per-[`Reconciler`](`crate::Reconciler`) settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// Tried in order, each followed by the capitalized property name, when a style property isn't supported as-is.
	pub vendor_prefixes: Vec<Cow<'static, str>>,
	pub timestamp_guard: TimestampGuard,
}
impl Default for Config {
	fn default() -> Self {
		Self {
			vendor_prefixes: vec!["Webkit".into(), "Moz".into(), "ms".into()],
			timestamp_guard: TimestampGuard::default(),
		}
	}
}
