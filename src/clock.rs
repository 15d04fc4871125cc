use crate::{config::TimestampGuard, host::Platform};
use core::cell::Cell;
use std::rc::Rc;
use tracing::{debug, trace};

/// What the event re-entrancy guard needs to know about the host's timestamps, probed once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampCapabilities {
	/// Event timestamps are relative to page load, so attach times must be taken from the high-resolution clock too.
	pub high_res: bool,
	/// The host never runs microtasks between propagation steps, so re-entrant attachment can't happen.
	pub skip_check: bool,
}
impl TimestampCapabilities {
	#[must_use]
	pub fn probe(platform: &dyn Platform, guard: TimestampGuard) -> Self {
		// An epoch timestamp larger than one taken *afterwards* means the latter is page-relative.
		let epoch_now = platform.epoch_now();
		let high_res = epoch_now > platform.fresh_event_time_stamp();

		let skip_check = match guard {
			TimestampGuard::AlwaysCheck => false,
			TimestampGuard::Skip => true,
			TimestampGuard::Probe => platform.user_agent().as_deref().map_or(false, is_legacy_firefox),
		};

		let capabilities = Self { high_res, skip_check };
		debug!(?capabilities, "Probed event timestamp capabilities.");
		capabilities
	}
}

/// Firefox 53 and earlier report bogus event timestamps but also don't run microtasks mid-propagation.
fn is_legacy_firefox(user_agent: &str) -> bool {
	let user_agent = user_agent.to_ascii_lowercase();
	let version = match user_agent.find("firefox/") {
		Some(start) => &user_agent[start + "firefox/".len()..],
		None => return false,
	};
	let digits = version.bytes().take_while(u8::is_ascii_digit).count();
	version[..digits].parse::<u32>().map_or(false, |major| major <= 53)
}

/// A timestamp that is read from the host at most once per tick.
///
/// Every listener attached within one tick gets the same attach time,
/// so the re-entrancy guard's comparisons are stable within that tick.
#[derive(Clone)]
pub struct CoalescedClock {
	platform: Rc<dyn Platform>,
	high_res: bool,
	cached: Rc<Cell<Option<f64>>>,
}
impl CoalescedClock {
	#[must_use]
	pub fn new(platform: Rc<dyn Platform>, capabilities: TimestampCapabilities) -> Self {
		Self {
			platform,
			high_res: capabilities.high_res,
			cached: Rc::new(Cell::new(None)),
		}
	}

	/// Reads the host clock matching the host's event timestamps, bypassing the cache.
	#[must_use]
	pub fn raw_now(&self) -> f64 {
		if self.high_res {
			self.platform.high_res_now()
		} else {
			self.platform.epoch_now()
		}
	}

	#[must_use]
	pub fn now(&self) -> f64 {
		if let Some(cached) = self.cached.get() {
			return cached;
		}

		let cached = Rc::clone(&self.cached);
		self.platform.queue_microtask(Box::new(move || {
			trace!("Resetting coalesced clock.");
			cached.set(None)
		}));

		let now = self.raw_now();
		self.cached.set(Some(now));
		now
	}
}
impl core::fmt::Debug for CoalescedClock {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("CoalescedClock")
			.field("high_res", &self.high_res)
			.field("cached", &self.cached.get())
			.finish()
	}
}
