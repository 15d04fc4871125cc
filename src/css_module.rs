//! Access to the class-name mappings that scoped CSS modules inject into component instances.

use hashbrown::HashMap;
use std::borrow::Cow;
use tracing::warn;

pub const DEFAULT_CSS_MODULE: &str = "$style";

/// Original class name → scoped class name.
pub type CssModule = HashMap<String, String>;

/// Implemented by component instances that may carry CSS modules.
pub trait CssModules {
	/// `None` if no modules were injected at all.
	fn css_modules(&self) -> Option<&HashMap<String, CssModule>>;
}

/// Looks up the CSS module `name` of the current component `instance`.
///
/// Misuse (no current instance, no injected modules, unknown module name) is reported
/// and degrades to an empty mapping.
pub fn css_module<'a, C: CssModules + ?Sized>(instance: Option<&'a C>, name: &str) -> Cow<'a, CssModule> {
	let instance = match instance {
		Some(instance) => instance,
		None => {
			warn!("`css_module` must be called during component setup.");
			return Cow::Owned(CssModule::new());
		}
	};

	let modules = match instance.css_modules() {
		Some(modules) => modules,
		None => {
			warn!("Current instance does not have CSS modules injected.");
			return Cow::Owned(CssModule::new());
		}
	};

	match modules.get(name) {
		Some(module) => Cow::Borrowed(module),
		None => {
			warn!("Current instance does not have CSS module named {:?}.", name);
			Cow::Owned(CssModule::new())
		}
	}
}
