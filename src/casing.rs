//! Name conversions between binding-name casing and host casing.

fn is_word_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '_'
}

/// `fontSize` → `font-size`, `MouseEnter` → `mouse-enter`.
///
/// Only upper-case letters that directly follow a word character are split off.
#[must_use]
pub fn hyphenate(name: &str) -> String {
	let mut hyphenated = String::with_capacity(name.len() + 4);
	let mut previous = None;
	for c in name.chars() {
		if c.is_ascii_uppercase() && previous.map_or(false, is_word_char) {
			hyphenated.push('-');
		}
		hyphenated.push(c.to_ascii_lowercase());
		previous = Some(c);
	}
	hyphenated
}

/// `font-size` → `fontSize`.
#[must_use]
pub fn camelize(name: &str) -> String {
	let mut camelized = String::with_capacity(name.len());
	let mut chars = name.chars().peekable();
	while let Some(c) = chars.next() {
		match (c, chars.peek()) {
			('-', Some(&next)) if is_word_char(next) => {
				camelized.push(next.to_ascii_uppercase());
				chars.next();
			}
			_ => camelized.push(c),
		}
	}
	camelized
}

#[must_use]
pub fn capitalize(name: &str) -> String {
	let mut chars = name.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hyphenate_splits_inner_capitals() {
		assert_eq!(hyphenate("fontSize"), "font-size");
		assert_eq!(hyphenate("Click"), "click");
		assert_eq!(hyphenate("MouseEnter"), "mouse-enter");
		assert_eq!(hyphenate("update:modelValue"), "update:model-value");
		assert_eq!(hyphenate("WebkitTransform"), "webkit-transform");
	}

	#[test]
	fn camelize_joins_dashes() {
		assert_eq!(camelize("font-size"), "fontSize");
		assert_eq!(camelize("-webkit-transition"), "WebkitTransition");
		assert_eq!(camelize("color"), "color");
		assert_eq!(camelize("trailing-"), "trailing-");
	}

	#[test]
	fn capitalize_first() {
		assert_eq!(capitalize("transition"), "Transition");
		assert_eq!(capitalize(""), "");
	}
}
