use dom_prop_patch::{attrs::XLINK_NAMESPACE, ChildRef, ComponentRef, EventValue, PatchExtra, Reconciler, SuspenseRef, Value};
use std::{cell::Cell, rc::Rc};

use mock_host_::{MockEvent, MockNode, MockPlatform};

fn reconciler() -> Reconciler<MockNode> {
	Reconciler::new(Rc::new(MockPlatform::default()))
}

fn patch(reconciler: &mut Reconciler<MockNode>, node: &MockNode, key: &str, prev: impl Into<Value<MockEvent>>, next: impl Into<Value<MockEvent>>) {
	reconciler.patch_prop(node, key, &prev.into(), &next.into(), false, PatchExtra::default())
}

#[test]
fn value_is_shadowed_and_not_rewritten() {
	let mut reconciler = reconciler();
	let input = MockNode::new("INPUT").with_property("value", "");

	assert!(reconciler.force_patch_prop(&input, "value"));
	assert!(!reconciler.force_patch_prop(&input, "checked"));

	patch(&mut reconciler, &input, "value", Value::Null, 5.0);
	assert_eq!(input.property("value"), Some(Value::Str("5".to_owned())));
	assert_eq!(reconciler.shadow_value(&input), Some(&Value::Number(5.0)));
	assert_eq!(input.property_writes(), ["value"]);

	// Same declared value, same live value: no write, so the caret doesn't jump.
	patch(&mut reconciler, &input, "value", 5.0, 5.0);
	assert_eq!(input.property_writes(), ["value"]);

	// User input made the live value drift.
	input.set_live("value", "7");
	patch(&mut reconciler, &input, "value", 5.0, 5.0);
	assert_eq!(input.property("value"), Some(Value::Str("5".to_owned())));
	assert_eq!(input.property_writes(), ["value", "value"]);
}

#[test]
fn progress_value_is_a_plain_property() {
	let mut reconciler = reconciler();
	let progress = MockNode::new("PROGRESS").with_property("value", 0.0);

	patch(&mut reconciler, &progress, "value", Value::Null, 0.5);
	assert_eq!(progress.property("value"), Some(Value::Number(0.5)));
	assert_eq!(reconciler.shadow_value(&progress), None);
	assert_eq!(reconciler.tracked_node_count(), 0);
}

#[test]
fn empty_values_are_coerced_by_property_type() {
	let mut reconciler = reconciler();

	let select = MockNode::new("SELECT").with_property("multiple", false);
	patch(&mut reconciler, &select, "multiple", Value::Null, "");
	assert_eq!(select.property("multiple"), Some(Value::Bool(true)));
	patch(&mut reconciler, &select, "multiple", "", Value::Null);
	assert_eq!(select.property("multiple"), Some(Value::Bool(false)));

	let input = MockNode::new("INPUT")
		.with_property("placeholder", "hint")
		.with_attribute("placeholder", "hint")
		.with_property("maxLength", 10.0)
		.with_attribute("maxLength", "10");

	patch(&mut reconciler, &input, "placeholder", "hint", Value::Null);
	assert_eq!(input.property("placeholder"), Some(Value::Str(String::new())));
	assert_eq!(input.attribute("placeholder"), None);

	patch(&mut reconciler, &input, "maxLength", 10.0, Value::Null);
	assert_eq!(input.property("maxLength"), Some(Value::Number(0.0)));
	assert_eq!(input.attribute("maxLength"), None);
}

#[test]
fn rejected_property_affects_only_its_key() {
	let mut reconciler = reconciler();
	let input = MockNode::new("INPUT")
		.with_property("inputMode", "text")
		.with_property("title", "")
		.rejecting("inputMode");

	patch(&mut reconciler, &input, "inputMode", Value::Null, "bogus");
	patch(&mut reconciler, &input, "title", Value::Null, "ok");

	assert_eq!(input.property("inputMode"), Some(Value::Str("text".to_owned())));
	assert_eq!(input.property("title"), Some(Value::Str("ok".to_owned())));
}

#[test]
fn enumerated_and_read_only_keys_use_attributes() {
	let mut reconciler = reconciler();
	let input = MockNode::new("INPUT")
		.with_property("spellcheck", true)
		.with_property("draggable", false)
		.with_property("form", Value::Null)
		.with_property("list", Value::Null);

	patch(&mut reconciler, &input, "spellcheck", Value::Null, "false");
	patch(&mut reconciler, &input, "draggable", Value::Null, "true");
	patch(&mut reconciler, &input, "form", Value::Null, "signup");
	patch(&mut reconciler, &input, "list", Value::Null, "suggestions");

	assert_eq!(input.attribute("spellcheck").as_deref(), Some("false"));
	assert_eq!(input.attribute("draggable").as_deref(), Some("true"));
	assert_eq!(input.attribute("form").as_deref(), Some("signup"));
	assert_eq!(input.attribute("list").as_deref(), Some("suggestions"));
	assert_eq!(input.property("spellcheck"), Some(Value::Bool(true)));
	assert!(input.property_writes().is_empty());

	let textarea = MockNode::new("TEXTAREA").with_property("type", "textarea");
	patch(&mut reconciler, &textarea, "type", Value::Null, "text");
	assert_eq!(textarea.attribute("type").as_deref(), Some("text"));

	let datalist_host = MockNode::new("DIV").with_property("list", Value::Null);
	patch(&mut reconciler, &datalist_host, "list", Value::Null, "x");
	assert_eq!(datalist_host.attribute("list"), None);
	assert_eq!(datalist_host.property("list"), Some(Value::Str("x".to_owned())));
}

#[test]
fn inline_string_handlers_are_attributes() {
	let mut reconciler = reconciler();
	let div = MockNode::new("DIV").with_property("onclick", Value::Null);

	patch(&mut reconciler, &div, "onclick", Value::Null, "doSomething()");
	assert_eq!(div.attribute("onclick").as_deref(), Some("doSomething()"));
	assert_eq!(div.property("onclick"), Some(Value::Null));
	assert!(div.listeners().is_empty());
}

#[test]
fn attributes_stringify_and_remove() {
	let mut reconciler = reconciler();
	let div = MockNode::new("DIV");

	patch(&mut reconciler, &div, "aria-hidden", Value::Null, false);
	assert_eq!(div.attribute("aria-hidden").as_deref(), Some("false"));
	patch(&mut reconciler, &div, "data-count", Value::Null, 5.0);
	assert_eq!(div.attribute("data-count").as_deref(), Some("5"));
	patch(&mut reconciler, &div, "data-count", 5.0, Value::Null);
	assert_eq!(div.attribute("data-count"), None);

	patch(&mut reconciler, &div, "itemscope", Value::Null, true);
	assert_eq!(div.attribute("itemscope").as_deref(), Some(""));
	patch(&mut reconciler, &div, "itemscope", true, false);
	assert_eq!(div.attribute("itemscope"), None);
}

#[test]
fn xlink_attributes_are_namespaced() {
	let mut reconciler = reconciler();
	let symbol = MockNode::new("use");

	reconciler.patch_prop(&symbol, "xlink:href", &Value::Null, &"#icon".into(), true, PatchExtra::default());
	assert_eq!(symbol.namespaced_attribute(XLINK_NAMESPACE, "href").as_deref(), Some("#icon"));
	assert_eq!(symbol.attribute("xlink:href"), None);

	reconciler.patch_prop(&symbol, "xlink:href", &"#icon".into(), &Value::Null, true, PatchExtra::default());
	assert_eq!(symbol.namespaced_attribute(XLINK_NAMESPACE, "href"), None);
}

#[test]
fn checkbox_values_are_remembered_unstringified() {
	let mut reconciler = reconciler();
	let checkbox = MockNode::new("INPUT");

	patch(&mut reconciler, &checkbox, "true-value", Value::Null, 1.0);
	patch(&mut reconciler, &checkbox, "false-value", Value::Null, false);
	assert_eq!(reconciler.true_value(&checkbox), Some(&Value::Number(1.0)));
	assert_eq!(reconciler.false_value(&checkbox), Some(&Value::Bool(false)));
	assert_eq!(checkbox.attribute("true-value").as_deref(), Some("1"));

	patch(&mut reconciler, &checkbox, "true-value", 1.0, Value::Null);
	patch(&mut reconciler, &checkbox, "false-value", false, Value::Null);
	assert_eq!(reconciler.true_value(&checkbox), None);
	assert_eq!(checkbox.attribute("true-value"), None);
	assert_eq!(reconciler.tracked_node_count(), 0);
}

#[test]
fn class_merges_transition_classes() {
	let mut reconciler = reconciler();
	let div = MockNode::new("DIV");

	patch(&mut reconciler, &div, "class", Value::Null, "a b");
	assert_eq!(div.class_name(), "a b");

	reconciler.set_transition_classes(&div, Some(vec!["v-enter-from".to_owned(), "v-enter-active".to_owned()]));
	patch(&mut reconciler, &div, "class", "a b", "a");
	assert_eq!(div.class_name(), "a v-enter-from v-enter-active");
	patch(&mut reconciler, &div, "class", "a", Value::Null);
	assert_eq!(div.class_name(), "v-enter-from v-enter-active");

	reconciler.set_transition_classes(&div, None);
	assert_eq!(reconciler.transition_classes(&div), None);
	patch(&mut reconciler, &div, "class", Value::Null, Value::Null);
	assert_eq!(div.class_name(), "");
	assert_eq!(reconciler.tracked_node_count(), 0);
}

#[test]
fn namespaced_class_is_an_attribute() {
	let mut reconciler = reconciler();
	let circle = MockNode::new("circle");

	reconciler.patch_prop(&circle, "class", &Value::Null, &"dot".into(), true, PatchExtra::default());
	assert_eq!(circle.attribute("class").as_deref(), Some("dot"));
	assert_eq!(circle.class_name(), "");
}

#[test]
fn content_replacement_unmounts_children_first() {
	let mut reconciler = reconciler();
	let div = MockNode::new("DIV").with_property("innerHTML", "");

	let unmounted = Rc::new(Cell::new(0));
	let unmount_children = {
		let unmounted = Rc::clone(&unmounted);
		move |children: &[ChildRef], _: Option<&ComponentRef>, _: Option<&SuspenseRef>| unmounted.set(unmounted.get() + children.len())
	};
	let children: Vec<ChildRef> = vec![Rc::new(1_u8), Rc::new(2_u8)];
	let extra = PatchExtra {
		prev_children: &children,
		unmount_children: Some(&unmount_children),
		..PatchExtra::default()
	};

	reconciler.patch_prop(&div, "innerHTML", &Value::Null, &"<b>bold</b>".into(), false, extra);
	assert_eq!(unmounted.get(), 2);
	assert_eq!(div.property("innerHTML"), Some(Value::Str("<b>bold</b>".to_owned())));

	patch(&mut reconciler, &div, "innerHTML", "<b>bold</b>", Value::Null);
	assert_eq!(unmounted.get(), 2);
	assert_eq!(div.property("innerHTML"), Some(Value::Str(String::new())));
}

#[test]
fn namespaced_inner_html_is_a_property() {
	let mut reconciler = reconciler();
	let g = MockNode::new("g");

	reconciler.patch_prop(&g, "innerHTML", &Value::Null, &"<circle/>".into(), true, PatchExtra::default());
	assert_eq!(g.property("innerHTML"), Some(Value::Str("<circle/>".to_owned())));
	assert_eq!(g.attribute("innerHTML"), None);
}

#[test]
fn namespaced_callable_event_properties() {
	let mut reconciler = reconciler();
	let rect = MockNode::new("rect").with_property("onclick", Value::Null);
	let handler = mock_host_::handler(|_| Ok(()));

	let next = Value::Handlers(EventValue::Single(handler));
	reconciler.patch_prop(&rect, "onclick", &Value::Null, &next, true, PatchExtra::default());
	assert_eq!(rect.property("onclick"), Some(next));
	assert!(rect.listeners().is_empty());

	reconciler.patch_prop(&rect, "onclick", &Value::Null, &"alert(1)".into(), true, PatchExtra::default());
	assert_eq!(rect.attribute("onclick").as_deref(), Some("alert(1)"));
}

#[test]
fn bindingless_inputs_stay_tracked_until_forgotten() {
	let mut reconciler = reconciler();
	let inputs: Vec<_> = (0..3).map(|_| MockNode::new("INPUT").with_property("value", "")).collect();

	for (i, input) in inputs.iter().enumerate() {
		patch(&mut reconciler, input, "value", Value::Null, i.to_string());
	}
	assert!(inputs.iter().all(|input| input.listeners().is_empty()));
	assert_eq!(reconciler.tracked_node_count(), 3);

	for input in &inputs {
		reconciler.forget(input);
		assert_eq!(reconciler.shadow_value(input), None);
	}
	assert_eq!(reconciler.tracked_node_count(), 0);
}
