use std::collections::HashMap;
use std::rc::Rc;

use trellis_dom::{Event, Handler};

use crate::state::{StateSetter, StateSlot};

/// A component: a function from props, children, and local state to a new
/// descriptor. Resolution is transparent — the reconciler keeps invoking
/// component functions until one returns an element or text descriptor.
pub type ComponentFn = Rc<dyn Fn(&Props, &[Descriptor], &StateSlot, &StateSetter) -> Descriptor>;

/// One node of an immutable description tree.
///
/// A fresh tree is built on every render pass; the reconciler diffs it
/// against the live document. Cloning is cheap — handlers and component
/// functions are behind `Rc`.
#[derive(Clone)]
pub enum Descriptor {
    Element {
        tag: String,
        props: Props,
        children: Vec<Descriptor>,
    },
    Component {
        func: ComponentFn,
        props: Props,
        children: Vec<Descriptor>,
    },
    Text(String),
}

impl Descriptor {
    pub fn element(
        tag: impl Into<String>,
        props: Props,
        children: impl IntoIterator<Item = Descriptor>,
    ) -> Self {
        Descriptor::Element {
            tag: tag.into(),
            props,
            children: children.into_iter().collect(),
        }
    }

    pub fn component(
        func: impl Fn(&Props, &[Descriptor], &StateSlot, &StateSetter) -> Descriptor + 'static,
        props: Props,
        children: impl IntoIterator<Item = Descriptor>,
    ) -> Self {
        Descriptor::Component {
            func: Rc::new(func),
            props,
            children: children.into_iter().collect(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Descriptor::Text(content.into())
    }
}

/// Descriptor factory, the `$(tag, props, ...children)` convention.
pub fn el(
    tag: impl Into<String>,
    props: Props,
    children: impl IntoIterator<Item = Descriptor>,
) -> Descriptor {
    Descriptor::element(tag, props, children)
}

/// Component reference factory, the function-tag arm of the convention.
pub fn component(
    func: impl Fn(&Props, &[Descriptor], &StateSlot, &StateSetter) -> Descriptor + 'static,
    props: Props,
    children: impl IntoIterator<Item = Descriptor>,
) -> Descriptor {
    Descriptor::component(func, props, children)
}

impl std::fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Descriptor::Element { tag, props, children } => f
                .debug_struct("Element")
                .field("tag", tag)
                .field("props", props)
                .field("children", children)
                .finish(),
            Descriptor::Component { props, children, .. } => f
                .debug_struct("Component")
                .field("props", props)
                .field("children", children)
                .finish(),
            Descriptor::Text(content) => f.debug_tuple("Text").field(content).finish(),
        }
    }
}

impl From<&str> for Descriptor {
    fn from(value: &str) -> Self {
        Descriptor::Text(value.to_owned())
    }
}

impl From<String> for Descriptor {
    fn from(value: String) -> Self {
        Descriptor::Text(value)
    }
}

impl From<i64> for Descriptor {
    fn from(value: i64) -> Self {
        Descriptor::Text(value.to_string())
    }
}

impl From<f64> for Descriptor {
    fn from(value: f64) -> Self {
        Descriptor::Text(format_number(value))
    }
}

/// A property value. Whether a prop is an event binding or an attribute is
/// decided by the variant, not by the key; the `on<Name>` key convention
/// only derives the event name for [`PropValue::Handler`] entries.
#[derive(Clone)]
pub enum PropValue {
    Str(String),
    Num(f64),
    Bool(bool),
    Handler(Handler),
}

impl PropValue {
    /// String coercion for attribute writes. Handlers never coerce; the
    /// reconciler routes them to the event binding manager instead.
    pub fn coerce(&self) -> Option<String> {
        match self {
            PropValue::Str(s) => Some(s.clone()),
            PropValue::Num(n) => Some(format_number(*n)),
            PropValue::Bool(b) => Some(b.to_string()),
            PropValue::Handler(_) => None,
        }
    }
}

impl std::fmt::Debug for PropValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropValue::Str(s) => f.debug_tuple("Str").field(s).finish(),
            PropValue::Num(n) => f.debug_tuple("Num").field(n).finish(),
            PropValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            PropValue::Handler(_) => write!(f, "Handler(..)"),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Str(value.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Str(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Num(value as f64)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Num(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

/// Whole numbers render without a trailing `.0`, matching `String(5)`.
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// An immutable string-keyed property map, built once per descriptor.
#[derive(Clone, Debug, Default)]
pub struct Props {
    entries: HashMap<String, PropValue>,
}

impl Props {
    pub fn new() -> Self {
        Props::default()
    }

    /// Adds a plain attribute prop.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Adds an event handler prop under the `on<event>` key.
    pub fn on(mut self, event: &str, handler: impl Fn(&Event) + 'static) -> Self {
        self.entries
            .insert(format!("on{event}"), PropValue::Handler(Rc::new(handler)));
        self
    }

    /// Adds a handler under a caller-chosen key (`onClick`-style casing).
    pub fn handler(mut self, key: impl Into<String>, handler: impl Fn(&Event) + 'static) -> Self {
        self.entries
            .insert(key.into(), PropValue::Handler(Rc::new(handler)));
        self
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
