use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::document::DocInner;
use crate::node::NodeId;

/// A dispatched occurrence on a node: a name plus an optional string payload
/// (input-change style events carry the new value).
#[derive(Clone, Debug)]
pub struct Event {
    name: String,
    value: Option<String>,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Event {
            name: name.into(),
            value: None,
        }
    }

    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Event {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

pub type Handler = Rc<dyn Fn(&Event)>;

pub(crate) struct Listener {
    pub(crate) id: u64,
    pub(crate) handler: Handler,
}

/// Unbinds one listener when run. Runs at most once (safe to call multiple
/// times), and degrades to a no-op if the document is already gone.
#[derive(Clone)]
pub struct Detach(Rc<RefCell<Option<DetachTarget>>>);

pub(crate) struct DetachTarget {
    pub(crate) doc: Weak<RefCell<DocInner>>,
    pub(crate) node: NodeId,
    pub(crate) event: String,
    pub(crate) listener: u64,
}

impl Detach {
    pub(crate) fn new(target: DetachTarget) -> Self {
        Detach(Rc::new(RefCell::new(Some(target))))
    }

    pub fn run(&self) {
        if let Some(target) = self.0.borrow_mut().take()
            && let Some(doc) = target.doc.upgrade()
        {
            doc.borrow_mut()
                .remove_listener(target.node, &target.event, target.listener);
        }
    }
}
