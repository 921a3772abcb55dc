use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use slotmap::SecondaryMap;
use trellis_dom::{Detach, Document, Handler, NodeId};

use crate::error::RenderError;

/// Derives the event name from a handler prop key: an `on` prefix
/// (case-insensitive) followed by the event name, lower-cased. `onClick`
/// binds `click`; a bare `on` or a key without the prefix is malformed.
pub fn event_name_from_key(key: &str) -> Result<String, RenderError> {
    let rest = key
        .get(..2)
        .filter(|prefix| prefix.eq_ignore_ascii_case("on"))
        .map(|_| &key[2..])
        .unwrap_or("");
    if rest.is_empty() {
        return Err(RenderError::MalformedEventProp {
            key: key.to_owned(),
        });
    }
    Ok(rest.to_ascii_lowercase())
}

/// Per-node, per-event-name listener bookkeeping for the reconciler.
///
/// The document itself allows any number of listeners per event; this layer
/// enforces the renderer's discipline of at most one — every rebind first
/// runs the detach guard stored by the previous render for the same node
/// and event name, however many renders have happened in between.
#[derive(Clone, Default)]
pub struct EventBindings {
    bound: Rc<RefCell<SecondaryMap<NodeId, HashMap<String, Detach>>>>,
}

impl EventBindings {
    pub fn new() -> Self {
        EventBindings::default()
    }

    pub fn rebind(
        &self,
        doc: &Document,
        node: NodeId,
        event: &str,
        handler: Handler,
    ) -> Result<(), RenderError> {
        let stale = self
            .bound
            .borrow_mut()
            .get_mut(node)
            .and_then(|events| events.remove(event));
        if let Some(stale) = stale {
            log::trace!("detach stale `{event}` listener on {node:?}");
            stale.run();
        }
        let detach = doc.add_listener(node, event, handler)?;
        // add_listener succeeding means the node is live, so the entry exists
        if let Some(entry) = self.bound.borrow_mut().entry(node) {
            entry.or_default().insert(event.to_owned(), detach);
        }
        Ok(())
    }
}
