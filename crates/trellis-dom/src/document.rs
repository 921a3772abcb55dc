use std::cell::RefCell;
use std::rc::Rc;

use slotmap::SlotMap;

use crate::error::DomError;
use crate::event::{Detach, DetachTarget, Event, Handler, Listener};
use crate::node::{Node, NodeId, NodeKind};

/// A headless document: the live tree the reconciler mutates.
///
/// `Document` is a cheaply cloneable handle; every clone refers to the same
/// arena. All operations borrow the arena only for their own duration, so
/// event handlers invoked through [`Document::dispatch`] are free to call
/// back into the document (create nodes, set attributes, trigger another
/// dispatch).
#[derive(Clone)]
pub struct Document {
    inner: Rc<RefCell<DocInner>>,
}

pub(crate) struct DocInner {
    pub(crate) nodes: SlotMap<NodeId, Node>,
    next_listener: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Document {
            inner: Rc::new(RefCell::new(DocInner {
                nodes: SlotMap::with_key(),
                next_listener: 0,
            })),
        }
    }

    /// Creates a detached element node.
    pub fn create_element(&self, tag: &str) -> NodeId {
        let id = self.inner.borrow_mut().nodes.insert(Node::element(tag));
        log::trace!("create <{tag}> {id:?}");
        id
    }

    /// Creates a detached text node.
    pub fn create_text(&self, content: &str) -> NodeId {
        self.inner.borrow_mut().nodes.insert(Node::text(content))
    }

    /// True while `node` is part of this document's arena.
    pub fn contains(&self, node: NodeId) -> bool {
        self.inner.borrow().nodes.contains_key(node)
    }

    /// Number of live nodes, attached or not.
    pub fn node_count(&self) -> usize {
        self.inner.borrow().nodes.len()
    }

    /// Appends `child` as the last child of `parent`, detaching it from its
    /// previous parent first.
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        if !inner.nodes.contains_key(child) {
            return Err(DomError::NodeGone);
        }
        if inner.is_ancestor(child, parent) {
            return Err(DomError::WouldCycle);
        }
        if let Some(old) = inner.nodes.get(child).and_then(|n| n.parent)
            && let Some(NodeKind::Element { children, .. }) =
                inner.nodes.get_mut(old).map(|n| &mut n.kind)
        {
            children.retain(|c| *c != child);
        }
        match inner.nodes.get_mut(parent).map(|n| &mut n.kind) {
            Some(NodeKind::Element { children, .. }) => children.push(child),
            Some(NodeKind::Text(_)) => return Err(DomError::NotAnElement),
            None => return Err(DomError::NodeGone),
        }
        if let Some(n) = inner.nodes.get_mut(child) {
            n.parent = Some(parent);
        }
        Ok(())
    }

    pub fn parent(&self, node: NodeId) -> Result<Option<NodeId>, DomError> {
        let inner = self.inner.borrow();
        inner
            .nodes
            .get(node)
            .map(|n| n.parent)
            .ok_or(DomError::NodeGone)
    }

    /// The child at `index`, or `None` past the end of the child list.
    pub fn child_at(&self, parent: NodeId, index: usize) -> Result<Option<NodeId>, DomError> {
        let inner = self.inner.borrow();
        match &inner.nodes.get(parent).ok_or(DomError::NodeGone)?.kind {
            NodeKind::Element { children, .. } => Ok(children.get(index).copied()),
            NodeKind::Text(_) => Err(DomError::NotAnElement),
        }
    }

    pub fn child_count(&self, parent: NodeId) -> Result<usize, DomError> {
        let inner = self.inner.borrow();
        match &inner.nodes.get(parent).ok_or(DomError::NodeGone)?.kind {
            NodeKind::Element { children, .. } => Ok(children.len()),
            NodeKind::Text(_) => Err(DomError::NotAnElement),
        }
    }

    pub fn children(&self, parent: NodeId) -> Result<Vec<NodeId>, DomError> {
        let inner = self.inner.borrow();
        match &inner.nodes.get(parent).ok_or(DomError::NodeGone)?.kind {
            NodeKind::Element { children, .. } => Ok(children.to_vec()),
            NodeKind::Text(_) => Err(DomError::NotAnElement),
        }
    }

    pub fn is_text(&self, node: NodeId) -> Result<bool, DomError> {
        let inner = self.inner.borrow();
        let node = inner.nodes.get(node).ok_or(DomError::NodeGone)?;
        Ok(matches!(node.kind, NodeKind::Text(_)))
    }

    pub fn tag(&self, node: NodeId) -> Result<String, DomError> {
        let inner = self.inner.borrow();
        match &inner.nodes.get(node).ok_or(DomError::NodeGone)?.kind {
            NodeKind::Element { tag, .. } => Ok(tag.clone()),
            NodeKind::Text(_) => Err(DomError::NotAnElement),
        }
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        if !valid_attr_name(name) {
            return Err(DomError::InvalidName {
                name: name.to_owned(),
            });
        }
        let mut inner = self.inner.borrow_mut();
        match inner.nodes.get_mut(node).map(|n| &mut n.kind) {
            Some(NodeKind::Element { attrs, .. }) => {
                log::trace!("set {name}={value:?} on {node:?}");
                attrs.insert(name.to_owned(), value.to_owned());
                Ok(())
            }
            Some(NodeKind::Text(_)) => Err(DomError::NotAnElement),
            None => Err(DomError::NodeGone),
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Result<Option<String>, DomError> {
        let inner = self.inner.borrow();
        match &inner.nodes.get(node).ok_or(DomError::NodeGone)?.kind {
            NodeKind::Element { attrs, .. } => Ok(attrs.get(name).cloned()),
            NodeKind::Text(_) => Err(DomError::NotAnElement),
        }
    }

    /// Overwrites a node's text content.
    ///
    /// On a text node this replaces the content; on an element it replaces
    /// the whole child list with a single new text node (DOM `textContent`
    /// semantics). Replaced subtrees are deleted from the arena.
    pub fn set_text_content(&self, node: NodeId, content: &str) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        match inner.nodes.get_mut(node).map(|n| &mut n.kind) {
            Some(NodeKind::Text(existing)) => {
                *existing = content.to_owned();
                Ok(())
            }
            Some(NodeKind::Element { .. }) => {
                inner.remove_children(node);
                let mut text = Node::text(content);
                text.parent = Some(node);
                let text = inner.nodes.insert(text);
                if let Some(NodeKind::Element { children, .. }) =
                    inner.nodes.get_mut(node).map(|n| &mut n.kind)
                {
                    children.push(text);
                }
                Ok(())
            }
            None => Err(DomError::NodeGone),
        }
    }

    /// The node's text: the content of a text node, or the concatenated
    /// text of an element's subtree.
    pub fn text_content(&self, node: NodeId) -> Result<String, DomError> {
        let inner = self.inner.borrow();
        if !inner.nodes.contains_key(node) {
            return Err(DomError::NodeGone);
        }
        let mut out = String::new();
        inner.collect_text(node, &mut out);
        Ok(out)
    }

    /// Deletes all of `parent`'s children (and their subtrees) from the
    /// arena.
    pub fn clear_children(&self, parent: NodeId) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        match inner.nodes.get(parent).ok_or(DomError::NodeGone)?.kind {
            NodeKind::Element { .. } => {
                inner.remove_children(parent);
                Ok(())
            }
            NodeKind::Text(_) => Err(DomError::NotAnElement),
        }
    }

    /// Registers `handler` for `event` on an element node. Handlers for the
    /// same event run in registration order. The returned [`Detach`]
    /// unregisters the handler; running it more than once is a no-op.
    pub fn add_listener(
        &self,
        node: NodeId,
        event: &str,
        handler: Handler,
    ) -> Result<Detach, DomError> {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_listener;
        match inner.nodes.get_mut(node).map(|n| &mut n.kind) {
            Some(NodeKind::Element { listeners, .. }) => {
                listeners
                    .entry(event.to_owned())
                    .or_default()
                    .push(Listener { id, handler });
            }
            Some(NodeKind::Text(_)) => return Err(DomError::NotAnElement),
            None => return Err(DomError::NodeGone),
        }
        inner.next_listener += 1;
        log::trace!("listener #{id} for `{event}` on {node:?}");
        Ok(Detach::new(DetachTarget {
            doc: Rc::downgrade(&self.inner),
            node,
            event: event.to_owned(),
            listener: id,
        }))
    }

    /// Number of handlers currently registered for `event` on `node`.
    pub fn listener_count(&self, node: NodeId, event: &str) -> Result<usize, DomError> {
        let inner = self.inner.borrow();
        match &inner.nodes.get(node).ok_or(DomError::NodeGone)?.kind {
            NodeKind::Element { listeners, .. } => {
                Ok(listeners.get(event).map(Vec::len).unwrap_or(0))
            }
            NodeKind::Text(_) => Err(DomError::NotAnElement),
        }
    }

    /// Synchronously invokes every handler registered for `event.name()` on
    /// `node`, in registration order, and returns how many ran.
    ///
    /// Handlers are cloned out before the first invocation, so they may
    /// freely mutate the document — including detaching themselves.
    /// No bubbling, no capture, no default actions.
    pub fn dispatch(&self, node: NodeId, event: &Event) -> Result<usize, DomError> {
        let handlers: Vec<Handler> = {
            let inner = self.inner.borrow();
            match &inner.nodes.get(node).ok_or(DomError::NodeGone)?.kind {
                NodeKind::Element { listeners, .. } => listeners
                    .get(event.name())
                    .map(|ls| ls.iter().map(|l| l.handler.clone()).collect())
                    .unwrap_or_default(),
                NodeKind::Text(_) => return Err(DomError::NotAnElement),
            }
        };
        log::trace!(
            "dispatch `{}` on {node:?} to {} handler(s)",
            event.name(),
            handlers.len()
        );
        for handler in &handlers {
            handler(event);
        }
        Ok(handlers.len())
    }

    pub(crate) fn inner(&self) -> &Rc<RefCell<DocInner>> {
        &self.inner
    }
}

impl DocInner {
    /// Walks up from `node`; true if `maybe_ancestor` is on the path
    /// (including `node` itself).
    fn is_ancestor(&self, maybe_ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == maybe_ancestor {
                return true;
            }
            match self.nodes.get(node).and_then(|n| n.parent) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    fn remove_children(&mut self, parent: NodeId) {
        let mut stack: Vec<NodeId> =
            match self.nodes.get_mut(parent).map(|n| &mut n.kind) {
                Some(NodeKind::Element { children, .. }) => std::mem::take(children).into_vec(),
                _ => return,
            };
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.remove(id)
                && let NodeKind::Element { children, .. } = node.kind
            {
                stack.extend(children);
            }
        }
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match self.nodes.get(node).map(|n| &n.kind) {
            Some(NodeKind::Text(content)) => out.push_str(content),
            Some(NodeKind::Element { children, .. }) => {
                for child in children.clone() {
                    self.collect_text(child, out);
                }
            }
            None => {}
        }
    }

    pub(crate) fn remove_listener(&mut self, node: NodeId, event: &str, listener: u64) {
        if let Some(NodeKind::Element { listeners, .. }) =
            self.nodes.get_mut(node).map(|n| &mut n.kind)
            && let Some(handlers) = listeners.get_mut(event)
        {
            handlers.retain(|l| l.id != listener);
            if handlers.is_empty() {
                listeners.remove(event);
            }
        }
    }
}

fn valid_attr_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>' | '=' | '/'))
}
