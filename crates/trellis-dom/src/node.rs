use std::collections::HashMap;

use slotmap::new_key_type;
use smallvec::SmallVec;

use crate::event::Listener;

new_key_type! {
    /// Stable identity of a node inside a [`Document`](crate::Document) arena.
    ///
    /// Ids stay valid for the lifetime of the node; a removed node's id is
    /// never handed out again for a different node.
    pub struct NodeId;
}

pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
}

pub(crate) enum NodeKind {
    Element {
        tag: String,
        attrs: HashMap<String, String>,
        children: SmallVec<[NodeId; 4]>,
        listeners: HashMap<String, Vec<Listener>>,
    },
    Text(String),
}

impl Node {
    pub(crate) fn element(tag: &str) -> Self {
        Node {
            kind: NodeKind::Element {
                tag: tag.to_owned(),
                attrs: HashMap::new(),
                children: SmallVec::new(),
                listeners: HashMap::new(),
            },
            parent: None,
        }
    }

    pub(crate) fn text(content: &str) -> Self {
        Node {
            kind: NodeKind::Text(content.to_owned()),
            parent: None,
        }
    }
}
