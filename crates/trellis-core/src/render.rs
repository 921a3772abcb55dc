use std::rc::Rc;

use trellis_dom::{Document, NodeId};
use web_time::Instant;

use crate::descriptor::{Descriptor, PropValue};
use crate::error::RenderError;
use crate::events::{event_name_from_key, EventBindings};
use crate::state::{StateSetter, StateStore};

/// The reconciler: walks a description tree alongside the live document,
/// creating, updating, or replacing nodes so the document matches.
///
/// `Renderer` is a cheaply cloneable handle over the document and its two
/// side tables (event binding guards and component state). Rendering is a
/// one-shot synchronous pass; the first error aborts it and leaves the
/// document in whatever partially updated shape the pass reached.
#[derive(Clone)]
pub struct Renderer {
    doc: Document,
    bindings: EventBindings,
    states: StateStore,
}

impl Renderer {
    pub fn new(doc: &Document) -> Self {
        Renderer {
            doc: doc.clone(),
            bindings: EventBindings::new(),
            states: StateStore::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Renders `desc` at the tree position held by `existing` (or an empty
    /// position when `None`) under `parent`, and returns the live node now
    /// occupying that position.
    pub fn render_to_dom(
        &self,
        desc: &Descriptor,
        existing: Option<NodeId>,
        parent: NodeId,
    ) -> Result<NodeId, RenderError> {
        let started = Instant::now();
        let node = self.reconcile(desc, existing, parent)?;
        log::trace!("render pass finished in {:?}", started.elapsed());
        Ok(node)
    }

    fn reconcile(
        &self,
        desc: &Descriptor,
        existing: Option<NodeId>,
        parent: NodeId,
    ) -> Result<NodeId, RenderError> {
        match desc {
            // Text updates in place — the one diff optimization.
            Descriptor::Text(content) => match existing {
                Some(node) => {
                    self.doc.set_text_content(node, content)?;
                    Ok(node)
                }
                None => {
                    let node = self.doc.create_text(content);
                    self.doc.append_child(parent, node)?;
                    Ok(node)
                }
            },

            // Components are transparent: resolve, recurse at the same
            // position, then point the setter at whatever materialized.
            Descriptor::Component { func, props, children } => {
                let slot = self.states.slot(existing);
                let setter = StateSetter::new(self.states.clone());
                if let Some(node) = existing {
                    setter.record_target(node);
                }
                let resolved = func(props, children, &slot, &setter);
                let node = self.reconcile(&resolved, existing, parent)?;
                let rerender = {
                    let renderer = self.clone();
                    let desc = desc.clone();
                    Rc::new(move |node| {
                        if let Err(err) = renderer.render_to_dom(&desc, Some(node), parent) {
                            log::error!("set_state re-render failed: {err}");
                        }
                    })
                };
                setter.install(node, rerender);
                Ok(node)
            }

            Descriptor::Element { tag, props, children } => {
                // Reuse in place when a node exists; tag changes at the same
                // position are not detected.
                let node = match existing {
                    Some(node) => node,
                    None => {
                        let node = self.doc.create_element(tag);
                        self.doc.append_child(parent, node)?;
                        node
                    }
                };

                // Handlers rebind by event name (previous detach runs
                // first); everything else is written as an attribute. Props
                // dropped since the last render are not cleared.
                for (key, value) in props.iter() {
                    match value {
                        PropValue::Handler(handler) => {
                            let event = event_name_from_key(key)?;
                            self.bindings.rebind(&self.doc, node, &event, handler.clone())?;
                        }
                        plain => {
                            if let Some(coerced) = plain.coerce() {
                                self.doc.set_attribute(node, key, &coerced)?;
                            }
                        }
                    }
                }

                // Positional child walk. The live child is looked up fresh
                // on every step since earlier recursion may have appended.
                for (index, child) in children.iter().enumerate() {
                    let live = self.doc.child_at(node, index)?;
                    self.reconcile(child, live, node)?;
                }
                let live_count = self.doc.child_count(node)?;
                if live_count > children.len() {
                    log::warn!(
                        "{} trailing live child(ren) of {node:?} not pruned after shrink",
                        live_count - children.len()
                    );
                }
                Ok(node)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use trellis_dom::Event;

    use crate::descriptor::{component, el, Props};
    use crate::state::{StateSlot, StateSetter};

    use super::*;

    fn fixture() -> (Document, Renderer, NodeId) {
        let doc = Document::new();
        let renderer = Renderer::new(&doc);
        let body = doc.create_element("body");
        (doc, renderer, body)
    }

    #[test]
    fn primitive_creates_one_text_node() {
        let (doc, renderer, body) = fixture();
        let node = renderer
            .render_to_dom(&Descriptor::from(5.0), None, body)
            .unwrap();

        assert_eq!(doc.child_count(body).unwrap(), 1);
        assert_eq!(doc.child_at(body, 0).unwrap(), Some(node));
        assert_eq!(doc.text_content(node).unwrap(), "5");
    }

    #[test]
    fn primitive_updates_text_in_place() {
        let (doc, renderer, body) = fixture();
        let first = renderer
            .render_to_dom(&"hello".into(), None, body)
            .unwrap();
        let second = renderer
            .render_to_dom(&"world".into(), Some(first), body)
            .unwrap();

        assert_eq!(second, first); // same node, not a replacement
        assert_eq!(doc.child_count(body).unwrap(), 1);
        assert_eq!(doc.text_content(first).unwrap(), "world");
    }

    #[test]
    fn element_created_then_reused() {
        let (doc, renderer, body) = fixture();
        let desc = el("div", Props::new().attr("id", "root"), ["x".into()]);

        let first = renderer.render_to_dom(&desc, None, body).unwrap();
        let second = renderer.render_to_dom(&desc, Some(first), body).unwrap();

        assert_eq!(second, first);
        assert_eq!(doc.tag(first).unwrap(), "div");
        assert_eq!(doc.attribute(first, "id").unwrap().as_deref(), Some("root"));
    }

    #[test]
    fn idempotent_rerender_creates_no_nodes() {
        let (doc, renderer, body) = fixture();
        let desc = el(
            "div",
            Props::default(),
            [
                el("span", Props::default(), ["a".into()]),
                "b".into(),
                el("p", Props::default(), []),
            ],
        );

        let root = renderer.render_to_dom(&desc, None, body).unwrap();
        let before = doc.node_count();
        let children_before = doc.children(root).unwrap();

        renderer.render_to_dom(&desc, Some(root), body).unwrap();

        assert_eq!(doc.node_count(), before);
        assert_eq!(doc.children(root).unwrap(), children_before);
    }

    #[test]
    fn rebinding_same_event_keeps_one_listener() {
        let (doc, renderer, body) = fixture();
        let hits = Rc::new(RefCell::new(0));
        let desc = |hits: Rc<RefCell<i32>>| {
            el(
                "button",
                Props::new().on("click", move |_| *hits.borrow_mut() += 1),
                [],
            )
        };

        let node = renderer
            .render_to_dom(&desc(hits.clone()), None, body)
            .unwrap();
        renderer
            .render_to_dom(&desc(hits.clone()), Some(node), body)
            .unwrap();

        doc.dispatch(node, &Event::new("click")).unwrap();
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn stale_attributes_persist() {
        let (doc, renderer, body) = fixture();
        let node = renderer
            .render_to_dom(&el("div", Props::new().attr("class", "old"), []), None, body)
            .unwrap();
        renderer
            .render_to_dom(&el("div", Props::new().attr("id", "x"), []), Some(node), body)
            .unwrap();

        // dropped props are not cleared
        assert_eq!(doc.attribute(node, "class").unwrap().as_deref(), Some("old"));
        assert_eq!(doc.attribute(node, "id").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn on_named_plain_value_stays_an_attribute() {
        let (doc, renderer, body) = fixture();
        let node = renderer
            .render_to_dom(&el("script", Props::new().attr("once", true), []), None, body)
            .unwrap();

        assert_eq!(doc.attribute(node, "once").unwrap().as_deref(), Some("true"));
        assert_eq!(doc.listener_count(node, "ce").unwrap(), 0);
    }

    #[test]
    fn handler_under_bad_key_is_an_error() {
        let (_doc, renderer, body) = fixture();
        let desc = el("div", Props::new().handler("click", |_| {}), []);
        assert!(matches!(
            renderer.render_to_dom(&desc, None, body),
            Err(RenderError::MalformedEventProp { key }) if key == "click"
        ));
    }

    #[test]
    fn children_match_positionally_after_shrink() {
        let (doc, renderer, body) = fixture();
        let item = |t: &str| el("li", Props::default(), [t.into()]);

        let list = renderer
            .render_to_dom(
                &el("ul", Props::default(), [item("A"), item("B"), item("C")]),
                None,
                body,
            )
            .unwrap();
        let before = doc.children(list).unwrap();

        renderer
            .render_to_dom(
                &el("ul", Props::default(), [item("A"), item("C")]),
                Some(list),
                body,
            )
            .unwrap();
        let after = doc.children(list).unwrap();

        // index-1 node (formerly B) now carries C's content; the trailing
        // node is left untouched, not removed
        assert_eq!(after, before);
        assert_eq!(doc.text_content(after[0]).unwrap(), "A");
        assert_eq!(doc.text_content(after[1]).unwrap(), "C");
        assert_eq!(doc.text_content(after[2]).unwrap(), "C");
    }

    #[test]
    fn text_over_element_position_replaces_children() {
        let (doc, renderer, body) = fixture();
        let node = renderer
            .render_to_dom(
                &el("div", Props::default(), [el("span", Props::default(), [])]),
                None,
                body,
            )
            .unwrap();

        renderer.render_to_dom(&"flat".into(), Some(node), body).unwrap();
        assert_eq!(doc.child_count(node).unwrap(), 1);
        assert_eq!(doc.text_content(node).unwrap(), "flat");
    }

    #[test]
    fn component_is_transparent() {
        let (doc, renderer, body) = fixture();
        let outer = component(
            |_: &Props, _: &[Descriptor], _: &StateSlot, _: &StateSetter| {
                component(
                    |_: &Props, _: &[Descriptor], _: &StateSlot, _: &StateSetter| {
                        el("p", Props::default(), ["deep".into()])
                    },
                    Props::default(),
                    [],
                )
            },
            Props::default(),
            [],
        );

        let node = renderer.render_to_dom(&outer, None, body).unwrap();
        // neither component layer produced a node of its own
        assert_eq!(doc.child_count(body).unwrap(), 1);
        assert_eq!(doc.tag(node).unwrap(), "p");
        assert_eq!(doc.text_content(node).unwrap(), "deep");
    }

    #[test]
    fn component_receives_props_and_children() {
        let (doc, renderer, body) = fixture();
        let desc = component(
            |props: &Props, children: &[Descriptor], _: &StateSlot, _: &StateSetter| {
                let title = match props.get("title") {
                    Some(PropValue::Str(s)) => s.clone(),
                    _ => String::new(),
                };
                el(
                    "section",
                    Props::default(),
                    std::iter::once(Descriptor::from(title)).chain(children.iter().cloned()),
                )
            },
            Props::new().attr("title", "T"),
            [el("p", Props::default(), [])],
        );

        let node = renderer.render_to_dom(&desc, None, body).unwrap();
        assert_eq!(doc.tag(node).unwrap(), "section");
        assert_eq!(doc.child_count(node).unwrap(), 2);
        assert_eq!(doc.text_content(doc.child_at(node, 0).unwrap().unwrap()).unwrap(), "T");
    }

    #[test]
    fn set_state_rerenders_in_place() {
        let (doc, renderer, body) = fixture();
        let counter = |_: &Props, _: &[Descriptor], state: &StateSlot, set: &StateSetter| {
            let count = state.get_or(0i64);
            let set = set.clone();
            el(
                "button",
                Props::new().on("click", move |_| set.set(count + 1)),
                [count.into()],
            )
        };

        let node = renderer
            .render_to_dom(&component(counter, Props::default(), []), None, body)
            .unwrap();
        assert_eq!(doc.text_content(node).unwrap(), "0");

        doc.dispatch(node, &Event::new("click")).unwrap();
        doc.dispatch(node, &Event::new("click")).unwrap();

        assert_eq!(doc.text_content(node).unwrap(), "2");
        assert_eq!(doc.child_count(body).unwrap(), 1); // same position reused
    }
}
