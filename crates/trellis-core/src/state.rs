use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use slotmap::SecondaryMap;
use trellis_dom::NodeId;

/// Side table of component state, keyed by the live node a component's
/// subtree materialized into. State lives exactly as long as the node
/// occupies that position and is overwritten wholesale on every set — the
/// engine never merges; components spread their own previous state.
#[derive(Clone, Default)]
pub struct StateStore {
    inner: Rc<RefCell<SecondaryMap<NodeId, Rc<dyn Any>>>>,
}

impl StateStore {
    pub fn new() -> Self {
        StateStore::default()
    }

    pub(crate) fn get(&self, node: NodeId) -> Option<Rc<dyn Any>> {
        self.inner.borrow().get(node).cloned()
    }

    pub(crate) fn set(&self, node: NodeId, value: Rc<dyn Any>) {
        self.inner.borrow_mut().insert(node, value);
    }

    /// Snapshot of the state at `node` (empty when `node` is `None` or has
    /// no stored state yet).
    pub(crate) fn slot(&self, node: Option<NodeId>) -> StateSlot {
        StateSlot {
            value: node.and_then(|n| self.get(n)),
        }
    }
}

/// A read-only snapshot of one component's local state, taken when the
/// component function is invoked.
#[derive(Clone, Default)]
pub struct StateSlot {
    value: Option<Rc<dyn Any>>,
}

impl StateSlot {
    /// The stored state, or `None` on the first render (or after a type
    /// change).
    pub fn get<T: Clone + 'static>(&self) -> Option<T> {
        self.value.as_ref()?.downcast_ref::<T>().cloned()
    }

    /// The stored state, or `default` when absent.
    pub fn get_or<T: Clone + 'static>(&self, default: T) -> T {
        self.get().unwrap_or(default)
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

type Rerender = Rc<dyn Fn(NodeId)>;

/// Writes a component's state slot and synchronously re-renders its subtree
/// at the same tree position.
///
/// The setter's target node is recorded once the component's subtree first
/// materializes; a `set` issued before that (a component calling its own
/// setter during its own first render) has no position to write to and is
/// dropped with a warning. Handlers attached by a render always run after
/// materialization, so the re-entrancy the renders rely on is unaffected.
#[derive(Clone)]
pub struct StateSetter {
    inner: Rc<SetterInner>,
}

struct SetterInner {
    states: StateStore,
    target: Cell<Option<NodeId>>,
    rerender: RefCell<Option<Rerender>>,
}

impl StateSetter {
    pub(crate) fn new(states: StateStore) -> Self {
        StateSetter {
            inner: Rc::new(SetterInner {
                states,
                target: Cell::new(None),
                rerender: RefCell::new(None),
            }),
        }
    }

    /// Points the setter at an already-known live node before the component
    /// runs, so a `set` from inside the component body lands on an update
    /// pass.
    pub(crate) fn record_target(&self, node: NodeId) {
        self.inner.target.set(Some(node));
    }

    pub(crate) fn install(&self, node: NodeId, rerender: Rerender) {
        self.inner.target.set(Some(node));
        *self.inner.rerender.borrow_mut() = Some(rerender);
    }

    /// Overwrites the state slot in full (no merging) and immediately
    /// re-renders the owning component at its tree position. Runs to
    /// completion before returning.
    pub fn set<T: 'static>(&self, value: T) {
        let Some(node) = self.inner.target.get() else {
            log::warn!("set_state before the component materialized; value dropped");
            return;
        };
        self.inner.states.set(node, Rc::new(value));
        // Clone the closure out so no borrow is held across the nested
        // render pass (which may itself call set).
        let rerender = self.inner.rerender.borrow().clone();
        if let Some(rerender) = rerender {
            rerender(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_reads_typed_state() {
        let store = StateStore::new();
        let doc = trellis_dom::Document::new();
        let node = doc.create_element("div");

        assert!(store.slot(Some(node)).is_empty());
        assert_eq!(store.slot(Some(node)).get_or(9i32), 9);

        store.set(node, Rc::new(4i32));
        let slot = store.slot(Some(node));
        assert_eq!(slot.get::<i32>(), Some(4));
        assert_eq!(slot.get::<String>(), None); // wrong type reads as absent
        assert!(store.slot(None).is_empty());
    }

    #[test]
    fn set_overwrites_wholesale() {
        let store = StateStore::new();
        let doc = trellis_dom::Document::new();
        let node = doc.create_element("div");

        store.set(node, Rc::new((1i32, 2i32)));
        store.set(node, Rc::new((7i32, 2i32)));
        assert_eq!(store.slot(Some(node)).get::<(i32, i32)>(), Some((7, 2)));
    }

    #[test]
    fn set_before_materialization_is_dropped() {
        let setter = StateSetter::new(StateStore::new());
        setter.set(5i32); // no target yet; must not panic
    }

    #[test]
    fn set_writes_then_rerenders() {
        let store = StateStore::new();
        let doc = trellis_dom::Document::new();
        let node = doc.create_element("div");

        let setter = StateSetter::new(store.clone());
        let seen = Rc::new(Cell::new(None));
        {
            let store = store.clone();
            let seen = seen.clone();
            setter.install(
                node,
                Rc::new(move |n| seen.set(store.slot(Some(n)).get::<i32>())),
            );
        }

        setter.set(3i32);
        // the rerender closure observed the already-written value
        assert_eq!(seen.get(), Some(3));
    }
}
