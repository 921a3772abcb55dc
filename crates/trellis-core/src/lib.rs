//! # Descriptors, components, and the reconciler
//!
//! Trellis renders an immutable description tree into the live document
//! from `trellis-dom`, mutating only what changed. Three pieces:
//!
//! - [`Descriptor`] / [`el`] — the description tree.
//! - [`Renderer::render_to_dom`] — the reconciler.
//! - [`mount`] — the entry point wiring a renderer to a container.
//!
//! ## Descriptors
//!
//! `el(tag, props, children)` builds an element descriptor; strings and
//! numbers are primitive children:
//!
//! ```rust
//! use trellis_core::{el, Props};
//!
//! let tree = el(
//!     "div",
//!     Props::new().attr("id", "app"),
//!     [el("h1", Props::default(), ["hello".into()])],
//! );
//! ```
//!
//! ## Components
//!
//! A component is a function `(props, children, state, set_state) ->
//! Descriptor`. It is transparent: the reconciler resolves it (repeatedly,
//! if it returns another component) and renders the result at the same
//! position. `set_state` overwrites the component's state slot wholesale
//! and synchronously re-renders that position:
//!
//! ```rust
//! use trellis_core::{component, el, Descriptor, Props, StateSetter, StateSlot};
//!
//! fn counter(_: &Props, _: &[Descriptor], state: &StateSlot, set: &StateSetter) -> Descriptor {
//!     let count = state.get_or(0i64);
//!     let set = set.clone();
//!     el(
//!         "button",
//!         Props::new().on("click", move |_| set.set(count + 1)),
//!         [count.into()],
//!     )
//! }
//! # let _ = component(counter, Props::default(), []);
//! ```
//!
//! ## Reconciliation rules
//!
//! Children match live nodes positionally by index — never by key or
//! identity. Text nodes update in place; elements are reused in place;
//! props dropped since the previous render are not cleared; trailing live
//! children survive a shrinking child list. Every pass is synchronous and
//! runs to completion, including passes triggered from inside event
//! handlers via `set_state`.

mod descriptor;
mod error;
mod events;
mod mount;
mod render;
mod state;

pub use descriptor::{component, el, ComponentFn, Descriptor, PropValue, Props};
pub use error::RenderError;
pub use events::{event_name_from_key, EventBindings};
pub use mount::{mount, Mount};
pub use render::Renderer;
pub use state::{StateSetter, StateSlot, StateStore};
