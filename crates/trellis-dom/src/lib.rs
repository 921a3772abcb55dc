//! Trellis's live tree: a headless, in-memory document.
//!
//! The reconciler in `trellis-core` drives this document the way a browser
//! renderer drives the real DOM. Nodes live in a slotmap arena and are
//! addressed by [`NodeId`]; [`Document`] is a cheaply cloneable handle over
//! that arena.
//!
//! ```rust
//! use trellis_dom::{Document, Event};
//! use std::rc::Rc;
//!
//! let doc = Document::new();
//! let button = doc.create_element("button");
//! let detach = doc
//!     .add_listener(button, "click", Rc::new(|_| println!("clicked")))
//!     .unwrap();
//! doc.dispatch(button, &Event::new("click")).unwrap();
//! detach.run();
//! ```
//!
//! Everything is single-threaded and synchronous: `dispatch` runs every
//! handler to completion before returning, and handlers are free to call
//! back into the document.

mod document;
mod error;
mod event;
mod node;
mod serialize;

pub use document::Document;
pub use error::DomError;
pub use event::{Detach, Event, Handler};
pub use node::NodeId;
