//! The non-reconciling baseline: a string template plus a renderer that
//! throws away the container's contents and inserts fresh markup on every
//! call. It exists purely as a comparison point for the reconciler and
//! exposes no contract the core depends on.

use trellis_dom::{Document, DomError, NodeId};

/// The product card as one interpolated markup string.
pub fn product_card_markup(name: &str, price: &str, description: &str) -> String {
    format!(
        "<article><h3>{name}</h3><div>{price}</div><p>{description}</p>\
         <button>Add To Cart</button></article>"
    )
}

/// Wipes `container` and inserts `markup` wholesale, as a single text node.
/// Nothing is diffed or reused; every call rebuilds from scratch.
pub fn replace_contents(doc: &Document, container: NodeId, markup: &str) -> Result<(), DomError> {
    log::trace!("baseline replace of {container:?} ({} bytes)", markup.len());
    doc.set_text_content(container, markup)
}
