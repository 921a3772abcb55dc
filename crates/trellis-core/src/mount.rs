use trellis_dom::{Document, NodeId};

use crate::descriptor::Descriptor;
use crate::error::RenderError;
use crate::render::Renderer;

/// A mounted descriptor tree: the renderer plus the position it renders at.
pub struct Mount {
    renderer: Renderer,
    descriptor: Descriptor,
    root: NodeId,
    parent: NodeId,
}

impl std::fmt::Debug for Mount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mount")
            .field("root", &self.root)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}

/// Performs the first render of `descriptor` into `container`'s position.
///
/// The container itself is the existing live node at the root position and
/// its parent is the parent context, so the descriptor's outermost element
/// renders *onto* the container rather than inside a fresh node. A container
/// with no parent cannot be mounted.
pub fn mount(
    doc: &Document,
    container: NodeId,
    descriptor: Descriptor,
) -> Result<Mount, RenderError> {
    let parent = doc.parent(container)?.ok_or(RenderError::DetachedContainer)?;
    let renderer = Renderer::new(doc);
    let root = renderer.render_to_dom(&descriptor, Some(container), parent)?;
    log::debug!("mounted onto {container:?}, {} node(s) live", doc.node_count());
    Ok(Mount {
        renderer,
        descriptor,
        root,
        parent,
    })
}

impl Mount {
    /// Re-runs the render pass against the live tree it produced.
    pub fn render(&self) -> Result<NodeId, RenderError> {
        self.renderer
            .render_to_dom(&self.descriptor, Some(self.root), self.parent)
    }

    /// The live node at the root position.
    pub fn node(&self) -> NodeId {
        self.root
    }

    pub fn document(&self) -> &Document {
        self.renderer.document()
    }
}

#[cfg(test)]
mod tests {
    use crate::descriptor::{el, Props};

    use super::*;

    #[test]
    fn mount_renders_onto_the_container() {
        let doc = Document::new();
        let body = doc.create_element("body");
        let container = doc.create_element("div");
        doc.append_child(body, container).unwrap();

        let mount = mount(
            &doc,
            container,
            el("div", Props::new().attr("id", "app"), ["hi".into()]),
        )
        .unwrap();

        assert_eq!(mount.node(), container);
        assert_eq!(doc.attribute(container, "id").unwrap().as_deref(), Some("app"));
        assert_eq!(doc.text_content(container).unwrap(), "hi");
    }

    #[test]
    fn detached_container_is_rejected() {
        let doc = Document::new();
        let orphan = doc.create_element("div");
        let err = mount(&doc, orphan, el("div", Props::default(), [])).unwrap_err();
        assert!(matches!(err, RenderError::DetachedContainer));
    }

    #[test]
    fn render_is_idempotent() {
        let doc = Document::new();
        let body = doc.create_element("body");
        let container = doc.create_element("div");
        doc.append_child(body, container).unwrap();

        let mount = mount(
            &doc,
            container,
            el("div", Props::default(), [el("p", Props::default(), ["x".into()])]),
        )
        .unwrap();
        let count = doc.node_count();

        mount.render().unwrap();
        assert_eq!(doc.node_count(), count);
    }
}
