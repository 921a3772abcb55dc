//! HTML serialization of a live subtree, for demos and test assertions.

use crate::document::Document;
use crate::error::DomError;
use crate::node::{NodeId, NodeKind};

impl Document {
    /// Renders the subtree rooted at `node` as HTML.
    ///
    /// Attributes are emitted in sorted key order so the output is stable.
    /// Event listeners have no markup representation and are skipped.
    pub fn to_html(&self, node: NodeId) -> Result<String, DomError> {
        let inner = self.inner().borrow();
        if !inner.nodes.contains_key(node) {
            return Err(DomError::NodeGone);
        }
        let mut out = String::new();
        write_node(&inner, node, &mut out);
        Ok(out)
    }
}

fn write_node(inner: &crate::document::DocInner, node: NodeId, out: &mut String) {
    match inner.nodes.get(node).map(|n| &n.kind) {
        Some(NodeKind::Text(content)) => out.push_str(&escape_text(content)),
        Some(NodeKind::Element { tag, attrs, children, .. }) => {
            out.push('<');
            out.push_str(tag);
            let mut keys: Vec<&String> = attrs.keys().collect();
            keys.sort();
            for key in keys {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(&escape_attr(&attrs[key]));
                out.push('"');
            }
            out.push('>');
            for child in children.clone() {
                write_node(inner, child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        None => {}
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_nested_tree() {
        let doc = Document::new();
        let article = doc.create_element("article");
        let h3 = doc.create_element("h3");
        doc.append_child(article, h3).unwrap();
        doc.append_child(h3, doc.create_text("Title")).unwrap();
        let p = doc.create_element("p");
        doc.set_attribute(p, "class", "blurb").unwrap();
        doc.append_child(article, p).unwrap();

        assert_eq!(
            doc.to_html(article).unwrap(),
            "<article><h3>Title</h3><p class=\"blurb\"></p></article>"
        );
    }

    #[test]
    fn attributes_sorted_by_key() {
        let doc = Document::new();
        let input = doc.create_element("input");
        doc.set_attribute(input, "value", "0").unwrap();
        doc.set_attribute(input, "type", "number").unwrap();
        assert_eq!(
            doc.to_html(input).unwrap(),
            "<input type=\"number\" value=\"0\"></input>"
        );
    }

    #[test]
    fn escapes_text_and_attributes() {
        let doc = Document::new();
        let div = doc.create_element("div");
        doc.set_attribute(div, "title", "a \"b\" <c>").unwrap();
        doc.append_child(div, doc.create_text("1 < 2 & 3 > 2")).unwrap();
        assert_eq!(
            doc.to_html(div).unwrap(),
            "<div title=\"a &quot;b&quot; &lt;c&gt;\">1 &lt; 2 &amp; 3 &gt; 2</div>"
        );
    }
}
