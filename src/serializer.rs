//! Subtree-to-markup serialization with entity escaping.
//!
//! Output matches what a browser reports through `innerHTML`: text nodes
//! escape `&`, `<`, `>` and non-breaking spaces; attribute values escape
//! `&`, `"` and non-breaking spaces; void elements close themselves; the
//! children of raw-text elements are emitted unescaped. A Text node whose
//! payload happens to look like markup therefore round-trips as inert
//! text when the output is re-parsed.

use crate::error::Result;
use crate::tree::Document;
use crate::types::{NodeId, NodeKind};

/// Elements serialized without a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text children are emitted without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Markup serializer for document subtrees.
pub struct HtmlSerializer;

impl HtmlSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Serialize a subtree to markup text.
    ///
    /// For a Fragment this is the concatenation of its children (an empty
    /// fragment serializes to `""`); for an Element it is the element's
    /// outer markup; for Text it is the escaped payload.
    pub fn serialize(&self, doc: &Document, node: NodeId) -> Result<String> {
        let mut out = String::with_capacity(256);
        self.write_subtrees(doc, &[node], &mut out, false)?;
        Ok(out)
    }

    /// Serialize only the children of a node, in order.
    pub fn serialize_children(&self, doc: &Document, node: NodeId) -> Result<String> {
        let mut out = String::with_capacity(256);
        let raw = is_raw_text_element(doc, node)?;
        self.write_subtrees(doc, doc.children(node)?, &mut out, raw)?;
        Ok(out)
    }

    // Iterative: serialized markup can nest arbitrarily deep, so the walk
    // keeps an explicit work stack. Closing tags are queued behind the
    // element's children so they emit in the right place.
    fn write_subtrees(
        &self,
        doc: &Document,
        roots: &[NodeId],
        out: &mut String,
        raw: bool,
    ) -> Result<()> {
        enum Step {
            Node(NodeId, bool),
            CloseTag(NodeId),
        }

        let mut stack: Vec<Step> = roots.iter().rev().map(|&id| Step::Node(id, raw)).collect();
        while let Some(step) = stack.pop() {
            let (id, raw) = match step {
                Step::Node(id, raw) => (id, raw),
                Step::CloseTag(id) => {
                    out.push_str("</");
                    out.push_str(&doc.get(id)?.name);
                    out.push('>');
                    continue;
                }
            };

            let node = doc.get(id)?;
            match node.kind {
                NodeKind::Fragment => {
                    for &child in node.children.iter().rev() {
                        stack.push(Step::Node(child, false));
                    }
                }
                NodeKind::Element => {
                    out.push('<');
                    out.push_str(&node.name);
                    for (name, value) in &node.attrs {
                        out.push(' ');
                        out.push_str(name);
                        out.push_str("=\"");
                        escape_attr(value, out);
                        out.push('"');
                    }
                    out.push('>');

                    if VOID_ELEMENTS.contains(&node.name.as_str()) {
                        continue;
                    }

                    stack.push(Step::CloseTag(id));
                    let raw_children = RAW_TEXT_ELEMENTS.contains(&node.name.as_str());
                    for &child in node.children.iter().rev() {
                        stack.push(Step::Node(child, raw_children));
                    }
                }
                NodeKind::Text => {
                    if raw {
                        out.push_str(&node.text);
                    } else {
                        escape_text(&node.text, out);
                    }
                }
                NodeKind::Comment => {
                    out.push_str("<!--");
                    out.push_str(&node.text);
                    out.push_str("-->");
                }
            }
        }
        Ok(())
    }
}

impl Default for HtmlSerializer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_raw_text_element(doc: &Document, node: NodeId) -> Result<bool> {
    let node = doc.get(node)?;
    Ok(node.is_element() && RAW_TEXT_ELEMENTS.contains(&node.name.as_str()))
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}
