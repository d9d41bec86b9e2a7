//! Lenient markup parsing.
//!
//! Untrusted markup is parsed with html5ever's fragment algorithm (the
//! same error-tolerant parsing a browser applies to `element.innerHTML`)
//! into an `RcDom`, then converted into this crate's arena document. The
//! conversion keeps text verbatim, including whitespace-only nodes, so
//! sanitized output stays byte-faithful to what a direct insertion would
//! have produced.
//!
//! Parsing is total: malformed input degrades to its nearest valid
//! interpretation and never fails.

use crate::tree::Document;
use crate::types::NodeId;
use html5ever::tendril::TendrilSink;
use html5ever::{driver, local_name, namespace_url, ns, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Parse a markup string into a detached document whose root Fragment
/// holds the fragment's top-level nodes in source order.
pub fn parse_fragment(markup: &str) -> Document {
    // A `div` context element mirrors `innerHTML` on a generic container.
    // Scripting disabled: `noscript` content parses as real markup so the
    // sanitizer gets to see it.
    let dom = driver::parse_fragment(
        RcDom::default(),
        ParseOpts::default(),
        QualName::new(None, ns!(html), local_name!("div")),
        Vec::new(),
        false,
    )
    .one(markup);

    let mut doc = Document::new();
    let root = doc.root();

    // Fragment parsing yields a synthetic `html` element wrapping the
    // parsed content; lift its children out.
    let top_level = dom.document.children.borrow();
    if let Some(context) = top_level.first() {
        convert_subtree(&mut doc, root, &context.children.borrow());
    }

    tracing::trace!(nodes = doc.slot_count(), "parsed markup fragment");
    doc
}

/// Convert RcDom nodes (and their subtrees) into the arena document.
/// Iterative: nesting depth is input-controlled, so the walk keeps an
/// explicit stack instead of recursing. Every arena node is freshly
/// created here, so attachment skips the public insertion checks.
fn convert_subtree(doc: &mut Document, parent: NodeId, top: &[Handle]) {
    let mut stack: Vec<(Handle, NodeId)> = top
        .iter()
        .rev()
        .map(|handle| (handle.clone(), parent))
        .collect();
    while let Some((handle, parent)) = stack.pop() {
        match &handle.data {
            NodeData::Element { name, attrs, .. } => {
                let id = doc.create_element(name.local.as_ref());
                if let Ok(node) = doc.get_mut(id) {
                    for attr in attrs.borrow().iter() {
                        node.set_attr(attr.name.local.as_ref(), attr.value.to_string());
                    }
                }
                doc.attach_new(parent, id);
                for child in handle.children.borrow().iter().rev() {
                    stack.push((child.clone(), id));
                }
            }
            NodeData::Text { contents } => {
                let id = doc.create_text(&contents.borrow());
                doc.attach_new(parent, id);
            }
            NodeData::Comment { contents } => {
                let id = doc.create_comment(contents);
                doc.attach_new(parent, id);
            }
            NodeData::Document => {
                for child in handle.children.borrow().iter().rev() {
                    stack.push((child.clone(), parent));
                }
            }
            // Doctypes and processing instructions cannot appear in
            // fragment content; drop them.
            NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeKind;

    #[test]
    fn test_parse_simple_fragment() {
        let doc = parse_fragment("<div><span>Text</span></div>");

        let top = doc.children(doc.root()).unwrap();
        assert_eq!(top.len(), 1);
        let div = doc.get(top[0]).unwrap();
        assert_eq!(div.kind, NodeKind::Element);
        assert_eq!(div.name, "div");

        let span = doc.get(div.children[0]).unwrap();
        assert_eq!(span.name, "span");
        assert_eq!(doc.text_content(span.id).unwrap(), "Text");
    }

    #[test]
    fn test_parse_preserves_attribute_order_and_values() {
        let doc = parse_fragment(r#"<div id="rad" style="color:red">hi</div>"#);

        let top = doc.children(doc.root()).unwrap();
        let div = doc.get(top[0]).unwrap();
        assert_eq!(
            div.attrs,
            vec![
                ("id".to_string(), "rad".to_string()),
                ("style".to_string(), "color:red".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_is_lenient_on_malformed_input() {
        // Unclosed tags parse to their nearest valid interpretation.
        let doc = parse_fragment("<div><b>hi");
        let top = doc.children(doc.root()).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(doc.text_content(top[0]).unwrap(), "hi");

        // Even pure garbage produces a (possibly empty) fragment.
        let doc = parse_fragment("<<<>>>");
        assert!(doc.children(doc.root()).is_ok());
    }

    #[test]
    fn test_parse_multiple_top_level_nodes() {
        let doc = parse_fragment("<b>hi</b>there");
        let top = doc.children(doc.root()).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(doc.get(top[0]).unwrap().name, "b");
        assert_eq!(doc.get(top[1]).unwrap().text, "there");
    }

    #[test]
    fn test_parse_keeps_comments() {
        let doc = parse_fragment("<!--note--><p>hi</p>");
        let top = doc.children(doc.root()).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(doc.get(top[0]).unwrap().kind, NodeKind::Comment);
        assert_eq!(doc.get(top[0]).unwrap().text, "note");
    }

    #[test]
    fn test_parse_uppercase_tags_are_lowercased() {
        let doc = parse_fragment("<DIV ID=\"x\">hi</DIV>");
        let top = doc.children(doc.root()).unwrap();
        let div = doc.get(top[0]).unwrap();
        assert_eq!(div.name, "div");
        assert_eq!(div.attr("id"), Some("x"));
    }
}
