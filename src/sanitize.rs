//! Sanitizing policy: raw markup in, script-free subtree out.
//!
//! The policy drops entire subtrees rooted at forbidden elements and
//! strips every event-handler attribute (any name starting with `on`,
//! matched case-insensitively) from the rest. Benign attributes pass
//! through with their values untouched: `style="color:red"` survives
//! byte-for-byte. Attribute values are never rewritten, only whole
//! dangerous attributes are dropped.
//!
//! A tag denylist alone is not enough: handlers like `onerror` on an
//! `img` fire without any script element, so the attribute rule carries
//! the real weight here.

use crate::parse;
use crate::tree::Document;
use crate::types::NodeId;

/// Element tags whose entire subtree is dropped by the default policy.
pub const FORBIDDEN_ELEMENTS: &[&str] = &["script"];

/// Attribute-name prefix identifying event-handler attributes.
const EVENT_HANDLER_PREFIX: &str = "on";

/// A static sanitization table. Pure and stateless: sanitizing the same
/// input twice yields identical output.
#[derive(Debug, Clone)]
pub struct SanitizePolicy {
    forbidden_elements: Vec<String>,
}

impl SanitizePolicy {
    /// Policy with a custom forbidden-element set. Tags are matched
    /// case-insensitively.
    pub fn new<I, S>(forbidden_elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            forbidden_elements: forbidden_elements
                .into_iter()
                .map(|s| s.into().to_ascii_lowercase())
                .collect(),
        }
    }

    /// True iff a tag's whole subtree must be removed.
    pub fn is_forbidden_element(&self, tag: &str) -> bool {
        self.forbidden_elements
            .iter()
            .any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// True iff an attribute name matches the event-handler pattern.
    /// Matches on name only; the value plays no part.
    pub fn is_forbidden_attribute(&self, name: &str) -> bool {
        name.len() >= EVENT_HANDLER_PREFIX.len()
            && name[..EVENT_HANDLER_PREFIX.len()].eq_ignore_ascii_case(EVENT_HANDLER_PREFIX)
    }

    /// Parse `markup` leniently and scrub the result. Total: malformed
    /// markup degrades to its nearest valid interpretation, never an
    /// error. The returned document is detached; the caller owns it.
    pub fn sanitize(&self, markup: &str) -> Document {
        let mut doc = parse::parse_fragment(markup);
        let root = doc.root();
        self.scrub(&mut doc, root);
        doc
    }

    /// Depth-first scrub of an already-parsed subtree, in place.
    pub fn scrub(&self, doc: &mut Document, start: NodeId) {
        let mut dropped_elements = 0usize;
        let mut dropped_attributes = 0usize;
        let mut doomed = Vec::new();
        let mut stack = vec![start];

        while let Some(id) = stack.pop() {
            let node = match doc.get_mut(id) {
                Ok(node) => node,
                Err(_) => continue,
            };

            if node.is_element() && self.is_forbidden_element(&node.name) {
                // The whole subtree goes; no need to descend.
                doomed.push(id);
                dropped_elements += 1;
                continue;
            }

            let before = node.attrs.len();
            node.attrs.retain(|(name, _)| !self.is_forbidden_attribute(name));
            dropped_attributes += before - node.attrs.len();

            for &child in node.children.iter().rev() {
                stack.push(child);
            }
        }

        for id in doomed {
            let _ = doc.detach(id);
        }

        if dropped_elements > 0 || dropped_attributes > 0 {
            tracing::debug!(dropped_elements, dropped_attributes, "scrubbed markup");
        }
    }
}

impl Default for SanitizePolicy {
    fn default() -> Self {
        Self::new(FORBIDDEN_ELEMENTS.iter().copied())
    }
}

/// Sanitize with the default policy.
pub fn sanitize(markup: &str) -> Document {
    SanitizePolicy::default().sanitize(markup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::HtmlSerializer;

    fn html(doc: &Document) -> String {
        HtmlSerializer::new().serialize(doc, doc.root()).unwrap()
    }

    #[test]
    fn test_removes_script_elements_entirely() {
        let doc = sanitize("<b>hi</b><script>alert(1)</script>there");
        assert_eq!(html(&doc), "<b>hi</b>there");
    }

    #[test]
    fn test_removes_multiple_scripts() {
        let doc = sanitize(
            "<b>hi</b><script>alert(\"oops\")</script>there<script>alert(\"derp\")</script>",
        );
        assert_eq!(html(&doc), "<b>hi</b>there");
    }

    #[test]
    fn test_removes_nested_script() {
        let doc = sanitize("<div><p><script>alert(1)</script>ok</p></div>");
        assert_eq!(html(&doc), "<div><p>ok</p></div>");
    }

    #[test]
    fn test_script_tag_casing_is_irrelevant() {
        let doc = sanitize("<SCRIPT>alert(1)</SCRIPT>x");
        assert_eq!(html(&doc), "x");
    }

    #[test]
    fn test_strips_event_handler_attributes() {
        let doc = sanitize(r#"<div id="rad" style="color:red" onclick="x()">hi</div>"#);
        assert_eq!(html(&doc), r#"<div id="rad" style="color:red">hi</div>"#);
    }

    #[test]
    fn test_handler_attribute_casing_is_irrelevant() {
        let doc = sanitize(r#"<div ONCLICK="x()" OnError="y()">hi</div>"#);
        assert_eq!(html(&doc), "<div>hi</div>");
    }

    #[test]
    fn test_img_onerror_vector_is_closed() {
        let doc = sanitize(
            r#"<div>before</div><img src="nonexistent.jpg" onerror="pwn()"><div>after</div>"#,
        );
        assert_eq!(
            html(&doc),
            r#"<div>before</div><img src="nonexistent.jpg"><div>after</div>"#
        );
    }

    #[test]
    fn test_benign_attributes_survive_verbatim() {
        let input = r#"<a id="l" class="x y" href="https://example.com/?a=1&amp;b=2">go</a>"#;
        let doc = sanitize(input);
        let top = doc.children(doc.root()).unwrap();
        let a = doc.get(top[0]).unwrap();
        assert_eq!(a.attr("id"), Some("l"));
        assert_eq!(a.attr("class"), Some("x y"));
        // Entity decoded at parse time; the value itself is untouched.
        assert_eq!(a.attr("href"), Some("https://example.com/?a=1&b=2"));
    }

    #[test]
    fn test_attribute_values_are_never_rewritten() {
        // A benign attribute whose *value* merely looks scary stays put.
        let doc = sanitize(r#"<div title="onclick is a word">hi</div>"#);
        assert_eq!(html(&doc), r#"<div title="onclick is a word">hi</div>"#);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let inputs = [
            "<b>hi</b><script>alert(1)</script>there",
            r#"<div id="rad" style="color:red" onclick="x()">hi</div>"#,
            "plain text & <entities>",
            "<div><p>nested</p><!--comment--></div>",
        ];
        for input in inputs {
            let once = html(&sanitize(input));
            let twice = html(&sanitize(&once));
            assert_eq!(once, twice, "sanitize not a fixed point for {input:?}");
        }
    }

    #[test]
    fn test_deeply_nested_hostile_markup() {
        // Nesting depth is attacker-controlled; parse, scrub, and
        // serialization must stay bounded by input size, not by the
        // call stack.
        let depth = 200_000;
        let mut markup = String::with_capacity(depth * 11 + 64);
        for _ in 0..depth {
            markup.push_str("<div>");
        }
        markup.push_str("<script>alert(1)</script>deep");
        for _ in 0..depth {
            markup.push_str("</div>");
        }

        let doc = sanitize(&markup);
        let out = html(&doc);
        assert!(!out.contains("<script"));
        assert!(out.contains("deep"));
    }

    #[test]
    fn test_custom_policy() {
        let policy = SanitizePolicy::new(["script", "iframe"]);
        let doc = policy.sanitize(r#"<iframe src="evil"></iframe><p>ok</p>"#);
        assert_eq!(html(&doc), "<p>ok</p>");
    }

    #[test]
    fn test_forbidden_attribute_matching() {
        let policy = SanitizePolicy::default();
        assert!(policy.is_forbidden_attribute("onclick"));
        assert!(policy.is_forbidden_attribute("ONLOAD"));
        assert!(policy.is_forbidden_attribute("onerror"));
        assert!(policy.is_forbidden_attribute("on"));
        assert!(!policy.is_forbidden_attribute("id"));
        assert!(!policy.is_forbidden_attribute("o"));
        // Only a prefix match on the name counts.
        assert!(!policy.is_forbidden_attribute("href"));
    }
}
