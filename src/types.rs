//! Core type definitions for the document tree.
//!
//! Key design decisions:
//! 1. Use u32 indices instead of pointers (no Rc cycles, no weak upgrades)
//! 2. Use SmallVec for child lists (most nodes have <4 children)
//! 3. Attributes are an ordered Vec of unique names, not a HashMap, so
//!    serialization is deterministic and byte-comparable

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Node identifier (index into the document arena).
pub type NodeId = u32;

/// The node variants this tree supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Rootless container of sibling nodes. Holds detached subtrees and
    /// serves as every document's root.
    Fragment,
    Element,
    Text,
    Comment,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Fragment => "fragment",
            NodeKind::Element => "element",
            NodeKind::Text => "text",
            NodeKind::Comment => "comment",
        }
    }
}

/// A single node in the document tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,

    /// Index of the parent node. `None` means detached (or the tree root).
    pub parent: Option<NodeId>,
    pub children: SmallVec<[NodeId; 4]>,

    /// Lowercased tag name for elements, empty for other kinds.
    pub name: String,
    /// Payload for Text and Comment nodes.
    pub text: String,
    /// Ordered attribute list; names are unique and lowercased.
    pub attrs: Vec<(String, String)>,
}

impl Node {
    pub(crate) fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            parent: None,
            children: SmallVec::new(),
            name: String::new(),
            text: String::new(),
            attrs: Vec::new(),
        }
    }

    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    /// Whether this node may hold children (Fragment or Element).
    pub fn can_hold_children(&self) -> bool {
        matches!(self.kind, NodeKind::Fragment | NodeKind::Element)
    }

    /// Get attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing any existing value and keeping its
    /// original position; new names append.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_ascii_lowercase(), value)),
        }
    }

    /// Remove an attribute, returning its value if present.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|(n, _)| n.eq_ignore_ascii_case(name))?;
        Some(self.attrs.remove(pos).1)
    }
}
