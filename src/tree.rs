//! Arena-based document tree storage and the structural primitives the
//! mutation engine relies on.
//!
//! Nodes are stored sequentially in a single Vec and addressed by index.
//! Detaching a node removes it from its parent's child list; the arena
//! slot stays behind as a tombstone, so every NodeId handed out remains
//! valid for the lifetime of the document.
//!
//! The tree is a single-writer structure: callers mutating the same
//! document from multiple threads must serialize access externally. No
//! internal locking is performed here.

use crate::error::{DomError, Result};
use crate::types::{Node, NodeId, NodeKind};
use serde::{Deserialize, Serialize};

/// A document: one arena of nodes rooted at a Fragment.
///
/// Detached sanitized content is itself a `Document`; grafting adopts its
/// nodes into the live document (see [`Document::adopt_children`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    /// Create an empty document holding only the root Fragment.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(0, NodeKind::Fragment)],
            root: 0,
        }
    }

    /// The root Fragment node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get node by ID (immutable).
    pub fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id as usize).ok_or(DomError::NodeNotFound(id))
    }

    /// Get node by ID (mutable).
    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id as usize)
            .ok_or(DomError::NodeNotFound(id))
    }

    /// Total number of arena slots (live and tombstoned).
    pub fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    /// True when no slot besides the root Fragment was ever allocated.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    fn push_node(&mut self, kind: NodeKind) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(Node::new(id, kind));
        id
    }

    /// Create a detached element with the given tag name.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        let id = self.push_node(NodeKind::Element);
        self.nodes[id as usize].name = name.to_ascii_lowercase();
        id
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        let id = self.push_node(NodeKind::Text);
        self.nodes[id as usize].text = text.to_string();
        id
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        let id = self.push_node(NodeKind::Comment);
        self.nodes[id as usize].text = text.to_string();
        id
    }

    /// Create a detached fragment node.
    pub fn create_fragment(&mut self) -> NodeId {
        self.push_node(NodeKind::Fragment)
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_insertable(parent, child)?;
        self.detach(child)?;
        self.nodes[child as usize].parent = Some(parent);
        self.nodes[parent as usize].children.push(child);
        Ok(())
    }

    /// Insert `child` into `parent`'s child list immediately before
    /// `reference`, which must currently be a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> Result<()> {
        self.check_insertable(parent, child)?;
        if child == reference {
            return Err(DomError::HierarchyViolation(
                "cannot insert a node before itself",
            ));
        }
        if !self.get(parent)?.children.contains(&reference) {
            return Err(DomError::HierarchyViolation(
                "reference node is not a child of the given parent",
            ));
        }
        // Detach first: if `child` was an earlier sibling of `reference`,
        // the reference index shifts.
        self.detach(child)?;
        let index = self.nodes[parent as usize]
            .children
            .iter()
            .position(|&c| c == reference)
            .ok_or(DomError::HierarchyViolation(
                "reference node is not a child of the given parent",
            ))?;
        self.nodes[child as usize].parent = Some(parent);
        self.nodes[parent as usize].children.insert(index, child);
        Ok(())
    }

    /// Attach a freshly created node without the public insertion checks.
    /// Only valid when `child` is detached and cannot already be an
    /// ancestor of `parent` (just-created nodes and adopted copies).
    pub(crate) fn attach_new(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child as usize].parent = Some(parent);
        self.nodes[parent as usize].children.push(child);
    }

    fn check_insertable(&self, parent: NodeId, child: NodeId) -> Result<()> {
        if !self.get(parent)?.can_hold_children() {
            return Err(DomError::InvalidNodeType {
                expected: "element or fragment",
                actual: self.get(parent)?.kind.as_str(),
            });
        }
        self.get(child)?;
        if parent == child || self.is_descendant(child, parent) {
            return Err(DomError::HierarchyViolation(
                "cannot insert a node under its own descendant",
            ));
        }
        Ok(())
    }

    /// Detach a node from its parent. No-op for nodes that are already
    /// detached. The node and its subtree stay alive in the arena.
    pub fn detach(&mut self, node: NodeId) -> Result<()> {
        let parent = self.get(node)?.parent;
        if let Some(parent) = parent {
            self.nodes[parent as usize].children.retain(|c| *c != node);
            self.nodes[node as usize].parent = None;
        }
        Ok(())
    }

    /// Parent of a node, if attached.
    pub fn parent(&self, node: NodeId) -> Result<Option<NodeId>> {
        Ok(self.get(node)?.parent)
    }

    /// Child IDs of a node, in order.
    pub fn children(&self, node: NodeId) -> Result<&[NodeId]> {
        Ok(&self.get(node)?.children)
    }

    /// Position of a node within its parent's child list.
    pub fn index_in_parent(&self, node: NodeId) -> Result<usize> {
        let parent = self.get(node)?.parent.ok_or(DomError::NotAttached)?;
        self.get(parent)?
            .children
            .iter()
            .position(|&c| c == node)
            .ok_or(DomError::HierarchyViolation(
                "node missing from its parent's child list",
            ))
    }

    /// Walk parent links up to the topmost node of the tree containing
    /// `node`. For attached nodes this is the document root; for detached
    /// subtrees it is the subtree's own root.
    pub fn tree_root(&self, node: NodeId) -> Result<NodeId> {
        let mut current = node;
        while let Some(parent) = self.get(current)?.parent {
            current = parent;
        }
        Ok(current)
    }

    /// True iff `node` is reachable from `ancestor` by following child
    /// links. Strict: a node is not its own descendant.
    pub fn is_descendant(&self, ancestor: NodeId, node: NodeId) -> bool {
        if ancestor == node {
            return false;
        }
        let mut current = self.get(node).ok().and_then(|n| n.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).ok().and_then(|n| n.parent);
        }
        false
    }

    /// Traverse a subtree depth-first (iterative, no recursion).
    pub fn traverse_df<F>(&self, start: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(&Node) -> Result<()>,
    {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let node = self.get(id)?;
            visit(node)?;

            // Push children in reverse order (so they're visited left-to-right)
            for &child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        Ok(())
    }

    /// Concatenated Text payloads of a subtree, in document order.
    pub fn text_content(&self, node: NodeId) -> Result<String> {
        let mut text = String::new();
        self.traverse_df(node, |n| {
            if n.is_text() {
                text.push_str(&n.text);
            }
            Ok(())
        })?;
        Ok(text)
    }

    /// Deep-copy the children of `src`'s root into this document under
    /// `parent`, preserving order. When `reference` is given, the copies
    /// are inserted immediately before it; otherwise they are appended.
    /// `src` is consumed: after a successful call the grafted nodes are
    /// owned entirely by this document.
    pub fn adopt_children(
        &mut self,
        src: Document,
        parent: NodeId,
        reference: Option<NodeId>,
    ) -> Result<()> {
        let top: Vec<NodeId> = src.get(src.root())?.children.to_vec();
        for child in top {
            let copy = self.adopt_subtree(&src, child)?;
            match reference {
                Some(reference) => self.insert_before(parent, copy, reference)?,
                None => self.append_child(parent, copy)?,
            }
        }
        Ok(())
    }

    // Iterative, like `traverse_df`: adopted markup controls its own
    // nesting depth, so the copy must not recurse.
    fn adopt_subtree(&mut self, src: &Document, src_id: NodeId) -> Result<NodeId> {
        let top = self.copy_shallow(src.get(src_id)?);
        let mut stack: Vec<(NodeId, NodeId)> = src
            .get(src_id)?
            .children
            .iter()
            .rev()
            .map(|&c| (c, top))
            .collect();
        while let Some((src_child, dst_parent)) = stack.pop() {
            let src_node = src.get(src_child)?;
            let copy = self.copy_shallow(src_node);
            self.attach_new(dst_parent, copy);
            for &child in src_node.children.iter().rev() {
                stack.push((child, copy));
            }
        }
        Ok(top)
    }

    fn copy_shallow(&mut self, src_node: &Node) -> NodeId {
        let id = self.push_node(src_node.kind);
        let node = &mut self.nodes[id as usize];
        node.name = src_node.name.clone();
        node.text = src_node.text.clone();
        node.attrs = src_node.attrs.clone();
        id
    }

    /// Structural equality of two subtrees: kind, tag name, attributes
    /// (names, values, and order), text payload, and children.
    pub fn subtree_eq(&self, a: NodeId, other: &Document, b: NodeId) -> bool {
        let mut stack = vec![(a, b)];
        while let Some((a, b)) = stack.pop() {
            let (na, nb) = match (self.get(a), other.get(b)) {
                (Ok(na), Ok(nb)) => (na, nb),
                _ => return false,
            };
            if na.kind != nb.kind
                || na.name != nb.name
                || na.text != nb.text
                || na.attrs != nb.attrs
                || na.children.len() != nb.children.len()
            {
                return false;
            }
            stack.extend(
                na.children
                    .iter()
                    .copied()
                    .zip(nb.children.iter().copied()),
            );
        }
        true
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
