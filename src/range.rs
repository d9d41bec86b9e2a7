//! Selection ranges and range/node intersection.
//!
//! A range is a pair of boundary points delimiting a contiguous region of
//! a tree. This module only answers containment queries; it never mutates
//! the tree. Intersection follows the DOM standard's boundary-point
//! comparison: a node intersects a range iff the node's own span, taken
//! as `(parent, index)..(parent, index + 1)`, overlaps the range. An
//! ancestor of the range's endpoints intersects; a wholly contained
//! descendant intersects; a disjoint sibling does not.
//!
//! Some browser engines have historically reported an adjacent sibling of
//! a single selected node as intersecting. This implementation sticks to
//! the standard comparison and does not reproduce that behavior.

use crate::error::{DomError, Result};
use crate::tree::Document;
use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One boundary point: a node and an offset into it. The offset is a
/// child index for container nodes and a character offset for Text nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundary {
    pub node: NodeId,
    pub offset: usize,
}

/// A contiguous region of a tree, delimited by two boundary points.
///
/// [`Range::select_node`] always produces an ordered pair. With explicit
/// boundary points the caller is responsible for putting `start` before
/// `end`; a reversed range is not an error, it simply spans nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Boundary,
    pub end: Boundary,
}

impl Range {
    /// Range from explicit boundary points. The points are taken as
    /// given; see the type docs for ordering.
    pub fn new(start: Boundary, end: Boundary) -> Self {
        Self { start, end }
    }

    /// Range spanning exactly one attached node: from just before it to
    /// just after it, within its parent.
    pub fn select_node(doc: &Document, node: NodeId) -> Result<Self> {
        let parent = doc.get(node)?.parent.ok_or(DomError::NotAttached)?;
        let index = doc.index_in_parent(node)?;
        Ok(Self {
            start: Boundary { node: parent, offset: index },
            end: Boundary { node: parent, offset: index + 1 },
        })
    }

    /// True iff any part of `node`'s content falls within this range.
    ///
    /// Returns [`DomError::DisjointTrees`] when the node and the range do
    /// not share a tree root; the comparison is undefined across trees.
    pub fn intersects_node(&self, doc: &Document, node: NodeId) -> Result<bool> {
        if doc.tree_root(node)? != doc.tree_root(self.start.node)? {
            return Err(DomError::DisjointTrees);
        }

        let parent = match doc.get(node)?.parent {
            Some(parent) => parent,
            // The tree root contains every range rooted in it.
            None => return Ok(true),
        };
        let offset = doc.index_in_parent(node)?;

        let node_start = Boundary { node: parent, offset };
        let node_end = Boundary { node: parent, offset: offset + 1 };

        Ok(compare_boundaries(doc, node_start, self.end)? == Ordering::Less
            && compare_boundaries(doc, node_end, self.start)? == Ordering::Greater)
    }
}

/// Total order of two boundary points within one tree: before, equal, or
/// after in document order.
pub fn compare_boundaries(doc: &Document, a: Boundary, b: Boundary) -> Result<Ordering> {
    Ok(boundary_path(doc, a)?.cmp(&boundary_path(doc, b)?))
}

/// The child-index path from the tree root down to a boundary point. Two
/// paths compare lexicographically in document order; a shorter prefix
/// means the boundary sits before its descendant's content.
fn boundary_path(doc: &Document, boundary: Boundary) -> Result<Vec<usize>> {
    let mut path = vec![boundary.offset];
    let mut current = boundary.node;
    while doc.get(current)?.parent.is_some() {
        path.push(doc.index_in_parent(current)?);
        current = doc.get(current)?.parent.unwrap_or(current);
    }
    path.reverse();
    Ok(path)
}
