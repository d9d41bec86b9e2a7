//! The safe mutation engine: sanitizing inner/outer content replacement
//! on a live tree.
//!
//! Both setters run the same pipeline: parse the candidate markup into a
//! detached subtree, scrub it with the policy, then graft the result into
//! the live document. Precondition failures are detected before any
//! parsing or mutation, so a failed call leaves the tree byte-identical.
//!
//! The live document is assumed to be owned by a single thread of
//! control; callers needing concurrent access must serialize it
//! externally.

use crate::error::{DomError, Result};
use crate::sanitize::SanitizePolicy;
use crate::tree::Document;
use crate::types::NodeId;

/// Sanitizing mutator bound to a policy.
#[derive(Debug, Clone, Default)]
pub struct SafeMutator {
    policy: SanitizePolicy,
}

impl SafeMutator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: SanitizePolicy) -> Self {
        Self { policy }
    }

    /// Replace the children of `target` with the sanitized parse of
    /// `markup`, preserving the fragment's node order.
    ///
    /// `target` may be any node capable of holding children; it does not
    /// need to be attached.
    pub fn set_inner_html(&self, doc: &mut Document, target: NodeId, markup: &str) -> Result<()> {
        let node = doc.get(target)?;
        if !node.can_hold_children() {
            return Err(DomError::InvalidNodeType {
                expected: "element or fragment",
                actual: node.kind.as_str(),
            });
        }

        let clean = self.policy.sanitize(markup);
        tracing::debug!(node = target, "replacing inner content");

        let existing: Vec<NodeId> = doc.children(target)?.to_vec();
        for child in existing {
            doc.detach(child)?;
        }
        doc.adopt_children(clean, target, None)
    }

    /// Replace `target` itself with the sanitized parse of `markup`:
    /// the fragment's nodes are inserted before `target` in its parent,
    /// then `target` is removed. Siblings are untouched and no wrapper
    /// element is introduced.
    ///
    /// Fails with [`DomError::NotAttached`] when `target` has no parent;
    /// replacing a rootless node is meaningless. The check runs before
    /// parsing, so nothing is mutated on failure.
    pub fn set_outer_html(&self, doc: &mut Document, target: NodeId, markup: &str) -> Result<()> {
        let parent = doc.get(target)?.parent.ok_or(DomError::NotAttached)?;

        let clean = self.policy.sanitize(markup);
        tracing::debug!(node = target, "replacing outer content");

        doc.adopt_children(clean, parent, Some(target))?;
        doc.detach(target)
    }
}

/// Replace the children of `target` with sanitized markup, using the
/// default policy.
pub fn set_safer_inner_html(doc: &mut Document, target: NodeId, markup: &str) -> Result<()> {
    SafeMutator::new().set_inner_html(doc, target, markup)
}

/// Replace `target` itself with sanitized markup, using the default
/// policy. `target` must be attached.
pub fn set_safer_outer_html(doc: &mut Document, target: NodeId, markup: &str) -> Result<()> {
    SafeMutator::new().set_outer_html(doc, target, markup)
}
