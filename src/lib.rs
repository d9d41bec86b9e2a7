//! Safe DOM mutation library.
//!
//! Replace the inner or outer content of a live, attached node with
//! attacker-controlled markup, with the guarantee that the resulting
//! subtree can execute no script and trigger no event-handler callbacks,
//! while benign structure and attributes (`id`, `style`, `class`, …)
//! survive untouched.
//!
//! ## Core design
//!
//! ```text
//! untrusted markup → lenient parse (html5ever) → scrub (policy)
//!                                                    ↓
//!                 live Document ← graft (inner / outer replacement)
//! ```
//!
//! - Nodes live in an arena ([`Document`]) and are addressed by index;
//!   mutation never invalidates the IDs of unaffected nodes.
//! - Sanitization is a pure function of its input: forbidden element
//!   subtrees are dropped, event-handler attributes (`on*`) are stripped,
//!   everything else passes through byte-for-byte.
//! - Precondition failures (notably replacing the outer content of a
//!   detached node) surface as [`DomError`] values before any mutation;
//!   there is no partially-grafted state.
//! - Single-writer: a `Document` must not be mutated concurrently. The
//!   crate adds no internal locking.
//!
//! Supporting primitives for selection-aware callers: descendant testing
//! ([`Document::is_descendant`]), fragment serialization
//! ([`HtmlSerializer`]), and range/node intersection ([`Range`]).

pub mod error;
pub mod mutate;
pub mod parse;
pub mod range;
pub mod sanitize;
pub mod serializer;
pub mod tree;
pub mod types;

pub use error::{DomError, Result};
pub use mutate::{set_safer_inner_html, set_safer_outer_html, SafeMutator};
pub use range::{Boundary, Range};
pub use sanitize::{sanitize, SanitizePolicy};
pub use serializer::HtmlSerializer;
pub use tree::Document;
pub use types::{Node, NodeId, NodeKind};
