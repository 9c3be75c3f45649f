//! Defines the navigation contract for a read-only source-document tree.
//!
//! The processor never owns the grove. It only walks it through
//! [`GroveNode`], whose accessors report absence through [`AccessError`]
//! instead of panicking, so a malformed or partial grove degrades into
//! "no such node" rather than aborting a formatting pass.

use galley_types::NodeId;
use std::fmt;
use std::hash::Hash;
use thiserror::Error;

pub mod testing;

/// Why a grove accessor produced no node.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    /// The property exists for this node class but is empty here
    /// (no first child, last sibling, root has no parent).
    #[error("no such node")]
    Null,
    /// The property does not apply to this node class
    /// (character data of an element, children of a text chunk).
    #[error("property not defined for this node class")]
    NotInClass,
}

/// The class of a grove node, as far as the processor cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The document node; its children include the document element.
    Root,
    Element,
    /// A run of character data.
    Text,
    /// Comments, processing instructions and anything else the processor
    /// dispatches through rules without special treatment.
    Other,
}

/// A cheap handle on a grove node.
///
/// Handles are compared by identity: two handles are equal iff they denote
/// the same node of the same grove.
pub trait GroveNode: Clone + PartialEq + Eq + Hash + fmt::Debug {
    fn kind(&self) -> NodeKind;

    /// Generic identifier of an element; `None` for other classes.
    fn gi(&self) -> Option<&str>;

    /// Index of this node within its grove.
    fn node_index(&self) -> u64;

    /// Index of the grove the node belongs to, distinguishing the source
    /// document from auxiliary groves loaded during processing.
    fn grove_index(&self) -> u32;

    fn first_child(&self) -> Result<Self, AccessError>;

    fn next_sibling(&self) -> Result<Self, AccessError>;

    /// The first sibling after the character chunk starting at this node.
    /// Groves that store character data one node per character override
    /// this to skip the rest of the chunk.
    fn next_chunk_sibling(&self) -> Result<Self, AccessError> {
        self.next_sibling()
    }

    fn parent(&self) -> Result<Self, AccessError>;

    /// The character data starting at this node, up to the end of its chunk.
    fn char_chunk(&self) -> Result<&str, AccessError>;

    /// The document element of the grove this node belongs to.
    fn document_element(&self) -> Result<Self, AccessError>;

    fn attribute_string(&self, name: &str) -> Result<&str, AccessError>;

    fn id(&self) -> NodeId {
        NodeId::new(self.grove_index(), self.node_index())
    }

    /// Iterates over the children chunk by chunk.
    fn children(&self) -> Children<Self> {
        Children {
            next: self.first_child().ok(),
        }
    }
}

/// Iterator returned by [`GroveNode::children`].
#[derive(Debug, Clone)]
pub struct Children<N> {
    next: Option<N>,
}

impl<N: GroveNode> Iterator for Children<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        let current = self.next.take()?;
        self.next = current.next_chunk_sibling().ok();
        Some(current)
    }
}
