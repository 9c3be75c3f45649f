//! An in-memory grove for tests and examples.
//!
//! Publicly available so downstream crates can build small documents
//! without an SGML/XML parser:
//!
//! ```rust
//! use galley_grove::GroveNode;
//! use galley_grove::testing::GroveBuilder;
//!
//! let grove = GroveBuilder::new()
//!     .element("doc", |b| b.element("title", |b| b.text("Hello")))
//!     .finish();
//! let doc = grove.root().document_element().unwrap();
//! assert_eq!(doc.gi(), Some("doc"));
//! ```

use crate::{AccessError, GroveNode, NodeKind};
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    gi: Option<String>,
    text: String,
    attributes: Vec<(String, String)>,
    parent: Option<usize>,
    children: Vec<usize>,
    /// Position within the parent's child list.
    sibling_index: usize,
}

impl NodeData {
    fn new(kind: NodeKind, parent: Option<usize>, sibling_index: usize) -> Self {
        Self {
            kind,
            gi: None,
            text: String::new(),
            attributes: Vec::new(),
            parent,
            children: Vec::new(),
            sibling_index,
        }
    }
}

/// A grove stored as a flat arena of nodes; index 0 is the root.
#[derive(Debug)]
pub struct InMemoryGrove {
    grove_index: u32,
    nodes: Vec<NodeData>,
}

impl InMemoryGrove {
    pub fn root(&self) -> GroveRef<'_> {
        GroveRef {
            grove: self,
            index: 0,
        }
    }

    /// Number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Finds the first element in document order with the given `id` attribute.
    pub fn element_with_id(&self, id: &str) -> Option<GroveRef<'_>> {
        self.nodes
            .iter()
            .position(|n| {
                n.kind == NodeKind::Element
                    && n.attributes.iter().any(|(k, v)| k == "id" && v == id)
            })
            .map(|index| GroveRef { grove: self, index })
    }
}

/// Builds an [`InMemoryGrove`] in document order.
#[derive(Debug)]
pub struct GroveBuilder {
    nodes: Vec<NodeData>,
    open: Vec<usize>,
    grove_index: u32,
}

impl Default for GroveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GroveBuilder {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::new(NodeKind::Root, None, 0)],
            open: vec![0],
            grove_index: 0,
        }
    }

    pub fn with_grove_index(mut self, grove_index: u32) -> Self {
        self.grove_index = grove_index;
        self
    }

    fn push_child(&mut self, kind: NodeKind) -> usize {
        let parent = *self.open.last().unwrap_or(&0);
        let index = self.nodes.len();
        let sibling_index = self.nodes[parent].children.len();
        self.nodes
            .push(NodeData::new(kind, Some(parent), sibling_index));
        self.nodes[parent].children.push(index);
        index
    }

    pub fn start_element(mut self, gi: &str) -> Self {
        let index = self.push_child(NodeKind::Element);
        self.nodes[index].gi = Some(gi.to_string());
        self.open.push(index);
        self
    }

    pub fn end_element(mut self) -> Self {
        if self.open.len() > 1 {
            self.open.pop();
        }
        self
    }

    /// Adds an element whose content is produced by `content`.
    pub fn element(self, gi: &str, content: impl FnOnce(Self) -> Self) -> Self {
        content(self.start_element(gi)).end_element()
    }

    pub fn empty_element(self, gi: &str) -> Self {
        self.start_element(gi).end_element()
    }

    /// Sets an attribute on the innermost open element.
    pub fn attribute(mut self, name: &str, value: &str) -> Self {
        if let Some(&index) = self.open.last() {
            self.nodes[index]
                .attributes
                .push((name.to_string(), value.to_string()));
        }
        self
    }

    /// Appends character data; adjacent text is merged into one chunk.
    pub fn text(mut self, text: &str) -> Self {
        let parent = *self.open.last().unwrap_or(&0);
        if let Some(&last) = self.nodes[parent].children.last() {
            if self.nodes[last].kind == NodeKind::Text {
                self.nodes[last].text.push_str(text);
                return self;
            }
        }
        let index = self.push_child(NodeKind::Text);
        self.nodes[index].text = text.to_string();
        self
    }

    pub fn comment(mut self, text: &str) -> Self {
        let index = self.push_child(NodeKind::Other);
        self.nodes[index].text = text.to_string();
        self
    }

    pub fn finish(self) -> InMemoryGrove {
        InMemoryGrove {
            grove_index: self.grove_index,
            nodes: self.nodes,
        }
    }
}

/// A node handle into an [`InMemoryGrove`].
#[derive(Debug, Clone, Copy)]
pub struct GroveRef<'g> {
    grove: &'g InMemoryGrove,
    index: usize,
}

impl<'g> GroveRef<'g> {
    fn data(&self) -> &'g NodeData {
        &self.grove.nodes[self.index]
    }

    fn at(&self, index: usize) -> GroveRef<'g> {
        GroveRef {
            grove: self.grove,
            index,
        }
    }
}

impl PartialEq for GroveRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.grove, other.grove) && self.index == other.index
    }
}

impl Eq for GroveRef<'_> {}

impl Hash for GroveRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.grove.grove_index.hash(state);
        self.index.hash(state);
    }
}

impl GroveNode for GroveRef<'_> {
    fn kind(&self) -> NodeKind {
        self.data().kind
    }

    fn gi(&self) -> Option<&str> {
        self.data().gi.as_deref()
    }

    fn node_index(&self) -> u64 {
        self.index as u64
    }

    fn grove_index(&self) -> u32 {
        self.grove.grove_index
    }

    fn first_child(&self) -> Result<Self, AccessError> {
        let data = self.data();
        if data.kind == NodeKind::Text {
            return Err(AccessError::NotInClass);
        }
        data.children
            .first()
            .map(|&c| self.at(c))
            .ok_or(AccessError::Null)
    }

    fn next_sibling(&self) -> Result<Self, AccessError> {
        let data = self.data();
        let parent = data.parent.ok_or(AccessError::Null)?;
        self.grove.nodes[parent]
            .children
            .get(data.sibling_index + 1)
            .map(|&s| self.at(s))
            .ok_or(AccessError::Null)
    }

    fn parent(&self) -> Result<Self, AccessError> {
        self.data()
            .parent
            .map(|p| self.at(p))
            .ok_or(AccessError::Null)
    }

    fn char_chunk(&self) -> Result<&str, AccessError> {
        let data = self.data();
        match data.kind {
            NodeKind::Text => Ok(&data.text),
            _ => Err(AccessError::NotInClass),
        }
    }

    fn document_element(&self) -> Result<Self, AccessError> {
        self.grove.nodes[0]
            .children
            .iter()
            .copied()
            .find(|&c| self.grove.nodes[c].kind == NodeKind::Element)
            .map(|c| self.at(c))
            .ok_or(AccessError::Null)
    }

    fn attribute_string(&self, name: &str) -> Result<&str, AccessError> {
        let data = self.data();
        if data.kind != NodeKind::Element {
            return Err(AccessError::NotInClass);
        }
        data.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .ok_or(AccessError::Null)
    }
}
