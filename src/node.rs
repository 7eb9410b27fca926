//! Contains the node tree types and name lookup.

use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;

use crate::alloc::Handle;
use crate::error::{Error, Result};
use crate::property::Property;


/// A node of the decoded FBX tree.
///
/// Names are raw bytes (usually ASCII) with `0x00` and `0x01` replaced by `:`.
pub struct Node {
    name: Handle,
    properties: Box<[Property]>,
    children: NodeList,
}

impl Node {
    pub(crate) fn new(name: Handle, properties: Vec<Property>, children: NodeList) -> Self {
        Node {
            name: name,
            properties: properties.into_boxed_slice(),
            children: children,
        }
    }

    /// Node name.
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// Node name, with invalid UTF-8 replaced.
    pub fn name_lossy(&self) -> Cow<str> {
        String::from_utf8_lossy(&self.name)
    }

    /// Node properties, in stream order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Child nodes, in stream order.
    pub fn children(&self) -> &NodeList {
        &self.children
    }

    /// Finds the first child with the given name.
    ///
    /// This is not recursive.
    pub fn find<N: AsRef<[u8]>>(&self, name: N) -> Result<&Node> {
        self.children.find(name)
    }

    pub fn try_find<N: AsRef<[u8]>>(&self, name: N) -> Option<&Node> {
        self.children.try_find(name)
    }

    pub fn find_index<N: AsRef<[u8]>>(&self, name: N) -> Option<usize> {
        self.children.find_index(name)
    }

    pub fn find_all_indices<N: AsRef<[u8]>>(&self, name: N) -> Vec<usize> {
        self.children.find_all_indices(name)
    }

    pub fn find_all<'a, N: AsRef<[u8]> + 'a>(&'a self, name: N) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.find_all(name)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name_lossy())
            .field("properties", &self.properties.len())
            .field("children", &self.children.len())
            .finish()
    }
}

/// Ordered list of sibling nodes.
#[derive(Debug, Default)]
pub struct NodeList {
    nodes: Vec<Node>,
}

impl NodeList {
    pub(crate) fn new(nodes: Vec<Node>) -> Self {
        NodeList { nodes: nodes }
    }

    /// Finds the first node with the given name.
    pub fn find<N: AsRef<[u8]>>(&self, name: N) -> Result<&Node> {
        let name = name.as_ref();
        self.try_find(name)
            .ok_or_else(|| Error::NodeNotFound(String::from_utf8_lossy(name).into_owned()))
    }

    pub fn try_find<N: AsRef<[u8]>>(&self, name: N) -> Option<&Node> {
        self.find_index(name).map(|i| &self.nodes[i])
    }

    /// Returns the index of the first node with the given name.
    pub fn find_index<N: AsRef<[u8]>>(&self, name: N) -> Option<usize> {
        let name = name.as_ref();
        self.nodes.iter().position(|node| node.name() == name)
    }

    /// Returns the indices of all nodes with the given name, in ascending order.
    pub fn find_all_indices<N: AsRef<[u8]>>(&self, name: N) -> Vec<usize> {
        let name = name.as_ref();
        self.nodes.iter()
            .enumerate()
            .filter(|&(_, node)| node.name() == name)
            .map(|(i, _)| i)
            .collect()
    }

    /// Iterates over all nodes with the given name.
    pub fn find_all<'a, N: AsRef<[u8]> + 'a>(&'a self, name: N) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.iter().filter(move |node| node.name() == name.as_ref())
    }
}

impl Deref for NodeList {
    type Target = [Node];

    fn deref(&self) -> &[Node] {
        &self.nodes
    }
}

impl<'a> IntoIterator for &'a NodeList {
    type Item = &'a Node;
    type IntoIter = ::std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
