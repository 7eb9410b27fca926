//! Contains the decoded document type.

use crate::error::Result;
use crate::node::{Node, NodeList};


/// A decoded FBX binary file.
///
/// Owns every node and property; dropping it releases all of them.
#[derive(Debug)]
pub struct Document {
    version: u32,
    roots: NodeList,
}

impl Document {
    pub(crate) fn new(version: u32, roots: NodeList) -> Self {
        Document {
            version: version,
            roots: roots,
        }
    }

    /// FBX format version, such as `7400`.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Top-level nodes, in stream order.
    pub fn roots(&self) -> &NodeList {
        &self.roots
    }

    pub fn find<N: AsRef<[u8]>>(&self, name: N) -> Result<&Node> {
        self.roots.find(name)
    }

    pub fn try_find<N: AsRef<[u8]>>(&self, name: N) -> Option<&Node> {
        self.roots.try_find(name)
    }

    pub fn find_index<N: AsRef<[u8]>>(&self, name: N) -> Option<usize> {
        self.roots.find_index(name)
    }

    pub fn find_all_indices<N: AsRef<[u8]>>(&self, name: N) -> Vec<usize> {
        self.roots.find_all_indices(name)
    }
}
