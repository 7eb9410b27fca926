//! Contains interface for the FBX binary decoder.

use std::io::Read;

use crate::alloc::{Allocator, MemoryStats};
use crate::document::Document;
use crate::error::Result;
use crate::node::NodeList;

pub(crate) mod parser;
pub(crate) mod source;


/// Default limit of node nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Decoder configuration.
///
/// The default configuration accepts every well-formed FBX 7.4 and 7.5 binary.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    max_depth: usize,
    strict_end_offsets: bool,
    memory_stats: Option<MemoryStats>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            strict_end_offsets: false,
            memory_stats: None,
        }
    }
}

impl ParserConfig {
    /// Creates a new config with default options.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the maximum nesting of nodes.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets whether a node ending elsewhere than its declared end offset is an error.
    pub fn strict_end_offsets(mut self, strict: bool) -> Self {
        self.strict_end_offsets = strict;
        self
    }

    /// Accounts the memory of the decoded document in the given counter.
    pub fn memory_stats(mut self, stats: MemoryStats) -> Self {
        self.memory_stats = Some(stats);
        self
    }

    /// Decodes a whole FBX binary stream with this configuration.
    ///
    /// On failure, everything decoded so far is released before the error is returned.
    /// Footer bytes after the last top-level node are not read.
    pub fn parse<R: Read>(self, source: R) -> Result<Document> {
        let mut reader = source::ByteReader::new(source);
        let version = parser::read_file_header(&mut reader)?;
        let alloc = match self.memory_stats {
            Some(ref stats) => Allocator::with_stats(stats.clone()),
            None => Allocator::new(),
        };
        let mut parser = parser::Parser::new(reader, self, alloc, version)?;
        let roots = parser.read_node_list(0);
        let end = parser.finish();
        let roots = roots?;
        debug!("FBX binary decoded: {} top-level nodes, {} bytes read", roots.len(), end);
        Ok(Document::new(version, NodeList::new(roots)))
    }
}

/// Decodes a whole FBX binary stream with the default configuration.
pub fn parse<R: Read>(source: R) -> Result<Document> {
    ParserConfig::new().parse(source)
}
