//! Contains implementations of FBX parsers.

use std::io::Read;

use crate::alloc::Allocator;
use crate::error::{Error, Result};
use crate::inflate::InflateCodec;
use crate::node::{Node, NodeList};
use crate::property::decode::{read_property, sanitize};
use crate::reader::source::ByteReader;
use crate::reader::ParserConfig;


/// Magic binary at the head of FBX binary files.
pub const MAGIC: &[u8; 23] = b"Kaydara FBX Binary  \x00\x1a\x00";

/// Upper bound of properties reserved in advance for one node.
const PROPERTY_RESERVE_LIMIT: usize = 1024;

/// Width of the integer fields of node record headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    /// `u32` fields, versions 7400 to 7499.
    U32,
    /// `u64` fields, versions 7500 to 7599.
    U64,
}

impl FieldWidth {
    pub fn for_version(version: u32) -> Result<Self> {
        match version {
            7400..=7499 => Ok(FieldWidth::U32),
            7500..=7599 => Ok(FieldWidth::U64),
            _ => Err(Error::UnsupportedVersion(version)),
        }
    }
}

/// A header of a node record.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NodeRecordHeader {
    /// Position of the end of the node.
    pub end_offset: u64,
    /// Number of the properties the node has.
    pub num_properties: u64,
    /// Byte size of properties of the node in the FBX stream.
    pub property_byte_len: u64,
    /// Byte size of the node name.
    pub name_len: u8,
}

impl NodeRecordHeader {
    /// Constructs `NodeRecordHeader` from the given stream.
    pub fn read_from<R: Read>(reader: &mut ByteReader<R>, width: FieldWidth) -> Result<Self> {
        let (end_offset, num_properties, property_byte_len) = match width {
            FieldWidth::U32 => {
                let end_offset = reader.u32()?;
                let num_properties = reader.u32()?;
                let property_byte_len = reader.u32()?;
                (end_offset as u64, num_properties as u64, property_byte_len as u64)
            },
            FieldWidth::U64 => (reader.u64()?, reader.u64()?, reader.u64()?),
        };
        let name_len = reader.u8()?;

        Ok(NodeRecordHeader {
            end_offset: end_offset,
            num_properties: num_properties,
            property_byte_len: property_byte_len,
            name_len: name_len,
        })
    }

    /// Check whether the header indicates there are no more siblings.
    pub fn is_null_record(&self) -> bool {
        self.end_offset == 0
            && self.num_properties == 0
            && self.property_byte_len == 0
            && self.name_len == 0
    }
}

/// Reads the magic binary and the format version.
pub fn read_file_header<R: Read>(reader: &mut ByteReader<R>) -> Result<u32> {
    let mut magic = [0_u8; 23];
    reader.read_exact_buf(&mut magic)?;
    if magic != *MAGIC {
        return Err(Error::BadHeader);
    }
    let version = reader.u32()?;
    debug!("magic binary read, FBX binary (version={})", version);
    Ok(version)
}

/// Recursive-descent parser of node records.
pub struct Parser<R> {
    reader: ByteReader<R>,
    config: ParserConfig,
    alloc: Allocator,
    codec: InflateCodec,
    width: FieldWidth,
}

impl<R: Read> Parser<R> {
    /// Constructs a parser positioned right after the file header.
    pub fn new(reader: ByteReader<R>, config: ParserConfig, alloc: Allocator, version: u32) -> Result<Self> {
        let width = FieldWidth::for_version(version)?;
        Ok(Parser {
            reader: reader,
            config: config,
            alloc: alloc,
            codec: InflateCodec::new(),
            width: width,
        })
    }

    /// Reads sibling nodes up to and including the terminating null record.
    ///
    /// Nodes read so far are dropped if any of them fails.
    pub fn read_node_list(&mut self, depth: usize) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();
        while let Some(node) = self.read_node(depth)? {
            nodes.push(node);
        }
        Ok(nodes)
    }

    /// Reads one node record, or `None` for a null record.
    fn read_node(&mut self, depth: usize) -> Result<Option<Node>> {
        let header = NodeRecordHeader::read_from(&mut self.reader, self.width)?;
        if header.is_null_record() {
            return Ok(None);
        }
        if depth >= self.config.max_depth {
            error!("Node nesting exceeds the limit of {} levels", self.config.max_depth);
            return Err(Error::DepthLimitExceeded(self.config.max_depth));
        }
        // Every property takes at least its type code byte.
        if header.num_properties > header.property_byte_len {
            error!("Node record header is inconsistent: {:?}", header);
            return Err(Error::DataError(format!(
                "{} properties cannot fit in {} bytes",
                header.num_properties, header.property_byte_len)));
        }

        // Read the node name.
        let mut name = self.alloc.alloc(header.name_len as usize)?;
        self.reader.read_exact_buf(&mut name)?;
        sanitize(&mut name);
        let name = name.freeze();
        trace!("node {:?} at depth {}: {:?}", String::from_utf8_lossy(&name), depth, header);

        // Read the properties.
        let num_properties = header.num_properties as usize;
        let properties_end = self.reader.position().saturating_add(header.property_byte_len);
        // The count is untrusted; the vector grows past this as properties are actually read.
        let reserve = num_properties.min(PROPERTY_RESERVE_LIMIT);
        let mut properties = Vec::new();
        properties.try_reserve_exact(reserve)
            .map_err(|_| Error::AllocationFailure(reserve))?;
        for _ in 0..num_properties {
            properties.push(read_property(&mut self.reader, &mut self.alloc, &mut self.codec, properties_end)?);
        }

        // A node without properties always has a child list, even an empty one.
        let has_children = self.reader.position() < header.end_offset || num_properties == 0;
        let children = if has_children {
            self.read_node_list(depth + 1)?
        } else {
            Vec::new()
        };

        if self.reader.position() != header.end_offset {
            if self.config.strict_end_offsets {
                error!("Node does not end at expected position (expected {}, now at {})",
                       header.end_offset, self.reader.position());
                return Err(Error::DataError(format!(
                    "Node does not end at expected position (expected {}, now at {})",
                    header.end_offset, self.reader.position())));
            }
            warn!("Node does not end at expected position (expected {}, now at {})",
                  header.end_offset, self.reader.position());
        }

        Ok(Some(Node::new(name, properties, NodeList::new(children))))
    }

    /// Releases the allocator's pool block and returns the stream position.
    pub fn finish(mut self) -> u64 {
        self.alloc.cleanup();
        self.reader.position()
    }
}
