//! This crate provides a decoder from FBX binary to an in-memory node tree.
//!
//! FBX data consists of generic node and node properties, and it requires interpretation to use as
//! 3D contents.
//! This crate gives direct access to the node tree (for example, to pull out vertex, index and
//! normal arrays), not a scene importer.
//!
//! Only FBX binary of versions 7400 to 7599 is supported. FBX ASCII reader and FBX writer are
//! not implemented.
//!
//! ```no_run
//! # fn main() -> fbx_tree::Result<()> {
//! let file = std::io::BufReader::new(std::fs::File::open("dice.fbx")?);
//! let doc = fbx_tree::parse(file)?;
//! let geometry = doc.find("Objects")?.find("Geometry")?;
//! let vertices = geometry.find("Vertices")?.properties()[0].as_f64_array()?;
//! println!("{} vertices", vertices.len() / 3);
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate log;

pub use crate::alloc::{Allocator, Array, Handle, HandleMut, MemoryStats};
pub use crate::document::Document;
pub use crate::error::{Error, Result};
pub use crate::node::{Node, NodeList};
pub use crate::property::{Property, PropertyType};
pub use crate::reader::{parse, ParserConfig};

pub mod alloc;
pub mod document;
pub mod error;
pub mod inflate;
pub mod node;
pub mod property;
pub mod reader;
