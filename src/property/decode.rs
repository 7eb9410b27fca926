//! Contains the per-property type dispatch.

use std::io::Read;

use crate::alloc::Allocator;
use crate::error::{Error, Result};
use crate::inflate::InflateCodec;
use crate::property::array::{decode_bool, read_array};
use crate::property::Property;
use crate::reader::source::ByteReader;


/// Replaces the namespace separators `0x00` and `0x01` with `:`.
pub fn sanitize(bytes: &mut [u8]) {
    for byte in bytes.iter_mut() {
        if *byte == 0x00 || *byte == 0x01 {
            *byte = b':';
        }
    }
}

/// Reads one property, type code included.
///
/// `limit` is the stream position where the node's property list ends; no payload may run past it.
pub fn read_property<R: Read>(
    reader: &mut ByteReader<R>,
    alloc: &mut Allocator,
    codec: &mut InflateCodec,
    limit: u64,
) -> Result<Property> {
    let position = reader.position();
    let type_code = reader.u8()?;
    Ok(match type_code {
        // 2-byte signed integer.
        b'Y' => Property::I16(reader.i16()?),
        // Boolean.
        // Blender writes 0x00/0x01, Autodesk products write 'T'/'Y'.
        b'C' => Property::Bool(decode_bool(reader.u8()?)),
        // 4-byte signed integer.
        b'I' => Property::I32(reader.i32()?),
        // 4-byte single-precision IEEE 754 floating-point number.
        b'F' => Property::F32(reader.f32()?),
        // 8-byte double-precision IEEE 754 floating-point number.
        b'D' => Property::F64(reader.f64()?),
        // 8-byte signed integer.
        b'L' => Property::I64(reader.i64()?),
        // String.
        b'S' => {
            let length = reader.u32()? as usize;
            reader.check_fits(length, limit)?;
            let mut buf = reader.read_buf(alloc, length)?;
            sanitize(&mut buf);
            Property::String(buf.freeze())
        },
        // Raw binary.
        b'R' => {
            let length = reader.u32()? as usize;
            reader.check_fits(length, limit)?;
            Property::Binary(reader.read_handle(alloc, length)?)
        },
        b'b' | b'i' | b'l' | b'f' | b'd' => read_array(reader, alloc, codec, type_code, limit)?,
        _ => {
            error!("Unknown type code {:#x} at offset {}", type_code, position);
            return Err(Error::UnrecognizedPropertyTag {
                tag: type_code,
                position: position,
            });
        },
    })
}
