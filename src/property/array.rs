//! Contains array property decoding.

use std::io::{self, Read};
use std::mem;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::alloc::{Allocator, Array};
use crate::error::{Error, Result};
use crate::inflate::InflateCodec;
use crate::property::Property;
use crate::reader::source::ByteReader;


/// Byte size of the zlib header preceding deflate data in compressed arrays.
const DEFLATE_MARKER_LEN: usize = 2;

/// Header of array type property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayHeader {
    /// Number of values in the array, *NOT byte size*.
    pub num_elements: usize,
    /// Denotes whether data in stream is plain (0) or deflate compressed.
    pub encoding: u32,
    /// Byte size of the array value in the stream.
    pub byte_len: usize,
}

impl ArrayHeader {
    /// Reads `ArrayHeader` from the given stream.
    pub fn read_from<R: Read>(reader: &mut ByteReader<R>) -> Result<Self> {
        let num_elements = reader.u32()? as usize;
        let encoding = reader.u32()?;
        let byte_len = reader.u32()? as usize;
        Ok(ArrayHeader {
            num_elements: num_elements,
            encoding: encoding,
            byte_len: byte_len,
        })
    }
}

/// Boolean value of a stored byte: only `0x00` and `'T'` are false.
pub fn decode_bool(val: u8) -> bool {
    val != 0x00 && val != b'T'
}

/// Reads the payload of an array property of the given type code.
pub fn read_array<R: Read>(
    reader: &mut ByteReader<R>,
    alloc: &mut Allocator,
    codec: &mut InflateCodec,
    type_code: u8,
    limit: u64,
) -> Result<Property> {
    let header = ArrayHeader::read_from(reader)?;
    reader.check_fits(header.byte_len, limit)?;
    Ok(match type_code {
        b'b' => Property::VecBool(read_elements(reader, alloc, codec, &header, read_bools)?),
        b'i' => Property::VecI32(read_elements(reader, alloc, codec, &header, |r, d| r.read_i32_into::<LittleEndian>(d))?),
        b'l' => Property::VecI64(read_elements(reader, alloc, codec, &header, |r, d| r.read_i64_into::<LittleEndian>(d))?),
        b'f' => Property::VecF32(read_elements(reader, alloc, codec, &header, |r, d| r.read_f32_into::<LittleEndian>(d))?),
        b'd' => Property::VecF64(read_elements(reader, alloc, codec, &header, |r, d| r.read_f64_into::<LittleEndian>(d))?),
        _ => unreachable!("array type codes are dispatched by the caller"),
    })
}

/// Decodes boolean bytes in place of `read_*_into` for `bool`.
///
/// Shares the rule of scalar booleans.
fn read_bools(reader: &mut dyn Read, dest: &mut [bool]) -> io::Result<()> {
    let mut buf = [0_u8; 256];
    for chunk in dest.chunks_mut(buf.len()) {
        let bytes = &mut buf[..chunk.len()];
        reader.read_exact(bytes)?;
        for (val, &byte) in chunk.iter_mut().zip(bytes.iter()) {
            *val = decode_bool(byte);
        }
    }
    Ok(())
}

fn read_elements<R, T, F>(
    reader: &mut ByteReader<R>,
    alloc: &mut Allocator,
    codec: &mut InflateCodec,
    header: &ArrayHeader,
    read_into: F,
) -> Result<Array<T>>
where
    R: Read,
    T: Copy + Default,
    F: Fn(&mut dyn Read, &mut [T]) -> io::Result<()>,
{
    let elem_size = mem::size_of::<T>();

    if header.encoding == 0 {
        let expected_len = header.num_elements.checked_mul(elem_size);
        if expected_len != Some(header.byte_len) {
            error!("Plain array of {} elements has {} bytes of data", header.num_elements, header.byte_len);
            return Err(Error::DataError(format!(
                "plain array of {} elements of {} bytes each has {} bytes of data",
                header.num_elements, elem_size, header.byte_len)));
        }
        // Read the payload first, so that a bogus length in a truncated stream allocates nothing.
        let raw = reader.read_handle(alloc, header.byte_len)?;
        let mut array = alloc.alloc_array::<T>(header.num_elements)?;
        let mut bytes: &[u8] = &raw;
        read_into(&mut bytes, array.as_mut_slice())?;
        return Ok(array);
    }

    if header.encoding != 1 {
        warn!("Unknown property array encoding {}, decoding as deflate", header.encoding);
    }
    if header.byte_len < DEFLATE_MARKER_LEN {
        error!("Compressed array data is too short ({} bytes)", header.byte_len);
        return Err(Error::DataError(format!("compressed array data is too short ({} bytes)", header.byte_len)));
    }
    // Deflate cannot expand data by more than 1032:1.
    let max_len = header.byte_len.saturating_mul(1032);
    if header.num_elements.saturating_mul(elem_size) > max_len {
        error!("Compressed array of {} bytes cannot hold {} elements", header.byte_len, header.num_elements);
        return Err(Error::DataError(format!(
            "compressed array of {} bytes cannot hold {} elements",
            header.byte_len, header.num_elements)));
    }
    let _marker = reader.i16()?;
    let compressed = reader.read_handle(alloc, header.byte_len - DEFLATE_MARKER_LEN)?;
    let mut array = alloc.alloc_array::<T>(header.num_elements)?;
    let mut stream = codec.bind(&compressed);
    read_into(&mut stream, array.as_mut_slice()).map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => {
            Error::DataError(format!("compressed array ended before {} elements", header.num_elements))
        },
        _ => Error::DataError(format!("cannot inflate array: {}", err)),
    })?;
    Ok(array)
}
