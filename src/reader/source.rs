//! Contains the position-tracking primitive reader.

use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::alloc::{Allocator, Handle, HandleMut, SMALL_OBJECT_THRESHOLD};
use crate::error::{Error, Result};


/// Sequential little-endian reader over a byte stream.
///
/// Counts consumed bytes, so that node end offsets can be compared with the current position.
/// Nothing is buffered; every byte is consumed once in stream order.
pub struct ByteReader<R> {
    inner: R,
    pos: u64,
}

impl<R: Read> ByteReader<R> {
    pub fn new(inner: R) -> Self {
        ByteReader {
            inner: inner,
            pos: 0,
        }
    }

    /// Returns the number of bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Fills `buf` completely, or fails with `TruncatedInput`.
    pub fn read_exact_buf(&mut self, buf: &mut [u8]) -> Result<()> {
        Ok(self.read_exact(buf)?)
    }

    /// Fails with `DataError` if `len` bytes from here would run past `limit`.
    pub fn check_fits(&self, len: usize, limit: u64) -> Result<()> {
        let end = self.pos.checked_add(len as u64);
        if end.map_or(true, |end| end > limit) {
            error!("{} bytes at offset {} run past the end of the property list ({})", len, self.pos, limit);
            return Err(Error::DataError(format!(
                "{} bytes at offset {} run past the end of the property list ({})",
                len, self.pos, limit)));
        }
        Ok(())
    }

    /// Reads `len` bytes into a new writable allocation.
    ///
    /// Owned allocations grow with the bytes actually read, so a bogus length in a truncated
    /// stream fails with `TruncatedInput` without committing `len` bytes first.
    pub fn read_buf(&mut self, alloc: &mut Allocator, len: usize) -> Result<HandleMut> {
        if len <= SMALL_OBJECT_THRESHOLD {
            let mut buf = alloc.alloc(len)?;
            self.read_exact_buf(&mut buf)?;
            return Ok(buf);
        }
        let mut vec = Vec::new();
        let read = self.by_ref().take(len as u64).read_to_end(&mut vec)?;
        if read != len {
            return Err(Error::TruncatedInput);
        }
        Ok(alloc.adopt(vec))
    }

    /// Reads `len` bytes into a new allocation.
    pub fn read_handle(&mut self, alloc: &mut Allocator, len: usize) -> Result<Handle> {
        self.read_buf(alloc, len).map(HandleMut::freeze)
    }

    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.read_u8()?)
    }

    pub fn i16(&mut self) -> Result<i16> {
        Ok(self.read_i16::<LittleEndian>()?)
    }

    pub fn i32(&mut self) -> Result<i32> {
        Ok(self.read_i32::<LittleEndian>()?)
    }

    pub fn u32(&mut self) -> Result<u32> {
        Ok(self.read_u32::<LittleEndian>()?)
    }

    pub fn i64(&mut self) -> Result<i64> {
        Ok(self.read_i64::<LittleEndian>()?)
    }

    pub fn u64(&mut self) -> Result<u64> {
        Ok(self.read_u64::<LittleEndian>()?)
    }

    pub fn f32(&mut self) -> Result<f32> {
        Ok(self.read_f32::<LittleEndian>()?)
    }

    pub fn f64(&mut self) -> Result<f64> {
        Ok(self.read_f64::<LittleEndian>()?)
    }
}

impl<R: Read> Read for ByteReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = self.inner.read(buf)?;
        self.pos += len as u64;
        Ok(len)
    }
}
