//! Contains the allocator backing decoded byte strings and arrays.
//!
//! Allocations larger than [`SMALL_OBJECT_THRESHOLD`] are owned individually.
//! Smaller ones are carved out of a shared pool block of [`POOL_BLOCK_SIZE`] bytes, so that
//! the many short names and strings of an FBX file do not cost one heap allocation each.
//! A pool block is released when the allocator and every handle borrowing from it are dropped.

use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::{Bytes, BytesMut};

use crate::error::{Error, Result};


/// Allocations larger than this are owned by their handle.
pub const SMALL_OBJECT_THRESHOLD: usize = 128;
/// Byte size of a pool block.
pub const POOL_BLOCK_SIZE: usize = 4096;

/// Counter of bytes allocated for decoded data and not yet released.
///
/// Clones share the same counter.
#[derive(Debug, Default, Clone)]
pub struct MemoryStats {
    live: Arc<AtomicUsize>,
}

impl MemoryStats {
    /// Creates a new counter starting at zero.
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns the number of bytes currently allocated.
    pub fn live_bytes(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    fn lease(&self, size: usize) -> Lease {
        self.live.fetch_add(size, Ordering::AcqRel);
        Lease {
            stats: self.clone(),
            size: size,
        }
    }
}

/// Accounting record of one allocation; releases its bytes from the counter on drop.
struct Lease {
    stats: MemoryStats,
    size: usize,
}

impl Drop for Lease {
    fn drop(&mut self) {
        self.stats.live.fetch_sub(self.size, Ordering::AcqRel);
    }
}

enum Owner {
    Null,
    Owned(Lease),
    Borrowed(Arc<Lease>),
}

/// Writable allocation, not yet shared.
pub struct HandleMut {
    buf: BufMut,
    owner: Owner,
}

enum BufMut {
    Owned(Vec<u8>),
    Pooled(BytesMut),
}

impl HandleMut {
    fn null() -> Self {
        HandleMut {
            buf: BufMut::Owned(Vec::new()),
            owner: Owner::Null,
        }
    }

    /// Turns the allocation into a read-only handle without copying.
    pub fn freeze(self) -> Handle {
        let bytes = match self.buf {
            BufMut::Owned(vec) => Bytes::from(vec),
            BufMut::Pooled(buf) => buf.freeze(),
        };
        Handle {
            bytes: bytes,
            owner: self.owner,
        }
    }
}

impl Deref for HandleMut {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self.buf {
            BufMut::Owned(ref v) => v,
            BufMut::Pooled(ref b) => b,
        }
    }
}

impl DerefMut for HandleMut {
    fn deref_mut(&mut self) -> &mut [u8] {
        match self.buf {
            BufMut::Owned(ref mut v) => v,
            BufMut::Pooled(ref mut b) => b,
        }
    }
}

/// Read-only view of an allocation.
///
/// The view is either the sole owner of its bytes, or borrows a range of a pool block.
pub struct Handle {
    bytes: Bytes,
    owner: Owner,
}

impl Handle {
    /// Returns `true` if the handle refers to no memory (zero-sized allocation).
    pub fn is_null(&self) -> bool {
        match self.owner {
            Owner::Null => true,
            _ => false,
        }
    }

    /// Returns `true` if the handle owns its bytes.
    pub fn is_owned(&self) -> bool {
        match self.owner {
            Owner::Owned(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if the handle borrows from a pool block.
    pub fn is_borrowed(&self) -> bool {
        match self.owner {
            Owner::Borrowed(_) => true,
            _ => false,
        }
    }

    /// Returns the viewed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Deref for Handle {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for Handle {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.owner {
            Owner::Null => "null",
            Owner::Owned(_) => "owned",
            Owner::Borrowed(_) => "borrowed",
        };
        f.debug_struct("Handle")
            .field("kind", &kind)
            .field("bytes", &String::from_utf8_lossy(&self.bytes))
            .finish()
    }
}

/// Owned typed buffer used for numeric and boolean arrays.
pub struct Array<T> {
    data: Vec<T>,
    _lease: Option<Lease>,
}

impl<T> Array<T> {
    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T> Deref for Array<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T: fmt::Debug> fmt::Debug for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}

struct PoolBlock {
    free: BytesMut,
    lease: Arc<Lease>,
}

/// Allocator for the data of one parse.
pub struct Allocator {
    stats: MemoryStats,
    pool: Option<PoolBlock>,
}

impl Allocator {
    /// Creates an allocator accounting to a fresh counter.
    pub fn new() -> Self {
        Allocator::with_stats(MemoryStats::new())
    }

    /// Creates an allocator accounting to the given counter.
    pub fn with_stats(stats: MemoryStats) -> Self {
        Allocator {
            stats: stats,
            pool: None,
        }
    }

    pub fn stats(&self) -> &MemoryStats {
        &self.stats
    }

    /// Allocates `size` zeroed bytes.
    pub fn alloc(&mut self, size: usize) -> Result<HandleMut> {
        if size == 0 {
            return Ok(HandleMut::null());
        }
        if size > SMALL_OBJECT_THRESHOLD {
            let mut vec = Vec::new();
            vec.try_reserve_exact(size).map_err(|_| Error::AllocationFailure(size))?;
            vec.resize(size, 0);
            return Ok(HandleMut {
                buf: BufMut::Owned(vec),
                owner: Owner::Owned(self.stats.lease(size)),
            });
        }
        Ok(self.borrow_from_pool(size))
    }

    /// Takes over bytes read elsewhere as an owned allocation.
    pub fn adopt(&mut self, mut vec: Vec<u8>) -> HandleMut {
        if vec.is_empty() {
            return HandleMut::null();
        }
        vec.shrink_to_fit();
        let size = vec.len();
        HandleMut {
            buf: BufMut::Owned(vec),
            owner: Owner::Owned(self.stats.lease(size)),
        }
    }

    fn borrow_from_pool(&mut self, size: usize) -> HandleMut {
        let has_room = self.pool.as_ref().map_or(false, |block| block.free.capacity() >= size);
        if !has_room {
            if let Some(block) = self.pool.take() {
                trace!("Pool block retired with {} unused bytes", block.free.capacity());
            }
        }
        let stats = &self.stats;
        let block = self.pool.get_or_insert_with(|| PoolBlock {
            free: BytesMut::with_capacity(POOL_BLOCK_SIZE),
            lease: Arc::new(stats.lease(POOL_BLOCK_SIZE)),
        });
        // `free` is always empty; its capacity is the unused tail of the block.
        block.free.resize(size, 0);
        let piece = block.free.split_to(size);
        HandleMut {
            buf: BufMut::Pooled(piece),
            owner: Owner::Borrowed(block.lease.clone()),
        }
    }

    /// Allocates a zeroed array of `len` elements.
    pub fn alloc_array<T: Copy + Default>(&mut self, len: usize) -> Result<Array<T>> {
        let size = len.checked_mul(mem::size_of::<T>()).ok_or(Error::AllocationFailure(usize::MAX))?;
        if size == 0 {
            return Ok(Array {
                data: Vec::new(),
                _lease: None,
            });
        }
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| Error::AllocationFailure(size))?;
        data.resize(len, T::default());
        Ok(Array {
            data: data,
            _lease: Some(self.stats.lease(size)),
        })
    }

    /// Releases a handle, and returns the number of bytes freed by it.
    ///
    /// Borrowed and null handles free nothing by themselves.
    pub fn free(&mut self, handle: Handle) -> usize {
        match handle.owner {
            Owner::Owned(ref lease) => lease.size,
            _ => 0,
        }
    }

    /// Drops the reference to the current pool block.
    ///
    /// Blocks still borrowed by handles stay alive until those are dropped.
    pub fn cleanup(&mut self) {
        self.pool = None;
    }
}

impl Default for Allocator {
    fn default() -> Self {
        Allocator::new()
    }
}
