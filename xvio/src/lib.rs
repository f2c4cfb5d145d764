// SPDX-License-Identifier: MIT
#![cfg_attr(not(feature = "std"), no_std)]

// Core modules
pub mod errors;

// Backend modules
#[cfg(feature = "mem")]
mod mem;

#[cfg(feature = "std")]
mod file;

// Prelude re-exports (central entrypoint)
pub mod prelude {
    pub use super::XvIO;
    pub use super::XvIOExt;
    pub use super::XvIOStructExt;
    pub use super::errors::*;

    #[cfg(feature = "mem")]
    pub use super::mem::MemXvIO;

    #[cfg(feature = "std")]
    pub use super::file::StdXvIO;
}

// Internal use
use errors::*;

// Constants

/// Size of the internal scratch buffer used by chunked and struct reads.
pub const BLOCK_BUF_SIZE: usize = 4096;

// Traits

/// Read-only block IO abstraction.
///
/// Implementations may target RAM or files. No write path exists: an
/// image handed to the checker is never modified.
pub trait XvIO {
    /// Reads `buf.len()` bytes into `buf` from `offset` (absolute).
    ///
    /// A read that cannot fill `buf` entirely is an error.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> BlockIOResult;

    /// Total size of the backing storage in bytes.
    fn size_bytes(&mut self) -> BlockIOResult<u64>;
}

/// Extension helpers for XvIO.
///
/// Provides:
/// - chunked reads
/// - fixed-size block reads
pub trait XvIOExt: XvIO {
    /// Reads `buf.len()` bytes from `offset` in chunks of `chunk_size` or less.
    #[inline(always)]
    fn read_in_chunks(&mut self, offset: u64, buf: &mut [u8], chunk_size: usize) -> BlockIOResult {
        let mut remaining = buf.len();
        let mut off = offset;
        let mut pos = 0;

        while remaining > 0 {
            let to_read = remaining.min(chunk_size);
            self.read_at(off, &mut buf[pos..pos + to_read])?;
            off += to_read as u64;
            pos += to_read;
            remaining -= to_read;
        }

        Ok(())
    }

    /// Reads block `index` of an image made of `N`-byte blocks.
    #[inline(always)]
    fn read_block<const N: usize>(&mut self, index: u64) -> BlockIOResult<[u8; N]> {
        let offset = index
            .checked_mul(N as u64)
            .ok_or(BlockIOError::OutOfBounds)?;
        let mut buf = [0u8; N];
        self.read_at(offset, &mut buf)?;
        Ok(buf)
    }

    /// Reads `count` consecutive `N`-byte blocks starting at `first` into `buf`.
    ///
    /// `buf` must be exactly `count * N` bytes long.
    #[inline(always)]
    fn read_blocks<const N: usize>(&mut self, first: u64, count: usize, buf: &mut [u8]) -> BlockIOResult {
        if buf.len() != count * N {
            return Err(BlockIOError::Other("read_blocks: buffer length mismatch"));
        }
        let offset = first
            .checked_mul(N as u64)
            .ok_or(BlockIOError::OutOfBounds)?;
        self.read_in_chunks(offset, buf, BLOCK_BUF_SIZE)
    }

    /// Number of whole `block_size` blocks held by the storage.
    #[inline]
    fn block_count(&mut self, block_size: usize) -> BlockIOResult<u64> {
        Ok(self.size_bytes()? / block_size as u64)
    }
}

impl<T: XvIO + ?Sized> XvIOExt for T {}

/// Extension trait for reading structs using zerocopy.
pub trait XvIOStructExt: XvIO {
    /// Reads a struct of type `T` from the given offset.
    fn read_struct<T: zerocopy::FromBytes + zerocopy::KnownLayout + zerocopy::Immutable>(
        &mut self,
        offset: u64,
    ) -> BlockIOResult<T> {
        let size = core::mem::size_of::<T>();
        if size > BLOCK_BUF_SIZE {
            return Err(BlockIOError::Other("read_struct: type too large"));
        }
        let mut buf = [0u8; BLOCK_BUF_SIZE];
        self.read_at(offset, &mut buf[..size])?;
        T::read_from_bytes(&buf[..size]).map_err(|_| BlockIOError::Other("read_struct failed"))
    }
}

impl<T: XvIO + ?Sized> XvIOStructExt for T {}
