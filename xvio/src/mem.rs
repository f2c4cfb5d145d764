// SPDX-License-Identifier: MIT

use crate::{BlockIOError, BlockIOResult, XvIO};

/// In-memory implementation of `XvIO`.
///
/// Useful for tests and for images already loaded in RAM.
#[derive(Debug)]
pub struct MemXvIO<'a> {
    buffer: &'a [u8],
}

impl<'a> MemXvIO<'a> {
    #[inline]
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer }
    }

    #[inline]
    fn check_bounds(&self, offset: u64, len: usize) -> BlockIOResult {
        let end = offset
            .checked_add(len as u64)
            .ok_or(BlockIOError::OutOfBounds)?;
        if offset > self.buffer.len() as u64 {
            return Err(BlockIOError::OutOfBounds);
        }
        if end > self.buffer.len() as u64 {
            return Err(BlockIOError::ShortRead { offset, len });
        }
        Ok(())
    }
}

impl<'a> XvIO for MemXvIO<'a> {
    #[inline(always)]
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> BlockIOResult {
        self.check_bounds(offset, buf.len())?;
        let start = offset as usize;
        buf.copy_from_slice(&self.buffer[start..start + buf.len()]);
        Ok(())
    }

    #[inline]
    fn size_bytes(&mut self) -> BlockIOResult<u64> {
        Ok(self.buffer.len() as u64)
    }
}
