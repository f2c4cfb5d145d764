// SPDX-License-Identifier: MIT

use core::fmt;

/// Result type for block IO operations.
pub type BlockIOResult<T = ()> = core::result::Result<T, BlockIOError>;

/// Error type for block IO operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockIOError {
    Other(&'static str),
    /// The read ended before the buffer was filled.
    ShortRead { offset: u64, len: usize },
    OutOfBounds,
}

impl BlockIOError {
    pub fn msg(&self) -> &'static str {
        match self {
            BlockIOError::Other(msg) => msg,
            BlockIOError::ShortRead { .. } => "Short read",
            BlockIOError::OutOfBounds => "Out of bounds",
        }
    }
}

impl From<&'static str> for BlockIOError {
    #[inline]
    fn from(msg: &'static str) -> Self {
        BlockIOError::Other(msg)
    }
}

impl fmt::Display for BlockIOError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())?;
        if let BlockIOError::ShortRead { offset, len } = self {
            write!(f, " ({len} bytes at offset {offset:#x})")?;
        }
        Ok(())
    }
}

impl core::error::Error for BlockIOError {}
