// SPDX-License-Identifier: MIT
//! xv6 indirect block

use zerocopy::FromBytes;

use crate::core::FsParsingError;
use crate::fs::xv6::constant::*;

/// Block numbers held by an indirect block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndirectBlock {
    pub addrs: [u32; XV6_NINDIRECT],
}

impl IndirectBlock {
    pub fn decode(block: &[u8]) -> Result<Self, FsParsingError> {
        let bytes = block
            .get(..XV6_BLOCK_SIZE)
            .ok_or(FsParsingError::Invalid("indirect block truncated"))?;
        let addrs = <[u32; XV6_NINDIRECT]>::read_from_bytes(bytes)
            .map_err(|_| FsParsingError::Corrupted)?;
        // Stored little-endian on disk.
        Ok(Self {
            addrs: addrs.map(u32::from_le),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.addrs.iter().copied()
    }
}
