// SPDX-License-Identifier: MIT
//! xv6 superblock

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::core::FsParsingError;

/// On-disk superblock, stored at the start of block 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct Xv6Superblock {
    /// Size of the whole image in blocks
    pub size: u32,
    /// Number of data blocks
    pub nblocks: u32,
    /// Number of inodes
    pub ninodes: u32,
    /// Number of log blocks (unused by the checker)
    pub nlog: u32,
}

impl Xv6Superblock {
    pub const SIZE: usize = core::mem::size_of::<Self>();

    pub fn new(size: u32, nblocks: u32, ninodes: u32) -> Self {
        Self {
            size,
            nblocks,
            ninodes,
            nlog: 0,
        }
    }

    /// Decodes the superblock from the head of `buf`.
    pub fn decode(buf: &[u8]) -> Result<Self, FsParsingError> {
        Self::read_from_prefix(buf)
            .map(|(sb, _)| sb)
            .map_err(|_| FsParsingError::Invalid("superblock truncated"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_little_endian() {
        let mut buf = [0u8; 512];
        buf[0..4].copy_from_slice(&1024u32.to_le_bytes());
        buf[4..8].copy_from_slice(&995u32.to_le_bytes());
        buf[8..12].copy_from_slice(&200u32.to_le_bytes());
        let sb = Xv6Superblock::decode(&buf).unwrap();
        assert_eq!(sb, Xv6Superblock::new(1024, 995, 200));
        assert_eq!(sb.as_bytes(), &buf[..16]);
    }

    #[test]
    fn test_decode_truncated() {
        assert!(Xv6Superblock::decode(&[0u8; 8]).is_err());
    }
}
