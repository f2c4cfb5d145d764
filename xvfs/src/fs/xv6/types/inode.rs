// SPDX-License-Identifier: MIT
//! xv6 on-disk inode

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::core::FsParsingError;
use crate::fs::xv6::constant::*;

/// Decoded inode type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InodeKind {
    Free,
    Dir,
    File,
    Dev,
}

impl InodeKind {
    /// Maps a raw tag onto a kind; `None` for anything outside `0..=3`.
    pub fn from_raw(raw: i16) -> Option<Self> {
        match raw {
            XV6_T_FREE => Some(Self::Free),
            XV6_T_DIR => Some(Self::Dir),
            XV6_T_FILE => Some(Self::File),
            XV6_T_DEV => Some(Self::Dev),
            _ => None,
        }
    }

    pub fn raw(self) -> i16 {
        match self {
            Self::Free => XV6_T_FREE,
            Self::Dir => XV6_T_DIR,
            Self::File => XV6_T_FILE,
            Self::Dev => XV6_T_DEV,
        }
    }
}

/// On-disk inode record (64 bytes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct DiskInode {
    /// Type tag (0 free, 1 dir, 2 file, 3 device)
    pub itype: i16,
    /// Device major number
    pub major: i16,
    /// Device minor number
    pub minor: i16,
    /// Number of directory entries naming this inode
    pub nlink: i16,
    /// File size in bytes
    pub size: u32,
    /// Direct block numbers followed by the indirect block number
    pub addrs: [u32; XV6_NDIRECT + 1],
}

impl DiskInode {
    pub fn new(kind: InodeKind, nlink: i16) -> Self {
        Self {
            itype: kind.raw(),
            nlink,
            ..Self::default()
        }
    }

    pub fn device(major: i16, minor: i16) -> Self {
        Self {
            itype: XV6_T_DEV,
            major,
            minor,
            nlink: 1,
            ..Self::default()
        }
    }

    pub fn kind(&self) -> Option<InodeKind> {
        InodeKind::from_raw(self.itype)
    }

    /// A tag of zero or below never names a live inode.
    pub fn is_free(&self) -> bool {
        self.itype <= XV6_T_FREE
    }

    pub fn is_dir(&self) -> bool {
        self.itype == XV6_T_DIR
    }

    pub fn direct(&self) -> &[u32] {
        &self.addrs[..XV6_NDIRECT]
    }

    pub fn indirect(&self) -> u32 {
        self.addrs[XV6_NDIRECT]
    }

    /// Decodes inode number `slot` of an inode table block.
    pub fn decode(block: &[u8], slot: usize) -> Result<Self, FsParsingError> {
        let off = slot
            .checked_mul(XV6_INODE_SIZE)
            .ok_or(FsParsingError::Corrupted)?;
        let bytes = block
            .get(off..off + XV6_INODE_SIZE)
            .ok_or(FsParsingError::Invalid("inode slot outside block"))?;
        Self::read_from_bytes(bytes).map_err(|_| FsParsingError::Corrupted)
    }
}
