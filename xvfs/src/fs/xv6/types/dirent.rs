// SPDX-License-Identifier: MIT
//! xv6 directory entry

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::core::FsParsingError;
use crate::fs::xv6::constant::*;

/// On-disk directory entry (16 bytes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct DirEntry {
    /// Inode number, 0 for a free slot
    pub inum: u16,
    /// NUL-padded name
    pub name: [u8; XV6_DIRSIZ],
}

impl DirEntry {
    /// Builds an entry; names longer than the field are truncated.
    pub fn new(inum: u16, name: &str) -> Self {
        let mut field = [0u8; XV6_DIRSIZ];
        let bytes = name.as_bytes();
        let n = bytes.len().min(XV6_DIRSIZ);
        field[..n].copy_from_slice(&bytes[..n]);
        Self { inum, name: field }
    }

    pub fn dot(inum: u16) -> Self {
        Self::new(inum, ".")
    }

    pub fn dotdot(parent: u16) -> Self {
        Self::new(parent, "..")
    }

    pub fn is_free(&self) -> bool {
        self.inum == 0
    }

    /// Name up to the first NUL.
    pub fn name_str(&self) -> Option<&str> {
        let end = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(XV6_DIRSIZ);
        core::str::from_utf8(&self.name[..end]).ok()
    }

    /// Decodes entry number `slot` of a directory block.
    pub fn decode(block: &[u8], slot: usize) -> Result<Self, FsParsingError> {
        let off = slot
            .checked_mul(XV6_DIRENT_SIZE)
            .ok_or(FsParsingError::Corrupted)?;
        let bytes = block
            .get(off..off + XV6_DIRENT_SIZE)
            .ok_or(FsParsingError::Invalid("dirent slot outside block"))?;
        Self::read_from_bytes(bytes).map_err(|_| FsParsingError::Corrupted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        assert_eq!(core::mem::size_of::<DirEntry>(), XV6_DIRENT_SIZE);
        assert_eq!(XV6_DIRENTS_PER_BLOCK, 32);
    }

    #[test]
    fn test_names() {
        assert_eq!(DirEntry::dot(4).name_str(), Some("."));
        assert_eq!(DirEntry::dotdot(1).name_str(), Some(".."));
        let long = DirEntry::new(9, "a_very_long_file_name");
        assert_eq!(long.name_str(), Some("a_very_long_fi"));
        assert!(DirEntry::default().is_free());
    }

    #[test]
    fn test_decode_slot() {
        let mut block = [0u8; XV6_BLOCK_SIZE];
        let e = DirEntry::new(7, "README");
        block[2 * XV6_DIRENT_SIZE..3 * XV6_DIRENT_SIZE].copy_from_slice(e.as_bytes());
        assert_eq!(block[2 * XV6_DIRENT_SIZE], 7);
        assert_eq!(DirEntry::decode(&block, 2).unwrap(), e);
        assert!(DirEntry::decode(&block, XV6_DIRENTS_PER_BLOCK).is_err());
    }
}
