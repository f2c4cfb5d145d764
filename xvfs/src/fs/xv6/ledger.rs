// SPDX-License-Identifier: MIT

//! Expected-versus-observed reference counters.
//!
//! Counters are seeded from the inode table and the bitmap, then moved
//! toward zero as the walk observes pointers and directory entries. What
//! remains afterwards is what the image got wrong.

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::{vec, vec::Vec};

use crate::core::utils::BitmapOps;
use crate::core::{AddressKind, Inconsistency};
use crate::fs::xv6::constant::*;
use crate::fs::xv6::meta::Xv6Meta;
use crate::fs::xv6::types::{DiskInode, InodeKind};

/// Per-inode counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InodeTally {
    /// Raw type tag read from disk.
    pub raw: i16,
    /// Files: stored link count minus directory entries naming the inode.
    pub links: i32,
    /// Directories: 1 minus parent entries naming the inode.
    pub dir_refs: i32,
    /// Non-free inode from the table scan.
    pub allocated: bool,
    /// Directory entries (aliases included) naming the inode.
    pub seen: u32,
}

impl InodeTally {
    pub fn kind(&self) -> Option<InodeKind> {
        InodeKind::from_raw(self.raw)
    }

    pub fn is_free(&self) -> bool {
        self.raw <= XV6_T_FREE
    }
}

/// Per-data-block counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockTally {
    /// Bitmap bit.
    pub marked: bool,
    /// Bitmap bit minus pointers reaching the block.
    pub bitmap: i32,
    /// Pointers reaching the block through an indirect path.
    pub indirect: u32,
}

#[derive(Debug, Clone)]
pub struct RefLedger {
    inodes: Vec<InodeTally>,
    blocks: Vec<BlockTally>,
    data_start: u32,
}

impl RefLedger {
    pub fn new(meta: &Xv6Meta) -> Self {
        Self {
            inodes: vec![InodeTally::default(); meta.inode_count as usize],
            blocks: vec![BlockTally::default(); meta.data_blocks as usize],
            data_start: meta.data_start,
        }
    }

    /// Records the expected reference counts of one inode.
    pub fn seed_inode(&mut self, inum: u32, ino: &DiskInode) {
        let Some(t) = self.inodes.get_mut(inum as usize) else {
            return;
        };
        t.raw = ino.itype;
        if inum == 0 {
            return;
        }
        match ino.kind() {
            Some(InodeKind::File) => {
                t.links = ino.nlink as i32;
                t.allocated = true;
            }
            Some(InodeKind::Dir) => {
                t.dir_refs = 1;
                t.allocated = true;
            }
            Some(InodeKind::Dev) => t.allocated = true,
            Some(InodeKind::Free) | None => {}
        }
    }

    /// Records the bitmap bit of every data block.
    pub fn seed_bitmap(&mut self, bitmap: &[u8]) {
        for (i, t) in self.blocks.iter_mut().enumerate() {
            t.marked = bitmap.get_bit(i);
            t.bitmap = t.marked as i32;
        }
    }

    pub fn block(&self, block: u32) -> Option<&BlockTally> {
        let idx = block.checked_sub(self.data_start)?;
        self.blocks.get(idx as usize)
    }

    pub fn inode(&self, inum: u32) -> Option<&InodeTally> {
        self.inodes.get(inum as usize)
    }

    /// Counts one pointer reaching data block `block`.
    pub fn claim_block(&mut self, block: u32, via: AddressKind) {
        let Some(t) = block
            .checked_sub(self.data_start)
            .and_then(|idx| self.blocks.get_mut(idx as usize))
        else {
            return;
        };
        t.bitmap -= 1;
        if via == AddressKind::Indirect {
            t.indirect += 1;
        }
    }

    /// Counts one entry of directory `dir` naming `inum`.
    ///
    /// `alias` marks the self and parent slots, which never count as a
    /// parent link for a directory.
    pub fn name_inode(&mut self, dir: u32, inum: u32, alias: bool) -> Result<(), Inconsistency> {
        let t = self
            .inodes
            .get_mut(inum as usize)
            .ok_or(Inconsistency::DirectoryEntryOutOfRange { dir, inode: inum })?;
        if t.is_free() {
            return Err(Inconsistency::InodeReferencedButFree { dir, inode: inum });
        }
        match t.kind() {
            Some(InodeKind::File) => t.links -= 1,
            Some(InodeKind::Dir) if !alias => t.dir_refs -= 1,
            _ => {}
        }
        t.seen += 1;
        Ok(())
    }

    /// Data blocks with their block numbers, in ascending order.
    pub fn blocks(&self) -> impl Iterator<Item = (u32, &BlockTally)> + '_ {
        let start = self.data_start;
        self.blocks
            .iter()
            .enumerate()
            .map(move |(i, t)| (start + i as u32, t))
    }

    /// Inodes with their numbers, in ascending order.
    pub fn inodes(&self) -> impl Iterator<Item = (u32, &InodeTally)> + '_ {
        self.inodes.iter().enumerate().map(|(i, t)| (i as u32, t))
    }

    /// Number of allocated inodes of `kind`.
    pub fn count_kind(&self, kind: InodeKind) -> usize {
        self.inodes
            .iter()
            .filter(|t| t.allocated && t.kind() == Some(kind))
            .count()
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::fs::xv6::types::Xv6Superblock;

    fn ledger() -> (Xv6Meta, RefLedger) {
        let meta = Xv6Meta::from_superblock(&Xv6Superblock::new(0, 16, 8)).unwrap();
        let ledger = RefLedger::new(&meta);
        (meta, ledger)
    }

    #[test]
    fn test_seed_inodes() {
        let (_, mut l) = ledger();
        l.seed_inode(1, &DiskInode::new(InodeKind::Dir, 1));
        l.seed_inode(2, &DiskInode::new(InodeKind::File, 3));
        l.seed_inode(3, &DiskInode::device(1, 1));
        l.seed_inode(4, &DiskInode::default());

        assert_eq!(l.inode(1).unwrap().dir_refs, 1);
        assert_eq!(l.inode(2).unwrap().links, 3);
        assert!(l.inode(3).unwrap().allocated);
        assert!(!l.inode(4).unwrap().allocated);
        assert_eq!(l.count_kind(InodeKind::File), 1);
    }

    #[test]
    fn test_name_inode_counts() {
        let (_, mut l) = ledger();
        l.seed_inode(1, &DiskInode::new(InodeKind::Dir, 1));
        l.seed_inode(2, &DiskInode::new(InodeKind::Dir, 1));
        l.seed_inode(3, &DiskInode::new(InodeKind::File, 1));

        l.name_inode(2, 2, true).unwrap();
        l.name_inode(2, 1, true).unwrap();
        assert_eq!(l.inode(2).unwrap().dir_refs, 1);

        l.name_inode(1, 2, false).unwrap();
        l.name_inode(1, 3, false).unwrap();
        assert_eq!(l.inode(2).unwrap().dir_refs, 0);
        assert_eq!(l.inode(2).unwrap().seen, 2);
        assert_eq!(l.inode(3).unwrap().links, 0);
    }

    #[test]
    fn test_name_inode_rejects() {
        let (_, mut l) = ledger();
        assert_eq!(
            l.name_inode(1, 5, false),
            Err(Inconsistency::InodeReferencedButFree { dir: 1, inode: 5 })
        );
        assert_eq!(
            l.name_inode(1, 8, false),
            Err(Inconsistency::DirectoryEntryOutOfRange { dir: 1, inode: 8 })
        );
    }

    #[test]
    fn test_bitmap_counters() {
        let (meta, mut l) = ledger();
        l.seed_bitmap(&[0b0000_0011]);
        let b0 = meta.data_start;

        l.claim_block(b0, AddressKind::Direct);
        l.claim_block(b0 + 1, AddressKind::Indirect);
        l.claim_block(b0 + 1, AddressKind::Direct);
        l.claim_block(meta.data_end, AddressKind::Direct);

        assert_eq!(l.block(b0).unwrap().bitmap, 0);
        let t = l.block(b0 + 1).unwrap();
        assert_eq!((t.bitmap, t.indirect), (-1, 1));
        assert!(!l.block(b0 + 2).unwrap().marked);
        assert!(l.block(b0 - 1).is_none());
        assert_eq!(l.blocks().count(), 16);
    }
}
