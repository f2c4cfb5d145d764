// SPDX-License-Identifier: MIT

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::{vec, vec::Vec};

use xvio::{XvIO, XvIOExt};

use crate::core::{FsParsingError, FsParsingResult};
use crate::fs::xv6::constant::*;
use crate::fs::xv6::meta::{FsMeta, Xv6Meta};
use crate::fs::xv6::types::{DirEntry, DiskInode, IndirectBlock};

/// Block-indexed read access to the structures of an xv6 image.
pub struct Xv6Resolver<'a, IO: XvIO + ?Sized> {
    io: &'a mut IO,
    meta: &'a Xv6Meta,
}

impl<'a, IO: XvIO + ?Sized> Xv6Resolver<'a, IO> {
    pub fn new(io: &'a mut IO, meta: &'a Xv6Meta) -> Self {
        Self { io, meta }
    }

    pub fn meta(&self) -> &'a Xv6Meta {
        self.meta
    }

    pub fn read_block(&mut self, block: u32) -> FsParsingResult<[u8; XV6_BLOCK_SIZE]> {
        Ok(self.io.read_block::<XV6_BLOCK_SIZE>(block as u64)?)
    }

    /// Reads the `IPB` inodes stored in the inode table block holding `first`.
    pub fn read_inode_block(
        &mut self,
        first: u32,
    ) -> FsParsingResult<[DiskInode; XV6_INODES_PER_BLOCK as usize]> {
        let (block, _) = self.meta.inode_location(first);
        let buf = self.read_block(block)?;
        let mut out = [DiskInode::default(); XV6_INODES_PER_BLOCK as usize];
        for (slot, ino) in out.iter_mut().enumerate() {
            *ino = DiskInode::decode(&buf, slot)?;
        }
        Ok(out)
    }

    pub fn get_inode(&mut self, inum: u32) -> FsParsingResult<DiskInode> {
        if inum >= self.meta.inode_count {
            return Err(FsParsingError::Invalid("inode number outside inode table"));
        }
        let (block, slot) = self.meta.inode_location(inum);
        let buf = self.read_block(block)?;
        DiskInode::decode(&buf, slot)
    }

    /// Every entry of a directory data block, free slots included.
    pub fn read_dir_entries(&mut self, block: u32) -> FsParsingResult<Vec<DirEntry>> {
        let buf = self.read_block(block)?;
        (0..XV6_DIRENTS_PER_BLOCK)
            .map(|slot| DirEntry::decode(&buf, slot))
            .collect()
    }

    pub fn read_indirect(&mut self, block: u32) -> FsParsingResult<IndirectBlock> {
        let buf = self.read_block(block)?;
        IndirectBlock::decode(&buf)
    }

    /// Raw bytes of every bitmap block, in order.
    pub fn read_bitmap(&mut self) -> FsParsingResult<Vec<u8>> {
        let count = self.meta.bitmap_blocks as usize;
        let mut buf = vec![0u8; count * self.meta.unit_size()];
        self.io
            .read_blocks::<XV6_BLOCK_SIZE>(self.meta.bitmap_start as u64, count, &mut buf)?;
        Ok(buf)
    }
}
