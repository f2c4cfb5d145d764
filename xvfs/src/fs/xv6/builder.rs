// SPDX-License-Identifier: MIT

//! In-memory construction of xv6 images.
//!
//! The high-level calls (`add_dir`, `add_file`, `link`...) keep the image
//! consistent. The raw mutators write exactly what they are given, which
//! is how corrupt images are made.

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::{vec, vec::Vec};

use zerocopy::IntoBytes;

use crate::core::utils::BitmapOps;
use crate::core::{FsError, FsResult};
use crate::ensure;
use crate::fs::xv6::constant::*;
use crate::fs::xv6::meta::{FsMeta, Xv6Meta};
use crate::fs::xv6::types::{DirEntry, DiskInode, InodeKind, Xv6Superblock};

pub struct Xv6ImageBuilder {
    img: Vec<u8>,
    meta: Xv6Meta,
}

impl Xv6ImageBuilder {
    /// Formats an image with `ninodes` inodes and `nblocks` data blocks,
    /// holding an empty root directory.
    pub fn new(ninodes: u32, nblocks: u32) -> FsResult<Self> {
        ensure!(ninodes > XV6_ROOT_INODE, "image needs room for the root inode");
        ensure!(nblocks > 0, "image needs at least one data block");

        let mut meta = Xv6Meta::from_superblock(&Xv6Superblock::new(0, nblocks, ninodes))?;
        meta.image_blocks = meta.data_end;

        let mut b = Self {
            img: vec![0u8; meta.unit_offset(meta.data_end) as usize],
            meta,
        };
        b.set_superblock(&Xv6Superblock::new(meta.data_end, nblocks, ninodes))?;

        b.write_inode(XV6_ROOT_INODE, &DiskInode::new(InodeKind::Dir, 1))?;
        b.init_dir(XV6_ROOT_INODE, XV6_ROOT_INODE)?;
        Ok(b)
    }

    pub fn meta(&self) -> &Xv6Meta {
        &self.meta
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.img
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.img
    }

    // === Consistent construction ===

    /// Adds an empty directory named `name` under `parent`.
    pub fn add_dir(&mut self, parent: u32, name: &str) -> FsResult<u32> {
        let inum = self.alloc_inode(DiskInode::new(InodeKind::Dir, 1))?;
        self.init_dir(inum, parent)?;
        self.append_entry(parent, name, inum)?;
        Ok(inum)
    }

    /// Adds a regular file spanning `blocks` data blocks, direct pointers
    /// first, then through an indirect block.
    pub fn add_file(&mut self, parent: u32, name: &str, blocks: usize) -> FsResult<u32> {
        ensure!(blocks <= XV6_MAX_FILE_BLOCKS, "file too large");

        let mut ino = DiskInode::new(InodeKind::File, 1);
        ino.size = (blocks * XV6_BLOCK_SIZE) as u32;
        let mut table = [0u32; XV6_NINDIRECT];

        for i in 0..blocks {
            let b = self.alloc_block()?;
            if i < XV6_NDIRECT {
                ino.addrs[i] = b;
            } else {
                table[i - XV6_NDIRECT] = b;
            }
        }
        if blocks > XV6_NDIRECT {
            let ind = self.alloc_block()?;
            ino.addrs[XV6_NDIRECT] = ind;
            self.write_indirect(ind, &table)?;
        }

        let inum = self.alloc_inode(ino)?;
        self.append_entry(parent, name, inum)?;
        Ok(inum)
    }

    /// Adds a device node. Devices own no blocks.
    pub fn add_device(&mut self, parent: u32, name: &str, major: i16, minor: i16) -> FsResult<u32> {
        let inum = self.alloc_inode(DiskInode::device(major, minor))?;
        self.append_entry(parent, name, inum)?;
        Ok(inum)
    }

    /// Adds a hard link to an existing file and bumps its link count.
    pub fn link(&mut self, parent: u32, name: &str, target: u32) -> FsResult {
        let mut ino = self.read_inode(target)?;
        ensure!(ino.kind() == Some(InodeKind::File), "only files can be hard linked");
        ino.nlink += 1;
        self.write_inode(target, &ino)?;
        self.append_entry(parent, name, target)
    }

    /// Writes `name -> inum` into the first free slot of directory `dir`,
    /// growing it by one block when every slot is taken.
    pub fn append_entry(&mut self, dir: u32, name: &str, inum: u32) -> FsResult {
        let mut ino = self.read_inode(dir)?;
        ensure!(ino.is_dir(), "entries can only be added to a directory");
        let inum = u16::try_from(inum).map_err(|_| FsError::Other("inode number exceeds u16"))?;

        for i in 0..XV6_NDIRECT {
            let block = match ino.addrs[i] {
                0 => {
                    let b = self.alloc_block()?;
                    ino.addrs[i] = b;
                    b
                }
                b => b,
            };
            for slot in 0..XV6_DIRENTS_PER_BLOCK {
                if self.read_dirent(block, slot)?.is_free() {
                    self.write_dirent(block, slot, &DirEntry::new(inum, name))?;
                    let end = ((i * XV6_DIRENTS_PER_BLOCK + slot + 1) * XV6_DIRENT_SIZE) as u32;
                    ino.size = ino.size.max(end);
                    return self.write_inode(dir, &ino);
                }
            }
        }
        Err(FsError::Other("directory full"))
    }

    fn init_dir(&mut self, inum: u32, parent: u32) -> FsResult {
        let mut ino = self.read_inode(inum)?;
        let block = self.alloc_block()?;
        ino.addrs[0] = block;
        ino.size = (2 * XV6_DIRENT_SIZE) as u32;
        self.write_inode(inum, &ino)?;

        let (this, parent) = match (u16::try_from(inum), u16::try_from(parent)) {
            (Ok(a), Ok(b)) => (a, b),
            _ => return Err(FsError::Other("inode number exceeds u16")),
        };
        self.write_dirent(block, XV6_SELF_SLOT, &DirEntry::dot(this))?;
        self.write_dirent(block, XV6_PARENT_SLOT, &DirEntry::dotdot(parent))
    }

    fn alloc_inode(&mut self, ino: DiskInode) -> FsResult<u32> {
        for inum in XV6_ROOT_INODE + 1..self.meta.inode_count {
            if self.read_inode(inum)?.is_free() {
                self.write_inode(inum, &ino)?;
                return Ok(inum);
            }
        }
        Err(FsError::Other("out of inodes"))
    }

    /// Takes the lowest free data block, zeroed and marked in the bitmap.
    pub fn alloc_block(&mut self) -> FsResult<u32> {
        let limit = self.meta.data_blocks as usize;
        let free = self
            .bitmap_mut()
            .find_first_zero(0, limit)
            .ok_or(FsError::Other("out of data blocks"))?;
        let block = self.meta.data_start + free as u32;
        self.set_bitmap(block, true)?;
        self.block_mut(block)?.fill(0);
        Ok(block)
    }

    // === Raw mutators ===

    pub fn block_mut(&mut self, block: u32) -> FsResult<&mut [u8]> {
        let off = self.meta.unit_offset(block) as usize;
        self.img
            .get_mut(off..off + self.meta.unit_size())
            .ok_or(FsError::Other("block outside image"))
    }

    fn block(&self, block: u32) -> FsResult<&[u8]> {
        let off = self.meta.unit_offset(block) as usize;
        self.img
            .get(off..off + self.meta.unit_size())
            .ok_or(FsError::Other("block outside image"))
    }

    /// Overwrites the superblock. The builder keeps using the layout it
    /// was created with.
    pub fn set_superblock(&mut self, sb: &Xv6Superblock) -> FsResult {
        self.block_mut(XV6_SUPERBLOCK_BLOCK)?[..Xv6Superblock::SIZE].copy_from_slice(sb.as_bytes());
        Ok(())
    }

    pub fn superblock(&self) -> FsResult<Xv6Superblock> {
        Ok(Xv6Superblock::decode(self.block(XV6_SUPERBLOCK_BLOCK)?)?)
    }

    pub fn read_inode(&self, inum: u32) -> FsResult<DiskInode> {
        let (block, slot) = self.meta.inode_location(inum);
        ensure!(block < self.meta.bitmap_start, "inode outside inode table");
        Ok(DiskInode::decode(self.block(block)?, slot)?)
    }

    pub fn write_inode(&mut self, inum: u32, ino: &DiskInode) -> FsResult {
        let (block, slot) = self.meta.inode_location(inum);
        ensure!(block < self.meta.bitmap_start, "inode outside inode table");
        let off = slot * XV6_INODE_SIZE;
        self.block_mut(block)?[off..off + XV6_INODE_SIZE].copy_from_slice(ino.as_bytes());
        Ok(())
    }

    pub fn read_dirent(&self, block: u32, slot: usize) -> FsResult<DirEntry> {
        Ok(DirEntry::decode(self.block(block)?, slot)?)
    }

    pub fn write_dirent(&mut self, block: u32, slot: usize, e: &DirEntry) -> FsResult {
        ensure!(slot < XV6_DIRENTS_PER_BLOCK, "dirent slot outside block");
        let off = slot * XV6_DIRENT_SIZE;
        self.block_mut(block)?[off..off + XV6_DIRENT_SIZE].copy_from_slice(e.as_bytes());
        Ok(())
    }

    /// Writes a whole indirect table into `block`.
    pub fn write_indirect(&mut self, block: u32, table: &[u32; XV6_NINDIRECT]) -> FsResult {
        let buf = self.block_mut(block)?;
        for (chunk, addr) in buf.chunks_exact_mut(4).zip(table) {
            chunk.copy_from_slice(&addr.to_le_bytes());
        }
        Ok(())
    }

    /// Sets or clears the bitmap bit of data block `block`.
    pub fn set_bitmap(&mut self, block: u32, used: bool) -> FsResult {
        let idx = self
            .meta
            .data_index(block)
            .ok_or(FsError::Other("block outside data region"))?;
        self.bitmap_mut().set_bit(idx, used);
        Ok(())
    }

    fn bitmap_mut(&mut self) -> &mut [u8] {
        let start = self.meta.unit_offset(self.meta.bitmap_start) as usize;
        let end = self.meta.unit_offset(self.meta.first_data_unit()) as usize;
        &mut self.img[start..end]
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_new_formats_root() {
        let b = Xv6ImageBuilder::new(32, 64).unwrap();
        let meta = *b.meta();
        assert_eq!(b.as_bytes().len(), meta.data_end as usize * XV6_BLOCK_SIZE);
        assert_eq!(b.superblock().unwrap().nblocks, 64);

        let root = b.read_inode(XV6_ROOT_INODE).unwrap();
        assert!(root.is_dir());
        assert_eq!(root.addrs[0], meta.data_start);
        assert_eq!(b.read_dirent(meta.data_start, 0).unwrap(), DirEntry::dot(1));
        assert_eq!(b.read_dirent(meta.data_start, 1).unwrap(), DirEntry::dotdot(1));
    }

    #[test]
    fn test_add_file_uses_indirect() {
        let mut b = Xv6ImageBuilder::new(32, 64).unwrap();
        let f = b.add_file(XV6_ROOT_INODE, "big", XV6_NDIRECT + 3).unwrap();
        let ino = b.read_inode(f).unwrap();
        assert!(ino.direct().iter().all(|&a| a != 0));
        assert_ne!(ino.indirect(), 0);
        assert_eq!(ino.size as usize, (XV6_NDIRECT + 3) * XV6_BLOCK_SIZE);
    }

    #[test]
    fn test_link_bumps_nlink() {
        let mut b = Xv6ImageBuilder::new(32, 64).unwrap();
        let d = b.add_dir(XV6_ROOT_INODE, "d").unwrap();
        let f = b.add_file(d, "f", 1).unwrap();
        b.link(XV6_ROOT_INODE, "alias", f).unwrap();
        assert_eq!(b.read_inode(f).unwrap().nlink, 2);
        assert!(b.link(XV6_ROOT_INODE, "dir", d).is_err());
    }

    #[test]
    fn test_out_of_space() {
        let mut b = Xv6ImageBuilder::new(32, 4).unwrap();
        assert!(b.add_file(XV6_ROOT_INODE, "f", 5).is_err());

        let mut b = Xv6ImageBuilder::new(3, 64).unwrap();
        b.add_file(XV6_ROOT_INODE, "a", 0).unwrap();
        assert!(b.add_file(XV6_ROOT_INODE, "b", 0).is_err());
    }
}
