// SPDX-License-Identifier: MIT

// === Blocks ===

/// Bytes per block.
pub const XV6_BLOCK_SIZE: usize = 512;

/// Block holding the superblock. Block 0 is the unused boot block.
pub const XV6_SUPERBLOCK_BLOCK: u32 = 1;

/// First block of the inode table.
pub const XV6_INODE_START: u32 = 2;

/// Bitmap bits per bitmap block.
pub const XV6_BITS_PER_BLOCK: u32 = (XV6_BLOCK_SIZE * 8) as u32;

// === Inodes ===

pub const XV6_INODE_SIZE: usize = 64;

/// Inodes per block (IPB).
pub const XV6_INODES_PER_BLOCK: u32 = (XV6_BLOCK_SIZE / XV6_INODE_SIZE) as u32;

pub const XV6_ROOT_INODE: u32 = 1;

pub const XV6_NDIRECT: usize = 12;

/// Block numbers held by the indirect block.
pub const XV6_NINDIRECT: usize = XV6_BLOCK_SIZE / 4;

/// Largest file size in blocks.
pub const XV6_MAX_FILE_BLOCKS: usize = XV6_NDIRECT + XV6_NINDIRECT;

// Inode type tags
pub const XV6_T_FREE: i16 = 0;
pub const XV6_T_DIR: i16 = 1;
pub const XV6_T_FILE: i16 = 2;
pub const XV6_T_DEV: i16 = 3;

// === Directories ===

/// Width of the NUL-padded name field.
pub const XV6_DIRSIZ: usize = 14;

pub const XV6_DIRENT_SIZE: usize = 2 + XV6_DIRSIZ;

pub const XV6_DIRENTS_PER_BLOCK: usize = XV6_BLOCK_SIZE / XV6_DIRENT_SIZE;

/// Slots of a directory's first block reserved for "." and "..".
pub const XV6_SELF_SLOT: usize = 0;
pub const XV6_PARENT_SLOT: usize = 1;
