// SPDX-License-Identifier: MIT

pub use crate::core::meta::*;

use xvio::{XvIO, XvIOExt, XvIOStructExt};

use crate::core::{FsParsingError, FsParsingResult};
use crate::fs::xv6::{constant::*, types::Xv6Superblock};

/// Region boundaries of an xv6 image, derived from its superblock.
///
/// All block ranges are half-open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Xv6Meta {
    /// Image size in blocks as recorded by the superblock.
    pub image_blocks: u32,
    /// Number of data blocks (`nblocks`).
    pub data_blocks: u32,
    /// Number of inodes, inode 0 included.
    pub inode_count: u32,

    pub inode_start: u32,
    pub inode_blocks: u32,
    pub bitmap_start: u32,
    pub bitmap_blocks: u32,
    pub data_start: u32,
    pub data_end: u32,
}

impl Xv6Meta {
    /// Computes the layout described by `sb`.
    ///
    /// `bitmap_start = 3 + ceil(ninodes / IPB)`,
    /// `data_start = bitmap_start + ceil(nblocks / (B * 8))`,
    /// `data_end = data_start + nblocks`.
    pub fn from_superblock(sb: &Xv6Superblock) -> FsParsingResult<Self> {
        const OVERFLOW: FsParsingError = FsParsingError::Invalid("superblock layout overflows");

        let bitmap_start = sb
            .ninodes
            .div_ceil(XV6_INODES_PER_BLOCK)
            .checked_add(3)
            .ok_or(OVERFLOW)?;
        let bitmap_blocks = sb.nblocks.div_ceil(XV6_BITS_PER_BLOCK);
        let data_start = bitmap_start.checked_add(bitmap_blocks).ok_or(OVERFLOW)?;
        let data_end = data_start.checked_add(sb.nblocks).ok_or(OVERFLOW)?;

        Ok(Self {
            image_blocks: sb.size,
            data_blocks: sb.nblocks,
            inode_count: sb.ninodes,
            inode_start: XV6_INODE_START,
            inode_blocks: bitmap_start - XV6_INODE_START,
            bitmap_start,
            bitmap_blocks,
            data_start,
            data_end,
        })
    }

    /// Reads the superblock from `io` and checks the image holds every
    /// block the layout names.
    pub fn read<IO: XvIO + ?Sized>(io: &mut IO) -> FsParsingResult<Self> {
        let offset = XV6_SUPERBLOCK_BLOCK as u64 * XV6_BLOCK_SIZE as u64;
        let sb: Xv6Superblock = io.read_struct(offset)?;
        let meta = Self::from_superblock(&sb)?;

        let available = io.block_count(XV6_BLOCK_SIZE)?;
        let needed = meta.data_end as u64;
        if available < needed {
            return Err(FsParsingError::Geometry { needed, available });
        }
        Ok(meta)
    }

    /// Block and slot holding inode `inum`.
    #[inline]
    pub fn inode_location(&self, inum: u32) -> (u32, usize) {
        (
            self.inode_start + inum / XV6_INODES_PER_BLOCK,
            (inum % XV6_INODES_PER_BLOCK) as usize,
        )
    }

    /// Bitmap bit index of a data block.
    #[inline]
    pub fn data_index(&self, block: u32) -> Option<usize> {
        self.is_valid_unit(block)
            .then(|| (block - self.data_start) as usize)
    }
}

impl FsMeta<u32> for Xv6Meta {
    fn unit_size(&self) -> usize {
        XV6_BLOCK_SIZE
    }

    fn unit_offset(&self, block: u32) -> u64 {
        block as u64 * XV6_BLOCK_SIZE as u64
    }

    fn first_data_unit(&self) -> u32 {
        self.data_start
    }

    fn end_data_unit(&self) -> u32 {
        self.data_end
    }
}

#[cfg(all(test, feature = "std", feature = "mem"))]
mod tests {
    use super::*;
    use xvio::prelude::MemXvIO;
    use zerocopy::IntoBytes;

    fn image_with(sb: Xv6Superblock, blocks: usize) -> Vec<u8> {
        let mut img = vec![0u8; blocks * XV6_BLOCK_SIZE];
        let off = XV6_SUPERBLOCK_BLOCK as usize * XV6_BLOCK_SIZE;
        img[off..off + Xv6Superblock::SIZE].copy_from_slice(sb.as_bytes());
        img
    }

    #[test]
    fn test_layout_ceil_division() {
        let meta = Xv6Meta::from_superblock(&Xv6Superblock::new(1024, 995, 200)).unwrap();
        assert_eq!(meta.bitmap_start, 3 + 25);
        assert_eq!(meta.bitmap_blocks, 1);
        assert_eq!(meta.data_start, 29);
        assert_eq!(meta.data_end, 29 + 995);
        assert_eq!(meta.inode_blocks, 26);

        // One inode past a block boundary needs a whole extra block.
        let meta = Xv6Meta::from_superblock(&Xv6Superblock::new(0, 4097, 201)).unwrap();
        assert_eq!(meta.bitmap_start, 3 + 26);
        assert_eq!(meta.bitmap_blocks, 2);
    }

    #[test]
    fn test_data_region_bounds() {
        let meta = Xv6Meta::from_superblock(&Xv6Superblock::new(0, 100, 16)).unwrap();
        assert!(!meta.is_valid_unit(meta.data_start - 1));
        assert!(meta.is_valid_unit(meta.data_start));
        assert!(meta.is_valid_unit(meta.data_end - 1));
        assert!(!meta.is_valid_unit(meta.data_end));
        assert_eq!(meta.data_index(meta.data_start + 5), Some(5));
        assert_eq!(meta.data_index(meta.data_end), None);
        assert_eq!(meta.unit_offset(meta.data_start), meta.data_start as u64 * 512);
    }

    #[test]
    fn test_inode_location() {
        let meta = Xv6Meta::from_superblock(&Xv6Superblock::new(0, 100, 64)).unwrap();
        assert_eq!(meta.inode_location(1), (2, 1));
        assert_eq!(meta.inode_location(17), (4, 1));
    }

    #[test]
    fn test_overflow_rejected() {
        let sb = Xv6Superblock::new(0, u32::MAX, 64);
        assert!(Xv6Meta::from_superblock(&sb).is_err());
    }

    #[test]
    fn test_read_checks_geometry() {
        let sb = Xv6Superblock::new(64, 40, 16);
        let img = image_with(sb, 64);
        let meta = Xv6Meta::read(&mut MemXvIO::new(&img)).unwrap();
        assert_eq!(meta.data_end, 3 + 2 + 1 + 40);

        let short = image_with(sb, 20);
        let err = Xv6Meta::read(&mut MemXvIO::new(&short)).unwrap_err();
        assert_eq!(
            err,
            FsParsingError::Geometry {
                needed: 46,
                available: 20
            }
        );
    }

    #[test]
    fn test_read_tiny_image() {
        let img = [0u8; 300];
        assert!(matches!(
            Xv6Meta::read(&mut MemXvIO::new(&img)),
            Err(FsParsingError::IO(_))
        ));
    }
}
