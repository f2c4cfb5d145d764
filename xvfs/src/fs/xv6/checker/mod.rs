// SPDX-License-Identifier: MIT
#[cfg(all(not(feature = "std"), feature = "alloc"))]
use ::alloc::format;

pub use crate::core::checker::*;
use crate::core::Inconsistency;
use crate::core::utils::BitmapOps;
use crate::fs::xv6::constant::*;
use crate::fs::xv6::ledger::RefLedger;
use crate::fs::xv6::meta::*;
use crate::fs::xv6::resolver::Xv6Resolver;
use crate::fs::xv6::types::{DiskInode, InodeKind};
use crate::{bail, ensure};
use xvio::prelude::*;

mod bitmap;
mod blocks;
mod dirs;

#[derive(Clone, Debug)]
pub struct Xv6CheckOptions {
    pub phases: VerifyPhases,
    /// Report a non-root directory that no parent names.
    pub flag_orphan_directories: bool,
}

impl Default for Xv6CheckOptions {
    fn default() -> Self {
        Self {
            phases: VerifyPhases::ALL,
            flag_orphan_directories: true,
        }
    }
}

impl VerifierOptionsLike for Xv6CheckOptions {
    fn phases(&self) -> VerifyPhases {
        self.phases
    }
}

pub struct Xv6Checker<'a, IO: XvIO + ?Sized> {
    res: Xv6Resolver<'a, IO>,
    ledger: RefLedger,
    stats: WalkerStats,
}

impl<'a, IO: XvIO + ?Sized> Xv6Checker<'a, IO> {
    pub fn new(io: &'a mut IO, meta: &'a Xv6Meta) -> Self {
        Self {
            res: Xv6Resolver::new(io, meta),
            ledger: RefLedger::new(meta),
            stats: WalkerStats::new(),
        }
    }

    pub fn stats(&self) -> &WalkerStats {
        &self.stats
    }

    pub fn ledger(&self) -> &RefLedger {
        &self.ledger
    }

    /// Calls `f` for inodes `1..ninodes`, one inode table block at a time.
    fn for_each_inode<F>(&mut self, mut f: F) -> FsCheckerResult
    where
        F: FnMut(&mut Self, u32, &DiskInode) -> FsCheckerResult,
    {
        let count = self.res.meta().inode_count;
        let mut first = 0;
        while first < count {
            let table = self.res.read_inode_block(first)?;
            for (slot, ino) in table.iter().enumerate() {
                let inum = first + slot as u32;
                if inum == 0 || inum >= count {
                    continue;
                }
                f(self, inum, ino)?;
            }
            first += XV6_INODES_PER_BLOCK;
        }
        Ok(())
    }
}

impl<'a, IO: XvIO + ?Sized> FsChecker for Xv6Checker<'a, IO> {
    type Options = Xv6CheckOptions;

    fn check_seed(&mut self, _opt: &Self::Options, rep: &mut VerifyReport) -> FsCheckerResult {
        let meta = self.res.meta();
        ensure!(meta.inode_count > XV6_ROOT_INODE, Inconsistency::RootDirectoryMissing);

        rep.push(Finding::info(
            "LAYOUT",
            format!(
                "{} inodes in blocks [{}, {}), bitmap [{}, {}), data [{}, {})",
                meta.inode_count,
                meta.inode_start,
                meta.bitmap_start,
                meta.bitmap_start,
                meta.data_start,
                meta.data_start,
                meta.data_end
            ),
        ));

        // Inode 0 only carries its type tag.
        let zero = self.res.get_inode(0)?;
        self.ledger.seed_inode(0, &zero);
        self.for_each_inode(|ck, inum, ino| {
            ck.ledger.seed_inode(inum, ino);
            Ok(())
        })?;

        let bitmap = self.res.read_bitmap()?;
        self.ledger.seed_bitmap(&bitmap);

        rep.push(Finding::info(
            "INODE.SEED",
            format!(
                "{} directories, {} files, {} devices allocated",
                self.ledger.count_kind(InodeKind::Dir),
                self.ledger.count_kind(InodeKind::File),
                self.ledger.count_kind(InodeKind::Dev)
            ),
        ));
        rep.push(Finding::info(
            "BITMAP.SEED",
            format!(
                "{} of {} data blocks marked in use",
                bitmap.count_ones_in_range(0, meta.data_blocks as usize),
                meta.data_blocks
            ),
        ));
        Ok(())
    }

    fn check_walk(&mut self, _opt: &Self::Options, rep: &mut VerifyReport) -> FsCheckerResult {
        self.for_each_inode(|ck, inum, ino| {
            ck.stats.inodes_checked += 1;
            if ino.kind().is_none() {
                bail!(Inconsistency::BadInodeType {
                    inode: inum,
                    raw: ino.itype,
                });
            }
            if inum == XV6_ROOT_INODE && !ino.is_dir() {
                bail!(Inconsistency::RootDirectoryMissing);
            }
            blocks::walk_inode(&mut ck.res, &mut ck.ledger, &mut ck.stats, inum, ino)
        })?;

        let s = &self.stats;
        rep.push(Finding::info(
            "WALK",
            format!(
                "Walked {} inodes, {} directories, {} entries",
                s.inodes_checked, s.dirs_visited, s.entries_scanned
            ),
        ));
        rep.push(Finding::info(
            "WALK.BLOCKS",
            format!(
                "{} data blocks referenced, {} indirect blocks",
                s.blocks_referenced, s.indirect_blocks
            ),
        ));
        Ok(())
    }

    fn check_bitmap(&mut self, _opt: &Self::Options, rep: &mut VerifyReport) -> FsCheckerResult {
        bitmap::check_bitmap(&self.ledger)?;
        rep.push(Finding::info("BITMAP", "Bitmap matches block usage"));
        Ok(())
    }

    fn check_residual(&mut self, opt: &Self::Options, rep: &mut VerifyReport) -> FsCheckerResult {
        for (inum, t) in self.ledger.inodes() {
            if t.dir_refs < 0 {
                bail!(Inconsistency::DirectoryReferencedMoreThanOnce { inode: inum });
            }
            if t.allocated && t.seen == 0 {
                bail!(Inconsistency::AllocatedButUnreferenced { inode: inum });
            }
            // Named only by its own "." entry.
            let orphan_dir = t.allocated
                && t.kind() == Some(InodeKind::Dir)
                && inum != XV6_ROOT_INODE
                && t.dir_refs == 1;
            if orphan_dir {
                if opt.flag_orphan_directories {
                    bail!(Inconsistency::AllocatedButUnreferenced { inode: inum });
                }
                rep.push(Finding::warn(
                    "DIR.ORPHAN",
                    format!("directory {inum} has no parent entry"),
                ));
            }
            if t.links != 0 {
                bail!(Inconsistency::BadFileReferenceCount {
                    inode: inum,
                    residual: t.links,
                });
            }
        }
        rep.push(Finding::info("REFS", "Reference counts consistent"));
        Ok(())
    }
}
