// SPDX-License-Identifier: MIT

use crate::core::checker::{FsCheckerResult, WalkerStats};
use crate::core::Inconsistency;
use crate::ensure;
use crate::fs::xv6::constant::*;
use crate::fs::xv6::ledger::RefLedger;
use crate::fs::xv6::resolver::Xv6Resolver;
use xvio::XvIO;

/// Counts the entries of one data block of directory `dir`.
///
/// In the first block, slots 0 and 1 must hold "." and "..": the root's
/// both name inode 1, any other directory's self slot names itself.
/// Those two slots mark their targets as seen without counting as a
/// parent link.
pub(super) fn scan_dir_block<IO: XvIO + ?Sized>(
    res: &mut Xv6Resolver<'_, IO>,
    ledger: &mut RefLedger,
    stats: &mut WalkerStats,
    dir: u32,
    block: u32,
    first: bool,
) -> FsCheckerResult {
    let entries = res.read_dir_entries(block)?;
    let mut rest = &entries[..];

    if first {
        let this = entries[XV6_SELF_SLOT].inum as u32;
        let parent = entries[XV6_PARENT_SLOT].inum as u32;
        if dir == XV6_ROOT_INODE {
            ensure!(
                this == XV6_ROOT_INODE && parent == XV6_ROOT_INODE,
                Inconsistency::RootDirectoryMissing
            );
        } else {
            ensure!(this == dir, Inconsistency::DirectoryMalformed { inode: dir });
        }
        ledger.name_inode(dir, this, true)?;
        ledger.name_inode(dir, parent, true)?;
        stats.entries_scanned += 2;
        rest = &entries[XV6_PARENT_SLOT + 1..];
    }

    for e in rest.iter().filter(|e| !e.is_free()) {
        stats.entries_scanned += 1;
        ledger.name_inode(dir, e.inum as u32, false)?;
    }
    Ok(())
}
