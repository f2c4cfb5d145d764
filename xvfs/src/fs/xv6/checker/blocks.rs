// SPDX-License-Identifier: MIT

use super::dirs;
use crate::core::checker::{FsCheckerResult, WalkerStats};
use crate::core::{AddressKind, Inconsistency};
use crate::fs::xv6::constant::*;
use crate::fs::xv6::ledger::RefLedger;
use crate::fs::xv6::meta::{FsMeta, Xv6Meta};
use crate::fs::xv6::resolver::Xv6Resolver;
use crate::fs::xv6::types::DiskInode;
use xvio::XvIO;

/// Validates one pointer of inode `inum` and counts it.
fn claim(
    meta: &Xv6Meta,
    ledger: &mut RefLedger,
    inum: u32,
    block: u32,
    via: AddressKind,
) -> Result<(), Inconsistency> {
    if !meta.is_valid_unit(block) {
        return Err(match via {
            AddressKind::Direct => Inconsistency::BadDirectAddress { inode: inum, block },
            AddressKind::Indirect => Inconsistency::BadIndirectAddress { inode: inum, block },
        });
    }
    if !ledger.block(block).is_some_and(|t| t.marked) {
        return Err(Inconsistency::BlockMarkedFreeButUsed { inode: inum, block });
    }
    ledger.claim_block(block, via);
    Ok(())
}

/// Follows every pointer of one inode, scanning directory blocks on the way.
///
/// Free inodes are walked too: stale pointers in a freed inode still
/// claim their blocks.
pub(super) fn walk_inode<IO: XvIO + ?Sized>(
    res: &mut Xv6Resolver<'_, IO>,
    ledger: &mut RefLedger,
    stats: &mut WalkerStats,
    inum: u32,
    ino: &DiskInode,
) -> FsCheckerResult {
    let meta = res.meta();
    let is_dir = ino.is_dir();

    if is_dir {
        stats.dirs_visited += 1;
        // No first block means no "." and ".." entries.
        if ino.direct()[0] == 0 {
            let err = if inum == XV6_ROOT_INODE {
                Inconsistency::RootDirectoryMissing
            } else {
                Inconsistency::DirectoryMalformed { inode: inum }
            };
            return Err(err.into());
        }
    }

    for (slot, &addr) in ino.direct().iter().enumerate() {
        if addr == 0 {
            continue;
        }
        claim(meta, ledger, inum, addr, AddressKind::Direct)?;
        stats.blocks_referenced += 1;
        if is_dir {
            dirs::scan_dir_block(res, ledger, stats, inum, addr, slot == 0)?;
        }
    }

    let indirect = ino.indirect();
    if indirect == 0 {
        return Ok(());
    }
    claim(meta, ledger, inum, indirect, AddressKind::Indirect)?;
    stats.indirect_blocks += 1;

    let table = res.read_indirect(indirect)?;
    for addr in table.iter() {
        if addr == 0 {
            continue;
        }
        claim(meta, ledger, inum, addr, AddressKind::Indirect)?;
        stats.blocks_referenced += 1;
        if is_dir {
            dirs::scan_dir_block(res, ledger, stats, inum, addr, false)?;
        }
    }
    Ok(())
}
