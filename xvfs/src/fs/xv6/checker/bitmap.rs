// SPDX-License-Identifier: MIT

use crate::core::{AddressKind, Inconsistency};
use crate::fs::xv6::ledger::RefLedger;

/// Compares the bitmap against the pointers counted by the walk.
///
/// A counter left at 1 is a marked block nothing points to; a negative one
/// is a block claimed more than once. The first offending block in
/// ascending order is reported.
pub(super) fn check_bitmap(ledger: &RefLedger) -> Result<(), Inconsistency> {
    for (block, t) in ledger.blocks() {
        if t.bitmap == 1 {
            return Err(Inconsistency::BitmapMarksUnusedBlock { block });
        }
        if t.bitmap < 0 {
            let via = if t.indirect > 0 {
                AddressKind::Indirect
            } else {
                AddressKind::Direct
            };
            return Err(Inconsistency::AddressUsedMoreThanOnce { block, via });
        }
    }
    Ok(())
}
