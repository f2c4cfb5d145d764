// SPDX-License-Identifier: MIT

/// Counters collected while walking the inode table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkerStats {
    /// Number of inodes visited by the walk (free ones included).
    pub inodes_checked: usize,
    /// Number of directory inodes whose entries were scanned.
    pub dirs_visited: usize,
    /// Number of non-free directory entries scanned.
    pub entries_scanned: usize,
    /// Number of data block pointers followed (direct and indirect).
    pub blocks_referenced: usize,
    /// Number of indirect blocks seen.
    pub indirect_blocks: usize,
}

impl WalkerStats {
    pub fn new() -> Self {
        Self::default()
    }
}
