// SPDX-License-Identifier: MIT

pub mod dirent;
pub mod indirect;
pub mod inode;
pub mod superblock;

pub use dirent::*;
pub use indirect::*;
pub use inode::*;
pub use superblock::*;
