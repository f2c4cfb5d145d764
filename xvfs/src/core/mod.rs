// SPDX-License-Identifier: MIT

// === Sub-modules ===
pub mod checker;
pub mod errors;
pub mod filesystem;
mod macros;
pub mod meta;
pub mod utils;

// === Core Traits ===
pub mod traits {
    pub use super::checker::FsChecker;
    pub use super::filesystem::FsFilesystem;
    pub use super::meta::FsMeta;
}

// === Error types ===
pub use errors::*;
