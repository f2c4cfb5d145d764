// SPDX-License-Identifier: MIT
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

// Core Modules
pub mod core;
pub mod fs;

// Reusable types and traits
pub use self::core::traits::*;

// Filesystem APIs
#[cfg(feature = "xv6")]
/// xv6 filesystem image model and checker.
///
/// See [`xv6::Xv6Checker`], [`xv6::Xv6Meta`] and [`xv6::Xv6ImageBuilder`].
pub mod xv6 {
    pub use super::fs::xv6::prelude::*;
}
