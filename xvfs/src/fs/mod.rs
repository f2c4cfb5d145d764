// SPDX-License-Identifier: MIT

#[cfg(feature = "xv6")]
pub mod xv6;
