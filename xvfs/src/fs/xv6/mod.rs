// SPDX-License-Identifier: MIT
pub mod builder;
pub mod checker;
pub mod constant;
pub mod filesystem;
pub mod ledger;
pub mod meta;
pub mod resolver;
pub mod types;

use xvio::XvIO;

use crate::core::FsResult;
use crate::core::checker::{FsChecker, VerifyReport};
use self::traits::{Xv6CheckOptions, Xv6Checker, Xv6Meta};

// Public Interface
pub mod traits {
    pub use super::builder::Xv6ImageBuilder;
    pub use super::checker::{Xv6CheckOptions, Xv6Checker};
    pub use super::filesystem::Xv6;
    pub use super::ledger::RefLedger;
    pub use super::meta::Xv6Meta;
    pub use super::resolver::Xv6Resolver;
}

pub mod prelude {
    pub use super::constant::*;
    pub use super::traits::*;
    pub use super::types::*;
    pub use super::{check_image, check_image_with};
    pub use crate::core::checker::{Finding, Severity, VerifyPhases, VerifyReport};
    pub use crate::core::errors::*;
    pub use crate::core::traits::*;
    pub use xvio::prelude::*;
}

/// Checks a whole image with default options.
///
/// The first inconsistency found is returned as
/// `FsError::Checker(FsCheckerError::Inconsistent(_))`; read failures and
/// a superblock that does not fit the image come back as IO or parsing
/// errors.
pub fn check_image<IO: XvIO + ?Sized>(io: &mut IO) -> FsResult<VerifyReport> {
    check_image_with(io, &Xv6CheckOptions::default())
}

pub fn check_image_with<IO: XvIO + ?Sized>(
    io: &mut IO,
    opt: &Xv6CheckOptions,
) -> FsResult<VerifyReport> {
    let meta = Xv6Meta::read(io)?;
    let mut checker = Xv6Checker::new(io, &meta);
    Ok(checker.check_with(opt)?)
}
