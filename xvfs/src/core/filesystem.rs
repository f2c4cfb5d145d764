// SPDX-License-Identifier: MIT

use xvio::XvIO;

use crate::core::FsParsingResult;
use crate::core::traits::{FsChecker, FsMeta};

/// Unified trait representing a checkable filesystem.
pub trait FsFilesystem<'a> {
    /// Type of static metadata (e.g. `Xv6Meta`).
    type Meta: FsMeta<Self::Unit> + Clone + 'a;

    /// Logical allocation unit (block number).
    type Unit: Ord + Copy;

    /// Checker responsible for internal structural validations of the FS.
    type Checker: FsChecker + 'a;

    /// Decodes and validates the layout from the image.
    fn read_meta(io: &mut (dyn XvIO + 'a)) -> FsParsingResult<Self::Meta>;

    /// Creates a new checker from the metadata.
    fn checker(io: &'a mut (dyn XvIO + 'a), meta: &'a Self::Meta) -> Self::Checker;

    /// Optional: FS name for dynamic identification.
    fn identifier() -> &'static str {
        "UNKNOWN"
    }
}
