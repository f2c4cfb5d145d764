// SPDX-License-Identifier: MIT

use xvio::XvIO;

use crate::core::FsParsingResult;
use crate::core::traits::*;
use crate::fs::xv6::traits::*;

pub struct Xv6;

impl<'a> FsFilesystem<'a> for Xv6 {
    type Meta = Xv6Meta;
    type Unit = u32;
    type Checker = Xv6Checker<'a, dyn XvIO + 'a>;

    fn read_meta(io: &mut (dyn XvIO + 'a)) -> FsParsingResult<Self::Meta> {
        Xv6Meta::read(io)
    }

    fn checker(io: &'a mut (dyn XvIO + 'a), meta: &'a Self::Meta) -> Self::Checker {
        Xv6Checker::new(io, meta)
    }

    fn identifier() -> &'static str {
        "xv6"
    }
}
