// SPDX-License-Identifier: MIT

use core::fmt;

pub use xvio::errors::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsParsingError {
    IO(BlockIOError),
    /// The superblock describes more blocks than the image holds.
    Geometry { needed: u64, available: u64 },
    Corrupted,
    Invalid(&'static str),
    Other(&'static str),
}

impl FsParsingError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsParsingError::IO(_) => "IO error",
            FsParsingError::Geometry { .. } => "Superblock geometry exceeds image size",
            FsParsingError::Corrupted => "Corrupted entry",
            FsParsingError::Invalid(msg) => msg,
            FsParsingError::Other(msg) => msg,
        }
    }
}

impl fmt::Display for FsParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())?;
        if let FsParsingError::Geometry { needed, available } = self {
            write!(f, " (needs {needed} blocks, image has {available})")?;
        }
        Ok(())
    }
}

impl core::error::Error for FsParsingError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            FsParsingError::IO(e) => Some(e),
            _ => None,
        }
    }
}

/// Which kind of pointer reached a block that is used more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    Direct,
    Indirect,
}

/// A structural violation found in an image.
///
/// Every variant is fatal: the checker stops at the first one it meets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inconsistency {
    BadInodeType { inode: u32, raw: i16 },
    RootDirectoryMissing,
    DirectoryMalformed { inode: u32 },
    BadDirectAddress { inode: u32, block: u32 },
    BadIndirectAddress { inode: u32, block: u32 },
    BlockMarkedFreeButUsed { inode: u32, block: u32 },
    AddressUsedMoreThanOnce { block: u32, via: AddressKind },
    BitmapMarksUnusedBlock { block: u32 },
    InodeReferencedButFree { dir: u32, inode: u32 },
    DirectoryEntryOutOfRange { dir: u32, inode: u32 },
    DirectoryReferencedMoreThanOnce { inode: u32 },
    AllocatedButUnreferenced { inode: u32 },
    BadFileReferenceCount { inode: u32, residual: i32 },
}

impl Inconsistency {
    /// Short stable identifier, in the style of report finding codes.
    pub fn code(&self) -> &'static str {
        match self {
            Inconsistency::BadInodeType { .. } => "INODE.TYPE",
            Inconsistency::RootDirectoryMissing => "ROOT.MISSING",
            Inconsistency::DirectoryMalformed { .. } => "DIR.FORMAT",
            Inconsistency::BadDirectAddress { .. } => "ADDR.DIRECT",
            Inconsistency::BadIndirectAddress { .. } => "ADDR.INDIRECT",
            Inconsistency::BlockMarkedFreeButUsed { .. } => "BITMAP.FREE",
            Inconsistency::AddressUsedMoreThanOnce { .. } => "ADDR.DUP",
            Inconsistency::BitmapMarksUnusedBlock { .. } => "BITMAP.UNUSED",
            Inconsistency::InodeReferencedButFree { .. } => "DIRENT.FREE",
            Inconsistency::DirectoryEntryOutOfRange { .. } => "DIRENT.RANGE",
            Inconsistency::DirectoryReferencedMoreThanOnce { .. } => "DIR.MULTI",
            Inconsistency::AllocatedButUnreferenced { .. } => "INODE.ORPHAN",
            Inconsistency::BadFileReferenceCount { .. } => "FILE.NLINK",
        }
    }

    pub fn msg(&self) -> &'static str {
        match self {
            Inconsistency::BadInodeType { .. } => "bad inode",
            Inconsistency::RootDirectoryMissing => "root directory does not exist",
            Inconsistency::DirectoryMalformed { .. } => "directory not properly formatted",
            Inconsistency::BadDirectAddress { .. } => "bad direct address in inode",
            Inconsistency::BadIndirectAddress { .. } => "bad indirect address in inode",
            Inconsistency::BlockMarkedFreeButUsed { .. } => {
                "address used by inode but marked free in bitmap"
            }
            Inconsistency::AddressUsedMoreThanOnce {
                via: AddressKind::Direct,
                ..
            } => "direct address used more than once",
            Inconsistency::AddressUsedMoreThanOnce {
                via: AddressKind::Indirect,
                ..
            } => "indirect address used more than once",
            Inconsistency::BitmapMarksUnusedBlock { .. } => {
                "bitmap marks block in use but it is not in use"
            }
            Inconsistency::InodeReferencedButFree { .. } => {
                "inode referred to in directory but marked free"
            }
            Inconsistency::DirectoryEntryOutOfRange { .. } => {
                "directory entry refers to an inode beyond the inode table"
            }
            Inconsistency::DirectoryReferencedMoreThanOnce { .. } => {
                "directory appears more than once in file system"
            }
            Inconsistency::AllocatedButUnreferenced { .. } => {
                "inode marked use but not found in a directory"
            }
            Inconsistency::BadFileReferenceCount { .. } => "bad reference count for file",
        }
    }
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ERROR: {}", self.msg())?;
        match *self {
            Inconsistency::BadInodeType { inode, raw } => write!(f, " (inode {inode}, type {raw})"),
            Inconsistency::RootDirectoryMissing => Ok(()),
            Inconsistency::DirectoryMalformed { inode }
            | Inconsistency::DirectoryReferencedMoreThanOnce { inode }
            | Inconsistency::AllocatedButUnreferenced { inode } => write!(f, " (inode {inode})"),
            Inconsistency::BadDirectAddress { inode, block }
            | Inconsistency::BadIndirectAddress { inode, block }
            | Inconsistency::BlockMarkedFreeButUsed { inode, block } => {
                write!(f, " (inode {inode}, block {block})")
            }
            Inconsistency::AddressUsedMoreThanOnce { block, .. }
            | Inconsistency::BitmapMarksUnusedBlock { block } => write!(f, " (block {block})"),
            Inconsistency::InodeReferencedButFree { dir, inode }
            | Inconsistency::DirectoryEntryOutOfRange { dir, inode } => {
                write!(f, " (directory {dir}, inode {inode})")
            }
            Inconsistency::BadFileReferenceCount { inode, residual } => {
                write!(f, " (inode {inode}, link count off by {residual})")
            }
        }
    }
}

impl core::error::Error for Inconsistency {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsCheckerError {
    IO(BlockIOError),
    Parsing(FsParsingError),
    Inconsistent(Inconsistency),
    Invalid(&'static str),
    Other(&'static str),
}

impl FsCheckerError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsCheckerError::IO(_) => "IO error",
            FsCheckerError::Parsing(_) => "Parsing error",
            FsCheckerError::Inconsistent(i) => i.msg(),
            FsCheckerError::Invalid(msg) => msg,
            FsCheckerError::Other(msg) => msg,
        }
    }

    /// The violation behind this error, if the image itself is inconsistent.
    pub fn inconsistency(&self) -> Option<&Inconsistency> {
        match self {
            FsCheckerError::Inconsistent(i) => Some(i),
            _ => None,
        }
    }
}

impl fmt::Display for FsCheckerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsCheckerError::Inconsistent(i) => write!(f, "{i}"),
            _ => write!(f, "{}", self.msg()),
        }
    }
}

impl core::error::Error for FsCheckerError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            FsCheckerError::IO(e) => Some(e),
            FsCheckerError::Parsing(e) => Some(e),
            _ => None,
        }
    }
}

/// Top-level error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    IO(BlockIOError),
    Parsing(FsParsingError),
    Checker(FsCheckerError),
    Other(&'static str),
}

impl FsError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsError::IO(e) => e.msg(),
            FsError::Parsing(e) => e.msg(),
            FsError::Checker(e) => e.msg(),
            FsError::Other(msg) => msg,
        }
    }

    pub fn inconsistency(&self) -> Option<&Inconsistency> {
        match self {
            FsError::Checker(e) => e.inconsistency(),
            _ => None,
        }
    }
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsError::IO(e) => write!(f, "{e}"),
            FsError::Parsing(e) => write!(f, "{e}"),
            FsError::Checker(e) => write!(f, "{e}"),
            FsError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl core::error::Error for FsError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            FsError::IO(e) => e.source(),
            FsError::Parsing(e) => e.source(),
            FsError::Checker(e) => e.source(),
            FsError::Other(_) => None,
        }
    }
}

// === type Fs*Result ===

pub type FsResult<T = ()> = Result<T, FsError>;
pub type FsParsingResult<T = ()> = Result<T, FsParsingError>;
pub type FsCheckerResult<T = ()> = Result<T, FsCheckerError>;

crate::fs_error_wiring! {
    top => FsError {
        BlockIOError   : IO,
        FsParsingError : Parsing,
        FsCheckerError : Checker,
    },
    str_into => [
        FsParsingError,
        FsCheckerError,
    ],
    sub => {
        BlockIOError   => [ FsParsingError::IO, FsCheckerError::IO ],
        FsParsingError => [ FsCheckerError::Parsing ],
        Inconsistency  => [ FsCheckerError::Inconsistent ],
    },
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_inconsistency_display() {
        let e = Inconsistency::BadDirectAddress {
            inode: 4,
            block: 9000,
        };
        assert_eq!(
            e.to_string(),
            "ERROR: bad direct address in inode (inode 4, block 9000)"
        );
        assert_eq!(
            Inconsistency::RootDirectoryMissing.to_string(),
            "ERROR: root directory does not exist"
        );
    }

    #[test]
    fn test_double_use_wording() {
        let direct = Inconsistency::AddressUsedMoreThanOnce {
            block: 60,
            via: AddressKind::Direct,
        };
        let indirect = Inconsistency::AddressUsedMoreThanOnce {
            block: 60,
            via: AddressKind::Indirect,
        };
        assert_eq!(direct.code(), indirect.code());
        assert!(direct.to_string().contains("direct address used more than once"));
        assert!(indirect.to_string().starts_with("ERROR: indirect address"));
    }

    #[test]
    fn test_conversions_keep_inconsistency() {
        let checker: FsCheckerError = Inconsistency::RootDirectoryMissing.into();
        let top: FsError = checker.into();
        assert_eq!(top.inconsistency(), Some(&Inconsistency::RootDirectoryMissing));

        let io: FsCheckerError = BlockIOError::OutOfBounds.into();
        assert_eq!(io.inconsistency(), None);
        assert_eq!(FsError::from(io).to_string(), "IO error");
    }

    #[test]
    fn test_parsing_error_chain() {
        let e: FsCheckerError = FsParsingError::from(BlockIOError::ShortRead {
            offset: 1024,
            len: 512,
        })
        .into();
        let src = core::error::Error::source(&e).map(|s| s.to_string());
        assert_eq!(src.as_deref(), Some("IO error"));
    }
}
