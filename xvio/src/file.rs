// SPDX-License-Identifier: MIT

use std::io::{Error, ErrorKind, Read, Seek, SeekFrom};

use crate::{BlockIOError, BlockIOResult, XvIO};

/// `XvIO` over any seekable reader (typically a `std::fs::File`).
#[derive(Debug)]
pub struct StdXvIO<'a, T: Read + Seek> {
    io: &'a mut T,
}

impl<'a, T: Read + Seek> StdXvIO<'a, T> {
    #[inline]
    pub fn new(io: &'a mut T) -> Self {
        Self { io }
    }
}

impl<'a, T: Read + Seek> XvIO for StdXvIO<'a, T> {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> BlockIOResult {
        self.io.seek(SeekFrom::Start(offset))?;
        self.io.read_exact(buf).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => BlockIOError::ShortRead {
                offset,
                len: buf.len(),
            },
            _ => BlockIOError::from(e),
        })
    }

    fn size_bytes(&mut self) -> BlockIOResult<u64> {
        let current = self.io.stream_position()?;
        let end = self.io.seek(SeekFrom::End(0))?;
        self.io.seek(SeekFrom::Start(current))?;
        Ok(end)
    }
}

impl From<Error> for BlockIOError {
    #[cold]
    #[inline(never)]
    fn from(e: Error) -> Self {
        // BlockIOError only carries 'static messages.
        let leaked_str: &'static str = Box::leak(e.to_string().into_boxed_str());
        BlockIOError::Other(leaked_str)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::prelude::*;
    use std::io::{Cursor, Write};
    use tempfile::tempfile;

    #[test]
    fn test_read_at() {
        let mut file = tempfile().unwrap();
        file.write_all(&[0, 1, 2, 3, 4, 5, 6, 7]).unwrap();
        let mut io = StdXvIO::new(&mut file);

        let mut output = [0u8; 4];
        io.read_at(2, &mut output).unwrap();
        assert_eq!(output, [2, 3, 4, 5]);
    }

    #[test]
    fn test_short_read_past_end() {
        let mut file = tempfile().unwrap();
        file.write_all(&[0xAA; 600]).unwrap();
        let mut io = StdXvIO::new(&mut file);

        let err = io.read_block::<512>(1).unwrap_err();
        assert_eq!(err, BlockIOError::ShortRead { offset: 512, len: 512 });
        assert!(io.read_block::<512>(7).is_err());
    }

    #[test]
    fn test_size_keeps_position() {
        let mut cursor = Cursor::new(vec![0u8; 1536]);
        cursor.set_position(100);
        let mut io = StdXvIO::new(&mut cursor);

        assert_eq!(io.size_bytes().unwrap(), 1536);
        assert_eq!(io.block_count(512).unwrap(), 3);
        drop(io);
        assert_eq!(cursor.position(), 100);
    }

    #[test]
    fn test_read_struct_little_endian() {
        let mut cursor = Cursor::new(vec![0, 0, 0x78, 0x56, 0x34, 0x12, 1, 0, 0, 0]);
        let mut io = StdXvIO::new(&mut cursor);

        let pair: [u32; 2] = io.read_struct(2).unwrap();
        assert_eq!(pair, [0x1234_5678, 1]);
        assert!(io.read_struct::<[u32; 2]>(4).is_err());
    }
}
