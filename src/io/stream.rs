use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use bytes::Bytes;

use super::source::{ByteSource, SeekOrigin};
use crate::error::IoError;

/// Largest forward displacement handed to one native `SeekFrom::Current`
/// call. Wider skips are split into runs of at most this many bytes.
const SEEK_STEP: u64 = i64::MAX as u64;

/// Largest slice handed to one native `read_exact` call.
const READ_CHUNK: usize = i32::MAX as usize;

/// Largest length that a single `read_exact` request may ask for. Anything
/// beyond this cannot be held in one contiguous allocation.
const MAX_CONTIGUOUS: u64 = isize::MAX as u64;

/// Byte source over any seekable stream.
///
/// Adapts a `Read + Seek` value (a file, an in-memory cursor, anything
/// seekable) to [`ByteSource`]. The total stream length is measured once
/// at construction, and the cursor is tracked in a shadow field so
/// [`ByteSource::position`] never touches the stream.
#[derive(Debug)]
pub struct StreamSource<R> {
    inner: R,
    pos: u64,
    size: u64,
}

impl StreamSource<File> {
    /// Open a file-backed source.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IoError> {
        Self::new(File::open(path)?)
    }
}

impl StreamSource<Cursor<Vec<u8>>> {
    /// Wrap an in-memory buffer.
    pub fn from_vec(bytes: Vec<u8>) -> Result<Self, IoError> {
        Self::new(Cursor::new(bytes))
    }
}

impl<R: Read + Seek> StreamSource<R> {
    /// Wrap a seekable stream, measuring its total length.
    ///
    /// The cursor is left at the start of the stream.
    pub fn new(mut inner: R) -> Result<Self, IoError> {
        let size = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self {
            inner,
            pos: 0,
            size,
        })
    }

    /// Unwrap the inner stream.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> ByteSource for StreamSource<R> {
    fn seek(&mut self, offset: u64, origin: SeekOrigin) -> Result<(), IoError> {
        match origin {
            SeekOrigin::Start => {
                self.inner.seek(SeekFrom::Start(offset))?;
                self.pos = offset;
            }
            SeekOrigin::Current => {
                let target = self.pos.checked_add(offset).ok_or(IoError::RangeTooLarge {
                    requested: offset,
                })?;
                // SeekFrom::Current only takes an i64 displacement.
                let mut remaining = offset;
                while remaining > 0 {
                    let step = remaining.min(SEEK_STEP);
                    self.inner.seek(SeekFrom::Current(step as i64))?;
                    remaining -= step;
                }
                self.pos = target;
            }
        }
        Ok(())
    }

    fn read_exact(&mut self, len: u64) -> Result<Bytes, IoError> {
        if len > MAX_CONTIGUOUS {
            return Err(IoError::RangeTooLarge { requested: len });
        }
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.size)
            .ok_or(IoError::RangeOutOfBounds {
                offset: self.pos,
                requested: len,
                size: self.size,
            })?;

        let mut buf = vec![0u8; len as usize];
        read_exact_chunked(&mut self.inner, &mut buf, READ_CHUNK)?;
        self.pos = end;
        Ok(Bytes::from(buf))
    }

    fn position(&self) -> u64 {
        self.pos
    }

    fn size(&self) -> u64 {
        self.size
    }
}

/// Fill `buf` from the stream, handing the underlying `read_exact` at most
/// `chunk` bytes per call.
fn read_exact_chunked<R: Read>(
    inner: &mut R,
    buf: &mut [u8],
    chunk: usize,
) -> Result<(), std::io::Error> {
    for part in buf.chunks_mut(chunk) {
        inner.read_exact(part)?;
    }
    Ok(())
}
