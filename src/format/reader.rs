//! ZIF container parsing and tile dispatch.
//!
//! # Container layout
//!
//! ```text
//! Bytes 0-7:  Magic, little-endian u64 0x08002B4949
//!             (the BigTIFF preamble: "II", version 43, 8-byte offsets)
//! Bytes 8-15: Offset of the first zoom-level directory
//! ```
//!
//! Each directory is a u64 record count followed by that many 20-byte tag
//! records; the 8 bytes after the records hold the offset of the next
//! directory, zero meaning none. The chain is only followed while the
//! cursor stays inside the leading header region of the file.

use std::fs::File;
use std::io::Cursor;
use std::path::Path;

use bytes::Bytes;
use tracing::debug;

use crate::error::ZifError;
use crate::io::{read_u16_le, read_u64_le, ByteSource, SeekOrigin, StreamSource};

use super::level::{TileLocation, ZoomLevel};
use super::tags::{TagTable, TAG_RECORD_SIZE};

/// Magic value at offset 0, read as a little-endian u64.
pub const ZIF_MAGIC: u64 = 0x08_002B_4949;

/// Directory offsets are only consumed while the cursor is below this
/// bound; a directory chain that wanders past it ends the scan.
pub const MAX_HEADER_BYTES: u64 = 8192;

/// A parsed ZIF container.
///
/// Owns the byte source exclusively and exposes the pyramid's zoom levels
/// in the reverse of their on-disk chain order. Construction scans the
/// whole directory chain eagerly and fails atomically; only the per-level
/// tile indexes are resolved lazily.
#[derive(Debug)]
pub struct ZifReader<S> {
    source: S,
    levels: Vec<ZoomLevel>,
}

impl ZifReader<StreamSource<File>> {
    /// Open a ZIF file from disk.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self, ZifError> {
        Self::open(StreamSource::open(path)?)
    }
}

impl ZifReader<StreamSource<Cursor<Vec<u8>>>> {
    /// Open a ZIF container held in memory.
    pub fn from_vec(bytes: Vec<u8>) -> Result<Self, ZifError> {
        Self::open(StreamSource::from_vec(bytes)?)
    }
}

impl<S: ByteSource> ZifReader<S> {
    /// Open a container from a byte source.
    ///
    /// Validates the magic, then walks the directory chain: read an
    /// offset, seek to it, read the tag count and records, and continue
    /// from the cursor's resting position just past the records, where
    /// the format chains the next offset. A zero offset or a cursor past
    /// [`MAX_HEADER_BYTES`] ends the scan.
    ///
    /// A container with zero levels is valid. Any failure mid-scan fails
    /// the whole open; no partially populated container is returned.
    pub fn open(mut source: S) -> Result<Self, ZifError> {
        source.seek(0, SeekOrigin::Start)?;
        let magic = read_u64(&mut source)?;
        if magic != ZIF_MAGIC {
            return Err(ZifError::InvalidMagic(magic));
        }

        let mut levels = Vec::new();
        while source.position() < MAX_HEADER_BYTES {
            let offset = read_u64(&mut source)?;
            if offset == 0 {
                break;
            }
            source.seek(offset, SeekOrigin::Start)?;
            let tag_count = read_u64(&mut source)?;
            levels.push(ZoomLevel::new(read_tag_table(&mut source, tag_count)?));
        }

        // Directories are exposed in the reverse of their on-disk order:
        // the first directory discovered becomes the last level.
        levels.reverse();

        debug!(levels = levels.len(), "opened ZIF container");
        Ok(Self { source, levels })
    }

    /// Zoom levels in exposed order.
    pub fn levels(&self) -> &[ZoomLevel] {
        &self.levels
    }

    /// Number of zoom levels.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Get a zoom level by index.
    pub fn level(&self, index: usize) -> Option<&ZoomLevel> {
        self.levels.get(index)
    }

    /// Get a zoom level mutably.
    ///
    /// Useful with a second, independently opened source when tiles are
    /// served from multiple workers.
    pub fn level_mut(&mut self, index: usize) -> Option<&mut ZoomLevel> {
        self.levels.get_mut(index)
    }

    /// Resolve a tile's file location without reading its payload.
    pub fn tile_location(
        &mut self,
        level_index: usize,
        x: u32,
        y: u32,
    ) -> Result<TileLocation, ZifError> {
        let count = self.levels.len();
        let level = self
            .levels
            .get_mut(level_index)
            .ok_or(ZifError::LevelOutOfRange {
                index: level_index,
                count,
            })?;
        level.tile_location(&mut self.source, x, y)
    }

    /// Read the still-encoded payload of one tile.
    ///
    /// The returned bytes are exactly as stored; hand them to a raster
    /// codec for decoding.
    pub fn read_tile(&mut self, level_index: usize, x: u32, y: u32) -> Result<Bytes, ZifError> {
        let count = self.levels.len();
        let level = self
            .levels
            .get_mut(level_index)
            .ok_or(ZifError::LevelOutOfRange {
                index: level_index,
                count,
            })?;
        level.read_tile(&mut self.source, x, y)
    }

    /// Consume the reader, releasing the byte source.
    pub fn into_source(self) -> S {
        self.source
    }
}

/// Read one little-endian u64 at the cursor.
fn read_u64<S: ByteSource>(source: &mut S) -> Result<u64, ZifError> {
    let bytes = source.read_exact(8)?;
    Ok(read_u64_le(&bytes))
}

/// Read `count` tag records into a table.
fn read_tag_table<S: ByteSource>(source: &mut S, count: u64) -> Result<TagTable, ZifError> {
    let block = source.read_exact(count.saturating_mul(TAG_RECORD_SIZE as u64))?;

    let mut table = TagTable::new();
    for record in block.chunks_exact(TAG_RECORD_SIZE) {
        let key = read_u16_le(&record[0..2]);
        // record[2..4] is reserved
        let value1 = read_u64_le(&record[4..12]);
        let value2 = read_u64_le(&record[12..20]);
        table.insert(key, [value1, value2]);
    }
    Ok(table)
}

// =============================================================================
// Tests
// =============================================================================
