//! Zoom level metadata and tile index resolution.
//!
//! A zoom level is one resolution tier of the pyramid. Its geometry and
//! the location of its tile data are described entirely by the tag table
//! read from the level's directory.
//!
//! # Locator encoding
//!
//! The two locator values ([`ZifTag::TileOffsets`] and
//! [`ZifTag::TileByteCounts`], second value each) change meaning with the
//! tile count:
//!
//! - positions: with exactly one tile, the locator IS that tile's file
//!   offset. Otherwise it points at an array of `tile_count` u64 offsets.
//! - sizes: with fewer than three tiles, the locator packs the byte
//!   lengths inline — tile 0 in the low 32 bits, tile 1 (if present) in
//!   the high 32 bits. Otherwise it points at an array of `tile_count`
//!   u32 lengths.
//!
//! The thresholds differ (1 for positions, 3 for sizes) and are part of
//! the format; getting either wrong corrupts tile addressing for two- and
//! three-tile levels.

use bytes::Bytes;
use tracing::trace;

use crate::error::ZifError;
use crate::io::{parse_u32_array, parse_u64_array, ByteSource, SeekOrigin};

use super::tags::{TagTable, ZifTag};

// =============================================================================
// TileLocation
// =============================================================================

/// Resolved location of one tile: absolute file offset and byte length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLocation {
    /// Offset of the tile payload in the file
    pub offset: u64,

    /// Length of the still-encoded payload in bytes
    pub length: u32,
}

// =============================================================================
// LevelGeometry
// =============================================================================

/// Geometry snapshot of one zoom level.
///
/// This is everything a compositing layer needs to place decoded tiles:
/// blit tile `(x, y)` at pixel `(x * tile_width, y * tile_height)` on a
/// `width` x `height` canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelGeometry {
    /// Level width in pixels
    pub width: u64,

    /// Level height in pixels
    pub height: u64,

    /// Tile width in pixels
    pub tile_width: u64,

    /// Tile height in pixels
    pub tile_height: u64,

    /// Number of tile columns, `ceil(width / tile_width)`
    pub tiles_x: u64,

    /// Number of tile rows, `ceil(height / tile_height)`
    pub tiles_y: u64,
}

// =============================================================================
// ZoomLevel
// =============================================================================

/// One resolution tier of the pyramid.
///
/// A level owns its tag table and a lazily resolved tile index. It does
/// not own the byte source: the container does, and passes it into the
/// methods that read. Exclusive (`&mut`) access doubles as the guard
/// against racing the one-time index resolution.
#[derive(Debug, Clone)]
pub struct ZoomLevel {
    tags: TagTable,
    tile_index: Option<Box<[TileLocation]>>,
}

impl ZoomLevel {
    pub(crate) fn new(tags: TagTable) -> Self {
        Self {
            tags,
            tile_index: None,
        }
    }

    /// The level's tag table.
    pub fn tags(&self) -> &TagTable {
        &self.tags
    }

    /// Level width in pixels.
    pub fn width(&self) -> Result<u64, ZifError> {
        Ok(self.tags.require(ZifTag::ImageWidth)?[1])
    }

    /// Level height in pixels.
    pub fn height(&self) -> Result<u64, ZifError> {
        Ok(self.tags.require(ZifTag::ImageLength)?[1])
    }

    /// Tile width in pixels.
    pub fn tile_width(&self) -> Result<u64, ZifError> {
        Ok(self.tags.require(ZifTag::TileWidth)?[1])
    }

    /// Tile height in pixels.
    pub fn tile_height(&self) -> Result<u64, ZifError> {
        Ok(self.tags.require(ZifTag::TileLength)?[1])
    }

    /// Number of tiles stored for this level.
    ///
    /// This is the stored count, trusted as-is for indexing. It is not
    /// reconciled against the grid derived from the level dimensions.
    pub fn tile_count(&self) -> Result<u64, ZifError> {
        Ok(self.tags.require(ZifTag::TileOffsets)?[0])
    }

    fn position_locator(&self) -> Result<u64, ZifError> {
        Ok(self.tags.require(ZifTag::TileOffsets)?[1])
    }

    fn size_locator(&self) -> Result<u64, ZifError> {
        Ok(self.tags.require(ZifTag::TileByteCounts)?[1])
    }

    /// Number of tile columns, `ceil(width / tile_width)`.
    pub fn tiles_x(&self) -> Result<u64, ZifError> {
        Ok(self.width()?.div_ceil(self.nonzero_tile_dim(ZifTag::TileWidth)?))
    }

    /// Number of tile rows, `ceil(height / tile_height)`.
    pub fn tiles_y(&self) -> Result<u64, ZifError> {
        Ok(self
            .height()?
            .div_ceil(self.nonzero_tile_dim(ZifTag::TileLength)?))
    }

    fn nonzero_tile_dim(&self, tag: ZifTag) -> Result<u64, ZifError> {
        match self.tags.require(tag)?[1] {
            0 => Err(ZifError::InvalidTagValue {
                tag,
                message: "tile dimension must be non-zero".to_string(),
            }),
            dim => Ok(dim),
        }
    }

    /// Geometry snapshot for this level.
    pub fn geometry(&self) -> Result<LevelGeometry, ZifError> {
        Ok(LevelGeometry {
            width: self.width()?,
            height: self.height()?,
            tile_width: self.tile_width()?,
            tile_height: self.tile_height()?,
            tiles_x: self.tiles_x()?,
            tiles_y: self.tiles_y()?,
        })
    }

    /// Resolve the location of tile `(x, y)` without reading its payload.
    ///
    /// Coordinates are checked against the derived grid. A coordinate
    /// pair inside the grid but past the stored tile count fails with
    /// [`ZifError::TileIndexOutOfRange`].
    pub fn tile_location<S: ByteSource>(
        &mut self,
        source: &mut S,
        x: u32,
        y: u32,
    ) -> Result<TileLocation, ZifError> {
        let tiles_x = self.tiles_x()?;
        let tiles_y = self.tiles_y()?;
        if u64::from(x) >= tiles_x || u64::from(y) >= tiles_y {
            return Err(ZifError::TileOutOfRange {
                x,
                y,
                tiles_x,
                tiles_y,
            });
        }

        // Row-major, origin top-left.
        let index = u64::from(x) + u64::from(y) * tiles_x;

        let locations = self.tile_index(source)?;
        let tile_count = locations.len() as u64;
        if index >= tile_count {
            return Err(ZifError::TileIndexOutOfRange { index, tile_count });
        }
        Ok(locations[index as usize])
    }

    /// Read the still-encoded payload of tile `(x, y)`.
    ///
    /// The returned bytes are exactly the stored compressed payload; this
    /// crate never decodes them.
    pub fn read_tile<S: ByteSource>(
        &mut self,
        source: &mut S,
        x: u32,
        y: u32,
    ) -> Result<Bytes, ZifError> {
        let location = self.tile_location(source, x, y)?;
        source.seek(location.offset, SeekOrigin::Start)?;
        let bytes = source.read_exact(u64::from(location.length))?;
        trace!(x, y, offset = location.offset, length = location.length, "read tile");
        Ok(bytes)
    }

    /// The tile index: one `(offset, length)` entry per tile, row-major.
    ///
    /// Resolved from the locator tags on first access and cached for the
    /// level's lifetime; later calls do not touch the source.
    pub fn tile_index<S: ByteSource>(
        &mut self,
        source: &mut S,
    ) -> Result<&[TileLocation], ZifError> {
        match self.tile_index {
            Some(ref index) => Ok(index),
            None => {
                let resolved = self.resolve_tile_index(source)?;
                Ok(self.tile_index.insert(resolved))
            }
        }
    }

    fn resolve_tile_index<S: ByteSource>(
        &self,
        source: &mut S,
    ) -> Result<Box<[TileLocation]>, ZifError> {
        let stored_count = self.tile_count()?;
        let count = usize::try_from(stored_count).map_err(|_| ZifError::InvalidTagValue {
            tag: ZifTag::TileOffsets,
            message: format!("tile count {stored_count} exceeds addressable range"),
        })?;

        // For minimal tile counts the locator values hold the data inline
        // instead of pointing at an indirection array.
        let positions: Vec<u64> = if count == 1 {
            vec![self.position_locator()?]
        } else {
            source.seek(self.position_locator()?, SeekOrigin::Start)?;
            let bytes = source.read_exact((count as u64).saturating_mul(8))?;
            parse_u64_array(&bytes, count)
        };

        let sizes: Vec<u32> = if count < 3 {
            let packed = self.size_locator()?;
            let pair = [packed as u32, (packed >> 32) as u32];
            pair[..count].to_vec()
        } else {
            source.seek(self.size_locator()?, SeekOrigin::Start)?;
            let bytes = source.read_exact((count as u64).saturating_mul(4))?;
            parse_u32_array(&bytes, count)
        };

        trace!(count, "resolved tile index");

        Ok(positions
            .into_iter()
            .zip(sizes)
            .map(|(offset, length)| TileLocation { offset, length })
            .collect())
    }
}

// =============================================================================
// Tests
// =============================================================================
