use thiserror::Error;

use crate::format::ZifTag;

/// I/O errors that can occur when reading from a byte source
#[derive(Debug, Error)]
pub enum IoError {
    /// Error from the underlying stream, propagated unchanged
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Requested range exceeds resource bounds
    #[error("range out of bounds: requested {requested} bytes at offset {offset}, size is {size}")]
    RangeOutOfBounds {
        offset: u64,
        requested: u64,
        size: u64,
    },

    /// Requested length is too large to hold in a single contiguous allocation
    #[error("range too large: requested {requested} bytes")]
    RangeTooLarge { requested: u64 },
}

/// Errors that can occur when parsing a ZIF container or resolving tiles
#[derive(Debug, Error)]
pub enum ZifError {
    /// I/O error while reading the container
    #[error("i/o error: {0}")]
    Io(#[from] IoError),

    /// Invalid ZIF magic bytes at the start of the file
    #[error("invalid ZIF magic: expected 0x08002B4949, got 0x{0:010X}")]
    InvalidMagic(u64),

    /// Required tag is missing from a level's tag table
    #[error("missing required tag: {0}")]
    MissingTag(ZifTag),

    /// Tag is present but its value is unusable
    #[error("invalid value for tag {tag}: {message}")]
    InvalidTagValue { tag: ZifTag, message: String },

    /// Zoom level index outside the container's level list
    #[error("zoom level {index} out of range: container has {count} levels")]
    LevelOutOfRange { index: usize, count: usize },

    /// Tile coordinates outside the level's tile grid
    #[error("tile ({x}, {y}) out of range: level grid is {tiles_x}x{tiles_y}")]
    TileOutOfRange {
        x: u32,
        y: u32,
        tiles_x: u64,
        tiles_y: u64,
    },

    /// Tile coordinates map inside the grid but past the stored tile count
    #[error("tile index {index} out of range: level stores {tile_count} tiles")]
    TileIndexOutOfRange { index: u64, tile_count: u64 },
}
