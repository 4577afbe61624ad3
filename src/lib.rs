//! # zif-reader
//!
//! A reader for ZIF (Zoomable Image Format) single-file pyramids.
//!
//! A ZIF file stores one image as several progressively downsampled zoom
//! levels, each cut into fixed-size tiles. This library parses the
//! container and resolves `(level, x, y)` tile requests to the exact byte
//! range of the tile's still-encoded payload, reading only the bytes it
//! needs. It never decodes pixels: payloads go to whatever raster codec
//! the caller pairs it with, and level geometry tells a compositing layer
//! where each decoded tile lands.
//!
//! ## Features
//!
//! - **Range-based access**: tile fetches read only the tile's bytes plus
//!   a one-time, cached index per level
//! - **Full 64-bit addressing**: offsets and lengths beyond the native
//!   seek/read width are handled by chunking inside the byte source
//! - **Pluggable sources**: files, in-memory buffers, or any seekable
//!   stream via the [`ByteSource`] trait
//!
//! ## Architecture
//!
//! - [`io`] - byte source abstraction and little-endian helpers
//! - [`mod@format`] - container parsing, tag tables, zoom levels, tile
//!   index resolution
//! - [`error`] - error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use zif_reader::{ZifError, ZifReader};
//!
//! fn main() -> Result<(), ZifError> {
//!     let mut reader = ZifReader::open_path("image.zif")?;
//!
//!     let geometry = reader.levels()[0].geometry()?;
//!     println!(
//!         "{}x{} pixels in {}x{} tiles",
//!         geometry.width, geometry.height, geometry.tiles_x, geometry.tiles_y
//!     );
//!
//!     // Still-encoded payload; hand it to a raster codec.
//!     let tile = reader.read_tile(0, 0, 0)?;
//!     println!("tile 0 of level 0: {} bytes", tile.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrency
//!
//! The container owns a single seek cursor. Concurrent tile serving must
//! either lock around each fetch or open one reader per worker; see
//! [`ByteSource`].

pub mod error;
pub mod format;
pub mod io;

// Re-export commonly used types
pub use error::{IoError, ZifError};
pub use format::{
    LevelGeometry, TagTable, TileLocation, ZifReader, ZifTag, ZoomLevel, MAX_HEADER_BYTES,
    TAG_RECORD_SIZE, ZIF_MAGIC,
};
pub use io::{
    parse_u32_array, parse_u64_array, read_u16_le, read_u32_le, read_u64_le, ByteSource,
    SeekOrigin, StreamSource,
};
