//! ZIF container format parsing.
//!
//! This module handles the ZIF single-file pyramid container: magic
//! validation, the zoom-level directory chain, per-level tag tables, and
//! the resolution of tile coordinates to byte ranges.
//!
//! # Key Concepts
//!
//! - **Directory chain**: the container stores one directory per zoom
//!   level, chained through offsets starting at byte 8. The chain order
//!   is reversed on exposure; see [`ZifReader`].
//!
//! - **Tags**: directories are flat lists of numeric-keyed records, each
//!   carrying two 64-bit values; see [`ZifTag`] for which value means what.
//!
//! - **Inline vs indirect locators**: levels with very few tiles encode
//!   tile positions and sizes directly in the locator tag values instead
//!   of pointing at indirection arrays; see [`ZoomLevel`].

mod level;
mod reader;
mod tags;

pub use level::{LevelGeometry, TileLocation, ZoomLevel};
pub use reader::{ZifReader, MAX_HEADER_BYTES, ZIF_MAGIC};
pub use tags::{TagTable, ZifTag, TAG_RECORD_SIZE};
