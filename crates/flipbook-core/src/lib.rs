//! Core library for flipbook spritesheets.
//!
//! - Grid: `plan_grid` picks a near-square `rows x cols` for N frames
//! - Order: frames sort by the first number in their name (`order_frames`)
//! - Pipeline: `pack_frames` composites ordered frames into one RGBA sheet, `unpack_sheet` slices it back
//! - `to_json` exports the layout record; `FlipbookConfig` loads from JSON with serde defaults
//!
//! Quick example:
//! ```ignore
//! use image::ImageReader;
//! use flipbook_core::{InputFrame, pack_sequence, unpack_sheet};
//! # fn main() -> anyhow::Result<()> {
//! let a = ImageReader::open("walk_1.png")?.decode()?;
//! let b = ImageReader::open("walk_2.png")?.decode()?;
//! let inputs = vec![
//!   InputFrame { key: "walk_1.png".into(), image: a },
//!   InputFrame { key: "walk_2.png".into(), image: b },
//! ];
//! let out = pack_sequence(inputs)?;
//! println!("grid: {}", out.layout.grid);
//! let frames = unpack_sheet(&out.rgba.into(), out.layout.grid)?;
//! assert_eq!(frames.len(), 2);
//! # Ok(()) }
//! ```

pub mod compositing;
pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod model;
pub mod order;
pub mod pipeline;

pub use config::*;
pub use error::*;
pub use export::*;
pub use grid::*;
pub use model::*;
pub use order::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `flipbook_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{FlipbookConfig, FlipbookConfigBuilder, FrameFormat};
    pub use crate::grid::{GridSpec, plan_grid};
    pub use crate::model::{Placement, Rect, SheetLayout};
    pub use crate::order::{FrameKey, order_frames, sort_by_frame_number};
    pub use crate::{InputFrame, PackOutput, pack_frames, pack_sequence, unpack_sheet};
}
