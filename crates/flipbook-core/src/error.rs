use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlipbookError {
    #[error("Invalid grid {rows}x{cols}: rows and cols must both be at least 1")]
    InvalidGrid { rows: u32, cols: u32 },
    #[error("Invalid dimensions '{0}': expected <rows:cols> with two positive integers")]
    InvalidDimensions(String),
    #[error("Grid {rows}x{cols} has {cells} cells but {frames} frames were given")]
    GridMismatch {
        rows: u32,
        cols: u32,
        cells: u64,
        frames: usize,
    },
    #[error("Spritesheet {width}x{height} is too small for a {rows}x{cols} grid")]
    SheetTooSmall {
        width: u32,
        height: u32,
        rows: u32,
        cols: u32,
    },
    #[error("A {rows}x{cols} grid of {frame_width}x{frame_height} frames does not fit in a single image")]
    SheetTooLarge {
        rows: u32,
        cols: u32,
        frame_width: u32,
        frame_height: u32,
    },
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Nothing to pack")]
    Empty,
}

pub type Result<T> = std::result::Result<T, FlipbookError>;
