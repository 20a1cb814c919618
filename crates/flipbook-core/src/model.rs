use crate::grid::GridSpec;

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// Where one frame landed in the sheet.
#[derive(Debug, Clone)]
pub struct Placement {
    /// Frame key (file name when packed from disk).
    pub key: String,
    /// Row-major sequence index.
    pub index: u32,
    pub row: u32,
    pub col: u32,
    /// Grid cell in sheet pixels.
    pub cell: Rect,
    /// Size of the decoded source frame.
    pub source_size: (u32, u32),
    /// True if the source size differs from the grid cell size.
    pub size_mismatch: bool,
}

/// Logical record of a packed sheet.
#[derive(Debug, Clone)]
pub struct SheetLayout {
    pub grid: GridSpec,
    pub frame_size: (u32, u32),
    pub sheet_size: (u32, u32),
    pub placements: Vec<Placement>,
}

impl SheetLayout {
    /// Number of frames whose size differs from the first frame's.
    pub fn mismatched(&self) -> usize {
        self.placements.iter().filter(|p| p.size_mismatch).count()
    }
}
