use crate::error::{FlipbookError, Result};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

/// Rows x columns of a spritesheet. Cells are numbered row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSpec {
    pub rows: u32,
    pub cols: u32,
}

impl GridSpec {
    /// Builds a grid, rejecting zero rows or columns.
    pub fn new(rows: u32, cols: u32) -> Result<Self> {
        let grid = Self { rows, cols };
        grid.validate()?;
        Ok(grid)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(FlipbookError::InvalidGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// Number of cells (`rows * cols`).
    pub fn cell_count(&self) -> u64 {
        self.rows as u64 * self.cols as u64
    }

    /// (row, col) of the cell holding sequence index `index`.
    pub fn cell(&self, index: u32) -> (u32, u32) {
        (index / self.cols, index % self.cols)
    }

    /// Sequence index of the cell at (row, col).
    pub fn index(&self, row: u32, col: u32) -> u32 {
        row * self.cols + col
    }

    /// Top-left pixel of cell `index` for frames of `fw` x `fh`.
    pub fn origin(&self, index: u32, fw: u32, fh: u32) -> Result<(u32, u32)> {
        let (row, col) = self.cell(index);
        self.scale(col, row, fw, fh)
    }

    /// Pixel size of a sheet holding frames of `fw` x `fh`.
    ///
    /// Fails with `SheetTooLarge` when either side does not fit in a `u32`.
    pub fn sheet_size(&self, fw: u32, fh: u32) -> Result<(u32, u32)> {
        self.scale(self.cols, self.rows, fw, fh)
    }

    fn scale(&self, nx: u32, ny: u32, fw: u32, fh: u32) -> Result<(u32, u32)> {
        match (nx.checked_mul(fw), ny.checked_mul(fh)) {
            (Some(x), Some(y)) => Ok((x, y)),
            _ => Err(FlipbookError::SheetTooLarge {
                rows: self.rows,
                cols: self.cols,
                frame_width: fw,
                frame_height: fh,
            }),
        }
    }
}

impl fmt::Display for GridSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Parses the `rows:cols` form used on the command line.
impl FromStr for GridSpec {
    type Err = FlipbookError;
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || FlipbookError::InvalidDimensions(s.to_string());
        let (rows, cols) = s.split_once(':').ok_or_else(invalid)?;
        let rows: u32 = rows.trim().parse().map_err(|_| invalid())?;
        let cols: u32 = cols.trim().parse().map_err(|_| invalid())?;
        if rows == 0 || cols == 0 {
            return Err(invalid());
        }
        Ok(Self { rows, cols })
    }
}

/// Picks the most square grid with `rows <= cols` that holds exactly
/// `frame_count` cells.
///
/// Scans row counts from `floor(sqrt(n))` down to 1 and takes the first
/// divisor, so primes end up as a single row.
pub fn plan_grid(frame_count: NonZeroU32) -> GridSpec {
    let n = frame_count.get();
    for rows in (1..=n.isqrt()).rev() {
        if n % rows == 0 {
            return GridSpec {
                rows,
                cols: n / rows,
            };
        }
    }
    GridSpec { rows: 1, cols: n }
}
