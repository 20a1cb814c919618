use crate::compositing::blit_rgba;
use crate::error::{FlipbookError, Result};
use crate::grid::{GridSpec, plan_grid};
use crate::model::{Placement, Rect, SheetLayout};
use crate::order::sort_by_frame_number;
use image::{DynamicImage, GenericImageView, RgbaImage};
use std::num::NonZeroU32;
use tracing::{debug, info, instrument, warn};

/// In-memory frame to pack (key + decoded image).
pub struct InputFrame {
    pub key: String,
    pub image: DynamicImage,
}

/// Output of a packing run: layout record and the RGBA sheet.
pub struct PackOutput {
    pub layout: SheetLayout,
    pub rgba: RgbaImage,
}

#[instrument(skip_all, fields(frames = frames.len(), grid = %grid))]
/// Composites `frames`, already in sequence order, into one sheet laid out by `grid`.
///
/// Every cell is sized after the first frame. Frames of another size are
/// still pasted at their cell origin (clipped to the sheet) and flagged in
/// the layout.
pub fn pack_frames(frames: &[InputFrame], grid: GridSpec) -> Result<PackOutput> {
    grid.validate()?;
    let Some(first) = frames.first() else {
        return Err(FlipbookError::Empty);
    };
    if frames.len() as u64 != grid.cell_count() {
        return Err(FlipbookError::GridMismatch {
            rows: grid.rows,
            cols: grid.cols,
            cells: grid.cell_count(),
            frames: frames.len(),
        });
    }

    let (fw, fh) = first.image.dimensions();
    let (sheet_w, sheet_h) = grid.sheet_size(fw, fh)?;
    let mut canvas = RgbaImage::new(sheet_w, sheet_h);
    let mut placements = Vec::with_capacity(frames.len());

    for (index, frame) in (0u32..).zip(frames) {
        let rgba = frame.image.to_rgba8();
        let source_size = rgba.dimensions();
        let size_mismatch = source_size != (fw, fh);
        if size_mismatch {
            warn!(
                key = %frame.key,
                width = source_size.0,
                height = source_size.1,
                expected_width = fw,
                expected_height = fh,
                "frame size differs from first frame"
            );
        }
        let (x, y) = grid.origin(index, fw, fh)?;
        blit_rgba(&rgba, &mut canvas, x, y);
        let (row, col) = grid.cell(index);
        placements.push(Placement {
            key: frame.key.clone(),
            index,
            row,
            col,
            cell: Rect::new(x, y, fw, fh),
            source_size,
            size_mismatch,
        });
    }

    info!(
        rows = grid.rows,
        cols = grid.cols,
        width = sheet_w,
        height = sheet_h,
        "sheet composed"
    );
    let layout = SheetLayout {
        grid,
        frame_size: (fw, fh),
        sheet_size: (sheet_w, sheet_h),
        placements,
    };
    Ok(PackOutput {
        layout,
        rgba: canvas,
    })
}

/// Orders `frames` by the number in their keys, plans a near-square grid and packs them.
pub fn pack_sequence(mut frames: Vec<InputFrame>) -> Result<PackOutput> {
    let count = u32::try_from(frames.len())
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or(FlipbookError::Empty)?;
    sort_by_frame_number(&mut frames, |f| f.key.as_str());
    let grid = plan_grid(count);
    debug!(%grid, count = count.get(), "planned grid");
    pack_frames(&frames, grid)
}

#[instrument(skip_all, fields(grid = %grid))]
/// Slices `sheet` into `rows * cols` frames in row-major order.
///
/// Frame size is `width / cols` by `height / rows`; leftover pixels on the
/// right and bottom edges are dropped. Frames keep the sheet's color type.
pub fn unpack_sheet(sheet: &DynamicImage, grid: GridSpec) -> Result<Vec<DynamicImage>> {
    grid.validate()?;
    let (w, h) = sheet.dimensions();
    let fw = w / grid.cols;
    let fh = h / grid.rows;
    if fw == 0 || fh == 0 {
        return Err(FlipbookError::SheetTooSmall {
            width: w,
            height: h,
            rows: grid.rows,
            cols: grid.cols,
        });
    }
    let (rem_w, rem_h) = (w % grid.cols, h % grid.rows);
    if rem_w != 0 || rem_h != 0 {
        debug!(
            dropped_right = rem_w,
            dropped_bottom = rem_h,
            "sheet size is not a multiple of the grid"
        );
    }

    let mut frames = Vec::with_capacity(grid.cell_count() as usize);
    for row in 0..grid.rows {
        for col in 0..grid.cols {
            frames.push(sheet.crop_imm(col * fw, row * fh, fw, fh));
        }
    }
    info!(count = frames.len(), width = fw, height = fh, "sheet sliced");
    Ok(frames)
}
