use crate::model::SheetLayout;
use serde_json::{Value, json};

/// Serialize a sheet layout as `{ grid, frameSize, sheetSize, frames, meta }`.
/// Frames are listed in sequence order with their cell rectangle.
pub fn to_json(layout: &SheetLayout) -> Value {
    let frames: Vec<Value> = layout
        .placements
        .iter()
        .map(|p| {
            json!({
                "key": p.key,
                "index": p.index,
                "row": p.row,
                "col": p.col,
                "frame": {"x": p.cell.x, "y": p.cell.y, "w": p.cell.w, "h": p.cell.h},
                "sourceSize": {"w": p.source_size.0, "h": p.source_size.1},
                "sizeMismatch": p.size_mismatch,
            })
        })
        .collect();
    json!({
        "grid": {"rows": layout.grid.rows, "cols": layout.grid.cols},
        "frameSize": {"w": layout.frame_size.0, "h": layout.frame_size.1},
        "sheetSize": {"w": layout.sheet_size.0, "h": layout.sheet_size.1},
        "frames": frames,
        "meta": {
            "app": "flipbook",
            "version": env!("CARGO_PKG_VERSION"),
            "format": "RGBA8888",
        },
    })
}
