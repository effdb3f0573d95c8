// src/gesture/overlay.rs

//! Overlay geometry for the gesture visuals: the live color swatch next to
//! the pointer and the rubber-band rectangle.

use crate::color::Rgb;
use crate::config::OverlayConfig;
use crate::host::OverlayCommand;

/// Builds the live swatch drawn beside the pointer during a point pick: a
/// filled square of the color currently under the cursor, offset down-right
/// by the tile size plus a margin, with a contrasting outline.
pub fn swatch_commands(
    config: &OverlayConfig,
    pointer_x: i32,
    pointer_y: i32,
    tile_size: u32,
    color: Rgb,
) -> Vec<OverlayCommand> {
    let offset = tile_size as f32 + config.swatch_margin_px;
    let side = config.swatch_size_px;
    let x = pointer_x as f32 + offset;
    let y = pointer_y as f32 - offset - side;
    vec![
        OverlayCommand::FillRect {
            x,
            y,
            width: side,
            height: side,
            color: [color.r, color.g, color.b, 1.0],
        },
        OverlayCommand::StrokeRect {
            x,
            y,
            width: side,
            height: side,
            color: config.swatch_edge_color,
        },
    ]
}

/// Builds the rubber-band outline between two gesture corners.
///
/// Corners may be given in any order; the rectangle is normalized so its
/// origin is the bottom-left corner.
pub fn rubber_band_commands(
    config: &OverlayConfig,
    corner_a: (i32, i32),
    corner_b: (i32, i32),
) -> Vec<OverlayCommand> {
    let (x0, x1) = (corner_a.0.min(corner_b.0), corner_a.0.max(corner_b.0));
    let (y0, y1) = (corner_a.1.min(corner_b.1), corner_a.1.max(corner_b.1));
    vec![OverlayCommand::StrokeRect {
        x: x0 as f32,
        y: y0 as f32,
        width: (x1 - x0) as f32,
        height: (y1 - y0) as f32,
        color: config.rubber_band_color,
    }]
}
