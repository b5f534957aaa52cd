use rayon::prelude::*;

use crate::types::Point;

/// Classifies every pixel of an RGBA raster as skin/non-skin and returns the
/// skin pixels in row-major scan order. The ordering is part of the contract:
/// blob isolation seeds its clustering from a canonical sort of this set, and
/// downstream stages rely on the output being deterministic.
///
/// The rule is a fixed RGB heuristic: `r > 95`, `g > 40`, `b > 20`, red
/// dominant over green and blue, `|r - g| > 15`, `r - b > 15`.
pub fn skin_pixels(rgba: &[u8], width: u32, height: u32) -> Vec<Point> {
    if width == 0 || height == 0 || rgba.is_empty() {
        return Vec::new();
    }

    let stride = width as usize * 4;
    let rows: Vec<Vec<Point>> = rgba
        .par_chunks_exact(stride)
        .enumerate()
        .map(|(y, row)| {
            row.chunks_exact(4)
                .enumerate()
                .filter(|(_, px)| is_skin(px[0], px[1], px[2]))
                .map(|(x, _)| Point::new(x as f32, y as f32))
                .collect()
        })
        .collect();

    rows.into_iter().flatten().collect()
}

fn is_skin(r: u8, g: u8, b: u8) -> bool {
    let (r, g, b) = (r as i16, g as i16, b as i16);
    r > 95 && g > 40 && b > 20 && r > g && r > b && (r - g).abs() > 15 && (r - b) > 15
}
