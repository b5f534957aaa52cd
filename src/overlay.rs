use crate::types::{HandInfo, Point};

const BOX_COLOR: [u8; 4] = [122, 182, 140, 255];
const MARKER_COLOR: [u8; 4] = [23, 87, 42, 255];
const FINGERTIP_COLOR: [u8; 4] = [255, 107, 107, 255];
const CENTER_RADIUS: i32 = 7;
const FINGERTIP_RADIUS: i32 = 6;
const CORNER_TICK: i32 = 12;

/// Draws the detection overlay into an RGBA raster: bounding box, centroid
/// disc, fingertip discs and corner ticks. All drawing is clipped to the
/// raster, so a box hanging over the edge is safe.
pub fn draw_hand_overlay(
    rgba: &mut [u8],
    width: u32,
    height: u32,
    hand: &HandInfo,
    fingertips: &[Point],
) {
    let x0 = hand.min_x.round() as i32;
    let y0 = hand.min_y.round() as i32;
    let x1 = hand.max_x.round() as i32;
    let y1 = hand.max_y.round() as i32;

    stroke_rect(rgba, width, height, x0, y0, x1, y1, BOX_COLOR);
    fill_circle(
        rgba,
        width,
        height,
        hand.center_x.round() as i32,
        hand.center_y.round() as i32,
        CENTER_RADIUS,
        MARKER_COLOR,
    );
    for tip in fingertips {
        fill_circle(
            rgba,
            width,
            height,
            tip.x.round() as i32,
            tip.y.round() as i32,
            FINGERTIP_RADIUS,
            FINGERTIP_COLOR,
        );
    }

    // Corner ticks, one L-shape per bounding-box corner.
    hline(rgba, width, height, x0, x0 + CORNER_TICK, y0, MARKER_COLOR);
    vline(rgba, width, height, x0, y0, y0 + CORNER_TICK, MARKER_COLOR);
    hline(rgba, width, height, x1 - CORNER_TICK, x1, y0, MARKER_COLOR);
    vline(rgba, width, height, x1, y0, y0 + CORNER_TICK, MARKER_COLOR);
    hline(rgba, width, height, x0, x0 + CORNER_TICK, y1, MARKER_COLOR);
    vline(rgba, width, height, x0, y1 - CORNER_TICK, y1, MARKER_COLOR);
    hline(rgba, width, height, x1 - CORNER_TICK, x1, y1, MARKER_COLOR);
    vline(rgba, width, height, x1, y1 - CORNER_TICK, y1, MARKER_COLOR);
}

fn stroke_rect(
    rgba: &mut [u8],
    width: u32,
    height: u32,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    color: [u8; 4],
) {
    hline(rgba, width, height, x0, x1, y0, color);
    hline(rgba, width, height, x0, x1, y1, color);
    vline(rgba, width, height, x0, y0, y1, color);
    vline(rgba, width, height, x1, y0, y1, color);
}

fn fill_circle(
    rgba: &mut [u8],
    width: u32,
    height: u32,
    cx: i32,
    cy: i32,
    radius: i32,
    color: [u8; 4],
) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                put_pixel(rgba, width, height, cx + dx, cy + dy, color);
            }
        }
    }
}

fn hline(rgba: &mut [u8], width: u32, height: u32, x0: i32, x1: i32, y: i32, color: [u8; 4]) {
    for x in x0..=x1 {
        put_pixel(rgba, width, height, x, y, color);
    }
}

fn vline(rgba: &mut [u8], width: u32, height: u32, x: i32, y0: i32, y1: i32, color: [u8; 4]) {
    for y in y0..=y1 {
        put_pixel(rgba, width, height, x, y, color);
    }
}

fn put_pixel(rgba: &mut [u8], width: u32, height: u32, x: i32, y: i32, color: [u8; 4]) {
    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
        return;
    }
    let i = ((y as u32 * width + x as u32) * 4) as usize;
    rgba[i..i + 4].copy_from_slice(&color);
}
