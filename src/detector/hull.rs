use std::collections::HashMap;

use crate::types::{HandInfo, Point};

/// Fewer cleaned points than this and no fingertip extraction is attempted.
const MIN_EXTRACTION_INPUT: usize = 50;
const MAX_FINGERTIPS: usize = 5;
/// How far (px) a candidate apex must rise above the sampled points flanking
/// it to count as a fingertip. Smooth convex tops (a fist, a flat palm edge)
/// fail this and yield no fingertips at all.
const FINGERTIP_PROMINENCE: f32 = 12.0;

/// Monotone-chain (Andrew's) convex hull. Strict left-turn test, so
/// collinear vertices are dropped. Fewer than 3 points pass through
/// unchanged. The result walks the hull with a consistent orientation:
/// `cross(h[i], h[i+1], h[i+2]) >= 0` at every vertex triple.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut pts = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));

    let mut lower: Vec<Point> = Vec::new();
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point> = Vec::new();
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    // Chain endpoints coincide; drop them before concatenating.
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

fn cross(o: Point, a: Point, b: Point) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Derives up to five fingertip locations from the cleaned hand blob:
/// grid-downsample, hull, top-region candidates, x-proximity clustering,
/// prominence gate, then a greedy separation filter. Result is sorted left
/// to right.
pub fn extract_fingertips(
    points: &[Point],
    hand: &HandInfo,
    width: u32,
    height: u32,
) -> Vec<Point> {
    if points.len() < MIN_EXTRACTION_INPUT {
        return Vec::new();
    }

    let sampled = grid_sample(points, width, height);
    let hull = convex_hull(&sampled);
    let candidates = fingertip_candidates(&hull, &sampled, hand);

    // Final pass: stay near the bounding box, then greedily enforce a
    // minimum horizontal separation between accepted tips.
    let min_sep = (hand.width * 0.12).round().max(18.0);
    let mut accepted: Vec<Point> = Vec::new();
    for p in candidates {
        if p.x < hand.min_x - 8.0
            || p.x > hand.max_x + 8.0
            || p.y < hand.min_y - 15.0
            || p.y > hand.max_y + 20.0
        {
            continue;
        }
        if accepted.iter().all(|q| (p.x - q.x).abs() >= min_sep) {
            accepted.push(p);
        }
    }

    accepted.sort_by(|a, b| a.x.total_cmp(&b.x));
    accepted.truncate(MAX_FINGERTIPS);
    accepted
}

/// Keeps only the topmost point of each grid cell, thinning the blob to a
/// sparse representative set before hull computation.
fn grid_sample(points: &[Point], width: u32, height: u32) -> Vec<Point> {
    let cell = (width.min(height) as f32 * 0.02).round().max(10.0);
    let mut grid: HashMap<(i32, i32), Point> = HashMap::new();
    for p in points {
        let key = ((p.x / cell).floor() as i32, (p.y / cell).floor() as i32);
        grid.entry(key)
            .and_modify(|best| {
                if p.y < best.y {
                    *best = *p;
                }
            })
            .or_insert(*p);
    }
    grid.into_values().collect()
}

fn fingertip_candidates(hull: &[Point], sampled: &[Point], hand: &HandInfo) -> Vec<Point> {
    if hull.is_empty() {
        return Vec::new();
    }

    let threshold_y = hand.min_y + (0.45 * (hand.max_y - hand.min_y)).clamp(15.0, 80.0);
    let mut candidates: Vec<Point> = hull
        .iter()
        .copied()
        .filter(|p| p.y <= threshold_y)
        .collect();

    if candidates.is_empty() {
        // Degenerate top region: take the topmost hull vertices as-is.
        let mut by_y = hull.to_vec();
        by_y.sort_by(|a, b| a.y.total_cmp(&b.y));
        by_y.truncate(MAX_FINGERTIPS);
        return by_y;
    }

    // Merge neighbouring hull vertices left-to-right: a vertex opens a new
    // cluster when it strays from the running cluster mean by more than the
    // separation threshold.
    candidates.sort_by(|a, b| a.x.total_cmp(&b.x));
    let min_x_separation = (hand.width * 0.08).round().max(20.0);
    let mut clusters: Vec<Vec<Point>> = Vec::new();
    for p in candidates {
        match clusters.last_mut() {
            Some(cluster) => {
                let avg_x = cluster.iter().map(|q| q.x).sum::<f32>() / cluster.len() as f32;
                if (p.x - avg_x).abs() <= min_x_separation {
                    cluster.push(p);
                } else {
                    clusters.push(vec![p]);
                }
            }
            None => clusters.push(vec![p]),
        }
    }

    clusters
        .iter()
        .filter_map(|cluster| {
            cluster
                .iter()
                .copied()
                .reduce(|a, b| if b.y < a.y { b } else { a })
        })
        .filter(|apex| protrudes(*apex, sampled, min_x_separation))
        .collect()
}

/// A fingertip apex must protrude above its flanks: among sampled points
/// whose x-distance from the apex falls in (sep/2, sep], the topmost must
/// still sit well below the apex. No flanking points at all means an
/// isolated spike, which passes.
fn protrudes(apex: Point, sampled: &[Point], separation: f32) -> bool {
    let near = separation * 0.5;
    let mut flank_top: Option<f32> = None;
    for q in sampled {
        let dx = (q.x - apex.x).abs();
        if dx > near && dx <= separation {
            flank_top = Some(flank_top.map_or(q.y, |y: f32| y.min(q.y)));
        }
    }
    match flank_top {
        Some(top) => top - apex.y >= FINGERTIP_PROMINENCE,
        None => true,
    }
}
