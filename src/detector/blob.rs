use std::collections::HashMap;

use crate::types::Point;

/// Below this many skin pixels clustering is meaningless; the set passes
/// through unchanged.
const MIN_CLUSTER_INPUT: usize = 80;
const KMEANS_K: usize = 3;
const KMEANS_ITERATIONS: usize = 8;
/// Smallest cluster accepted as a hand blob before falling back to the
/// coarse isolated-pixel filter.
const MIN_BLOB_SIZE: usize = 60;
const NEIGHBOR_THRESHOLD: usize = 6;
const FALLBACK_SAMPLE_TARGET: usize = 500;
const FALLBACK_WINDOW: f32 = 5.0;

/// Reduces a skin-pixel set to the single most likely hand blob: k-means
/// picks the largest cluster, then a spatial-hash density prune strips
/// stragglers. Output is always a subset of the input; no points are
/// invented.
pub fn isolate_hand(points: &[Point], width: u32, height: u32) -> Vec<Point> {
    if points.len() < MIN_CLUSTER_INPUT {
        return points.to_vec();
    }

    let clusters = kmeans_clusters(points);
    let largest = clusters
        .into_iter()
        .max_by_key(|c| c.len())
        .unwrap_or_default();

    if largest.len() < MIN_BLOB_SIZE {
        // Clustering found nothing blob-like; strip isolated pixels from the
        // whole set instead. Best effort, not a guarantee a hand is present.
        return strided_isolation_filter(points);
    }

    density_prune(&largest, width, height)
}

/// Fixed-iteration Lloyd clustering. Seeding contract: centroids start on
/// evenly spaced samples of the set sorted by (y, x), so the result depends
/// only on the set's contents, not on insertion order.
fn kmeans_clusters(points: &[Point]) -> Vec<Vec<Point>> {
    let mut canonical = points.to_vec();
    canonical.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
    let mut centroids: Vec<Point> = (0..KMEANS_K)
        .map(|i| canonical[i * canonical.len() / KMEANS_K])
        .collect();

    let mut clusters: Vec<Vec<Point>> = Vec::new();
    for _ in 0..KMEANS_ITERATIONS {
        clusters = vec![Vec::new(); KMEANS_K];
        for p in points {
            let mut best = 0;
            let mut best_dist = f32::MAX;
            for (c, centroid) in centroids.iter().enumerate() {
                let d = dist_sq(*p, *centroid);
                if d < best_dist {
                    best_dist = d;
                    best = c;
                }
            }
            clusters[best].push(*p);
        }
        for (c, cluster) in clusters.iter().enumerate() {
            // Empty clusters keep their previous centroid.
            if cluster.is_empty() {
                continue;
            }
            let (sx, sy) = cluster
                .iter()
                .fold((0.0, 0.0), |acc, q| (acc.0 + q.x, acc.1 + q.y));
            let n = cluster.len() as f32;
            centroids[c] = Point::new(sx / n, sy / n);
        }
    }

    clusters
}

/// Coarse fallback: keep a point if a strided sample of the set (roughly 500
/// probes) finds at least one other point within a 5x5 window.
fn strided_isolation_filter(points: &[Point]) -> Vec<Point> {
    let stride = (points.len() / FALLBACK_SAMPLE_TARGET).max(1);
    points
        .iter()
        .filter(|p| {
            let mut neighbors = 0usize;
            for q in points.iter().step_by(stride) {
                if (p.x - q.x).abs() < FALLBACK_WINDOW && (p.y - q.y).abs() < FALLBACK_WINDOW {
                    neighbors += 1;
                    if neighbors > 3 {
                        break;
                    }
                }
            }
            // The probe counts the point itself, so > 1 means a real neighbor.
            neighbors > 1
        })
        .copied()
        .collect()
}

/// Keeps points with enough same- or adjacent-cell neighbors within `radius`
/// on both axes. The hash cell size equals the radius, so a 3x3 cell scan
/// covers the whole box.
fn density_prune(points: &[Point], width: u32, height: u32) -> Vec<Point> {
    let radius = (width.min(height) as f32 * 0.02).round().max(4.0);
    let mut hash: HashMap<(i32, i32), Vec<Point>> = HashMap::new();
    for p in points {
        hash.entry(cell_key(*p, radius)).or_default().push(*p);
    }

    let mut kept = Vec::new();
    for p in points {
        let (gx, gy) = cell_key(*p, radius);
        let mut count = 0usize;
        'scan: for ox in -1..=1 {
            for oy in -1..=1 {
                let Some(bucket) = hash.get(&(gx + ox, gy + oy)) else {
                    continue;
                };
                for q in bucket {
                    if (p.x - q.x).abs() <= radius && (p.y - q.y).abs() <= radius {
                        count += 1;
                        if count >= NEIGHBOR_THRESHOLD {
                            break 'scan;
                        }
                    }
                }
            }
        }
        if count >= NEIGHBOR_THRESHOLD {
            kept.push(*p);
        }
    }
    kept
}

fn cell_key(p: Point, cell: f32) -> (i32, i32) {
    ((p.x / cell).floor() as i32, (p.y / cell).floor() as i32)
}

fn dist_sq(a: Point, b: Point) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(x0: i32, y0: i32, w: i32, h: i32) -> Vec<Point> {
        let mut pts = Vec::new();
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                pts.push(Point::new(x as f32, y as f32));
            }
        }
        pts
    }

    fn sorted(mut pts: Vec<Point>) -> Vec<Point> {
        pts.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
        pts
    }

    #[test]
    fn small_sets_pass_through_unchanged() {
        let pts = grid(10, 10, 79, 1);
        assert_eq!(pts.len(), 79);
        assert_eq!(isolate_hand(&pts, 280, 210), pts);
    }

    #[test]
    fn keeps_largest_cluster_and_prunes() {
        // One 100-point clump up top plus two 50-point clumps below; the two
        // lower clumps end up sharing a centroid and win as the largest
        // cluster, while the top clump splits between the other two seeds.
        let mut pts = grid(20, 10, 10, 10);
        let lower: Vec<Point> = grid(100, 60, 10, 5)
            .into_iter()
            .chain(grid(100, 110, 10, 5))
            .collect();
        pts.extend(lower.iter().copied());

        let cleaned = isolate_hand(&pts, 280, 210);
        assert_eq!(cleaned, lower);
    }

    #[test]
    fn isolation_is_idempotent_on_its_own_output() {
        let mut pts = grid(20, 10, 10, 10);
        pts.extend(grid(100, 60, 10, 5));
        pts.extend(grid(100, 110, 10, 5));

        let once = isolate_hand(&pts, 280, 210);
        let twice = isolate_hand(&once, 280, 210);
        assert_eq!(once, twice);
    }

    #[test]
    fn output_set_does_not_depend_on_input_order() {
        let mut pts = grid(20, 10, 10, 10);
        pts.extend(grid(100, 60, 10, 5));
        pts.extend(grid(100, 110, 10, 5));
        let mut reversed = pts.clone();
        reversed.reverse();

        let a = isolate_hand(&pts, 280, 210);
        let b = isolate_hand(&reversed, 280, 210);
        assert_eq!(sorted(a), sorted(b));
    }

    #[test]
    fn output_is_subset_of_input() {
        let pts = grid(50, 50, 20, 20);
        let cleaned = isolate_hand(&pts, 280, 210);
        assert!(!cleaned.is_empty());
        assert!(cleaned.iter().all(|p| pts.contains(p)));
    }
}
