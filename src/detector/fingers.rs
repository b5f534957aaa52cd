use std::collections::VecDeque;

use crate::types::{HandInfo, Point};

const MAX_FINGERS: usize = 5;

/// Collapses fingertip candidates into a finger count. The tip list arrives
/// sorted left to right; a tip merges into the previous one when their
/// x-distance is below a hand-width-relative minimum, keeping whichever sits
/// higher. The count is always in [0, 5].
pub fn count_fingers(tips: &[Point], hand: &HandInfo) -> u8 {
    if tips.is_empty() {
        return 0;
    }

    let min_dist = (hand.width * 0.09).round().max(18.0);
    let mut merged: Vec<Point> = Vec::new();
    for &tip in tips {
        match merged.last_mut() {
            Some(last) if (tip.x - last.x).abs() < min_dist => {
                if tip.y < last.y {
                    *last = tip;
                }
            }
            _ => merged.push(tip),
        }
    }

    merged.len().min(MAX_FINGERS) as u8
}

/// Bounded FIFO of recent raw finger counts. The smoothed count is the
/// rolling mean rounded to the nearest integer. Cleared whenever the hand
/// leaves the frame.
pub struct FingerHistory {
    counts: VecDeque<u8>,
    capacity: usize,
}

impl FingerHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            counts: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, raw: u8) -> u8 {
        self.counts.push_back(raw);
        while self.counts.len() > self.capacity {
            self.counts.pop_front();
        }
        let sum: u32 = self.counts.iter().map(|&c| u32::from(c)).sum();
        (sum as f32 / self.counts.len() as f32).round() as u8
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
