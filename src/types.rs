use std::time::Instant;

/// A pixel coordinate in analysis-frame space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug)]
pub struct Frame {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub timestamp: Instant,
}

/// Per-frame summary of the isolated hand blob: bounding box, centroid and
/// pixel count. Recomputed every frame, no cross-frame identity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandInfo {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
    pub center_x: f32,
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
    pub pixel_count: usize,
}

impl HandInfo {
    pub fn from_points(points: &[Point]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        let mut sum_x = 0.0f32;
        let mut sum_y = 0.0f32;

        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
            sum_x += p.x;
            sum_y += p.y;
        }

        let count = points.len() as f32;
        Some(HandInfo {
            min_x,
            min_y,
            max_x,
            max_y,
            center_x: sum_x / count,
            center_y: sum_y / count,
            width: (max_x - min_x).max(1.0),
            height: (max_y - min_y).max(1.0),
            pixel_count: points.len(),
        })
    }
}

/// Sign-alphabet reading produced by the classifier. Variants sharing a
/// letter differ only in how the shape was interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignGesture {
    FistA,
    ClosedS,
    OneFinger,
    OneFingerThumb,
    TwoU,
    PeaceV,
    ThreeW,
    Four,
    FlatB,
    OpenFive,
    Unknown,
}

impl SignGesture {
    pub fn letter(&self) -> &'static str {
        match self {
            SignGesture::FistA => "A",
            SignGesture::ClosedS => "S",
            SignGesture::OneFinger | SignGesture::OneFingerThumb => "D",
            SignGesture::TwoU => "U",
            SignGesture::PeaceV => "V",
            SignGesture::ThreeW => "W",
            SignGesture::Four => "4",
            SignGesture::FlatB => "B",
            SignGesture::OpenFive => "5",
            SignGesture::Unknown => "?",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SignGesture::FistA => "Closed fist",
            SignGesture::ClosedS => "Closed hand",
            SignGesture::OneFinger => "One finger",
            SignGesture::OneFingerThumb => "One finger (likely thumb)",
            SignGesture::TwoU => "Two fingers",
            SignGesture::PeaceV => "Peace sign",
            SignGesture::ThreeW => "Three fingers",
            SignGesture::Four => "Four fingers",
            SignGesture::FlatB => "Flat/wide hand",
            SignGesture::OpenFive => "Open hand",
            SignGesture::Unknown => "Unknown gesture",
        }
    }
}

/// Result of running the detection pipeline over one frame.
#[derive(Clone, Debug)]
pub struct DetectionUpdate {
    pub gesture: Option<SignGesture>,
    pub stable: bool,
    pub hand: Option<HandInfo>,
    pub fingertips: Vec<Point>,
}

impl DetectionUpdate {
    pub fn display_text(&self) -> String {
        match &self.gesture {
            Some(g) if self.stable => format!("\u{2713} {} - {}", g.letter(), g.description()),
            Some(g) => format!("{} - {}", g.letter(), g.description()),
            None => "No hand detected - show your palm".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RecognizedFrame {
    pub frame: Frame,
    pub update: DetectionUpdate,
}
