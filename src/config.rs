use std::time::Duration;

/// Tunable knobs for the detection pipeline. Algorithm-internal thresholds
/// live as constants next to the stage they belong to.
#[derive(Clone, Copy, Debug)]
pub struct DetectorConfig {
    /// Width of the fixed analysis raster every captured frame is resampled to.
    pub analysis_width: u32,
    /// Height of the fixed analysis raster.
    pub analysis_height: u32,
    /// Number of raw finger counts kept for the rolling average.
    pub finger_history_len: usize,
    /// How long a gesture letter must persist before it is reported stable.
    pub stable_hold: Duration,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            analysis_width: 280,
            analysis_height: 210,
            finger_history_len: 6,
            stable_hold: Duration::from_millis(600),
        }
    }
}
