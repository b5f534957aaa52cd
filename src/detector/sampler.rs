use image::{ImageBuffer, Rgba, imageops};

use super::FrameError;
use crate::{config::DetectorConfig, types::Frame};

/// Copies a captured frame into the fixed-size analysis raster. Frames that
/// already match the analysis dimensions are passed through; anything else
/// is nearest-neighbor resampled.
pub fn sample_frame(frame: &Frame, config: &DetectorConfig) -> Result<Vec<u8>, FrameError> {
    if frame.width == 0 || frame.height == 0 {
        return Err(FrameError::EmptyFrame {
            width: frame.width,
            height: frame.height,
        });
    }
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.rgba.len() != expected {
        return Err(FrameError::BufferSize {
            expected,
            actual: frame.rgba.len(),
        });
    }

    if frame.width == config.analysis_width && frame.height == config.analysis_height {
        return Ok(frame.rgba.clone());
    }

    let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(frame.width, frame.height, frame.rgba.clone()).ok_or(
            FrameError::BufferSize {
                expected,
                actual: frame.rgba.len(),
            },
        )?;
    let resized = imageops::resize(
        &buffer,
        config.analysis_width,
        config.analysis_height,
        imageops::FilterType::Nearest,
    );
    Ok(resized.into_raw())
}
