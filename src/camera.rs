use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Instant,
};

use anyhow::{Result, anyhow};
use crossbeam_channel::Sender;
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    query,
    utils::{
        ApiBackend, CameraIndex, CameraInfo, FrameFormat, RequestedFormat, RequestedFormatType,
    },
};
use rayon::prelude::*;

use crate::types::Frame;

// Formats webcams reliably deliver. YUYV is left out on purpose: several
// drivers advertise it and then fail the stream open.
const PREFERRED_PIXEL_FORMATS: &[FrameFormat] = &[
    FrameFormat::MJPEG,
    FrameFormat::NV12,
    FrameFormat::RAWRGB,
    FrameFormat::RAWBGR,
];

/// Request ladder, strictest first. Frame rate matters more than resolution
/// here since every frame gets resampled to the small analysis raster anyway.
fn requested_formats() -> [RequestedFormat<'static>; 3] {
    [
        RequestedFormat::with_formats(
            RequestedFormatType::AbsoluteHighestFrameRate,
            PREFERRED_PIXEL_FORMATS,
        ),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::None),
    ]
}

#[derive(Clone, Debug)]
pub struct CameraDevice {
    pub index: CameraIndex,
    pub label: String,
}

/// Handle over the capture thread. Dropping it stops the stream.
#[derive(Debug)]
pub struct CameraStream {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl CameraStream {
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for CameraStream {
    fn drop(&mut self) {
        self.shutdown();
    }
}

pub fn available_cameras() -> Result<Vec<CameraDevice>> {
    let cameras = query(ApiBackend::Auto)?;
    Ok(cameras
        .into_iter()
        .map(|info| CameraDevice {
            index: info.index().clone(),
            label: format_camera_label(&info),
        })
        .collect())
}

fn format_camera_label(info: &CameraInfo) -> String {
    let name = info.human_name();
    let desc = info.description().trim();
    if desc.is_empty() || desc == "N/A" {
        format!("{name} (#{})", info.index().as_string())
    } else {
        format!("{name} ({desc})")
    }
}

/// Walks the format ladder until one opens and streams. The first error is
/// as useful as the last, but the last reflects the loosest request, so
/// that is the one reported.
fn build_camera(index: CameraIndex) -> Result<Camera> {
    let mut last_err = None;

    for requested in requested_formats() {
        let mut camera = match Camera::new(index.clone(), requested) {
            Ok(camera) => camera,
            Err(err) => {
                last_err = Some(err.into());
                continue;
            }
        };
        match camera.open_stream() {
            Ok(()) => return Ok(camera),
            Err(err) => last_err = Some(err.into()),
        }
    }

    Err(last_err.unwrap_or_else(|| anyhow!("no camera format accepted by the device")))
}

/// Spawns the capture thread. Frames go out through a single-slot channel
/// with `try_send`: when the detector falls behind, frames are dropped at
/// the source instead of queueing up.
pub fn start_camera_stream(index: CameraIndex, frame_tx: Sender<Frame>) -> Result<CameraStream> {
    // Open once up front so a bad index fails the caller, not the thread.
    build_camera(index.clone())?;

    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = stop.clone();

    let handle = thread::spawn(move || {
        let mut camera = match build_camera(index) {
            Ok(cam) => cam,
            Err(err) => {
                log::error!("camera re-open failed: {err:?}");
                return;
            }
        };

        while !stop_flag.load(Ordering::Relaxed) {
            if let Some(frame) = capture_frame(&mut camera) {
                let _ = frame_tx.try_send(frame);
            }
        }
    });

    Ok(CameraStream {
        stop,
        handle: Some(handle),
    })
}

/// Reads and decodes one frame, already expanded to RGBA and stamped with
/// the capture time. Read or decode failures are logged and yield `None`;
/// the capture loop simply tries again.
fn capture_frame(camera: &mut Camera) -> Option<Frame> {
    let buffer = match camera.frame() {
        Ok(buffer) => buffer,
        Err(err) => {
            log::warn!("camera read failed: {err:?}");
            return None;
        }
    };

    let decoded = match buffer.decode_image::<RgbFormat>() {
        Ok(img) => img,
        Err(err) => {
            log::warn!("frame decode failed: {err:?}");
            return None;
        }
    };

    let (width, height) = decoded.dimensions();
    let rgb = decoded.into_raw();
    if rgb.is_empty() {
        return None;
    }

    Some(Frame {
        rgba: expand_rgba(&rgb),
        width,
        height,
        timestamp: Instant::now(),
    })
}

fn expand_rgba(rgb: &[u8]) -> Vec<u8> {
    let pixel_count = rgb.len() / 3;
    let mut rgba = vec![0u8; pixel_count * 4];
    rgba.par_chunks_mut(4)
        .zip(rgb.par_chunks_exact(3))
        .for_each(|(dst, src)| {
            dst[0] = src[0];
            dst[1] = src[1];
            dst[2] = src[2];
            dst[3] = 255;
        });
    rgba
}
