use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
};

use anyhow::{Result, bail};
use crossbeam_channel::{Receiver, bounded};
use nokhwa::utils::CameraIndex;

use crate::{
    camera::{self, CameraStream},
    config::DetectorConfig,
    detector,
    types::RecognizedFrame,
};

/// Lifecycle of a capture-and-detect session. Transitions are linear:
/// Idle -> Starting -> Active -> Stopping -> Idle. A failed start drops
/// straight back to Idle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Starting,
    Active,
    Stopping,
}

/// Owns the camera stream and the detector worker, wired together with
/// single-slot channels so both stay latest-frame only.
pub struct Session {
    config: DetectorConfig,
    state: SessionState,
    stop: Option<Arc<AtomicBool>>,
    camera: Option<CameraStream>,
    worker: Option<thread::JoinHandle<()>>,
}

impl Session {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            state: SessionState::Idle,
            stop: None,
            camera: None,
            worker: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Opens the camera and spawns the detection worker. Returns the channel
    /// carrying detection results.
    pub fn start(&mut self, index: CameraIndex) -> Result<Receiver<RecognizedFrame>> {
        if self.state != SessionState::Idle {
            bail!("session already running ({:?})", self.state);
        }
        self.state = SessionState::Starting;

        let (frame_tx, frame_rx) = bounded(1);
        let (result_tx, result_rx) = bounded(1);

        let camera = match camera::start_camera_stream(index, frame_tx) {
            Ok(stream) => stream,
            Err(err) => {
                self.state = SessionState::Idle;
                return Err(err);
            }
        };

        let stop = Arc::new(AtomicBool::new(false));
        let worker = detector::start_detector(self.config, frame_rx, result_tx, stop.clone());

        self.stop = Some(stop);
        self.camera = Some(camera);
        self.worker = Some(worker);
        self.state = SessionState::Active;
        Ok(result_rx)
    }

    /// Stops the camera, signals the worker and joins it. A no-op unless the
    /// session is Active.
    pub fn stop(&mut self) {
        if self.state != SessionState::Active {
            return;
        }
        self.state = SessionState::Stopping;

        if let Some(stop) = self.stop.take() {
            stop.store(true, Ordering::SeqCst);
        }
        if let Some(camera) = self.camera.take() {
            camera.stop();
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }

        self.state = SessionState::Idle;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_idle() {
        let session = Session::new(DetectorConfig::default());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn stopping_an_idle_session_is_a_no_op() {
        let mut session = Session::new(DetectorConfig::default());
        session.stop();
        session.stop();
        assert_eq!(session.state(), SessionState::Idle);
    }
}
