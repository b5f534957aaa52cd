mod camera;
mod config;
mod detector;
mod overlay;
mod session;
mod types;

use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use crossbeam_channel::Receiver;

use crate::{config::DetectorConfig, session::Session, types::RecognizedFrame};

fn main() -> Result<()> {
    env_logger::init();

    let requested: Option<usize> = match std::env::args().nth(1) {
        Some(arg) => Some(arg.parse().context("camera index must be a number")?),
        None => None,
    };

    let cameras = camera::available_cameras()?;
    if cameras.is_empty() {
        bail!("no cameras found");
    }
    for device in &cameras {
        log::info!("camera: {}", device.label);
    }

    let device = match requested {
        Some(i) => cameras
            .get(i)
            .with_context(|| format!("camera index {i} out of range (found {})", cameras.len()))?,
        None => &cameras[0],
    };
    log::info!("using {}", device.label);

    let mut session = Session::new(DetectorConfig::default());
    let updates = session.start(device.index.clone())?;

    render_updates(updates)?;

    session.stop();
    Ok(())
}

/// Prints each detection on a single rewritten terminal line until the
/// result channel closes.
fn render_updates(updates: Receiver<RecognizedFrame>) -> Result<()> {
    let mut stdout = io::stdout();
    let mut previous_len: usize = 0;

    for recognized in updates {
        let line = recognized.update.display_text();
        let padding = previous_len.saturating_sub(line.chars().count());
        write!(stdout, "\r{line}{:padding$}", "")?;
        stdout.flush()?;
        previous_len = line.chars().count();
    }
    writeln!(stdout)?;
    Ok(())
}
