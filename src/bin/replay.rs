use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use clap::Parser;
use orientation_tracker_rs::{
    ChannelListener, OrientationEngine, OrientationLog, PassiveSource, ScreenRotation,
};
use serde_json::json;

#[derive(Parser, Debug)]
struct Args {
    /// Path to a recorded orientation log (.json or .json.gz)
    #[arg(long)]
    log: PathBuf,

    /// Replay under this screen rotation (degrees) instead of the recorded one
    #[arg(long)]
    rotation: Option<u32>,
}

fn rotation_from_degrees(degrees: u32) -> anyhow::Result<ScreenRotation> {
    Ok(match degrees {
        0 => ScreenRotation::Rot0,
        90 => ScreenRotation::Rot90,
        180 => ScreenRotation::Rot180,
        270 => ScreenRotation::Rot270,
        _ => bail!("unsupported screen rotation {degrees}; expected 0, 90, 180 or 270"),
    })
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let forced = args.rotation.map(rotation_from_degrees).transpose()?;

    let log = OrientationLog::load(&args.log)?;

    // channel sized to the log so a slow collector never drops a sample
    let (listener, rx) = ChannelListener::bounded(log.len().max(1));
    let mut engine = OrientationEngine::new(PassiveSource::new());
    engine.start_listening(Arc::new(listener));

    for recorded in &log.samples {
        engine.handle_accuracy_change(recorded.accuracy);
        let rotation = forced.unwrap_or(recorded.screen_rotation);
        engine.handle_sample(&recorded.sample, rotation);
    }

    let snapshot = engine.snapshot();
    engine.stop_listening();

    let angles: Vec<_> = rx.try_iter().collect();
    let summary = json!({
        "log": args.log.display().to_string(),
        "session_id": log.metadata.session_id,
        "start_time": log.metadata.start_time,
        "recorded_samples": log.len(),
        "dispatched": snapshot.samples_dispatched,
        "dropped_low_accuracy": snapshot.samples_dropped,
        "pitch_range_deg": min_max(angles.iter().map(|a| a.pitch)),
        "roll_range_deg": min_max(angles.iter().map(|a| a.roll)),
        "yaw_range_deg": min_max(angles.iter().map(|a| a.yaw)),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
