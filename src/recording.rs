use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::Utc;
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};

use crate::error::OrientationError;
use crate::types::{RotationSample, ScreenRotation, SensorAccuracy};

/// One captured sensor event: the raw sample plus the host state it was
/// delivered under.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordedSample {
    pub sample: RotationSample,
    pub screen_rotation: ScreenRotation,
    pub accuracy: SensorAccuracy,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogMetadata {
    pub session_id: String,
    pub start_time: String,
}

/// Complete recorded session (JSON-serializable).
///
/// Replaying a log through the engine reproduces the exact dispatch
/// sequence the device saw, screen rotations and accuracy changes included.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrientationLog {
    pub metadata: LogMetadata,
    pub samples: Vec<RecordedSample>,
}

impl OrientationLog {
    pub fn new() -> Self {
        let session_id = format!("orientation_{}", Utc::now().timestamp_millis());
        let start_time = Utc::now().to_rfc3339();

        Self {
            metadata: LogMetadata {
                session_id,
                start_time,
            },
            samples: Vec::new(),
        }
    }

    pub fn push(
        &mut self,
        sample: RotationSample,
        screen_rotation: ScreenRotation,
        accuracy: SensorAccuracy,
    ) {
        self.samples.push(RecordedSample {
            sample,
            screen_rotation,
            accuracy,
        });
    }

    /// Serialize to a pretty JSON string.
    pub fn to_json(&self) -> Result<String, OrientationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a recorded log, transparently decompressing `.gz` files.
    pub fn load(path: &Path) -> Result<Self, OrientationError> {
        let file = File::open(path)?;
        if path.extension().map(|e| e == "gz").unwrap_or(false) {
            let gz = GzDecoder::new(file);
            Ok(serde_json::from_reader(BufReader::new(gz))?)
        } else {
            Ok(serde_json::from_reader(BufReader::new(file))?)
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl Default for OrientationLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_json_round_trip() {
        let mut log = OrientationLog::new();
        log.push(
            RotationSample::new(0.1, 0.2, 0.3, 1.0).with_scalar(0.927),
            ScreenRotation::Rot90,
            SensorAccuracy::High,
        );
        log.push(
            RotationSample::new(0.0, 0.0, 0.0, 2.0),
            ScreenRotation::Rot0,
            SensorAccuracy::Unreliable,
        );

        let json = log.to_json().unwrap();
        assert!(json.contains(&log.metadata.session_id));

        let decoded: OrientationLog = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded.samples[0].screen_rotation, ScreenRotation::Rot90);
        assert_eq!(decoded.samples[1].accuracy, SensorAccuracy::Unreliable);
        assert_eq!(decoded.samples[1].sample.w, None);
    }

    #[test]
    fn test_new_log_is_empty() {
        let log = OrientationLog::new();
        assert!(log.is_empty());
        assert!(log.metadata.session_id.starts_with("orientation_"));
    }
}
