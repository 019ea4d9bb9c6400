use serde::{Deserialize, Serialize};

/// Raw rotation-vector sample from the platform's fused orientation sensor.
///
/// Some platforms deliver three components and leave the quaternion scalar
/// implicit; others deliver it explicitly. `w` stays `None` in the former
/// case and the matrix builder reconstructs it from the unit norm.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RotationSample {
    pub timestamp: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: Option<f64>,
}

impl RotationSample {
    pub fn new(x: f64, y: f64, z: f64, timestamp: f64) -> Self {
        Self {
            timestamp,
            x,
            y,
            z,
            w: None,
        }
    }

    pub fn with_scalar(mut self, w: f64) -> Self {
        self.w = Some(w);
        self
    }
}

/// Physical screen orientation relative to the device's natural orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenRotation {
    #[default]
    Rot0,
    Rot90,
    Rot180,
    Rot270,
}

/// Accuracy ordinal the sensor reports alongside its samples.
///
/// Ordering matters: the engine compares against a minimum level and drops
/// anything below it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SensorAccuracy {
    Unreliable,
    Low,
    Medium,
    High,
}

/// Display-relative attitude in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrientationAngles {
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
}

impl OrientationAngles {
    /// Convert extractor output (azimuth, pitch, roll in radians) to degrees.
    pub fn from_radians(azimuth: f64, pitch: f64, roll: f64) -> Self {
        Self {
            pitch: pitch.to_degrees(),
            roll: roll.to_degrees(),
            yaw: azimuth.to_degrees(),
        }
    }
}
