// Orientation Tracker
// Converts fused rotation-vector samples into display-relative
// pitch/roll/yaw delivered to a single listener per accepted sample.

pub mod attitude;
pub mod engine;
pub mod error;
pub mod recording;
pub mod types;

pub use attitude::{
    orientation_from_matrix, remap_coordinate_system, rotation_matrix_from_vector, AxisRemap,
    SignedAxis,
};
pub use engine::{
    ChannelListener, EngineConfig, EngineSnapshot, OrientationEngine, OrientationListener,
    PassiveSource, RotationVectorSource, DEFAULT_SAMPLING_PERIOD,
};
pub use error::OrientationError;
pub use recording::{LogMetadata, OrientationLog, RecordedSample};
pub use types::{OrientationAngles, RotationSample, ScreenRotation, SensorAccuracy};
