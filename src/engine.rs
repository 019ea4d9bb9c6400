use std::sync::Arc;
use std::time::Duration;

use crate::attitude::{
    orientation_from_matrix, remap_coordinate_system, rotation_matrix_from_vector, AxisRemap,
};
use crate::types::{OrientationAngles, RotationSample, ScreenRotation, SensorAccuracy};

/// Sampling period requested from the source on registration (~60 Hz).
pub const DEFAULT_SAMPLING_PERIOD: Duration = Duration::from_micros(16_000);

// ─── Capabilities ────────────────────────────────────────────────────────────

/// Consumer of display-relative attitude updates. Invoked at most once per
/// accepted sample, synchronously on the delivery thread.
pub trait OrientationListener {
    fn on_orientation_changed(&self, pitch: f64, roll: f64, yaw: f64);
}

impl<F> OrientationListener for F
where
    F: Fn(f64, f64, f64),
{
    fn on_orientation_changed(&self, pitch: f64, roll: f64, yaw: f64) {
        self(pitch, roll, yaw)
    }
}

/// Registration half of the platform sensor framework.
///
/// `register` is only reached when `is_available` reported a
/// rotation-vector sensor; sample delivery itself stays host-driven via
/// [`OrientationEngine::handle_sample`].
pub trait RotationVectorSource {
    fn is_available(&self) -> bool;
    fn register(&mut self, sampling_period: Duration);
    fn unregister(&mut self);
}

/// Source for hosts that push samples by hand — replays, tests, embeddings
/// without a sensor framework. Always available; registration is pure
/// bookkeeping.
#[derive(Debug, Default)]
pub struct PassiveSource {
    registered: bool,
}

impl PassiveSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }
}

impl RotationVectorSource for PassiveSource {
    fn is_available(&self) -> bool {
        true
    }

    fn register(&mut self, _sampling_period: Duration) {
        self.registered = true;
    }

    fn unregister(&mut self) {
        self.registered = false;
    }
}

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Sampling period requested from the source when listening starts.
    pub sampling_period: Duration,
    /// Samples delivered under a lower accuracy are dropped undispatched.
    pub min_accuracy: SensorAccuracy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sampling_period: DEFAULT_SAMPLING_PERIOD,
            min_accuracy: SensorAccuracy::Low,
        }
    }
}

/// Subscription state and dispatch counters, for diagnostics and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineSnapshot {
    pub listening: bool,
    pub last_accuracy: SensorAccuracy,
    pub samples_dispatched: u64,
    pub samples_dropped: u64,
}

// ─── The engine ──────────────────────────────────────────────────────────────

/// Stateful shell around the pure attitude pipeline.
///
/// Holds only the current listener and the last reported accuracy; every
/// sample is transformed independently, with no queueing or smoothing. The
/// host must serialize calls when embedding in a multi-threaded context —
/// the design assumes the sensor framework's one-callback-at-a-time
/// delivery.
pub struct OrientationEngine<S: RotationVectorSource> {
    config: EngineConfig,
    source: S,
    listener: Option<Arc<dyn OrientationListener>>,
    last_accuracy: SensorAccuracy,
    samples_dispatched: u64,
    samples_dropped: u64,
}

impl<S: RotationVectorSource> OrientationEngine<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, EngineConfig::default())
    }

    pub fn with_config(source: S, config: EngineConfig) -> Self {
        Self {
            config,
            source,
            listener: None,
            last_accuracy: SensorAccuracy::Unreliable,
            samples_dispatched: 0,
            samples_dropped: 0,
        }
    }

    /// Subscribe `listener` to attitude updates.
    ///
    /// Starting again with the listener already registered is a no-op.
    /// Without a rotation-vector sensor the engine stays idle — orientation
    /// reporting is unavailable, not broken.
    pub fn start_listening(&mut self, listener: Arc<dyn OrientationListener>) {
        if let Some(current) = &self.listener {
            if Arc::ptr_eq(current, &listener) {
                return;
            }
        }

        self.listener = Some(listener);
        if !self.source.is_available() {
            log::warn!("rotation vector sensor not available; will not provide orientation data");
            return;
        }
        self.source.register(self.config.sampling_period);
    }

    /// Unregister from the source and drop the listener. Safe to call in any
    /// state; no sample is dispatched after this returns.
    pub fn stop_listening(&mut self) {
        self.source.unregister();
        self.listener = None;
    }

    /// Record the source's latest accuracy. Never dispatches by itself.
    pub fn handle_accuracy_change(&mut self, accuracy: SensorAccuracy) {
        self.last_accuracy = accuracy;
    }

    /// Process one raw sample against the current screen rotation.
    ///
    /// Discards when nobody is listening or the last reported accuracy sits
    /// below the configured minimum; otherwise runs matrix build → axis
    /// remap → angle extraction and notifies the listener exactly once.
    pub fn handle_sample(&mut self, sample: &RotationSample, screen_rotation: ScreenRotation) {
        let Some(listener) = &self.listener else {
            return;
        };
        if self.last_accuracy < self.config.min_accuracy {
            self.samples_dropped += 1;
            return;
        }

        let matrix = rotation_matrix_from_vector(sample);
        let remap = AxisRemap::for_screen_rotation(screen_rotation);
        let adjusted = remap_coordinate_system(&matrix, &remap);
        let (azimuth, pitch, roll) = orientation_from_matrix(&adjusted);
        let angles = OrientationAngles::from_radians(azimuth, pitch, roll);

        self.samples_dispatched += 1;
        listener.on_orientation_changed(angles.pitch, angles.roll, angles.yaw);
    }

    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            listening: self.listener.is_some(),
            last_accuracy: self.last_accuracy,
            samples_dispatched: self.samples_dispatched,
            samples_dropped: self.samples_dropped,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

// ─── Channel adapter ─────────────────────────────────────────────────────────

/// Listener adapter forwarding angles into a bounded channel.
pub struct ChannelListener {
    tx: crossbeam::channel::Sender<OrientationAngles>,
}

impl ChannelListener {
    pub fn bounded(
        capacity: usize,
    ) -> (Self, crossbeam::channel::Receiver<OrientationAngles>) {
        let (tx, rx) = crossbeam::channel::bounded(capacity);
        (Self { tx }, rx)
    }
}

impl OrientationListener for ChannelListener {
    fn on_orientation_changed(&self, pitch: f64, roll: f64, yaw: f64) {
        match self.tx.try_send(OrientationAngles { pitch, roll, yaw }) {
            Ok(_) | Err(crossbeam::channel::TrySendError::Disconnected(_)) => {}
            Err(crossbeam::channel::TrySendError::Full(_)) => {
                // Channel full, drop this sample
            }
        }
    }
}
