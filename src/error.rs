use thiserror::Error;

/// Orientation tracker error types.
///
/// The engine itself has no fallible operations — an unavailable sensor,
/// an unreliable sample, or a duplicate start are all absorbed without an
/// error by design. Only the recording surfaces can fail.
#[derive(Error, Debug)]
pub enum OrientationError {
    #[error("log I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("log decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}
