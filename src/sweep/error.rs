use thiserror::Error;
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("sweep width must be finite and greater than zero, got {0}")]
    InvalidSweepWidth(f64),
    #[error("overlay margin must be within [0, 1], got {0}")]
    InvalidMargin(f64),
    #[error("sample rate must be greater than zero, got {0}")]
    InvalidSampleRate(f64),
    #[error("noise amplitude must be finite and at most half of f64::MAX, got {0}")]
    InvalidNoise(f64),
    #[error("at least one channel is required")]
    NoChannels,
    #[error("channel count mismatch: expected {expected}, got {actual}")]
    ChannelMismatch { expected: usize, actual: usize },
    #[error("invalid sample on channel {channel} at index {index}: timestamp and value must be finite")]
    InvalidSample { channel: usize, index: usize },
    #[error("timestamp on channel {channel} at index {index} goes backwards")]
    NonMonotonic { channel: usize, index: usize },
    #[error("unknown channel {0}")]
    UnknownChannel(usize),
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for SweepError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        SweepError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for SweepError {
    fn from(value: image::ImageError) -> Self {
        SweepError::Plot(value.to_string())
    }
}
