use crate::detector::internals::Pitch;
use crate::error::Result;
use crate::float::Float;

pub mod internals;
pub mod tau;
pub mod yinfft;

pub trait PitchDetector<T>
where
    T: Float,
{
    /// Estimate the pitch of a time-domain frame. `frame` is used as scratch
    /// and holds the windowed signal afterwards.
    fn detect_from_frame(&self, frame: &mut [T]) -> Result<Pitch<T>>;

    /// Estimate the pitch from a Hann-windowed magnitude spectrum.
    fn detect_from_spectrum(&self, spectrum: &[T]) -> Result<Pitch<T>>;
}
