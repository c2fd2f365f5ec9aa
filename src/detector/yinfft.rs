//! YinFFT is a frequency-domain variant of the
//! *[YIN](http://recherche.ircam.fr/equipes/pcm/cheveign/ps/2002_JASA_YIN_proof.pdf)*
//! pitch estimator, as described by P. M. Brossier in *Automatic Annotation of
//! Musical Audio for Interactive Applications*.
//!
//! Instead of computing the difference function in the time domain, the
//! detector works from the magnitude spectrum of a Hann-windowed frame. The
//! squared spectrum is first shaped by a perceptual [Weighting] curve, then
//! transformed once more: the transform of a power spectrum is the
//! autocorrelation of the frame, from which the YIN difference function
//! $$ d(t) = r(0) - r(t) $$
//! follows directly. The *cumulative mean normalized difference function*
//! $$ d\'(t) = \begin{cases}1&\text{if }t=0\\\\ d(t) / \left[ \tfrac{1}{t}\sum_{i=1}^t d(i) \right] & \text{otherwise}\end{cases} $$
//! is then searched for its minimum over the configured period range, either
//! by a plain scan of integer lags or by quadratic interpolation around the
//! deepest dip. The reported confidence is $1 - d\'(\tau)$.
//!
//! A silent frame, a frame whose curve never drops below the configured
//! tolerance, or a period of zero yield [Pitch::unvoiced] rather than an error.
//!
//! ```
//! use yinfft::detector::yinfft::{DetectorConfig, YinFftDetector};
//! use yinfft::detector::PitchDetector;
//!
//! let config = DetectorConfig {
//!     frame_size: 4096,
//!     sample_rate: 44100.,
//!     ..Default::default()
//! };
//! let detector = YinFftDetector::<f64>::new(config).unwrap();
//!
//! let mut frame: Vec<f64> = (0..4096)
//!     .map(|i| (2.0 * std::f64::consts::PI * 220.0 * i as f64 / 44100.0).sin())
//!     .collect();
//! let pitch = detector.detect_from_frame(&mut frame).unwrap();
//! assert!((pitch.frequency - 220.0).abs() < 1.0);
//! ```

use std::sync::Arc;

use rustfft::{Fft, FftPlanner};
use tracing::{debug, trace};

use crate::detector::internals::{
    min_value, spectral_difference, weighted_power_spectrum, yin_normalize_square_error, Pitch,
};
use crate::detector::tau::{DirectScan, PeakRefined, TauSelector};
use crate::detector::PitchDetector;
use crate::error::{Error, Result};
use crate::float::Float;
use crate::spectrum::SpectralPreprocessor;
use crate::utils::buffer::new_real_buffer;
use crate::weighting::{compute_weights, Weighting};

#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    /// Length of the time-domain frame in samples.
    pub frame_size: usize,
    /// Sampling rate in Hz.
    pub sample_rate: f64,
    /// Refine the period below one sample with quadratic interpolation.
    pub interpolate: bool,
    /// When below 1, frames whose normalized difference never drops below
    /// this value are reported as unvoiced.
    pub tolerance: f64,
    pub weighting: Weighting,
    pub min_frequency: f64,
    pub max_frequency: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig {
            frame_size: 4096,
            sample_rate: 44100.,
            interpolate: true,
            tolerance: 1.,
            weighting: Weighting::default(),
            min_frequency: 20.,
            max_frequency: 22050.,
        }
    }
}

impl DetectorConfig {
    /// Validate the configuration and return the searched period range
    /// `(min, max)` in samples.
    pub fn period_bounds(&self) -> Result<(usize, usize)> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.) {
            return Err(Error::InvalidSampleRate(self.sample_rate));
        }
        if !(0. ..=1.).contains(&self.tolerance) {
            return Err(Error::InvalidTolerance(self.tolerance));
        }

        let half = self.frame_size / 2;
        let range_error = Error::InvalidFrequencyRange {
            min_detectable: self.sample_rate / half as f64,
        };

        let (min_f, max_f) = (self.min_frequency, self.max_frequency);
        let in_range = min_f.is_finite()
            && max_f.is_finite()
            && min_f > 0.
            && min_f < max_f
            && max_f <= self.sample_rate / 2.;
        if !in_range {
            return Err(range_error);
        }

        let max_period = ((self.sample_rate / min_f).ceil() as usize).min(half);
        let min_period = ((self.sample_rate / max_f).floor() as usize).min(half);
        if max_period <= min_period {
            return Err(range_error);
        }

        Ok((min_period, max_period))
    }
}

pub struct YinFftDetector<T>
where
    T: Float,
{
    config: DetectorConfig,
    weights: Vec<T>,
    min_period: usize,
    max_period: usize,
    fft: Arc<dyn Fft<T>>,
    preprocessor: SpectralPreprocessor<T>,
    tau: Box<dyn TauSelector<T>>,
}

impl<T> YinFftDetector<T>
where
    T: Float,
{
    pub fn new(config: DetectorConfig) -> Result<Self> {
        let (min_period, max_period) = config.period_bounds()?;
        let cmnd_len = config.frame_size / 2 + 1;

        let tau: Box<dyn TauSelector<T>> = if config.interpolate {
            Box::new(PeakRefined::new(cmnd_len, min_period, max_period)?)
        } else {
            Box::new(DirectScan::new(min_period, max_period)?)
        };

        let weights = compute_weights(
            config.frame_size,
            config.sample_rate,
            config.weighting.curve(),
        );

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.frame_size);

        debug!(
            frame_size = config.frame_size,
            sample_rate = config.sample_rate,
            weighting = %config.weighting,
            min_period,
            max_period,
            tau = tau.name(),
            "yinfft detector configured"
        );

        Ok(YinFftDetector {
            preprocessor: SpectralPreprocessor::with_fft(Arc::clone(&fft)),
            config,
            weights,
            min_period,
            max_period,
            fft,
            tau,
        })
    }

    pub fn with_default_config() -> Result<Self> {
        Self::new(DetectorConfig::default())
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Linear gain applied to each spectrum bin.
    pub fn weights(&self) -> &[T] {
        &self.weights
    }

    /// Searched period range `(min, max)` in samples.
    pub fn period_bounds(&self) -> (usize, usize) {
        (self.min_period, self.max_period)
    }

    /// Like [PitchDetector::detect_from_frame], but leaves `frame` untouched.
    pub fn detect_from_samples(&self, frame: &[T]) -> Result<Pitch<T>> {
        let mut scratch = frame.to_vec();
        self.detect_from_frame(&mut scratch)
    }

    /// Cumulative mean normalized difference of the frame described by
    /// `spectrum`, or `None` for a frame without energy.
    fn cmnd(&self, spectrum: &[T]) -> Option<Vec<T>> {
        let mut power = new_real_buffer(self.config.frame_size);
        let sum = weighted_power_spectrum(spectrum, &self.weights, &mut power);
        if sum == T::zero() {
            return None;
        }

        let mut yin = new_real_buffer(spectrum.len());
        spectral_difference(&power, sum, &self.fft, &mut yin);
        yin_normalize_square_error(&mut yin);
        Some(yin)
    }
}

impl<T> PitchDetector<T> for YinFftDetector<T>
where
    T: Float,
{
    fn detect_from_frame(&self, frame: &mut [T]) -> Result<Pitch<T>> {
        if frame.len() != self.config.frame_size {
            return Err(Error::FrameLength {
                expected: self.config.frame_size,
                actual: frame.len(),
            });
        }
        let spectrum = self.preprocessor.prepare(frame)?;
        self.detect_from_spectrum(&spectrum)
    }

    fn detect_from_spectrum(&self, spectrum: &[T]) -> Result<Pitch<T>> {
        let expected = self.config.frame_size / 2 + 1;
        if spectrum.len() != expected {
            return Err(Error::SpectrumLength {
                expected,
                actual: spectrum.len(),
            });
        }

        let mut yin = match self.cmnd(spectrum) {
            Some(yin) => yin,
            None => {
                trace!("silent frame");
                return Ok(Pitch::unvoiced());
            }
        };

        if self.config.tolerance < 1. {
            let min = min_value(&yin);
            if min.into_f64() >= self.config.tolerance {
                trace!(min = %min, tolerance = self.config.tolerance, "no dip below tolerance");
                return Ok(Pitch::unvoiced());
            }
        }

        let tau = self.tau.select(&mut yin)?;
        trace!(period = %tau.period, cmnd = %tau.cmnd, "period selected");

        if tau.period == T::zero() {
            return Ok(Pitch::unvoiced());
        }

        Ok(Pitch {
            frequency: T::from_f64_lossy(self.config.sample_rate) / tau.period,
            confidence: T::one() - tau.cmnd,
        })
    }
}
