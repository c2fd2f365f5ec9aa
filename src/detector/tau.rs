//! Strategies for picking the period (tau) that minimizes the cumulative mean
//! normalized difference function.

use crate::error::{Error, Result};
use crate::float::Float;
use crate::utils::peak::{PeakCorrection, PeakDetector, PeakDetectorConfig, PeakOrder};

/// A candidate period in samples together with the normalized difference at it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tau<T: Float> {
    pub period: T,
    pub cmnd: T,
}

pub trait TauSelector<T: Float>: Send + Sync {
    /// Pick the best period from `cmnd`, which holds lags `0..=N/2`. `cmnd`
    /// may be used as scratch.
    fn select(&self, cmnd: &mut [T]) -> Result<Tau<T>>;

    fn name(&self) -> &'static str;
}

/// Integer-lag minimum over `[min_period, max_period]`; the lowest lag wins ties.
#[derive(Debug, Clone)]
pub struct DirectScan {
    min_period: usize,
    max_period: usize,
}

impl DirectScan {
    pub fn new(min_period: usize, max_period: usize) -> Result<Self> {
        if min_period >= max_period {
            return Err(Error::InvalidPeakBounds {
                min: min_period as f64,
                max: max_period as f64,
            });
        }
        Ok(DirectScan {
            min_period,
            max_period,
        })
    }
}

impl<T: Float> TauSelector<T> for DirectScan {
    fn select(&self, cmnd: &mut [T]) -> Result<Tau<T>> {
        if cmnd.len() <= self.max_period {
            return Err(Error::SpectrumLength {
                expected: self.max_period + 1,
                actual: cmnd.len(),
            });
        }

        let (period, cmnd) = cmnd[self.min_period..=self.max_period]
            .iter()
            .enumerate()
            .fold((0, cmnd[self.min_period]), |(best, min), (i, &v)| {
                if v < min {
                    (i, v)
                } else {
                    (best, min)
                }
            });

        Ok(Tau {
            period: T::from_usize_lossy(self.min_period + period),
            cmnd,
        })
    }

    fn name(&self) -> &'static str {
        "direct"
    }
}

/// Sub-sample minimum: the strongest peak of the negated curve, refined by
/// quadratic interpolation.
#[derive(Debug, Clone)]
pub struct PeakRefined<T: Float> {
    peaks: PeakDetector<T>,
}

impl<T: Float> PeakRefined<T> {
    /// `len` is the length of the curves that will be handed to [TauSelector::select].
    pub fn new(len: usize, min_period: usize, max_period: usize) -> Result<Self> {
        let peaks = PeakDetector::new(PeakDetectorConfig {
            range: T::from_usize_lossy(len),
            max_peaks: 1,
            min_position: T::from_usize_lossy(min_period),
            max_position: T::from_usize_lossy(max_period),
            threshold: T::neg_infinity(),
            order_by: PeakOrder::Amplitude,
            correction: PeakCorrection::Quadratic,
            min_peak_distance: T::zero(),
        })?;
        Ok(PeakRefined { peaks })
    }
}

impl<T: Float> TauSelector<T> for PeakRefined<T> {
    fn select(&self, cmnd: &mut [T]) -> Result<Tau<T>> {
        cmnd.iter_mut().for_each(|v| *v = -*v);

        let peak = self
            .peaks
            .detect_peaks(cmnd)?
            .into_iter()
            .next()
            .ok_or(Error::NoPeakInRange)?;

        Ok(Tau {
            period: peak.position,
            cmnd: -peak.magnitude,
        })
    }

    fn name(&self) -> &'static str {
        "interpolated"
    }
}
