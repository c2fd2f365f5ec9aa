//! Perceptual weighting curves applied to the power spectrum before the
//! difference function is computed.
//!
//! A curve is a piecewise-linear gain (in dB) over frequency. The standard
//! curves share the third-octave breakpoints in [FREQUENCY_BANDS]; a
//! [WeightingCurve] built with [WeightingCurve::new] may use its own.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::float::Float;

/// Number of control points in every weighting curve.
pub const CURVE_SIZE: usize = 34;

/// Breakpoints (Hz) shared by the built-in curves.
pub const FREQUENCY_BANDS: [f32; CURVE_SIZE] = [
    0., 20., 25., 31.5, 40., 50., 63., 80., 100., 125., 160., 200., 250., 315., 400., 500., 630.,
    800., 1000., 1250., 1600., 2000., 2500., 3150., 4000., 5000., 6300., 8000., 9000., 10000.,
    12500., 15000., 20000., 25100.,
];

/// Ordered `(frequency, gain in dB)` control points.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightingCurve {
    bands: [f32; CURVE_SIZE],
    gains: [f32; CURVE_SIZE],
}

impl WeightingCurve {
    /// Flat 0 dB response.
    pub const EMPTY: WeightingCurve = WeightingCurve {
        bands: FREQUENCY_BANDS,
        gains: [0.; CURVE_SIZE],
    };

    /// Default curve tuned for pitch tracking: attenuates the low end hard and
    /// emphasises the 2-5 kHz presence region.
    pub const CUSTOM: WeightingCurve = WeightingCurve {
        bands: FREQUENCY_BANDS,
        gains: [
            -75.8, -70.1, -60.8, -52.1, -44.2, -37.5, -31.3, -25.6, -20.9, -16.5, -12.6, -9.6,
            -7.0, -4.7, -3.0, -1.8, -0.8, -0.2, 0.0, 0.5, 1.6, 3.2, 5.4, 7.8, 8.1, 5.3, -2.4,
            -11.1, -12.8, -12.2, -7.4, -17.8, -17.8, -17.8,
        ],
    };

    pub const A: WeightingCurve = WeightingCurve {
        bands: FREQUENCY_BANDS,
        gains: [
            -148.6, -50.4, -44.8, -39.5, -34.5, -30.3, -26.2, -22.4, -19.1, -16.2, -13.2, -10.8,
            -8.7, -6.6, -4.8, -3.2, -1.9, -0.8, 0.0, 0.6, 1.0, 1.2, 1.3, 1.2, 1.0, 0.6, -0.1,
            -1.1, -1.8, -2.5, -4.3, -6.0, -9.3, -12.4,
        ],
    };

    pub const B: WeightingCurve = WeightingCurve {
        bands: FREQUENCY_BANDS,
        gains: [
            -96.4, -24.2, -20.5, -17.1, -14.1, -11.6, -9.4, -7.3, -5.6, -4.2, -2.9, -2.0, -1.4,
            -0.9, -0.5, -0.3, -0.1, 0.0, 0.0, 0.0, 0.0, -0.1, -0.2, -0.4, -0.7, -1.2, -1.9, -2.9,
            -3.6, -4.3, -6.1, -7.8, -11.2, -14.2,
        ],
    };

    pub const C: WeightingCurve = WeightingCurve {
        bands: FREQUENCY_BANDS,
        gains: [
            -52.5, -6.2, -4.4, -3.0, -2.0, -1.3, -0.8, -0.5, -0.3, -0.2, -0.1, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -0.1, -0.2, -0.3, -0.5, -0.8, -1.3, -2.0, -3.0, -3.7,
            -4.4, -6.2, -7.9, -11.3, -14.3,
        ],
    };

    pub const D: WeightingCurve = WeightingCurve {
        bands: FREQUENCY_BANDS,
        gains: [
            -46.6, -20.6, -18.7, -16.7, -14.7, -12.8, -10.9, -8.9, -7.2, -5.6, -3.9, -2.6, -1.6,
            -0.8, -0.4, -0.3, -0.5, -0.6, 0.0, 1.9, 5.0, 7.9, 10.3, 11.5, 11.1, 9.6, 7.6, 5.5,
            4.4, 3.4, 1.4, -0.2, -2.7, -4.7,
        ],
    };

    /// Build a curve from custom breakpoints. The first breakpoint must be 0 Hz
    /// and breakpoints must never decrease.
    pub fn new(bands: [f32; CURVE_SIZE], gains: [f32; CURVE_SIZE]) -> Result<Self> {
        if bands[0] != 0. {
            return Err(Error::InvalidWeightingCurve("first breakpoint must be 0 Hz"));
        }
        if bands.iter().any(|b| !b.is_finite()) {
            return Err(Error::InvalidWeightingCurve("breakpoints must be finite"));
        }
        if bands.windows(2).any(|w| w[1] < w[0]) {
            return Err(Error::InvalidWeightingCurve(
                "breakpoints must be non-decreasing",
            ));
        }
        if gains.iter().any(|g| !g.is_finite()) {
            return Err(Error::InvalidWeightingCurve("gains must be finite"));
        }
        Ok(WeightingCurve { bands, gains })
    }

    /// Build a curve over [FREQUENCY_BANDS] with the given gains.
    pub fn with_gains(gains: [f32; CURVE_SIZE]) -> Result<Self> {
        Self::new(FREQUENCY_BANDS, gains)
    }

    pub fn bands(&self) -> &[f32; CURVE_SIZE] {
        &self.bands
    }

    pub fn gains(&self) -> &[f32; CURVE_SIZE] {
        &self.gains
    }

    /// Gain in dB at `frequency`, interpolated between breakpoints `j - 1` and `j`.
    fn gain_between(&self, j: usize, frequency: f64) -> f64 {
        let a0 = self.gains[j - 1] as f64;
        let a1 = self.gains[j] as f64;
        let f0 = self.bands[j - 1] as f64;
        let f1 = self.bands[j] as f64;

        if f0 == f1 {
            a0
        } else if f0 == 0. {
            (a1 - a0) / f1 * frequency + a0
        } else {
            (a1 - a0) / (f1 - f0) * frequency + (a0 - (a1 - a0) / (f1 / f0 - 1.0))
        }
    }
}

/// Selects the perceptual weighting applied to the spectrum.
#[derive(Debug, Clone, PartialEq)]
pub enum Weighting {
    A,
    B,
    C,
    D,
    Custom(WeightingCurve),
    /// No weighting (flat 0 dB).
    Empty,
}

impl Weighting {
    pub fn curve(&self) -> &WeightingCurve {
        match self {
            Weighting::A => &WeightingCurve::A,
            Weighting::B => &WeightingCurve::B,
            Weighting::C => &WeightingCurve::C,
            Weighting::D => &WeightingCurve::D,
            Weighting::Custom(curve) => curve,
            Weighting::Empty => &WeightingCurve::EMPTY,
        }
    }
}

impl Default for Weighting {
    fn default() -> Self {
        Weighting::Custom(WeightingCurve::CUSTOM)
    }
}

impl FromStr for Weighting {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(Weighting::A),
            "B" => Ok(Weighting::B),
            "C" => Ok(Weighting::C),
            "D" => Ok(Weighting::D),
            "CUSTOM" => Ok(Weighting::Custom(WeightingCurve::CUSTOM)),
            "EMPTY" => Ok(Weighting::Empty),
            _ => Err(Error::UnknownWeighting(s.to_string())),
        }
    }
}

impl fmt::Display for Weighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weighting::A => "A",
            Weighting::B => "B",
            Weighting::C => "C",
            Weighting::D => "D",
            Weighting::Custom(_) => "CUSTOM",
            Weighting::Empty => "EMPTY",
        };
        f.write_str(name)
    }
}

/// Compute the linear gain of every bin of a `frame_size`-point spectrum
/// (`frame_size / 2 + 1` values) under `curve`.
pub fn compute_weights<T: Float>(
    frame_size: usize,
    sample_rate: f64,
    curve: &WeightingCurve,
) -> Vec<T> {
    let mut j = 1;

    (0..frame_size / 2 + 1)
        .map(|i| {
            let frequency = i as f64 / frame_size as f64 * sample_rate;
            while j < CURVE_SIZE - 1 && frequency > curve.bands[j] as f64 {
                j += 1;
            }
            let gain = curve.gain_between(j, frequency);
            T::from_f64_lossy(10f64.powf(gain / 20.))
        })
        .collect()
}
