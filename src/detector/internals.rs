use std::sync::Arc;

use rustfft::Fft;

use crate::float::Float;
use crate::utils::buffer::{
    cartesian_to_polar, copy_real_to_complex, new_complex_buffer, new_real_buffer,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pitch<T>
where
    T: Float,
{
    pub frequency: T,
    pub confidence: T,
}

impl<T: Float> Pitch<T> {
    /// The "no pitch" result: zero frequency and zero confidence.
    pub fn unvoiced() -> Self {
        Pitch {
            frequency: T::zero(),
            confidence: T::zero(),
        }
    }

    pub fn is_voiced(&self) -> bool {
        self.frequency > T::zero()
    }
}

/// Build the weighted, Hermitian-symmetric power spectrum of a
/// `result.len()`-point frame from its `result.len() / 2 + 1` magnitude bins.
///
/// Returns twice the power of bins `1..=N/2`; bin 0 has no mirror and is
/// left out.
pub fn weighted_power_spectrum<T: Float>(spectrum: &[T], weights: &[T], result: &mut [T]) -> T {
    let size = result.len();
    assert_eq!(spectrum.len(), size / 2 + 1);
    assert_eq!(weights.len(), spectrum.len());

    result[0] = spectrum[0] * spectrum[0] * weights[0];
    let sum = (1..spectrum.len()).fold(T::zero(), |sum, i| {
        let power = spectrum[i] * spectrum[i] * weights[i];
        result[i] = power;
        result[size - i] = power;
        sum + power
    });

    sum + sum
}

/// Compute the YIN difference function of the frame described by
/// `power_spectrum` as `sum - Re(FFT(power_spectrum))`, writing lags
/// `0..result.len()` into `result`. Lag 0 is left untouched.
///
/// The transform of the power spectrum is the (unnormalized) autocorrelation,
/// so this is the squared difference up to a constant factor.
pub fn spectral_difference<T: Float>(
    power_spectrum: &[T],
    sum: T,
    fft: &Arc<dyn Fft<T>>,
    result: &mut [T],
) {
    assert_eq!(fft.len(), power_spectrum.len());
    assert!(result.len() <= power_spectrum.len());

    let mut buffer = new_complex_buffer(power_spectrum.len());
    copy_real_to_complex(power_spectrum, &mut buffer);
    fft.process(&mut buffer);

    let mut magnitude = new_real_buffer(result.len());
    let mut phase = new_real_buffer(result.len());
    cartesian_to_polar(&buffer, &mut magnitude, &mut phase);

    result
        .iter_mut()
        .zip(magnitude.iter().zip(phase.iter()))
        .skip(1)
        .for_each(|(r, (&m, &p))| *r = sum - m * p.cos());
}

/// Calculate the "cumulative mean normalized difference function" as
/// specified in the YIN paper. If _d(t)_ is the difference function,
/// compute _d'(0) = 1_ and for _t > 0_
///
///  > d'(t) = d(t) / [ (1/t) * sum_{i=1}^t d(i) ]
pub fn yin_normalize_square_error<T: Float>(square_error: &mut [T]) {
    let mut sum = T::zero();
    square_error[0] = T::one();
    square_error
        .iter_mut()
        .enumerate()
        .skip(1)
        .for_each(|(i, a)| {
            sum = sum + *a;
            *a = *a * T::from_usize_lossy(i) / sum;
        });
}

/// Smallest value of `arr`, or +inf when empty.
pub fn min_value<T: Float>(arr: &[T]) -> T {
    arr.iter().fold(T::infinity(), |min, &v| min.min(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rustfft::FftPlanner;

    #[test]
    fn yin_normalized_square_error_test() {
        let signal: &mut Vec<f64> = &mut vec![0., 6., 14.];
        let result = vec![1., 1., 2. * 14. / (6. + 14.)];

        yin_normalize_square_error(signal);

        assert_eq!(result, *signal);
    }

    #[test]
    fn power_spectrum_is_mirrored() {
        let spectrum = [1., 2., 3.];
        let weights = [1., 0.5, 2.];
        let mut result = vec![0.; 4];

        let sum = weighted_power_spectrum(&spectrum, &weights, &mut result);

        assert_eq!(result, vec![1., 2., 18., 2.]);
        assert_eq!(sum, 2. * (2. + 18.));
    }

    #[test]
    fn difference_matches_direct_autocorrelation() {
        let spectrum = [0.5, 1., 3., 2., 0.25];
        let weights = [1.; 5];
        let mut power = vec![0.; 8];
        let sum = weighted_power_spectrum(&spectrum, &weights, &mut power);

        let fft = FftPlanner::new().plan_fft_forward(8);
        let mut result = vec![0.; 5];
        spectral_difference(&power, sum, &fft, &mut result);

        for (tau, &r) in result.iter().enumerate().skip(1) {
            let autocorrelation: f64 = power
                .iter()
                .enumerate()
                .map(|(k, p)| p * (2. * std::f64::consts::PI * (k * tau) as f64 / 8.).cos())
                .sum();
            assert_abs_diff_eq!(r, sum - autocorrelation, epsilon = 1e-9);
        }
    }

    #[test]
    fn minimum() {
        assert_eq!(min_value(&[3., -1., 2.]), -1.);
        assert_eq!(min_value::<f64>(&[]), f64::INFINITY);
    }
}
