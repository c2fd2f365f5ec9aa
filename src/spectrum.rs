//! Hann-windowed magnitude spectrum of a time-domain frame.

use std::sync::Arc;

use rustfft::{Fft, FftPlanner};

use crate::error::{Error, Result};
use crate::float::Float;
use crate::utils::buffer::{
    copy_modulus_to_real, copy_real_to_complex, new_complex_buffer, new_real_buffer,
};
use crate::utils::window::hann_window;

pub struct SpectralPreprocessor<T: Float> {
    fft: Arc<dyn Fft<T>>,
}

impl<T: Float> SpectralPreprocessor<T> {
    pub fn new(frame_size: usize) -> Self {
        let mut planner = FftPlanner::new();
        SpectralPreprocessor {
            fft: planner.plan_fft_forward(frame_size),
        }
    }

    /// Share an already planned forward transform.
    pub fn with_fft(fft: Arc<dyn Fft<T>>) -> Self {
        SpectralPreprocessor { fft }
    }

    pub fn frame_size(&self) -> usize {
        self.fft.len()
    }

    /// Window `frame` in place and return the magnitudes of its first
    /// `frame_size / 2 + 1` frequency bins. The contents of `frame` are
    /// overwritten.
    pub fn prepare(&self, frame: &mut [T]) -> Result<Vec<T>> {
        let size = self.frame_size();
        if frame.len() != size {
            return Err(Error::FrameLength {
                expected: size,
                actual: frame.len(),
            });
        }

        hann_window(frame);

        let mut buffer = new_complex_buffer(size);
        copy_real_to_complex(frame, &mut buffer);
        self.fft.process(&mut buffer);

        let mut spectrum = new_real_buffer(size / 2 + 1);
        copy_modulus_to_real(&buffer, &mut spectrum);
        Ok(spectrum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rejects_wrong_length() {
        let preprocessor = SpectralPreprocessor::<f64>::new(16);
        assert_eq!(
            preprocessor.prepare(&mut [0.; 15]),
            Err(Error::FrameLength {
                expected: 16,
                actual: 15
            })
        );
    }

    #[test]
    fn constant_frame_is_windowed() {
        let preprocessor = SpectralPreprocessor::<f64>::new(8);
        let mut frame = vec![1.; 8];
        let spectrum = preprocessor.prepare(&mut frame).unwrap();

        assert_eq!(spectrum.len(), 5);
        assert_abs_diff_eq!(frame[0], 0.);
        // DC bin is the window's sum.
        assert_abs_diff_eq!(spectrum[0], frame.iter().sum::<f64>(), epsilon = 1e-12);
        assert!(spectrum[4] < spectrum[0]);
    }

    #[test]
    fn sine_peaks_at_its_bin() {
        let size = 64;
        let preprocessor = SpectralPreprocessor::<f64>::new(size);
        let mut frame: Vec<f64> = (0..size)
            .map(|i| (2. * std::f64::consts::PI * 8. * i as f64 / size as f64).sin())
            .collect();
        let spectrum = preprocessor.prepare(&mut frame).unwrap();

        let loudest = spectrum
            .iter()
            .enumerate()
            .fold((0, 0.), |best, (i, &m)| if m > best.1 { (i, m) } else { best });
        assert_eq!(loudest.0, 8);
    }
}
