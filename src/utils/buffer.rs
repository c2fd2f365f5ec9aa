use rustfft::num_complex::Complex;
use rustfft::num_traits::Zero;

use crate::float::Float;

pub fn new_real_buffer<T: Float>(size: usize) -> Vec<T> {
    vec![T::zero(); size]
}

pub fn new_complex_buffer<T: Float>(size: usize) -> Vec<Complex<T>> {
    vec![Complex::zero(); size]
}

/// Copy `input` into the real part of `output`, zeroing the imaginary parts
/// and any trailing elements of `output`.
pub fn copy_real_to_complex<T: Float>(input: &[T], output: &mut [Complex<T>]) {
    assert!(input.len() <= output.len());
    input.iter().zip(output.iter_mut()).for_each(|(i, o)| {
        o.re = *i;
        o.im = T::zero();
    });
    output[input.len()..]
        .iter_mut()
        .for_each(|o| *o = Complex::zero())
}

/// Computes |x| for the first `output.len()` complex values in `input`.
pub fn copy_modulus_to_real<T: Float>(input: &[Complex<T>], output: &mut [T]) {
    assert!(output.len() <= input.len());
    output
        .iter_mut()
        .zip(input)
        .for_each(|(o, c)| *o = c.norm());
}

/// Split each complex value into its polar form, writing magnitudes and phases.
pub fn cartesian_to_polar<T: Float>(input: &[Complex<T>], magnitude: &mut [T], phase: &mut [T]) {
    assert!(magnitude.len() <= input.len() && phase.len() <= input.len());
    input
        .iter()
        .zip(magnitude.iter_mut().zip(phase.iter_mut()))
        .for_each(|(c, (m, p))| {
            let (r, theta) = c.to_polar();
            *m = r;
            *p = theta;
        });
}
