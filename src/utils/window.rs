use crate::float::Float;

/// Multiply `frame` in place by a symmetric Hann window of the same length.
pub fn hann_window<T: Float>(frame: &mut [T]) {
    if frame.len() < 2 {
        return;
    }
    let half = T::from_f64_lossy(0.5);
    let step = T::from_f64_lossy(2. * std::f64::consts::PI) / T::from_usize_lossy(frame.len() - 1);
    frame
        .iter_mut()
        .enumerate()
        .for_each(|(i, s)| *s = *s * half * (T::one() - (step * T::from_usize_lossy(i)).cos()));
}
