//! Local-maximum detection over a uniformly sampled curve.
//!
//! Sample `k` of an input of length `M` sits at position `k * range / (M - 1)`.
//! Peaks are found in a single left-to-right pass with explicit handling of
//! the first and last samples, optionally refined with quadratic
//! interpolation, optionally pruned so that no two survivors lie closer than
//! `min_peak_distance`, then ordered and truncated.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::float::Float;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeakCorrection {
    Quadratic,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeakOrder {
    Position,
    Amplitude,
}

impl FromStr for PeakOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "position" => Ok(PeakOrder::Position),
            "amplitude" => Ok(PeakOrder::Amplitude),
            _ => Err(Error::UnknownPeakOrder(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak<T: Float> {
    pub position: T,
    pub magnitude: T,
}

struct Point<T: Float> {
    x: T,
    y: T,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeakDetectorConfig<T: Float> {
    /// Position of the last input sample; the first is at 0.
    pub range: T,
    pub max_peaks: usize,
    pub min_position: T,
    pub max_position: T,
    /// Peaks must be strictly above this value.
    pub threshold: T,
    pub order_by: PeakOrder,
    pub correction: PeakCorrection,
    /// Disabled when not positive.
    pub min_peak_distance: T,
}

impl<T: Float> Default for PeakDetectorConfig<T> {
    fn default() -> Self {
        PeakDetectorConfig {
            range: T::one(),
            max_peaks: 100,
            min_position: T::zero(),
            max_position: T::one(),
            threshold: T::from_f64_lossy(-1e6),
            order_by: PeakOrder::Position,
            correction: PeakCorrection::Quadratic,
            min_peak_distance: T::zero(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PeakDetector<T: Float> {
    config: PeakDetectorConfig<T>,
}

impl<T: Float> PeakDetector<T> {
    pub fn new(config: PeakDetectorConfig<T>) -> Result<Self> {
        if !(config.min_position < config.max_position) {
            return Err(Error::InvalidPeakBounds {
                min: config.min_position.into_f64(),
                max: config.max_position.into_f64(),
            });
        }
        Ok(PeakDetector { config })
    }

    pub fn config(&self) -> &PeakDetectorConfig<T> {
        &self.config
    }

    pub fn detect_peaks(&self, input: &[T]) -> Result<Vec<Peak<T>>> {
        if input.len() < 2 {
            return Err(Error::InputTooShort(input.len()));
        }

        let mut peaks = self.scan(input);

        let cfg = &self.config;
        if cfg.min_peak_distance > T::zero() && peaks.len() > 1 {
            sort_by_magnitude(&mut peaks);
            suppress_neighbours(&mut peaks, cfg.min_peak_distance);
            if cfg.order_by == PeakOrder::Position {
                sort_by_position(&mut peaks);
            }
        } else if cfg.order_by == PeakOrder::Amplitude {
            sort_by_magnitude(&mut peaks);
        }

        peaks.truncate(cfg.max_peaks);
        Ok(peaks)
    }

    /// Collect every local maximum in `[min_position, max_position]`, in
    /// ascending position order.
    fn scan(&self, input: &[T]) -> Vec<Peak<T>> {
        let cfg = &self.config;
        let len = input.len();
        let scale = cfg.range / T::from_usize_lossy(len - 1);
        let threshold = cfg.threshold;
        let mut peaks = Vec::with_capacity(len);

        // Negative or NaN starts saturate to 0.
        let mut i = ((cfg.min_position / scale).ceil().into_f64() as usize).min(len - 1);

        // A descending run at the very start is a boundary maximum.
        if i + 1 < len && input[i] > input[i + 1] && input[i] > threshold {
            peaks.push(Peak {
                position: T::from_usize_lossy(i) * scale,
                magnitude: input[i],
            });
        }

        loop {
            let start = i;
            while i + 1 < len - 1 && input[i] >= input[i + 1] {
                i += 1;
            }
            while i + 1 < len - 1 && input[i] < input[i + 1] {
                i += 1;
            }

            // Right edge of a possible plateau.
            let mut j = i;
            while j + 1 < len - 1 && input[j] == input[j + 1] {
                j += 1;
            }

            if j + 1 < len - 1 && input[j + 1] < input[j] && input[j] > threshold {
                let point = if j != i {
                    let x = match cfg.correction {
                        PeakCorrection::Quadratic => {
                            T::from_usize_lossy(i + j) * T::from_f64_lossy(0.5)
                        }
                        PeakCorrection::None => T::from_usize_lossy(i),
                    };
                    Point { x, y: input[i] }
                } else {
                    correct_peak(j, input, cfg.correction)
                };

                let position = point.x * scale;
                if position > cfg.max_position {
                    break;
                }
                peaks.push(Peak {
                    position,
                    magnitude: point.y,
                });
            }

            i = j;
            // NaN compares false both ways.
            if i == start && i + 1 < len - 1 {
                i += 1;
            }

            if i + 1 >= len - 1 {
                if i >= 1
                    && i == len - 2
                    && input[i - 1] < input[i]
                    && input[i + 1] < input[i]
                    && input[i] > threshold
                {
                    let point = correct_peak(i, input, cfg.correction);
                    peaks.push(Peak {
                        position: point.x * scale,
                        magnitude: point.y,
                    });
                }
                break;
            }
        }

        let last = len - 1;
        let max_bin = cfg.max_position / scale;
        if T::from_usize_lossy(last - 1) < max_bin
            && max_bin <= T::from_usize_lossy(last)
            && input[last] > input[last - 1]
            && input[last] > threshold
        {
            peaks.push(Peak {
                position: T::from_usize_lossy(last) * scale,
                magnitude: input[last],
            });
        }

        peaks
    }
}

/// Split peaks into parallel position and magnitude vectors.
pub fn split_peaks<T: Float>(peaks: &[Peak<T>]) -> (Vec<T>, Vec<T>) {
    peaks.iter().map(|p| (p.position, p.magnitude)).unzip()
}

/// Greedy suppression over peaks sorted by descending magnitude: each
/// surviving peak removes every later peak closer than `min_distance`.
/// Removed peaks are never revisited.
fn suppress_neighbours<T: Float>(peaks: &mut Vec<Peak<T>>, min_distance: T) {
    let mut k = 0;
    while k + 1 < peaks.len() {
        let min_pos = peaks[k].position - min_distance;
        let max_pos = peaks[k].position + min_distance;
        let doomed: Vec<usize> = (k + 1..peaks.len())
            .filter(|&l| peaks[l].position > min_pos && peaks[l].position < max_pos)
            .collect();
        for &idx in doomed.iter().rev() {
            peaks.remove(idx);
        }
        k += 1;
    }
}

fn compare<T: Float>(a: T, b: T) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Descending magnitude, ties by ascending position.
fn sort_by_magnitude<T: Float>(peaks: &mut [Peak<T>]) {
    peaks.sort_by(|a, b| {
        compare(b.magnitude, a.magnitude).then_with(|| compare(a.position, b.position))
    });
}

/// Ascending position, ties by descending magnitude.
fn sort_by_position<T: Float>(peaks: &mut [Peak<T>]) {
    peaks.sort_by(|a, b| {
        compare(a.position, b.position).then_with(|| compare(b.magnitude, a.magnitude))
    });
}

/// Refine the maximum at `idx`. `idx` must have a neighbour on each side when
/// `correction` is quadratic.
fn correct_peak<T: Float>(idx: usize, data: &[T], correction: PeakCorrection) -> Point<T> {
    match correction {
        PeakCorrection::Quadratic => quadratic_interpolation(
            Point {
                x: T::from_usize_lossy(idx - 1),
                y: data[idx - 1],
            },
            Point {
                x: T::from_usize_lossy(idx),
                y: data[idx],
            },
            Point {
                x: T::from_usize_lossy(idx + 1),
                y: data[idx + 1],
            },
        ),
        PeakCorrection::None => Point {
            x: T::from_usize_lossy(idx),
            y: data[idx],
        },
    }
}

/// Fit a parabola through three equally spaced points and return its vertex.
/// The points must not be collinear.
fn quadratic_interpolation<T: Float>(
    left: Point<T>,
    center: Point<T>,
    right: Point<T>,
) -> Point<T> {
    let shift = T::from_f64_lossy(0.5) * (left.y - right.y)
        / (left.y - T::from_f64_lossy(2.0) * center.y + right.y);
    let x = center.x + shift;
    let y = center.y - T::from_f64_lossy(0.25) * (left.y - right.y) * shift;
    Point { x, y }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn detector(config: PeakDetectorConfig<f64>) -> PeakDetector<f64> {
        PeakDetector::new(config).unwrap()
    }

    /// Positions map one-to-one onto indices of an input of `len` samples.
    fn unit_scale(len: usize) -> PeakDetectorConfig<f64> {
        let last = (len - 1) as f64;
        PeakDetectorConfig {
            range: last,
            max_position: last,
            threshold: f64::NEG_INFINITY,
            correction: PeakCorrection::None,
            ..Default::default()
        }
    }

    #[test]
    fn peak_correction() {
        let point = quadratic_interpolation(
            Point {
                x: -1.5,
                y: -(1.5 * 1.5) + 4.0,
            },
            Point {
                x: -0.5,
                y: -(0.5 * 0.5) + 4.0,
            },
            Point {
                x: 0.5,
                y: -(0.5 * 0.5) + 4.0,
            },
        );
        assert_eq!(point.x, 0.0);
        assert_eq!(point.y, 4.0);
    }

    #[test]
    fn symmetric_triple_is_exact() {
        let point = correct_peak(5, &[0., 0., 0., 0., 1., 4., 1.], PeakCorrection::Quadratic);
        assert_eq!(point.x, 5.0);
        assert_eq!(point.y, 4.0);
    }

    #[test]
    fn asymmetric_triple_shifts_towards_larger_neighbour() {
        // y = -(x - 2.25)^2 sampled at 1, 2, 3.
        let f = |x: f64| -(x - 2.25) * (x - 2.25);
        let point = correct_peak(2, &[f(0.), f(1.), f(2.), f(3.)], PeakCorrection::Quadratic);
        assert_abs_diff_eq!(point.x, 2.25, epsilon = 1e-12);
        assert_abs_diff_eq!(point.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn invalid_config() {
        let config = PeakDetectorConfig::<f64> {
            min_position: 2.,
            max_position: 2.,
            ..Default::default()
        };
        assert_eq!(
            PeakDetector::new(config).unwrap_err(),
            Error::InvalidPeakBounds { min: 2., max: 2. }
        );
        assert_eq!("amplitude".parse::<PeakOrder>(), Ok(PeakOrder::Amplitude));
        assert!("loudest".parse::<PeakOrder>().unwrap_err().is_config());
    }

    #[test]
    fn short_input() {
        let d = detector(unit_scale(2));
        assert_eq!(d.detect_peaks(&[1.0]), Err(Error::InputTooShort(1)));
        assert_eq!(d.detect_peaks(&[]), Err(Error::InputTooShort(0)));
    }

    #[test]
    fn increasing_sequence_has_only_trailing_peak() {
        let input: Vec<f64> = (0..11).map(|i| i as f64).collect();

        let peaks = detector(unit_scale(11)).detect_peaks(&input).unwrap();
        assert_eq!(
            peaks,
            vec![Peak {
                position: 10.,
                magnitude: 10.
            }]
        );

        let config = PeakDetectorConfig {
            max_position: 8.,
            ..unit_scale(11)
        };
        assert!(detector(config).detect_peaks(&input).unwrap().is_empty());
    }

    #[test]
    fn leading_descent_is_a_peak() {
        let input = [5., 3., 1., 0., 2., 0.];
        let peaks = detector(unit_scale(6)).detect_peaks(&input).unwrap();
        assert_eq!(split_peaks(&peaks), (vec![0., 4.], vec![5., 2.]));
    }

    #[test]
    fn min_position_skips_early_peaks() {
        let input = [0., 3., 0., 0., 2., 0., 0.];
        let config = PeakDetectorConfig {
            min_position: 2.,
            ..unit_scale(7)
        };
        let peaks = detector(config).detect_peaks(&input).unwrap();
        assert_eq!(split_peaks(&peaks), (vec![4.], vec![2.]));
    }

    #[test]
    fn plateau_reports_edge_or_midpoint() {
        let input = [0., 1., 3., 3., 3., 1., 0.];

        let peaks = detector(unit_scale(7)).detect_peaks(&input).unwrap();
        assert_eq!(split_peaks(&peaks), (vec![2.], vec![3.]));

        let config = PeakDetectorConfig {
            correction: PeakCorrection::Quadratic,
            ..unit_scale(7)
        };
        let peaks = detector(config).detect_peaks(&input).unwrap();
        assert_eq!(split_peaks(&peaks), (vec![3.], vec![3.]));
    }

    #[test]
    fn threshold_is_exclusive() {
        let input = [0., 2., 0., 3., 0., 0.];
        let config = PeakDetectorConfig {
            threshold: 2.,
            ..unit_scale(6)
        };
        let peaks = detector(config).detect_peaks(&input).unwrap();
        assert_eq!(split_peaks(&peaks), (vec![3.], vec![3.]));
    }

    #[test]
    fn stops_past_max_position() {
        let input = [0., 2., 0., 3., 0., 4., 0., 0.];
        let config = PeakDetectorConfig {
            max_position: 4.,
            ..unit_scale(8)
        };
        let peaks = detector(config).detect_peaks(&input).unwrap();
        assert_eq!(split_peaks(&peaks), (vec![1., 3.], vec![2., 3.]));
    }

    #[test]
    fn positions_are_scaled_by_range() {
        let input = [0., 1., 0., 0., 0.];
        let config = PeakDetectorConfig {
            range: 2.,
            max_position: 2.,
            ..unit_scale(5)
        };
        let peaks = detector(config).detect_peaks(&input).unwrap();
        assert_eq!(split_peaks(&peaks), (vec![0.5], vec![1.]));
    }

    #[test]
    fn nan_samples_are_skipped() {
        let input = [0., f64::NAN, 1., 3., 1., 0.];
        let peaks = detector(unit_scale(6)).detect_peaks(&input).unwrap();
        assert_eq!(split_peaks(&peaks), (vec![3.], vec![3.]));
    }

    #[test]
    fn trailing_interior_peak() {
        let input = [0., 0., 1., 3., 1.];
        let peaks = detector(unit_scale(5)).detect_peaks(&input).unwrap();
        assert_eq!(split_peaks(&peaks), (vec![3.], vec![3.]));
    }

    #[test]
    fn close_peaks_keep_the_stronger() {
        let mut input = vec![0.0; 21];
        input[10] = 5.;
        input[12] = 8.;
        let config = PeakDetectorConfig {
            min_peak_distance: 5.,
            order_by: PeakOrder::Amplitude,
            ..unit_scale(21)
        };
        let peaks = detector(config).detect_peaks(&input).unwrap();
        assert_eq!(
            peaks,
            vec![Peak {
                position: 12.,
                magnitude: 8.
            }]
        );
    }

    #[test]
    fn suppression_is_greedy() {
        // 14 is suppressed by 10; 18 is then checked only against survivors.
        let mut input = vec![0.0; 25];
        input[10] = 10.;
        input[14] = 8.;
        input[18] = 6.;
        let config = PeakDetectorConfig {
            min_peak_distance: 5.,
            ..unit_scale(25)
        };
        let peaks = detector(config).detect_peaks(&input).unwrap();
        assert_eq!(split_peaks(&peaks), (vec![10., 18.], vec![10., 6.]));
    }

    #[test]
    fn ordering_and_truncation() {
        let input = [0., 2., 0., 5., 0., 3., 0., 5., 0., 0.];

        let peaks = detector(unit_scale(10)).detect_peaks(&input).unwrap();
        assert_eq!(
            split_peaks(&peaks),
            (vec![1., 3., 5., 7.], vec![2., 5., 3., 5.])
        );

        let config = PeakDetectorConfig {
            order_by: PeakOrder::Amplitude,
            max_peaks: 3,
            ..unit_scale(10)
        };
        let peaks = detector(config).detect_peaks(&input).unwrap();
        assert_eq!(split_peaks(&peaks), (vec![3., 7., 5.], vec![5., 5., 3.]));
    }
}
