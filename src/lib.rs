//! # YinFFT
//! *yinfft* estimates the fundamental frequency of a short audio frame, and a
//! confidence for it, with a frequency-domain variant of the YIN algorithm.
//! It is meant for tuners, pitch trackers and feature extractors that look at
//! one frame at a time.
//!
//! # Detectors
//! A *detector* is built once from a [DetectorConfig][detector::yinfft::DetectorConfig]
//! and then reused for any number of frames. It keeps no state between calls.
//!
//!   * [YinFftDetector][detector::yinfft::YinFftDetector]
//!
//! The local-maximum finder it relies on for sub-sample accuracy is usable on
//! its own as [PeakDetector][utils::peak::PeakDetector].
//!
//! # Logging
//! Diagnostics are emitted through [tracing]. Nothing is recorded unless the
//! application installs a subscriber.
//!
//! # Examples
//! ```
//! use yinfft::detector::yinfft::{DetectorConfig, YinFftDetector};
//! use yinfft::detector::PitchDetector;
//! use yinfft::weighting::Weighting;
//!
//! fn main() {
//!     const SAMPLE_RATE: f64 = 44100.0;
//!     const SIZE: usize = 8192;
//!
//!     // Signal coming from some source (microphone, generated, etc...)
//!     let dt = 1.0 / SAMPLE_RATE;
//!     let freq = 110.0;
//!     let mut signal: Vec<f64> = (0..SIZE)
//!         .map(|x| (2.0 * std::f64::consts::PI * x as f64 * dt * freq).sin())
//!         .collect();
//!
//!     let detector = YinFftDetector::<f64>::new(DetectorConfig {
//!         frame_size: SIZE,
//!         sample_rate: SAMPLE_RATE,
//!         weighting: "custom".parse::<Weighting>().unwrap(),
//!         ..Default::default()
//!     })
//!     .unwrap();
//!
//!     let pitch = detector.detect_from_frame(&mut signal).unwrap();
//!
//!     println!("Frequency: {}, Confidence: {}", pitch.frequency, pitch.confidence);
//! }
//! ```

pub use detector::internals::Pitch;
pub use error::{Error, Result};

pub mod detector;
pub mod error;
pub mod float;
pub mod spectrum;
pub mod utils;
pub mod weighting;
