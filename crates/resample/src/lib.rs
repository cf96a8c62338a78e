//! Fixed-point streaming sample rate conversion.
//!
//! [`Resampler`] converts a stream of 16-bit samples by an arbitrary factor
//! using linear interpolation and integer arithmetic only. The stream is
//! processed in fixed-size input blocks; each call yields a variable number
//! of output samples and carries the samples the next block still needs.

pub mod config;
pub mod error;
pub mod fixed;
pub mod kernel;
pub mod quantize;
pub mod stream;

pub use config::ResamplerConfig;
pub use error::{ResampleError, Result};
pub use fixed::{FixedStep, FixedTime};
pub use quantize::quantize;
pub use stream::{retain_tail, Resampler};

/// Signed 16-bit PCM sample.
pub type Sample = i16;

/// Guard samples kept at each side of the input window unless configured
/// otherwise.
pub const DEFAULT_EDGE_PAD: usize = 10;

/// The kernel reads one sample past the cursor, so the window needs at least
/// this much padding.
pub const MIN_EDGE_PAD: usize = 2;
