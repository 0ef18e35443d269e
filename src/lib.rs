// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)]
// Duplicate match arms

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::large_stack_arrays)] // Helps avoid stack overflows
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::identity_op)] // e.g., `x + 0`, `x * 1`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::let_unit_value)] // Avoids binding `()` to variables
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![warn(clippy::unwrap_used)] // Avoids using `unwrap()`

// Maintainability
#![warn(clippy::missing_panics_doc)] // Docs for functions that might panic
#![warn(clippy::missing_safety_doc)] // Docs for `unsafe` functions
#![warn(clippy::missing_const_for_fn)] // Suggests making eligible functions `const`
#![deny(missing_docs)] // Documentation is a must for release

//! # constant_q
//!
//! A Constant-Q Transform (CQT) engine for Rust: log-frequency spectral analysis whose bins are
//! spaced geometrically (semitone or fractional-semitone resolution) rather than linearly,
//! yielding pitch-aligned spectral magnitudes for music analysis, chroma features, and pitch
//! detection.
//!
//! ## Overview
//!
//! The engine precomputes a bank of frequency-domain analysis kernels, one per log-spaced bin:
//! a windowed complex exponential tuned to the bin's center frequency, pushed through an FFT,
//! conjugated, and normalized. Construction runs once; every subsequent forward call costs a
//! single FFT of the input frame plus one complex projection per bin, returning squared
//! magnitudes.
//!
//! ## Installation
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! constant_q = "0.1.0"
//! ```
//!
//! or more easily with:
//! ```bash
//! cargo add constant_q
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use constant_q::{ConstantQTransform, CqtConfig, WindowFunction};
//!
//! // 12 bins per octave over A1..A8 at 44.1 kHz
//! let config = CqtConfig::new(55.0, 7040.0, 12, 44100.0, WindowFunction::Hamming);
//! let mut cqt = ConstantQTransform::new(config).expect("valid configuration");
//!
//! // One frame of a 440 Hz sine wave
//! let frame: Vec<f64> = (0..4096)
//!     .map(|i| (2.0 * std::f64::consts::PI * 440.0 * i as f64 / 44100.0).sin())
//!     .collect();
//!
//! let magnitudes = cqt.forward(&frame);
//! assert_eq!(magnitudes.len(), cqt.bin_count());
//! ```
//!
//! ## Error Handling
//!
//! The library reports failures through a single error enum:
//!
//! ```rust
//! use constant_q::{ConstantQTransform, CqtConfig, CqtError, WindowFunction};
//!
//! // maximum frequency above what a 14 kHz sample rate can represent
//! let config = CqtConfig::new(55.0, 7040.0, 12, 14000.0, WindowFunction::Hann);
//!
//! match ConstantQTransform::new(config) {
//!     Ok(_) => {}
//!     Err(CqtError::InvalidConfiguration(reason)) => eprintln!("Bad configuration: {reason}"),
//!     Err(other_err) => eprintln!("Other error: {other_err}"),
//! }
//! ```
//!
//! Configuration errors are fatal for the construction attempt: fix the parameters and
//! reconstruct. Per-call errors (a missized output buffer, a scratch arena from a different
//! engine) are recoverable and leave the engine state untouched.
//!
//! ## Concurrency
//!
//! The convenience methods take `&mut self` because they reuse engine-owned scratch buffers;
//! the borrow checker rules out racing callers. The kernel bank and FFT plan are read-only
//! after construction, so to transform frames in parallel share one engine and give each
//! thread its own scratch arena:
//!
//! ```rust
//! use constant_q::{ConstantQTransform, CqtConfig, CqtScratch};
//!
//! # fn example() -> Result<(), constant_q::CqtError> {
//! let cqt = ConstantQTransform::new(CqtConfig::musical(44100.0))?;
//! let frames: Vec<Vec<f64>> = vec![vec![0.0; 1024]; 4];
//!
//! std::thread::scope(|scope| {
//!     let cqt = &cqt;
//!     for frame in &frames {
//!         scope.spawn(move || {
//!             let mut scratch = CqtScratch::for_transform(cqt);
//!             let mut magnitudes = vec![0.0; cqt.bin_count()];
//!             cqt.forward_with_scratch(frame, &mut scratch, &mut magnitudes)
//!                 .expect("scratch arena sized for this engine");
//!         });
//!     }
//! });
//! # Ok(())
//! # }
//! ```

mod error;
mod fft;
mod kernel;

pub mod transform;
pub mod types;

pub use crate::error::{CqtError, CqtResult};
pub use crate::transform::{ConstantQTransform, CqtScratch};
pub use crate::types::{CqtConfig, WindowFunction};
