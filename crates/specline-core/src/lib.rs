//! Sparse semi-empirical spectral-line emulation.
//!
//! A dense synthetic spectrum is reduced to a few thousand lines of four
//! parameters each; reconstruction touches only a fixed-width pixel window
//! per line, which keeps repeated forward evaluation cheap next to the
//! one-time construction cost.

pub mod common;
pub mod detector;
pub mod domain;
pub mod emulator;
pub mod numerics;

pub use detector::{LineDetection, detect_lines};
pub use domain::{SpeclineError, SpeclineErrorCategory, SpeclineResult};
pub use emulator::{
    GridError, ModelConfig, ModelState, SparseLineModel, StateError, WavelengthGrid, WindowIndex,
    doppler_grid,
};
