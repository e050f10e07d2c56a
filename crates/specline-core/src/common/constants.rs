//! Shared physical and calibration constants.
//!
//! Every numeric constant with cross-module meaning lives here so the
//! detector and the emulator agree on the same values.

/// Speed of light in km/s, used for radial-velocity Doppler factors.
pub const SPEED_OF_LIGHT_KMS: f64 = 299_792.458;

/// Gaussian FWHM per unit sigma used by the forward pass.
pub const GAUSSIAN_FWHM_PER_SIGMA: f64 = 2.3548;

/// Gaussian FWHM per unit sigma used when converting detected pixel widths
/// to physical sigmas. Kept distinct from the forward-pass factor.
pub const DETECTOR_FWHM_PER_SIGMA: f64 = 2.355;

/// Lorentzian FWHM per unit gamma.
pub const LORENTZIAN_FWHM_PER_GAMMA: f64 = 2.0;

// Measured calibration factors applied to raw detector output before the
// parameters are stored in log-space.
pub const AMPLITUDE_TWEAK: f64 = 0.14;
pub const SIGMA_WIDTH_TWEAK: f64 = 1.28;
pub const GAMMA_WIDTH_TWEAK: f64 = 1.52;

/// Lines with a center within this distance of either grid edge are
/// discarded at construction.
pub const LINE_BUFFER: f64 = 30.0;

/// The active region excludes this margin at each grid edge; it is the fit
/// target and the absorption-mode output domain.
pub const ACTIVE_BUFFER: f64 = 60.0;

/// Minimum sample separation between retained peaks.
pub const MIN_PEAK_SEPARATION_SAMPLES: usize = 4;

/// Per-pixel, per-line flux contributions in the absorption forward pass are
/// clipped into this closed interval before the log transform.
pub const FLUX_CLIP_FLOOR: f64 = 1.0e-6;
pub const FLUX_CLIP_CEILING: f64 = 1.0 - 1.0e-6;

pub const DEFAULT_PROMINENCE: f64 = 0.03;
pub const DEFAULT_WING_CUT_PIXELS: usize = 1000;
