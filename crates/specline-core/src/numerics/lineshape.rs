//! Normalized line-shape kernels and the pseudo-Voigt combination rules.

use std::f64::consts::PI;

// Empirical polynomial coefficients for the combined pseudo-Voigt FWHM and
// the Lorentzian mixing fraction.
const FWHM_C4L1: f64 = 2.69269;
const FWHM_C3L2: f64 = 2.42843;
const FWHM_C2L3: f64 = 4.47163;
const FWHM_C1L4: f64 = 0.07842;
const ETA_C1: f64 = 1.36603;
const ETA_C2: f64 = 0.47719;
const ETA_C3: f64 = 0.11116;

/// Unit-area Gaussian evaluated at offset `delta` from its center.
pub fn gaussian_profile(delta: f64, sigma: f64) -> f64 {
    let z = delta / sigma;
    (-0.5 * z * z).exp() / (sigma * (2.0 * PI).sqrt())
}

/// Unit-area Lorentzian evaluated at offset `delta` from its center.
pub fn lorentzian_profile(delta: f64, gamma: f64) -> f64 {
    gamma / (PI * (gamma * gamma + delta * delta))
}

/// Combined pseudo-Voigt FWHM from the Gaussian and Lorentzian FWHMs.
pub fn pseudo_voigt_fwhm(fwhm_g: f64, fwhm_l: f64) -> f64 {
    (fwhm_g.powi(5)
        + FWHM_C4L1 * fwhm_g.powi(4) * fwhm_l
        + FWHM_C3L2 * fwhm_g.powi(3) * fwhm_l.powi(2)
        + FWHM_C2L3 * fwhm_g.powi(2) * fwhm_l.powi(3)
        + FWHM_C1L4 * fwhm_g * fwhm_l.powi(4)
        + fwhm_l.powi(5))
    .powf(0.2)
}

/// Lorentzian weight of the pseudo-Voigt mixture, cubic in `fwhm_l / fwhm`.
pub fn pseudo_voigt_eta(fwhm_l: f64, fwhm: f64) -> f64 {
    let ratio = fwhm_l / fwhm;
    ETA_C1 * ratio - ETA_C2 * ratio * ratio + ETA_C3 * ratio * ratio * ratio
}
