pub mod lineshape;
pub mod peaks;
pub mod voigt;

pub use lineshape::{gaussian_profile, lorentzian_profile, pseudo_voigt_eta, pseudo_voigt_fwhm};
pub use peaks::{PeakError, ProminenceData, local_maxima, peak_prominence, width_at_half_prominence};
pub use voigt::voigt_profile;
