//! Absorption-line detection over a native-resolution spectrum.

use crate::common::constants::{DETECTOR_FWHM_PER_SIGMA, MIN_PEAK_SEPARATION_SAMPLES};
use crate::numerics::peaks::{
    PeakError, local_maxima, peak_prominence, width_at_half_prominence,
};

/// Per-line detection output, one entry per retained peak, ordered by
/// wavelength.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineDetection {
    pub centers: Vec<f64>,
    pub prominences: Vec<f64>,
    pub sigma_widths: Vec<f64>,
}

impl LineDetection {
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }
}

/// Detect absorption lines as peaks of the negated flux.
///
/// Peaks must be separated by at least four samples and reach the prominence
/// threshold. Each retained peak's FWHM at half prominence is converted to a
/// Gaussian sigma in wavelength units through the local forward pixel
/// spacing. An empty detection is a valid outcome, not an error.
pub fn detect_lines(
    wavelength: &[f64],
    flux: &[f64],
    prominence_threshold: f64,
) -> Result<LineDetection, PeakError> {
    if wavelength.len() != flux.len() {
        return Err(PeakError::LengthMismatch {
            wavelength: wavelength.len(),
            flux: flux.len(),
        });
    }

    let negated: Vec<f64> = flux.iter().map(|value| -value).collect();
    let peaks = local_maxima(&negated, MIN_PEAK_SEPARATION_SAMPLES);

    let mut detection = LineDetection::default();
    for peak in peaks {
        let data = peak_prominence(&negated, peak)?;
        if data.prominence < prominence_threshold {
            continue;
        }

        let fwhm_pixels = width_at_half_prominence(&negated, peak, &data)?;
        let pixel_spacing = wavelength[peak + 1] - wavelength[peak];

        detection.centers.push(wavelength[peak]);
        detection.prominences.push(data.prominence);
        detection
            .sigma_widths
            .push(fwhm_pixels * pixel_spacing / DETECTOR_FWHM_PER_SIGMA);
    }

    Ok(detection)
}

#[cfg(test)]
mod tests {
    use super::detect_lines;

    fn gaussian_dip_spectrum(
        n_pix: usize,
        lo: f64,
        hi: f64,
        dips: &[(f64, f64, f64)],
    ) -> (Vec<f64>, Vec<f64>) {
        let step = (hi - lo) / (n_pix - 1) as f64;
        let wavelength: Vec<f64> = (0..n_pix).map(|i| lo + step * i as f64).collect();
        let flux: Vec<f64> = wavelength
            .iter()
            .map(|&wl| {
                let mut value = 1.0;
                for &(center, depth, sigma) in dips {
                    let z = (wl - center) / sigma;
                    value -= depth * (-0.5 * z * z).exp();
                }
                value
            })
            .collect();
        (wavelength, flux)
    }

    #[test]
    fn single_gaussian_dip_is_recovered() {
        let (wavelength, flux) =
            gaussian_dip_spectrum(4000, 5000.0, 5040.0, &[(5020.0, 0.3, 0.3)]);

        let detection = detect_lines(&wavelength, &flux, 0.1).expect("detection");
        assert_eq!(detection.len(), 1);
        assert!(
            (detection.centers[0] - 5020.0).abs() <= 0.1,
            "center was {}",
            detection.centers[0]
        );
        assert!(
            (detection.prominences[0] - 0.3).abs() <= 0.02,
            "prominence was {}",
            detection.prominences[0]
        );
        assert!(
            (detection.sigma_widths[0] - 0.3).abs() <= 0.06,
            "sigma was {}",
            detection.sigma_widths[0]
        );
    }

    #[test]
    fn flat_spectrum_yields_empty_detection() {
        let wavelength: Vec<f64> = (0..500).map(|i| 5000.0 + 0.01 * i as f64).collect();
        let flux = vec![1.0; 500];

        let detection = detect_lines(&wavelength, &flux, 0.03).expect("detection");
        assert!(detection.is_empty());
    }

    #[test]
    fn shallow_dips_fall_below_the_threshold() {
        let (wavelength, flux) =
            gaussian_dip_spectrum(4000, 5000.0, 5040.0, &[(5010.0, 0.02, 0.3), (5030.0, 0.4, 0.3)]);

        let detection = detect_lines(&wavelength, &flux, 0.1).expect("detection");
        assert_eq!(detection.len(), 1);
        assert!((detection.centers[0] - 5030.0).abs() <= 0.1);
    }

    #[test]
    fn blended_dips_resolve_to_separate_lines() {
        let (wavelength, flux) = gaussian_dip_spectrum(
            8000,
            5000.0,
            5040.0,
            &[(5015.0, 0.35, 0.25), (5024.0, 0.25, 0.25)],
        );

        let detection = detect_lines(&wavelength, &flux, 0.1).expect("detection");
        assert_eq!(detection.len(), 2);
        assert!((detection.centers[0] - 5015.0).abs() <= 0.1);
        assert!((detection.centers[1] - 5024.0).abs() <= 0.1);
    }

    #[test]
    fn mismatched_inputs_are_rejected() {
        let error = detect_lines(&[1.0, 2.0, 3.0], &[1.0, 1.0], 0.03)
            .expect_err("length mismatch should fail");
        assert_eq!(
            error,
            super::PeakError::LengthMismatch {
                wavelength: 3,
                flux: 2,
            }
        );
    }
}
