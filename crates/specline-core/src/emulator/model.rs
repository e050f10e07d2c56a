//! Sparse windowed line model and its two forward passes.

use crate::common::constants::{
    AMPLITUDE_TWEAK, DEFAULT_PROMINENCE, DEFAULT_WING_CUT_PIXELS, FLUX_CLIP_CEILING,
    FLUX_CLIP_FLOOR, GAMMA_WIDTH_TWEAK, GAUSSIAN_FWHM_PER_SIGMA, LORENTZIAN_FWHM_PER_GAMMA,
    SIGMA_WIDTH_TWEAK, SPEED_OF_LIGHT_KMS,
};
use crate::detector::detect_lines;
use crate::domain::{SpeclineError, SpeclineResult};
use crate::emulator::grid::WavelengthGrid;
use crate::emulator::state::ModelState;
use crate::emulator::window::WindowIndex;
use crate::numerics::lineshape::{
    gaussian_profile, lorentzian_profile, pseudo_voigt_eta, pseudo_voigt_fwhm,
};
use crate::numerics::voigt::voigt_profile;
use std::f64::consts::SQRT_2;
use tracing::{info, warn};

/// Construction parameters for the unified dual-mode entry point.
///
/// `init_state` takes precedence over `prominence`; supplying both is legal
/// and logged, supplying neither (without a flux) is the one construction
/// error.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub prominence: Option<f64>,
    pub wing_cut_pixels: usize,
    pub init_state: Option<ModelState>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            prominence: None,
            wing_cut_pixels: DEFAULT_WING_CUT_PIXELS,
            init_state: None,
        }
    }
}

/// Sparse semi-empirical spectral-line model.
///
/// Owns the native grid, four parallel per-line parameter vectors (center
/// wavelength plus log amplitude / log sigma / log gamma), and the one-time
/// window-index precomputation. Immutable after construction except for the
/// shared radial-velocity scalar.
#[derive(Debug, Clone)]
pub struct SparseLineModel {
    grid: WavelengthGrid,
    lam_centers: Vec<f64>,
    amplitudes: Vec<f64>,
    sigma_widths: Vec<f64>,
    gamma_widths: Vec<f64>,
    window: WindowIndex,
    active_indices: Vec<usize>,
    fit_target: Option<Vec<f64>>,
    radial_velocity: f64,
}

impl SparseLineModel {
    /// Unified dual-mode construction: a supplied state record wins over
    /// detection; detection requires a native flux.
    pub fn build(
        grid: WavelengthGrid,
        flux_native: Option<&[f64]>,
        config: ModelConfig,
    ) -> SpeclineResult<Self> {
        match (config.init_state, flux_native) {
            (Some(state), flux) => {
                if config.prominence.is_some() {
                    warn!(
                        "both an initial state record and a prominence threshold were supplied; \
                         discarding the prominence threshold in favor of the state record"
                    );
                }
                let mut model = Self::from_state(grid, &state, config.wing_cut_pixels)?;
                if let Some(flux) = flux {
                    model.fit_target = Some(active_subset(&model.grid, &model.active_indices, flux)?);
                }
                Ok(model)
            }
            (None, Some(flux)) => Self::from_detection(
                grid,
                flux,
                config.prominence.unwrap_or(DEFAULT_PROMINENCE),
                config.wing_cut_pixels,
            ),
            (None, None) => Err(SpeclineError::input_validation(
                "INPUT.MODEL_CONFIG",
                "either a native flux or an initial state record must be provided to define the spectral lines",
            )),
        }
    }

    /// Detect lines on the native flux and calibrate their starting
    /// parameters.
    pub fn from_detection(
        grid: WavelengthGrid,
        flux_native: &[f64],
        prominence: f64,
        wing_cut_pixels: usize,
    ) -> SpeclineResult<Self> {
        let active_indices = grid.active_indices();
        let fit_target = active_subset(&grid, &active_indices, flux_native)?;

        let detection = detect_lines(grid.samples(), flux_native, prominence)
            .map_err(|source| SpeclineError::computation("RUN.LINE_DETECTION", source.to_string()))?;

        let lam_centers = detection.centers;
        let amplitudes: Vec<f64> = detection
            .prominences
            .iter()
            .map(|&prominence| (prominence * AMPLITUDE_TWEAK).ln())
            .collect();
        let sigma_widths: Vec<f64> = detection
            .sigma_widths
            .iter()
            .map(|&width| (width / SQRT_2 * SIGMA_WIDTH_TWEAK).ln())
            .collect();
        let gamma_widths: Vec<f64> = detection
            .sigma_widths
            .iter()
            .map(|&width| (width / SQRT_2 * GAMMA_WIDTH_TWEAK).ln())
            .collect();

        Ok(Self::assemble(
            grid,
            lam_centers,
            amplitudes,
            sigma_widths,
            gamma_widths,
            wing_cut_pixels,
            Some(fit_target),
        ))
    }

    /// Rebuild a model from a previously fitted state record.
    pub fn from_state(
        grid: WavelengthGrid,
        state: &ModelState,
        wing_cut_pixels: usize,
    ) -> SpeclineResult<Self> {
        state
            .validate()
            .map_err(|source| SpeclineError::input_validation("INPUT.STATE_SHAPE", source.to_string()))?;

        Ok(Self::assemble(
            grid,
            state.lam_centers.clone(),
            state.amplitudes.clone(),
            state.sigma_widths.clone(),
            state.gamma_widths.clone(),
            wing_cut_pixels,
            None,
        ))
    }

    fn assemble(
        grid: WavelengthGrid,
        lam_centers: Vec<f64>,
        amplitudes: Vec<f64>,
        sigma_widths: Vec<f64>,
        gamma_widths: Vec<f64>,
        wing_cut_pixels: usize,
        fit_target: Option<Vec<f64>>,
    ) -> Self {
        // Lines outside the threshold band are dropped entirely; they never
        // receive windows or parameters.
        let (lower, upper) = grid.line_threshold_bounds();
        let mut kept_centers = Vec::with_capacity(lam_centers.len());
        let mut kept_amplitudes = Vec::with_capacity(lam_centers.len());
        let mut kept_sigma = Vec::with_capacity(lam_centers.len());
        let mut kept_gamma = Vec::with_capacity(lam_centers.len());
        for (index, &center) in lam_centers.iter().enumerate() {
            if center > lower && center < upper {
                kept_centers.push(center);
                kept_amplitudes.push(amplitudes[index]);
                kept_sigma.push(sigma_widths[index]);
                kept_gamma.push(gamma_widths[index]);
            }
        }

        let window = WindowIndex::build(&grid, &kept_centers, wing_cut_pixels);
        let active_indices = grid.active_indices();

        if kept_centers.is_empty() {
            info!("no spectral lines retained; the model reconstructs an identity spectrum");
        } else {
            info!(
                "initializing a sparse model with {} spectral lines",
                kept_centers.len()
            );
        }

        Self {
            grid,
            lam_centers: kept_centers,
            amplitudes: kept_amplitudes,
            sigma_widths: kept_sigma,
            gamma_widths: kept_gamma,
            window,
            active_indices,
            fit_target,
            radial_velocity: 0.0,
        }
    }

    pub fn n_lines(&self) -> usize {
        self.lam_centers.len()
    }

    pub fn grid(&self) -> &WavelengthGrid {
        &self.grid
    }

    pub fn lam_centers(&self) -> &[f64] {
        &self.lam_centers
    }

    pub fn amplitudes(&self) -> &[f64] {
        &self.amplitudes
    }

    pub fn sigma_widths(&self) -> &[f64] {
        &self.sigma_widths
    }

    pub fn gamma_widths(&self) -> &[f64] {
        &self.gamma_widths
    }

    pub fn wing_cut_pixels(&self) -> usize {
        self.window.wing_cut_pixels()
    }

    pub fn window(&self) -> &WindowIndex {
        &self.window
    }

    pub fn radial_velocity(&self) -> f64 {
        self.radial_velocity
    }

    /// Doppler shift applied jointly to every line center at evaluation
    /// time, in km/s. Last writer wins between forward calls.
    pub fn set_radial_velocity(&mut self, velocity_kms: f64) {
        self.radial_velocity = velocity_kms;
    }

    /// Flux over the active region when the model was built from a native
    /// flux; absent for state-only models.
    pub fn fit_target(&self) -> Option<&[f64]> {
        self.fit_target.as_deref()
    }

    /// Wavelengths of the active region, the domain of the absorption output.
    pub fn active_wavelengths(&self) -> Vec<f64> {
        let samples = self.grid.samples();
        self.active_indices.iter().map(|&i| samples[i]).collect()
    }

    /// Extract the current parameters as an external state record.
    pub fn state(&self) -> ModelState {
        ModelState {
            lam_centers: self.lam_centers.clone(),
            amplitudes: self.amplitudes.clone(),
            sigma_widths: self.sigma_widths.clone(),
            gamma_widths: self.gamma_widths.clone(),
        }
    }

    /// Absorption forward pass: pseudo-Voigt optical-depth contributions
    /// accumulated in log-flux, returned over the active region.
    ///
    /// Each per-pixel contribution is clipped to [1e-6, 1 - 1e-6] before the
    /// log transform; overlapping windows combine additively in log space and
    /// therefore multiplicatively in flux. Every call owns its output buffer.
    pub fn forward(
        &self,
        log_amplitudes: &[f64],
        log_sigma_widths: &[f64],
        log_gamma_widths: &[f64],
    ) -> SpeclineResult<Vec<f64>> {
        self.check_parameter_shape(log_amplitudes, log_sigma_widths, log_gamma_widths)?;

        let mut log_flux = vec![0.0_f64; self.grid.len()];
        let rv_factor = 1.0 + self.radial_velocity / SPEED_OF_LIGHT_KMS;

        for line in 0..self.n_lines() {
            let center = self.lam_centers[line] * rv_factor;
            let amplitude = log_amplitudes[line].exp();
            let sigma = log_sigma_widths[line].exp();
            let gamma = log_gamma_widths[line].exp();

            let fwhm_g = GAUSSIAN_FWHM_PER_SIGMA * sigma;
            let fwhm_l = LORENTZIAN_FWHM_PER_GAMMA * gamma;
            let fwhm = pseudo_voigt_fwhm(fwhm_g, fwhm_l);
            let eta = pseudo_voigt_eta(fwhm_l, fwhm);

            let indices = self.window.line_indices(line);
            let wavelengths = self.window.line_wavelengths(line);
            for (&index, &wavelength) in indices.iter().zip(wavelengths) {
                let delta = wavelength - center;
                let contribution = amplitude
                    * (eta * lorentzian_profile(delta, gamma)
                        + (1.0 - eta) * gaussian_profile(delta, sigma));
                let clipped = contribution.clamp(FLUX_CLIP_FLOOR, FLUX_CLIP_CEILING);
                log_flux[index] += (1.0 - clipped).ln();
            }
        }

        Ok(self
            .active_indices
            .iter()
            .map(|&index| log_flux[index].exp())
            .collect())
    }

    /// Emission forward pass: true Voigt profiles accumulated additively in
    /// flux units, returned over the full native grid, unclipped.
    pub fn forward_emission(
        &self,
        log_amplitudes: &[f64],
        log_sigma_widths: &[f64],
        log_gamma_widths: &[f64],
    ) -> SpeclineResult<Vec<f64>> {
        self.check_parameter_shape(log_amplitudes, log_sigma_widths, log_gamma_widths)?;

        let mut flux = vec![0.0_f64; self.grid.len()];
        let rv_factor = 1.0 + self.radial_velocity / SPEED_OF_LIGHT_KMS;

        for line in 0..self.n_lines() {
            let center = self.lam_centers[line] * rv_factor;
            let amplitude = log_amplitudes[line].exp();
            let sigma = log_sigma_widths[line].exp();
            let gamma = log_gamma_widths[line].exp();

            let indices = self.window.line_indices(line);
            let wavelengths = self.window.line_wavelengths(line);
            for (&index, &wavelength) in indices.iter().zip(wavelengths) {
                flux[index] += amplitude * voigt_profile(wavelength - center, sigma, gamma);
            }
        }

        Ok(flux)
    }

    /// Absorption reconstruction at the stored parameters.
    pub fn reconstruct(&self) -> SpeclineResult<Vec<f64>> {
        self.forward(&self.amplitudes, &self.sigma_widths, &self.gamma_widths)
    }

    /// Emission reconstruction at the stored parameters.
    pub fn reconstruct_emission(&self) -> SpeclineResult<Vec<f64>> {
        self.forward_emission(&self.amplitudes, &self.sigma_widths, &self.gamma_widths)
    }

    /// Sum of squared residuals between an absorption forward pass and the
    /// stored fit target.
    pub fn chi_squared(
        &self,
        log_amplitudes: &[f64],
        log_sigma_widths: &[f64],
        log_gamma_widths: &[f64],
    ) -> SpeclineResult<f64> {
        let target = self.fit_target.as_ref().ok_or_else(|| {
            SpeclineError::computation(
                "RUN.FIT_TARGET",
                "model was constructed without a native flux; no fit target is available",
            )
        })?;

        let model = self.forward(log_amplitudes, log_sigma_widths, log_gamma_widths)?;
        Ok(model
            .iter()
            .zip(target)
            .map(|(modeled, observed)| (modeled - observed) * (modeled - observed))
            .sum())
    }

    fn check_parameter_shape(
        &self,
        log_amplitudes: &[f64],
        log_sigma_widths: &[f64],
        log_gamma_widths: &[f64],
    ) -> SpeclineResult<()> {
        let n = self.n_lines();
        if log_amplitudes.len() != n
            || log_sigma_widths.len() != n
            || log_gamma_widths.len() != n
        {
            return Err(SpeclineError::input_validation(
                "INPUT.FORWARD_SHAPE",
                format!(
                    "forward parameters must each have one entry per line ({}), got amplitudes={}, sigma_widths={}, gamma_widths={}",
                    n,
                    log_amplitudes.len(),
                    log_sigma_widths.len(),
                    log_gamma_widths.len()
                ),
            ));
        }
        Ok(())
    }
}

fn active_subset(
    grid: &WavelengthGrid,
    active_indices: &[usize],
    flux_native: &[f64],
) -> SpeclineResult<Vec<f64>> {
    if flux_native.len() != grid.len() {
        return Err(SpeclineError::input_validation(
            "INPUT.FLUX_SHAPE",
            format!(
                "native flux length {} does not match the wavelength grid length {}",
                flux_native.len(),
                grid.len()
            ),
        ));
    }
    Ok(active_indices.iter().map(|&i| flux_native[i]).collect())
}
