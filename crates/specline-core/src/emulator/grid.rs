use crate::common::constants::{ACTIVE_BUFFER, LINE_BUFFER, SPEED_OF_LIGHT_KMS};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("wavelength grid requires at least 2 samples, got {actual}")]
    InsufficientSamples { actual: usize },
    #[error("wavelength sample must be finite at index {index}, got {value}")]
    NonFiniteSample { index: usize, value: f64 },
    #[error(
        "wavelength grid must be strictly increasing, index {index} has {current} after {previous}"
    )]
    NonIncreasingSample {
        index: usize,
        previous: f64,
        current: f64,
    },
    #[error(
        "doppler grid requires start < stop and a positive velocity step, got start={start}, stop={stop}, step={step}"
    )]
    InvalidDopplerRange { start: f64, stop: f64, step: f64 },
}

/// Validated, immutable native wavelength grid.
#[derive(Debug, Clone, PartialEq)]
pub struct WavelengthGrid {
    samples: Vec<f64>,
}

impl WavelengthGrid {
    pub fn new(samples: Vec<f64>) -> Result<Self, GridError> {
        if samples.len() < 2 {
            return Err(GridError::InsufficientSamples {
                actual: samples.len(),
            });
        }

        for (index, value) in samples.iter().copied().enumerate() {
            if !value.is_finite() {
                return Err(GridError::NonFiniteSample { index, value });
            }

            if index > 0 {
                let previous = samples[index - 1];
                if value <= previous {
                    return Err(GridError::NonIncreasingSample {
                        index,
                        previous,
                        current: value,
                    });
                }
            }
        }

        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn min_wavelength(&self) -> f64 {
        self.samples[0]
    }

    pub fn max_wavelength(&self) -> f64 {
        self.samples[self.samples.len() - 1]
    }

    /// Bounds of the active region, a strict margin inside the grid edges.
    pub fn active_bounds(&self) -> (f64, f64) {
        (
            self.min_wavelength() + ACTIVE_BUFFER,
            self.max_wavelength() - ACTIVE_BUFFER,
        )
    }

    /// Bounds of the narrower band a line center must fall in to be kept.
    pub fn line_threshold_bounds(&self) -> (f64, f64) {
        (
            self.min_wavelength() + LINE_BUFFER,
            self.max_wavelength() - LINE_BUFFER,
        )
    }

    /// Indices of the samples strictly inside the active bounds.
    pub fn active_indices(&self) -> Vec<usize> {
        let (lower, upper) = self.active_bounds();
        self.samples
            .iter()
            .enumerate()
            .filter_map(|(index, &value)| (value > lower && value < upper).then_some(index))
            .collect()
    }

    /// Lower-bound lookup: the first index whose sample is >= `wavelength`.
    pub fn nearest_index(&self, wavelength: f64) -> usize {
        self.samples.partition_point(|&sample| sample < wavelength)
    }
}

/// Build a log-uniform grid whose consecutive samples are separated by a
/// constant velocity shift of `velocity_step_kms`.
pub fn doppler_grid(start: f64, stop: f64, velocity_step_kms: f64) -> Result<Vec<f64>, GridError> {
    if !(start < stop) || !(velocity_step_kms > 0.0) {
        return Err(GridError::InvalidDopplerRange {
            start,
            stop,
            step: velocity_step_kms,
        });
    }

    let factor = 1.0 + velocity_step_kms / SPEED_OF_LIGHT_KMS;
    let mut samples = Vec::new();
    let mut current = start;
    while current <= stop {
        samples.push(current);
        current *= factor;
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::{GridError, WavelengthGrid, doppler_grid};
    use crate::common::constants::SPEED_OF_LIGHT_KMS;

    fn uniform_grid(n_pix: usize, lo: f64, hi: f64) -> WavelengthGrid {
        let step = (hi - lo) / (n_pix - 1) as f64;
        WavelengthGrid::new((0..n_pix).map(|i| lo + step * i as f64).collect())
            .expect("uniform grid should validate")
    }

    #[test]
    fn construction_rejects_malformed_grids() {
        assert_eq!(
            WavelengthGrid::new(vec![5000.0]).expect_err("single sample should fail"),
            GridError::InsufficientSamples { actual: 1 }
        );

        assert_eq!(
            WavelengthGrid::new(vec![5000.0, 5000.0, 5001.0])
                .expect_err("duplicate sample should fail"),
            GridError::NonIncreasingSample {
                index: 1,
                previous: 5000.0,
                current: 5000.0,
            }
        );

        let error = WavelengthGrid::new(vec![5000.0, f64::NAN])
            .expect_err("non-finite sample should fail");
        match error {
            GridError::NonFiniteSample { index, value } => {
                assert_eq!(index, 1);
                assert!(value.is_nan());
            }
            other => panic!("expected NonFiniteSample, got {other:?}"),
        }
    }

    #[test]
    fn active_region_excludes_the_margin_strictly() {
        let grid = uniform_grid(201, 5000.0, 5200.0);
        let active = grid.active_indices();

        let (lower, upper) = grid.active_bounds();
        assert_eq!(lower, 5060.0);
        assert_eq!(upper, 5140.0);

        // Samples exactly on the bounds are excluded.
        let first = grid.samples()[active[0]];
        let last = grid.samples()[*active.last().expect("active region is non-empty")];
        assert!(first > lower && last < upper);
        assert_eq!(active.len(), 79);
    }

    #[test]
    fn narrow_grid_has_an_empty_active_region() {
        let grid = uniform_grid(101, 5000.0, 5100.0);
        assert!(grid.active_indices().is_empty());
    }

    #[test]
    fn nearest_index_is_a_lower_bound() {
        let grid = uniform_grid(11, 5000.0, 5010.0);
        assert_eq!(grid.nearest_index(4990.0), 0);
        assert_eq!(grid.nearest_index(5000.0), 0);
        assert_eq!(grid.nearest_index(5004.5), 5);
        assert_eq!(grid.nearest_index(5005.0), 5);
        assert_eq!(grid.nearest_index(5100.0), 11);
    }

    #[test]
    fn doppler_grid_keeps_constant_velocity_spacing() {
        let samples = doppler_grid(5000.0, 5100.0, 2.0).expect("doppler grid");
        assert!(samples.len() > 2);
        assert_eq!(samples[0], 5000.0);
        assert!(*samples.last().expect("non-empty") <= 5100.0);

        let expected = 1.0 + 2.0 / SPEED_OF_LIGHT_KMS;
        for pair in samples.windows(2) {
            let ratio = pair[1] / pair[0];
            assert!(
                (ratio - expected).abs() <= 1.0e-12,
                "ratio {ratio} deviates from {expected}"
            );
        }

        WavelengthGrid::new(samples).expect("doppler grid should validate");
    }

    #[test]
    fn doppler_grid_rejects_degenerate_ranges() {
        assert_eq!(
            doppler_grid(5100.0, 5000.0, 2.0).expect_err("reversed range should fail"),
            GridError::InvalidDopplerRange {
                start: 5100.0,
                stop: 5000.0,
                step: 2.0,
            }
        );
        assert_eq!(
            doppler_grid(5000.0, 5100.0, 0.0).expect_err("zero step should fail"),
            GridError::InvalidDopplerRange {
                start: 5000.0,
                stop: 5100.0,
                step: 0.0,
            }
        );
    }
}
