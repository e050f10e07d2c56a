use serde::{Deserialize, Serialize};

/// Fitted per-line parameters exchanged with collaborating pipelines.
///
/// `lam_centers` is in wavelength units; the other three arrays are stored in
/// log-space so the underlying widths and amplitudes stay positive under
/// unconstrained optimization. All four arrays share one length.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelState {
    pub lam_centers: Vec<f64>,
    pub amplitudes: Vec<f64>,
    pub sigma_widths: Vec<f64>,
    pub gamma_widths: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StateError {
    #[error(
        "state record arrays must share one length: lam_centers={lam_centers}, amplitudes={amplitudes}, sigma_widths={sigma_widths}, gamma_widths={gamma_widths}"
    )]
    LengthMismatch {
        lam_centers: usize,
        amplitudes: usize,
        sigma_widths: usize,
        gamma_widths: usize,
    },
}

impl ModelState {
    pub fn len(&self) -> usize {
        self.lam_centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lam_centers.is_empty()
    }

    pub fn validate(&self) -> Result<(), StateError> {
        let n = self.lam_centers.len();
        if self.amplitudes.len() != n
            || self.sigma_widths.len() != n
            || self.gamma_widths.len() != n
        {
            return Err(StateError::LengthMismatch {
                lam_centers: self.lam_centers.len(),
                amplitudes: self.amplitudes.len(),
                sigma_widths: self.sigma_widths.len(),
                gamma_widths: self.gamma_widths.len(),
            });
        }
        Ok(())
    }

    pub fn from_json_str(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{ModelState, StateError};

    fn sample_state() -> ModelState {
        ModelState {
            lam_centers: vec![5020.0, 5061.5],
            amplitudes: vec![-3.0, -2.5],
            sigma_widths: vec![-1.2, -1.0],
            gamma_widths: vec![-1.1, -0.9],
        }
    }

    #[test]
    fn valid_record_round_trips_through_json() {
        let state = sample_state();
        state.validate().expect("record should validate");

        let json = state.to_json_string().expect("serialize");
        let restored = ModelState::from_json_str(&json).expect("deserialize");
        assert_eq!(restored, state);
    }

    #[test]
    fn json_field_names_match_the_external_contract() {
        let json = sample_state().to_json_string().expect("serialize");
        for key in ["lam_centers", "amplitudes", "sigma_widths", "gamma_widths"] {
            assert!(json.contains(key), "serialized record should name '{key}'");
        }
    }

    #[test]
    fn ragged_record_is_rejected() {
        let mut state = sample_state();
        state.gamma_widths.pop();

        assert_eq!(
            state.validate().expect_err("ragged record should fail"),
            StateError::LengthMismatch {
                lam_centers: 2,
                amplitudes: 2,
                sigma_widths: 2,
                gamma_widths: 1,
            }
        );
    }

    #[test]
    fn empty_record_is_a_valid_zero_line_state() {
        let state = ModelState::default();
        state.validate().expect("empty record should validate");
        assert!(state.is_empty());
    }
}
