//! Z-score feature scaler: `(x - mean) / scale`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A fitted standard scaler.
///
/// Artifact format (JSON):
///
/// ```json
/// { "mean": [..30 values..], "scale": [..30 values..] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Check the artifact is internally consistent and sized for `n_features`.
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "mean has {} values but scale has {}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if self.mean.len() != n_features {
            return Err(format!(
                "expected {n_features} features, got {}",
                self.mean.len()
            ));
        }
        if self.mean.iter().chain(&self.scale).any(|v| !v.is_finite()) {
            return Err("mean and scale must be finite".to_string());
        }
        Ok(())
    }

    /// Scale one sample. A zero scale leaves the centred value unscaled.
    pub fn transform(&self, sample: &[f64]) -> Result<Vec<f64>, CoreError> {
        if sample.len() != self.n_features() {
            return Err(CoreError::Validation(format!(
                "scaler expects {} features, got {}",
                self.n_features(),
                sample.len()
            )));
        }

        Ok(sample
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_centres_and_scales() {
        let scaler = StandardScaler {
            mean: vec![10.0, 0.0],
            scale: vec![2.0, 4.0],
        };
        assert_eq!(scaler.transform(&[14.0, -2.0]).unwrap(), vec![2.0, -0.5]);
    }

    #[test]
    fn zero_scale_is_treated_as_one() {
        let scaler = StandardScaler {
            mean: vec![120.0],
            scale: vec![0.0],
        };
        assert_eq!(scaler.transform(&[121.5]).unwrap(), vec![1.5]);
    }

    #[test]
    fn wrong_width_is_rejected() {
        let scaler = StandardScaler {
            mean: vec![0.0; 3],
            scale: vec![1.0; 3],
        };
        assert!(scaler.transform(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn validate_checks_lengths_and_finiteness() {
        let mismatched = StandardScaler {
            mean: vec![0.0; 2],
            scale: vec![1.0; 3],
        };
        assert!(mismatched.validate(2).is_err());

        let narrow = StandardScaler {
            mean: vec![0.0; 2],
            scale: vec![1.0; 2],
        };
        assert!(narrow.validate(30).is_err());
        assert!(narrow.validate(2).is_ok());

        let nan = StandardScaler {
            mean: vec![f64::NAN],
            scale: vec![1.0],
        };
        assert!(nan.validate(1).is_err());
    }
}
