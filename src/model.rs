use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoreError};

pub const MODEL_VERSION: i64 = 1;

pub const FEATURE_COUNT: usize = 5;

/// Canonical feature order of the artifact and every prediction vector.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "hours_studied",
    "attendance_rate",
    "previous_scores",
    "tutoring_sessions",
    "peer_influence",
];

/// Upper bound of each feature domain, in canonical order.
pub const FEATURE_MAX: [f64; FEATURE_COUNT] = [40.0, 100.0, 100.0, 10.0, 5.0];

/// Versioned linear regression artifact.
///
/// Loaded once per process and treated as read-only afterwards; prediction
/// is a plain dot product, so a loaded model is safe to share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionModel {
    pub model_version: i64,
    pub feature_names: Vec<String>,
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl RegressionModel {
    pub fn new(weights: [f64; FEATURE_COUNT], intercept: f64) -> Self {
        RegressionModel {
            model_version: MODEL_VERSION,
            feature_names: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
            weights: weights.to_vec(),
            intercept,
        }
    }

    /// Validate artifact dimensions and finiteness.
    pub fn validate(&self) -> Result<()> {
        if self.feature_names != FEATURE_NAMES {
            return Err(ScoreError::model_unavailable(format!(
                "unexpected feature names {:?} (expected {:?})",
                self.feature_names, FEATURE_NAMES
            )));
        }
        if self.weights.len() != FEATURE_COUNT {
            return Err(ScoreError::model_unavailable(format!(
                "expected {} weights, found {}",
                FEATURE_COUNT,
                self.weights.len()
            )));
        }
        if self.weights.iter().any(|weight| !weight.is_finite()) {
            return Err(ScoreError::model_unavailable("non-finite weight"));
        }
        if !self.intercept.is_finite() {
            return Err(ScoreError::model_unavailable("non-finite intercept"));
        }
        Ok(())
    }

    pub fn predict(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        self.weights
            .iter()
            .zip(features.iter())
            .map(|(weight, value)| weight * value)
            .sum::<f64>()
            + self.intercept
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ScoreError::model_unavailable(format!("{}: {}", path.display(), e))
        })?;
        let model: RegressionModel = serde_json::from_str(&raw).map_err(|e| {
            ScoreError::model_unavailable(format!("{}: {}", path.display(), e))
        })?;
        model.validate()?;
        Ok(model)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }
}

/// Training options for the fallback bootstrap fit.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    pub samples: usize,
    pub epochs: usize,
    pub learning_rate: f64,
    pub noise: f64,
    pub seed: u64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        TrainOptions {
            samples: 512,
            epochs: 1500,
            learning_rate: 0.1,
            noise: 1.5,
            seed: 42,
        }
    }
}

// Reference blend used to label the synthetic cohort; maxes out at exactly
// 100 when every feature sits at its domain maximum.
const REFERENCE_WEIGHTS: [f64; FEATURE_COUNT] = [0.70, 0.30, 0.33, 0.50, 0.80];

/// Fit a throwaway substitute model on a deterministic synthetic cohort.
///
/// Used when no artifact file exists. Gradient descent runs over
/// range-normalized features and the learned weights are mapped back to the
/// raw feature scale before the artifact is assembled.
pub fn train_fallback(options: &TrainOptions) -> Result<RegressionModel> {
    if options.samples == 0 {
        return Err(ScoreError::model_unavailable("empty synthetic cohort"));
    }

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut inputs: Vec<[f64; FEATURE_COUNT]> = Vec::with_capacity(options.samples);
    let mut targets: Vec<f64> = Vec::with_capacity(options.samples);

    for _ in 0..options.samples {
        let raw = [
            rng.random_range(0.0..=FEATURE_MAX[0]),
            rng.random_range(0.0..=FEATURE_MAX[1]),
            rng.random_range(0.0..=FEATURE_MAX[2]),
            rng.random_range(0.0..=FEATURE_MAX[3]),
            f64::from(rng.random_range(1..=5)),
        ];
        let blend: f64 = REFERENCE_WEIGHTS
            .iter()
            .zip(raw.iter())
            .map(|(weight, value)| weight * value)
            .sum();
        let jitter = (rng.random::<f64>() - 0.5) * 2.0 * options.noise;
        targets.push(blend + jitter);

        let mut normalized = [0.0; FEATURE_COUNT];
        for (i, value) in raw.iter().enumerate() {
            normalized[i] = value / FEATURE_MAX[i];
        }
        inputs.push(normalized);
    }

    let count = options.samples as f64;
    let mut weights = [0.0f64; FEATURE_COUNT];
    let mut intercept = 0.0f64;

    for _epoch in 0..options.epochs {
        let mut grad_w = [0.0f64; FEATURE_COUNT];
        let mut grad_b = 0.0f64;
        for (input, target) in inputs.iter().zip(targets.iter()) {
            let predicted: f64 = weights
                .iter()
                .zip(input.iter())
                .map(|(weight, value)| weight * value)
                .sum::<f64>()
                + intercept;
            let err = predicted - target;
            for (slot, value) in grad_w.iter_mut().zip(input.iter()) {
                *slot += err * value;
            }
            grad_b += err;
        }
        for (weight, grad) in weights.iter_mut().zip(grad_w.iter()) {
            *weight -= options.learning_rate * 2.0 * grad / count;
        }
        intercept -= options.learning_rate * 2.0 * grad_b / count;
    }

    if weights.iter().any(|weight| !weight.is_finite()) || !intercept.is_finite() {
        return Err(ScoreError::model_unavailable("fallback fit diverged"));
    }

    let mut raw_weights = [0.0f64; FEATURE_COUNT];
    for (i, weight) in weights.iter().enumerate() {
        raw_weights[i] = weight / FEATURE_MAX[i];
    }

    let model = RegressionModel::new(raw_weights, intercept);
    model.validate()?;
    Ok(model)
}
