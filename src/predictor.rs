use crate::error::{Result, ScoreError};
use crate::model::{RegressionModel, FEATURE_COUNT, FEATURE_MAX};
use crate::models::{Grade, PredictionResult, StudentFeatures};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

pub struct ScorePredictor {
    model: RegressionModel,
}

impl ScorePredictor {
    pub fn new(model: RegressionModel) -> Result<Self> {
        model.validate()?;
        Ok(ScorePredictor { model })
    }

    /// Pure function of the inputs given a fixed model artifact.
    pub fn evaluate(&self, features: &StudentFeatures) -> Result<PredictionResult> {
        let vector = feature_vector(features)?;
        let raw = self.model.predict(&vector);
        if !raw.is_finite() {
            return Err(ScoreError::model_unavailable(format!(
                "model produced a non-numeric score: {raw}"
            )));
        }

        let score = round2(raw).clamp(MIN_SCORE, MAX_SCORE);
        let grade = grade_for_score(score);
        let (recommended_hours, recommended_tutoring) = study_plan(grade, vector[0], vector[3]);

        Ok(PredictionResult {
            score,
            grade,
            feedback: feedback_for(grade).to_string(),
            recommended_hours,
            recommended_tutoring,
        })
    }
}

/// Clamp the features into their domains and lay them out in the model's
/// canonical order. Non-finite values are rejected rather than clamped.
pub fn feature_vector(features: &StudentFeatures) -> Result<[f64; FEATURE_COUNT]> {
    let numeric = [
        ("hours_studied", features.hours_studied),
        ("attendance_rate", features.attendance_rate),
        ("previous_scores", features.previous_scores),
        ("tutoring_sessions", features.tutoring_sessions),
    ];
    for (name, value) in numeric {
        if !value.is_finite() {
            return Err(ScoreError::InvalidInput(format!(
                "{name} must be a finite number, got {value}"
            )));
        }
    }

    Ok([
        features.hours_studied.clamp(0.0, FEATURE_MAX[0]),
        features.attendance_rate.clamp(0.0, FEATURE_MAX[1]),
        features.previous_scores.clamp(0.0, FEATURE_MAX[2]),
        features.tutoring_sessions.clamp(0.0, FEATURE_MAX[3]),
        f64::from(features.peer_influence.clamp(1, 5)),
    ])
}

// Inclusive lower thresholds, highest band first; equality lands in the
// higher band.
pub fn grade_for_score(score: f64) -> Grade {
    if score >= 90.0 {
        Grade::Excellent
    } else if score >= 75.0 {
        Grade::VeryGood
    } else if score >= 60.0 {
        Grade::Acceptable
    } else {
        Grade::Weak
    }
}

pub fn feedback_for(grade: Grade) -> &'static str {
    match grade {
        Grade::Excellent => "Exceptional performance at an outstanding level",
        Grade::VeryGood => "Very good performance that keeps progressing",
        Grade::Acceptable => "Acceptable performance that needs improvement",
        Grade::Weak => "Weak performance that needs close support",
    }
}

// Remediation targets grow as band quality drops; Excellent gets none.
fn study_plan(grade: Grade, hours: f64, tutoring: f64) -> (Option<f64>, Option<f64>) {
    let (hours_delta, hours_floor, tutoring_delta, tutoring_floor) = match grade {
        Grade::Excellent => return (None, None),
        Grade::VeryGood => (2.0, 10.0, 1.0, 1.0),
        Grade::Acceptable => (4.0, 15.0, 2.0, 2.0),
        Grade::Weak => (6.0, 20.0, 3.0, 3.0),
    };

    let hours_target = (hours + hours_delta).max(hours_floor).min(FEATURE_MAX[0]);
    let tutoring_target = (tutoring + tutoring_delta)
        .max(tutoring_floor)
        .min(FEATURE_MAX[3]);
    (Some(hours_target), Some(tutoring_target))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RegressionModel;

    fn reference_model() -> RegressionModel {
        RegressionModel::new([0.3, 0.2, 0.25, 0.15, 0.1], 0.0)
    }

    fn sample_features() -> StudentFeatures {
        StudentFeatures {
            hours_studied: 20.0,
            attendance_rate: 85.0,
            previous_scores: 75.0,
            tutoring_sessions: 2.0,
            peer_influence: 3,
        }
    }

    #[test]
    fn bands_follow_inclusive_lower_thresholds() {
        assert_eq!(grade_for_score(90.0), Grade::Excellent);
        assert_eq!(grade_for_score(89.99), Grade::VeryGood);
        assert_eq!(grade_for_score(75.0), Grade::VeryGood);
        assert_eq!(grade_for_score(74.99), Grade::Acceptable);
        assert_eq!(grade_for_score(60.0), Grade::Acceptable);
        assert_eq!(grade_for_score(59.99), Grade::Weak);
    }

    #[test]
    fn evaluates_the_reference_scenario() {
        let predictor = ScorePredictor::new(reference_model()).expect("model should validate");
        let result = predictor.evaluate(&sample_features()).expect("evaluate should succeed");

        assert!((result.score - 42.35).abs() < 1e-9);
        assert_eq!(result.grade, Grade::Weak);
        assert_eq!(result.recommended_hours, Some(26.0));
        assert_eq!(result.recommended_tutoring, Some(5.0));
    }

    #[test]
    fn maximum_inputs_sit_just_under_the_acceptable_band() {
        let predictor = ScorePredictor::new(reference_model()).expect("model should validate");
        let features = StudentFeatures {
            hours_studied: 40.0,
            attendance_rate: 100.0,
            previous_scores: 100.0,
            tutoring_sessions: 10.0,
            peer_influence: 5,
        };
        let result = predictor.evaluate(&features).expect("evaluate should succeed");

        assert!((result.score - 59.0).abs() < 1e-9);
        assert_eq!(result.grade, Grade::Weak);
    }

    #[test]
    fn score_is_clamped_into_the_display_range() {
        let high = ScorePredictor::new(RegressionModel::new([10.0, 10.0, 10.0, 10.0, 10.0], 0.0))
            .expect("model should validate");
        let result = high.evaluate(&sample_features()).expect("evaluate should succeed");
        assert_eq!(result.score, 100.0);
        assert_eq!(result.grade, Grade::Excellent);

        let low = ScorePredictor::new(RegressionModel::new([-1.0, -1.0, -1.0, -1.0, -1.0], 0.0))
            .expect("model should validate");
        let result = low.evaluate(&sample_features()).expect("evaluate should succeed");
        assert_eq!(result.score, 0.0);
        assert_eq!(result.grade, Grade::Weak);
    }

    #[test]
    fn evaluate_is_idempotent_for_identical_inputs() {
        let predictor = ScorePredictor::new(reference_model()).expect("model should validate");
        let first = predictor.evaluate(&sample_features()).expect("evaluate should succeed");
        let second = predictor.evaluate(&sample_features()).expect("evaluate should succeed");

        assert_eq!(first.score, second.score);
        assert_eq!(first.grade, second.grade);
        assert_eq!(first.feedback, second.feedback);
        assert_eq!(first.recommended_hours, second.recommended_hours);
        assert_eq!(first.recommended_tutoring, second.recommended_tutoring);
    }

    #[test]
    fn out_of_range_inputs_are_clamped_before_prediction() {
        let predictor = ScorePredictor::new(reference_model()).expect("model should validate");
        let oversized = StudentFeatures {
            hours_studied: 400.0,
            attendance_rate: 130.0,
            previous_scores: -20.0,
            tutoring_sessions: 99.0,
            peer_influence: 9,
        };
        let capped = StudentFeatures {
            hours_studied: 40.0,
            attendance_rate: 100.0,
            previous_scores: 0.0,
            tutoring_sessions: 10.0,
            peer_influence: 5,
        };

        let left = predictor.evaluate(&oversized).expect("evaluate should succeed");
        let right = predictor.evaluate(&capped).expect("evaluate should succeed");
        assert_eq!(left.score, right.score);
    }

    #[test]
    fn non_finite_inputs_are_rejected() {
        let predictor = ScorePredictor::new(reference_model()).expect("model should validate");
        let features = StudentFeatures {
            attendance_rate: f64::NAN,
            ..sample_features()
        };
        assert!(matches!(
            predictor.evaluate(&features),
            Err(ScoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn overflowing_prediction_is_model_unavailable() {
        let predictor = ScorePredictor::new(RegressionModel::new(
            [f64::MAX, f64::MAX, 0.0, 0.0, 0.0],
            0.0,
        ))
        .expect("finite weights should validate");
        assert!(matches!(
            predictor.evaluate(&sample_features()),
            Err(ScoreError::ModelUnavailable { .. })
        ));
    }

    #[test]
    fn excellent_band_recommends_no_changes() {
        let predictor = ScorePredictor::new(RegressionModel::new([0.0, 1.0, 0.0, 0.0, 0.0], 0.0))
            .expect("model should validate");
        let features = StudentFeatures {
            attendance_rate: 95.0,
            ..sample_features()
        };
        let result = predictor.evaluate(&features).expect("evaluate should succeed");

        assert_eq!(result.grade, Grade::Excellent);
        assert_eq!(result.recommended_hours, None);
        assert_eq!(result.recommended_tutoring, None);
    }

    #[test]
    fn recommendations_never_exceed_the_feature_domains() {
        let predictor = ScorePredictor::new(reference_model()).expect("model should validate");
        let features = StudentFeatures {
            hours_studied: 39.0,
            tutoring_sessions: 9.5,
            ..sample_features()
        };
        let result = predictor.evaluate(&features).expect("evaluate should succeed");

        assert_eq!(result.recommended_hours, Some(40.0));
        assert_eq!(result.recommended_tutoring, Some(10.0));
    }

    #[test]
    fn peer_influence_defaults_to_neutral() {
        assert_eq!(StudentFeatures::default().peer_influence, 3);
    }

    #[test]
    fn fallback_model_scores_stay_in_range_across_the_domain() {
        let model = crate::model::train_fallback(&crate::model::TrainOptions::default())
            .expect("fit should converge");
        let predictor = ScorePredictor::new(model).expect("model should validate");

        for hours in [0.0, 20.0, 40.0] {
            for attendance in [0.0, 50.0, 100.0] {
                for previous in [0.0, 50.0, 100.0] {
                    for tutoring in [0.0, 5.0, 10.0] {
                        for peer in [1u8, 3, 5] {
                            let features = StudentFeatures {
                                hours_studied: hours,
                                attendance_rate: attendance,
                                previous_scores: previous,
                                tutoring_sessions: tutoring,
                                peer_influence: peer,
                            };
                            let result =
                                predictor.evaluate(&features).expect("evaluate should succeed");
                            assert!((MIN_SCORE..=MAX_SCORE).contains(&result.score));
                        }
                    }
                }
            }
        }
    }
}
