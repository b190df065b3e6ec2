use std::fmt::Write;

use chrono::Utc;

use crate::models::{PredictionResult, StudentFeatures};

pub fn build_report(features: &StudentFeatures, result: &PredictionResult) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Student Performance Report");
    let _ = writeln!(output, "Generated on {}", Utc::now().date_naive());
    let _ = writeln!(output);
    let _ = writeln!(output, "## Inputs");
    let _ = writeln!(output, "- Weekly study hours: {}", features.hours_studied);
    let _ = writeln!(output, "- Attendance rate: {}%", features.attendance_rate);
    let _ = writeln!(
        output,
        "- Average of previous scores: {}",
        features.previous_scores
    );
    let _ = writeln!(
        output,
        "- Weekly tutoring sessions: {}",
        features.tutoring_sessions
    );
    let _ = writeln!(
        output,
        "- Peer influence (1 weak, 5 strong): {}",
        features.peer_influence
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Prediction");
    let _ = writeln!(output, "- Predicted score: {:.2}", result.score);
    let _ = writeln!(output, "- Grade: {}", result.grade);
    let _ = writeln!(output, "- {}", result.feedback);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Study Plan");
    match (result.recommended_hours, result.recommended_tutoring) {
        (Some(hours), Some(tutoring)) => {
            let _ = writeln!(output, "- Raise weekly study hours to {hours}");
            let _ = writeln!(output, "- Raise weekly tutoring sessions to {tutoring}");
        }
        _ => {
            let _ = writeln!(output, "No changes recommended for this performance level.");
        }
    }

    output
}
