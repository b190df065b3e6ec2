use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentFeatures {
    pub hours_studied: f64,
    pub attendance_rate: f64,
    pub previous_scores: f64,
    pub tutoring_sessions: f64,
    pub peer_influence: u8,
}

impl Default for StudentFeatures {
    // Mirrors the intake form defaults.
    fn default() -> Self {
        StudentFeatures {
            hours_studied: 20.0,
            attendance_rate: 85.0,
            previous_scores: 75.0,
            tutoring_sessions: 2.0,
            peer_influence: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "Excellent")]
    Excellent,
    #[serde(rename = "Very Good")]
    VeryGood,
    #[serde(rename = "Acceptable")]
    Acceptable,
    #[serde(rename = "Weak")]
    Weak,
}

impl Grade {
    pub fn label(&self) -> &'static str {
        match self {
            Grade::Excellent => "Excellent",
            Grade::VeryGood => "Very Good",
            Grade::Acceptable => "Acceptable",
            Grade::Weak => "Weak",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    pub score: f64,
    pub grade: Grade,
    pub feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_tutoring: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnStats {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CsvSummary {
    pub rows: usize,
    pub columns: usize,
    pub column_names: Vec<String>,
    pub missing_cells: usize,
    pub duplicate_rows: usize,
    pub head: Vec<Vec<String>>,
    pub numeric_columns: Vec<ColumnStats>,
}
