use std::collections::HashSet;
use std::path::Path;

use crate::error::{Result, ScoreError};
use crate::models::{ColumnStats, CsvSummary};

pub fn inspect_csv(path: &Path, head_rows: usize) -> Result<CsvSummary> {
    let mut reader = csv::Reader::from_path(path).map_err(csv_parse_error)?;
    let headers = reader.headers().map_err(csv_parse_error)?.clone();
    let column_names: Vec<String> = headers.iter().map(str::to_string).collect();
    let columns = column_names.len();

    let mut rows = 0usize;
    let mut missing_cells = 0usize;
    let mut duplicate_rows = 0usize;
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut head: Vec<Vec<String>> = Vec::new();
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); columns];
    let mut non_numeric: Vec<bool> = vec![false; columns];

    for record in reader.records() {
        let record = record.map_err(csv_parse_error)?;
        rows += 1;

        let cells: Vec<String> = record.iter().map(str::to_string).collect();
        for (i, cell) in cells.iter().enumerate() {
            let trimmed = cell.trim();
            if trimmed.is_empty() {
                missing_cells += 1;
            } else {
                match trimmed.parse::<f64>() {
                    Ok(value) if value.is_finite() => values[i].push(value),
                    _ => non_numeric[i] = true,
                }
            }
        }

        if head.len() < head_rows {
            head.push(cells.clone());
        }
        // First occurrence is not a duplicate, every repeat is.
        if !seen.insert(cells) {
            duplicate_rows += 1;
        }
    }

    let mut numeric_columns = Vec::new();
    for (i, name) in column_names.iter().enumerate() {
        if non_numeric[i] || values[i].is_empty() {
            continue;
        }
        numeric_columns.push(column_stats(name, &values[i]));
    }

    Ok(CsvSummary {
        rows,
        columns,
        column_names,
        missing_cells,
        duplicate_rows,
        head,
        numeric_columns,
    })
}

fn column_stats(name: &str, values: &[f64]) -> ColumnStats {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = if count > 1 {
        let variance = sorted
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>()
            / (count as f64 - 1.0);
        variance.sqrt()
    } else {
        0.0
    };

    ColumnStats {
        name: name.to_string(),
        count,
        mean,
        std,
        min: sorted[0],
        q25: percentile(&sorted, 0.25),
        median: percentile(&sorted, 0.50),
        q75: percentile(&sorted, 0.75),
        max: sorted[count - 1],
    }
}

// Linear interpolation between closest ranks.
fn percentile(sorted: &[f64], fraction: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let position = fraction * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

fn csv_parse_error(e: csv::Error) -> ScoreError {
    ScoreError::FileParse(format!(
        "{e}; check that the file is well-formed CSV encoded as UTF-8"
    ))
}
