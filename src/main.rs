use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod error;
mod inspect;
mod model;
mod models;
mod predictor;
mod report;

use crate::error::ScoreError;
use crate::model::{RegressionModel, TrainOptions};
use crate::models::{CsvSummary, StudentFeatures};
use crate::predictor::ScorePredictor;

#[derive(Parser)]
#[command(name = "performance-predictor")]
#[command(about = "Student performance score prediction and dataset inspection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict a performance score from the five student features
    Predict {
        #[command(flatten)]
        features: FeatureArgs,
        #[arg(long, default_value = "regression_model.json")]
        model: PathBuf,
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Write a markdown report for a prediction
    Report {
        #[command(flatten)]
        features: FeatureArgs,
        #[arg(long, default_value = "regression_model.json")]
        model: PathBuf,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Summarize a CSV dataset
    Inspect {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value_t = 10)]
        head: usize,
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Fit a fallback model on synthetic data and write the artifact
    InitModel {
        #[arg(long, default_value = "regression_model.json")]
        out: PathBuf,
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args)]
struct FeatureArgs {
    /// Weekly study hours, clamped to [0, 40]
    #[arg(long, default_value_t = 20.0)]
    hours: f64,
    /// Attendance rate in percent, clamped to [0, 100]
    #[arg(long, default_value_t = 85.0)]
    attendance: f64,
    /// Average of previous scores, clamped to [0, 100]
    #[arg(long, default_value_t = 75.0)]
    previous_scores: f64,
    /// Weekly tutoring sessions, clamped to [0, 10]
    #[arg(long, default_value_t = 2.0)]
    tutoring: f64,
    /// Peer influence from 1 (weak) to 5 (strong)
    #[arg(long, default_value_t = 3)]
    peer_influence: u8,
}

impl FeatureArgs {
    fn to_features(&self) -> StudentFeatures {
        StudentFeatures {
            hours_studied: self.hours,
            attendance_rate: self.attendance,
            previous_scores: self.previous_scores,
            tutoring_sessions: self.tutoring,
            peer_influence: self.peer_influence,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Predict {
            features,
            model,
            format,
        } => {
            let features = features.to_features();
            let predictor = ScorePredictor::new(load_or_bootstrap(&model)?)?;
            let result = predictor.evaluate(&features)?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Text => {
                    println!("Predicted score: {:.2}", result.score);
                    println!("Grade: {}", result.grade);
                    println!("{}", result.feedback);
                    if let (Some(hours), Some(tutoring)) =
                        (result.recommended_hours, result.recommended_tutoring)
                    {
                        println!("Recommended weekly study hours: {hours}");
                        println!("Recommended weekly tutoring sessions: {tutoring}");
                    }
                }
            }
        }
        Commands::Report {
            features,
            model,
            out,
        } => {
            let features = features.to_features();
            let predictor = ScorePredictor::new(load_or_bootstrap(&model)?)?;
            let result = predictor.evaluate(&features)?;
            let rendered = report::build_report(&features, &result);
            std::fs::write(&out, rendered)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Inspect { csv, head, format } => {
            let summary = inspect::inspect_csv(&csv, head)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
                OutputFormat::Text => print_summary(&summary),
            }
        }
        Commands::InitModel { out, force } => {
            if out.exists() && !force {
                anyhow::bail!("{} already exists; pass --force to overwrite", out.display());
            }
            let model = model::train_fallback(&TrainOptions::default())?;
            model.save(&out)?;
            println!("Model artifact written to {}.", out.display());
        }
    }

    Ok(())
}

// The caller, not evaluate(), substitutes a fallback model when the
// artifact is missing or corrupt.
fn load_or_bootstrap(path: &Path) -> Result<RegressionModel, ScoreError> {
    match RegressionModel::load(path) {
        Ok(model) => {
            info!("loaded regression model from {}", path.display());
            Ok(model)
        }
        Err(ScoreError::ModelUnavailable { reason }) => {
            warn!("regression model unavailable ({reason}); fitting a fallback model");
            model::train_fallback(&TrainOptions::default())
        }
        Err(e) => Err(e),
    }
}

fn print_summary(summary: &CsvSummary) {
    println!("Rows: {}", summary.rows);
    println!("Columns: {}", summary.columns);
    println!("Column names: {}", summary.column_names.join(", "));
    println!("Missing cells: {}", summary.missing_cells);
    println!("Duplicate rows: {}", summary.duplicate_rows);

    if !summary.head.is_empty() {
        println!();
        println!("First {} rows:", summary.head.len());
        for row in &summary.head {
            println!("- {}", row.join(", "));
        }
    }

    if !summary.numeric_columns.is_empty() {
        println!();
        println!("Numeric columns:");
        for stats in &summary.numeric_columns {
            println!(
                "- {}: count {} mean {:.2} std {:.2} min {:.2} q25 {:.2} median {:.2} q75 {:.2} max {:.2}",
                stats.name,
                stats.count,
                stats.mean,
                stats.std,
                stats.min,
                stats.q25,
                stats.median,
                stats.q75,
                stats.max
            );
        }
    }
}
