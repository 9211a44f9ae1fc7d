//! Terminal rendering for predictions, the model registry, the dataset and
//! the EDA gallery.

use std::path::Path;

use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use chrono::{DateTime, Utc};
use ecasa_ai::Prediction;
use ecasa_core::{AppConfig, ModelId, Sentiment, Visualization};
use serde::Serialize;

/// Machine-readable form of a [`Prediction`].
#[derive(Debug, Serialize)]
pub struct PredictionRecord<'a> {
    pub model: &'a str,
    pub code: i64,
    pub label: &'a str,
    pub predicted_at: String,
}

impl<'a> PredictionRecord<'a> {
    pub fn new(prediction: &'a Prediction, at: DateTime<Utc>) -> Self {
        Self {
            model: prediction.model.display_name(),
            code: prediction.code,
            label: prediction.sentiment.as_str(),
            predicted_at: at.to_rfc3339(),
        }
    }
}

pub fn print_prediction(prediction: &Prediction) {
    let sentiment = prediction.sentiment;
    println!("Text categorized as: {sentiment}. {}", sentiment.description());
}

pub fn print_prediction_json(prediction: &Prediction) -> anyhow::Result<()> {
    let record = PredictionRecord::new(prediction, Utc::now());
    println!("{}", serde_json::to_string(&record)?);
    Ok(())
}

pub fn print_models<'a>(models: impl Iterator<Item = (ModelId, &'a Path)>) {
    println!("  {:<28} {:<5} {:<8} PATH", "MODEL", "SLUG", "PRESENT");
    for (id, path) in models {
        println!(
            "  {:<28} {:<5} {:<8} {}",
            id.display_name(),
            id.slug(),
            yes_no(path.exists()),
            path.display()
        );
    }
}

pub fn print_sample(batches: &[RecordBatch]) -> anyhow::Result<()> {
    if batches.iter().all(|b| b.num_rows() == 0) {
        println!("(no rows)");
        return Ok(());
    }
    println!("{}", pretty_format_batches(batches)?);
    Ok(())
}

/// Class counts with labels and share of the dataset.
pub fn print_distribution(distribution: &[(i64, usize)]) {
    let total: usize = distribution.iter().map(|(_, n)| n).sum();
    println!("  {:<6} {:<14} {:>8} {:>7}", "CODE", "LABEL", "TWEETS", "SHARE");
    for &(code, count) in distribution {
        let share = if total == 0 {
            0.0
        } else {
            count as f64 * 100.0 / total as f64
        };
        let label = Sentiment::from_code(code).to_string();
        println!("  {code:<6} {label:<14} {count:>8} {share:>6.1}%");
    }
    println!("  {:<6} {:<14} {total:>8}", "", "total");
}

pub fn print_gallery(config: &AppConfig, visualization: Option<Visualization>) {
    match visualization {
        Some(v) => print_visualization(config, v),
        None => {
            for v in Visualization::ALL {
                print_visualization(config, v);
            }
        }
    }
}

fn print_visualization(config: &AppConfig, visualization: Visualization) {
    let section = if visualization.is_feature_engineering() {
        "feature engineering"
    } else {
        "explore"
    };
    println!("=== {} ({section}) ===", visualization.title());
    print_image(config, "overview", &visualization.overview());

    for (sentiment, path) in visualization.by_sentiment() {
        print_image(config, sentiment.as_str(), &path);
    }
    println!();
}

fn print_image(config: &AppConfig, label: &str, path: &Path) {
    let resolved = config.resolve(path);
    let marker = if resolved.exists() { "" } else { "  (missing)" };
    println!("  {label:<10} {}{marker}", resolved.display());
}

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}
