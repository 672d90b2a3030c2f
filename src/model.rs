//! Loading and invoking the pre-fitted pricing pipeline.
//!
//! The artifact is produced by the offline training job: a JSON document
//! holding a fitted scaler + one-hot encoder + linear regressor. This
//! module deserializes it once at startup and scores rows against it; it
//! never fits anything. All schema knowledge (column names, category
//! vocabularies) comes from the artifact, not from this crate.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::{fs, path::Path};

use crate::features::{coerce_str, Row};

#[derive(Debug, Deserialize)]
pub struct NumericFeature {
    pub name: String,
    pub mean: f64,
    pub scale: f64,
    pub coefficient: f64,
}

#[derive(Debug, Deserialize)]
pub struct CategoricalFeature {
    pub name: String,
    pub categories: Vec<String>,
    pub coefficients: Vec<f64>,
}

/// The fitted pipeline, read-only for the life of the process.
#[derive(Debug, Deserialize)]
pub struct PricePipeline {
    pub numeric: Vec<NumericFeature>,
    pub categorical: Vec<CategoricalFeature>,
    pub intercept: f64,
}

impl PricePipeline {
    /// Deserialize the artifact and sanity-check its internal consistency.
    /// Any failure here aborts startup.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read model artifact at {}", path.display()))?;
        let pipeline: PricePipeline =
            serde_json::from_str(&text).context("failed to parse model artifact")?;

        if pipeline.numeric.is_empty() && pipeline.categorical.is_empty() {
            bail!("model artifact declares no features");
        }
        for feature in &pipeline.numeric {
            if feature.scale == 0.0 {
                bail!("numeric feature '{}' has zero scale", feature.name);
            }
        }
        for feature in &pipeline.categorical {
            if feature.categories.len() != feature.coefficients.len() {
                bail!(
                    "categorical feature '{}': {} categories but {} coefficients",
                    feature.name,
                    feature.categories.len(),
                    feature.coefficients.len()
                );
            }
        }

        Ok(pipeline)
    }

    pub fn feature_count(&self) -> usize {
        self.numeric.len() + self.categorical.len()
    }

    /// Score one row. Missing features, non-numeric cells in numeric
    /// columns, and category values unseen at fit time all fail scoring.
    pub fn predict_row(&self, row: &Row) -> Result<f64> {
        let mut price = self.intercept;

        for feature in &self.numeric {
            let cell = row
                .get(&feature.name)
                .with_context(|| format!("missing feature '{}'", feature.name))?;
            let x = numeric_value(cell, &feature.name)?;
            price += feature.coefficient * (x - feature.mean) / feature.scale;
        }

        for feature in &self.categorical {
            let cell = row
                .get(&feature.name)
                .with_context(|| format!("missing feature '{}'", feature.name))?;
            let label = coerce_str(cell);
            let index = feature
                .categories
                .iter()
                .position(|category| *category == label)
                .with_context(|| {
                    format!(
                        "unknown category '{}' for feature '{}'",
                        label, feature.name
                    )
                })?;
            price += feature.coefficients[index];
        }

        Ok(price)
    }

    /// Score a batch. Fails as a whole on the first bad row; no partial
    /// results.
    pub fn predict(&self, rows: &[Row]) -> Result<Vec<f64>> {
        rows.iter().map(|row| self.predict_row(row)).collect()
    }
}

fn numeric_value(cell: &Value, name: &str) -> Result<f64> {
    match cell {
        Value::Number(n) => n
            .as_f64()
            .with_context(|| format!("feature '{name}' is not representable as f64")),
        Value::String(s) => s
            .parse::<f64>()
            .with_context(|| format!("feature '{name}' has non-numeric value '{s}'")),
        other => bail!("feature '{name}' has non-numeric value {other}"),
    }
}
