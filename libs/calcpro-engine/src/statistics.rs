//! Descriptive statistics over an ordered dataset
//!
//! Aggregates are recomputed from the full sequence on every change, so a
//! [`Summary`] always matches the values it was built from.

use crate::error::{CalcError, Result};
use crate::format::fixed;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Fixed decimals used when displaying aggregates
pub const DISPLAY_DECIMALS: usize = 4;

/// Aggregates of a non-empty dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub mean: f64,
    pub median: f64,
    /// Most frequent values, ascending. Empty when every value is distinct.
    pub modes: Vec<f64>,
    /// Population standard deviation
    pub std_dev: f64,
    /// Population variance
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub count: usize,
}

impl Summary {
    /// Compute aggregates; `None` for an empty slice
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let sum: f64 = values.iter().sum();
        let mean = sum / count as f64;

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let mid = count / 2;
        let median = if count.is_multiple_of(2) {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        Some(Self {
            mean,
            median,
            modes: modes(&sorted),
            std_dev: variance.sqrt(),
            variance,
            min: sorted[0],
            max: sorted[count - 1],
            sum,
            count,
        })
    }

    /// Display line recorded in history: `mean 5.0000 (n=8)`
    pub fn describe(&self) -> String {
        format!("mean {} (n={})", fixed(self.mean, DISPLAY_DECIMALS), self.count)
    }

    /// Modes for display: `"4, 5"`, or `"None"`
    pub fn modes_text(&self) -> String {
        if self.modes.is_empty() {
            return "None".to_string();
        }
        self.modes
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Values sharing the highest frequency, from an ascending slice
fn modes(sorted: &[f64]) -> Vec<f64> {
    let mut runs: Vec<(f64, usize)> = Vec::new();
    for &value in sorted {
        match runs.last_mut() {
            Some((last, count)) if *last == value => *count += 1,
            _ => runs.push((value, 1)),
        }
    }

    let max_freq = runs.iter().map(|(_, count)| *count).max().unwrap_or(0);
    let modes: Vec<f64> = runs
        .into_iter()
        .filter(|(_, count)| *count == max_freq)
        .map(|(value, _)| value)
        .collect();

    if modes.len() == sorted.len() {
        Vec::new()
    } else {
        modes
    }
}

/// Insertion-ordered dataset with an always-current summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    values: Vec<f64>,
    summary: Option<Summary>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value and recompute the summary
    pub fn push(&mut self, value: f64) -> Result<&Summary> {
        if !value.is_finite() {
            return Err(CalcError::invalid_input("Please enter a valid number"));
        }
        self.values.push(value);
        self.summary = Summary::compute(&self.values);
        self.summary
            .as_ref()
            .ok_or_else(|| CalcError::invalid_input("Dataset is empty"))
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.summary = None;
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
