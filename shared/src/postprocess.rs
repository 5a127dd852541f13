use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::error::PipelineError;

/// Class index -> label table of the bundled classifier.
const CLASS_LABELS: [Label; 7] = [
    Label::Benign,
    Label::Malignant,
    Label::Malignant,
    Label::Malignant,
    Label::Benign,
    Label::Malignant,
    Label::Benign,
];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
    EnumIter,
)]
pub enum Label {
    Benign,
    Malignant,
}

impl Label {
    pub fn for_class(index: usize) -> Option<Label> {
        CLASS_LABELS.get(index).copied()
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
    EnumIter,
)]
pub enum Verdict {
    #[strum(serialize = "Not Cancer")]
    NotCancer,
    #[strum(serialize = "Cancer or Problematic")]
    CancerOrProblematic,
    Unknown,
    Unclassified,
}

impl Verdict {
    /// Indices outside the label table only occur when a model emits more than
    /// seven classes; those fall back on the confidence of the prediction.
    pub fn decide(index: usize, confidence: f64) -> Verdict {
        match Label::for_class(index) {
            Some(Label::Benign) => Verdict::NotCancer,
            Some(Label::Malignant) => Verdict::CancerOrProblematic,
            None if confidence < 0.5 => Verdict::Unknown,
            None => Verdict::Unclassified,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub predicted_class_index: usize,
    pub predicted_label: Option<Label>,
    /// Probability of the predicted class, rounded to 4 decimals.
    pub confidence_score: f64,
    pub verdict: Verdict,
}

impl ClassificationResult {
    pub fn from_logits(logits: &[f32]) -> Result<Self, PipelineError> {
        let index = argmax(logits)
            .ok_or_else(|| PipelineError::OutputShape("logits output is empty".to_string()))?;
        let probabilities = softmax(logits);
        let confidence_score = round_to(probabilities[index], 4);

        Ok(Self {
            predicted_class_index: index,
            predicted_label: Label::for_class(index),
            confidence_score,
            verdict: Verdict::decide(index, confidence_score),
        })
    }

    pub fn confidence_percent(&self) -> String {
        format_percent(self.confidence_score)
    }
}

/// Index of the largest value; the first one wins on ties.
pub fn argmax(values: &[f32]) -> Option<usize> {
    if values.is_empty() {
        return None;
    }
    let mut best = 0;
    for (i, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = i;
        }
    }
    Some(best)
}

/// Shifted by the maximum before exponentiation so large logits do not overflow.
pub fn softmax(logits: &[f32]) -> Vec<f64> {
    let max = logits
        .iter()
        .map(|&v| v as f64)
        .fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|&v| (v as f64 - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Percentage with at most two decimals and no trailing zeros: 0.5 -> "50", 0.98765 -> "98.77".
pub fn format_percent(score: f64) -> String {
    let formatted = format!("{:.2}", round_to(score * 100.0, 2));
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
