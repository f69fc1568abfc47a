//! Time-estimation bias per category.
//!
//! Combines two signals: measured deltas from completed blocks that carry
//! both a planned and an actual duration, and the self-reported
//! "took more / less than planned" answer on feedback entries.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::aggregate::round1;
use crate::model::{Block, Category, CompletionFeedback, FeedbackTarget, Task, TimeComparison};

/// Relative delta attributed to a feedback-only "more"/"less" answer.
pub const FEEDBACK_PROXY_DELTA: f64 = 0.15;

/// Planned vs actual for a single block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimateDelta {
    pub planned: i64,
    pub actual: i64,
    /// `(actual - planned) / planned`, positive = underestimation
    pub relative: f64,
}

impl EstimateDelta {
    /// `None` unless `planned` is positive.
    pub fn new(planned: i64, actual: i64) -> Option<Self> {
        if planned <= 0 {
            return None;
        }
        Some(Self {
            planned,
            actual,
            relative: (actual as f64 - planned as f64) / planned as f64,
        })
    }

    pub fn from_block(block: &Block) -> Option<Self> {
        if !block.completed {
            return None;
        }
        Self::new(block.planned_duration_minutes, block.actual_duration_minutes?)
    }
}

/// Average estimation bias for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBias {
    pub category: Category,
    pub label: String,
    /// Mean relative delta as a percentage, one decimal
    pub bias_percent: f64,
    /// Number of deltas averaged
    pub samples: usize,
}

impl CategoryBias {
    /// Tasks in this category tend to run longer than planned.
    pub fn is_underestimation(&self) -> bool {
        self.bias_percent > 0.0
    }

    /// Human-readable description of the bias.
    pub fn bias_description(&self) -> &'static str {
        let magnitude = self.bias_percent.abs();
        if magnitude < 5.0 {
            "Estimaciones precisas"
        } else if self.bias_percent >= 15.0 {
            "Subestimación severa"
        } else if self.bias_percent > 0.0 {
            "Subestimación moderada"
        } else if self.bias_percent <= -15.0 {
            "Sobreestimación severa"
        } else {
            "Sobreestimación moderada"
        }
    }
}

/// Per-category bias, sorted by absolute magnitude (largest first).
pub fn compute_time_estimation_bias(
    blocks: &[Block],
    tasks: &[Task],
    feedback: &[CompletionFeedback],
) -> Vec<CategoryBias> {
    let mut deltas: IndexMap<Category, Vec<f64>> = IndexMap::new();

    for block in blocks {
        if let Some(delta) = EstimateDelta::from_block(block) {
            deltas.entry(block.category).or_default().push(delta.relative);
        }
    }

    let block_categories: HashMap<&str, Category> =
        blocks.iter().map(|b| (b.id.as_str(), b.category)).collect();
    let task_categories: HashMap<&str, Category> =
        tasks.iter().map(|t| (t.id.as_str(), t.category)).collect();

    for entry in feedback {
        let delta = match entry.time_comparison {
            TimeComparison::More => FEEDBACK_PROXY_DELTA,
            TimeComparison::Less => -FEEDBACK_PROXY_DELTA,
            TimeComparison::Equal => continue,
        };
        let category = match entry.target() {
            FeedbackTarget::Block(id) => block_categories.get(id),
            FeedbackTarget::Task(id) => task_categories.get(id),
            FeedbackTarget::Unattached => None,
        };
        if let Some(category) = category {
            deltas.entry(*category).or_default().push(delta);
        }
    }

    let mut biases: Vec<CategoryBias> = deltas
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(category, values)| {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            CategoryBias {
                category,
                label: category.label().to_string(),
                bias_percent: round1(mean * 100.0),
                samples: values.len(),
            }
        })
        .collect();

    biases.sort_by(|a, b| b.bias_percent.abs().total_cmp(&a.bias_percent.abs()));
    biases
}
