//! Per-item scalar facts shared by every analytics stage.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::model::{Block, CompletionFeedback, FeedbackTarget, RangeBounds, Task};

/// Minutes of focus a block represents: actual if recorded, else planned.
pub fn effective_duration(block: &Block) -> i64 {
    block
        .actual_duration_minutes
        .unwrap_or(block.planned_duration_minutes)
}

/// The single calendar day a task is attributed to: due date, else the
/// local creation date.
pub fn task_anchor_date(task: &Task, range: &RangeBounds) -> NaiveDate {
    task.due_date
        .unwrap_or_else(|| range.local_date(task.created_at))
}

/// Completed with a completion instant inside the range.
pub fn completed_within(task: &Task, range: &RangeBounds) -> bool {
    task.completed && task.completed_at.is_some_and(|at| range.contains(at))
}

/// Feedback entries grouped by the block or task they describe.
///
/// Values keep input order, so "all feedback for this block" is a single
/// lookup instead of a scan per item.
#[derive(Debug, Default)]
pub struct FeedbackIndex<'a> {
    by_block: HashMap<&'a str, Vec<&'a CompletionFeedback>>,
    by_task: HashMap<&'a str, Vec<&'a CompletionFeedback>>,
}

impl<'a> FeedbackIndex<'a> {
    pub fn build(feedback: &'a [CompletionFeedback]) -> Self {
        let mut index = FeedbackIndex::default();
        for entry in feedback {
            match entry.target() {
                FeedbackTarget::Block(id) => index.by_block.entry(id).or_default().push(entry),
                FeedbackTarget::Task(id) => index.by_task.entry(id).or_default().push(entry),
                FeedbackTarget::Unattached => {}
            }
        }
        index
    }

    pub fn for_block(&self, block_id: &str) -> &[&'a CompletionFeedback] {
        self.by_block.get(block_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn for_task(&self, task_id: &str) -> &[&'a CompletionFeedback] {
        self.by_task.get(task_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn block_count(&self) -> usize {
        self.by_block.len()
    }

    pub fn task_count(&self) -> usize {
        self.by_task.len()
    }
}

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `numerator / denominator`, or `fallback` when the denominator is zero.
pub(crate) fn ratio_or(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        fallback
    }
}
