//! Extended metrics and the daily trend series shown next to the insights.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::aggregate::{completed_within, effective_duration, ratio_or, round1};
use crate::model::{Block, CheckIn, CompletionFeedback, Feeling, FocusQuality, RangeBounds, Task};

/// Count of feedback entries reporting one feeling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeelingCount {
    pub feeling: Feeling,
    pub count: usize,
}

/// Secondary activity metrics over the range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedMetrics {
    pub planned_blocks: usize,
    pub completed_blocks: usize,
    /// Minutes, one decimal
    pub average_block_minutes: f64,
    pub check_in_days: usize,
    /// Distinct dates with a completed check-in
    pub completed_check_ins: usize,
    /// Percent of check-in days marked completed
    pub check_in_rate: f64,
    pub feedback_count: usize,
    /// Percent of feedback entries reporting an interruption
    pub interruption_rate: f64,
    /// Percent of feedback entries reporting full focus
    pub focus_yes_rate: f64,
    /// Fixed order, excellent first
    pub feelings: Vec<FeelingCount>,
}

/// One point of the daily trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub focus_minutes: i64,
    pub completed_tasks: usize,
}

fn percent(part: usize, whole: usize) -> f64 {
    round1(ratio_or(part as f64, whole as f64, 0.0) * 100.0)
}

/// Compute the extended metrics.
///
/// Blocks are counted as given; check-ins are limited to the range's dates.
pub fn compute_extended_metrics(
    blocks: &[Block],
    check_ins: &[CheckIn],
    feedback: &[CompletionFeedback],
    range: &RangeBounds,
) -> ExtendedMetrics {
    let completed: Vec<i64> = blocks
        .iter()
        .filter(|b| b.completed)
        .map(|b| effective_duration(b).max(0))
        .collect();
    let completed_minutes = completed.iter().copied().fold(0i64, i64::saturating_add);

    let in_range: Vec<&CheckIn> = check_ins
        .iter()
        .filter(|c| range.contains_date(c.date))
        .collect();
    let check_in_dates: BTreeSet<NaiveDate> = in_range.iter().map(|c| c.date).collect();
    // A date counts as completed once, however many rows it has.
    let completed_dates: BTreeSet<NaiveDate> = in_range
        .iter()
        .filter(|c| c.completed)
        .map(|c| c.date)
        .collect();
    let completed_check_ins = completed_dates.len();

    let interrupted = feedback.iter().filter(|f| f.interrupted).count();
    let focus_yes = feedback
        .iter()
        .filter(|f| f.focus == FocusQuality::Yes)
        .count();

    let feelings = Feeling::ALL
        .iter()
        .map(|feeling| FeelingCount {
            feeling: *feeling,
            count: feedback.iter().filter(|f| f.feeling == *feeling).count(),
        })
        .collect();

    ExtendedMetrics {
        planned_blocks: blocks.len(),
        completed_blocks: completed.len(),
        average_block_minutes: round1(ratio_or(
            completed_minutes as f64,
            completed.len() as f64,
            0.0,
        )),
        check_in_days: check_in_dates.len(),
        completed_check_ins,
        check_in_rate: percent(completed_check_ins, check_in_dates.len()),
        feedback_count: feedback.len(),
        interruption_rate: percent(interrupted, feedback.len()),
        focus_yes_rate: percent(focus_yes, feedback.len()),
        feelings,
    }
}

/// One point per local date of the range, oldest first.
pub fn compute_daily_trend(blocks: &[Block], tasks: &[Task], range: &RangeBounds) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = range
        .dates()
        .map(|date| TrendPoint {
            date,
            focus_minutes: 0,
            completed_tasks: 0,
        })
        .collect();
    let first = range.first_date();
    let slot = |date: NaiveDate| usize::try_from((date - first).num_days()).ok();

    for block in blocks.iter().filter(|b| b.completed && range.contains(b.start)) {
        if let Some(point) = slot(range.local_date(block.start)).and_then(|i| points.get_mut(i)) {
            point.focus_minutes = point.focus_minutes.saturating_add(effective_duration(block).max(0));
        }
    }

    for task in tasks.iter().filter(|t| completed_within(t, range)) {
        let Some(completed_at) = task.completed_at else {
            continue;
        };
        if let Some(point) = slot(range.local_date(completed_at)).and_then(|i| points.get_mut(i)) {
            point.completed_tasks += 1;
        }
    }

    points
}
