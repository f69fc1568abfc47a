//! Pattern detection over raw calendar history.
//!
//! Produces the [`PatternResults`] bundle consumed by the insight and
//! weekly-summary builders: the best focus slot, weekday strength, category
//! ranking and per-category estimation bias.

use chrono::{Datelike, Timelike, Weekday};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::aggregate::{
    completed_within, effective_duration, ratio_or, task_anchor_date, FeedbackIndex,
};
use super::estimation::{compute_time_estimation_bias, CategoryBias};
use super::heatmap::{slot_label, SLOT_MINUTES};
use crate::model::{
    weekday_label, Block, Category, CompletionFeedback, FocusQuality, RangeBounds, Task, WEEKDAYS,
};

/// Quality rate assumed for a slot without any feedback.
const NEUTRAL_QUALITY: f64 = 0.5;
/// Maximum number of categories reported as "top".
const TOP_CATEGORY_LIMIT: usize = 3;

/// Aggregates for one two-hour start slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotScore {
    /// Minutes after local midnight where the slot starts
    pub start_minute: i64,
    pub label: String,
    pub focus_minutes: i64,
    pub positive_focus_count: usize,
    pub feedback_count: usize,
    pub quality_rate: f64,
    pub score: f64,
}

/// Aggregates for one weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayScore {
    pub day: String,
    pub focus_minutes: i64,
    pub completed_blocks: usize,
    pub planned_tasks: usize,
    pub completed_tasks: usize,
    pub completion_rate: f64,
    pub score: f64,
}

impl DayScore {
    fn empty(weekday: Weekday) -> Self {
        Self {
            day: weekday_label(weekday).to_string(),
            focus_minutes: 0,
            completed_blocks: 0,
            planned_tasks: 0,
            completed_tasks: 0,
            completion_rate: 0.0,
            score: 0.0,
        }
    }

    /// Any focus or task activity at all.
    pub fn is_active(&self) -> bool {
        self.focus_minutes != 0
            || self.completed_blocks != 0
            || self.planned_tasks != 0
            || self.completed_tasks != 0
    }
}

/// Strongest and weakest weekday plus the per-day breakdown (Monday first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPattern {
    pub strongest_day: Option<String>,
    pub weakest_day: Option<String>,
    pub days: Vec<DayScore>,
}

/// Aggregates for one category across blocks and tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub category: Category,
    pub label: String,
    pub total: usize,
    pub completed: usize,
    pub feedback_count: usize,
    pub focus_yes_count: usize,
    pub completion_rate: f64,
    pub focus_yes_rate: f64,
    pub normalized_feeling: f64,
    pub score: f64,
}

/// Everything the pattern detector found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternResults {
    pub best_focus_slot: Option<String>,
    pub slot_scores: Vec<SlotScore>,
    pub day_pattern: DayPattern,
    pub top_categories: Vec<String>,
    pub category_scores: Vec<CategoryScore>,
    pub estimation_bias: Vec<CategoryBias>,
}

impl PatternResults {
    pub fn strongest_day(&self) -> Option<&str> {
        self.day_pattern.strongest_day.as_deref()
    }

    pub fn weakest_day(&self) -> Option<&str> {
        self.day_pattern.weakest_day.as_deref()
    }

    pub fn top_category(&self) -> Option<&str> {
        self.top_categories.first().map(String::as_str)
    }
}

/// Run every pattern detector over the same inputs.
pub fn detect_patterns(
    blocks: &[Block],
    tasks: &[Task],
    feedback: &[CompletionFeedback],
    range: &RangeBounds,
) -> PatternResults {
    let index = FeedbackIndex::build(feedback);
    let slot_scores = compute_slot_scores(blocks, &index, range);
    let category_scores = compute_category_scores(blocks, tasks, &index);

    PatternResults {
        best_focus_slot: select_best_slot(&slot_scores),
        slot_scores,
        day_pattern: compute_strongest_and_weakest_day(blocks, tasks, range),
        top_categories: top_category_labels(&category_scores),
        category_scores,
        estimation_bias: compute_time_estimation_bias(blocks, tasks, feedback),
    }
}

/// Score every start slot that holds at least one completed block.
///
/// Returned in ascending slot order.
pub fn compute_slot_scores(
    blocks: &[Block],
    index: &FeedbackIndex<'_>,
    range: &RangeBounds,
) -> Vec<SlotScore> {
    struct Bucket {
        focus_minutes: i64,
        positive: usize,
        feedback: usize,
    }

    let mut buckets: IndexMap<i64, Bucket> = IndexMap::new();
    for block in blocks.iter().filter(|b| b.completed) {
        let minutes = effective_duration(block);
        if minutes <= 0 {
            continue;
        }

        let local = range.local(block.start);
        let start_minute = i64::from(local.hour() * 60 + local.minute());
        let key = (start_minute / SLOT_MINUTES) * SLOT_MINUTES;

        let entries = index.for_block(&block.id);
        let bucket = buckets.entry(key).or_insert(Bucket {
            focus_minutes: 0,
            positive: 0,
            feedback: 0,
        });
        bucket.focus_minutes = bucket.focus_minutes.saturating_add(minutes);
        bucket.positive += entries.iter().filter(|f| f.is_positive_focus()).count();
        bucket.feedback += entries.len();
    }

    buckets.sort_keys();
    buckets
        .into_iter()
        .map(|(start_minute, bucket)| {
            let quality_rate =
                ratio_or(bucket.positive as f64, bucket.feedback as f64, NEUTRAL_QUALITY);
            SlotScore {
                start_minute,
                label: slot_label(start_minute),
                focus_minutes: bucket.focus_minutes,
                positive_focus_count: bucket.positive,
                feedback_count: bucket.feedback,
                quality_rate,
                score: bucket.focus_minutes as f64 * (0.7 + 0.3 * quality_rate),
            }
        })
        .collect()
}

/// Highest score wins; ties go to more focus minutes, then the earlier slot.
fn select_best_slot(slots: &[SlotScore]) -> Option<String> {
    let mut best: Option<&SlotScore> = None;
    for slot in slots {
        best = match best {
            Some(current)
                if slot.score < current.score
                    || (slot.score == current.score
                        && slot.focus_minutes <= current.focus_minutes) =>
            {
                Some(current)
            }
            _ => Some(slot),
        };
    }
    best.map(|slot| slot.label.clone())
}

/// Label of the best-performing start slot, or `None` without completed
/// blocks of positive duration.
pub fn compute_best_focus_slot(
    blocks: &[Block],
    feedback: &[CompletionFeedback],
    range: &RangeBounds,
) -> Option<String> {
    let index = FeedbackIndex::build(feedback);
    select_best_slot(&compute_slot_scores(blocks, &index, range))
}

/// Score each weekday and pick the strongest and weakest active ones.
///
/// The weakest day is only reported when more than one day is active, and
/// never coincides with the strongest.
pub fn compute_strongest_and_weakest_day(
    blocks: &[Block],
    tasks: &[Task],
    range: &RangeBounds,
) -> DayPattern {
    let mut days: Vec<DayScore> = WEEKDAYS.iter().map(|d| DayScore::empty(*d)).collect();
    let row = |weekday: Weekday| weekday.num_days_from_monday() as usize;

    for block in blocks.iter().filter(|b| b.completed) {
        let day = &mut days[row(range.weekday(block.start))];
        day.focus_minutes = day.focus_minutes.saturating_add(effective_duration(block).max(0));
        day.completed_blocks += 1;
    }

    for task in tasks {
        let anchor = task_anchor_date(task, range);
        if range.contains_date(anchor) {
            days[row(anchor.weekday())].planned_tasks += 1;
        }
        if let Some(completed_at) = task.completed_at.filter(|_| completed_within(task, range)) {
            days[row(range.weekday(completed_at))].completed_tasks += 1;
        }
    }

    for day in &mut days {
        let denominator = if day.planned_tasks > 0 {
            day.planned_tasks
        } else {
            day.completed_tasks
        };
        day.completion_rate = ratio_or(day.completed_tasks as f64, denominator as f64, 0.0);
        let focus_hours = day.focus_minutes as f64 / 60.0;
        day.score =
            focus_hours * 10.0 + day.completed_blocks as f64 * 8.0 + day.completion_rate * 100.0;
    }

    let active: Vec<&DayScore> = days.iter().filter(|d| d.is_active()).collect();

    let strongest = active.iter().copied().reduce(|best, day| {
        if day.score > best.score {
            day
        } else {
            best
        }
    });

    let weakest = if active.len() > 1 {
        active
            .iter()
            .copied()
            .filter(|day| strongest.map_or(true, |s| !std::ptr::eq(*day, s)))
            .reduce(|worst, day| if day.score < worst.score { day } else { worst })
    } else {
        None
    };

    let strongest_day = strongest.map(|d| d.day.clone());
    let weakest_day = weakest.map(|d| d.day.clone());

    DayPattern {
        strongest_day,
        weakest_day,
        days,
    }
}

/// Score every category seen in blocks or tasks, best first.
///
/// Sorting is stable, so equal scores keep first-seen order (blocks before
/// tasks, input order within each).
pub fn compute_category_scores(
    blocks: &[Block],
    tasks: &[Task],
    index: &FeedbackIndex<'_>,
) -> Vec<CategoryScore> {
    #[derive(Default)]
    struct Totals {
        total: usize,
        completed: usize,
        feedback: usize,
        focus_yes: usize,
        feelings: Vec<u8>,
    }

    fn absorb(totals: &mut Totals, completed: bool, entries: &[&CompletionFeedback]) {
        totals.total += 1;
        if completed {
            totals.completed += 1;
        }
        totals.feedback += entries.len();
        totals.focus_yes += entries
            .iter()
            .filter(|f| f.focus == FocusQuality::Yes)
            .count();
        totals.feelings.extend(entries.iter().map(|f| f.feeling.score()));
    }

    let mut by_category: IndexMap<Category, Totals> = IndexMap::new();
    for block in blocks {
        let totals = by_category.entry(block.category).or_default();
        absorb(totals, block.completed, index.for_block(&block.id));
    }
    for task in tasks {
        let totals = by_category.entry(task.category).or_default();
        absorb(totals, task.completed, index.for_task(&task.id));
    }

    let mut scores: Vec<CategoryScore> = by_category
        .into_iter()
        .map(|(category, totals)| {
            let completion_rate = ratio_or(totals.completed as f64, totals.total as f64, 0.0);
            let focus_yes_rate = ratio_or(totals.focus_yes as f64, totals.feedback as f64, 0.0);
            let feeling_sum: f64 = totals.feelings.iter().map(|v| f64::from(*v)).sum();
            let normalized_feeling = if totals.feelings.is_empty() {
                0.5
            } else {
                (feeling_sum / totals.feelings.len() as f64 - 1.0) / 4.0
            };

            CategoryScore {
                category,
                label: category.label().to_string(),
                total: totals.total,
                completed: totals.completed,
                feedback_count: totals.feedback,
                focus_yes_count: totals.focus_yes,
                completion_rate,
                focus_yes_rate,
                normalized_feeling,
                score: completion_rate * 0.45 + focus_yes_rate * 0.35 + normalized_feeling * 0.20,
            }
        })
        .collect();

    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    scores
}

fn top_category_labels(scores: &[CategoryScore]) -> Vec<String> {
    scores
        .iter()
        .take(TOP_CATEGORY_LIMIT)
        .map(|s| s.label.clone())
        .collect()
}

/// Labels of the (up to three) best categories.
pub fn compute_top_categories(
    blocks: &[Block],
    tasks: &[Task],
    feedback: &[CompletionFeedback],
) -> Vec<String> {
    let index = FeedbackIndex::build(feedback);
    top_category_labels(&compute_category_scores(blocks, tasks, &index))
}
