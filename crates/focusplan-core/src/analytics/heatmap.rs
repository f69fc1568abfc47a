//! Focus heatmap.
//!
//! Distributes the focus minutes of completed blocks over a fixed grid of
//! 7 weekdays (Monday first) by 9 two-hour slots spanning 06:00-24:00, so
//! the UI can show when in the week the user actually works.

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::aggregate::{effective_duration, round1};
use crate::model::{Block, RangeBounds};

/// Number of two-hour slots per day.
pub const SLOT_COUNT: usize = 9;
/// Width of a slot in minutes.
pub const SLOT_MINUTES: i64 = 120;
/// Start of the first slot (06:00) in minutes after local midnight.
pub const FIRST_SLOT_MINUTE: i64 = 6 * 60;

/// Short weekday labels, Monday first.
pub const DAY_LABELS: [&str; 7] = ["Lun", "Mar", "Mié", "Jue", "Vie", "Sáb", "Dom"];

/// Format a slot starting `start_minute` after midnight, e.g. "08:00–10:00".
pub fn slot_label(start_minute: i64) -> String {
    let end_minute = start_minute + SLOT_MINUTES;
    format!(
        "{:02}:{:02}–{:02}:{:02}",
        start_minute / 60,
        start_minute % 60,
        end_minute / 60,
        end_minute % 60
    )
}

/// Weekday x slot matrix of focus minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusHeatmap {
    /// Row labels, Monday first
    pub days: Vec<String>,
    /// Column labels
    pub slots: Vec<String>,
    /// `matrix[day][slot]` in minutes
    pub matrix: Vec<Vec<f64>>,
}

/// A single non-empty cell, as reported by [`FocusHeatmap::peak_cells`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    pub day_index: usize,
    pub slot_index: usize,
    pub day: String,
    pub slot: String,
    pub minutes: f64,
}

impl Default for FocusHeatmap {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusHeatmap {
    /// Create an all-zero heatmap with the fixed labels.
    pub fn new() -> Self {
        Self {
            days: DAY_LABELS.iter().map(|d| d.to_string()).collect(),
            slots: (0..SLOT_COUNT)
                .map(|slot| slot_label(slot_start_minute(slot)))
                .collect(),
            matrix: vec![vec![0.0; SLOT_COUNT]; DAY_LABELS.len()],
        }
    }

    /// Minutes in a cell (day 0 = Monday).
    pub fn cell(&self, day: usize, slot: usize) -> Option<f64> {
        self.matrix.get(day).and_then(|row| row.get(slot)).copied()
    }

    /// Total minutes for a weekday.
    pub fn day_total(&self, day: usize) -> f64 {
        self.matrix.get(day).map(|row| row.iter().sum::<f64>()).unwrap_or(0.0)
    }

    /// Total minutes for a slot across all weekdays.
    pub fn slot_total(&self, slot: usize) -> f64 {
        self.matrix
            .iter()
            .filter_map(|row| row.get(slot))
            .sum()
    }

    pub fn total_minutes(&self) -> f64 {
        self.matrix.iter().flatten().sum()
    }

    pub fn max_cell(&self) -> f64 {
        self.matrix.iter().flatten().copied().fold(0.0, f64::max)
    }

    /// Non-empty cells sorted by minutes (descending), at most `limit`.
    pub fn peak_cells(&self, limit: usize) -> Vec<HeatmapCell> {
        let mut cells: Vec<HeatmapCell> = self
            .matrix
            .iter()
            .enumerate()
            .flat_map(|(day_index, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, minutes)| **minutes > 0.0)
                    .map(move |(slot_index, minutes)| (day_index, slot_index, *minutes))
            })
            .map(|(day_index, slot_index, minutes)| HeatmapCell {
                day_index,
                slot_index,
                day: self.days.get(day_index).cloned().unwrap_or_default(),
                slot: self.slots.get(slot_index).cloned().unwrap_or_default(),
                minutes,
            })
            .collect();

        cells.sort_by(|a, b| b.minutes.total_cmp(&a.minutes));
        cells.truncate(limit);
        cells
    }
}

fn slot_start_minute(slot: usize) -> i64 {
    FIRST_SLOT_MINUTE + slot as i64 * SLOT_MINUTES
}

fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 60_000.0
}

/// Build the focus heatmap for completed blocks inside `range`.
///
/// Each block is clamped to the range, then its effective duration is
/// spread over the wall-clock minutes it occupied (scaled by
/// `effective / span`), one local day at a time so blocks crossing
/// midnight land on both days.
pub fn compute_focus_heatmap(blocks: &[Block], range: &RangeBounds) -> FocusHeatmap {
    let mut heatmap = FocusHeatmap::new();

    for block in blocks.iter().filter(|b| b.completed) {
        let effective = effective_duration(block);
        if effective <= 0 {
            continue;
        }

        let start = block.start.max(range.from);
        let end = block.end.min(range.to);
        if end <= start {
            continue;
        }

        let scale = effective as f64 / minutes_between(start, end);

        let mut cursor = start;
        while cursor < end {
            let day = range.local_date(cursor);
            let day_start = range.local_midnight(day);
            let slice_end = end.min(range.local_midnight(day + Duration::days(1)));

            let from_minute = minutes_between(day_start, cursor);
            let to_minute = minutes_between(day_start, slice_end);
            let row = day.weekday().num_days_from_monday() as usize;

            for slot in 0..SLOT_COUNT {
                let slot_start = slot_start_minute(slot) as f64;
                let slot_end = slot_start + SLOT_MINUTES as f64;
                let overlap = to_minute.min(slot_end) - from_minute.max(slot_start);
                if overlap > 0.0 {
                    heatmap.matrix[row][slot] += overlap * scale;
                }
            }

            cursor = slice_end;
        }
    }

    for value in heatmap.matrix.iter_mut().flatten() {
        *value = round1(*value);
    }

    heatmap
}

fn heat_char(minutes: f64, max: f64) -> char {
    if minutes <= 0.0 || max <= 0.0 {
        return ' ';
    }
    let ratio = minutes / max;
    if ratio <= 0.25 {
        '░'
    } else if ratio <= 0.5 {
        '▒'
    } else if ratio <= 0.75 {
        '▓'
    } else {
        '█'
    }
}

/// Render the heatmap for a terminal.
pub fn render_ascii(heatmap: &FocusHeatmap) -> String {
    let mut output = String::new();

    output.push_str("\nFocus Heatmap\n");
    output.push_str(&"=".repeat(60));
    output.push('\n');

    let total = heatmap.total_minutes();
    if total <= 0.0 {
        output.push_str("No focus data available.\n");
        return output;
    }

    output.push_str(&format!("Total focus: {:.0} min\n\n", total));

    // Header row with slot start hours
    output.push_str("     ");
    for slot in 0..SLOT_COUNT {
        output.push_str(&format!("{:>3}", slot_start_minute(slot) / 60));
    }
    output.push('\n');

    let max = heatmap.max_cell();
    for (label, row) in heatmap.days.iter().zip(&heatmap.matrix) {
        output.push_str(&format!("{:<5}", label));
        for minutes in row {
            output.push_str("  ");
            output.push(heat_char(*minutes, max));
        }
        output.push('\n');
    }

    output.push('\n');
    output.push_str(&"=".repeat(60));
    output.push('\n');
    output.push_str("Legend: ░ (≤25%) ▒ (≤50%) ▓ (≤75%) █ (>75%)\n");

    let peaks = heatmap.peak_cells(3);
    if !peaks.is_empty() {
        output.push_str("\nPeak slots:\n");
        for cell in peaks {
            output.push_str(&format!("  {} {} - {:.0} min\n", cell.day, cell.slot, cell.minutes));
        }
    }

    output
}
