//! The full result bundle returned to callers.

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use super::heatmap::{compute_focus_heatmap, FocusHeatmap};
use super::insights::{build_profile_insights, ProfileInsights};
use super::metrics::{compute_daily_trend, compute_extended_metrics, ExtendedMetrics, TrendPoint};
use super::patterns::detect_patterns;
use super::summary::{build_weekly_summary, WeeklySummary};
use crate::model::{AiSettings, AnalyticsInput, RangeBounds};

/// Everything the engine derives for one user and one range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub profile_insights: ProfileInsights,
    pub weekly_summary: WeeklySummary,
    pub focus_heatmap: FocusHeatmap,
    pub extended_metrics: ExtendedMetrics,
    pub trend: Vec<TrendPoint>,
}

/// Run the whole pipeline once.
pub fn analyze(input: &AnalyticsInput, range: &RangeBounds, settings: &AiSettings) -> AnalyticsReport {
    let _span = debug_span!("analyze", from = %range.from, to = %range.to).entered();
    debug!(
        blocks = input.blocks.len(),
        tasks = input.tasks.len(),
        check_ins = input.check_ins.len(),
        feedback = input.feedback.len(),
        "running analytics pipeline"
    );

    let patterns = detect_patterns(&input.blocks, &input.tasks, &input.feedback, range);
    debug!(
        best_slot = ?patterns.best_focus_slot,
        strongest = ?patterns.day_pattern.strongest_day,
        categories = patterns.category_scores.len(),
        "patterns detected"
    );

    let report = AnalyticsReport {
        profile_insights: build_profile_insights(&patterns, settings),
        weekly_summary: build_weekly_summary(
            &input.blocks,
            &input.tasks,
            &input.feedback,
            range,
            &patterns,
            settings,
        ),
        focus_heatmap: compute_focus_heatmap(&input.blocks, range),
        extended_metrics: compute_extended_metrics(
            &input.blocks,
            &input.check_ins,
            &input.feedback,
            range,
        ),
        trend: compute_daily_trend(&input.blocks, &input.tasks, range),
    };

    debug!(
        recommendations = report.profile_insights.recommendations.len(),
        suggestions = report.weekly_summary.suggestions.len(),
        "analytics report ready"
    );
    report
}
