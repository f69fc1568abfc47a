//! Behavioral analytics engine.
//!
//! A pure pipeline over a user's calendar history:
//! aggregation helpers feed the pattern detector, whose [`PatternResults`]
//! drive both the profile insights and the weekly summary. The focus heatmap,
//! extended metrics and trend series are computed independently from the
//! raw collections. No stage keeps state between calls.

pub mod aggregate;
pub mod estimation;
pub mod heatmap;
pub mod insights;
pub mod metrics;
pub mod patterns;
pub mod report;
pub mod summary;

pub use aggregate::{effective_duration, task_anchor_date, FeedbackIndex};
pub use estimation::{compute_time_estimation_bias, CategoryBias, EstimateDelta};
pub use heatmap::{compute_focus_heatmap, render_ascii, FocusHeatmap, HeatmapCell};
pub use insights::{build_profile_insights, ProfileInsights, Recommendation};
pub use metrics::{
    compute_daily_trend, compute_extended_metrics, ExtendedMetrics, FeelingCount, TrendPoint,
};
pub use patterns::{
    compute_best_focus_slot, compute_category_scores, compute_slot_scores,
    compute_strongest_and_weakest_day, compute_top_categories, detect_patterns, CategoryScore,
    DayPattern, DayScore, PatternResults, SlotScore,
};
pub use report::{analyze, AnalyticsReport};
pub use summary::{build_weekly_summary, top_interruption_cause, WeeklySummary};
