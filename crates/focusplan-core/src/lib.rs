//! # Focusplan Core Library
//!
//! This library provides the behavioral analytics behind Focusplan's weekly
//! coaching. Given a user's calendar blocks, tasks, daily check-ins and
//! post-activity feedback for a time range, it derives where and when the user
//! focuses best and turns that into recommendations and a weekly summary.
//!
//! ## Architecture
//!
//! - **Model**: Immutable input records with lenient decoding of free-form values
//! - **Analytics**: A stateless pipeline (aggregation, pattern detection,
//!   insights, weekly summary, heatmap, extended metrics)
//! - **Storage**: TOML-based configuration for AI settings and analysis defaults
//!
//! ## Key Components
//!
//! - [`analyze`]: Runs the whole pipeline and returns an [`AnalyticsReport`]
//! - [`detect_patterns`]: Best slot, strongest/weakest day, top categories, bias
//! - [`RangeBounds`]: Inclusive query window plus the user's UTC offset
//! - [`Config`]: Application configuration management

pub mod analytics;
pub mod error;
pub mod model;
pub mod storage;

pub use analytics::{
    analyze, build_profile_insights, build_weekly_summary, compute_focus_heatmap, detect_patterns,
    AnalyticsReport, FocusHeatmap, PatternResults, ProfileInsights, Recommendation, WeeklySummary,
};
pub use error::{ConfigError, CoreError, ValidationError};
pub use model::{
    AiSettings, AnalyticsInput, Block, Category, CheckIn, CompletionFeedback, Feeling,
    FocusQuality, InterventionLevel, RangeBounds, Task, TimeComparison,
};
pub use storage::{AnalysisConfig, Config};
