//! Input records for the analytics engine.
//!
//! These are immutable value records handed over by the external store
//! (calendar blocks, tasks, daily check-ins and post-activity feedback),
//! plus the per-user AI settings and the query range. Every type decodes
//! from the store's camelCase JSON.
//!
//! Free-form enum values are decoded leniently: unknown or missing feeling,
//! focus and time-comparison values become `neutral`, `partial` and `equal`,
//! unknown categories become `other`. The engine relies on that contract and
//! never sees an unrecognized value.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Utc, Weekday,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Result, ValidationError};

/// Activity category shared by blocks and tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Category {
    Study,
    Work,
    Creative,
    Health,
    Personal,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Study,
        Category::Work,
        Category::Creative,
        Category::Health,
        Category::Personal,
        Category::Other,
    ];

    /// Lenient parse; anything unrecognized is `Other`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "study" => Category::Study,
            "work" => Category::Work,
            "creative" => Category::Creative,
            "health" => Category::Health,
            "personal" => Category::Personal,
            _ => Category::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Study => "study",
            Category::Work => "work",
            Category::Creative => "creative",
            Category::Health => "health",
            Category::Personal => "personal",
            Category::Other => "other",
        }
    }

    /// User-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Study => "Estudio",
            Category::Work => "Trabajo",
            Category::Creative => "Creatividad",
            Category::Health => "Salud",
            Category::Personal => "Personal",
            Category::Other => "Otros",
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::parse(&value)
    }
}

/// How the user felt after an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Feeling {
    Excellent,
    Good,
    #[default]
    Neutral,
    Tired,
    Frustrated,
}

impl Feeling {
    pub const ALL: [Feeling; 5] = [
        Feeling::Excellent,
        Feeling::Good,
        Feeling::Neutral,
        Feeling::Tired,
        Feeling::Frustrated,
    ];

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "excellent" => Feeling::Excellent,
            "good" => Feeling::Good,
            "tired" => Feeling::Tired,
            "frustrated" => Feeling::Frustrated,
            _ => Feeling::Neutral,
        }
    }

    /// Numeric mapping on a 1..=5 scale.
    pub fn score(&self) -> u8 {
        match self {
            Feeling::Excellent => 5,
            Feeling::Good => 4,
            Feeling::Neutral => 3,
            Feeling::Tired => 2,
            Feeling::Frustrated => 1,
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Feeling::Excellent | Feeling::Good)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Feeling::Excellent => "excellent",
            Feeling::Good => "good",
            Feeling::Neutral => "neutral",
            Feeling::Tired => "tired",
            Feeling::Frustrated => "frustrated",
        }
    }
}

impl From<String> for Feeling {
    fn from(value: String) -> Self {
        Feeling::parse(&value)
    }
}

/// Self-reported focus quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum FocusQuality {
    Yes,
    #[default]
    Partial,
    No,
}

impl FocusQuality {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" => FocusQuality::Yes,
            "no" => FocusQuality::No,
            _ => FocusQuality::Partial,
        }
    }
}

impl From<String> for FocusQuality {
    fn from(value: String) -> Self {
        FocusQuality::parse(&value)
    }
}

/// Actual time spent compared to the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum TimeComparison {
    /// Took more time than planned.
    More,
    #[default]
    Equal,
    /// Took less time than planned.
    Less,
}

impl TimeComparison {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "more" => TimeComparison::More,
            "less" => TimeComparison::Less,
            _ => TimeComparison::Equal,
        }
    }
}

impl From<String> for TimeComparison {
    fn from(value: String) -> Self {
        TimeComparison::parse(&value)
    }
}

/// How many recommendations and suggestions the user wants to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum InterventionLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl InterventionLevel {
    /// Number of recommendations produced for this level.
    pub fn desired_count(&self) -> usize {
        match self {
            InterventionLevel::Low => 3,
            InterventionLevel::Medium => 4,
            InterventionLevel::High => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InterventionLevel::Low => "low",
            InterventionLevel::Medium => "medium",
            InterventionLevel::High => "high",
        }
    }
}

impl From<String> for InterventionLevel {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for InterventionLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(InterventionLevel::Low),
            "medium" => Ok(InterventionLevel::Medium),
            "high" => Ok(InterventionLevel::High),
            other => Err(ValidationError::InvalidValue {
                field: "intervention_level".to_string(),
                message: format!("expected low, medium or high, got '{other}'"),
            }),
        }
    }
}

impl std::fmt::Display for InterventionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A planned time interval on the calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    #[serde(default)]
    pub owner_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub planned_duration_minutes: i64,
    /// Recorded only when it differs from the wall-clock span.
    #[serde(default)]
    pub actual_duration_minutes: Option<i64>,
    #[serde(default)]
    pub completed: bool,
}

/// A to-do item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub completed: bool,
}

/// Daily presence marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    #[serde(default)]
    pub owner_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
}

/// Post-activity survey, tied to at most one block or one task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionFeedback {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub block_id: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
    pub completed_at: DateTime<Utc>,
    #[serde(default)]
    pub feeling: Feeling,
    #[serde(default)]
    pub focus: FocusQuality,
    #[serde(default)]
    pub interrupted: bool,
    #[serde(default)]
    pub interruption_cause: Option<String>,
    #[serde(default)]
    pub time_comparison: TimeComparison,
    #[serde(default)]
    pub note: Option<String>,
}

/// What a feedback entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTarget<'a> {
    Block(&'a str),
    Task(&'a str),
    Unattached,
}

impl CompletionFeedback {
    /// The single owner of this entry. A block reference wins if a
    /// malformed record carries both.
    pub fn target(&self) -> FeedbackTarget<'_> {
        match (self.block_id.as_deref(), self.task_id.as_deref()) {
            (Some(block_id), _) => FeedbackTarget::Block(block_id),
            (None, Some(task_id)) => FeedbackTarget::Task(task_id),
            (None, None) => FeedbackTarget::Unattached,
        }
    }

    /// Focused and felt good about it.
    pub fn is_positive_focus(&self) -> bool {
        self.focus == FocusQuality::Yes && self.feeling.is_positive()
    }
}

/// Per-user tuning for the recommendation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiSettings {
    /// Cosmetic; consumed by the text-generation step, not by the engine.
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default)]
    pub intervention_level: InterventionLevel,
    #[serde(default = "default_true")]
    pub daily_reflection_enabled: bool,
}

fn default_tone() -> String {
    "friendly".into()
}
fn default_true() -> bool {
    true
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            tone: default_tone(),
            intervention_level: InterventionLevel::default(),
            daily_reflection_enabled: true,
        }
    }
}

/// Inclusive `[from, to]` query window plus the user's UTC offset.
///
/// All "local" notions (start-of-day minute, weekday, calendar date) are
/// computed in `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeBounds {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub offset: FixedOffset,
}

impl RangeBounds {
    /// Create a UTC range. Fails when `to` precedes `from`.
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self, ValidationError> {
        if to < from {
            return Err(ValidationError::InvalidTimeRange { from, to });
        }
        Ok(Self {
            from,
            to,
            offset: utc_offset(),
        })
    }

    /// Whole local days from `start` 00:00 through the end of `end`.
    pub fn for_local_dates(
        start: NaiveDate,
        end: NaiveDate,
        offset: FixedOffset,
    ) -> Result<Self, ValidationError> {
        let from = checked_local_midnight(start, offset)?;
        let to = checked_local_midnight(shift_date(end, 1)?, offset)? - Duration::milliseconds(1);
        Ok(Self::new(from, to)?.with_offset(offset))
    }

    /// The trailing `days` local days ending with the day of `now`.
    ///
    /// Fails when the window reaches past the representable calendar.
    pub fn last_days(
        days: u32,
        now: DateTime<Utc>,
        offset: FixedOffset,
    ) -> Result<Self, ValidationError> {
        let end = now.with_timezone(&offset).date_naive();
        let start = shift_date(end, 1 - i64::from(days.max(1)))?;
        Self::for_local_dates(start, end, offset)
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Set the offset from minutes east of UTC.
    pub fn with_offset_minutes(self, minutes: i32) -> Result<Self, ValidationError> {
        Ok(self.with_offset(offset_from_minutes(minutes)?))
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.from && instant <= self.to
    }

    pub fn local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset)
    }

    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.local(instant).date_naive()
    }

    pub fn weekday(&self, instant: DateTime<Utc>) -> Weekday {
        self.local(instant).weekday()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.local_date(self.from)
    }

    pub fn last_date(&self) -> NaiveDate {
        self.local_date(self.to)
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.first_date() && date <= self.last_date()
    }

    /// Every local calendar date touched by the range, in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let last = self.last_date();
        self.first_date().iter_days().take_while(move |d| *d <= last)
    }

    /// UTC instant of local midnight on `date`.
    pub fn local_midnight(&self, date: NaiveDate) -> DateTime<Utc> {
        local_midnight(date, self.offset)
    }
}

pub(crate) fn utc_offset() -> FixedOffset {
    Utc.fix()
}

/// Build a `FixedOffset` from minutes east of UTC.
pub fn offset_from_minutes(minutes: i32) -> Result<FixedOffset, ValidationError> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or(ValidationError::InvalidOffset { minutes })
}

/// `date` moved by `days` calendar days.
pub fn shift_date(date: NaiveDate, days: i64) -> Result<NaiveDate, ValidationError> {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or_else(|| ValidationError::InvalidValue {
            field: "range".to_string(),
            message: format!("{date} shifted by {days} days is out of range"),
        })
}

fn checked_local_midnight(
    date: NaiveDate,
    offset: FixedOffset,
) -> Result<DateTime<Utc>, ValidationError> {
    NaiveDateTime::new(date, NaiveTime::MIN)
        .checked_sub_signed(Duration::seconds(i64::from(offset.local_minus_utc())))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| ValidationError::InvalidValue {
            field: "range".to_string(),
            message: format!("local midnight of {date} is out of range"),
        })
}

fn local_midnight(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let naive = NaiveDateTime::new(date, NaiveTime::MIN)
        - Duration::seconds(i64::from(offset.local_minus_utc()));
    Utc.from_utc_datetime(&naive)
}

/// Spanish weekday name, Monday first.
pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Lunes",
        Weekday::Tue => "Martes",
        Weekday::Wed => "Miércoles",
        Weekday::Thu => "Jueves",
        Weekday::Fri => "Viernes",
        Weekday::Sat => "Sábado",
        Weekday::Sun => "Domingo",
    }
}

/// Monday-first weekday order.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// The four flat collections the caller hands to the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsInput {
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub check_ins: Vec<CheckIn>,
    #[serde(default)]
    pub feedback: Vec<CompletionFeedback>,
}

impl AnalyticsInput {
    /// Parse an export produced by the store.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse an export from disk.
    pub fn from_json_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
