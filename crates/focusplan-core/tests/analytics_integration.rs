//! Integration tests for the analytics pipeline.
//!
//! This test file verifies:
//! - The single-block week scenario end to end
//! - Local-offset handling for heatmap and day patterns
//! - Decoding a store export and serializing the report bundle
//! - Graceful degradation on sparse data

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use focusplan_core::analytics::heatmap::render_ascii;
use focusplan_core::{
    analyze, detect_patterns, AiSettings, AnalyticsInput, Block, Category, CompletionFeedback,
    Feeling, FocusQuality, InterventionLevel, RangeBounds, Task, TimeComparison,
};

fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, minute, 0).unwrap()
}

/// Monday 2026-03-02 through Sunday 2026-03-08, UTC.
fn week() -> RangeBounds {
    RangeBounds::for_local_dates(
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        NaiveDate::from_ymd_opt(2026, 3, 8).unwrap(),
        FixedOffset::east_opt(0).unwrap(),
    )
    .unwrap()
}

fn block(id: &str, start: DateTime<Utc>, minutes: i64, category: Category) -> Block {
    Block {
        id: id.to_string(),
        owner_id: "u1".to_string(),
        start,
        end: start + Duration::minutes(minutes),
        category,
        planned_duration_minutes: minutes,
        actual_duration_minutes: None,
        completed: true,
    }
}

fn block_feedback(block_id: &str, feeling: Feeling, focus: FocusQuality) -> CompletionFeedback {
    CompletionFeedback {
        id: format!("f-{block_id}"),
        block_id: Some(block_id.to_string()),
        task_id: None,
        completed_at: at(2, 10, 0),
        feeling,
        focus,
        interrupted: false,
        interruption_cause: None,
        time_comparison: TimeComparison::Equal,
        note: None,
    }
}

#[test]
fn test_single_block_week() {
    let input = AnalyticsInput {
        blocks: vec![block("b1", at(2, 8, 0), 120, Category::Work)],
        feedback: vec![block_feedback("b1", Feeling::Good, FocusQuality::Yes)],
        ..AnalyticsInput::default()
    };

    let report = analyze(&input, &week(), &AiSettings::default());

    // Monday, 08:00-10:00 slot
    assert_eq!(report.focus_heatmap.cell(0, 1), Some(120.0));
    assert_eq!(report.focus_heatmap.total_minutes(), 120.0);

    let insights = &report.profile_insights;
    assert_eq!(insights.best_focus_slot.as_deref(), Some("08:00–10:00"));
    assert_eq!(insights.strongest_day.as_deref(), Some("Lunes"));
    assert_eq!(insights.weakest_day, None);
    assert_eq!(insights.top_categories, vec!["Trabajo".to_string()]);
    assert!(insights.estimation_bias.is_empty());
    assert_eq!(insights.recommendations.len(), 4);
    assert_eq!(insights.recommendations[0].title, "Protege tu franja 08:00–10:00");

    let summary = &report.weekly_summary;
    assert_eq!(summary.range_label, "02/03/2026 – 08/03/2026");
    assert_eq!(summary.total_focus_minutes, 120);
    assert_eq!(summary.focus_block_count, 1);
    assert_eq!(summary.completion_rate, 0.0);
    assert_eq!(summary.highlight, "Tu mejor franja de foco fue 08:00–10:00.");
    assert_eq!(summary.lowlight, None);
    assert_eq!(summary.suggestions.len(), 4);

    assert_eq!(report.trend.len(), 7);
    assert_eq!(report.trend[0].focus_minutes, 120);
}

#[test]
fn test_offset_moves_blocks_across_days() {
    // 23:00 UTC Sunday is 01:00 Monday at UTC+2.
    let blocks = vec![block("late", at(1, 23, 0), 60, Category::Study)];
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    let range = RangeBounds::for_local_dates(
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        NaiveDate::from_ymd_opt(2026, 3, 8).unwrap(),
        offset,
    )
    .unwrap();

    let patterns = detect_patterns(&blocks, &[], &[], &range);
    assert_eq!(patterns.strongest_day(), Some("Lunes"));
    assert_eq!(patterns.best_focus_slot.as_deref(), Some("00:00–02:00"));

    // 01:00-02:00 local is before the first heatmap slot.
    let report = analyze(
        &AnalyticsInput {
            blocks,
            ..AnalyticsInput::default()
        },
        &range,
        &AiSettings::default(),
    );
    assert_eq!(report.focus_heatmap.total_minutes(), 0.0);
}

#[test]
fn test_strongest_and_weakest_with_tasks() {
    let blocks = vec![
        block("mon", at(2, 9, 0), 180, Category::Work),
        block("wed", at(4, 9, 0), 30, Category::Work),
    ];
    let tasks = vec![
        Task {
            id: "t1".to_string(),
            owner_id: "u1".to_string(),
            created_at: at(1, 9, 0),
            due_date: NaiveDate::from_ymd_opt(2026, 3, 4),
            completed_at: None,
            category: Category::Work,
            completed: false,
        },
        Task {
            id: "t2".to_string(),
            owner_id: "u1".to_string(),
            created_at: at(2, 9, 0),
            due_date: None,
            completed_at: Some(at(2, 18, 0)),
            category: Category::Work,
            completed: true,
        },
    ];

    let report = analyze(
        &AnalyticsInput {
            blocks,
            tasks,
            ..AnalyticsInput::default()
        },
        &week(),
        &AiSettings {
            intervention_level: InterventionLevel::High,
            ..AiSettings::default()
        },
    );

    assert_eq!(report.profile_insights.strongest_day.as_deref(), Some("Lunes"));
    assert_eq!(report.profile_insights.weakest_day.as_deref(), Some("Miércoles"));
    assert_eq!(
        report.weekly_summary.lowlight.as_deref(),
        Some("El Miércoles fue tu día con menos avance.")
    );
    assert_eq!(report.weekly_summary.planned_tasks, 2);
    assert_eq!(report.weekly_summary.completed_tasks, 1);
    assert_eq!(report.weekly_summary.completion_rate, 50.0);
    assert_eq!(report.profile_insights.recommendations.len(), 5);
}

#[test]
fn test_json_export_end_to_end() {
    let json = r#"{
        "blocks": [
            {
                "id": "b1",
                "ownerId": "u1",
                "start": "2026-03-03T10:00:00Z",
                "end": "2026-03-03T11:00:00Z",
                "category": "study",
                "plannedDurationMinutes": 60,
                "actualDurationMinutes": 75,
                "completed": true
            },
            {
                "id": "b2",
                "ownerId": "u1",
                "start": "2026-03-05T15:00:00Z",
                "end": "2026-03-05T16:00:00Z",
                "category": "gardening",
                "plannedDurationMinutes": 60,
                "completed": true
            }
        ],
        "checkIns": [{ "ownerId": "u1", "date": "2026-03-03", "completed": true }],
        "feedback": [
            {
                "id": "f1",
                "blockId": "b2",
                "completedAt": "2026-03-05T16:00:00Z",
                "feeling": "ecstatic",
                "focus": "yes",
                "interrupted": true,
                "interruptionCause": "phone",
                "timeComparison": "more"
            }
        ]
    }"#;

    let input = AnalyticsInput::from_json(json).unwrap();
    assert_eq!(input.blocks[1].category, Category::Other);
    assert_eq!(input.feedback[0].feeling, Feeling::Neutral);

    let report = analyze(&input, &week(), &AiSettings::default());
    let bias = &report.profile_insights.estimation_bias;
    assert_eq!(bias.len(), 2);
    assert_eq!(bias[0].bias_percent, 25.0);
    assert_eq!(bias[1].bias_percent, 15.0);
    // Weakest day outranks the interruption cause for the lowlight.
    assert_eq!(
        report.weekly_summary.lowlight.as_deref(),
        Some("El Jueves fue tu día con menos avance.")
    );
    assert!(report
        .weekly_summary
        .suggestions
        .iter()
        .any(|s| s.contains("interrupciones por phone")));
    assert_eq!(report.extended_metrics.check_in_days, 1);
    assert_eq!(report.extended_metrics.interruption_rate, 100.0);

    let value = serde_json::to_value(&report).unwrap();
    for key in [
        "profileInsights",
        "weeklySummary",
        "focusHeatmap",
        "extendedMetrics",
        "trend",
    ] {
        assert!(value.get(key).is_some(), "missing key {key}");
    }
    assert_eq!(
        value["weeklySummary"]["totalFocusMinutes"],
        serde_json::json!(135)
    );
}

#[test]
fn test_huge_durations_saturate() {
    let huge = i64::MAX / 2 + 1;
    let mut first = block("a", at(2, 8, 0), 120, Category::Work);
    let mut second = block("b", at(2, 8, 30), 60, Category::Work);
    first.planned_duration_minutes = huge;
    second.planned_duration_minutes = huge;

    let report = analyze(
        &AnalyticsInput {
            blocks: vec![first, second],
            ..AnalyticsInput::default()
        },
        &week(),
        &AiSettings::default(),
    );

    assert_eq!(report.weekly_summary.total_focus_minutes, i64::MAX);
    assert_eq!(report.trend[0].focus_minutes, i64::MAX);
    assert_eq!(report.profile_insights.best_focus_slot.as_deref(), Some("08:00–10:00"));
    assert_eq!(report.profile_insights.strongest_day.as_deref(), Some("Lunes"));
    assert!(report.extended_metrics.average_block_minutes > 0.0);
}

#[test]
fn test_empty_input_degrades_gracefully() {
    let report = analyze(&AnalyticsInput::default(), &week(), &AiSettings::default());

    assert_eq!(report.profile_insights.best_focus_slot, None);
    assert_eq!(report.profile_insights.strongest_day, None);
    assert!(report.profile_insights.top_categories.is_empty());
    assert_eq!(report.profile_insights.recommendations.len(), 4);
    assert_eq!(
        report.weekly_summary.highlight,
        "Progreso constante: cada bloque completado suma."
    );
    assert_eq!(report.weekly_summary.suggestions.len(), 4);
    assert!(render_ascii(&report.focus_heatmap).contains("No focus data available."));
}
