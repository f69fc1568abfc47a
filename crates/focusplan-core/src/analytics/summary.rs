//! Weekly narrative summary: totals, a highlight, an optional lowlight and
//! a settings-sized list of suggestions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::aggregate::{completed_within, effective_duration, ratio_or, round1, task_anchor_date};
use super::insights::{fill_and_truncate, Recommendation, RECOMMENDATION_BIAS_THRESHOLD};
use super::patterns::PatternResults;
use crate::model::{AiSettings, Block, CompletionFeedback, RangeBounds, Task};

/// Minimum absolute bias (percent) reported as a lowlight.
pub const LOWLIGHT_BIAS_THRESHOLD: f64 = 15.0;
/// Suggestions never drop below this many entries.
const MIN_SUGGESTIONS: usize = 2;
/// Interruption cause used when feedback does not name one.
const DEFAULT_INTERRUPTION_CAUSE: &str = "other";

/// Summary of the week for the user and for the coach prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    pub range_label: String,
    pub total_focus_minutes: i64,
    pub focus_block_count: usize,
    pub completed_tasks: usize,
    pub planned_tasks: usize,
    /// Percent, one decimal
    pub completion_rate: f64,
    pub highlight: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lowlight: Option<String>,
    pub suggestions: Vec<String>,
}

const FALLBACK_SUGGESTIONS: [(&str, &str); 5] = [
    (
        "Elige tres prioridades",
        "Elige tres prioridades para la próxima semana y agéndalas primero.",
    ),
    (
        "Revisa la semana",
        "Reserva 15 minutos el domingo para revisar qué funcionó y qué no.",
    ),
    (
        "Bloques de 90 minutos",
        "Prueba bloques de foco de 90 minutos con una pausa corta al terminar.",
    ),
    (
        "Registra el feedback",
        "Completa el feedback tras cada bloque para afinar tus patrones.",
    ),
    (
        "Deja huecos libres",
        "Deja al menos un hueco libre al día para imprevistos.",
    ),
];

/// Most frequent interruption cause among interrupted feedback entries.
///
/// Unnamed causes count as `"other"`; ties go to the cause seen first.
pub fn top_interruption_cause(feedback: &[CompletionFeedback]) -> Option<String> {
    let mut tally: IndexMap<&str, usize> = IndexMap::new();
    for entry in feedback.iter().filter(|f| f.interrupted) {
        let cause = entry
            .interruption_cause
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_INTERRUPTION_CAUSE);
        *tally.entry(cause).or_default() += 1;
    }

    tally
        .into_iter()
        .reduce(|best, entry| if entry.1 > best.1 { entry } else { best })
        .map(|(cause, _)| cause.to_string())
}

fn range_label(range: &RangeBounds) -> String {
    format!(
        "{} – {}",
        range.first_date().format("%d/%m/%Y"),
        range.last_date().format("%d/%m/%Y")
    )
}

fn select_highlight(patterns: &PatternResults) -> String {
    if let Some(slot) = &patterns.best_focus_slot {
        format!("Tu mejor franja de foco fue {slot}.")
    } else if let Some(category) = patterns.top_category() {
        format!("{category} fue tu categoría más sólida.")
    } else if let Some(day) = patterns.strongest_day() {
        format!("El {day} fue tu día más productivo.")
    } else {
        "Progreso constante: cada bloque completado suma.".to_string()
    }
}

fn select_lowlight(patterns: &PatternResults, interruption_cause: Option<&str>) -> Option<String> {
    if let Some(day) = patterns.weakest_day() {
        return Some(format!("El {day} fue tu día con menos avance."));
    }
    if let Some(cause) = interruption_cause {
        return Some(format!("La interrupción más frecuente fue: {cause}."));
    }
    patterns
        .estimation_bias
        .iter()
        .find(|b| b.bias_percent.abs() >= LOWLIGHT_BIAS_THRESHOLD)
        .map(|bias| {
            if bias.is_underestimation() {
                format!(
                    "{} tomó un {:.0}% más de lo planificado.",
                    bias.label,
                    bias.bias_percent.abs()
                )
            } else {
                format!(
                    "{} tomó un {:.0}% menos de lo planificado.",
                    bias.label,
                    bias.bias_percent.abs()
                )
            }
        })
}

fn candidate_suggestions(
    patterns: &PatternResults,
    settings: &AiSettings,
    interruption_cause: Option<&str>,
    completion_rate: f64,
    planned_tasks: usize,
) -> Vec<Recommendation> {
    let mut candidates = Vec::new();

    if let Some(slot) = &patterns.best_focus_slot {
        candidates.push(Recommendation::new(
            "Reserva tu mejor franja",
            format!("Reserva {slot} para tu tarea más exigente de cada día."),
        ));
    }
    if let Some(day) = patterns.weakest_day() {
        candidates.push(Recommendation::new(
            "Aligera tu día más flojo",
            format!("Aligera la agenda del {day} y fija un solo objetivo claro."),
        ));
    }
    if let Some(cause) = interruption_cause {
        candidates.push(Recommendation::new(
            "Reduce interrupciones",
            format!("Busca una forma de reducir las interrupciones por {cause} durante tus bloques."),
        ));
    }
    if let Some(bias) = patterns
        .estimation_bias
        .first()
        .filter(|b| b.bias_percent.abs() >= RECOMMENDATION_BIAS_THRESHOLD)
    {
        let verb = if bias.is_underestimation() { "Añade" } else { "Quita" };
        candidates.push(Recommendation::new(
            "Ajusta tus estimaciones",
            format!(
                "{verb} un {:.0}% al tiempo planificado para {}.",
                bias.bias_percent.abs(),
                bias.label
            ),
        ));
    }
    if planned_tasks > 0 && completion_rate < 50.0 {
        candidates.push(Recommendation::new(
            "Planifica menos tareas",
            "Completaste menos de la mitad de lo planificado; reduce la lista y prioriza.",
        ));
    }
    if !settings.daily_reflection_enabled {
        candidates.push(Recommendation::new(
            "Activa la reflexión diaria",
            "Activa la reflexión diaria para cerrar cada jornada con intención.",
        ));
    }

    candidates
}

/// Build the weekly summary.
///
/// Block totals use the collections as given; task completion is limited
/// to `range`.
pub fn build_weekly_summary(
    blocks: &[Block],
    tasks: &[Task],
    feedback: &[CompletionFeedback],
    range: &RangeBounds,
    patterns: &PatternResults,
    settings: &AiSettings,
) -> WeeklySummary {
    let completed_blocks: Vec<&Block> = blocks.iter().filter(|b| b.completed).collect();
    let total_focus_minutes: i64 = completed_blocks
        .iter()
        .map(|b| effective_duration(b).max(0))
        .fold(0i64, i64::saturating_add);

    let completed_tasks = tasks.iter().filter(|t| completed_within(t, range)).count();
    let planned_tasks = tasks
        .iter()
        .filter(|t| range.contains_date(task_anchor_date(t, range)))
        .count();
    let completion_rate = round1(ratio_or(completed_tasks as f64, planned_tasks as f64, 0.0) * 100.0);

    let interruption_cause = top_interruption_cause(feedback);

    let desired = settings
        .intervention_level
        .desired_count()
        .max(MIN_SUGGESTIONS);
    let suggestions: Vec<String> = fill_and_truncate(
        candidate_suggestions(
            patterns,
            settings,
            interruption_cause.as_deref(),
            completion_rate,
            planned_tasks,
        ),
        &FALLBACK_SUGGESTIONS,
        desired,
    )
    .into_iter()
    .map(|s| s.detail)
    .collect();

    WeeklySummary {
        range_label: range_label(range),
        total_focus_minutes,
        focus_block_count: completed_blocks.len(),
        completed_tasks,
        planned_tasks,
        completion_rate,
        highlight: select_highlight(patterns),
        lowlight: select_lowlight(patterns, interruption_cause.as_deref()),
        suggestions,
    }
}
