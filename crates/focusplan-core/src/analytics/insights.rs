//! Profile insights: the pattern bundle plus a ranked recommendation list.

use serde::{Deserialize, Serialize};

use super::estimation::CategoryBias;
use super::patterns::PatternResults;
use crate::model::AiSettings;

/// Minimum absolute bias (percent) worth a recommendation.
pub const RECOMMENDATION_BIAS_THRESHOLD: f64 = 8.0;

/// A single actionable recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub detail: String,
}

impl Recommendation {
    pub fn new(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
        }
    }
}

/// Insights about the user's profile, ready for the API or the coach prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInsights {
    pub best_focus_slot: Option<String>,
    pub strongest_day: Option<String>,
    pub weakest_day: Option<String>,
    pub top_categories: Vec<String>,
    pub estimation_bias: Vec<CategoryBias>,
    pub recommendations: Vec<Recommendation>,
}

const FALLBACK_RECOMMENDATIONS: [(&str, &str); 5] = [
    (
        "Planifica el día anterior",
        "Dedica cinco minutos al final del día a elegir las tres prioridades de mañana.",
    ),
    (
        "Agrupa tareas similares",
        "Junta las tareas pequeñas del mismo tipo en un solo bloque para reducir cambios de contexto.",
    ),
    (
        "Deja margen entre bloques",
        "Reserva 10-15 minutos entre bloques para absorber retrasos sin romper el plan.",
    ),
    (
        "Registra cómo te fue",
        "Completa el feedback tras cada bloque; con más datos las recomendaciones serán más precisas.",
    ),
    (
        "Protege tus descansos",
        "Programa pausas cortas como bloques propios para sostener el foco durante la semana.",
    ),
];

/// Pattern-driven candidates in priority order.
fn candidate_recommendations(
    patterns: &PatternResults,
    settings: &AiSettings,
) -> Vec<Recommendation> {
    let mut candidates = Vec::new();

    if let Some(slot) = &patterns.best_focus_slot {
        candidates.push(Recommendation::new(
            format!("Protege tu franja {slot}"),
            format!("Es tu franja con más foco de calidad. Reserva {slot} para el trabajo profundo."),
        ));
    }

    if let Some(day) = patterns.strongest_day() {
        candidates.push(Recommendation::new(
            format!("Aprovecha el {day}"),
            format!("El {day} es tu día más productivo; planifica ahí las tareas más exigentes."),
        ));
    }

    if let Some(category) = patterns.top_category() {
        candidates.push(Recommendation::new(
            format!("Apuesta por {category}"),
            format!("{category} es la categoría donde mejor rindes; dale prioridad en tu semana."),
        ));
    }

    if let Some(day) = patterns.weakest_day() {
        candidates.push(Recommendation::new(
            format!("Refuerza el {day}"),
            format!("El {day} rinde menos; prueba con bloques más cortos y objetivos concretos."),
        ));
    }

    if let Some(bias) = patterns
        .estimation_bias
        .first()
        .filter(|b| b.bias_percent.abs() >= RECOMMENDATION_BIAS_THRESHOLD)
    {
        candidates.push(bias_recommendation(bias));
    }

    if !settings.daily_reflection_enabled {
        candidates.push(Recommendation::new(
            "Activa la reflexión diaria",
            "Una reflexión breve al final del día ayuda a ajustar el plan de mañana.",
        ));
    }

    candidates
}

fn bias_recommendation(bias: &CategoryBias) -> Recommendation {
    let magnitude = bias.bias_percent.abs();
    let detail = if bias.is_underestimation() {
        format!(
            "Las tareas de {} suelen durar un {magnitude:.0}% más de lo previsto; planifica con más margen.",
            bias.label
        )
    } else {
        format!(
            "Las tareas de {} suelen terminar un {magnitude:.0}% antes; puedes ajustar su duración.",
            bias.label
        )
    };
    Recommendation::new(format!("Ajusta tus estimaciones de {}", bias.label), detail)
}

/// Top up `items` from `fallback` (skipping titles already present), then
/// truncate to `desired`.
pub(crate) fn fill_and_truncate(
    mut items: Vec<Recommendation>,
    fallback: &[(&str, &str)],
    desired: usize,
) -> Vec<Recommendation> {
    for (title, detail) in fallback {
        if items.len() >= desired {
            break;
        }
        if items.iter().any(|r| r.title == *title) {
            continue;
        }
        items.push(Recommendation::new(*title, *detail));
    }
    items.truncate(desired);
    items
}

/// Package the patterns with a settings-sized recommendation list.
pub fn build_profile_insights(patterns: &PatternResults, settings: &AiSettings) -> ProfileInsights {
    let desired = settings.intervention_level.desired_count();
    let recommendations = fill_and_truncate(
        candidate_recommendations(patterns, settings),
        &FALLBACK_RECOMMENDATIONS,
        desired,
    );

    ProfileInsights {
        best_focus_slot: patterns.best_focus_slot.clone(),
        strongest_day: patterns.day_pattern.strongest_day.clone(),
        weakest_day: patterns.day_pattern.weakest_day.clone(),
        top_categories: patterns.top_categories.clone(),
        estimation_bias: patterns.estimation_bias.clone(),
        recommendations,
    }
}
