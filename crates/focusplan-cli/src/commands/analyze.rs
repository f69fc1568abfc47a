use chrono::{NaiveDate, Utc};
use clap::Args;
use focusplan_core::analytics::heatmap::render_ascii;
use focusplan_core::model::shift_date;
use focusplan_core::{
    analyze, AiSettings, AnalyticsInput, AnalyticsReport, Config, InterventionLevel, RangeBounds,
};
use std::path::PathBuf;
use tracing::debug;

#[derive(Args)]
pub struct ReportArgs {
    /// JSON export with blocks, tasks, checkIns and feedback
    #[arg(long)]
    input: PathBuf,
    /// First local date of the range (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last local date of the range (YYYY-MM-DD, inclusive)
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Range length in days (defaults to analysis.default_range_days)
    #[arg(long)]
    days: Option<u32>,
    /// Override the configured intervention level (low, medium, high)
    #[arg(long)]
    level: Option<InterventionLevel>,
}

impl ReportArgs {
    fn range(&self, config: &Config) -> Result<RangeBounds, Box<dyn std::error::Error>> {
        let offset = config.offset()?;
        let days = self.days.unwrap_or(config.analysis.default_range_days).max(1);
        let span = i64::from(days) - 1;

        let range = match (self.from, self.to) {
            (Some(from), Some(to)) => RangeBounds::for_local_dates(from, to, offset)?,
            (Some(from), None) => RangeBounds::for_local_dates(from, shift_date(from, span)?, offset)?,
            (None, Some(to)) => RangeBounds::for_local_dates(shift_date(to, -span)?, to, offset)?,
            (None, None) => RangeBounds::last_days(days, Utc::now(), offset)?,
        };
        Ok(range)
    }

    fn settings(&self, config: &Config) -> AiSettings {
        let mut settings = config.ai.clone();
        if let Some(level) = self.level {
            settings.intervention_level = level;
        }
        settings
    }
}

fn build_report(args: &ReportArgs) -> Result<AnalyticsReport, Box<dyn std::error::Error>> {
    let config = Config::load();
    let range = args.range(&config)?;
    let input = AnalyticsInput::from_json_file(&args.input)?;
    debug!(
        input = %args.input.display(),
        from = %range.first_date(),
        to = %range.last_date(),
        "loaded analytics input"
    );
    Ok(analyze(&input, &range, &args.settings(&config)))
}

pub fn run_report(args: ReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let report = build_report(&args)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub fn run_heatmap(args: ReportArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let report = build_report(&args)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report.focus_heatmap)?);
    } else {
        print!("{}", render_ascii(&report.focus_heatmap));
    }
    Ok(())
}

pub fn run_insights(args: ReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let report = build_report(&args)?;
    println!("{}", serde_json::to_string_pretty(&report.profile_insights)?);
    Ok(())
}

pub fn run_summary(args: ReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let report = build_report(&args)?;
    println!("{}", serde_json::to_string_pretty(&report.weekly_summary)?);
    Ok(())
}
