//! `drift diff` command

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};

use super::app::ReportFormat;
use super::output::Output;
use crate::domain::compare_states;
use crate::report::{
    parse_human_range, Formatter, MarkdownFormatter, PlainTableFormatter, ReportOptions,
    TextFormatter,
};
use crate::storage::{Config, StateStore};

pub struct DiffArgs {
    pub project_number: u32,
    pub from: Option<String>,
    pub to: Option<String>,
    pub range: Option<String>,
    pub filter: Option<String>,
    pub format: ReportFormat,
    pub moderate_risk: Option<i64>,
    pub high_risk: Option<i64>,
    pub extreme_risk: Option<i64>,
    pub state_dir: Option<String>,
}

pub fn run(output: &Output, config: &Config, args: DiffArgs) -> Result<()> {
    let (from, to) = resolve_window(&args)?;
    output.verbose_ctx("diff", &format!("Comparing {} to {}", from, to));

    let store = StateStore::new(config.resolve_state_dir(args.state_dir.as_deref()));

    let from_state = store
        .load_nearest(args.project_number, from)
        .context("Failed to load 'from' state")?;
    let to_state = store
        .load_nearest(args.project_number, to)
        .context("Failed to load 'to' state")?;

    output.verbose_ctx(
        "diff",
        &format!(
            "Loaded snapshots at {} and {}",
            from_state.timestamp, to_state.timestamp
        ),
    );

    let filter = args.filter.as_deref().unwrap_or_default();
    let from_state = from_state.filter(filter)?;
    let to_state = to_state.filter(filter)?;

    let diff = compare_states(&from_state, &to_state);

    let mut options = ReportOptions {
        date_format: config.date_format.clone(),
        thresholds: config.thresholds,
    };
    if let Some(days) = args.moderate_risk {
        options.thresholds.moderate = days;
    }
    if let Some(days) = args.high_risk {
        options.thresholds.high = days;
    }
    if let Some(days) = args.extreme_risk {
        options.thresholds.extreme = days;
    }

    let formatter: Box<dyn Formatter> = match args.format {
        ReportFormat::Text => Box::new(TextFormatter::new(options)),
        ReportFormat::Markdown => Box::new(MarkdownFormatter::new(options)),
        ReportFormat::Table => Box::new(PlainTableFormatter::new(options)),
    };

    print!("{}", formatter.format(&diff));
    Ok(())
}

/// Resolves the comparison window from either --range or --from/--to
fn resolve_window(args: &DiffArgs) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    match (&args.range, &args.from, &args.to) {
        (Some(range), None, None) => {
            parse_human_range(range).context("Failed to parse time range")
        }
        (None, Some(from), Some(to)) => {
            let from = DateTime::parse_from_rfc3339(from)
                .with_context(|| format!("Invalid 'from' date '{}': must be ISO 8601", from))?
                .with_timezone(&Utc);
            let to = DateTime::parse_from_rfc3339(to)
                .with_context(|| format!("Invalid 'to' date '{}': must be ISO 8601", to))?
                .with_timezone(&Utc);
            Ok((from, to))
        }
        _ => bail!("must specify either --range or both --from and --to"),
    }
}
