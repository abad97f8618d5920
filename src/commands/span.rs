use crate::OutputFormat;
use crate::config::Config;
use crate::span::{SpanOutcome, compute_span_with_formats};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};

/// Resolve "now": the pinned --as-of value when given, the system clock
/// otherwise. A date-only value pins midnight of that day.
pub fn resolve_now(as_of: Option<&str>) -> Result<NaiveDateTime> {
    let Some(raw) = as_of else {
        return Ok(Local::now().naive_local());
    };
    let raw = raw.trim();

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(datetime);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.and_hms_opt(0, 0, 0).unwrap())
        .with_context(|| format!("Invalid --as-of value '{}'", raw))
}

/// Serialize an outcome with its rendered display string alongside the
/// tagged fields, for callers that pattern-match on either.
pub fn outcome_json(outcome: &SpanOutcome) -> Result<serde_json::Value> {
    let mut value = serde_json::to_value(outcome).context("Failed to serialize outcome")?;
    value["display"] = serde_json::Value::String(outcome.render());
    Ok(value)
}

pub fn span(
    config: &Config,
    start: &str,
    end: &str,
    as_of: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let now = resolve_now(as_of)?;
    let outcome =
        compute_span_with_formats(Some(start), Some(end), now, &config.dates.extra_formats)?;

    match format {
        OutputFormat::Text => println!("{}", outcome.render()),
        OutputFormat::Json => println!("{}", serde_json::to_string(&outcome_json(&outcome)?)?),
    }

    Ok(())
}
