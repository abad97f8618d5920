use crate::OutputFormat;
use crate::commands::span::{outcome_json, resolve_now};
use crate::config::Config;
use crate::platform;
use crate::span::{SpanOutcome, compute_span_with_formats};
use crate::state::{MilestoneStatus, State, with_state_lock};
use anyhow::{Context, Result};
use std::str::FromStr;

pub fn add(
    config: &Config,
    name: &str,
    start: &str,
    end: &str,
    status: Option<&str>,
) -> Result<()> {
    let status = match status {
        Some(raw) => MilestoneStatus::from_str(raw)?,
        None => MilestoneStatus::from_str(&config.milestones.default_status)
            .context("Invalid default_status in config")?,
    };

    // Validate the range up front, the same computation the listing uses
    let now = resolve_now(None)?;
    let outcome = compute_span_with_formats(Some(start), Some(end), now, &config.dates.extra_formats)?;
    match outcome {
        SpanOutcome::Empty => anyhow::bail!("Start and end dates are required"),
        SpanOutcome::InvalidRange => anyhow::bail!("{}", crate::span::INVALID_RANGE_MSG),
        SpanOutcome::Remaining { .. } => {}
    }

    let (lock_path, state_path) = platform::state_paths(config.state.state_dir_override.as_ref())?;
    with_state_lock(&lock_path, &state_path, |state| {
        let id = state.add(name, start, end, status);
        println!("✓ Added milestone {}: {} ({})", id, name, outcome.render());
        Ok(())
    })
}

pub fn list(
    config: &Config,
    status: Option<&str>,
    as_of: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let filter = status.map(MilestoneStatus::from_str).transpose()?;
    let now = resolve_now(as_of)?;

    let (_, state_path) = platform::state_paths(config.state.state_dir_override.as_ref())?;
    // Read-only listing, no lock needed
    let state = State::load(&state_path)?;

    let milestones: Vec<_> = state
        .milestones
        .iter()
        .filter(|m| filter.map_or(true, |f| m.status == f))
        .collect();

    if let OutputFormat::Json = format {
        let mut items = Vec::new();
        for m in &milestones {
            let outcome =
                compute_span_with_formats(Some(&m.start_date), Some(&m.end_date), now, &config.dates.extra_formats)?;
            let mut value = serde_json::to_value(m).context("Failed to serialize milestone")?;
            value["duration"] = outcome_json(&outcome)?;
            items.push(value);
        }
        println!("{}", serde_json::to_string(&items)?);
        return Ok(());
    }

    if milestones.is_empty() {
        println!("No milestones found.");
        return Ok(());
    }

    println!(
        "{:<5} {:<30} {:<12} {:<12} {:<10} {:<18}",
        "ID", "Name", "Start", "End", "Status", "Duration"
    );
    println!("{}", "-".repeat(90));

    for m in &milestones {
        let name_display = if m.name.len() > 28 {
            format!("{}...", &m.name[0..25])
        } else {
            m.name.clone()
        };
        let duration = compute_span_with_formats(
            Some(&m.start_date),
            Some(&m.end_date),
            now,
            &config.dates.extra_formats,
        )
        .map(|o| o.render())
        .unwrap_or_else(|_| "?".to_string());

        println!(
            "{:<5} {:<30} {:<12} {:<12} {:<10} {:<18}",
            m.id,
            name_display,
            m.start_date,
            m.end_date,
            m.status.to_string(),
            duration
        );
    }

    Ok(())
}

pub fn show(config: &Config, id: u32, as_of: Option<&str>) -> Result<()> {
    let now = resolve_now(as_of)?;

    let (_, state_path) = platform::state_paths(config.state.state_dir_override.as_ref())?;
    let state = State::load(&state_path)?;

    let milestone = state
        .find(id)
        .with_context(|| format!("No milestone with ID {}", id))?;

    let duration = compute_span_with_formats(
        Some(&milestone.start_date),
        Some(&milestone.end_date),
        now,
        &config.dates.extra_formats,
    )
    .map(|o| o.render())
    .unwrap_or_else(|_| "?".to_string());

    println!("Milestone {}:", milestone.id);
    println!("  Name: {}", milestone.name);
    println!("  Start: {}", milestone.start_date);
    println!("  End: {}", milestone.end_date);
    println!("  Status: {}", milestone.status);
    println!("  Duration: {}", duration);
    println!("  Created: {}", milestone.created_at);

    Ok(())
}

pub fn done(config: &Config, id: u32, dry_run: bool) -> Result<()> {
    let (lock_path, state_path) = platform::state_paths(config.state.state_dir_override.as_ref())?;

    with_state_lock(&lock_path, &state_path, |state| {
        let Some(milestone) = state.find_mut(id) else {
            println!("No milestone with ID {}.", id);
            return Ok(());
        };

        if milestone.status == MilestoneStatus::Completed {
            println!("Milestone {} is already completed.", id);
            return Ok(());
        }

        if dry_run {
            println!("[DRY-RUN] Would mark milestone {} completed", id);
            return Ok(());
        }

        milestone.status = MilestoneStatus::Completed;
        println!("✓ Completed milestone {}: {}", id, milestone.name);
        Ok(())
    })
}

pub fn remove(config: &Config, id: u32, dry_run: bool) -> Result<()> {
    let (lock_path, state_path) = platform::state_paths(config.state.state_dir_override.as_ref())?;

    with_state_lock(&lock_path, &state_path, |state| {
        if dry_run {
            match state.find(id) {
                Some(m) => println!("[DRY-RUN] Would remove milestone {}: {}", id, m.name),
                None => println!("No milestone with ID {}.", id),
            }
            return Ok(());
        }

        match state.remove(id) {
            Some(m) => println!("✓ Removed milestone {}: {}", id, m.name),
            None => println!("No milestone with ID {}.", id),
        }
        Ok(())
    })
}
