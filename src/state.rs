use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::str::FromStr;

use crate::error::ParseError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct State {
    pub version: String,
    pub next_id: u32,
    pub milestones: Vec<Milestone>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            next_id: 1,
            milestones: Vec::new(),
        }
    }
}

/// A tracked milestone: the record whose start/end dates feed the span
/// calculator. Dates are stored as the strings the user entered, already
/// validated to parse at insert time.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Milestone {
    pub id: u32,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub status: MilestoneStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneStatus {
    Pending,
    Active,
    Completed,
}

impl FromStr for MilestoneStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(MilestoneStatus::Pending),
            "active" => Ok(MilestoneStatus::Active),
            "completed" => Ok(MilestoneStatus::Completed),
            _ => Err(ParseError::Status(s.to_string())),
        }
    }
}

impl fmt::Display for MilestoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MilestoneStatus::Pending => "pending",
            MilestoneStatus::Active => "active",
            MilestoneStatus::Completed => "completed",
        };
        write!(f, "{}", name)
    }
}

impl State {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).context("Failed to read state file")?;

        // Handle empty file case
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(&content).context("Failed to parse state JSON")
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize state")?;

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Atomic write: temp file then rename, so a crash mid-write cannot
        // leave a truncated state file behind
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    pub fn find(&self, id: u32) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == id)
    }

    pub fn find_mut(&mut self, id: u32) -> Option<&mut Milestone> {
        self.milestones.iter_mut().find(|m| m.id == id)
    }

    pub fn remove(&mut self, id: u32) -> Option<Milestone> {
        let index = self.milestones.iter().position(|m| m.id == id)?;
        Some(self.milestones.remove(index))
    }

    /// Append a milestone and hand out the next record ID.
    pub fn add(
        &mut self,
        name: &str,
        start_date: &str,
        end_date: &str,
        status: MilestoneStatus,
    ) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.milestones.push(Milestone {
            id,
            name: name.to_string(),
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
            status,
            created_at: Utc::now(),
        });
        id
    }
}

pub fn with_state_lock<F, R>(lock_path: &Path, state_path: &Path, f: F) -> Result<R>
where
    F: FnOnce(&mut State) -> Result<R>,
{
    if let Some(parent) = lock_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(lock_path)
        .context("Failed to open lock file")?;

    file.lock_exclusive().context("Failed to acquire lock")?;

    // Load state
    let mut state = State::load(state_path)?;

    // Execute closure
    let result = f(&mut state);

    // If success, save state
    if result.is_ok() {
        state.save(state_path)?;
    }

    file.unlock().context("Failed to unlock")?;

    result
}
