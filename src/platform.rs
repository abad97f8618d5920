//! State directory resolution with cross-platform fallbacks.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Resolve the state directory.
///
/// Priority order: explicit override (testing/CI), `~/.duespan`, the
/// platform data directory, then the current working directory as a last
/// resort. Each candidate is probed for write access before being selected.
pub fn get_state_dir(override_dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        ensure_writable(dir)?;
        return Ok(dir.clone());
    }

    if let Some(home) = home::home_dir() {
        let dir = home.join(".duespan");
        if ensure_writable(&dir).is_ok() {
            return Ok(dir);
        }
        eprintln!(
            "Warning: Cannot write to {}. Trying fallback locations.",
            dir.display()
        );
    }

    // XDG data dir on Linux, Application Support on macOS, AppData on Windows
    if let Some(data) = dirs::data_local_dir() {
        let dir = data.join("duespan");
        if ensure_writable(&dir).is_ok() {
            return Ok(dir);
        }
    }

    let dir = PathBuf::from(".duespan");
    ensure_writable(&dir).context(
        "Cannot create state directory in any location. \
         Check file permissions or set state_dir_override in config.",
    )?;
    Ok(dir)
}

/// Create `dir` if needed and verify it accepts writes by round-tripping a
/// probe file.
pub fn ensure_writable(dir: &PathBuf) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let probe = dir.join(".write_test");
    fs::write(&probe, b"test")
        .with_context(|| format!("Directory {} is not writable", dir.display()))?;

    // Cleanup may fail if something else holds the file open; not fatal
    let _ = fs::remove_file(&probe);

    Ok(())
}

/// Lock and state file paths for the resolved state directory.
pub fn state_paths(state_dir_override: Option<&PathBuf>) -> Result<(PathBuf, PathBuf)> {
    let state_dir = get_state_dir(state_dir_override)?;
    Ok((state_dir.join("state.lock"), state_dir.join("state.json")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_override_dir_takes_priority() {
        let temp = TempDir::new().unwrap();
        let override_path = temp.path().to_path_buf();

        let result = get_state_dir(Some(&override_path));
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), override_path);
    }

    #[test]
    fn test_ensure_writable_creates_nested_dirs() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b");

        assert!(ensure_writable(&nested).is_ok());
        assert!(nested.exists());
    }

    #[test]
    fn test_state_paths_with_override() {
        let temp = TempDir::new().unwrap();
        let override_path = temp.path().to_path_buf();

        let (lock, state) = state_paths(Some(&override_path)).unwrap();
        assert_eq!(lock, override_path.join("state.lock"));
        assert_eq!(state, override_path.join("state.json"));
    }
}
