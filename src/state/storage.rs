use super::types::{QuizState, STATE_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Get the default state file path (~/.config/specialty-match/state.json)
pub fn get_state_path() -> PathBuf {
    crate::config::get_config_dir().join("state.json")
}

/// Load quiz state from a JSON file
///
/// If the file doesn't exist, returns a new empty state.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_state(path: &Path) -> Result<QuizState> {
    if !path.exists() {
        return Ok(QuizState::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open state file at {}", path.display()))?;

    let state: QuizState = serde_json::from_reader(file).context("Failed to load quiz state")?;

    if state.version != STATE_VERSION {
        anyhow::bail!("Unsupported quiz state version: {}", state.version);
    }

    tracing::debug!(
        path = %path.display(),
        history = state.history.len(),
        in_progress = state.in_progress.is_some(),
        "loaded quiz state"
    );

    Ok(state)
}

/// Save quiz state to a JSON file atomically
///
/// Creates the parent directory if it doesn't exist.
pub fn save_state(path: &Path, state: &QuizState) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, state).context("Failed to serialize quiz state")?;

    file.commit().context("Failed to save quiz state")?;

    tracing::debug!(path = %path.display(), "saved quiz state");
    Ok(())
}

/// Replace the state file with an empty state.
///
/// Returns how many history records were discarded. A file that can't be
/// loaded (corrupt or an unsupported version) is still reset, counting as 0.
pub fn reset_state(path: &Path) -> Result<usize> {
    let cleared = match load_state(path) {
        Ok(state) => state.history.len(),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %format!("{:#}", e),
                "discarding unreadable quiz state"
            );
            0
        }
    };

    save_state(path, &QuizState::new())?;
    Ok(cleared)
}
