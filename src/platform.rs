use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::process::Command;

fn launcher() -> &'static str {
    if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// Opens `dir` in the platform file manager without waiting for it.
pub fn open_folder(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Err(anyhow!("Output folder does not exist: {}", dir.display()));
    }

    let program = launcher();
    Command::new(program)
        .arg(dir)
        .spawn()
        .with_context(|| format!("Failed to launch {} for {}", program, dir.display()))?;

    tracing::info!("Opened output folder {:?}", dir);
    Ok(())
}
