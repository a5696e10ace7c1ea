//! Where Folio stores its own data (config).
//!
//! The recommendation artifacts live wherever the offline pipeline wrote them; only the
//! pointer to that directory is kept here.

use std::path::PathBuf;

/// Returns the directory where Folio stores its config.
/// On Linux: `~/.local/share/folio/`; on macOS: `~/Library/Application Support/Folio/`.
/// Creates the directory if it doesn't exist; returns `None` if we can't determine the path.
pub fn app_data_dir() -> Option<PathBuf> {
    let dir = directories::ProjectDirs::from("app", "Folio", "Folio")?
        .data_local_dir()
        .to_path_buf();
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_exists_when_resolved() {
        if let Some(dir) = app_data_dir() {
            assert!(dir.is_dir());
        }
    }
}
