//! Platform directory resolution and tilde expansion.
//!
//! Directories come from the `directories` crate, so they follow each
//! platform's conventions (XDG on Linux, `Library/Application Support` on
//! macOS, `AppData` on Windows).

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::domain::error::{HomescoutError, Result};

const APP_DIR: &str = "homescout";

fn base_dirs() -> Result<BaseDirs> {
    BaseDirs::new().ok_or_else(|| HomescoutError::Config("cannot resolve home directory".to_string()))
}

/// Returns the data directory holding the settings cache and trace files.
///
/// Resolves to `~/.local/share/homescout` on Linux.
///
/// # Errors
///
/// Returns [`HomescoutError::Config`] if no home directory can be resolved.
pub fn get_data_dir() -> Result<PathBuf> {
    Ok(base_dirs()?.data_local_dir().join(APP_DIR))
}

/// Returns the default location of `config.toml`.
///
/// Resolves to `~/.config/homescout/config.toml` on Linux.
///
/// # Errors
///
/// Returns [`HomescoutError::Config`] if no home directory can be resolved.
pub fn default_config_file() -> Result<PathBuf> {
    Ok(base_dirs()?.config_dir().join(APP_DIR).join("config.toml"))
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading `~` are returned unchanged. If the home directory
/// cannot be resolved the path is returned as given.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    match BaseDirs::new() {
        Some(base) => expand_tilde_with(path, base.home_dir()),
        None => PathBuf::from(path),
    }
}

/// Expands a leading `~` against an explicit home directory.
///
/// # Examples
///
/// ```
/// use homescout::infrastructure::expand_tilde_with;
/// use std::path::{Path, PathBuf};
///
/// let home = Path::new("/home/ana");
/// assert_eq!(expand_tilde_with("~/cache/settings.json", home), PathBuf::from("/home/ana/cache/settings.json"));
/// assert_eq!(expand_tilde_with("~", home), PathBuf::from("/home/ana"));
/// assert_eq!(expand_tilde_with("/var/lib/x", home), PathBuf::from("/var/lib/x"));
/// ```
#[must_use]
pub fn expand_tilde_with(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        home.to_path_buf()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}
