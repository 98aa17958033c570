/// Filesystem layout for intentbot data
///
/// All persistent state lives under the data directory. Directories must be
/// created before the logger and registry initialize.
use std::fs;
use std::io;
use std::path::PathBuf;

/// Root directory for persistent data
pub const DATA_DIR: &str = "data";

/// Returns the data directory path
pub fn get_data_dir() -> PathBuf {
    PathBuf::from(DATA_DIR)
}

/// Path of the governance registry snapshot (aliases + pool routes)
pub fn get_registry_path() -> PathBuf {
    get_data_dir().join("registry.json")
}

/// Ensure every required directory exists
pub fn ensure_all_directories() -> io::Result<()> {
    fs::create_dir_all(get_data_dir())?;
    Ok(())
}
