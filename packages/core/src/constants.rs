use std::env;
use std::path::PathBuf;

/// File name of the SQLite database inside the Larder directory
pub const DATABASE_FILE_NAME: &str = "larder.db";

/// Get the path to the Larder directory (~/.larder)
pub fn larder_dir() -> PathBuf {
    // First try HOME environment variable (useful for tests)
    if let Ok(home) = env::var("HOME") {
        return PathBuf::from(home).join(".larder");
    }

    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".larder")
}

/// Get the path to the default database file (~/.larder/larder.db)
pub fn database_file() -> PathBuf {
    larder_dir().join(DATABASE_FILE_NAME)
}
