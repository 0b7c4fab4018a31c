use std::path::PathBuf;

use directories::ProjectDirs;

pub const DB_FILE_NAME: &str = "snippets.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
}

impl AppConfig {
    /// An explicit path (flag or `SNIPPET_ARSENAL_DB`) wins, then the OS data
    /// directory, then the working directory.
    pub fn resolve(db_override: Option<PathBuf>) -> Self {
        let db_path = db_override.unwrap_or_else(default_db_path);
        Self { db_path }
    }
}

fn default_db_path() -> PathBuf {
    ProjectDirs::from("com", "snippet-arsenal", "snippet-arsenal")
        .map(|dirs| dirs.data_dir().join(DB_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let config = AppConfig::resolve(Some(PathBuf::from("/tmp/custom.db")));
        assert_eq!(config.db_path, PathBuf::from("/tmp/custom.db"));
    }

    #[test]
    fn default_path_uses_fixed_file_name() {
        let config = AppConfig::resolve(None);
        assert_eq!(
            config.db_path.file_name().and_then(|name| name.to_str()),
            Some(DB_FILE_NAME)
        );
    }
}
