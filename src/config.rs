use anyhow::Result;
use std::path::PathBuf;

/// Overrides every location below with a single directory.
pub const HOME_ENV: &str = "COFOUND_HOME";

/// Where cofound keeps its files.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub config_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        if let Some(home) = std::env::var_os(HOME_ENV) {
            return Ok(Self::rooted(PathBuf::from(home)));
        }
        // Use XDG directories or fall back to the current directory
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "cofound") {
            Ok(Self {
                data_dir: proj_dirs.data_dir().to_path_buf(),
                config_dir: proj_dirs.config_dir().to_path_buf(),
            })
        } else {
            Ok(Self::rooted(PathBuf::from(".cofound")))
        }
    }

    pub fn rooted(root: PathBuf) -> Self {
        Self {
            data_dir: root.clone(),
            config_dir: root,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("cofound.db")
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.config_dir.join("preferences.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rooted_paths_share_one_directory() {
        let config = Config::rooted(PathBuf::from("/tmp/cf"));
        assert_eq!(config.db_path(), PathBuf::from("/tmp/cf/cofound.db"));
        assert_eq!(config.session_path(), PathBuf::from("/tmp/cf/session.json"));
        assert_eq!(config.preferences_path(), PathBuf::from("/tmp/cf/preferences.json"));
    }
}
