//! Path utilities and XDG directory discovery.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::ConfigError;

pub struct Paths {
    project_dirs: Option<ProjectDirs>,
}

impl Paths {
    pub fn new() -> Self {
        Self {
            project_dirs: ProjectDirs::from("org", "OpenSAF-rs", "openamf"),
        }
    }

    pub fn user_config_dir(&self) -> Result<PathBuf, ConfigError> {
        self.project_dirs
            .as_ref()
            .map(|p| p.config_dir().to_path_buf())
            .ok_or_else(|| ConfigError::XdgError("failed to determine user config directory".into()))
    }

    pub fn user_config_file(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.user_config_dir()?.join("config.toml"))
    }

    pub fn project_config_file(project_dir: impl AsRef<Path>) -> PathBuf {
        project_dir.as_ref().join("amf.toml")
    }

    pub fn local_config_file(project_dir: impl AsRef<Path>) -> PathBuf {
        project_dir.as_ref().join("amf.local.toml")
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn project_paths_are_named_after_the_project_config_file() {
        let temp_dir = tempdir().unwrap();
        let project_dir = temp_dir.path();
        assert_eq!(
            Paths::project_config_file(project_dir),
            project_dir.join("amf.toml")
        );
        assert_eq!(
            Paths::local_config_file(project_dir),
            project_dir.join("amf.local.toml")
        );
    }
}
