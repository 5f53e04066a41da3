//! Configuration loader with multi-source merging.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::{AmfConfig, Paths};

pub struct ConfigLoader {
    project_dir: PathBuf,
    env_prefix: String,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            project_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            env_prefix: "AMF".to_string(),
        }
    }

    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.project_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn load(self) -> Result<AmfConfig> {
        let mut builder = config::Config::builder();

        let defaults = AmfConfig::default();
        builder = builder.add_source(config::Config::try_from(&defaults)?);

        let paths = Paths::new();
        if let Ok(user_config_file) = paths.user_config_file() {
            if user_config_file.exists() {
                builder = builder.add_source(
                    config::File::from(user_config_file).required(false).format(config::FileFormat::Toml),
                );
            }
        }

        let project_config_file = Paths::project_config_file(&self.project_dir);
        if project_config_file.exists() {
            builder = builder.add_source(
                config::File::from(project_config_file).required(false).format(config::FileFormat::Toml),
            );
        }

        let local_config_file = Paths::local_config_file(&self.project_dir);
        if local_config_file.exists() {
            builder = builder.add_source(
                config::File::from(local_config_file).required(false).format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix(&self.env_prefix).separator("_").try_parsing(true),
        );

        let config = builder.build().context("failed to build configuration")?;
        let amf_config: AmfConfig = config.try_deserialize().context("failed to deserialize configuration")?;

        Ok(amf_config)
    }

    pub fn load_or_default(self) -> AmfConfig {
        self.load().unwrap_or_default()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn load_defaults_when_no_files_present() {
        let temp_dir = tempdir().unwrap();
        let config = ConfigLoader::new().with_project_dir(temp_dir.path()).load().unwrap();
        assert_eq!(config.node.node_id, 1);
        assert_eq!(config.escalation.su_restart_max, 3);
    }

    #[test]
    fn project_config_overrides_defaults() {
        let temp_dir = tempdir().unwrap();
        let project_dir = temp_dir.path();
        fs::write(
            project_dir.join("amf.toml"),
            "[node]\nnode_id = 7\n\n[escalation]\nsu_restart_max = 5\n",
        )
        .unwrap();

        let config = ConfigLoader::new().with_project_dir(project_dir).load().unwrap();
        assert_eq!(config.node.node_id, 7);
        assert_eq!(config.escalation.su_restart_max, 5);
    }

    #[test]
    fn local_config_overrides_project_config() {
        let temp_dir = tempdir().unwrap();
        let project_dir = temp_dir.path();
        fs::write(project_dir.join("amf.toml"), "[node]\nbind_address = \"127.0.0.1:9000\"\n").unwrap();
        fs::write(project_dir.join("amf.local.toml"), "[node]\nbind_address = \"localhost:9999\"\n").unwrap();

        let config = ConfigLoader::new().with_project_dir(project_dir).load().unwrap();
        assert_eq!(config.node.bind_address, "localhost:9999");
    }
}
