//! # amf-config: layered configuration for the AMF director/node director
//!
//! Loads, in increasing precedence:
//! 1. Built-in defaults
//! 2. `~/.config/openamf/config.toml` (user defaults)
//! 3. `amf.toml` (project config, git-tracked)
//! 4. `amf.local.toml` (local overrides, gitignored)
//! 5. `AMF_*` environment variables

use serde::{Deserialize, Serialize};

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::Paths;

/// Root configuration, one section per subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AmfConfig {
    pub node: NodeConfig,
    pub cluster: ClusterConfig,
    pub escalation: EscalationConfig,
    pub imma: ImmaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub node_id: u32,
    pub bind_address: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self { node_id: 1, bind_address: "127.0.0.1:9000".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub director_address: String,
    pub standby_director_address: Option<String>,
    /// Default AIS wait timeout for synchronous calls (`IMMSV_WAIT_TIME`,
    /// spec.md §5 "Cancellation and timeouts").
    pub wait_timeout_secs: u64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            director_address: "127.0.0.1:9001".to_string(),
            standby_director_address: None,
            wait_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    pub comp_restart_max: u32,
    pub su_restart_max: u32,
    pub su_failover_max: u32,
    pub probation_secs: u64,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            comp_restart_max: 3,
            su_restart_max: 3,
            su_failover_max: 3,
            probation_secs: 600,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ImmaConfig {
    pub resurrect_retry_bound_secs: u64,
    pub ccb_recovery_bound_secs: u64,
    pub max_concurrent_resurrects: u32,
}

impl Default for ImmaConfig {
    fn default() -> Self {
        Self {
            resurrect_retry_bound_secs: 2,
            ccb_recovery_bound_secs: 10,
            max_concurrent_resurrects: 8,
        }
    }
}
