//! Timed child-process executor for CLC commands (spec.md §4.1
//! `NCS_OS_PROC_EXECUTE_TIMED`).
//!
//! Scripts are launched with `std::process::Command::spawn`, polled with
//! `try_wait` on a short interval, and killed if they outlive their
//! configured timeout. This blocks the calling thread for the duration
//! of the command (or its timeout) — acceptable for the short-lived
//! INSTANTIATE/TERMINATE/CLEANUP scripts CLC commands are in practice.

use std::process::{Child, Command};
use std::time::{Duration, Instant};

use amf_kernel::ClcCommandKind;
use amf_types::{Component, ComponentErrorSource, NodeId};

/// How often the executor polls a running child for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// One of the five outcomes `NCS_OS_PROC_EXECUTE_TIMED` can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClcOutcome {
    ExecFailed,
    NormalExit,
    WaitTimeout,
    ExitWithCode(i32),
    ExitOnSignal,
}

/// Builds the environment for one CLC invocation (spec.md §4.1
/// "Environment passed to every CLC command").
///
/// Per-CSI attribute env vars for NPI components aren't built here: CSI
/// attributes aren't carried over the director/node-director wire
/// protocol today, so there's nothing to source them from at this layer.
fn build_env(comp: &Component, node: NodeId, error_source: Option<ComponentErrorSource>) -> Vec<(String, String)> {
    let mut env = vec![
        ("SA_AMF_COMPONENT_NAME".to_string(), comp.id.get().to_string()),
        ("NCS_ENV_NODE_ID".to_string(), node.get().to_string()),
    ];
    if let Some(source) = error_source {
        env.push(("OSAF_COMPONENT_ERROR_SOURCE".to_string(), source.as_env_value().to_string()));
    }
    env.extend(comp.config.env.iter().cloned());
    env
}

fn script_path(comp: &Component, kind: ClcCommandKind) -> Option<&str> {
    let clc = &comp.config.clc;
    let cmd = match kind {
        ClcCommandKind::Instantiate => clc.instantiate.as_ref(),
        ClcCommandKind::Terminate => clc.terminate.as_ref(),
        ClcCommandKind::Cleanup => clc.cleanup.as_ref(),
        ClcCommandKind::AmStart => clc.amstart.as_ref(),
        ClcCommandKind::AmStop => clc.amstop.as_ref(),
        ClcCommandKind::HealthCheck => clc.healthcheck.as_ref(),
    };
    cmd.map(|c| c.path.as_str())
}

/// Launches the configured script for `kind` and blocks until it exits,
/// is killed on timeout, or fails to spawn.
pub fn execute(
    comp: &Component,
    node: NodeId,
    kind: ClcCommandKind,
    timeout: Duration,
    error_source: Option<ComponentErrorSource>,
) -> ClcOutcome {
    let Some(path) = script_path(comp, kind) else {
        return ClcOutcome::ExecFailed;
    };

    let mut command = Command::new(path);
    for (key, value) in build_env(comp, node, error_source) {
        command.env(key, value);
    }

    let child = match command.spawn() {
        Ok(child) => child,
        Err(err) => {
            tracing::warn!(%path, comp = %comp.id, error = %err, "CLC command failed to spawn");
            return ClcOutcome::ExecFailed;
        }
    };

    wait_with_timeout(child, timeout)
}

fn wait_with_timeout(mut child: Child, timeout: Duration) -> ClcOutcome {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return status_to_outcome(status),
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return ClcOutcome::WaitTimeout;
                }
                std::thread::sleep(POLL_INTERVAL.min(deadline.saturating_duration_since(Instant::now())));
            }
            Err(_) => return ClcOutcome::ExecFailed,
        }
    }
}

#[cfg(unix)]
fn status_to_outcome(status: std::process::ExitStatus) -> ClcOutcome {
    use std::os::unix::process::ExitStatusExt;
    match status.code() {
        Some(0) => ClcOutcome::NormalExit,
        Some(code) => ClcOutcome::ExitWithCode(code),
        None if status.signal().is_some() => ClcOutcome::ExitOnSignal,
        None => ClcOutcome::ExecFailed,
    }
}

#[cfg(not(unix))]
fn status_to_outcome(status: std::process::ExitStatus) -> ClcOutcome {
    match status.code() {
        Some(0) => ClcOutcome::NormalExit,
        Some(code) => ClcOutcome::ExitWithCode(code),
        None => ClcOutcome::ExecFailed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amf_types::{Capability, ClcCommand, ClcCommandSet, ComponentConfig, CompId, CsTypeId, SuId};

    fn component_with(clc: ClcCommandSet) -> Component {
        let config = ComponentConfig {
            comp_type: "test".into(),
            cs_type: CsTypeId::new(1),
            capability: Capability::NonPreInstantiable,
            pre_instantiable: false,
            clc,
            env: vec![("FOO".into(), "bar".into())],
            inst_retry_max: 3,
            no_retry_exit_code: None,
        };
        Component::new(CompId::new(1), SuId::new(1), config)
    }

    #[test]
    fn missing_command_is_exec_failed() {
        let comp = component_with(ClcCommandSet::default());
        let outcome = execute(&comp, NodeId::new(1), ClcCommandKind::Instantiate, Duration::from_secs(1), None);
        assert_eq!(outcome, ClcOutcome::ExecFailed);
    }

    #[test]
    fn zero_exit_is_normal_exit() {
        let comp = component_with(ClcCommandSet {
            instantiate: Some(ClcCommand { path: "/bin/true".into(), timeout: Duration::from_secs(5) }),
            ..Default::default()
        });
        let outcome = execute(&comp, NodeId::new(1), ClcCommandKind::Instantiate, Duration::from_secs(5), None);
        assert_eq!(outcome, ClcOutcome::NormalExit);
    }

    #[test]
    fn nonzero_exit_carries_its_code() {
        let comp = component_with(ClcCommandSet {
            instantiate: Some(ClcCommand { path: "/bin/false".into(), timeout: Duration::from_secs(5) }),
            ..Default::default()
        });
        let outcome = execute(&comp, NodeId::new(1), ClcCommandKind::Instantiate, Duration::from_secs(5), None);
        assert_eq!(outcome, ClcOutcome::ExitWithCode(1));
    }

    #[test]
    fn unreachable_binary_is_exec_failed() {
        let comp = component_with(ClcCommandSet {
            instantiate: Some(ClcCommand { path: "/no/such/binary".into(), timeout: Duration::from_secs(1) }),
            ..Default::default()
        });
        let outcome = execute(&comp, NodeId::new(1), ClcCommandKind::Instantiate, Duration::from_secs(1), None);
        assert_eq!(outcome, ClcOutcome::ExecFailed);
    }

    #[test]
    #[cfg(unix)]
    fn long_running_command_times_out() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let script_path = std::env::temp_dir().join("amf_clc_executor_test_sleep.sh");
        fs::write(&script_path, "#!/bin/sh\nsleep 5\n").unwrap();
        fs::set_permissions(&script_path, fs::Permissions::from_mode(0o755)).unwrap();

        let comp = component_with(ClcCommandSet {
            instantiate: Some(ClcCommand {
                path: script_path.to_string_lossy().into_owned(),
                timeout: Duration::from_millis(50),
            }),
            ..Default::default()
        });
        let outcome = execute(&comp, NodeId::new(1), ClcCommandKind::Instantiate, Duration::from_millis(50), None);
        assert_eq!(outcome, ClcOutcome::WaitTimeout);

        let _ = fs::remove_file(&script_path);
    }
}
