//! External command and cluster errors

use super::DeployError;

/// Creates a command spawn failed error
pub fn spawn_failed(command: impl Into<String>, reason: impl ToString) -> DeployError {
    DeployError::CommandSpawnFailed {
        command: command.into(),
        reason: reason.to_string(),
    }
}

/// Creates a command failed error from its exit status and stderr
pub fn failed(
    command: impl Into<String>,
    status: impl Into<String>,
    stderr: impl Into<String>,
) -> DeployError {
    DeployError::CommandFailed {
        command: command.into(),
        status: status.into(),
        stderr: stderr.into(),
    }
}

/// Creates a namespace creation error
pub fn namespace_create_failed(
    namespace: impl Into<String>,
    reason: impl Into<String>,
) -> DeployError {
    DeployError::NamespaceCreateFailed {
        namespace: namespace.into(),
        reason: reason.into(),
    }
}
