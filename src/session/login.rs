//! Out-of-process login helper

use async_trait::async_trait;
use log::{error, info};
use std::path::Path;

use super::SessionError;
use crate::config::LoginHelperCommand;

/// Produces a credential artifact at `storage_file`, or fails
#[async_trait]
pub trait LoginHelper: Send + Sync {
    async fn login(&self, username: &str, password: &str, storage_file: &Path) -> Result<(), SessionError>;
}

/// Runs an external executable; any non-zero exit is a total login failure
#[derive(Debug, Clone)]
pub struct CommandLoginHelper {
    command: LoginHelperCommand,
}

impl CommandLoginHelper {
    #[must_use]
    pub fn new(command: LoginHelperCommand) -> Self {
        Self { command }
    }
}

#[async_trait]
impl LoginHelper for CommandLoginHelper {
    async fn login(&self, username: &str, password: &str, storage_file: &Path) -> Result<(), SessionError> {
        if let Some(parent) = storage_file.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        info!(
            "Running login helper {} for {username}",
            self.command.program.display()
        );
        let output = tokio::process::Command::new(&self.command.program)
            .args(&self.command.args)
            .arg("--username")
            .arg(username)
            .arg("--password")
            .arg(password)
            .arg("--storage-file")
            .arg(storage_file)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                SessionError::LoginFailed(format!(
                    "could not start {}: {e}",
                    self.command.program.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let diagnostic = if stderr.trim().is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            error!("Login helper failed: {diagnostic}");
            return Err(SessionError::LoginFailed(format!(
                "helper exited with {}: {diagnostic}",
                output.status
            )));
        }

        info!(
            "Login helper succeeded: {}",
            String::from_utf8_lossy(&output.stdout).trim()
        );
        Ok(())
    }
}
