
pub mod firmware;

use std::io::{self, Stdout, Write};
use std::sync::Mutex;

use thiserror::Error;
use tokio::process::Command;

/// Errors talking to the virtualization management tool
#[derive(Debug, Error)]
pub enum VboxError {
    #[error("Unable to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} {action} failed with {status}: {stderr}")]
    CommandFailed {
        program: String,
        action: String,
        status: String,
        stderr: String,
    },
    #[error("Unsupported firmware type: '{0}'")]
    UnsupportedFirmware(String),
    #[error("Unable to print {key}: {source}")]
    Output {
        key: String,
        #[source]
        source: io::Error,
    },
}

/// Source of a virtual machine's machine-readable description
#[allow(async_fn_in_trait)]
pub trait VmInfoSource {
    /// Returns the `key="value"` description of the given VM
    async fn machine_info(&self, vm: &str) -> Result<String, VboxError>;
}

/// Destination for VM extra-data keys
#[allow(async_fn_in_trait)]
pub trait VmConfigSink {
    /// Set the given extra-data key of the VM
    async fn set_extra_data(&self, vm: &str, key: &str, value: &str) -> Result<(), VboxError>;

    /// Returns false if keys set through this sink never reach the VM
    fn persists(&self) -> bool {
        true
    }
}

/// VirtualBox management through the VBoxManage tool
#[derive(Debug, Clone)]
pub struct VBoxManage {
    program: String,
}

impl VBoxManage {
    pub fn new(program: String) -> Self {
        Self { program }
    }

    /// Run VBoxManage with the given arguments and return its stdout
    async fn run(&self, action: &str, args: &[&str]) -> Result<String, VboxError> {
        let mut command = Command::new(&self.program);
        command.arg(action).args(args);
        log::trace!("Running {:?}", command.as_std());

        let output = command.output().await.map_err(|source| VboxError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        if !output.status.success() {
            return Err(VboxError::CommandFailed {
                program: self.program.clone(),
                action: action.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl VmInfoSource for VBoxManage {
    async fn machine_info(&self, vm: &str) -> Result<String, VboxError> {
        self.run("showvminfo", &[vm, "--machinereadable"]).await
    }
}

impl VmConfigSink for VBoxManage {
    async fn set_extra_data(&self, vm: &str, key: &str, value: &str) -> Result<(), VboxError> {
        self.run("setextradata", &[vm, key, value]).await?;
        Ok(())
    }
}

/// Sink that prints each key instead of changing the VM
#[derive(Debug)]
pub struct DryRun<W: Write = Stdout> {
    out: Mutex<W>,
}

impl DryRun<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> DryRun<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl<W: Write> VmConfigSink for DryRun<W> {
    async fn set_extra_data(&self, vm: &str, key: &str, value: &str) -> Result<(), VboxError> {
        log::debug!("Skipping write to {vm}");
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        writeln!(out, "{key} = {value}").map_err(|source| VboxError::Output {
            key: key.to_string(),
            source,
        })
    }

    fn persists(&self) -> bool {
        false
    }
}
