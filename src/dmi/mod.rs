
pub mod data;
pub mod tables;

use std::io;

use thiserror::Error;
use tokio::process::Command;

use crate::constants::{ELEVATE_COMMAND, HARDENED_LOCALE};

use self::data::DmiQuery;

/// Errors querying host DMI data
#[derive(Debug, Error)]
pub enum DmiError {
    #[error("Unable to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} failed with {status} while reading {query}: {stderr}")]
    CommandFailed {
        program: String,
        query: DmiQuery,
        status: String,
        stderr: String,
    },
}

/// Source of host hardware identity data
#[allow(async_fn_in_trait)]
pub trait HardwareInfoSource {
    /// Returns the raw text answer to the given query
    async fn query(&self, query: &DmiQuery) -> Result<String, DmiError>;
}

/// How hardware queries are run on this host
#[derive(Debug, Clone)]
pub struct HostQueryConfig {
    /// dmidecode program name or path
    pub program: String,
    /// Command prefixed to each query to gain privileges, if any
    pub elevate: Option<String>,
    /// Environment forced on each query
    pub locale: Vec<(String, String)>,
}

impl HostQueryConfig {
    /// Create a config for the current user, elevating through sudo unless
    /// already running as root.
    pub fn new(program: String) -> Self {
        let elevate = if nix::unistd::geteuid().is_root() {
            None
        } else {
            Some(ELEVATE_COMMAND.to_string())
        };
        Self {
            program,
            elevate,
            locale: HARDENED_LOCALE
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        }
    }

    /// Programs that must be installed to run queries
    pub fn required_programs(&self) -> Vec<String> {
        let mut programs = vec![self.program.clone()];
        if let Some(elevate) = self.elevate.as_ref() {
            programs.push(elevate.clone());
        }
        programs
    }
}

/// Hardware info source backed by the dmidecode tool
#[derive(Debug, Clone)]
pub struct Dmidecode {
    config: HostQueryConfig,
}

impl Dmidecode {
    pub fn new(config: HostQueryConfig) -> Self {
        Self { config }
    }

    fn command(&self, query: &DmiQuery) -> Command {
        let mut command = match self.config.elevate.as_ref() {
            Some(elevate) => {
                let mut command = Command::new(elevate);
                command.arg(&self.config.program);
                command
            }
            None => Command::new(&self.config.program),
        };
        command
            .args(query.args())
            .envs(self.config.locale.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        command
    }
}

impl HardwareInfoSource for Dmidecode {
    async fn query(&self, query: &DmiQuery) -> Result<String, DmiError> {
        let mut command = self.command(query);
        log::trace!("Running {:?}", command.as_std());
        let output = command.output().await.map_err(|source| DmiError::Spawn {
            program: self.config.program.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(DmiError::CommandFailed {
                program: self.config.program.clone(),
                query: *query,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Returns the first non-empty line of a string keyword answer. Hosts with
/// several processor sockets answer with one line per socket.
pub fn first_line(output: &str) -> String {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .unwrap_or_default()
        .to_string()
}

/// Returns the value of the first `label: value` line of a record dump
pub fn record_value(dump: &str, label: &str) -> Option<String> {
    dump.lines().find_map(|line| {
        let (name, value) = line.trim().split_once(':')?;
        if name.trim() != label {
            return None;
        }
        Some(value.trim().to_string())
    })
}

/// Parse a `major.minor` revision such as `5.17`
pub fn parse_revision(value: &str) -> Option<(u32, u32)> {
    let (major, minor) = value.trim().split_once('.')?;
    let major = major.trim().parse().ok()?;
    let minor = minor.trim().parse().ok()?;
    Some((major, minor))
}
