
use std::env;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DependencyError {
    #[error("Missing required programs: {}", .0.join(", "))]
    Missing(Vec<String>),
}

/// Returns true if the path is an executable file
fn is_executable(path: &Path) -> bool {
    path.metadata()
        .map(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
        .unwrap_or_default()
}

/// Resolve a program name the way the shell would, using the given PATH
pub fn find_program(program: &str, path: Option<&str>) -> Option<PathBuf> {
    if program.contains('/') {
        let program = PathBuf::from(program);
        return is_executable(&program).then_some(program);
    }
    env::split_paths(path?)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

/// Ensure every given program can be run, reporting all missing ones at once
pub fn check<S: AsRef<str>>(programs: &[S]) -> Result<(), DependencyError> {
    let path = env::var("PATH").ok();
    let missing: Vec<String> = programs
        .iter()
        .map(|program| program.as_ref())
        .filter(|program| {
            let found = find_program(program, path.as_deref());
            log::trace!("Resolved {program} to {found:?}");
            found.is_none()
        })
        .map(str::to_string)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DependencyError::Missing(missing))
    }
}
