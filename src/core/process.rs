//! Locating executables and spawning child processes.

use std::ffi::OsStr;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use super::env::EnvState;

/// Look `cmd` up in every directory of a `PATH`-style list.
pub fn find_in_path(search_paths: &OsStr, cmd: &str) -> Option<PathBuf> {
    std::env::split_paths(search_paths).find_map(|dir| {
        let candidate = dir.join(cmd);
        if is_executable(&candidate) {
            return Some(candidate);
        }
        #[cfg(windows)]
        {
            let exe = dir.join(format!("{cmd}.exe"));
            if is_executable(&exe) {
                return Some(exe);
            }
        }
        None
    })
}

/// Look `cmd` up using the `PATH` recorded in `env`.
pub fn which(env: &EnvState, cmd: &str) -> Option<PathBuf> {
    find_in_path(OsStr::new(env.get("PATH")?), cmd)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// A fully resolved command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Runs an invocation to completion and reports its exit code.
pub trait Spawner {
    fn spawn(&mut self, invocation: &Invocation, env: &EnvState) -> io::Result<i32>;
}

/// Spawns real processes, inheriting stdio and blocking until they exit.
#[derive(Debug, Default)]
pub struct SystemSpawner;

impl Spawner for SystemSpawner {
    fn spawn(&mut self, invocation: &Invocation, env: &EnvState) -> io::Result<i32> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args).env_clear().envs(env.iter());
        if let Some(dir) = &invocation.current_dir {
            cmd.current_dir(dir);
        }
        let status = cmd.status()?;
        Ok(exit_code(status))
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    match status.code() {
        Some(code) => code,
        None => terminated_by_signal(status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = status.signal() {
        128 + signal
    } else if status.core_dumped() {
        255
    } else {
        1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_status: ExitStatus) -> i32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[cfg(unix)]
    fn make_executable(dir: &Path, name: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    #[cfg(unix)]
    fn finds_executable_in_second_dir() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let expected = make_executable(b.path(), "tool");
        let paths = std::env::join_paths([a.path(), b.path()]).unwrap();

        assert_eq!(find_in_path(&paths, "tool"), Some(expected));
        assert_eq!(find_in_path(&paths, "other"), None);
    }

    #[test]
    #[cfg(unix)]
    fn skips_non_executable_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("tool"), "").unwrap();
        assert_eq!(find_in_path(dir.path().as_os_str(), "tool"), None);
    }

    #[test]
    fn which_without_path_is_none() {
        assert_eq!(which(&EnvState::default(), "cargo"), None);
    }

    #[test]
    fn invocation_display() {
        let inv = Invocation::new("cargo").arg("run").arg("--quiet");
        assert_eq!(inv.to_string(), "cargo run --quiet");
    }

    #[test]
    #[cfg(unix)]
    fn system_spawner_relays_exit_code() {
        let env = EnvState::from_process();
        let inv = Invocation::new("/bin/sh").arg("-c").arg("exit 7");
        assert_eq!(SystemSpawner.spawn(&inv, &env).unwrap(), 7);
    }

    #[test]
    #[cfg(unix)]
    fn system_spawner_passes_env() {
        let mut env = EnvState::from_process();
        env.set("QUICKSTART_PROBE", "3");
        let inv = Invocation::new("/bin/sh")
            .arg("-c")
            .arg("exit $QUICKSTART_PROBE");
        assert_eq!(SystemSpawner.spawn(&inv, &env).unwrap(), 3);
    }

    #[test]
    fn missing_program_is_not_found() {
        let err = SystemSpawner
            .spawn(&Invocation::new("/definitely/not/here"), &EnvState::default())
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
